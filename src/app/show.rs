use clap::Parser;
use confy::ConfyError;

use crate::config::{self, Config};

#[derive(Debug, Default, Parser, Clone, Copy)]
pub struct Show;

impl Show {
    pub fn run(self, config: &Config) -> Result<(), ConfyError> {
        println!("{}", config::path()?.display());
        println!("{:#?}", config);
        Ok(())
    }
}
