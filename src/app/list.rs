use clap::Parser;

use crate::{config::Config, Error};

#[derive(Debug, Default, Parser, Clone, Copy)]
pub struct List;

impl List {
    pub async fn run(self, config: &Config) -> Result<(), Error> {
        let mut client = super::connect(config).await?;
        super::list_pots(&mut client).await?;
        Ok(())
    }
}
