use clap::Parser;
use monz0_api::Direction;

use crate::{config::Config, Error};

#[derive(Debug, Parser)]
pub struct Transfer {
    /// The name of the pot
    pub(super) pot: String,

    /// The amount, in minor units (pence for GBP)
    #[clap(allow_hyphen_values = true)]
    pub(super) amount: i64,
}

impl Transfer {
    pub async fn run(self, config: &Config, direction: Direction) -> Result<(), Error> {
        let mut client = super::connect(config).await?;
        let pots = super::list_pots(&mut client).await?;

        let receipt = super::transfer(&client, direction, &self.pot, self.amount).await?;
        println!("{}", super::receipt_line(&receipt, &pots));

        Ok(())
    }
}
