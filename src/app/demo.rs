use clap::Parser;
use monz0_api::Direction;

use crate::{config::Config, Error};

#[derive(Debug, Parser)]
pub struct Demo {
    /// The pot to move money in and out of
    #[clap(long, default_value = "TestPot")]
    pub(super) pot: String,

    /// The amount to move, in minor units
    #[clap(long, default_value_t = 1)]
    pub(super) amount: i64,
}

impl Demo {
    pub async fn run(self, config: &Config) -> Result<(), Error> {
        let mut client = super::connect(config).await?;
        let pots = super::list_pots(&mut client).await?;

        // a failed deposit doesn't stop the withdrawal
        for direction in [Direction::Deposit, Direction::Withdraw] {
            match super::transfer(&client, direction, &self.pot, self.amount).await {
                Ok(receipt) => println!("{}", super::receipt_line(&receipt, &pots)),
                Err(e) => println!("Failed to {} pot {}: {}", direction, self.pot, e),
            }
        }

        Ok(())
    }
}
