use std::fmt;

use serde::{Serialize, Serializer};
use uuid::Uuid;

/// Which way money moves between the account and a pot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// From the account into the pot
    Deposit,

    /// From the pot back into the account
    Withdraw,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => f.write_str("deposit"),
            Self::Withdraw => f.write_str("withdraw"),
        }
    }
}

/// The body of a deposit or withdrawal
#[derive(Debug, Serialize)]
pub(crate) struct TransferRequest<'a> {
    #[serde(skip)]
    direction: Direction,

    #[serde(skip)]
    pot_id: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    source_account_id: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    destination_account_id: Option<&'a str>,

    #[serde(serialize_with = "as_string")]
    amount: u32,

    dedupe_id: String,
}

impl<'a> TransferRequest<'a> {
    /// Create a request with a fresh idempotency key
    pub fn new(direction: Direction, pot_id: &'a str, account_id: &'a str, amount: u32) -> Self {
        let (source_account_id, destination_account_id) = match direction {
            Direction::Deposit => (Some(account_id), None),
            Direction::Withdraw => (None, Some(account_id)),
        };

        Self {
            direction,
            pot_id,
            source_account_id,
            destination_account_id,
            amount,
            dedupe_id: Uuid::new_v4().simple().to_string(),
        }
    }

    pub fn path(&self) -> String {
        format!("pots/{}/{}", self.pot_id, self.direction)
    }

    pub fn dedupe_id(&self) -> &str {
        &self.dedupe_id
    }
}

fn as_string<S: Serializer>(amount: &u32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(amount)
}
