use serde::Deserialize;

/// The type tag of a personal (non-joint) current account
pub const PERSONAL_ACCOUNT_TYPE: &str = "uk_retail";

/// A Monzo account
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Account {
    /// The unique ID of the account
    pub id: String,

    /// The type tag of the account, if the API reported one
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,

    /// A human-readable description of the account
    #[serde(default)]
    pub description: String,
}

impl Account {
    /// Whether this is a personal retail account
    #[must_use]
    pub fn is_personal(&self) -> bool {
        self.account_type.as_deref() == Some(PERSONAL_ACCOUNT_TYPE)
    }
}

/// A Monzo pot
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Pot {
    /// The unique ID associated with the pot
    pub id: String,

    /// The name of the pot
    pub name: String,

    /// The balance of the pot, in minor units
    pub balance: i64,

    /// The currency code for this pot
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Whether the pot has been deleted
    #[serde(default)]
    pub deleted: bool,
}

fn default_currency() -> String {
    "GBP".to_string()
}

#[derive(Debug, Deserialize)]
pub(crate) struct Accounts {
    #[serde(default)]
    pub accounts: Vec<Account>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Pots {
    #[serde(default)]
    pub pots: Vec<Pot>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    use super::*;

    #[test_case(json!({"id": "acc_1", "type": "uk_retail"}) => true; "personal")]
    #[test_case(json!({"id": "acc_2", "type": "uk_retail_joint"}) => false; "joint")]
    #[test_case(json!({"id": "acc_3"}) => false; "untagged")]
    fn is_personal(raw: serde_json::Value) -> bool {
        serde_json::from_value::<Account>(raw).unwrap().is_personal()
    }

    #[test]
    fn pot_defaults() {
        let pot: Pot =
            serde_json::from_value(json!({"id": "pot_1", "name": "TestPot", "balance": 500}))
                .unwrap();

        assert_eq!(pot.currency, "GBP");
        assert!(!pot.deleted);
    }

    #[test]
    fn absent_listing_is_empty() {
        let pots: Pots = serde_json::from_value(json!({})).unwrap();
        assert!(pots.pots.is_empty());
    }
}
