//! Per-run session state

use indexmap::IndexMap;

use crate::Pot;

/// How far a run has progressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// A verified credential is available, nothing else is known yet
    Authenticated,

    /// The personal account has been selected
    AccountSelected,

    /// The pots of the selected account have been listed
    PotsListed,
}

/// The account and pots selected during a run.
///
/// Only [`PotClient`](crate::PotClient) writes to the session; everything
/// else gets read-only access.
#[derive(Debug, Default, Clone)]
pub struct Session {
    account_id: Option<String>,

    /// pot name -> pot id, in listing order
    pots: IndexMap<String, String>,
}

impl Session {
    /// The ID of the selected account, if any
    #[must_use]
    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    /// Look up the ID of a pot by name
    #[must_use]
    pub fn pot_id(&self, name: &str) -> Option<&str> {
        self.pots.get(name).map(String::as_str)
    }

    /// The names of the known pots, in listing order
    pub fn pot_names(&self) -> impl Iterator<Item = &str> {
        self.pots.keys().map(String::as_str)
    }

    /// The current [`Stage`] of the run
    #[must_use]
    pub fn stage(&self) -> Stage {
        match (&self.account_id, self.pots.is_empty()) {
            (None, _) => Stage::Authenticated,
            (Some(_), true) => Stage::AccountSelected,
            (Some(_), false) => Stage::PotsListed,
        }
    }

    pub(crate) fn select_account(&mut self, account_id: String) {
        self.account_id = Some(account_id);
        self.pots.clear();
    }

    /// Rebuild the name -> id mapping. Later duplicates of a name win.
    pub(crate) fn replace_pots<'a>(&mut self, pots: impl IntoIterator<Item = &'a Pot>) {
        self.pots = pots
            .into_iter()
            .map(|pot| (pot.name.clone(), pot.id.clone()))
            .collect();
    }
}
