use tracing::{instrument, Level};

use crate::{
    model::{Accounts, Pots},
    session::Session,
    Account, DataError, Error, Pot, Transport,
};

mod retry;
pub use retry::RetryPolicy;
mod transfer;
pub use transfer::Direction;
use transfer::TransferRequest;

/// The outcome of a successful deposit or withdrawal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Which way the money moved
    pub direction: Direction,

    /// The name of the pot
    pub pot_name: String,

    /// The amount moved, in minor units
    pub amount: u32,

    /// The idempotency key the transfer was submitted with
    pub dedupe_id: String,
}

/// A client for the pots of a single personal account.
///
/// The client owns the [`Session`]: a personal account must be selected
/// ([`PotClient::select_personal_account`]) and its pots listed
/// ([`PotClient::list_pots`]) before money can be moved.
#[derive(Debug)]
pub struct PotClient<T> {
    transport: T,
    session: Session,
    retry: RetryPolicy,
}

impl<T> PotClient<T>
where
    T: Transport,
{
    /// Create a client on top of an authenticated [`Transport`]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            session: Session::default(),
            retry: RetryPolicy::default(),
        }
    }

    /// Set the [`RetryPolicy`] for deposits and withdrawals
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The current session
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Select the first personal account, in listing order.
    ///
    /// # Errors
    ///
    /// - [`DataError::NoAccounts`] if no accounts are listed
    /// - [`DataError::NoPersonalAccount`] if none of them is a personal account
    /// - [`RequestError`](crate::RequestError) if the listing fails
    #[instrument(skip(self))]
    pub async fn select_personal_account(&mut self) -> Result<Account, Error> {
        let response = self.transport.get("accounts", &[]).await?;
        let Accounts { accounts } = serde_json::from_value(response).map_err(DataError::from)?;

        if accounts.is_empty() {
            return Err(DataError::NoAccounts.into());
        }

        let account = accounts
            .into_iter()
            .find(Account::is_personal)
            .ok_or(DataError::NoPersonalAccount)?;

        tracing::event!(Level::INFO, account_id = %account.id, "selected personal account");
        self.session.select_account(account.id.clone());

        Ok(account)
    }

    /// List the pots of the selected account, and remember them by name.
    ///
    /// # Errors
    ///
    /// - [`DataError::NoAccountSelected`] if no account has been selected
    /// - [`DataError::NoPots`] if no pots are listed
    /// - [`RequestError`](crate::RequestError) if the listing fails
    #[instrument(skip(self))]
    pub async fn list_pots(&mut self) -> Result<Vec<Pot>, Error> {
        let account_id = self
            .session
            .account_id()
            .ok_or(DataError::NoAccountSelected)?;

        let response = self
            .transport
            .get("pots", &[("current_account_id", account_id)])
            .await?;
        let Pots { pots } = serde_json::from_value(response).map_err(DataError::from)?;

        if pots.is_empty() {
            return Err(DataError::NoPots.into());
        }

        self.session.replace_pots(&pots);
        tracing::event!(Level::INFO, count = pots.len(), "listed pots");

        Ok(pots)
    }

    /// Move `amount` (in minor units) from the selected account into the
    /// named pot.
    ///
    /// # Errors
    ///
    /// - [`DataError::UnknownPot`] if no pot by that name has been listed. No
    ///   request is made.
    /// - [`DataError::NegativeAmount`] if `amount` is negative. No request is
    ///   made.
    /// - [`RequestError`](crate::RequestError) if the last attempt fails
    pub async fn deposit(&self, pot_name: &str, amount: i64) -> Result<Receipt, Error> {
        self.transfer(Direction::Deposit, pot_name, amount).await
    }

    /// Move `amount` (in minor units) from the named pot back into the
    /// selected account.
    ///
    /// # Errors
    ///
    /// See [`PotClient::deposit`]
    pub async fn withdraw(&self, pot_name: &str, amount: i64) -> Result<Receipt, Error> {
        self.transfer(Direction::Withdraw, pot_name, amount).await
    }

    #[instrument(skip(self))]
    async fn transfer(
        &self,
        direction: Direction,
        pot_name: &str,
        amount: i64,
    ) -> Result<Receipt, Error> {
        let pot_id = self
            .session
            .pot_id(pot_name)
            .ok_or_else(|| DataError::UnknownPot(pot_name.to_string()))?;
        let account_id = self
            .session
            .account_id()
            .ok_or(DataError::NoAccountSelected)?;
        let amount = validate_amount(amount)?;

        let request = TransferRequest::new(direction, pot_id, account_id, amount);
        let path = request.path();
        let body = serde_json::to_value(&request).map_err(DataError::from)?;

        let attempts = self.retry.attempts();
        let mut attempt = 1;

        loop {
            match self.transport.put(&path, &body).await {
                Ok(_) => break,
                Err(e) => {
                    tracing::event!(
                        Level::WARN,
                        attempt,
                        attempts,
                        error = %e,
                        "{} attempt failed",
                        direction
                    );

                    if attempt >= attempts {
                        return Err(e.into());
                    }

                    tokio::time::sleep(self.retry.delay()).await;
                    attempt += 1;
                }
            }
        }

        tracing::event!(Level::INFO, attempt, "{} succeeded", direction);

        Ok(Receipt {
            direction,
            pot_name: pot_name.to_string(),
            amount,
            dedupe_id: request.dedupe_id().to_string(),
        })
    }
}

fn validate_amount(amount: i64) -> Result<u32, DataError> {
    if amount < 0 {
        return Err(DataError::NegativeAmount(amount));
    }

    u32::try_from(amount).map_err(|_| DataError::AmountOutOfRange(amount))
}
