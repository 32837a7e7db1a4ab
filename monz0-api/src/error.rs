/// Errors raised while obtaining or verifying a [`Credential`](crate::Credential)
///
/// These are fatal for a run: without a working credential none of the pot
/// operations can proceed.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The anti-forgery state returned by the authorization server did not
    /// match the one the flow was started with
    #[error("OAuth2 state mismatch (expected '{expected}', received '{received}')")]
    StateMismatch {
        /// the state generated when the flow was started
        expected: String,

        /// the state returned with the authorization code
        received: String,
    },

    /// The callback did not carry an authorization code
    #[error("no authorization code was returned")]
    MissingCode,

    /// The code-for-token exchange request failed
    #[error("token exchange failed: {0}")]
    Exchange(String),

    /// The token endpoint answered without an access token
    #[error("no access token was returned by the token endpoint")]
    MissingToken,

    /// The authenticated test call did not confirm the credential
    #[error("credential verification failed")]
    Verification(#[source] Option<RequestError>),

    /// The OAuth2 settings could not be turned into a valid request
    #[error("invalid OAuth2 configuration: {0}")]
    InvalidConfig(String),

    /// The authorization callback could not be received or understood
    #[error("failed to receive authorization callback: {0}")]
    Callback(String),
}

/// Errors caused by missing or unexpected account data
///
/// These abort the current operation but leave the session untouched.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// The account listing was empty or absent
    #[error("could not retrieve accounts information")]
    NoAccounts,

    /// None of the listed accounts is a personal account
    #[error("could not find a personal account")]
    NoPersonalAccount,

    /// A pot operation was attempted before an account was selected
    #[error("no account has been selected")]
    NoAccountSelected,

    /// The pot listing was empty or absent
    #[error("could not retrieve pots information")]
    NoPots,

    /// No pot with the given name is known to the session
    #[error("couldn't find a pot by the name '{0}'")]
    UnknownPot(String),

    /// A negative amount was requested
    #[error("amount must not be negative (got {0}), use the opposite operation instead")]
    NegativeAmount(i64),

    /// The requested amount does not fit in a single transfer
    #[error("amount {0} is too large")]
    AmountOutOfRange(i64),

    /// The payload did not have the expected shape
    #[error("malformed response payload")]
    Malformed(#[from] serde_json::Error),
}

/// Errors raised by the HTTP boundary
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The request could not be sent or its response not read
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("request failed with status {status}: {body}")]
    Status {
        /// the HTTP status code
        status: u16,

        /// the error payload returned by the server
        body: serde_json::Value,
    },

    /// The response body was not valid JSON
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The request URL could not be built
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// The union of all errors returned by the pot operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// see [`AuthError`]
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// see [`DataError`]
    #[error(transparent)]
    Data(#[from] DataError),

    /// see [`RequestError`]
    #[error(transparent)]
    Request(#[from] RequestError),
}
