//! A library for moving money in and out of the pots of a single Monzo
//! account

#![deny(
    clippy::all,
    missing_debug_implementations,
    missing_copy_implementations,
    missing_docs
)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
#[doc(inline)]
pub use auth::{Credential, CredentialSource, OAuthConfig};
mod client;
pub use client::{Direction, PotClient, Receipt, RetryPolicy};
mod error;
pub use error::{AuthError, DataError, Error, RequestError};
mod model;
pub use model::{Account, Pot, PERSONAL_ACCOUNT_TYPE};
pub mod session;
#[doc(inline)]
pub use session::Session;
pub mod transport;
#[doc(inline)]
pub use transport::{BodyEncoding, HttpTransport, Transport};
