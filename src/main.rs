#![deny(
    clippy::all,
    missing_debug_implementations,
    missing_copy_implementations
)]
#![warn(clippy::pedantic)]

use std::process::ExitCode;

mod app;
use confy::ConfyError;
mod callback;
mod config;
mod console;
mod logging;

use app::App;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config")]
    Load(#[from] ConfyError),

    #[error("console interaction failed")]
    Console(#[from] std::io::Error),

    #[error("authorization failed")]
    Auth(#[from] monz0_api::AuthError),

    #[error(transparent)]
    Request(#[from] monz0_api::RequestError),

    #[error(transparent)]
    Pots(#[from] monz0_api::Error),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let app = App::from_args();
    logging::set_up(app.verbosity());

    if let Err(e) = app.run().await {
        print_error(&e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn print_error(error: &dyn std::error::Error) {
    println!("{}", error);

    let mut source = error.source();
    while let Some(cause) = source {
        println!("  caused by: {}", cause);
        source = cause.source();
    }
}
