use clap::{ArgAction, Parser, Subcommand};
use monz0_api::{
    auth::{self, AuthorizationCodeFlow, ExistingToken},
    AuthError, CredentialSource, Direction, HttpTransport, Pot, PotClient, Receipt,
};

use crate::{
    callback::LocalReceiver,
    config::{self, CallbackMode, Config},
    console::{self, ConsoleReceiver},
    Error,
};

mod demo;
use demo::Demo;
mod list;
use list::List;
mod show;
use show::Show;
mod transfer;
use transfer::Transfer;

type Client = PotClient<HttpTransport>;

/// Move money in and out of the pots of your Monzo account
#[derive(Debug, Parser)]
#[clap(version, about)]
pub struct App {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[clap(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the pots of your personal account
    Pots(List),

    /// Move money from your account into a pot
    Deposit(Transfer),

    /// Move money from a pot back into your account
    Withdraw(Transfer),

    /// List your pots, then deposit into and withdraw from a pot
    Demo(Demo),

    /// Print the configuration in use
    Show(Show),
}

impl App {
    pub fn from_args() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    pub async fn run(self) -> Result<(), Error> {
        let config = config::load()?;

        match self.command {
            Command::Pots(list) => list.run(&config).await,
            Command::Deposit(transfer) => transfer.run(&config, Direction::Deposit).await,
            Command::Withdraw(transfer) => transfer.run(&config, Direction::Withdraw).await,
            Command::Demo(demo) => demo.run(&config).await,
            Command::Show(show) => Ok(show.run(&config)?),
        }
    }
}

/// Authenticate, check the credential works, and select the personal account
async fn connect(config: &Config) -> Result<Client, Error> {
    println!("Starting OAuth2 flow...");
    let token = console::prompt(
        "If you already have a token, enter it now, otherwise press enter to continue: ",
    )
    .await?;

    let credential = credential_source(config, token)?.credential().await?;

    println!("OAuth2 flow completed, testing API call...");
    let transport = HttpTransport::new(&config.api_url, credential)?
        .with_body_encoding(config.body_encoding);
    auth::verify_credential(&transport).await?;
    println!("API call test successful!");

    println!("Retrieving account information...");
    let mut client = PotClient::new(transport).with_retry_policy(config.retry);
    client.select_personal_account().await?;
    println!("Retrieved account information.");

    Ok(client)
}

fn credential_source(
    config: &Config,
    token: String,
) -> Result<Box<dyn CredentialSource>, AuthError> {
    if !token.is_empty() {
        return Ok(Box::new(ExistingToken::new(token)));
    }

    let oauth = config.oauth.clone();
    let source: Box<dyn CredentialSource> = match config.callback {
        CallbackMode::Manual => Box::new(AuthorizationCodeFlow::over_http(oauth, ConsoleReceiver)),
        CallbackMode::Local => {
            let receiver = LocalReceiver::from_redirect_uri(&oauth.redirect_uri)?;
            Box::new(AuthorizationCodeFlow::over_http(oauth, receiver))
        }
    };

    Ok(source)
}

async fn list_pots(client: &mut Client) -> Result<Vec<Pot>, Error> {
    let pots = client.list_pots().await?;

    println!("Your current pots are");
    for pot in &pots {
        println!("\t{} {}", pot.name, format_amount(&pot.currency, pot.balance));
    }

    Ok(pots)
}

async fn transfer(
    client: &Client,
    direction: Direction,
    pot_name: &str,
    amount: i64,
) -> Result<Receipt, monz0_api::Error> {
    match direction {
        Direction::Deposit => client.deposit(pot_name, amount).await,
        Direction::Withdraw => client.withdraw(pot_name, amount).await,
    }
}

fn receipt_line(receipt: &Receipt, pots: &[Pot]) -> String {
    // the last pot of a name is the one that was used
    let currency = pots
        .iter()
        .rev()
        .find(|pot| pot.name == receipt.pot_name)
        .map_or("GBP", |pot| pot.currency.as_str());
    let amount = format_amount(currency, i64::from(receipt.amount));

    match receipt.direction {
        Direction::Deposit => format!(
            "Successfully deposited {} into pot {}",
            amount, receipt.pot_name
        ),
        Direction::Withdraw => format!(
            "Successfully withdrew {} from pot {}",
            amount, receipt.pot_name
        ),
    }
}

fn format_amount(currency: &str, amount: i64) -> String {
    match rusty_money::iso::find(currency) {
        Some(currency) => rusty_money::Money::from_minor(amount, currency).to_string(),
        None => format!("{} {}", amount, currency),
    }
}
