mod commands;
mod console;
mod interpreter;
mod logging;
mod render;
mod repl;

use anyhow::Result;
use calbot_core::AppConfig;
use calbot_google::{CredentialStore, GoogleGateway, GoogleOAuth};
use tracing::info;

use console::Console;
use interpreter::{FuzzyDateParser, Interpreter};
use repl::Repl;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logging::init()?;

    let config = AppConfig::load()?;
    info!(calendar = %config.calendar_id, timezone = %config.timezone, "Starting calbot");

    // Authorize up front so a broken setup fails before the greeting
    let store = CredentialStore::new(&config, GoogleOAuth);
    store.obtain_credential().await?;

    let gateway = GoogleGateway::new(&config, store);
    let console = Console::new(std::io::stdin().lock(), std::io::stdout());

    Repl::new(&gateway, &config, Interpreter::new(FuzzyDateParser), console)
        .run()
        .await?;

    Ok(())
}
