//! Resource ledger server entry point

use clap::Parser;
use resource_ledger::cli::{self, Cli, Commands};
use resource_ledger::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _log_guard = logging::init()?;

    match cli.command {
        Some(Commands::Migrate(args)) => cli::migrate::execute(&args).await,
        Some(Commands::Serve(args)) => cli::serve::execute(&args).await,
        None => cli::serve::execute(&cli::serve::ServeArgs::default()).await,
    }
}
