//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`] or [`health`]. Each handler lives in its
//! own submodule.

pub mod health;
pub mod run;

use crate::cli::{Cli, Commands};
use crate::error::ProxyError;

pub async fn dispatch(cli: Cli) -> Result<(), ProxyError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Health(args)) => health::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  imaging-proxy v{version} \u{2014} SigV4-signing proxy for AWS HealthImaging\n\n  \
         No command provided. To get started:\n\n    \
         export AWS_ACCESS_KEY_ID=... AWS_SECRET_ACCESS_KEY=...\n    \
         imaging-proxy run                 Start the proxy on :8089\n    \
         imaging-proxy health              Check a running instance\n    \
         imaging-proxy --help              See all commands and options\n"
    );
}
