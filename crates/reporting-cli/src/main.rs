//! reporting-cli: command-line client for the report definition API
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod handlers;
mod io;
mod print;


use clap::Parser;

use args::{Cli, Commands};
use client::{CliError, build_ctx_from_cli};
use handlers::{dashboards, definitions};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let ctx = build_ctx_from_cli(&cli)?;

    match cli.command {
        Commands::Definitions(cmd) => definitions::handle(&ctx, cmd.action).await?,
        Commands::Dashboards(cmd) => dashboards::handle(&ctx, cmd.action).await?,
    }

    Ok(())
}
