//! atelier-cli: programmatic blog submission client.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod submit;


use clap::Parser;

use args::{Cli, Commands};
use client::{CliError, build_ctx_from_cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = build_ctx_from_cli(&cli)?;

    match cli.command {
        Commands::Submit(cmd) => submit::handle(&ctx, cmd).await?,
    }

    Ok(())
}
