//! workfind CLI: aggregate Schema.org feeds from several sites and search them.
//!
//! Fetches every configured source, merges the works into one date-sorted
//! collection, and prints the slice selected by site, type, and query.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
