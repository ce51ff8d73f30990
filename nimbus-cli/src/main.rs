//! Nimbus CLI - Command-line interface
//!
//! Entry point for running the web dashboard or a terminal demo of the
//! simulated download lifecycle.

mod commands;

use clap::Parser;

#[derive(Parser)]
#[command(name = "nimbus")]
#[command(about = "A simulated torrent dashboard")]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    commands::handle_command(cli.command).await
}
