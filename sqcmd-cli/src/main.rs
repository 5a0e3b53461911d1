//! sqcmd CLI - migration generator for Sequelize-style models.

use clap::Parser;

use sqcmd_cli::cli::{Cli, Command};
use sqcmd_cli::commands;
use sqcmd_cli::error::CliResult;
use sqcmd_cli::{logging, output};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // Run the CLI and handle errors
    if let Err(e) = run(cli).await {
        if e.is_warning() {
            output::warn(&e.to_string());
            return;
        }
        output::newline();
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let env = cli.env;

    // Run the appropriate command
    match cli.command {
        Command::Init(args) => commands::init::run(args).await,
        Command::Model(args) => commands::model::run(args, &env).await,
        Command::Migration(args) => commands::migration::run(args, &env).await,
        Command::Seed(args) => commands::seed::run(args, &env).await,
        Command::Models(args) => commands::models::run(args, &env).await,
        Command::Version => commands::version::run().await,
    }
}
