// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! iwsync: command-line access to the invitationweb offline sync queue.

use std::path::Path;

use clap::Parser;

use iw_client::cli::{Cli, Command};
use iw_client::commands::{CommandResult, Context};
use iw_client::{config, env, Config};

fn setup_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(config_path: &Path, command: Command) -> CommandResult<String> {
    let config = Config::load(config_path)?;
    let context = Context::open(&config)?;
    context.run(command).await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config_path = cli
        .config
        .clone()
        .or_else(env::config_path)
        .unwrap_or_else(config::default_path);

    match run(&config_path, cli.command).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
