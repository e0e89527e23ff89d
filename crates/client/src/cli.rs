// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand};

const QUICKSTART_HELP: &str = "\
Examples:
  iwsync status                                      Show the offline queue
  iwsync enqueue update project '{\"id\":\"p1\"}'       Queue a project update
  iwsync drain                                       Deliver queued operations";

#[derive(Parser, Debug)]
#[command(name = "iwsync")]
#[command(about = "Inspect and drive the invitationweb offline sync queue")]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    /// Path to the config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Show connectivity, queue length and pending operations
    Status,

    /// Queue an operation for delivery
    #[command(arg_required_else_help = true)]
    Enqueue {
        /// Operation kind (create, update, delete)
        kind: String,

        /// Resource type (project, image, rsvp)
        resource: String,

        /// JSON payload
        payload: String,
    },

    /// Deliver queued operations now, assuming the network is reachable
    Drain,

    /// Drop every queued operation
    Clear,

    /// Sign out and drop every queued operation
    Logout,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
