//! Command line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Terminal client for the helpdesk ticketing service.
#[derive(Parser, Debug)]
#[command(name = "helpdesk-tui", version, about)]
pub struct Cli {
    /// Backend URL, overriding the config file.
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,

    /// Path to the config file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Route to open after startup, e.g. `/tickets/4`.
    #[arg(long, value_name = "PATH")]
    pub open: Option<String>,

    /// Log at debug level regardless of RUST_LOG.
    #[arg(long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Remove the stored session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Print where the config file is read from.
    ConfigPath,
    /// Write a config file with the default settings.
    InitConfig,
}
