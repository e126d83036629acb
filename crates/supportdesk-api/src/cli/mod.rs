//! CLI command definitions for the `supportdesk` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod memories;
pub mod tickets;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Customer support assistant with ticketing and long-term memory.
#[derive(Parser)]
#[command(name = "supportdesk", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a config.toml (defaults to SUPPORTDESK_CONFIG, then the data dir).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server and chat page.
    Serve {
        /// Host address to bind to (overrides config).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config).
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Chat with the support assistant in the terminal.
    Chat {
        /// Whose memories and tickets the conversation belongs to.
        #[arg(long, default_value = "user_456")]
        user_id: String,

        /// Continue a specific session instead of the active one.
        #[arg(long)]
        session_id: Option<String>,
    },

    /// List support tickets.
    Tickets {
        /// Only show tickets for this user.
        #[arg(long)]
        user_id: Option<String>,
    },

    /// Show what the assistant remembers about a user.
    Memories {
        user_id: String,

        /// Text to rank memories against.
        #[arg(long, short)]
        query: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
