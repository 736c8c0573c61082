//! # relchron CLI Module
//!
//! This module implements the CLI interface for relchron.
//!
//! ## Available Commands
//!
//! - `init` - Initialize a new database directory
//! - `add` - Record an event with optional relative time assertions
//! - `list` - List stored markers
//! - `show` - Show one marker in its serialized form
//! - `check` - Report self-containment and ordering conflicts
//! - `server` - Start the HTTP server

mod commands;

use clap::{Parser, Subcommand};
use relchron_core::RelchronError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// relchron - partial-order event recorder
///
/// Records events whose chronological order is only partially known and
/// reports the assertions that contradict each other.
#[derive(Parser, Debug)]
#[command(name = "relchron")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the database directory
    #[arg(short = 'd', long, global = true, default_value = ".")]
    pub directory: PathBuf,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new empty database directory
    Init,

    /// Record an event
    Add {
        /// Event title
        title: String,

        /// Optional description
        desc: Option<String>,

        /// Markers this event is before (comma-separated ids)
        #[arg(long)]
        before: Option<String>,

        /// Markers this event is after (comma-separated ids)
        #[arg(long)]
        after: Option<String>,

        /// Markers this event is at the same time as (comma-separated ids)
        #[arg(long)]
        same: Option<String>,

        /// Use this identifier instead of generating one
        #[arg(long)]
        id: Option<String>,

        /// Keep the record even when it references unknown markers
        #[arg(long)]
        allow_dangling: bool,
    },

    /// List stored markers
    List,

    /// Show one marker in its serialized form
    Show {
        /// Marker identifier
        id: String,
    },

    /// Report self-containment and ordering conflicts
    Check,

    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), RelchronError> {
    let dir = cli.directory.as_path();
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Init) => cmd_init(dir),
        Some(Commands::Add {
            title,
            desc,
            before,
            after,
            same,
            id,
            allow_dangling,
        }) => cmd_add(
            dir,
            json_mode,
            &title,
            desc.as_deref(),
            before.as_deref(),
            after.as_deref(),
            same.as_deref(),
            id.as_deref(),
            allow_dangling,
        ),
        Some(Commands::List) => cmd_list(dir, json_mode),
        Some(Commands::Show { id }) => cmd_show(dir, json_mode, &id),
        Some(Commands::Server { host, port }) => cmd_server(dir, &host, port).await,
        // No subcommand - report consistency by default
        Some(Commands::Check) | None => cmd_check(dir, json_mode),
    }
}
