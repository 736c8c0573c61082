//! # relchron - THE BINARY
//!
//! The main binary for the relchron partial-order event recorder.
//!
//! This application provides:
//! - CLI interface for recording and inspecting events
//! - HTTP REST API server (axum-based)
//! - JSON file storage with atomic whole-file replace
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │               apps/relchron (THE BINARY)          │
//! │                                                   │
//! │  ┌──────────┐   ┌───────────┐   ┌─────────────┐   │
//! │  │   CLI    │   │ HTTP API  │   │ JSON store  │   │
//! │  │  (clap)  │   │  (axum)   │   │ (tmp+rename)│   │
//! │  └────┬─────┘   └─────┬─────┘   └──────┬──────┘   │
//! │       └───────────────┼────────────────┘          │
//! │                       ▼                           │
//! │               ┌───────────────┐                   │
//! │               │ relchron-core │                   │
//! │               │  (THE LOGIC)  │                   │
//! │               └───────────────┘                   │
//! └───────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Record events
//! relchron -d ./journal init
//! relchron -d ./journal add "wake up"
//! relchron -d ./journal add "breakfast" --after <id>
//!
//! # Inspect
//! relchron -d ./journal list
//! relchron -d ./journal check
//!
//! # Serve the HTTP API
//! relchron -d ./journal server --host 0.0.0.0 --port 8080
//! ```

use clap::Parser;
use relchron::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — RELCHRON_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("RELCHRON_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "relchron=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the relchron startup banner.
fn print_banner() {
    println!(
        r#"
  relchron v{}

  Record events in relative time. Find the contradictions.
"#,
        env!("CARGO_PKG_VERSION")
    );
}
