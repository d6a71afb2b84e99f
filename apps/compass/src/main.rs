//! # Compass - Self-Compassion Survey Server
//!
//! The main binary for the Compass survey application.
//!
//! This application provides:
//! - The survey web app (axum-rendered three-page form)
//! - CLI interface for operating the survey
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                apps/compass (THE BINARY)              │
//! │                                                       │
//! │  ┌─────────────┐   ┌─────────────┐   ┌────────────┐  │
//! │  │    CLI      │   │  HTTP pages │   │  CSV sheet │  │
//! │  │   (clap)    │   │   (axum)    │   │ (row sink) │  │
//! │  └──────┬──────┘   └──────┬──────┘   └─────┬──────┘  │
//! │         │                 │                │         │
//! │         └─────────────────┼────────────────┘         │
//! │                           ▼                          │
//! │                  ┌────────────────┐                  │
//! │                  │  compass-core  │                  │
//! │                  │  (THE LOGIC)   │                  │
//! │                  └────────────────┘                  │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the survey server
//! compass serve --host 0.0.0.0 --port 8080
//!
//! # Operator tools
//! compass bank
//! compass score -f responses.json
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — COMPASS_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("COMPASS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "compass=info,tower_http=debug".into());

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
    let cli = compass::cli::Cli::parse();

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = compass::cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Compass startup banner.
fn print_banner() {
    println!(
        r#"
  ┌─────────────────────────────────────┐
  │  COMPASS                            │
  │  Self-Compassion Survey v{:<10} │
  └─────────────────────────────────────┘
"#,
        env!("CARGO_PKG_VERSION")
    );
}
