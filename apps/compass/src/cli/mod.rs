//! # Compass CLI Module
//!
//! ## Available Commands
//!
//! - `serve` - Start the survey HTTP server
//! - `bank` - Print the question bank (operator view)
//! - `score` - Score a response file without the server

mod commands;

use crate::config::AppConfig;
use clap::{Parser, Subcommand};
use compass_core::CompassError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Compass - Self-Compassion Survey Server
///
/// A three-page survey: demographic intake, a fixed 26-item Likert
/// questionnaire, and a color-coded profile of three section scores.
#[derive(Parser, Debug)]
#[command(name = "compass")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the session database (omit to keep sessions in memory)
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Path to the CSV results sheet
    #[arg(short = 'S', long, global = true)]
    pub sheet: Option<PathBuf>,

    /// Path to a toml configuration file
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

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
    /// Start the survey HTTP server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the question bank
    Bank,

    /// Score a JSON file holding an array of 26 Likert labels
    Score {
        /// Path to the response file
        #[arg(short, long)]
        file: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), CompassError> {
    let mut config = AppConfig::resolve(cli.config.as_deref())?;

    // CLI flags override the config file.
    if let Some(database) = cli.database {
        config.sessions.database = Some(database);
    }
    if let Some(sheet) = cli.sheet {
        config.sheet.path = sheet;
    }

    match cli.command {
        Some(Commands::Serve { host, port }) => cmd_serve(&config, host, port).await,
        Some(Commands::Bank) | None => cmd_bank(cli.json_mode),
        Some(Commands::Score { file }) => cmd_score(&file, cli.json_mode),
    }
}
