//! CLI argument parsing
//!
//! Structured argument parsing with a global configuration path and one
//! subcommand per configuration operation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Main application arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct ReconArgs {
    /// Configuration file path (discovered automatically when omitted)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Configuration operations
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load and validate a configuration document
    Validate {
        /// Require every field in the document instead of filling defaults
        #[arg(long)]
        strict: bool,
    },

    /// Display the effective configuration (defaults + file + environment)
    Show {
        /// Output format
        #[arg(long, value_enum, default_value_t = ExportFormat::Yaml)]
        format: ExportFormat,
    },

    /// Write the effective configuration to a file
    Export {
        /// Output path
        #[arg(short, long)]
        output: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = ExportFormat::Yaml)]
        format: ExportFormat,
    },

    /// Write the compiled defaults as a starting configuration file
    Generate {
        /// Output path
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Configuration export formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Yaml,
    Json,
}

impl ReconArgs {
    /// Parse arguments from the command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
