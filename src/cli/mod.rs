//! Command-line interface for recon-config
//!
//! Argument parsing and command routing for the configuration tool.

pub mod args;
pub mod handlers;

use anyhow::Result;

pub use args::{Command, ExportFormat, ReconArgs};

/// Execute the parsed command
pub fn execute_command(args: ReconArgs) -> Result<()> {
    match args.command {
        Command::Validate { strict } => handlers::validate_config(args.config, strict),
        Command::Show { format } => handlers::show_config(args.config, format),
        Command::Export { output, format } => {
            handlers::export_config(args.config, &output, format)
        }
        Command::Generate { output } => handlers::generate_config(&output),
    }
}
