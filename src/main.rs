//! # recon-config CLI
//!
//! Validates, displays, exports, and generates configuration documents for
//! the recon reconstruction pipeline.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

use cli::{execute_command, ReconArgs};

fn main() -> Result<()> {
    let args = ReconArgs::parse_args();

    init_logging(&args.log_level)?;

    execute_command(args)
}

fn init_logging(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("recon_config={log_level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(())
}
