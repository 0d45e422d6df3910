//! Configuration management commands
//!
//! Handles configuration validation, display, export, and generation.

use anyhow::{anyhow, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use recon_config::config::{ConfigValidation, LoadOptions, ReconConfig};

use super::args::ExportFormat;

/// Validate a configuration document and report errors and warnings
pub fn validate_config(config_path: Option<PathBuf>, strict: bool) -> Result<()> {
    let shown_path = config_path
        .as_deref()
        .map(Path::display)
        .map(|p| p.to_string())
        .unwrap_or_else(|| "<discovered>".to_string());

    info!("Validating configuration: {}", shown_path);
    println!("🔍 Validating configuration: {shown_path}");

    let loaded = if strict {
        let path = config_path
            .ok_or_else(|| anyhow!("--strict requires an explicit --config path"))?;
        let document = fs::read_to_string(&path)
            .map_err(|e| anyhow!("Cannot read {}: {e}", path.display()))?;
        ReconConfig::from_yaml_str(&document)
    } else {
        ReconConfig::load_with_options(LoadOptions {
            config_path,
            require_file: false,
            ..LoadOptions::default()
        })
    };

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration validation failed: {}", e);
            println!("❌ {e}");
            return Err(anyhow!("Configuration validation failed"));
        }
    };

    let warnings = config.warnings();
    if !warnings.is_empty() {
        println!("⚠️  {} warnings found:", warnings.len());
        for warning in &warnings {
            println!("   Warning: {warning}");
        }
    }

    println!("✅ Configuration validation passed");
    Ok(())
}

/// Show the effective configuration
pub fn show_config(config_path: Option<PathBuf>, format: ExportFormat) -> Result<()> {
    let config = load_effective(config_path)?;

    println!("📋 Effective Configuration");
    println!("==========================");
    println!("{}", render(&config, format)?);

    println!("=== Derived Configuration ===");
    println!("Normal net input channels: {}", config.net.nml_channels());
    println!("Geometry net input channels: {}", config.net.geo_channels());
    println!(
        "Prior-sourced parts: {}",
        config
            .bni
            .use_smpl
            .iter()
            .map(|p| p.as_str().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(())
}

/// Export the effective configuration to a file
pub fn export_config(
    config_path: Option<PathBuf>,
    output_path: &Path,
    format: ExportFormat,
) -> Result<()> {
    let config = load_effective(config_path)?;

    info!(
        "Exporting configuration to: {} (format: {:?})",
        output_path.display(),
        format
    );

    fs::write(output_path, render(&config, format)?)
        .map_err(|e| anyhow!("Failed to write configuration file: {}", e))?;

    println!("✅ Configuration exported to: {}", output_path.display());
    Ok(())
}

/// Write the compiled defaults as a starting configuration file
pub fn generate_config(output_path: &Path) -> Result<()> {
    info!("Generating configuration file: {}", output_path.display());

    let config = ReconConfig::default();
    fs::write(output_path, config.to_yaml()?)?;

    println!("Generated configuration file: {}", output_path.display());
    Ok(())
}

fn load_effective(config_path: Option<PathBuf>) -> Result<ReconConfig> {
    let config = ReconConfig::load_with_options(LoadOptions {
        require_file: config_path.is_some(),
        config_path,
        ..LoadOptions::default()
    })?;
    Ok(config)
}

fn render(config: &ReconConfig, format: ExportFormat) -> Result<String> {
    let rendered = match format {
        ExportFormat::Yaml => config.to_yaml()?,
        ExportFormat::Json => serde_json::to_string_pretty(config)
            .map_err(|e| anyhow!("Failed to serialize to JSON: {}", e))?,
    };
    Ok(rendered)
}
