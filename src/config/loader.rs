//! Configuration loader
//!
//! Figment-based configuration loading with layered support:
//! 1. Compiled defaults
//! 2. YAML configuration document
//! 3. Environment variable overrides
//!
//! Figment extraction failures are classified into the
//! [`ConfigurationError`] taxonomy so callers see *which* field is missing,
//! mistyped, or malformed rather than a generic parse failure.

use crate::error::ConfigurationError;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default configuration file name
const DEFAULT_CONFIG_FILE: &str = "recon.yaml";

/// Environment variable prefix
const DEFAULT_ENV_PREFIX: &str = "RECON";

/// Load configuration with the layered approach
///
/// # Configuration Layer Priority (highest to lowest)
/// 1. Environment variables (`RECON_*`)
/// 2. Configuration file (`recon.yaml` or discovered path)
/// 3. Compiled defaults
///
/// # Environment Variable Mapping
/// - Nested fields use double underscore: `RECON_BNI__K`
/// - Case insensitive matching
pub fn load_config<T>() -> Result<T, ConfigurationError>
where
    T: Default + DeserializeOwned + serde::Serialize,
{
    load_config_with_options::<T>(LoadOptions::default())
}

/// Load configuration from a specific file
///
/// The file must exist; environment overrides still apply on top of it.
pub fn load_from_file<T>(path: &Path) -> Result<T, ConfigurationError>
where
    T: Default + DeserializeOwned + serde::Serialize,
{
    let options = LoadOptions {
        config_path: Some(path.to_path_buf()),
        require_file: true,
        ..LoadOptions::default()
    };
    load_config_with_options::<T>(options)
}

/// Parse a YAML document in strict mode
///
/// No defaults layer and no environment overrides: every field must be
/// present in the document itself.
pub fn from_yaml_str<T>(document: &str) -> Result<T, ConfigurationError>
where
    T: DeserializeOwned,
{
    Figment::from(Yaml::string(document))
        .extract()
        .map_err(classify_figment_error)
}

/// Configuration loading options
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Optional path to the configuration file
    pub config_path: Option<PathBuf>,
    /// Environment variable prefix
    pub env_prefix: String,
    /// Whether the configuration file is required
    pub require_file: bool,
    /// Drop the defaults layer so absent keys become errors
    pub strict: bool,
    /// Root for resolving relative paths (current directory when `None`)
    pub path_root: Option<PathBuf>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            require_file: false,
            strict: false,
            path_root: None,
        }
    }
}

/// Load configuration with custom options
pub fn load_config_with_options<T>(options: LoadOptions) -> Result<T, ConfigurationError>
where
    T: Default + DeserializeOwned + serde::Serialize,
{
    debug!("Loading configuration with options: {:?}", options);

    let mut figment = if options.strict {
        Figment::new()
    } else {
        Figment::from(Serialized::defaults(T::default()))
    };

    let config_path = determine_config_path(options.config_path)?;

    if let Some(path) = &config_path {
        if path.exists() {
            info!("Loading configuration from file: {}", path.display());
            figment = add_file_provider(figment, path)?;
        } else if options.require_file {
            return Err(ConfigurationError::FileNotFound {
                path: path.display().to_string(),
            });
        } else {
            warn!(
                "Configuration file not found: {} (using defaults)",
                path.display()
            );
        }
    }

    debug!(
        "Loading environment variables with prefix: {}",
        options.env_prefix
    );
    figment = figment.merge(
        Env::prefixed(&format!("{}_", options.env_prefix))
            .split("__")
            .ignore(&["PATH", "HOME", "USER"]),
    );

    let config: T = figment.extract().map_err(classify_figment_error)?;

    debug!(
        "Configuration loaded from {} sources",
        figment.metadata().count()
    );

    Ok(config)
}

/// Determine the configuration file path with fallback logic
fn determine_config_path(
    override_path: Option<PathBuf>,
) -> Result<Option<PathBuf>, ConfigurationError> {
    if let Some(path) = override_path {
        return Ok(Some(path));
    }

    if let Ok(env_path) = std::env::var("RECON_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        debug!("Using config path from environment: {}", path.display());
        return Ok(Some(path));
    }

    let current_dir_config = std::env::current_dir()
        .map_err(|e| ConfigurationError::EnvironmentError {
            var: "current_dir".to_string(),
            details: e.to_string(),
        })?
        .join(DEFAULT_CONFIG_FILE);

    if current_dir_config.exists() {
        debug!(
            "Found config file in current directory: {}",
            current_dir_config.display()
        );
        return Ok(Some(current_dir_config));
    }

    let config_locations = [
        "./config/recon.yaml",
        "~/.config/recon/recon.yaml",
        "/etc/recon/recon.yaml",
    ];

    for location in &config_locations {
        let path = expand_path(location)?;
        if path.exists() {
            debug!("Found config file at: {}", path.display());
            return Ok(Some(path));
        }
    }

    debug!("No configuration file found, using defaults");
    Ok(None)
}

/// Add a file provider to the figment based on file extension
fn add_file_provider(figment: Figment, path: &Path) -> Result<Figment, ConfigurationError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("yaml");

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
        _ => Err(ConfigurationError::InvalidValue {
            key: "config_path".to_string(),
            value: path.display().to_string(),
            reason: format!(
                "Unsupported configuration file format: {extension} (supported: yaml, yml)"
            ),
        }),
    }
}

/// Expand a leading tilde in a path
fn expand_path(path: &str) -> Result<PathBuf, ConfigurationError> {
    let expanded = if path.starts_with('~') {
        if let Ok(home) = std::env::var("HOME") {
            path.replacen('~', &home, 1)
        } else {
            return Err(ConfigurationError::EnvironmentError {
                var: "HOME".to_string(),
                details: "HOME environment variable not set".to_string(),
            });
        }
    } else {
        path.to_string()
    };

    Ok(PathBuf::from(expanded))
}

/// Validate that a configuration file exists and has a supported format
pub fn validate_config_file(path: &Path) -> Result<(), ConfigurationError> {
    if !path.exists() {
        return Err(ConfigurationError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(()),
        _ => Err(ConfigurationError::InvalidValue {
            key: "config_path".to_string(),
            value: path.display().to_string(),
            reason: format!(
                "Unsupported configuration file format: {extension} (supported: yaml, yml)"
            ),
        }),
    }
}

/// Classify a figment extraction error into the loader taxonomy
///
/// Figment reports the failing key path separately from the error kind, so
/// field names survive into the final error message.
fn classify_figment_error(err: figment::Error) -> ConfigurationError {
    use figment::error::Kind;

    let field = if err.path.is_empty() {
        None
    } else {
        Some(err.path.join("."))
    };

    match err.kind {
        Kind::MissingField(name) => ConfigurationError::MissingField {
            field: match field {
                Some(prefix) => format!("{prefix}.{name}"),
                None => name.to_string(),
            },
        },
        Kind::InvalidType(ref actual, ref expected) => ConfigurationError::TypeMismatch {
            field: field.unwrap_or_else(|| "<document>".to_string()),
            expected: expected.clone(),
            actual: actual.to_string(),
        },
        Kind::InvalidValue(ref actual, ref expected) => ConfigurationError::TypeMismatch {
            field: field.unwrap_or_else(|| "<document>".to_string()),
            expected: expected.clone(),
            actual: actual.to_string(),
        },
        Kind::UnknownVariant(ref value, allowed) => ConfigurationError::InvalidEnum {
            field: field.unwrap_or_else(|| "<document>".to_string()),
            value: value.clone(),
            allowed: allowed.join(", "),
        },
        _ => ConfigurationError::MalformedDocument {
            details: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::env;
    use tempfile::NamedTempFile;

    #[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
    struct TestConfig {
        pub name: String,
        pub vol_res: u32,
        pub nested: NestedConfig,
    }

    #[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
    struct NestedConfig {
        pub enabled: bool,
        pub depth: u32,
    }

    #[test]
    fn test_defaults_when_file_absent() {
        // Explicit nonexistent path keeps the discovery fallback from
        // picking up the repository's own config/recon.yaml
        let options = LoadOptions {
            config_path: Some(PathBuf::from("/non/existent/recon.yaml")),
            env_prefix: "TEST_RECON_DEFAULTS".to_string(),
            ..LoadOptions::default()
        };

        let config: TestConfig = load_config_with_options(options).unwrap();
        assert_eq!(config, TestConfig::default());
    }

    #[test]
    fn test_load_from_yaml_file() {
        env::remove_var("RECON_NAME");
        env::remove_var("RECON_VOL_RES");
        env::remove_var("RECON_NESTED__ENABLED");
        env::remove_var("RECON_NESTED__DEPTH");

        let yaml_content = r#"
name: test
vol_res: 128
nested:
  enabled: true
  depth: 8
"#;

        let mut temp_file = NamedTempFile::with_suffix(".yaml").unwrap();
        std::io::Write::write_all(&mut temp_file, yaml_content.as_bytes()).unwrap();

        let config: TestConfig = load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.name, "test");
        assert_eq!(config.vol_res, 128);
        assert!(config.nested.enabled);
        assert_eq!(config.nested.depth, 8);
    }

    #[test]
    fn test_env_var_overrides() {
        // Unique prefix so parallel tests cannot interfere
        let test_prefix = "TEST_RECON_LOADER";
        env::set_var(format!("{test_prefix}_NAME"), "env_test");
        env::set_var(format!("{test_prefix}_VOL_RES"), "512");
        env::set_var(format!("{test_prefix}_NESTED__ENABLED"), "true");
        env::set_var(format!("{test_prefix}_NESTED__DEPTH"), "12");

        let options = LoadOptions {
            config_path: Some(PathBuf::from("/non/existent/recon.yaml")),
            env_prefix: test_prefix.to_string(),
            ..LoadOptions::default()
        };

        let config: TestConfig = load_config_with_options(options).unwrap();
        assert_eq!(config.name, "env_test");
        assert_eq!(config.vol_res, 512);
        assert!(config.nested.enabled);
        assert_eq!(config.nested.depth, 12);

        env::remove_var(format!("{test_prefix}_NAME"));
        env::remove_var(format!("{test_prefix}_VOL_RES"));
        env::remove_var(format!("{test_prefix}_NESTED__ENABLED"));
        env::remove_var(format!("{test_prefix}_NESTED__DEPTH"));
    }

    #[test]
    fn test_file_not_found_when_required() {
        let non_existent_path = PathBuf::from("/non/existent/recon.yaml");
        let result: Result<TestConfig, _> = load_from_file(&non_existent_path);

        match result.unwrap_err() {
            ConfigurationError::FileNotFound { path } => {
                assert_eq!(path, "/non/existent/recon.yaml");
            }
            other => panic!("Expected FileNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_strict_mode_reports_missing_field() {
        let document = r#"
name: partial
nested:
  enabled: true
  depth: 8
"#;
        let result: Result<TestConfig, _> = from_yaml_str(document);

        match result.unwrap_err() {
            ConfigurationError::MissingField { field } => {
                assert!(field.contains("vol_res"), "unexpected field: {field}");
            }
            other => panic!("Expected MissingField error, got {other:?}"),
        }
    }

    #[test]
    fn test_type_mismatch_classification() {
        let document = r#"
name: bad
vol_res: "high"
nested:
  enabled: true
  depth: 8
"#;
        let result: Result<TestConfig, _> = from_yaml_str(document);

        match result.unwrap_err() {
            ConfigurationError::TypeMismatch { field, .. } => {
                assert!(field.contains("vol_res"), "unexpected field: {field}");
            }
            other => panic!("Expected TypeMismatch error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_document_classification() {
        let result: Result<TestConfig, _> = from_yaml_str("name: [unclosed");
        assert!(matches!(
            result.unwrap_err(),
            ConfigurationError::MalformedDocument { .. }
        ));
    }

    #[test]
    fn test_unsupported_file_extension() {
        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        std::io::Write::write_all(&mut temp_file, b"name = 'test'").unwrap();

        assert!(validate_config_file(temp_file.path()).is_err());

        let result: Result<TestConfig, _> = load_from_file(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_config_file() {
        let mut temp_file = NamedTempFile::with_suffix(".yaml").unwrap();
        std::io::Write::write_all(&mut temp_file, b"name: test").unwrap();

        assert!(validate_config_file(temp_file.path()).is_ok());

        let non_existent = PathBuf::from("/non/existent.yaml");
        assert!(validate_config_file(&non_existent).is_err());
    }

    #[test]
    fn test_expand_path() {
        if env::var("HOME").is_ok() {
            let expanded = expand_path("~/recon/recon.yaml").unwrap();
            assert!(!expanded.to_string_lossy().contains('~'));
        }

        let regular = expand_path("/etc/recon/recon.yaml").unwrap();
        assert_eq!(regular, PathBuf::from("/etc/recon/recon.yaml"));
    }
}
