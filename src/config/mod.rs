//! Configuration system for the reconstruction pipeline
//!
//! - `types` - the typed document schema and compiled defaults
//! - `loader` - layered figment loading (defaults, YAML file, environment)
//! - `validation` - range and consistency checks

pub mod loader;
pub mod types;
pub mod validation;

// Re-exports for convenience
pub use loader::{
    load_config, load_config_with_options, load_from_file, validate_config_file, LoadOptions,
};
pub use types::*;
pub use validation::ConfigValidation;
