//! # recon-config
//!
//! Typed configuration loading for the recon clothed-human reconstruction
//! pipeline. The pipeline itself (normal prediction, implicit-function
//! refinement, bilateral normal integration, Poisson fusion) lives outside
//! this crate; everything it can be tuned with lives here.
//!
//! ## Key Features
//! - Typed schema for the full document, including the BNI parameter block
//! - Layered loading: compiled defaults, YAML document, `RECON_*` overrides
//! - Load-time validation with a precise error taxonomy
//! - Relative checkpoint/result paths resolved against a configurable root
//!
//! ## Design Principles
//! - The document is parsed once at process start and held immutably
//! - Every problem surfaces at load time, never mid-run
//! - Strong typing with validation logic
//! - Serde support for YAML and JSON round-trips

pub mod config;
pub mod error;

// Re-export commonly used types at the crate root for convenience
pub use config::*;
pub use error::*;

/// Version of the recon-config crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
