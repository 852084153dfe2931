//! # SigTAK Core
//!
//! Configuration and error handling shared by the SigTAK gateway crates.
//!
//! - **Configuration**: YAML files loaded through the `config` crate with
//!   `SIGTAK__`-prefixed environment variable overrides and validation.
//! - **Errors**: `thiserror` types for configuration failures.

pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::ConfigError;
