//! Typed configuration for Phont services.
//!
//! This crate provides a strongly-typed configuration system with support for:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Overview
//!
//! [`PhontConfig`] groups the settings of every runtime piece, and each
//! section converts into the object it configures:
//!
//! - [`DispatchConfig`] - Correlation id header of the controller dispatcher
//! - [`ResponseConfig`] - Envelope preset, timestamp and default headers
//!   (builds a `ResponseBuilder`)
//! - [`SanitizerConfig`] - Redaction text and extra sensitive keys
//!   (builds a `SensitiveDataSanitizer`)
//! - [`LoggingConfig`] / [`MetricsConfig`] - Telemetry setup
//!
//! # Example
//!
//! ```no_run
//! use phont_config::ConfigLoader;
//!
//! # fn main() -> Result<(), phont_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_file("phont.toml")?
//!     .with_env_prefix("PHONT")
//!     .load()?;
//!
//! println!("{} uses {}", config.service.name, config.dispatch.request_id_header);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [service]
//! name = "auth-api"
//! environment = "production"
//! port = 8080
//!
//! [dispatch]
//! request_id_header = "x-request-id"
//!
//! [response]
//! preset = "default"
//! timestamp_key = "timestamp"
//!
//! [response.default_headers]
//! X-Service = "auth-api"
//!
//! [sanitizer]
//! redaction_text = "[REDACTED]"
//! additional_sensitive_fields = ["phone", "ssn"]
//!
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [metrics]
//! enabled = true
//! addr = "0.0.0.0:9090"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden via environment variables using the format
//! `PREFIX__SECTION__KEY`. For example:
//!
//! - `PHONT__SERVICE__PORT=9000`
//! - `PHONT__RESPONSE__INCLUDE_TIMESTAMP=false`
//! - `PHONT__LOGGING__LEVEL=debug`

#![doc(html_root_url = "https://docs.rs/phont-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::*;
pub use error::ConfigError;
pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
pub use schema::*;
