//! Storefront settings
//!
//! Deployment configuration for the storefront service. Settings are read
//! once from the environment, validated, and held for the lifetime of the
//! process.
//!
//! # Layers
//!
//! - **config**: environment loading, profiles, database descriptors, allowed hosts
//! - **infra**: database connectivity
//! - **cli**: command-line interface
//! - **commands**: CLI command implementations
//! - **errors**: centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Validate production settings, including the database connection
//! STOREFRONT_PROFILE=production storefront check --deploy --database
//!
//! # Print the effective settings with secrets redacted
//! storefront show --format json
//!
//! # Test a host header against the allowed hosts
//! storefront host shop.example.com:443
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod infra;

// Re-export commonly used types at crate root
pub use config::{AllowedHosts, DatabaseConfig, Profile, SecretKey, Settings};
pub use errors::{AppError, AppResult};
