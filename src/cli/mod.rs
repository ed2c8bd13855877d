//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `check` - Validate settings, optionally the database connection
//! - `show` - Print the effective settings
//! - `host` - Test a host against the allowed hosts

pub mod args;

pub use args::{Cli, Commands, OutputFormat};
