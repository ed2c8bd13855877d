//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Storefront settings - inspect and validate deployment configuration
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Environment file applied before reading variables
    #[arg(long, global = true, env = "STOREFRONT_ENV_FILE")]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate the settings
    Check(CheckArgs),

    /// Print the effective settings with secrets redacted
    Show(ShowArgs),

    /// Test a host name against the allowed hosts
    Host(HostArgs),
}

/// Output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Run deployment checks
    #[arg(long)]
    pub deploy: bool,

    /// Connect to the default database and run a query
    #[arg(long)]
    pub database: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the show command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the host command
#[derive(Parser, Debug)]
pub struct HostArgs {
    /// Host header value, e.g. `shop.example.com:443`
    pub host: String,
}
