//! Application configuration module
//!
//! Builds the settings record from the environment and holds it for the
//! lifetime of the process.

pub mod checks;
mod constants;
pub mod database;
pub mod env;
pub mod global;
pub mod hosts;
mod profile;
mod secret;
mod settings;

pub use checks::{has_errors, run_deploy_checks, CheckMessage, Level};
pub use constants::*;
pub use database::{Backend, DatabaseConfig, Databases};
pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use hosts::AllowedHosts;
pub use profile::Profile;
pub use secret::{SecretKey, SecretWeakness};
pub use settings::{load_dotenv, Settings};

#[cfg(any(test, feature = "test-utils"))]
pub use env::MockEnvSource;
