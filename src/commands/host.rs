//! Host command - Tests a host against the allowed hosts.

use crate::cli::args::HostArgs;
use crate::config::Settings;
use crate::errors::{AppError, AppResult};

/// Execute the host command
pub fn execute(args: HostArgs, settings: &Settings) -> AppResult<()> {
    if settings.is_host_allowed(&args.host) {
        println!("{}: allowed", args.host);
        Ok(())
    } else {
        println!("{}: rejected", args.host);
        Err(AppError::HostNotAllowed(args.host))
    }
}
