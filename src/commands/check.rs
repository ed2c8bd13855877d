//! Check command - Validates the loaded settings.

use serde::Serialize;

use crate::cli::args::{CheckArgs, OutputFormat};
use crate::config::{has_errors, run_deploy_checks, CheckMessage, Level, Settings};
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Outcome of a check run
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub profile: &'static str,
    pub messages: Vec<CheckMessage>,
    /// `None` when the database was not probed
    pub database_reachable: Option<bool>,
}

impl CheckReport {
    /// Number of findings that fail the run
    pub fn failures(&self) -> usize {
        let errors = self
            .messages
            .iter()
            .filter(|m| m.level == Level::Error)
            .count();
        errors + usize::from(self.database_reachable == Some(false))
    }

    pub fn render(&self, format: OutputFormat) -> AppResult<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Text => {
                let mut lines: Vec<String> = self.messages.iter().map(ToString::to_string).collect();
                match self.database_reachable {
                    Some(true) => lines.push("database: reachable".to_string()),
                    Some(false) => lines.push("database: unreachable".to_string()),
                    None => {}
                }
                if self.messages.is_empty() {
                    lines.push(format!(
                        "System check identified no issues ({} profile).",
                        self.profile
                    ));
                } else {
                    lines.push(format!(
                        "System check identified {} issue(s) ({} profile).",
                        self.messages.len(),
                        self.profile
                    ));
                }
                Ok(lines.join("\n"))
            }
        }
    }
}

/// Execute the check command
pub async fn execute(args: CheckArgs, settings: &Settings) -> AppResult<()> {
    tracing::info!("Checking settings...");

    let messages = if args.deploy {
        run_deploy_checks(settings)
    } else {
        Vec::new()
    };
    if has_errors(&messages) {
        tracing::warn!("Deployment checks reported errors");
    }

    let database_reachable = if args.database {
        Some(probe_database(settings).await)
    } else {
        None
    };

    let report = CheckReport {
        profile: settings.profile.as_str(),
        messages,
        database_reachable,
    };
    println!("{}", report.render(args.format)?);

    match report.failures() {
        0 => Ok(()),
        n => Err(AppError::ChecksFailed(n)),
    }
}

async fn probe_database(settings: &Settings) -> bool {
    let db = match Database::connect(settings.database()).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Database connection failed: {}", e);
            return false;
        }
    };

    let reachable = match db.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Database ping failed: {}", e);
            false
        }
    };
    if let Err(e) = db.close().await {
        tracing::warn!("Failed to close database connection: {}", e);
    }
    reachable
}
