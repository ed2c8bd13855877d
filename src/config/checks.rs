//! Deployment checks.
//!
//! Inspects loaded settings for values that are legal but unsafe to serve
//! traffic with.

use serde::Serialize;

use super::database::Backend;
use super::settings::Settings;

/// Severity of a check message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Warning,
    Error,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Warning => f.write_str("WARNING"),
            Level::Error => f.write_str("ERROR"),
        }
    }
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckMessage {
    pub id: &'static str,
    pub level: Level,
    pub message: String,
}

impl std::fmt::Display for CheckMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.id, self.level, self.message)
    }
}

pub const WEAK_SECRET_KEY: &str = "settings.E001";
pub const DEBUG_ENABLED: &str = "settings.W002";
pub const NO_ALLOWED_HOSTS: &str = "settings.E003";
pub const DATABASE_WITHOUT_TLS: &str = "settings.W004";
pub const WILDCARD_HOST: &str = "settings.W005";

/// Run every deployment check against `settings`.
pub fn run_deploy_checks(settings: &Settings) -> Vec<CheckMessage> {
    let mut messages = Vec::new();

    let weaknesses = settings.secret_key().weaknesses();
    if !weaknesses.is_empty() {
        let reasons = weaknesses
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        messages.push(CheckMessage {
            id: WEAK_SECRET_KEY,
            level: if settings.profile.is_production() {
                Level::Error
            } else {
                Level::Warning
            },
            message: format!("SECRET_KEY is weak: {}", reasons),
        });
    }

    if settings.debug {
        messages.push(CheckMessage {
            id: DEBUG_ENABLED,
            level: Level::Warning,
            message: "DEBUG is enabled; error pages expose internals".to_string(),
        });
    }

    if !settings.debug && settings.allowed_hosts.is_empty() {
        messages.push(CheckMessage {
            id: NO_ALLOWED_HOSTS,
            level: Level::Error,
            message: "ALLOWED_HOSTS is empty while DEBUG is off; every request would be rejected"
                .to_string(),
        });
    }

    if settings.allowed_hosts.contains_wildcard() {
        messages.push(CheckMessage {
            id: WILDCARD_HOST,
            level: Level::Warning,
            message: "ALLOWED_HOSTS contains '*'; host header validation is disabled".to_string(),
        });
    }

    for (alias, database) in settings.databases.iter() {
        if database.engine == Backend::Postgres && !database.ssl_enforced() {
            messages.push(CheckMessage {
                id: DATABASE_WITHOUT_TLS,
                level: Level::Warning,
                message: format!(
                    "database '{}' does not require TLS (set sslmode=require)",
                    alias
                ),
            });
        }
    }

    tracing::debug!(findings = messages.len(), "Deployment checks completed");
    messages
}

pub fn has_errors(messages: &[CheckMessage]) -> bool {
    messages.iter().any(|m| m.level == Level::Error)
}
