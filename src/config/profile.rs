//! Settings profiles.

use std::str::FromStr;

use serde::Serialize;

use super::constants::PROFILE_ENV;
use crate::errors::AppError;

/// Deployment profile the settings are built for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Development,
    Production,
}

impl Profile {
    pub fn is_production(&self) -> bool {
        matches!(self, Profile::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Development => "development",
            Profile::Production => "production",
        }
    }
}

impl FromStr for Profile {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Profile::Development),
            "prod" | "production" => Ok(Profile::Production),
            other => Err(AppError::invalid_env(
                PROFILE_ENV,
                format!("unknown profile '{}'", other),
            )),
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_aliases() {
        assert_eq!("prod".parse::<Profile>().unwrap(), Profile::Production);
        assert_eq!("Production".parse::<Profile>().unwrap(), Profile::Production);
        assert_eq!("dev".parse::<Profile>().unwrap(), Profile::Development);
        assert_eq!(Profile::default(), Profile::Development);
    }

    #[test]
    fn test_unknown_profile() {
        let err = "staging".parse::<Profile>().unwrap_err();
        assert!(matches!(err, AppError::InvalidEnv { ref name, .. } if name == PROFILE_ENV));
    }
}
