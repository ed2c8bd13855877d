//! Environment lookups.
//!
//! Settings never read `std::env` directly: they go through [`EnvSource`], so
//! the same loading code runs against the process environment and against an
//! in-memory map in tests.

use std::collections::HashMap;

use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A read-only view of environment variables.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait EnvSource {
    /// Raw value of `key`, `None` when unset.
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        // Non-UTF-8 values are treated as unset
        std::env::var(key).ok()
    }
}

/// In-memory environment.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Trimmed value of `key`, `None` when unset or blank.
pub fn optional(source: &dyn EnvSource, key: &str) -> Option<String> {
    source
        .var(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Untrimmed value of `key`, `None` when unset or blank.
pub fn verbatim(source: &dyn EnvSource, key: &str) -> Option<String> {
    source.var(key).filter(|v| !v.trim().is_empty())
}

/// Value of `key` exactly as set, failing fast when it is unset or blank.
pub fn require(source: &dyn EnvSource, key: &str) -> AppResult<String> {
    verbatim(source, key).ok_or_else(|| AppError::missing_env(key))
}

/// Parse a boolean flag the way operators usually write them.
pub fn parse_bool(key: &str, value: &str) -> AppResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::invalid_env(
            key,
            format!("expected a boolean, got '{}'", other),
        )),
    }
}

/// Optional boolean variable.
pub fn optional_bool(source: &dyn EnvSource, key: &str) -> AppResult<Option<bool>> {
    optional(source, key)
        .map(|v| parse_bool(key, &v))
        .transpose()
}

/// Optional variable parsed with `FromStr`.
pub fn optional_parsed<T>(source: &dyn EnvSource, key: &str) -> AppResult<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    optional(source, key)
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| AppError::invalid_env(key, format!("'{}': {}", v, e)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_present() {
        let env = MapEnv::new().with("SECRET_KEY", "  abc  ");
        assert_eq!(require(&env, "SECRET_KEY").unwrap(), "  abc  ");
        assert_eq!(optional(&env, "SECRET_KEY").as_deref(), Some("abc"));
    }

    #[test]
    fn test_require_missing_and_blank() {
        let env = MapEnv::new().with("BLANK", "   ");

        let missing = require(&env, "SECRET_KEY").unwrap_err();
        assert!(matches!(missing, AppError::MissingEnv(ref k) if k == "SECRET_KEY"));

        let blank = require(&env, "BLANK").unwrap_err();
        assert!(matches!(blank, AppError::MissingEnv(ref k) if k == "BLANK"));
    }

    #[test]
    fn test_map_env_from_pairs() {
        let env: MapEnv = [("DEBUG", "0"), ("ALLOWED_HOSTS", "")].into_iter().collect();
        assert_eq!(env.var("DEBUG").as_deref(), Some("0"));
        assert_eq!(env.var("ALLOWED_HOSTS").as_deref(), Some(""));
        assert_eq!(optional(&env, "ALLOWED_HOSTS"), None);
        assert_eq!(env.var("SECRET_KEY"), None);
    }

    #[test]
    fn test_parse_bool_variants() {
        for v in ["1", "true", "YES", "On"] {
            assert!(parse_bool("DEBUG", v).unwrap());
        }
        for v in ["0", "False", "no", "OFF"] {
            assert!(!parse_bool("DEBUG", v).unwrap());
        }
        assert!(matches!(
            parse_bool("DEBUG", "maybe"),
            Err(AppError::InvalidEnv { .. })
        ));
    }

    #[test]
    fn test_optional_parsed_reports_variable() {
        let env = MapEnv::new().with("DATABASE_CONN_MAX_AGE", "ten");
        let err = optional_parsed::<u64>(&env, "DATABASE_CONN_MAX_AGE").unwrap_err();
        match err {
            AppError::InvalidEnv { name, .. } => assert_eq!(name, "DATABASE_CONN_MAX_AGE"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_mock_source_is_consulted_once() {
        let mut mock = MockEnvSource::new();
        mock.expect_var()
            .withf(|key| key == "SECRET_KEY")
            .times(1)
            .returning(|_| Some("value".to_string()));

        assert_eq!(require(&mock, "SECRET_KEY").unwrap(), "value");
    }
}
