//! Application settings loaded from environment variables.
//!
//! Every profile starts from the same common settings; production then
//! tightens them: debug is forced off, `SECRET_KEY` and `DATABASE_URL` become
//! mandatory, TLS is required on the database and the allowed hosts default
//! to the deployed host name.

use std::path::Path;

use serde::{Serialize, Serializer};

use super::constants::{
    ALLOWED_HOSTS_ENV, DATABASE_CONN_MAX_AGE_ENV, DATABASE_MAX_CONNECTIONS_ENV,
    DATABASE_MIN_CONNECTIONS_ENV, DATABASE_SSL_REQUIRE_ENV, DATABASE_URL_ENV, DEBUG_ENV,
    DEFAULT_DATABASE_URL, DEFAULT_LOG_LEVEL, DEFAULT_MAX_CONNECTIONS, DEFAULT_MIN_CONNECTIONS,
    DEV_SECRET_KEY, LOG_LEVEL_ENV, PRODUCTION_ALLOWED_HOSTS, PROFILE_ENV, REDACTED,
    SECRET_KEY_ENV,
};
use super::database::{Backend, DatabaseConfig, Databases};
use super::env::{self, EnvSource, ProcessEnv};
use super::hosts::AllowedHosts;
use super::profile::Profile;
use super::secret::SecretKey;
use crate::errors::{AppError, AppResult};

/// Process-wide configuration record.
#[derive(Clone, Serialize)]
pub struct Settings {
    pub profile: Profile,
    pub debug: bool,
    #[serde(serialize_with = "serialize_redacted")]
    secret_key: SecretKey,
    pub databases: Databases,
    pub allowed_hosts: AllowedHosts,
    pub log_level: String,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("profile", &self.profile)
            .field("debug", &self.debug)
            .field("secret_key", &REDACTED)
            .field("databases", &self.databases)
            .field("allowed_hosts", &self.allowed_hosts)
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn serialize_redacted<S: Serializer>(_: &SecretKey, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(REDACTED)
}

/// Profile-specific values layered over the common settings
struct Overrides {
    profile: Profile,
    debug: bool,
    secret_key: SecretKey,
    database_url: String,
    ssl_require: bool,
    default_hosts: &'static [&'static str],
}

impl Settings {
    /// Load settings from the process environment, after applying `.env`.
    ///
    /// # Errors
    /// Fails on the first missing or malformed variable.
    pub fn from_env() -> AppResult<Self> {
        load_dotenv(None)?;
        Self::from_source(&ProcessEnv)
    }

    /// Build settings from any environment source.
    pub fn from_source(source: &dyn EnvSource) -> AppResult<Self> {
        let profile = env::optional(source, PROFILE_ENV)
            .map(|p| p.parse::<Profile>())
            .transpose()?
            .unwrap_or_default();

        let overrides = match profile {
            Profile::Development => Self::development(source)?,
            Profile::Production => Self::production(source)?,
        };
        let settings = Self::common(source, overrides)?;

        tracing::debug!(
            profile = %settings.profile,
            debug = settings.debug,
            allowed_hosts = settings.allowed_hosts.len(),
            database = %settings.database().redacted_url(),
            "Settings loaded"
        );

        Ok(settings)
    }

    fn development(source: &dyn EnvSource) -> AppResult<Overrides> {
        let secret_key = match env::verbatim(source, SECRET_KEY_ENV) {
            Some(value) => SecretKey::new(value),
            None => {
                tracing::warn!("SECRET_KEY not set, using insecure default for development");
                SecretKey::new(DEV_SECRET_KEY)
            }
        };

        Ok(Overrides {
            profile: Profile::Development,
            debug: env::optional_bool(source, DEBUG_ENV)?.unwrap_or(true),
            secret_key,
            database_url: env::optional(source, DATABASE_URL_ENV)
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            ssl_require: env::optional_bool(source, DATABASE_SSL_REQUIRE_ENV)?.unwrap_or(false),
            default_hosts: &[],
        })
    }

    fn production(source: &dyn EnvSource) -> AppResult<Overrides> {
        if let Some(value) = env::optional(source, DEBUG_ENV) {
            if env::parse_bool(DEBUG_ENV, &value).unwrap_or(true) {
                tracing::warn!(value = %value, "DEBUG is ignored in production");
            }
        }

        Ok(Overrides {
            profile: Profile::Production,
            debug: false,
            secret_key: SecretKey::new(env::require(source, SECRET_KEY_ENV)?),
            database_url: env::require(source, DATABASE_URL_ENV)?,
            ssl_require: env::optional_bool(source, DATABASE_SSL_REQUIRE_ENV)?.unwrap_or(true),
            default_hosts: PRODUCTION_ALLOWED_HOSTS,
        })
    }

    fn common(source: &dyn EnvSource, overrides: Overrides) -> AppResult<Self> {
        let max_connections = env::optional_parsed::<u32>(source, DATABASE_MAX_CONNECTIONS_ENV)?
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        let min_connections = env::optional_parsed::<u32>(source, DATABASE_MIN_CONNECTIONS_ENV)?
            .unwrap_or(DEFAULT_MIN_CONNECTIONS);

        let mut database = DatabaseConfig::parse(&overrides.database_url)?
            .with_pool(max_connections, min_connections)
            .map_err(|e| AppError::invalid_env(DATABASE_MAX_CONNECTIONS_ENV, e.to_string()))?;

        if let Some(age) = env::optional_parsed::<u64>(source, DATABASE_CONN_MAX_AGE_ENV)? {
            database = database.with_conn_max_age(Some(age));
        }
        if overrides.ssl_require && database.engine != Backend::Sqlite {
            database = database.with_ssl_require()?;
        }

        let allowed_hosts = match env::optional(source, ALLOWED_HOSTS_ENV) {
            Some(value) => AllowedHosts::from_csv(&value),
            None => AllowedHosts::new(overrides.default_hosts.iter()),
        };

        Ok(Self {
            profile: overrides.profile,
            debug: overrides.debug,
            secret_key: overrides.secret_key,
            databases: Databases::new(database),
            allowed_hosts,
            log_level: env::optional(source, LOG_LEVEL_ENV)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    /// The `default` database.
    pub fn database(&self) -> &DatabaseConfig {
        self.databases.default()
    }

    /// Host list as enforced, including the debug fallback.
    pub fn effective_allowed_hosts(&self) -> AllowedHosts {
        self.allowed_hosts.effective(self.debug)
    }

    pub fn is_host_allowed(&self, host: &str) -> bool {
        self.effective_allowed_hosts().is_allowed(host)
    }

    /// Tracing filter directive; `verbose` wins over `RUST_LOG`.
    pub fn log_filter(&self, verbose: bool) -> &str {
        if verbose {
            "debug"
        } else {
            &self.log_level
        }
    }
}

/// Apply a dotenv file to the process environment.
///
/// Without a path, a missing `.env` is ignored; an explicit path must exist.
pub fn load_dotenv(path: Option<&Path>) -> AppResult<()> {
    match path {
        Some(path) => {
            dotenvy::from_path(path).map_err(|e| {
                AppError::internal(format!("failed to load {}: {}", path.display(), e))
            })?;
            tracing::debug!(path = %path.display(), "Environment file loaded");
        }
        None => {
            if let Ok(path) = dotenvy::dotenv() {
                tracing::debug!(path = %path.display(), "Environment file loaded");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapEnv;

    const PROD_URL: &str = "postgres://shop:pw@db.example.com/storefront";

    fn production_env() -> MapEnv {
        MapEnv::new()
            .with(PROFILE_ENV, "production")
            .with(SECRET_KEY_ENV, "x".repeat(60))
            .with(DATABASE_URL_ENV, PROD_URL)
    }

    #[test]
    fn test_development_defaults() {
        let settings = Settings::from_source(&MapEnv::new()).unwrap();

        assert_eq!(settings.profile, Profile::Development);
        assert!(settings.debug);
        assert_eq!(settings.secret_key().expose(), DEV_SECRET_KEY);
        assert_eq!(settings.database().host.as_deref(), Some("localhost"));
        assert!(settings.allowed_hosts.is_empty());
        assert!(settings.is_host_allowed("localhost:8000"));
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_log_filter_from_env() {
        let env = MapEnv::new().with(LOG_LEVEL_ENV, "storefront=trace,sea_orm=warn");
        let settings = Settings::from_source(&env).unwrap();

        assert_eq!(settings.log_filter(false), "storefront=trace,sea_orm=warn");
        assert_eq!(settings.log_filter(true), "debug");
    }

    #[test]
    fn test_development_debug_override() {
        let env = MapEnv::new().with(DEBUG_ENV, "false");
        let settings = Settings::from_source(&env).unwrap();
        assert!(!settings.debug);
        assert!(!settings.is_host_allowed("localhost"));
    }

    #[test]
    fn test_production_requires_secret_key() {
        let env = MapEnv::new()
            .with(PROFILE_ENV, "production")
            .with(DATABASE_URL_ENV, PROD_URL);

        let err = Settings::from_source(&env).unwrap_err();
        assert!(matches!(err, AppError::MissingEnv(ref k) if k == SECRET_KEY_ENV));
    }

    #[test]
    fn test_production_requires_database_url() {
        let env = MapEnv::new()
            .with(PROFILE_ENV, "prod")
            .with(SECRET_KEY_ENV, "x".repeat(60));

        let err = Settings::from_source(&env).unwrap_err();
        assert!(matches!(err, AppError::MissingEnv(ref k) if k == DATABASE_URL_ENV));
    }

    #[test]
    fn test_production_forces_debug_off() {
        let settings = Settings::from_source(&production_env().with(DEBUG_ENV, "true")).unwrap();
        assert!(!settings.debug);
    }

    #[test]
    fn test_production_requires_tls_by_default() {
        let settings = Settings::from_source(&production_env()).unwrap();
        assert!(settings.database().ssl_enforced());

        let opted_out =
            Settings::from_source(&production_env().with(DATABASE_SSL_REQUIRE_ENV, "false"))
                .unwrap();
        assert!(!opted_out.database().ssl_enforced());
    }

    #[test]
    fn test_production_keeps_stronger_tls_mode() {
        let env = production_env().with(
            DATABASE_URL_ENV,
            "postgres://u:p@db.example.com/shop?sslmode=verify-full",
        );
        let settings = Settings::from_source(&env).unwrap();

        assert!(settings.database().ssl_enforced());
        assert_eq!(
            settings.database().options.get("sslmode").map(String::as_str),
            Some("verify-full")
        );
    }

    #[test]
    fn test_secret_key_is_not_trimmed() {
        let padded = format!(" {} ", "k".repeat(60));

        let production =
            Settings::from_source(&production_env().with(SECRET_KEY_ENV, padded.clone())).unwrap();
        assert_eq!(production.secret_key().expose(), padded);

        let development =
            Settings::from_source(&MapEnv::new().with(SECRET_KEY_ENV, padded.clone())).unwrap();
        assert_eq!(development.secret_key().expose(), padded);

        let blank = MapEnv::new()
            .with(PROFILE_ENV, "production")
            .with(SECRET_KEY_ENV, "   ")
            .with(DATABASE_URL_ENV, PROD_URL);
        assert!(matches!(
            Settings::from_source(&blank).unwrap_err(),
            AppError::MissingEnv(ref k) if k == SECRET_KEY_ENV
        ));
    }

    #[test]
    fn test_production_allowed_hosts() {
        let settings = Settings::from_source(&production_env()).unwrap();
        assert_eq!(
            settings.allowed_hosts.patterns(),
            &["storefront3-wsl2.onrender.com".to_string()]
        );

        let custom =
            Settings::from_source(&production_env().with(ALLOWED_HOSTS_ENV, "shop.example.com"))
                .unwrap();
        assert!(custom.is_host_allowed("shop.example.com"));
        assert!(!custom.is_host_allowed("storefront3-wsl2.onrender.com"));
    }

    #[test]
    fn test_pool_and_lifetime_from_env() {
        let env = production_env()
            .with(DATABASE_MAX_CONNECTIONS_ENV, "20")
            .with(DATABASE_MIN_CONNECTIONS_ENV, "4")
            .with(DATABASE_CONN_MAX_AGE_ENV, "300");
        let settings = Settings::from_source(&env).unwrap();

        assert_eq!(settings.database().max_connections, 20);
        assert_eq!(settings.database().min_connections, 4);
        assert_eq!(settings.database().conn_max_age, Some(300));
    }

    #[test]
    fn test_invalid_pool_bounds_name_variable() {
        let env = production_env()
            .with(DATABASE_MAX_CONNECTIONS_ENV, "2")
            .with(DATABASE_MIN_CONNECTIONS_ENV, "5");
        let err = Settings::from_source(&env).unwrap_err();
        assert!(matches!(err, AppError::InvalidEnv { ref name, .. } if name == DATABASE_MAX_CONNECTIONS_ENV));
    }

    #[test]
    fn test_malformed_database_url_fails() {
        let env = production_env().with(DATABASE_URL_ENV, "postgres://u:p@host:notaport/db");
        let err = Settings::from_source(&env).unwrap_err();
        assert!(matches!(err, AppError::InvalidDatabaseUrl(_)));
    }

    #[test]
    fn test_secrets_redacted_in_output() {
        let settings = Settings::from_source(&production_env()).unwrap();
        let secret = "x".repeat(60);

        let debug = format!("{:?}", settings);
        assert!(!debug.contains(&secret));
        assert!(!debug.contains("pw@"));

        let json = serde_json::to_string(&settings).unwrap();
        assert!(!json.contains(&secret));
        assert!(json.contains("\"secret_key\":\"[REDACTED]\""));
        assert!(json.contains("\"profile\":\"production\""));
    }
}
