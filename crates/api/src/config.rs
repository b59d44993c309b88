use std::str::FromStr;

use sv_mail::{MailConfig, MailError};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// Defaults target local development; production overrides them through the
/// environment (or a `.env` file picked up by `dotenvy`).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins, from the comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub database_url: String,
    pub database_max_connections: u32,
    /// Front-end origin used to build links in outgoing email.
    pub app_base_url: String,
    pub jwt: JwtConfig,
    pub mail: MailConfig,
}

/// A configuration value that is missing or does not parse.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has invalid value '{value}'")]
    Invalid { key: &'static str, value: String },

    #[error(transparent)]
    Mail(#[from] MailError),
}

impl ServerConfig {
    /// Load from the process environment.
    ///
    /// # Panics
    ///
    /// Panics on any [`ConfigError`]. Startup stops on misconfiguration.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
            .unwrap_or_else(|e| panic!("Invalid configuration: {e}"))
    }

    /// Build the configuration from `lookup`, applying defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `DATABASE_URL`             | required                   |
    /// | `DATABASE_MAX_CONNECTIONS` | `20`                       |
    /// | `APP_BASE_URL`             | `http://localhost:5173`    |
    ///
    /// JWT and mail settings come from [`JwtConfig::from_lookup`] and
    /// [`MailConfig::from_lookup`] over the same source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let frontend = lookup("APP_BASE_URL").unwrap_or_else(|| DEFAULT_FRONTEND.to_string());

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 3000)?,
            cors_origins: parse_origins(
                &lookup("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_FRONTEND.to_string()),
            ),
            request_timeout_secs: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?,
            database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 20)?,
            app_base_url: frontend.trim_end_matches('/').to_string(),
            jwt: JwtConfig::from_lookup(&lookup)?,
            mail: MailConfig::from_lookup(&lookup)?,
        })
    }

    /// Link to a bill in the front end.
    pub fn bill_url(&self, bill_id: sv_core::types::DbId) -> String {
        format!("{}/bills/{bill_id}", self.app_base_url)
    }
}

const DEFAULT_FRONTEND: &str = "http://localhost:5173";

/// Parse `key` when present, otherwise fall back to `default`.
pub(crate) fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_split_and_trimmed() {
        assert_eq!(
            parse_origins("http://a.test, http://b.test ,,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn empty_origin_list() {
        assert!(parse_origins("").is_empty());
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let owned: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| owned.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    #[test]
    fn defaults_apply_with_required_values_present() {
        let config = ServerConfig::from_lookup(env(&[
            ("DATABASE_URL", "postgres://localhost/shareease"),
            ("JWT_SECRET", "secret"),
            ("APP_BASE_URL", "https://app.example.com/"),
        ]))
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.cors_origins, vec![DEFAULT_FRONTEND.to_string()]);
        assert_eq!(config.bill_url(9), "https://app.example.com/bills/9");
    }

    #[test]
    fn missing_database_url_is_reported() {
        let err = ServerConfig::from_lookup(env(&[("JWT_SECRET", "secret")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn unparseable_port_is_reported() {
        let err = ServerConfig::from_lookup(env(&[
            ("DATABASE_URL", "postgres://localhost/shareease"),
            ("JWT_SECRET", "secret"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }
}
