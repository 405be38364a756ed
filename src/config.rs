// Application configuration loaded from the environment

use thiserror::Error;

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("JWT_SECRET must be at least 16 bytes long")]
    WeakSecret,
}

pub const MIN_SECRET_LEN: usize = 16;
/// One year
pub const MAX_JWT_TTL_MINUTES: i64 = 525_600;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Postgres connection string; the in-memory store is used when absent
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_ttl_minutes: i64,
    /// Create the default administrator on startup
    pub seed_admin: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret);
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("PORT", lookup("PORT"), 8080)?,
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            jwt_secret,
            jwt_ttl_minutes: parse_ttl(lookup("JWT_TTL_MINUTES"))?,
            seed_admin: parse_flag("SEED_ADMIN", lookup("SEED_ADMIN"))?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn jwt_ttl_seconds(&self) -> i64 {
        self.jwt_ttl_minutes.saturating_mul(60)
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

/// Token lifetime in minutes, between one minute and `MAX_JWT_TTL_MINUTES`
fn parse_ttl(value: Option<String>) -> Result<i64, ConfigError> {
    const KEY: &str = "JWT_TTL_MINUTES";

    let minutes: i64 = parse_or(KEY, value, 60)?;
    if !(1..=MAX_JWT_TTL_MINUTES).contains(&minutes) {
        return Err(ConfigError::Invalid {
            key: KEY,
            value: minutes.to_string(),
        });
    }
    Ok(minutes)
}

fn parse_flag(key: &'static str, value: Option<String>) -> Result<bool, ConfigError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Ok(false),
        Some(v) => Err(ConfigError::Invalid {
            key,
            value: v.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("JWT_SECRET", "a-long-enough-secret")]).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.database_url, None);
        assert_eq!(config.jwt_ttl_seconds(), 3600);
        assert!(!config.seed_admin);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("JWT_SECRET", "a-long-enough-secret"),
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("DATABASE_URL", "postgres://localhost/users"),
            ("JWT_TTL_MINUTES", "15"),
            ("SEED_ADMIN", "true"),
        ])
        .unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/users"));
        assert_eq!(config.jwt_ttl_seconds(), 900);
        assert!(config.seed_admin);
    }

    #[test]
    fn test_missing_secret() {
        assert!(matches!(config_from(&[]), Err(ConfigError::Missing("JWT_SECRET"))));
    }

    #[test]
    fn test_short_secret() {
        assert!(matches!(
            config_from(&[("JWT_SECRET", "short")]),
            Err(ConfigError::WeakSecret)
        ));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[("JWT_SECRET", "a-long-enough-secret"), ("PORT", "eighty")]),
            Err(ConfigError::Invalid { key: "PORT", .. })
        ));
        assert!(matches!(
            config_from(&[("JWT_SECRET", "a-long-enough-secret"), ("SEED_ADMIN", "maybe")]),
            Err(ConfigError::Invalid { key: "SEED_ADMIN", .. })
        ));

        for ttl in ["0", "-15", "525601", "9223372036854775807", "soon"] {
            assert!(
                matches!(
                    config_from(&[("JWT_SECRET", "a-long-enough-secret"), ("JWT_TTL_MINUTES", ttl)]),
                    Err(ConfigError::Invalid { key: "JWT_TTL_MINUTES", .. })
                ),
                "accepted JWT_TTL_MINUTES={}",
                ttl
            );
        }
    }

    #[test]
    fn test_ttl_upper_bound_is_accepted() {
        let config = config_from(&[
            ("JWT_SECRET", "a-long-enough-secret"),
            ("JWT_TTL_MINUTES", "525600"),
        ])
        .unwrap();
        assert_eq!(config.jwt_ttl_seconds(), 31_536_000);
    }
}
