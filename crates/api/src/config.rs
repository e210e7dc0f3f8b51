//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;

use thiserror::Error;

use shelfmate_auth::{AuthConfig, AuthConfigError, HashParams};

const DEV_SECRET: &str = "dev-secret";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set outside development")]
    Missing(&'static str),

    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Auth(#[from] AuthConfigError),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Deployment environment name (`development`, `production`, ...).
    pub env: String,
    pub bind_addr: SocketAddr,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = lookup("APP_ENV").unwrap_or_else(|| "development".to_string());

        let secret = match lookup("JWT_SECRET") {
            Some(secret) => secret,
            None if env == "development" => {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                DEV_SECRET.to_string()
            }
            None => return Err(ConfigError::Missing("JWT_SECRET")),
        };
        let algorithm = lookup("JWT_ALGORITHM").unwrap_or_else(|| "HS256".to_string());
        let ttl_minutes = parse_or(&lookup, "ACCESS_TOKEN_EXPIRE_MINUTES", 30i64)?;

        let defaults = HashParams::default();
        let hashing = HashParams {
            memory_kib: parse_or(&lookup, "ARGON2_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or(&lookup, "ARGON2_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or(&lookup, "ARGON2_PARALLELISM", defaults.parallelism)?,
        };

        let bind_addr = parse_or(
            &lookup,
            "BIND_ADDR",
            SocketAddr::from(([0, 0, 0, 0], 8080)),
        )?;

        Ok(Self {
            env,
            bind_addr,
            auth: AuthConfig::new(secret, &algorithm, ttl_minutes)?.with_hashing(hashing),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_in_development() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.env, "development");
        assert_eq!(cfg.bind_addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(cfg.auth.ttl(), chrono::Duration::minutes(30));
        assert_eq!(cfg.auth.secret(), DEV_SECRET.as_bytes());
        assert_eq!(cfg.auth.hashing, HashParams::default());
    }

    #[test]
    fn secret_is_required_outside_development() {
        let err = AppConfig::from_lookup(lookup(&[("APP_ENV", "production")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("APP_ENV", "production"),
            ("JWT_SECRET", "s3cr3t"),
            ("JWT_ALGORITHM", "HS512"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "15"),
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("ARGON2_MEMORY_KIB", "4096"),
        ]))
        .unwrap();
        assert_eq!(cfg.auth.ttl(), chrono::Duration::minutes(15));
        assert_eq!(format!("{:?}", cfg.auth.algorithm()), "HS512");
        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.auth.hashing.memory_kib, 4096);
    }

    #[test]
    fn unparsable_values_name_the_key() {
        let err = AppConfig::from_lookup(lookup(&[("ACCESS_TOKEN_EXPIRE_MINUTES", "soon")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "ACCESS_TOKEN_EXPIRE_MINUTES",
                ..
            }
        ));
    }

    #[test]
    fn non_positive_ttl_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("ACCESS_TOKEN_EXPIRE_MINUTES", "-5")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Auth(AuthConfigError::InvalidTtl(-5))));
    }

    #[test]
    fn oversized_ttl_is_a_config_error() {
        let max = i64::MAX.to_string();
        let err = AppConfig::from_lookup(lookup(&[("ACCESS_TOKEN_EXPIRE_MINUTES", max.as_str())]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Auth(AuthConfigError::InvalidTtl(i64::MAX))
        ));
    }
}
