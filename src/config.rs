use anyhow::Context;
use serde::Deserialize;
use tracing::warn;

const DEV_JWT_SECRET: &str = "your_super_secret_key";
const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub app_env: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't have to touch the process env.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = get("DATABASE_URL").context("DATABASE_URL must be set")?;

        let secret = match get("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                warn!("JWT_SECRET not set; falling back to the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let jwt = JwtConfig {
            secret,
            ttl_minutes: get("JWT_TTL_MINUTES")
                .and_then(|v| v.parse::<i64>().ok())
                .filter(|m| (1..=MAX_TTL_MINUTES).contains(m))
                .unwrap_or(60),
        };

        Ok(Self {
            database_url,
            app_env: get("APP_ENV").unwrap_or_else(|| "development".into()),
            max_connections: get("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
            acquire_timeout_secs: get("DB_ACQUIRE_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|s| *s > 0)
                .unwrap_or(5),
            jwt,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    /// TLS toward Postgres is mandatory in production or when the URL asks for it.
    pub fn requires_tls(&self) -> bool {
        self.is_production() || self.database_url.contains("sslmode=require")
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
    fn defaults_apply_when_only_database_url_is_set() {
        let cfg = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/app")]))
            .expect("config");
        assert_eq!(cfg.jwt.secret, DEV_JWT_SECRET);
        assert_eq!(cfg.jwt.ttl_minutes, 60);
        assert_eq!(cfg.max_connections, 10);
        assert_eq!(cfg.acquire_timeout_secs, 5);
        assert_eq!(cfg.app_env, "development");
        assert!(!cfg.requires_tls());
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s")])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/app"),
            ("JWT_SECRET", "prod-secret"),
            ("JWT_TTL_MINUTES", "15"),
            ("DB_MAX_CONNECTIONS", "4"),
            ("APP_ENV", "production"),
        ]))
        .expect("config");
        assert_eq!(cfg.jwt.secret, "prod-secret");
        assert_eq!(cfg.jwt.ttl_minutes, 15);
        assert_eq!(cfg.max_connections, 4);
        assert!(cfg.is_production());
        assert!(cfg.requires_tls());
    }

    #[test]
    fn invalid_ttl_falls_back_to_an_hour() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/app"),
            ("JWT_TTL_MINUTES", "-5"),
        ]))
        .expect("config");
        assert_eq!(cfg.jwt.ttl_minutes, 60);
    }

    #[test]
    fn oversized_ttl_falls_back_to_an_hour() {
        for ttl in [i64::MAX.to_string(), (MAX_TTL_MINUTES + 1).to_string()] {
            let cfg = AppConfig::from_lookup(lookup(&[
                ("DATABASE_URL", "postgres://db/app"),
                ("JWT_TTL_MINUTES", ttl.as_str()),
            ]))
            .expect("config");
            assert_eq!(cfg.jwt.ttl_minutes, 60, "{ttl}");
        }
    }

    #[test]
    fn sslmode_in_url_requires_tls_outside_production() {
        let cfg = AppConfig::from_lookup(lookup(&[(
            "DATABASE_URL",
            "postgres://db/app?sslmode=require",
        )]))
        .expect("config");
        assert!(!cfg.is_production());
        assert!(cfg.requires_tls());
    }
}
