//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use quill_infra::{DatabaseConfig, JwtConfig};

use crate::telemetry::TelemetryConfig;

/// Posts shown per listing page unless `POSTS_PER_PAGE` says otherwise.
pub const DEFAULT_POSTS_PER_PAGE: u64 = 20;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the in-memory stores.
    pub database: Option<DatabaseConfig>,
    pub run_migrations: bool,
    pub posts_per_page: u64,
    pub seed_test_user: bool,
    pub production: bool,
    pub jwt: JwtConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let database = var("DATABASE_URL").map(|url| DatabaseConfig {
            url,
            max_connections: parse_or(&var, "DB_MAX_CONNECTIONS", 100),
            min_connections: parse_or(&var, "DB_MIN_CONNECTIONS", 10),
        });

        let jwt_defaults = JwtConfig::default();
        let jwt = JwtConfig {
            secret: var("JWT_SECRET").unwrap_or(jwt_defaults.secret),
            expiration_hours: var("JWT_EXPIRATION_HOURS")
                .and_then(|s| s.parse().ok())
                .filter(|hours| (1..=JwtConfig::MAX_EXPIRATION_HOURS).contains(hours))
                .unwrap_or(jwt_defaults.expiration_hours),
            issuer: var("JWT_ISSUER").unwrap_or(jwt_defaults.issuer),
        };

        let telemetry = TelemetryConfig {
            json_logs: var("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json")),
            service_name: var("SERVICE_NAME").unwrap_or_else(|| TelemetryConfig::default().service_name),
        };

        Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&var, "PORT", 8080),
            database,
            run_migrations: flag(&var, "RUN_MIGRATIONS"),
            // A zero page size would make every page empty.
            posts_per_page: parse_or(&var, "POSTS_PER_PAGE", DEFAULT_POSTS_PER_PAGE).max(1),
            seed_test_user: flag(&var, "SEED_TEST_USER"),
            production: var("RUST_ENV").is_some_and(|v| v == "production" || v == "prod"),
            jwt,
            telemetry,
        }
    }
}

impl AppConfig {
    /// Refuse to run production on the development JWT secret.
    pub fn check_jwt_secret(&self) -> anyhow::Result<()> {
        if !self.jwt.uses_default_secret() {
            return Ok(());
        }
        if self.production {
            anyhow::bail!("JWT_SECRET must be set in production");
        }
        tracing::warn!("JWT_SECRET not set, using the development default");
        Ok(())
    }
}

fn parse_or<T: FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    var(key).and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn flag(var: &impl Fn(&str) -> Option<String>, key: &str) -> bool {
    var(key).is_some_and(|v| v == "true" || v == "1")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(config.database.is_none());
        assert_eq!(config.posts_per_page, 20);
        assert!(!config.seed_test_user);
        assert!(!config.run_migrations);
        assert!(config.jwt.uses_default_secret());
        assert!(!config.telemetry.json_logs);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PORT", "9000"),
            ("DATABASE_URL", "postgres://localhost/quill"),
            ("DB_MAX_CONNECTIONS", "5"),
            ("POSTS_PER_PAGE", "10"),
            ("SEED_TEST_USER", "true"),
            ("LOG_FORMAT", "JSON"),
            ("JWT_SECRET", "s3cret"),
        ]);

        assert_eq!(config.port, 9000);
        let db = config.database.unwrap();
        assert_eq!(db.url, "postgres://localhost/quill");
        assert_eq!(db.max_connections, 5);
        assert_eq!(db.min_connections, 10);
        assert_eq!(config.posts_per_page, 10);
        assert!(config.seed_test_user);
        assert!(config.telemetry.json_logs);
        assert!(!config.jwt.uses_default_secret());
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = config(&[("PORT", "eighty"), ("POSTS_PER_PAGE", "0")]);

        assert_eq!(config.port, 8080);
        assert_eq!(config.posts_per_page, 1);
    }

    #[test]
    fn test_jwt_lifetime_out_of_range_falls_back() {
        for hours in ["0", "-5", "9223372036854775807", "8761"] {
            let config = config(&[("JWT_EXPIRATION_HOURS", hours)]);
            assert_eq!(config.jwt.expiration_hours, 24, "{hours}");
        }

        assert_eq!(config(&[("JWT_EXPIRATION_HOURS", "48")]).jwt.expiration_hours, 48);
    }

    #[test]
    fn test_production_requires_jwt_secret() {
        let prod = config(&[("RUST_ENV", "prod")]);
        assert!(prod.production);
        assert!(prod.check_jwt_secret().is_err());

        let prod = config(&[("RUST_ENV", "production"), ("JWT_SECRET", "s3cret")]);
        assert!(prod.production);
        assert!(prod.check_jwt_secret().is_ok());

        let dev = config(&[("RUST_ENV", "development")]);
        assert!(!dev.production);
        assert!(dev.check_jwt_secret().is_ok());
    }
}
