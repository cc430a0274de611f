use std::{env, time::Duration};

use bookshelf_core::auth::{Principal, StaticTokenAuthenticator};

/// Principal behind the configured admin token.
pub const ADMIN_PRINCIPAL: &str = "admin@bookapi.com";
/// Principal behind the configured user token.
pub const USER_PRINCIPAL: &str = "user@bookapi.com";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache TTL in seconds (default: 3600)
    pub cache_ttl_seconds: u64,
    /// Maximum number of cache entries (default: 10,000)
    /// Note: Only used when the `memory` feature is enabled.
    #[allow(dead_code)]
    pub cache_max_entries: usize,
    /// Path to SQLite database file (default: "bookshelf.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
    /// Bearer token granting the admin role (default: "admin-token")
    pub admin_token: String,
    /// Bearer token granting the user role (default: "user-token")
    pub user_token: String,
    /// Seed demo authors and books on startup (default: false)
    pub seed_demo_data: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: 3600)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `SQLITE_PATH` - SQLite database path (default: "bookshelf.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `ADMIN_TOKEN` - Admin bearer token (default: "admin-token")
    /// - `USER_TOKEN` - User bearer token (default: "user-token")
    /// - `SEED_DEMO_DATA` - `true`/`1` seeds demo data (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            cache_ttl_seconds: lookup("CACHE_TTL_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(3_600),
            cache_max_entries: lookup("CACHE_MAX_ENTRIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            sqlite_path: lookup("SQLITE_PATH").unwrap_or_else(|| "bookshelf.db".to_string()),
            redis_url: lookup("REDIS_URL")
                .unwrap_or_else(|| "redis://localhost:6379".to_string()),
            admin_token: lookup("ADMIN_TOKEN").unwrap_or_else(|| "admin-token".to_string()),
            user_token: lookup("USER_TOKEN").unwrap_or_else(|| "user-token".to_string()),
            seed_demo_data: lookup("SEED_DEMO_DATA")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Authenticator resolving the configured tokens to the fixture principals.
    pub fn authenticator(&self) -> StaticTokenAuthenticator {
        StaticTokenAuthenticator::new()
            .with_token(&self.admin_token, Principal::admin(ADMIN_PRINCIPAL))
            .with_token(&self.user_token, Principal::user(USER_PRINCIPAL))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use bookshelf_core::auth::{Authenticator, Role};

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_cache_ttl_conversion() {
        let config = config_from(&[("CACHE_TTL_SECONDS", "600")]);

        assert_eq!(config.cache_ttl(), Duration::from_secs(600));
    }

    #[test]
    fn test_default_values() {
        let config = config_from(&[]);

        assert_eq!(config.cache_ttl_seconds, 3_600);
        assert_eq!(config.cache_max_entries, 10_000);
        assert_eq!(config.sqlite_path, "bookshelf.db");
        assert_eq!(config.redis_url, "redis://localhost:6379");
        assert_eq!(config.admin_token, "admin-token");
        assert_eq!(config.user_token, "user-token");
        assert!(!config.seed_demo_data);
    }

    #[test]
    fn test_unparseable_numbers_fall_back_to_defaults() {
        let config = config_from(&[
            ("CACHE_TTL_SECONDS", "soon"),
            ("CACHE_MAX_ENTRIES", "-5"),
        ]);

        assert_eq!(config.cache_ttl_seconds, 3_600);
        assert_eq!(config.cache_max_entries, 10_000);
    }

    #[test]
    fn test_seed_flag() {
        assert!(config_from(&[("SEED_DEMO_DATA", "true")]).seed_demo_data);
        assert!(config_from(&[("SEED_DEMO_DATA", "1")]).seed_demo_data);
        assert!(!config_from(&[("SEED_DEMO_DATA", "no")]).seed_demo_data);
    }

    #[tokio::test]
    async fn test_authenticator_uses_configured_tokens() {
        let config = config_from(&[("ADMIN_TOKEN", "s3cret"), ("USER_TOKEN", "reader")]);
        let authenticator = config.authenticator();

        let admin = authenticator.authenticate("s3cret").await.unwrap();
        assert_eq!(admin.name, ADMIN_PRINCIPAL);
        assert!(admin.has_role(Role::Admin));

        let user = authenticator.authenticate("reader").await.unwrap();
        assert_eq!(user.name, USER_PRINCIPAL);
        assert!(!user.is_admin());

        assert!(authenticator.authenticate("admin-token").await.is_err());
    }
}
