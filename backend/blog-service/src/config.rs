/// Configuration management for Blog Service
///
/// This module handles loading configuration from environment variables
/// (optionally seeded from a `.env` file by the binary).
use std::fmt;

const MIN_JWT_SECRET_LEN: usize = 32;
/// One year.
const MAX_TOKEN_TTL_SECS: i64 = 31_536_000;
const DEV_JWT_SECRET: &str = "development-only-jwt-secret-change-me";

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Storage configuration
    pub database: DatabaseConfig,
    /// Token and access-policy settings
    pub auth: AuthConfig,
}

/// Application settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
    /// HTTP worker threads
    pub workers: usize,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Where entities are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    /// Process-local store; contents are lost on restart.
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("Unknown STORAGE_BACKEND '{}'", other)),
        }
    }
}

/// Database configuration
#[derive(Clone)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
    /// Min idle connections in pool
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub acquire_timeout_secs: u64,
    /// Apply embedded migrations on startup
    pub run_migrations: bool,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("backend", &self.backend)
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

/// Authentication configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Access token lifetime
    pub token_ttl_secs: i64,
    /// Require a token for list/retrieve too
    pub require_auth_for_reads: bool,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("require_auth_for_reads", &self.require_auth_for_reads)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("BLOG_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or_default("BLOG_SERVICE_PORT", 8080)?,
                workers: parse_env_or_default("BLOG_SERVICE_WORKERS", 4)?,
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if production => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if production && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            database: DatabaseConfig {
                backend: std::env::var("STORAGE_BACKEND")
                    .unwrap_or_else(|_| "postgres".to_string())
                    .parse()?,
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgres://localhost/yatube".to_string()),
                max_connections: parse_env_or_default("DATABASE_MAX_CONNECTIONS", 10)?,
                min_connections: parse_env_or_default("DATABASE_MIN_CONNECTIONS", 1)?,
                connect_timeout_secs: parse_env_or_default("DATABASE_CONNECT_TIMEOUT_SECS", 5)?,
                acquire_timeout_secs: parse_env_or_default("DATABASE_ACQUIRE_TIMEOUT_SECS", 10)?,
                run_migrations: parse_env_or_default("DATABASE_RUN_MIGRATIONS", true)?,
            },
            auth: {
                let jwt_secret = match std::env::var("JWT_SECRET") {
                    Ok(value) => value,
                    Err(_) if production => {
                        return Err("JWT_SECRET must be set in production".to_string())
                    }
                    Err(_) => DEV_JWT_SECRET.to_string(),
                };

                if jwt_secret.len() < MIN_JWT_SECRET_LEN {
                    return Err(format!(
                        "JWT_SECRET must be at least {} bytes",
                        MIN_JWT_SECRET_LEN
                    ));
                }

                let token_ttl_secs = parse_env_or_default("ACCESS_TOKEN_TTL_SECS", 86_400)?;
                if !(1..=MAX_TOKEN_TTL_SECS).contains(&token_ttl_secs) {
                    return Err(format!(
                        "ACCESS_TOKEN_TTL_SECS must be between 1 and {}, got {}",
                        MAX_TOKEN_TTL_SECS, token_ttl_secs
                    ));
                }

                AuthConfig {
                    jwt_secret,
                    token_ttl_secs,
                    require_auth_for_reads: parse_env_or_default("REQUIRE_AUTH_FOR_READS", false)?,
                }
            },
        })
    }
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: &[&str] = &[
        "APP_ENV",
        "BLOG_SERVICE_PORT",
        "CORS_ALLOWED_ORIGINS",
        "STORAGE_BACKEND",
        "JWT_SECRET",
        "ACCESS_TOKEN_TTL_SECS",
        "REQUIRE_AUTH_FOR_READS",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_development_defaults() {
        clear_env();

        let config = Config::from_env().unwrap();
        assert_eq!(config.app.port, 8080);
        assert_eq!(config.database.backend, StorageBackend::Postgres);
        assert_eq!(config.auth.token_ttl_secs, 86_400);
        assert!(!config.auth.require_auth_for_reads);
        assert!(config.auth.jwt_secret.len() >= MIN_JWT_SECRET_LEN);
    }

    #[test]
    #[serial_test::serial]
    fn test_overrides_are_parsed() {
        clear_env();
        std::env::set_var("BLOG_SERVICE_PORT", "9090");
        std::env::set_var("STORAGE_BACKEND", "memory");
        std::env::set_var("REQUIRE_AUTH_FOR_READS", "true");

        let config = Config::from_env().unwrap();
        assert_eq!(config.app.port, 9090);
        assert_eq!(config.database.backend, StorageBackend::Memory);
        assert!(config.auth.require_auth_for_reads);

        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_invalid_number_is_reported() {
        clear_env();
        std::env::set_var("BLOG_SERVICE_PORT", "not-a-port");

        let err = Config::from_env().unwrap_err();
        assert!(err.contains("BLOG_SERVICE_PORT"));

        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_token_ttl_must_be_in_range() {
        for value in ["0", "-60", "1000000000000000"] {
            clear_env();
            std::env::set_var("ACCESS_TOKEN_TTL_SECS", value);
            let err = Config::from_env().unwrap_err();
            assert!(err.contains("ACCESS_TOKEN_TTL_SECS"), "{value}: {err}");
        }

        clear_env();
        std::env::set_var("ACCESS_TOKEN_TTL_SECS", "31536000");
        assert_eq!(Config::from_env().unwrap().auth.token_ttl_secs, MAX_TOKEN_TTL_SECS);

        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_production_requires_secrets() {
        clear_env();
        std::env::set_var("APP_ENV", "production");
        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://yatube.dev");

        assert!(Config::from_env().unwrap_err().contains("JWT_SECRET"));

        std::env::set_var("JWT_SECRET", "too-short");
        assert!(Config::from_env().unwrap_err().contains("at least"));

        std::env::set_var("JWT_SECRET", "p".repeat(48));
        std::env::set_var("CORS_ALLOWED_ORIGINS", "*");
        assert!(Config::from_env().unwrap_err().contains("CORS"));

        clear_env();
    }

    #[test]
    fn test_secrets_are_redacted_in_debug() {
        let auth = AuthConfig {
            jwt_secret: "super-secret-value".into(),
            token_ttl_secs: 60,
            require_auth_for_reads: false,
        };
        assert!(!format!("{auth:?}").contains("super-secret-value"));
    }
}
