use std::{env, fmt::Display, str::FromStr};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:5173", "http://localhost:3000"];

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    server: ServerSettings,
    environment: Environment,
    api: ApiSettings,
    security: SecuritySettings,
    cors: CorsSettings,
    database: DatabaseSettings,
    redis: RedisSettings,
    rate_limit: RateLimitSettings,
    admin: AdminSettings,
    telemetry: TelemetrySettings,
}

#[derive(Debug, Clone)]
pub(crate) struct ServerSettings {
    pub(crate) host: String,
    pub(crate) port: u16,
}

#[derive(Debug, Clone)]
pub(crate) struct ApiSettings {
    pub(crate) project_name: String,
    pub(crate) version: String,
    pub(crate) api_v1_str: String,
}

#[derive(Debug, Clone)]
pub(crate) struct SecuritySettings {
    pub(crate) secret_key: String,
    pub(crate) access_token_expire_minutes: u64,
    pub(crate) algorithm: String,
}

#[derive(Debug, Clone)]
pub(crate) struct CorsSettings {
    pub(crate) origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct DatabaseSettings {
    url: String,
    pub(crate) max_connections: u32,
}

#[derive(Debug, Clone)]
pub(crate) struct RedisSettings {
    url: String,
}

/// Fixed-window limits applied to the credential endpoints.
#[derive(Debug, Clone)]
pub(crate) struct RateLimitSettings {
    pub(crate) auth_limit: u64,
    pub(crate) auth_window_seconds: u64,
}

#[derive(Debug, Clone)]
pub(crate) struct AdminSettings {
    pub(crate) first_superuser_email: String,
    pub(crate) first_superuser_password: String,
}

#[derive(Debug, Clone)]
pub(crate) struct TelemetrySettings {
    pub(crate) log_level: String,
    pub(crate) json: bool,
    pub(crate) prometheus_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
    #[error("missing required secret for {0}")]
    MissingSecret(&'static str),
}

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let environment = parse_environment(env_optional("SCHOOLHUB_ENV"));
        let strict = environment == Environment::Production
            || env_optional("SCHOOLHUB_STRICT_CONFIG").is_some_and(|value| parse_bool(&value));

        let host = env_or_default("SCHOOLHUB_HOST", "0.0.0.0");
        let port: u16 = parse_env("SCHOOLHUB_PORT", 8080)?;
        if port == 0 {
            return Err(invalid("SCHOOLHUB_PORT", port));
        }

        let secret_key = match env_optional("SECRET_KEY") {
            Some(value) => value,
            None if strict => return Err(ConfigError::MissingSecret("SECRET_KEY")),
            None => {
                tracing::warn!("SECRET_KEY is not set; tokens will not survive a restart");
                generate_secret_key()
            }
        };
        let algorithm = env_or_default("ALGORITHM", "HS256");
        if !matches!(algorithm.as_str(), "HS256" | "HS384" | "HS512") {
            return Err(invalid("ALGORITHM", algorithm));
        }

        let postgres_password = env_or_default("POSTGRES_PASSWORD", "");
        let database_url = match env_optional("DATABASE_URL") {
            Some(url) => url,
            None if strict && postgres_password.is_empty() => {
                return Err(ConfigError::MissingSecret("POSTGRES_PASSWORD"));
            }
            None => format!(
                "postgresql://{}:{}@{}:{}/{}",
                env_or_default("POSTGRES_USER", "schoolhub"),
                postgres_password,
                env_or_default("POSTGRES_SERVER", "localhost"),
                parse_env::<u16>("POSTGRES_PORT", 5432)?,
                env_or_default("POSTGRES_DB", "schoolhub"),
            ),
        };
        let max_connections: u32 = parse_env("DB_MAX_CONNECTIONS", 30)?;
        if max_connections == 0 {
            return Err(invalid("DB_MAX_CONNECTIONS", max_connections));
        }

        let redis_url = redis_url(
            &env_or_default("REDIS_HOST", "localhost"),
            parse_env("REDIS_PORT", 6379)?,
            parse_env("REDIS_DB", 0)?,
            &env_or_default("REDIS_PASSWORD", ""),
        );

        let auth_window_seconds: u64 = parse_env("AUTH_RATE_LIMIT_WINDOW_SECONDS", 60)?;
        if auth_window_seconds == 0 {
            return Err(invalid("AUTH_RATE_LIMIT_WINDOW_SECONDS", auth_window_seconds));
        }

        let first_superuser_password = env_or_default("FIRST_SUPERUSER_PASSWORD", "");
        if strict && first_superuser_password.is_empty() {
            return Err(ConfigError::MissingSecret("FIRST_SUPERUSER_PASSWORD"));
        }

        Ok(Self {
            server: ServerSettings { host, port },
            environment,
            api: ApiSettings {
                project_name: env_or_default("PROJECT_NAME", "Schoolhub API"),
                version: env_or_default("VERSION", env!("CARGO_PKG_VERSION")),
                api_v1_str: env_or_default("API_V1_STR", "/api/v1"),
            },
            security: SecuritySettings {
                secret_key,
                access_token_expire_minutes: parse_env("ACCESS_TOKEN_EXPIRE_MINUTES", 1440)?,
                algorithm,
            },
            cors: CorsSettings {
                origins: parse_cors_origins(env_optional("BACKEND_CORS_ORIGINS")),
            },
            database: DatabaseSettings { url: database_url, max_connections },
            redis: RedisSettings { url: redis_url },
            rate_limit: RateLimitSettings {
                auth_limit: parse_env("AUTH_RATE_LIMIT", 10)?,
                auth_window_seconds,
            },
            admin: AdminSettings {
                first_superuser_email: env_or_default(
                    "FIRST_SUPERUSER_EMAIL",
                    "admin@schoolhub.local",
                ),
                first_superuser_password,
            },
            telemetry: TelemetrySettings {
                log_level: env_or_default("SCHOOLHUB_LOG_LEVEL", "info"),
                json: env_optional("SCHOOLHUB_LOG_JSON").is_some_and(|value| parse_bool(&value)),
                prometheus_enabled: env_optional("PROMETHEUS_ENABLED")
                    .is_some_and(|value| parse_bool(&value)),
            },
        })
    }

    pub(crate) fn server(&self) -> &ServerSettings {
        &self.server
    }

    pub(crate) fn environment(&self) -> Environment {
        self.environment
    }

    pub(crate) fn api(&self) -> &ApiSettings {
        &self.api
    }

    pub(crate) fn security(&self) -> &SecuritySettings {
        &self.security
    }

    pub(crate) fn cors(&self) -> &CorsSettings {
        &self.cors
    }

    pub(crate) fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    pub(crate) fn redis(&self) -> &RedisSettings {
        &self.redis
    }

    pub(crate) fn rate_limit(&self) -> &RateLimitSettings {
        &self.rate_limit
    }

    pub(crate) fn admin(&self) -> &AdminSettings {
        &self.admin
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }
}

impl ServerSettings {
    pub(crate) fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseSettings {
    pub(crate) fn database_url(&self) -> String {
        self.url.clone()
    }
}

impl RedisSettings {
    pub(crate) fn redis_url(&self) -> String {
        self.url.clone()
    }
}

fn redis_url(host: &str, port: u16, db: u16, password: &str) -> String {
    if password.is_empty() {
        format!("redis://{host}:{port}/{db}")
    } else {
        format!("redis://:{password}@{host}:{port}/{db}")
    }
}

fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn env_or_default(key: &str, default: &str) -> String {
    env_optional(key).unwrap_or_else(|| default.to_string())
}

fn parse_env<T: FromStr>(field: &'static str, default: T) -> Result<T, ConfigError> {
    match env_optional(field) {
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue { field, value }),
        None => Ok(default),
    }
}

fn invalid(field: &'static str, value: impl Display) -> ConfigError {
    ConfigError::InvalidValue { field, value: value.to_string() }
}

/// Comma-separated origins; an empty list falls back to the local dev servers.
fn parse_cors_origins(value: Option<String>) -> Vec<String> {
    let origins: Vec<String> = value
        .unwrap_or_default()
        .split(',')
        .map(|item| item.trim().trim_end_matches('/').to_string())
        .filter(|item| !item.is_empty())
        .collect();

    if origins.is_empty() {
        DEFAULT_CORS_ORIGINS.iter().map(|item| item.to_string()).collect()
    } else {
        origins
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn parse_environment(value: Option<String>) -> Environment {
    match value.map(|val| val.to_ascii_lowercase()).as_deref() {
        Some("production" | "prod") => Environment::Production,
        Some("test" | "testing") => Environment::Test,
        _ => Environment::Development,
    }
}

fn generate_secret_key() -> String {
    let mut bytes = [0u8; 64];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let parsed = parse_cors_origins(Some("http://a/, http://b ,".to_string()));
        assert_eq!(parsed, vec!["http://a".to_string(), "http://b".to_string()]);
    }

    #[test]
    fn cors_origins_default_when_empty() {
        let defaults: Vec<String> = DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect();
        assert_eq!(parse_cors_origins(None), defaults);
        assert_eq!(parse_cors_origins(Some(" , ".to_string())), defaults);
    }

    #[test]
    fn parse_bool_variants() {
        for value in ["1", "true", "TRUE", "yes", "On"] {
            assert!(parse_bool(value), "{value}");
        }
        for value in ["0", "false", "off", ""] {
            assert!(!parse_bool(value), "{value}");
        }
    }

    #[test]
    fn parse_environment_variants() {
        assert_eq!(parse_environment(Some("prod".to_string())), Environment::Production);
        assert_eq!(parse_environment(Some("Production".to_string())), Environment::Production);
        assert_eq!(parse_environment(Some("testing".to_string())), Environment::Test);
        assert_eq!(parse_environment(Some("staging".to_string())), Environment::Development);
        assert_eq!(parse_environment(None), Environment::Development);
    }

    #[test]
    fn redis_url_includes_password_only_when_set() {
        assert_eq!(redis_url("cache", 6379, 2, ""), "redis://cache:6379/2");
        assert_eq!(redis_url("cache", 6379, 0, "pw"), "redis://:pw@cache:6379/0");
    }

    #[test]
    fn generated_secrets_are_random() {
        let first = generate_secret_key();
        assert_eq!(URL_SAFE_NO_PAD.decode(&first).expect("base64").len(), 64);
        assert_ne!(first, generate_secret_key());
    }

    #[tokio::test]
    async fn load_rejects_bad_numbers_and_zero_pool() {
        let _guard = crate::test_support::env_lock().await;
        crate::test_support::set_test_env();

        std::env::set_var("DB_MAX_CONNECTIONS", "many");
        let err = Settings::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "DB_MAX_CONNECTIONS", .. }));

        std::env::set_var("DB_MAX_CONNECTIONS", "0");
        assert!(Settings::load().is_err());

        std::env::remove_var("DB_MAX_CONNECTIONS");
        let settings = Settings::load().expect("settings");
        assert_eq!(settings.database().max_connections, 30);
        assert_eq!(settings.environment(), Environment::Test);
    }

    #[tokio::test]
    async fn strict_mode_requires_secrets() {
        let _guard = crate::test_support::env_lock().await;
        crate::test_support::set_test_env();

        std::env::set_var("SCHOOLHUB_STRICT_CONFIG", "1");
        std::env::remove_var("SECRET_KEY");
        let err = Settings::load().unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret("SECRET_KEY")));

        crate::test_support::set_test_env();
    }
}
