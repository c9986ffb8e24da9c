use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub notes: NoteLimits,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Prefix every route is mounted under, e.g. `/api`. Empty mounts at `/`.
    pub base_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
    pub run_migrations: bool,
}

/// Character bounds for note fields. Every field also has a minimum length of 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteLimits {
    pub max_title_length: usize,
    pub max_content_length: usize,
    pub max_owner_length: usize,
}

impl NoteLimits {
    /// Product default.
    pub const STRICT: NoteLimits = NoteLimits {
        max_title_length: 30,
        max_content_length: 1000,
        max_owner_length: 255,
    };

    /// Long-form profile.
    pub const EXTENDED: NoteLimits = NoteLimits {
        max_title_length: 50,
        max_content_length: 20000,
        max_owner_length: 255,
    };

    /// Widths of the `notes` columns. Configured limits never exceed these.
    pub const COLUMN_WIDTHS: NoteLimits = NoteLimits::EXTENDED;

    pub fn from_profile(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(Self::STRICT),
            "extended" => Some(Self::EXTENDED),
            _ => None,
        }
    }
}

impl Default for NoteLimits {
    fn default() -> Self {
        Self::STRICT
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(lookup)
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        // Server overrides
        if let Some(v) = lookup("NOTES_API_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("NOTES_API_PORT").or_else(|| lookup("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Some(v) = lookup("NOTES_API_BASE_PATH") {
            self.server.base_path = normalize_base_path(&v);
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            if !v.trim().is_empty() {
                self.database.url = Some(v);
            }
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout_secs =
                v.parse().unwrap_or(self.database.connection_timeout_secs);
        }
        if let Some(v) = lookup("DATABASE_RUN_MIGRATIONS") {
            self.database.run_migrations = v.parse().unwrap_or(self.database.run_migrations);
        }

        // Note limit overrides: profile first, then individual fields
        if let Some(v) = lookup("NOTES_LIMIT_PROFILE") {
            self.notes = NoteLimits::from_profile(&v).unwrap_or(self.notes);
        }
        let widths = NoteLimits::COLUMN_WIDTHS;
        if let Some(v) = lookup("NOTES_MAX_TITLE_LENGTH") {
            self.notes.max_title_length = limit_override(
                "NOTES_MAX_TITLE_LENGTH",
                &v,
                self.notes.max_title_length,
                widths.max_title_length,
            );
        }
        if let Some(v) = lookup("NOTES_MAX_CONTENT_LENGTH") {
            self.notes.max_content_length = limit_override(
                "NOTES_MAX_CONTENT_LENGTH",
                &v,
                self.notes.max_content_length,
                widths.max_content_length,
            );
        }
        if let Some(v) = lookup("NOTES_MAX_OWNER_LENGTH") {
            self.notes.max_owner_length = limit_override(
                "NOTES_MAX_OWNER_LENGTH",
                &v,
                self.notes.max_owner_length,
                widths.max_owner_length,
            );
        }

        // Security overrides
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                base_path: String::new(),
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 5,
                connection_timeout_secs: 30,
                run_migrations: true,
            },
            notes: NoteLimits::STRICT,
            security: SecurityConfig {
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                base_path: String::new(),
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout_secs: 10,
                run_migrations: true,
            },
            notes: NoteLimits::STRICT,
            security: SecurityConfig {
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                base_path: String::new(),
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout_secs: 5,
                run_migrations: false,
            },
            notes: NoteLimits::STRICT,
            security: SecurityConfig {
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}

/// A zero or unparsable value keeps `current`; anything wider than the
/// column is clamped to `width`.
fn limit_override(key: &str, raw: &str, current: usize, width: usize) -> usize {
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => {
            tracing::warn!("Ignoring {}={:?}; keeping {}", key, raw, current);
            current
        }
        Ok(n) if n > width => {
            tracing::warn!("{}={} exceeds the column width; clamping to {}", key, n, width);
            width
        }
        Ok(n) => n,
    }
}

/// `"api/"` -> `"/api"`, `"/"` -> `""`.
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}
