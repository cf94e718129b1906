use chomp_classroom::ClassroomConfig;
use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub mongodb: MongoDbConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub classroom: ClassroomConfig,
    #[serde(default)]
    pub votes: VotesConfig,
    #[serde(default)]
    pub purge: PurgeConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub mongodb_uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    30
}

/// Cross-origin access. When disabled no origin is allowed.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoDbConfig {
    pub database: String,
    pub pool_size: u32,
    pub timeout_ms: u64,
}

/// Identity forwarded by the gateway in front of the service
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_email_header")]
    pub email_header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            email_header: default_email_header(),
        }
    }
}

fn default_email_header() -> String {
    "x-authenticated-email".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct VotesConfig {
    /// Pending vote-list changes before publishers wait
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for VotesConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_channel_capacity() -> usize {
    1024
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PurgeConfig {
    pub enabled: bool,
    pub interval_hours: u64,
    pub max_age_days: i64,
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_hours: 12,
            max_age_days: 14,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (SERVER_, MONGODB_, AUTH_, CLASSROOM_, VOTES_, PURGE_, LOG_)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let mut builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));

        for prefix in ["SERVER", "MONGODB", "AUTH", "CLASSROOM", "VOTES", "PURGE", "LOG"] {
            builder = builder.add_source(
                Environment::default()
                    .prefix(prefix)
                    .separator("_")
                    .try_parsing(true),
            );
        }

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        // Load secrets from ENV (not in TOML)
        cfg.mongodb_uri = std::env::var("MONGODB_URI")
            .map_err(|_| ConfigError::Message("MONGODB_URI environment variable is required".to_string()))?;

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));
        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 8080

        [cors]
        enabled = true
        origins = ["http://localhost:3000"]

        [mongodb]
        database = "chomp"
        pool_size = 5
        timeout_ms = 3000

        [logging]
        level = "debug"
        format = "json"
    "#;

    #[test]
    fn minimal_config_fills_defaults() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.request_timeout_secs, 30);
        assert_eq!(config.mongodb.database, "chomp");
        assert_eq!(config.auth.email_header, "x-authenticated-email");
        assert_eq!(config.classroom.page_size, 10);
        assert_eq!(config.votes.channel_capacity, 1024);
        assert_eq!(config.purge.interval_hours, 12);
        assert_eq!(config.purge.max_age_days, 14);
        assert!(config.mongodb_uri.is_empty());
    }

    #[test]
    fn sections_override_defaults() {
        let toml = format!(
            "{MINIMAL}\n[auth]\nemail_header = \"x-user\"\n\n[purge]\nenabled = false\n\n[classroom]\napi_base = \"http://localhost:9000\"\n"
        );
        let config: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config.auth.email_header, "x-user");
        assert!(!config.purge.enabled);
        assert_eq!(config.purge.max_age_days, 14);
        assert_eq!(config.classroom.api_base, "http://localhost:9000");
    }
}
