use std::env;
use std::fmt;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::account::models::AccountDetails;
use crate::account::models::EmailAddress;
use crate::account::models::RegisterAccountCommand;
use crate::account::models::Username;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub kafka: KafkaConfig,
    #[serde(default)]
    pub events: EventsConfig,
    /// Administrator created at startup when no account holds its username.
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdminConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_ttl_secs")]
    pub access_token_ttl_secs: i64,
    #[serde(default = "default_refresh_token_ttl_secs")]
    pub refresh_token_ttl_secs: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub topic: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EventsConfig {
    #[serde(default = "default_publish_timeout_ms")]
    pub publish_timeout_ms: u64,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            publish_timeout_ms: default_publish_timeout_ms(),
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct BootstrapAdminConfig {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_admin_level")]
    pub admin_level: String,
}

impl fmt::Debug for BootstrapAdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapAdminConfig")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("admin_level", &self.admin_level)
            .finish()
    }
}

impl BootstrapAdminConfig {
    const MIN_PASSWORD_LENGTH: usize = 6;

    /// Registration command for the configured administrator.
    pub fn to_command(&self) -> Result<RegisterAccountCommand, ConfigError> {
        let username = Username::new(self.username.clone())
            .map_err(|e| ConfigError::Message(format!("bootstrap_admin.username: {}", e)))?;
        let email = EmailAddress::new(self.email.clone())
            .map_err(|e| ConfigError::Message(format!("bootstrap_admin.email: {}", e)))?;
        if self.password.chars().count() < Self::MIN_PASSWORD_LENGTH {
            return Err(ConfigError::Message(format!(
                "bootstrap_admin.password must be at least {} characters",
                Self::MIN_PASSWORD_LENGTH
            )));
        }

        Ok(RegisterAccountCommand::new(
            username,
            email,
            self.password.clone(),
            AccountDetails::Admin {
                admin_level: self.admin_level.clone(),
            },
        ))
    }
}

fn default_admin_level() -> String {
    "SUPER".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_access_token_ttl_secs() -> i64 {
    24 * 60 * 60
}

fn default_refresh_token_ttl_secs() -> i64 {
    7 * 24 * 60 * 60
}

fn default_publish_timeout_ms() -> u64 {
    2_000
}

impl Config {
    const MIN_SECRET_BYTES: usize = 32;

    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the token codec cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < Self::MIN_SECRET_BYTES {
            return Err(ConfigError::Message(format!(
                "jwt.secret must be at least {} bytes",
                Self::MIN_SECRET_BYTES
            )));
        }
        if self.jwt.access_token_ttl_secs <= 0 {
            return Err(ConfigError::Message(
                "jwt.access_token_ttl_secs must be positive".to_string(),
            ));
        }
        if self.jwt.refresh_token_ttl_secs <= self.jwt.access_token_ttl_secs {
            return Err(ConfigError::Message(
                "jwt.refresh_token_ttl_secs must exceed jwt.access_token_ttl_secs".to_string(),
            ));
        }
        if let Some(admin) = &self.bootstrap_admin {
            admin.to_command()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str, access: i64, refresh: i64) -> Config {
        Config {
            database: DatabaseConfig {
                url: "postgres://localhost/identity".to_string(),
                max_connections: 5,
            },
            server: ServerConfig { http_port: 8081 },
            jwt: JwtConfig {
                secret: secret.to_string(),
                access_token_ttl_secs: access,
                refresh_token_ttl_secs: refresh,
            },
            kafka: KafkaConfig {
                brokers: "localhost:9092".to_string(),
                topic: "auth-events".to_string(),
            },
            events: EventsConfig::default(),
            bootstrap_admin: None,
        }
    }

    fn bootstrap_admin(username: &str, password: &str) -> BootstrapAdminConfig {
        BootstrapAdminConfig {
            username: username.to_string(),
            email: "root@example.com".to_string(),
            password: password.to_string(),
            admin_level: default_admin_level(),
        }
    }

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_validate_accepts_defaults() {
        let config = config(
            SECRET,
            default_access_token_ttl_secs(),
            default_refresh_token_ttl_secs(),
        );

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_refresh_not_longer_than_access() {
        assert!(config(SECRET, 3600, 3600).validate().is_err());
        assert!(config(SECRET, 3600, 60).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_short_secret() {
        assert!(config("too-short", 3600, 7200).validate().is_err());
    }

    #[test]
    fn test_bootstrap_admin_builds_admin_command() {
        let command = bootstrap_admin("rootadmin", "Adm1nP@ss").to_command().unwrap();

        assert_eq!(command.username.as_str(), "rootadmin");
        assert_eq!(
            command.details,
            AccountDetails::Admin {
                admin_level: "SUPER".to_string()
            }
        );
    }

    #[test]
    fn test_validate_rejects_weak_bootstrap_admin() {
        let mut config = config(SECRET, 3600, 7200);
        config.bootstrap_admin = Some(bootstrap_admin("rootadmin", "short"));

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bootstrap_admin_debug_hides_password() {
        let debug = format!("{:?}", bootstrap_admin("rootadmin", "Adm1nP@ss"));

        assert!(!debug.contains("Adm1nP@ss"));
    }
}
