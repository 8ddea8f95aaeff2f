//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Authentication configuration.
    pub auth: AuthConfig,
    /// Outbound email configuration.
    pub email: EmailConfig,
    /// File storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Commission configuration.
    #[serde(default)]
    pub commission: CommissionConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this deployment.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret for signing bearer tokens (HS256).
    pub jwt_secret: String,
    /// Bearer token lifetime in hours.
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    /// One-time passcode lifetime in minutes.
    #[serde(default = "default_otp_ttl_minutes")]
    pub otp_ttl_minutes: i64,
}

/// Outbound email (SMTP) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SMTP host.
    pub smtp_host: String,
    /// SMTP port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_username: Option<String>,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: Option<String>,
    /// From address for all outbound mail.
    pub from_address: String,
    /// From display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

/// File storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Base path for locally stored files.
    #[serde(default = "default_storage_path")]
    pub base_path: String,
    /// Base URL for serving locally stored files.
    #[serde(default = "default_storage_url")]
    pub base_url: String,
    /// Secret for signing upload URLs.
    #[serde(default)]
    pub signing_secret: Option<String>,
    /// Signed upload URL lifetime in minutes.
    #[serde(default = "default_upload_ttl_minutes")]
    pub upload_ttl_minutes: i64,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            base_path: default_storage_path(),
            base_url: default_storage_url(),
            signing_secret: None,
            upload_ttl_minutes: default_upload_ttl_minutes(),
        }
    }
}

/// Commission configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CommissionConfig {
    /// Rental commission rate as a percentage of the booking total.
    #[serde(default = "default_rental_rate")]
    pub rental_rate: f64,
}

impl Default for CommissionConfig {
    fn default() -> Self {
        Self {
            rental_rate: default_rental_rate(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_token_ttl_hours() -> i64 {
    24 * 7
}

const fn default_otp_ttl_minutes() -> i64 {
    10
}

const fn default_smtp_port() -> u16 {
    587
}

fn default_from_name() -> String {
    "Casaflow".to_string()
}

fn default_storage_path() -> String {
    "./files".to_string()
}

fn default_storage_url() -> String {
    "/files".to_string()
}

const fn default_upload_ttl_minutes() -> i64 {
    15
}

const fn default_rental_rate() -> f64 {
    10.0
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `CASAFLOW_ENV`)
    /// 3. Environment variables with `CASAFLOW_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("CASAFLOW_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("CASAFLOW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("CASAFLOW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(default_port(), 3000);
        assert_eq!(default_otp_ttl_minutes(), 10);
        assert_eq!(CommissionConfig::default().rental_rate, 10.0);
        assert_eq!(StorageSettings::default().base_url, "/files");
    }
}
