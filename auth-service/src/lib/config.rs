use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub keys: KeysConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
    pub bootstrap: BootstrapConfig,
    /// Identities are kept in memory when no database is configured.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KeysConfig {
    pub private_key_path: String,
    pub public_key_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub issuer: String,
    pub expiration_hours: i64,
    pub leeway_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub cost: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BootstrapConfig {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
}

impl DatabaseConfig {
    fn default_max_connections() -> u32 {
        5
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (SERVER__HTTP_PORT, DATABASE__URL, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = Self::with_defaults(ConfigBuilder::builder())?
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__EXPIRATION_HOURS=1 overrides jwt.expiration_hours
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }

    fn with_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            .set_default("server.http_port", 8080)?
            .set_default("keys.private_key_path", "private.pem")?
            .set_default("keys.public_key_path", "public.pem")?
            .set_default("jwt.issuer", auth::JwtHandler::DEFAULT_ISSUER)?
            .set_default("jwt.expiration_hours", auth::JwtHandler::DEFAULT_EXPIRATION_HOURS)?
            .set_default("jwt.leeway_seconds", 0)?
            .set_default("password.cost", auth::PasswordHasher::DEFAULT_COST)?
            .set_default("bootstrap.username", "admin")?
            .set_default("bootstrap.password", "Password123!")
    }
}
