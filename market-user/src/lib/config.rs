use std::env;
use std::time::Duration;

use auth::HashParams;
use auth::TokenConfig;
use auth::TokenError;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Deadline for a single query or transaction
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default = "default_timeout_seconds")]
    pub shutdown_timeout_seconds: u64,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_token_minutes")]
    pub timeout_minutes: i64,
    #[serde(default = "default_token_minutes")]
    pub max_refresh_minutes: i64,
    #[serde(default = "default_token_lookup")]
    pub token_lookup: String,
    #[serde(default = "default_token_head_name")]
    pub token_head_name: String,
}

impl JwtConfig {
    /// Build the token settings, parsing the lookup order.
    ///
    /// # Errors
    /// * `ConfigError` - A lifetime is not a positive number of minutes, or
    ///   the lookup string does not parse
    pub fn token_config(&self) -> Result<TokenConfig, ConfigError> {
        let lookup = self
            .token_lookup
            .parse()
            .map_err(|e: TokenError| ConfigError::Message(format!("jwt.token_lookup: {}", e)))?;

        Ok(TokenConfig {
            timeout: positive_minutes("jwt.timeout_minutes", self.timeout_minutes)?,
            max_refresh: positive_minutes("jwt.max_refresh_minutes", self.max_refresh_minutes)?,
            lookup,
            head_name: self.token_head_name.clone(),
        })
    }
}

fn positive_minutes(key: &str, minutes: i64) -> Result<chrono::Duration, ConfigError> {
    if minutes <= 0 {
        return Err(ConfigError::Message(format!(
            "{} must be positive, got {}",
            key, minutes
        )));
    }

    chrono::Duration::try_minutes(minutes)
        .ok_or_else(|| ConfigError::Message(format!("{} is out of range: {}", key, minutes)))
}

// The secret never shows up in logs.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("timeout_minutes", &self.timeout_minutes)
            .field("max_refresh_minutes", &self.max_refresh_minutes)
            .field("token_lookup", &self.token_lookup)
            .field("token_head_name", &self.token_head_name)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
    pub salt_length: usize,
    pub key_length: usize,
    /// Deadline for a single hash or verify call
    pub timeout_seconds: u64,
}

impl PasswordConfig {
    pub fn hash_params(&self) -> HashParams {
        HashParams {
            memory_kib: self.memory_kib,
            iterations: self.iterations,
            parallelism: self.parallelism,
            salt_length: self.salt_length,
            key_length: self.key_length,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        let params = HashParams::default();
        Self {
            memory_kib: params.memory_kib,
            iterations: params.iterations,
            parallelism: params.parallelism,
            salt_length: params.salt_length,
            key_length: params.key_length,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_timeout_seconds() -> u64 {
    5
}

fn default_http_port() -> u16 {
    9090
}

fn default_token_minutes() -> i64 {
    60
}

fn default_token_lookup() -> String {
    auth::TokenLookup::DEFAULT.to_string()
}

fn default_token_head_name() -> String {
    "Bearer".to_string()
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__HOST, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// # Errors
    /// * `ConfigError` - A source failed to load, a required value is missing,
    ///   or `jwt.secret` is empty
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret must be set (JWT__SECRET)".to_string(),
            ));
        }

        self.jwt.token_config()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Result<Config, ConfigError> {
        let config: Config = ConfigBuilder::builder()
            .add_source(File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    const BASE: &str = r#"
        [database]
        host = "localhost"
        port = 5432
        user = "postgres"
        password = "postgres"
        name = "stock_db"

        [server]
        http_port = 8080
    "#;

    #[test]
    fn test_defaults_applied() {
        let config = from_toml(&format!("{}\n[jwt]\nsecret = \"s3cret\"\n", BASE)).unwrap();

        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.timeout(), Duration::from_secs(5));
        assert_eq!(config.password.hash_params(), HashParams::default());

        let tokens = config.jwt.token_config().unwrap();
        assert_eq!(tokens.timeout, chrono::Duration::hours(1));
        assert_eq!(tokens.max_refresh, chrono::Duration::hours(1));
        assert_eq!(tokens.head_name, "Bearer");
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        assert!(from_toml(BASE).is_err());
        assert!(from_toml(&format!("{}\n[jwt]\nsecret = \"  \"\n", BASE)).is_err());
    }

    #[test]
    fn test_invalid_lookup_is_fatal() {
        let toml = format!(
            "{}\n[jwt]\nsecret = \"s3cret\"\ntoken_lookup = \"param: id\"\n",
            BASE
        );
        assert!(from_toml(&toml).is_err());
    }

    #[test]
    fn test_non_positive_or_huge_token_minutes_are_fatal() {
        for (key, value) in [
            ("timeout_minutes", "0"),
            ("timeout_minutes", "-5"),
            ("max_refresh_minutes", "0"),
            ("max_refresh_minutes", "9223372036854775807"),
        ] {
            let toml = format!("{}\n[jwt]\nsecret = \"s3cret\"\n{} = {}\n", BASE, key, value);
            assert!(
                matches!(from_toml(&toml), Err(ConfigError::Message(_))),
                "{} = {} should be rejected",
                key,
                value
            );
        }
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = from_toml(&format!("{}\n[jwt]\nsecret = \"s3cret\"\n", BASE)).unwrap();
        assert!(!format!("{:?}", config.jwt).contains("s3cret"));
    }
}
