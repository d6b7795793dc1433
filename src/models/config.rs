use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use validator::Validate;

/// Configuration options for the milestone tracker server.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct ServerConfig {
    /// Interface to bind the HTTP server to.
    #[validate(length(min = 1))]
    pub address: String,
    pub port: u16,
    /// Path of the SQLite database file.
    #[validate(length(min = 1))]
    pub database_url: String,
    /// Master secret for session and flash message cookies.
    #[validate(length(min = 32))]
    pub secret: String,
    /// Glob passed to Tera, e.g. `templates/**/*`.
    #[validate(length(min = 1))]
    pub templates_dir: String,
    /// Directory served under `/assets`.
    #[validate(length(min = 1))]
    pub assets_dir: String,
    /// Admin account ensured on startup.
    #[validate(email)]
    pub admin_email: String,
    #[validate(length(min = 8))]
    pub admin_password: String,
}

impl ServerConfig {
    /// Load settings from `config/default.yaml`, an optional
    /// `config/{APP_ENV}.yaml` overlay and `APP_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());

        Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(Environment::with_prefix("APP").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
