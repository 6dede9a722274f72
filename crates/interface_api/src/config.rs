//! API configuration

use domain_mailchimp::MailChimpConfig;
use infra_db::DatabaseConfig;
use serde::Deserialize;
use std::time::Duration;

/// API configuration
///
/// Every field can be set through an `API_`-prefixed environment variable,
/// e.g. `API_PORT` or `API_MAILCHIMP_API_KEY`. Unset fields keep their defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Upper bound of the connection pool
    pub database_max_connections: u32,
    /// Server-side statement timeout in seconds; 0 disables it
    pub database_statement_timeout_secs: u64,
    /// Log level
    pub log_level: String,
    /// MailChimp API key, `<key>-<data center>`
    pub mailchimp_api_key: String,
    /// Overrides the MailChimp API root derived from the key
    pub mailchimp_base_url: Option<String>,
    /// MailChimp request timeout in seconds
    pub mailchimp_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/mailchimp".to_string(),
            database_max_connections: 10,
            database_statement_timeout_secs: 0,
            log_level: "info".to_string(),
            mailchimp_api_key: String::new(),
            mailchimp_base_url: None,
            mailchimp_timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Settings for the connection pool
    pub fn database(&self) -> DatabaseConfig {
        let config = DatabaseConfig::new(self.database_url.clone())
            .pool_size(1, self.database_max_connections);
        match self.database_statement_timeout_secs {
            0 => config,
            secs => config.statement_timeout(Duration::from_secs(secs)),
        }
    }

    /// Settings for the MailChimp adapter
    pub fn mailchimp(&self) -> MailChimpConfig {
        MailChimpConfig {
            api_key: self.mailchimp_api_key.clone(),
            base_url: self.mailchimp_base_url.clone(),
            timeout_secs: self.mailchimp_timeout_secs,
        }
    }
}
