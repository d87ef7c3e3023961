use std::env;

use thiserror::Error;

const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
const DEFAULT_SERVER_PORT: u16 = 3000;

/// Errors raised while reading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("environment variable {0} is required")]
    Missing(&'static str),
    /// A variable is set but does not parse.
    #[error("environment variable {0} has an invalid value")]
    Invalid(&'static str),
}

/// Represents the application configuration.
#[derive(Debug)]
pub struct Config {
    /// The Telegram bot token.
    pub telegram_bot_token: String,
    /// The Telegram chat the relay posts into.
    pub telegram_chat_id: i64,
    /// The TMDB API key.
    pub tmdb_api_key: String,
    /// The base URL of the TMDB API.
    pub tmdb_base_url: String,
    /// Host the webhook server binds to.
    pub server_host: String,
    /// Port the webhook server binds to.
    pub server_port: u16,
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            telegram_bot_token: require("TELOXIDE_TOKEN")?,
            telegram_chat_id: require("TELEGRAM_CHAT_ID")?
                .parse()
                .map_err(|_| ConfigError::Invalid("TELEGRAM_CHAT_ID"))?,
            tmdb_api_key: require("TMDB_API_KEY")?,
            tmdb_base_url: env::var("TMDB_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_TMDB_BASE_URL.to_string()),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: match env::var("SERVER_PORT") {
                Ok(v) => v.parse().map_err(|_| ConfigError::Invalid("SERVER_PORT"))?,
                Err(_) => DEFAULT_SERVER_PORT,
            },
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}
