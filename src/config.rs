use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use crate::error::{AppError, Result};

#[derive(Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub groq_api_key: String,
    pub youtube_api_key: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        // API keys are loaded as-is; a missing Groq key is caught by request
        // validation and a missing YouTube key surfaces as a failed title
        // lookup, so neither is an error at startup.
        let groq_api_key = env::var("GROQ_API_KEY").unwrap_or_default();
        let youtube_api_key = env::var("YOUTUBE_API_KEY").unwrap_or_default();

        // Load server configuration with defaults
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let server_addr = SocketAddr::new(ip, port);

        Ok(Config {
            server_addr,
            groq_api_key,
            youtube_api_key,
        })
    }

    /// A config with the given keys and a throwaway listen address.
    pub fn with_keys(groq_api_key: impl Into<String>, youtube_api_key: impl Into<String>) -> Self {
        Config {
            server_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            groq_api_key: groq_api_key.into(),
            youtube_api_key: youtube_api_key.into(),
        }
    }
}
