//! Configuration management for Formular Server

use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub inference: InferenceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    /// API key for the inference provider; absent means fallback-only mode
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            inference: InferenceConfig {
                api_key: None,
                model: "gpt-4.1-mini".to_string(),
                base_url: "https://api.openai.com/v1".to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.server.port),
            },
            inference: InferenceConfig {
                api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
                model: env::var("INFERENCE_MODEL").unwrap_or(defaults.inference.model),
                base_url: env::var("INFERENCE_BASE_URL").unwrap_or(defaults.inference.base_url),
            },
        }
    }
}
