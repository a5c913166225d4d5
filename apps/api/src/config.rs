use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_GENERATE_URL: &str = "http://127.0.0.1:8080/api/generate";
pub const DEFAULT_HISTORY_PATH: &str = "applications.json";

/// Server configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub port: u16,
    pub rust_log: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(ServerConfig {
            openai_api_key: var("OPENAI_API_KEY").with_context(|| {
                "Required environment variable 'OPENAI_API_KEY' is not set".to_string()
            })?,
            openai_base_url: var("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            openai_model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            port: var("PORT")
                .map(|p| p.parse::<u16>())
                .transpose()
                .context("PORT must be a valid port number")?
                .unwrap_or(DEFAULT_PORT),
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        ServerConfig {
            openai_api_key: "sk-test".to_string(),
            openai_base_url: DEFAULT_BASE_URL.to_string(),
            openai_model: DEFAULT_MODEL.to_string(),
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

/// Terminal client configuration. Every field has a default.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub generate_url: String,
    pub history_path: PathBuf,
    pub rust_log: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        ClientConfig {
            generate_url: var("COVERGEN_URL").unwrap_or_else(|| DEFAULT_GENERATE_URL.to_string()),
            history_path: var("COVERGEN_HISTORY")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_PATH)),
            rust_log: var("RUST_LOG").unwrap_or_else(|| "warn".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_server_config_requires_api_key() {
        let err = ServerConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-1")])).unwrap();
        assert_eq!(config.openai_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.openai_model, DEFAULT_MODEL);
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_server_config_rejects_bad_port() {
        let err = ServerConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-1"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_client_config_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("COVERGEN_URL", "http://example.test/api/generate"),
            ("COVERGEN_HISTORY", "/tmp/history.json"),
        ]));
        assert_eq!(config.generate_url, "http://example.test/api/generate");
        assert_eq!(config.history_path, PathBuf::from("/tmp/history.json"));
        assert_eq!(config.rust_log, "warn");
    }
}
