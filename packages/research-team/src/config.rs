//! Application configuration loaded from environment variables.

use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::credentials::SecretString;

/// Default model for the coordinator. Orchestration gets the stronger model.
pub const DEFAULT_COORDINATOR_MODEL: &str = "gemini-1.5-pro-latest";

/// Default model for the specialists.
pub const DEFAULT_SPECIALIST_MODEL: &str = "gemini-1.5-flash-latest";

/// Configuration for the research team.
///
/// Missing required API keys are a fatal startup condition; `from_env`
/// returns an error and the binary exits with context.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: SecretString,
    pub tavily_api_key: SecretString,
    pub firecrawl_api_key: SecretString,
    pub coordinator_model: String,
    pub specialist_model: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Split out from `from_env` so tests don't have to mutate process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            google_api_key: lookup("GOOGLE_API_KEY")
                .context("GOOGLE_API_KEY must be set")?
                .into(),
            tavily_api_key: lookup("TAVILY_API_KEY")
                .context("TAVILY_API_KEY must be set")?
                .into(),
            firecrawl_api_key: lookup("FIRECRAWL_API_KEY")
                .context("FIRECRAWL_API_KEY must be set")?
                .into(),
            coordinator_model: lookup("COORDINATOR_AGENT_MODEL")
                .unwrap_or_else(|| DEFAULT_COORDINATOR_MODEL.to_string()),
            specialist_model: lookup("SPECIALIST_AGENT_MODEL")
                .unwrap_or_else(|| DEFAULT_SPECIALIST_MODEL.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_full_config() {
        let vars = vars(&[
            ("GOOGLE_API_KEY", "g-key"),
            ("TAVILY_API_KEY", "t-key"),
            ("FIRECRAWL_API_KEY", "f-key"),
            ("COORDINATOR_AGENT_MODEL", "gemini-exp"),
            ("SPECIALIST_AGENT_MODEL", "gemini-mini"),
        ]);

        let config = Config::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(config.google_api_key.expose(), "g-key");
        assert_eq!(config.coordinator_model, "gemini-exp");
        assert_eq!(config.specialist_model, "gemini-mini");
    }

    #[test]
    fn test_model_defaults() {
        let vars = vars(&[
            ("GOOGLE_API_KEY", "g-key"),
            ("TAVILY_API_KEY", "t-key"),
            ("FIRECRAWL_API_KEY", "f-key"),
        ]);

        let config = Config::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(config.coordinator_model, DEFAULT_COORDINATOR_MODEL);
        assert_eq!(config.specialist_model, DEFAULT_SPECIALIST_MODEL);
    }

    #[test]
    fn test_each_missing_key_is_fatal() {
        for missing in ["GOOGLE_API_KEY", "TAVILY_API_KEY", "FIRECRAWL_API_KEY"] {
            let vars = vars(&[
                ("GOOGLE_API_KEY", "g-key"),
                ("TAVILY_API_KEY", "t-key"),
                ("FIRECRAWL_API_KEY", "f-key"),
            ]);

            let err = Config::from_lookup(|k| {
                if k == missing {
                    None
                } else {
                    vars.get(k).cloned()
                }
            })
            .unwrap_err();

            assert!(err.to_string().contains(missing));
        }
    }
}
