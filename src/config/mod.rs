mod loader;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use loader::load_config;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
        }
    }
}

/// Relay server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8787,
            host: "0.0.0.0".to_string(),
        }
    }
}

/// Upstream Gemini API configuration
///
/// Holds everything needed to address the upstream endpoint EXCEPT the
/// credential itself. Only the NAME of the environment variable carrying the
/// API key lives here; the value is read from the process environment per
/// invocation and never persisted or logged.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Upstream base URL (e.g., "https://generativelanguage.googleapis.com")
    #[serde(default = "default_upstream_url")]
    pub url: String,
    /// Model identifier (e.g., "gemini-2.0-flash")
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_upstream_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl UpstreamConfig {
    /// Returns the base URL with trailing slash stripped
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Full `generateContent` endpoint URL, without the key query parameter.
    /// The key is appended at call time and discarded after the call.
    pub fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url(),
            self.model
        )
    }

    /// Model-listing endpoint, used by the `test-upstream` connectivity probe
    pub fn models_url(&self) -> String {
        format!("{}/v1beta/models", self.base_url())
    }

    /// Reads the credential from the process environment.
    ///
    /// Empty values count as unset; some shells export empty strings for
    /// variables that were never configured.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.is_empty())
    }

    /// Validate the upstream URL shape
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.url)
            .map_err(|e| ConfigError::Validation(format!("invalid upstream URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "upstream URL must be http(s), got scheme {:?}",
                parsed.scheme()
            )));
        }
        if self.model.is_empty() {
            return Err(ConfigError::Validation("model must not be empty".to_string()));
        }
        if self.api_key_env.is_empty() {
            return Err(ConfigError::Validation(
                "api_key_env must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        load_config(path)
    }

    /// Load configuration with fallback to default path
    pub fn load_or_default(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        match config_path {
            Some(path) => Self::from_file(path),
            None => {
                let default_paths = ["config.yaml", "config.yml", "./config/config.yaml"];
                for p in default_paths {
                    let path = Path::new(p);
                    if path.exists() {
                        return Self::from_file(path);
                    }
                }
                // No file at all is fine for this relay: all fields default.
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.upstream.validate()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_config_default() {
        let config = UpstreamConfig::default();
        assert_eq!(config.url, "https://generativelanguage.googleapis.com");
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.api_key_env, "GEMINI_API_KEY");
    }

    #[test]
    fn test_generate_url() {
        let config = UpstreamConfig::default();
        assert_eq!(
            config.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_generate_url_trailing_slash() {
        let config = UpstreamConfig {
            url: "http://localhost:9090/".to_string(),
            ..UpstreamConfig::default()
        };
        assert_eq!(
            config.generate_url(),
            "http://localhost:9090/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_models_url() {
        let config = UpstreamConfig::default();
        assert_eq!(
            config.models_url(),
            "https://generativelanguage.googleapis.com/v1beta/models"
        );
    }

    #[test]
    fn test_api_key_missing_env() {
        let config = UpstreamConfig {
            api_key_env: "REPORT_PROXY_TEST_KEY_DEFINITELY_UNSET".to_string(),
            ..UpstreamConfig::default()
        };
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_api_key_empty_counts_as_unset() {
        let var = "REPORT_PROXY_TEST_KEY_EMPTY";
        std::env::set_var(var, "");
        let config = UpstreamConfig {
            api_key_env: var.to_string(),
            ..UpstreamConfig::default()
        };
        assert!(config.api_key().is_none());
        std::env::remove_var(var);
    }

    #[test]
    fn test_api_key_present() {
        let var = "REPORT_PROXY_TEST_KEY_PRESENT";
        std::env::set_var(var, "sk-test");
        let config = UpstreamConfig {
            api_key_env: var.to_string(),
            ..UpstreamConfig::default()
        };
        assert_eq!(config.api_key().as_deref(), Some("sk-test"));
        std::env::remove_var(var);
    }

    #[test]
    fn test_validate_accepts_default() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = UpstreamConfig {
            url: "not a url".to_string(),
            ..UpstreamConfig::default()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::Validation(_)
        ));
    }

    #[test]
    fn test_validate_rejects_non_http_scheme() {
        let config = UpstreamConfig {
            url: "ftp://example.com".to_string(),
            ..UpstreamConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_model() {
        let config = UpstreamConfig {
            model: String::new(),
            ..UpstreamConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8787);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::NotFound("test.yaml".to_string());
        assert!(err.to_string().contains("test.yaml"));

        let err = ConfigError::Validation("invalid URL".to_string());
        assert!(err.to_string().contains("invalid URL"));
    }
}
