//! Configuration module for Sibyl.

use crate::error::{Result, SibylError};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Default model artifact location, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "user_behavior_model.bin";

/// Main configuration for a Sibyl process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SibylConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Model artifact configuration.
    #[serde(default)]
    pub model: ModelConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl SibylConfig {
    /// Load configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SibylError::Config(format!("Failed to read config file: {}", e))
        })?;

        let config: Self = serde_json::from_str(&content).map_err(|e| {
            SibylError::Config(format!("Failed to parse config: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.model.path.as_os_str().is_empty() {
            return Err(SibylError::InvalidConfig {
                field: "model.path".to_string(),
                reason: "Model path must not be empty".to_string(),
            });
        }

        if self.server.max_body_bytes == 0 {
            return Err(SibylError::InvalidConfig {
                field: "server.max_body_bytes".to_string(),
                reason: "Body limit must be non-zero".to_string(),
            });
        }

        if self.server.allowed_origins.is_empty() {
            return Err(SibylError::InvalidConfig {
                field: "server.allowed_origins".to_string(),
                reason: "At least one origin (or \"*\") is required".to_string(),
            });
        }

        Ok(())
    }

    /// Create a development configuration with debug output enabled.
    pub fn development() -> Self {
        Self {
            server: ServerConfig {
                debug: true,
                ..ServerConfig::default()
            },
            model: ModelConfig::default(),
            observability: ObservabilityConfig {
                log_level: "debug".to_string(),
                json_logs: false,
            },
        }
    }

    /// Effective log filter, taking the debug flag into account.
    pub fn log_level(&self) -> &str {
        if self.server.debug {
            "debug"
        } else {
            &self.observability.log_level
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener.
    pub bind_addr: SocketAddr,
    /// Debug mode: verbose logs and internal error details in responses.
    #[serde(default)]
    pub debug: bool,
    /// Origins allowed to make cross-origin requests ("*" for any).
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_max_body_bytes() -> usize {
    1024 * 1024 // 1MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            debug: false,
            allowed_origins: default_allowed_origins(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Model artifact configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the serialized model artifact.
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_MODEL_PATH),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level.
    pub log_level: String,
    /// Enable JSON logging.
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
