use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

/// Service configuration. Defaults are overridden by
/// `preop-feedback.toml`, then by `PREOP_`-prefixed environment
/// variables (e.g. `PREOP_SERVER__PORT=8080`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Hard cap on questions per uploaded questionnaire.
    pub max_questions: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3001,
            },
            database: DatabaseConfig {
                path: "preop-feedback.db".to_string(),
            },
            upload: UploadConfig { max_questions: 500 },
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file("preop-feedback.toml"))
            .merge(Env::prefixed("PREOP_").split("__"))
            .extract()
            .map_err(|e| AppError::Internal(format!("Failed to load configuration: {}", e)))
    }
}
