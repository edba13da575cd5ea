use super::defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub performance: PerformanceSettings,
    #[serde(default)]
    pub security: SecuritySettings,
    #[serde(default)]
    pub generation: GenerationSettings,
    #[serde(default)]
    pub dataset: DatasetSettings,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Number of HTTP workers; 0 means one per CPU core
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
        }
    }
}

impl ServerSettings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for log files (default: "./logs")
    #[serde(default = "default_logs_path")]
    pub logs_path: String,
    #[serde(default = "default_true")]
    pub log_to_console: bool,
    /// "compact" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Optional per-target log level overrides
    /// Configure via a TOML table:
    /// [logging.targets]
    /// "sql::exec" = "debug"
    /// actix_web = "info"
    #[serde(default)]
    pub targets: HashMap<String, String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            logs_path: default_logs_path(),
            log_to_console: true,
            format: default_log_format(),
            targets: HashMap::new(),
        }
    }
}

/// HTTP connection tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSettings {
    #[serde(default = "default_keepalive_timeout")]
    pub keepalive_timeout: u64,
    /// Time allowed for a client to send complete request headers (seconds)
    #[serde(default = "default_client_request_timeout")]
    pub client_request_timeout: u64,
    #[serde(default = "default_client_disconnect_timeout")]
    pub client_disconnect_timeout: u64,
    #[serde(default = "default_backlog")]
    pub backlog: u32,
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        Self {
            keepalive_timeout: default_keepalive_timeout(),
            client_request_timeout: default_client_request_timeout(),
            client_disconnect_timeout: default_client_disconnect_timeout(),
            backlog: default_backlog(),
        }
    }
}

/// Security settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecuritySettings {
    #[serde(default)]
    pub cors: CorsSettings,

    /// Maximum request body size in bytes (default: 10MB)
    #[serde(default = "default_max_request_body_size")]
    pub max_request_body_size: usize,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            cors: CorsSettings::default(),
            max_request_body_size: default_max_request_body_size(),
        }
    }
}

/// CORS configuration that maps directly to actix-cors options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins. Empty list or ["*"] allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    #[serde(default = "default_cors_methods")]
    pub allowed_methods: Vec<String>,

    /// Allowed HTTP headers. Use ["*"] for any header.
    #[serde(default = "default_cors_headers")]
    pub allowed_headers: Vec<String>,

    /// Preflight cache max age in seconds
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allowed_methods: default_cors_methods(),
            allowed_headers: default_cors_headers(),
            max_age: default_cors_max_age(),
        }
    }
}

/// Natural-language to SQL generation (Gemini REST API)
#[derive(Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// API key; usually supplied through GEMINI_API_KEY instead of the file
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_generation_model")]
    pub model: String,
    /// Base URL of the Generative Language API
    #[serde(default = "default_generation_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_generation_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_generation_model(),
            endpoint: default_generation_endpoint(),
            timeout_secs: default_generation_timeout_secs(),
        }
    }
}

// Keeps the API key out of debug logs.
impl std::fmt::Debug for GenerationSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Shared demo dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSettings {
    /// Seed the library/customer demo tables at startup
    #[serde(default = "default_true")]
    pub seed: bool,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self { seed: true }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            server: ServerSettings::default(),
            logging: LoggingSettings::default(),
            performance: PerformanceSettings::default(),
            security: SecuritySettings::default(),
            generation: GenerationSettings::default(),
            dataset: DatasetSettings::default(),
        }
    }
}
