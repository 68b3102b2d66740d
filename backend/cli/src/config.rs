use std::collections::HashMap;
use std::path::PathBuf;

use exfil_sink_core::DEFAULT_FILENAME;
use exfil_sink_gateway::{ServerConfig, DEFAULT_PORT};
use exfil_sink_logging::LogOptions;

/// exfil-sink runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Directory uploads are written into
    pub upload_dir: PathBuf,
    /// Name used when a request carries no `filename` header
    pub default_filename: String,
    /// Log level
    pub log_level: String,
    /// Emit JSON log lines on stdout
    pub log_json: bool,
    /// Optional directory for a rolling NDJSON log
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            upload_dir: PathBuf::from("."),
            default_filename: DEFAULT_FILENAME.to_string(),
            log_level: "info".to_string(),
            log_json: false,
            log_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self::from_vars(&std::env::vars().collect())
    }

    /// Load configuration from a provided variable map (useful for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| vars.get(key).filter(|v| !v.is_empty()).cloned();

        Self {
            bind_address: get("EXFIL_SINK_BIND").unwrap_or(defaults.bind_address),
            port: get("EXFIL_SINK_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            upload_dir: get("EXFIL_SINK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            default_filename: get("EXFIL_SINK_DEFAULT_FILENAME")
                .unwrap_or(defaults.default_filename),
            log_level: get("EXFIL_SINK_LOG_LEVEL").unwrap_or(defaults.log_level),
            log_json: get("EXFIL_SINK_LOG_JSON")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.log_json),
            log_dir: get("EXFIL_SINK_LOG_DIR").map(PathBuf::from),
        }
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_address: self.bind_address.clone(),
            port: self.port,
            upload_dir: self.upload_dir.clone(),
            default_filename: self.default_filename.clone(),
        }
    }

    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            level: self.log_level.clone(),
            json: self.log_json,
            log_dir: self.log_dir.clone(),
        }
    }
}
