use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// API server connection
    pub server: ClientConfig,

    /// Auto-refresh settings
    pub refresh: RefreshConfig,

    /// View defaults
    pub view: ViewConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Connection settings for the qLog API server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Origin of the dashboard server, e.g. `http://127.0.0.1:8080`
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_seconds: Option<u64>,

    /// Value of an already issued session cookie (`name=value`)
    pub session_cookie: Option<String>,

    /// Basic auth username
    pub username: Option<String>,

    /// Basic auth password
    pub password: Option<String>,
}

/// Auto-refresh configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Start the refresh timer after the initial load
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Tick period in milliseconds
    pub interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Log rows per page
    pub page_size: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or EnvFilter directive (error, warn, info, debug, trace)
    pub level: String,

    /// Log format
    pub format: LogFormat,

    /// Write to stderr
    #[serde(default = "default_true")]
    pub console: bool,

    /// Directory for rolling log files; file output is off when unset
    pub directory: Option<PathBuf>,

    /// File rotation strategy
    pub rotation: Option<RotationStrategy>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    /// Pretty-printed format
    #[serde(rename = "pretty")]
    Pretty,

    /// JSON format
    #[serde(rename = "json")]
    Json,

    /// Compact format
    #[serde(rename = "compact")]
    Compact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationStrategy {
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "hourly")]
    Hourly,
    #[serde(rename = "never")]
    Never,
}

fn default_true() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout_seconds: Some(30),
            session_cookie: None,
            username: None,
            password: None,
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 2000,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self { page_size: 50 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            console: true,
            directory: None,
            rotation: None,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            server: ClientConfig::default(),
            refresh: RefreshConfig::default(),
            view: ViewConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// サンプル設定ファイルの内容を生成
    pub fn sample_toml() -> Result<String, toml::ser::Error> {
        let sample = DashboardConfig {
            server: ClientConfig {
                session_cookie: Some("session=your_session_token".to_string()),
                ..ClientConfig::default()
            },
            ..DashboardConfig::default()
        };

        let body = toml::to_string_pretty(&sample)?;
        Ok(format!(
            "# qlog-dashboard configuration\n\
             # Save as qlog-dashboard.toml. Environment overrides use the QLOG_ prefix,\n\
             # e.g. QLOG_SERVER__BASE_URL=http://10.0.0.5:8080\n\n{}",
            body
        ))
    }
}
