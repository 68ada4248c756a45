use super::types::DashboardConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File};

/// Configuration loader with builder pattern
pub struct ConfigLoader {
    config_file: Option<String>,
    load_env: bool,
    base_url: Option<String>,
    log_level: Option<String>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            config_file: None,
            load_env: false,
            base_url: None,
            log_level: None,
        }
    }

    /// Load configuration from file
    pub fn load_from_file(mut self, path: Option<&str>) -> Self {
        self.config_file = path.map(String::from);
        self
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Command line overrides, applied last
    pub fn with_overrides(mut self, base_url: Option<String>, log_level: Option<String>) -> Self {
        self.base_url = base_url;
        self.log_level = log_level;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Result<DashboardConfig> {
        let mut builder =
            Config::builder().add_source(Config::try_from(&DashboardConfig::default())?);

        if let Some(config_path) = &self.config_file {
            builder = builder.add_source(File::with_name(config_path).required(true));
        } else {
            builder = builder
                .add_source(File::with_name("qlog-dashboard").required(false))
                .add_source(File::with_name("config/qlog-dashboard").required(false));
        }

        if self.load_env {
            builder = builder.add_source(
                Environment::with_prefix("QLOG")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        builder = builder
            .set_override_option("server.base_url", self.base_url)?
            .set_override_option("logging.level", self.log_level)?;

        let config: DashboardConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        if config.view.page_size == 0 {
            anyhow::bail!("view.page_size must be positive");
        }
        if config.refresh.interval_ms == 0 {
            anyhow::bail!("refresh.interval_ms must be positive");
        }

        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
