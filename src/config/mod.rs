//! Layered configuration: defaults, optional TOML file, `QLOG_*` environment
//! variables, then command line overrides.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{
    ClientConfig, DashboardConfig, LogFormat, LoggingConfig, RefreshConfig, RotationStrategy,
    ViewConfig,
};
