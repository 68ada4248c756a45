//! Command line definitions.

use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

use qlog_dashboard::format::Severity;
use qlog_dashboard::routing::{DateSpan, Filters, View, DEFAULT_DATE_RANGE};

#[derive(Parser)]
#[command(
    name = "qlog-dashboard",
    version,
    about = "Headless client for the qLog syslog dashboard"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "QLOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Dashboard origin, e.g. http://127.0.0.1:8080
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Log level or filter directive
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load a dashboard location and keep its view refreshed
    Watch {
        /// Dashboard URL or path with query, e.g. "/?view=logs&severity=3"
        #[arg(short, long, default_value = "/")]
        location: String,

        /// Do not start the refresh timer
        #[arg(long)]
        no_refresh: bool,
    },

    /// Device module management
    #[command(subcommand)]
    Modules(ModulesCommand),

    /// Print the canonical dashboard URL for a view and filter set
    Url(UrlArgs),

    /// Print a sample configuration file
    SampleConfig,
}

#[derive(Subcommand)]
pub enum ModulesCommand {
    /// List modules with their status
    List {
        /// Print the rendered HTML cards instead of a table
        #[arg(long)]
        html: bool,
    },

    /// Enable or disable one module
    #[command(group(ArgGroup::new("state").required(true).args(["enable", "disable"])))]
    Toggle {
        device_type: String,

        #[arg(long)]
        enable: bool,

        #[arg(long)]
        disable: bool,
    },
}

#[derive(Args)]
pub struct UrlArgs {
    /// Path the query is appended to
    #[arg(long, default_value = "/")]
    pub path: String,

    #[arg(long, default_value = "dashboard")]
    pub view: String,

    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=7))]
    pub severity: Option<u8>,

    #[arg(long, default_value = "")]
    pub device: String,

    #[arg(long, default_value = "")]
    pub device_type: String,

    #[arg(long, default_value = "")]
    pub event_type: String,

    #[arg(long, default_value = DEFAULT_DATE_RANGE)]
    pub date_range: String,

    #[arg(long, requires = "date_to")]
    pub date_from: Option<String>,

    #[arg(long, requires = "date_from")]
    pub date_to: Option<String>,

    #[arg(long, default_value = "")]
    pub search: String,

    #[arg(long, default_value_t = 0)]
    pub page: usize,
}

impl UrlArgs {
    pub fn view(&self) -> View {
        View::parse(&self.view)
    }

    pub fn filters(&self) -> Filters {
        let span = match (&self.date_from, &self.date_to) {
            (Some(from), Some(to)) => DateSpan::new(from.as_str(), to.as_str()),
            _ => None,
        };
        Filters {
            severity: self.severity.and_then(Severity::new),
            device: self.device.clone(),
            device_type: self.device_type.clone(),
            event_type: self.event_type.clone(),
            date_range: Some(self.date_range.clone()),
            date_span: span,
            search: self.search.clone(),
        }
    }
}
