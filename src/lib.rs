//! # qlog-dashboard
//!
//! Headless client for the qLog syslog monitoring dashboard.
//!
//! The browser dashboard keeps its whole navigation state (active view, log
//! filters, page) in the address bar. This crate models that state, the
//! two-way mapping to and from the query string, the auto-refresh timer that
//! re-fetches the active view, and the REST accessor the views are fed from.

pub mod charts;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod live;
pub mod logging;
pub mod modules;
pub mod refresh;
pub mod routing;
pub mod types;

pub use client::{ApiClient, LogQuery};
pub use error::{Error, Result};
pub use live::LiveViews;
pub use refresh::AutoRefresh;
pub use routing::{SessionState, StateSynchronizer, View};
