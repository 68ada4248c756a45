//! In-memory view and filter state shared by the synchronizer, the refresh
//! driver and the live views.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::format::Severity;

/// Default relative time window.
pub const DEFAULT_DATE_RANGE: &str = "24h";

/// Default number of log rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Top-level UI mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum View {
    #[default]
    Dashboard,
    Logs,
    Shared,
    ViewDisplay,
    Listeners,
    Views,
    Modules,
    Devices,
    Settings,
    /// Names this client does not know; kept verbatim so links survive.
    Other(CustomView),
}

/// Name of a view outside the known set. Never empty and never one of the
/// known names; only [`View::parse`] builds one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomView(String);

impl CustomView {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl View {
    pub fn as_str(&self) -> &str {
        match self {
            View::Dashboard => "dashboard",
            View::Logs => "logs",
            View::Shared => "shared",
            View::ViewDisplay => "view-display",
            View::Listeners => "listeners",
            View::Views => "views",
            View::Modules => "modules",
            View::Devices => "devices",
            View::Settings => "settings",
            View::Other(name) => name.as_str(),
        }
    }

    /// Empty input maps to the dashboard.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "" | "dashboard" => View::Dashboard,
            "logs" => View::Logs,
            "shared" => View::Shared,
            "view-display" => View::ViewDisplay,
            "listeners" => View::Listeners,
            "views" => View::Views,
            "modules" => View::Modules,
            "devices" => View::Devices,
            "settings" => View::Settings,
            other => View::Other(CustomView(other.to_string())),
        }
    }

    /// Same as [`parse`](Self::parse); known names map to their variant.
    pub fn other(name: impl Into<String>) -> Self {
        View::parse(&name.into())
    }

    pub fn is_default(&self) -> bool {
        *self == View::Dashboard
    }

    /// ヘッダーに表示するタイトルとサブタイトル
    pub fn title(&self) -> (&'static str, &'static str) {
        match self {
            View::Logs => ("Logs", "Browse and filter all syslog entries"),
            View::Listeners => (
                "Listeners",
                "Configure syslog listeners with different protocols and settings",
            ),
            View::Views => ("Views", "Create and manage custom dashboard views"),
            View::Modules => ("Modules", "Enable or disable device detection modules"),
            View::Devices => (
                "Devices",
                "Configure devices and bind them to listeners by IP address",
            ),
            View::Settings => ("Settings", "Configure your syslog server preferences"),
            _ => (
                "Dashboard",
                "Monitor and analyze syslog messages in real-time",
            ),
        }
    }
}

impl From<String> for View {
    fn from(raw: String) -> Self {
        View::parse(&raw)
    }
}

impl From<View> for String {
    fn from(view: View) -> String {
        view.as_str().to_string()
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit absolute window. Both ends are always present together and
/// non-empty; [`DateSpan::new`] is the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SpanFields")]
pub struct DateSpan {
    #[serde(rename = "date_from")]
    from: String,
    #[serde(rename = "date_to")]
    to: String,
}

#[derive(Deserialize)]
struct SpanFields {
    date_from: String,
    date_to: String,
}

impl TryFrom<SpanFields> for DateSpan {
    type Error = &'static str;

    fn try_from(fields: SpanFields) -> Result<Self, Self::Error> {
        DateSpan::new(fields.date_from, fields.date_to)
            .ok_or("date_from and date_to must both be set")
    }
}

impl DateSpan {
    /// Returns `None` unless both ends are non-empty.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Option<Self> {
        let (from, to) = (from.into(), to.into());
        if from.is_empty() || to.is_empty() {
            None
        } else {
            Some(Self { from, to })
        }
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }
}

/// Log filters. Empty strings mean "not filtered".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub severity: Option<Severity>,
    pub device: String,
    pub device_type: String,
    pub event_type: String,
    pub date_range: Option<String>,
    #[serde(flatten)]
    pub date_span: Option<DateSpan>,
    pub search: String,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            severity: None,
            device: String::new(),
            device_type: String::new(),
            event_type: String::new(),
            date_range: Some(DEFAULT_DATE_RANGE.to_string()),
            date_span: None,
            search: String::new(),
        }
    }
}

impl Filters {
    pub fn with_date_span(mut self, span: Option<DateSpan>) -> Self {
        self.date_span = span;
        self
    }

    /// `date_range == "custom"` with an explicit span present.
    pub fn uses_custom_span(&self) -> bool {
        self.date_range.as_deref() == Some("custom") && self.date_span.is_some()
    }
}

/// Which view is shown and which page of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub current_view: View,
    pub current_page: usize,
    pub page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            current_view: View::Dashboard,
            current_page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ViewState {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    pub fn offset(&self) -> usize {
        self.current_page.saturating_mul(self.page_size)
    }
}

/// Navigation data stored alongside every pushed history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub view: View,
    pub filters: Filters,
    pub page: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub view: ViewState,
    pub filters: Filters,
}

impl AppState {
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            view: self.view.current_view.clone(),
            filters: self.filters.clone(),
            page: self.view.current_page,
        }
    }
}

/// Shared handle on the session's [`AppState`].
///
/// Lock sections are short and synchronous; never hold a guard across an
/// `.await`.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    inner: Arc<RwLock<AppState>>,
}

impl SessionState {
    pub fn new(state: AppState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self::new(AppState {
            view: ViewState::with_page_size(page_size),
            filters: Filters::default(),
        })
    }

    pub fn read(&self) -> RwLockReadGuard<'_, AppState> {
        // a panicked writer leaves plain data behind; keep serving it
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, AppState> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn current_view(&self) -> View {
        self.read().view.current_view.clone()
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        self.read().snapshot()
    }
}
