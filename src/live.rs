//! Live collaborators backed by the qLog API.
//!
//! Every trigger spawns its fetch on the current tokio runtime and returns
//! immediately. Results are published on `watch` channels; failures are
//! logged and leave the previous value in place.

use chrono::{DateTime, Local};
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::charts::{ChartHost, ChartSet};
use crate::client::{ApiClient, LogQuery};
use crate::error::Result;
use crate::modules::{ModuleCard, ModuleManager};
use crate::routing::{Filters, SessionState, View, ViewCollaborators};
use crate::types::{LogEntry, SavedView, ServerInfo, Stats};

/// Rows shown in the dashboard's "recent logs" table.
pub const RECENT_LOG_LIMIT: usize = 10;

/// Everything the dashboard view shows after one refresh.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    /// `None` when the server info request failed.
    pub server_info: Option<ServerInfo>,
    pub stats: Stats,
    pub recent_logs: Vec<LogEntry>,
    pub charts: ChartSet,
    pub fetched_at: DateTime<Local>,
}

#[derive(Debug, Clone)]
pub struct LogsPage {
    pub page: usize,
    pub offset: usize,
    pub filters: Filters,
    pub entries: Vec<LogEntry>,
}

struct Channels {
    dashboard: watch::Sender<Option<Arc<DashboardSnapshot>>>,
    logs: watch::Sender<Option<Arc<LogsPage>>>,
    view_display: watch::Sender<Option<Arc<SavedView>>>,
    modules: watch::Sender<Option<Arc<Vec<ModuleCard>>>>,
    active_view: watch::Sender<View>,
}

struct Inner {
    client: ApiClient,
    modules: ModuleManager,
    state: SessionState,
    charts: Mutex<ChartSet>,
    channels: Channels,
}

/// [`ViewCollaborators`] that talk to the server.
#[derive(Clone)]
pub struct LiveViews {
    inner: Arc<Inner>,
}

impl LiveViews {
    pub fn new(client: ApiClient, state: SessionState, host: &dyn ChartHost) -> Self {
        let active = state.current_view();
        Self {
            inner: Arc::new(Inner {
                modules: ModuleManager::new(client.clone()),
                client,
                state,
                charts: Mutex::new(ChartSet::init(host)),
                channels: Channels {
                    dashboard: watch::Sender::new(None),
                    logs: watch::Sender::new(None),
                    view_display: watch::Sender::new(None),
                    modules: watch::Sender::new(None),
                    active_view: watch::Sender::new(active),
                },
            }),
        }
    }

    pub fn subscribe_dashboard(&self) -> watch::Receiver<Option<Arc<DashboardSnapshot>>> {
        self.inner.channels.dashboard.subscribe()
    }

    pub fn subscribe_logs(&self) -> watch::Receiver<Option<Arc<LogsPage>>> {
        self.inner.channels.logs.subscribe()
    }

    pub fn subscribe_view_display(&self) -> watch::Receiver<Option<Arc<SavedView>>> {
        self.inner.channels.view_display.subscribe()
    }

    pub fn subscribe_modules(&self) -> watch::Receiver<Option<Arc<Vec<ModuleCard>>>> {
        self.inner.channels.modules.subscribe()
    }

    pub fn subscribe_active_view(&self) -> watch::Receiver<View> {
        self.inner.channels.active_view.subscribe()
    }

    /// Server info, stats and recent logs in one pass. A failed server info
    /// request is tolerated; the other two are not.
    pub async fn load_dashboard(&self) -> Result<Arc<DashboardSnapshot>> {
        let client = &self.inner.client;

        let server_info = match client.server_info().await {
            Ok(info) => Some(info),
            Err(e) => {
                warn!("error fetching server info: {}", e);
                None
            }
        };
        let stats = client.stats().await?;
        let recent_logs = client.logs(&LogQuery::recent(RECENT_LOG_LIMIT)).await?;

        let fetched_at = Local::now();
        let charts = {
            let mut charts = self.inner.charts.lock().unwrap_or_else(|e| e.into_inner());
            charts.apply_stats(&stats);
            charts.push_trend_point(fetched_at.format("%H:%M:%S").to_string(), stats.total);
            charts.clone()
        };

        let snapshot = Arc::new(DashboardSnapshot {
            server_info,
            stats,
            recent_logs,
            charts,
            fetched_at,
        });
        self.inner.channels.dashboard.send_replace(Some(snapshot.clone()));
        Ok(snapshot)
    }

    /// Current page of the log list under the current filters.
    pub async fn load_logs(&self) -> Result<Arc<LogsPage>> {
        let (query, page, offset, filters) = {
            let state = self.inner.state.read();
            (
                LogQuery::from_state(&state.view, &state.filters),
                state.view.current_page,
                state.view.offset(),
                state.filters.clone(),
            )
        };

        let entries = self.inner.client.logs(&query).await?;
        debug!(page, count = entries.len(), "logs loaded");

        let page = Arc::new(LogsPage {
            page,
            offset,
            filters,
            entries,
        });
        self.inner.channels.logs.send_replace(Some(page.clone()));
        Ok(page)
    }

    pub async fn load_view(&self, id: &str) -> Result<Arc<SavedView>> {
        let view = Arc::new(self.inner.client.view(id).await?);
        self.inner
            .channels
            .view_display
            .send_replace(Some(view.clone()));
        Ok(view)
    }

    pub async fn load_modules(&self) -> Result<Arc<Vec<ModuleCard>>> {
        let modules = Arc::new(self.inner.modules.fetch_modules().await?);
        self.inner.channels.modules.send_replace(Some(modules.clone()));
        Ok(modules)
    }

    fn spawn<Fut, T>(&self, what: &'static str, fut: Fut)
    where
        Fut: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    if let Err(e) = fut.await {
                        warn!("error fetching {}: {}", what, e);
                    }
                });
            }
            Err(_) => warn!("no runtime, skipping {} fetch", what),
        }
    }
}

impl ViewCollaborators for LiveViews {
    fn fetch_dashboard(&self) {
        let this = self.clone();
        self.spawn("dashboard", async move { this.load_dashboard().await });
    }

    fn fetch_logs(&self) {
        let this = self.clone();
        self.spawn("logs", async move { this.load_logs().await });
    }

    fn show_view(&self, view: &View, update_url: bool) {
        let (title, _) = view.title();
        info!(view = %view, title, "showing view");
        self.inner.channels.active_view.send_replace(view.clone());

        match view {
            View::Dashboard => self.fetch_dashboard(),
            // a URL-driven load fetches logs itself
            View::Logs if update_url => self.fetch_logs(),
            View::Modules => {
                let this = self.clone();
                self.spawn("modules", async move { this.load_modules().await });
            }
            _ => {}
        }
    }

    fn load_view_display(&self, id: &str, _update_url: bool) {
        self.inner
            .channels
            .active_view
            .send_replace(View::ViewDisplay);
        let this = self.clone();
        let id = id.to_string();
        self.spawn("view", async move { this.load_view(&id).await });
    }

    fn update_filter_ui(&self) {
        let filters = self.inner.state.read().filters.clone();
        debug!(?filters, "filters loaded");
    }
}
