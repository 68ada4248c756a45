//! Periodic re-fetch of whichever view is on screen.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::routing::{SessionState, View, ViewCollaborators};

/// 既定の更新間隔
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(2000);

/// Auto-refresh driver.
///
/// At most one timer task exists at a time. The driver never looks at fetch
/// results; a failed fetch is simply repeated on the next tick.
pub struct AutoRefresh {
    period: Duration,
    state: SessionState,
    collaborators: Arc<dyn ViewCollaborators>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl AutoRefresh {
    pub fn new(state: SessionState, collaborators: Arc<dyn ViewCollaborators>) -> Self {
        Self {
            period: DEFAULT_REFRESH_INTERVAL,
            state,
            collaborators,
            task: Mutex::new(None),
        }
    }

    /// Zero is bumped to one millisecond.
    pub fn with_interval(mut self, period: Duration) -> Self {
        self.period = period.max(Duration::from_millis(1));
        self
    }

    pub fn interval(&self) -> Duration {
        self.period
    }

    fn task(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.task.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Arms the timer unless it is already running. The first tick comes one
    /// full period after the call.
    ///
    /// Returns `true` if a timer was armed by this call. Outside a tokio
    /// runtime nothing is armed.
    pub fn start(&self) -> bool {
        let mut task = self.task();
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            return false;
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!("auto refresh needs a tokio runtime: {}", e);
                return false;
            }
        };

        let period = self.period;
        let state = self.state.clone();
        let collaborators = self.collaborators.clone();

        *task = Some(runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                refresh_active_view(&state, collaborators.as_ref());
            }
        }));

        debug!(period_ms = period.as_millis() as u64, "auto refresh started");
        true
    }

    /// Cancels the timer. Returns `true` if one was running.
    pub fn stop(&self) -> bool {
        match self.task().take() {
            Some(handle) => {
                handle.abort();
                debug!("auto refresh stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task().as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One refresh tick: dashboard or logs fetch depending on the active view.
/// Returns the view that was refreshed, if any.
pub fn refresh_active_view(
    state: &SessionState,
    collaborators: &dyn ViewCollaborators,
) -> Option<View> {
    match state.current_view() {
        View::Dashboard => {
            collaborators.fetch_dashboard();
            Some(View::Dashboard)
        }
        View::Logs => {
            collaborators.fetch_logs();
            Some(View::Logs)
        }
        _ => None,
    }
}
