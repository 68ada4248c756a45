use std::sync::Arc;
use tracing::{debug, info};
use url::form_urlencoded;

use super::collaborators::ViewCollaborators;
use super::history::{History, Location};
use super::query::{serialize_query, QueryParams, PARAM_ID, PARAM_SHARE};
use super::state::{Filters, SessionState, View};

/// Path of the dedicated read-only shared view page.
pub const SHARED_VIEW_PATH: &str = "/shared";

/// What [`StateSynchronizer::load_state_from_url`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The shared view page owns its own initialization.
    SharedPage,
    /// Legacy `?share=` link; the browser was sent to the shared page.
    Redirected(String),
    /// A single saved view was handed to the view-display loader.
    ViewDisplay(String),
    /// Regular view, page and filters were loaded.
    Loaded {
        view: View,
        view_changed: bool,
        fetched_logs: bool,
    },
}

/// Keeps the session state and the address bar in step.
pub struct StateSynchronizer {
    state: SessionState,
    history: Arc<dyn History>,
    collaborators: Arc<dyn ViewCollaborators>,
}

impl StateSynchronizer {
    pub fn new(
        state: SessionState,
        history: Arc<dyn History>,
        collaborators: Arc<dyn ViewCollaborators>,
    ) -> Self {
        Self {
            state,
            history,
            collaborators,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn history(&self) -> &Arc<dyn History> {
        &self.history
    }

    /// Current state as a query string, without pushing anything.
    pub fn current_query(&self) -> String {
        let state = self.state.read();
        serialize_query(
            &state.view.current_view,
            &state.filters,
            state.view.current_page,
        )
    }

    /// Pushes a history entry for the current state.
    pub fn update_url(&self) {
        let snapshot = self.state.snapshot();
        let location = Location {
            path: self.history.location().path,
            query: serialize_query(&snapshot.view, &snapshot.filters, snapshot.page),
        };
        let url = location.href();
        debug!(url = %url, "push history entry");
        self.history.push_state(snapshot, &url);
    }

    /// Reconciles the session state with the current address.
    ///
    /// Never fails: missing or malformed parameters fall back to defaults.
    pub fn load_state_from_url(&self) -> LoadOutcome {
        let location = self.history.location();

        if location.is_shared_page() {
            debug!(path = %location.path, "shared view page, skipping state load");
            return LoadOutcome::SharedPage;
        }

        let params = QueryParams::parse(&location.query);

        if let Some(share_id) = params.get_non_empty(PARAM_SHARE) {
            let target = shared_view_url(share_id);
            info!(target = %target, "redirecting legacy share link");
            self.history.redirect(&target);
            return LoadOutcome::Redirected(target);
        }

        let view = params.view();
        if view == View::ViewDisplay {
            if let Some(id) = params.get_non_empty(PARAM_ID) {
                self.collaborators.load_view_display(id, false);
                return LoadOutcome::ViewDisplay(id.to_string());
            }
        }

        let view_changed = {
            let mut state = self.state.write();
            let changed = state.view.current_view != view;
            if changed {
                state.view.current_view = view.clone();
            }
            state.filters = params.filters();
            state.view.current_page = params.page();
            changed
        };

        // the URL already says where we are; do not push it again
        if view_changed {
            self.collaborators.show_view(&view, false);
        }

        self.collaborators.update_filter_ui();

        let fetched_logs = view == View::Logs;
        if fetched_logs {
            self.collaborators.fetch_logs();
        }

        debug!(view = %view, view_changed, "state loaded from url");
        LoadOutcome::Loaded {
            view,
            view_changed,
            fetched_logs,
        }
    }

    /// Back/forward navigation.
    pub fn on_popstate(&self) -> LoadOutcome {
        self.load_state_from_url()
    }

    /// User-initiated view switch.
    pub fn navigate(&self, view: View) {
        self.state.write().view.current_view = view.clone();
        self.update_url();
        self.collaborators.show_view(&view, true);
    }

    /// Replaces the filters and goes back to the first page.
    pub fn apply_filters(&self, filters: Filters) {
        {
            let mut state = self.state.write();
            state.filters = filters;
            state.view.current_page = 0;
        }
        self.update_url();
        self.refresh_logs_if_active();
    }

    pub fn set_page(&self, page: usize) {
        self.state.write().view.current_page = page;
        self.update_url();
        self.refresh_logs_if_active();
    }

    pub fn next_page(&self) {
        let page = self.state.read().view.current_page;
        self.set_page(page.saturating_add(1));
    }

    /// No-op on the first page.
    pub fn previous_page(&self) {
        let page = self.state.read().view.current_page;
        if page > 0 {
            self.set_page(page - 1);
        }
    }

    fn refresh_logs_if_active(&self) {
        if self.state.current_view() == View::Logs {
            self.collaborators.fetch_logs();
        }
    }
}

/// `/shared?share=<id>` with the id form-encoded.
pub fn shared_view_url(share_id: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(PARAM_SHARE, share_id)
        .finish();
    format!("{}?{}", SHARED_VIEW_PATH, query)
}
