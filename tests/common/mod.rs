//! Shared helpers for integration tests.

#![allow(dead_code)]

use qlog_dashboard::routing::{MemoryHistory, SessionState, StateSynchronizer, View, ViewCollaborators};
use std::sync::{Arc, Mutex};

/// Calls received by [`Recorder`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchDashboard,
    FetchLogs,
    ShowView(View, bool),
    LoadViewDisplay(String, bool),
    UpdateFilterUi,
}

/// Collaborator that records every call.
#[derive(Debug, Default)]
pub struct Recorder {
    calls: Mutex<Vec<Call>>,
}

impl Recorder {
    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl ViewCollaborators for Recorder {
    fn fetch_dashboard(&self) {
        self.push(Call::FetchDashboard);
    }

    fn fetch_logs(&self) {
        self.push(Call::FetchLogs);
    }

    fn show_view(&self, view: &View, update_url: bool) {
        self.push(Call::ShowView(view.clone(), update_url));
    }

    fn load_view_display(&self, id: &str, update_url: bool) {
        self.push(Call::LoadViewDisplay(id.to_string(), update_url));
    }

    fn update_filter_ui(&self) {
        self.push(Call::UpdateFilterUi);
    }
}

pub struct Harness {
    pub sync: StateSynchronizer,
    pub history: Arc<MemoryHistory>,
    pub recorder: Arc<Recorder>,
}

/// Synchronizer with fresh default state, opened at `url`.
pub fn harness(url: &str) -> Harness {
    let history = Arc::new(MemoryHistory::new(url));
    let recorder = Arc::new(Recorder::default());
    let sync = StateSynchronizer::new(SessionState::default(), history.clone(), recorder.clone());
    Harness {
        sync,
        history,
        recorder,
    }
}
