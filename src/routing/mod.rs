//! URL-driven view/filter state.
//!
//! [`StateSynchronizer`] keeps the shared [`SessionState`] and the address
//! bar consistent: every user change pushes a minimal query string, and every
//! address change (initial load, back/forward) is parsed back into state.
//! Rendering and data loading are delegated to [`ViewCollaborators`].

pub mod collaborators;
pub mod history;
pub mod query;
pub mod state;
pub mod synchronizer;

pub use collaborators::{NoopCollaborators, ViewCollaborators};
pub use history::{History, Location, MemoryHistory};
pub use query::{serialize_query, QueryParams};
pub use state::{
    AppState, CustomView, DateSpan, Filters, HistorySnapshot, SessionState, View, ViewState,
    DEFAULT_DATE_RANGE, DEFAULT_PAGE_SIZE,
};
pub use synchronizer::{shared_view_url, LoadOutcome, StateSynchronizer, SHARED_VIEW_PATH};
