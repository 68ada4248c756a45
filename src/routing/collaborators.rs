use super::state::View;

/// Views and loaders the synchronizer and the refresh driver delegate to.
///
/// Every method is a fire-and-forget trigger: implementations start their
/// work (usually a spawned fetch) and report their own failures. The default
/// bodies do nothing, so an implementation only overrides what it has.
pub trait ViewCollaborators: Send + Sync {
    /// Refresh dashboard statistics and recent logs.
    fn fetch_dashboard(&self) {}

    /// Refresh the current page of the log list.
    fn fetch_logs(&self) {}

    /// Render `view`. `update_url` is false when the change came from the
    /// address bar itself.
    fn show_view(&self, _view: &View, _update_url: bool) {}

    /// Show a single saved view full screen.
    fn load_view_display(&self, _id: &str, _update_url: bool) {}

    /// Reflect the loaded filters in whatever filter controls exist.
    fn update_filter_ui(&self) {}
}

/// Collaborator set that ignores every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCollaborators;

impl ViewCollaborators for NoopCollaborators {}
