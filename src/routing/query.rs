//! Address-bar representation of the view/filter state.
//!
//! Only non-default fields are written, always in the same key order, so
//! shared links stay short and stable.

use url::form_urlencoded;

use super::state::{DateSpan, Filters, View, DEFAULT_DATE_RANGE};
use crate::format::Severity;

pub const PARAM_VIEW: &str = "view";
pub const PARAM_SEVERITY: &str = "severity";
pub const PARAM_DEVICE: &str = "device";
pub const PARAM_DEVICE_TYPE: &str = "device_type";
pub const PARAM_EVENT_TYPE: &str = "event_type";
pub const PARAM_DATE_RANGE: &str = "date_range";
pub const PARAM_DATE_FROM: &str = "date_from";
pub const PARAM_DATE_TO: &str = "date_to";
pub const PARAM_SEARCH: &str = "search";
pub const PARAM_PAGE: &str = "page";
pub const PARAM_ID: &str = "id";
pub const PARAM_SHARE: &str = "share";

/// Builds the query string (without `?`) for a state.
pub fn serialize_query(view: &View, filters: &Filters, page: usize) -> String {
    let mut params = form_urlencoded::Serializer::new(String::new());

    if !view.is_default() {
        params.append_pair(PARAM_VIEW, view.as_str());
    }
    if let Some(severity) = filters.severity {
        params.append_pair(PARAM_SEVERITY, &severity.to_string());
    }
    if !filters.device.is_empty() {
        params.append_pair(PARAM_DEVICE, &filters.device);
    }
    if !filters.device_type.is_empty() {
        params.append_pair(PARAM_DEVICE_TYPE, &filters.device_type);
    }
    if !filters.event_type.is_empty() {
        params.append_pair(PARAM_EVENT_TYPE, &filters.event_type);
    }
    if let Some(range) = filters
        .date_range
        .as_deref()
        .filter(|r| !r.is_empty() && *r != DEFAULT_DATE_RANGE)
    {
        params.append_pair(PARAM_DATE_RANGE, range);
    }
    if let Some(span) = &filters.date_span {
        params.append_pair(PARAM_DATE_FROM, span.from());
        params.append_pair(PARAM_DATE_TO, span.to());
    }
    if !filters.search.is_empty() {
        params.append_pair(PARAM_SEARCH, &filters.search);
    }
    if page > 0 {
        params.append_pair(PARAM_PAGE, &page.to_string());
    }

    params.finish()
}

/// Decoded query parameters. The first occurrence of a key wins, like
/// `URLSearchParams::get`.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Accepts the query with or without a leading `?`.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            pairs: form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Like [`get`](Self::get) but treats an empty value as absent.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn view(&self) -> View {
        self.get_non_empty(PARAM_VIEW)
            .map(View::parse)
            .unwrap_or_default()
    }

    /// `page`, base 10; anything unparseable is page 0.
    pub fn page(&self) -> usize {
        self.get_non_empty(PARAM_PAGE)
            .and_then(|p| p.trim().parse::<usize>().ok())
            .unwrap_or(0)
    }

    /// Filters with their load-time defaults applied.
    pub fn filters(&self) -> Filters {
        let text = |key: &str| self.get(key).unwrap_or_default().to_string();

        Filters {
            severity: self.get_non_empty(PARAM_SEVERITY).and_then(Severity::parse),
            device: text(PARAM_DEVICE),
            device_type: text(PARAM_DEVICE_TYPE),
            event_type: text(PARAM_EVENT_TYPE),
            date_range: Some(
                self.get_non_empty(PARAM_DATE_RANGE)
                    .unwrap_or(DEFAULT_DATE_RANGE)
                    .to_string(),
            ),
            date_span: DateSpan::new(text(PARAM_DATE_FROM), text(PARAM_DATE_TO)),
            search: text(PARAM_SEARCH),
        }
    }
}
