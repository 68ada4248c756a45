//! Address bar and session history abstraction.

use std::sync::Mutex;
use url::Url;

use super::state::HistorySnapshot;

/// Path and query of the current address.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub path: String,
    /// Query without the leading `?`
    pub query: String,
}

impl Location {
    /// Accepts absolute URLs (`http://host/logs?x=1`) as well as
    /// origin-relative ones (`/?view=logs`, `?view=logs`).
    pub fn parse(raw: &str) -> Self {
        let parsed = Url::parse(raw)
            .or_else(|_| Url::parse("http://localhost/").and_then(|base| base.join(raw)));

        match parsed {
            Ok(url) => Self {
                path: url.path().to_string(),
                query: url.query().unwrap_or_default().to_string(),
            },
            Err(_) => Self {
                path: "/".to_string(),
                query: String::new(),
            },
        }
    }

    /// `path?query`, or the bare path when the query is empty.
    pub fn href(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }

    pub fn is_shared_page(&self) -> bool {
        self.path.contains("/shared")
    }
}

/// What the synchronizer needs from a browser-like host.
pub trait History: Send + Sync {
    /// Current address.
    fn location(&self) -> Location;

    /// Adds an entry without reloading.
    fn push_state(&self, snapshot: HistorySnapshot, url: &str);

    /// Full navigation away from the current page.
    fn redirect(&self, url: &str);
}

#[derive(Debug, Clone)]
struct Entry {
    location: Location,
    snapshot: Option<HistorySnapshot>,
}

#[derive(Debug)]
struct Inner {
    entries: Vec<Entry>,
    index: usize,
    redirects: Vec<String>,
}

/// Session history kept in memory. Used by the CLI and by tests.
#[derive(Debug)]
pub struct MemoryHistory {
    inner: Mutex<Inner>,
}

impl MemoryHistory {
    pub fn new(initial: &str) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: vec![Entry {
                    location: Location::parse(initial),
                    snapshot: None,
                }],
                index: 0,
                redirects: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Moves one entry back. Returns false at the start of history.
    pub fn back(&self) -> bool {
        let mut inner = self.lock();
        if inner.index == 0 {
            return false;
        }
        inner.index -= 1;
        true
    }

    /// Moves one entry forward. Returns false at the end of history.
    pub fn forward(&self) -> bool {
        let mut inner = self.lock();
        if inner.index + 1 >= inner.entries.len() {
            return false;
        }
        inner.index += 1;
        true
    }

    /// Replaces the address as if the user typed it.
    pub fn set_location(&self, raw: &str) {
        let mut inner = self.lock();
        let index = inner.index;
        inner.entries[index] = Entry {
            location: Location::parse(raw),
            snapshot: None,
        };
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn current_snapshot(&self) -> Option<HistorySnapshot> {
        let inner = self.lock();
        inner.entries[inner.index].snapshot.clone()
    }

    pub fn redirects(&self) -> Vec<String> {
        self.lock().redirects.clone()
    }
}

impl History for MemoryHistory {
    fn location(&self) -> Location {
        let inner = self.lock();
        inner.entries[inner.index].location.clone()
    }

    fn push_state(&self, snapshot: HistorySnapshot, url: &str) {
        let mut inner = self.lock();
        let keep = inner.index + 1;
        inner.entries.truncate(keep);
        inner.entries.push(Entry {
            location: Location::parse(url),
            snapshot: Some(snapshot),
        });
        inner.index = inner.entries.len() - 1;
    }

    fn redirect(&self, url: &str) {
        let mut inner = self.lock();
        inner.redirects.push(url.to_string());
        let keep = inner.index + 1;
        inner.entries.truncate(keep);
        inner.entries.push(Entry {
            location: Location::parse(url),
            snapshot: None,
        });
        inner.index = inner.entries.len() - 1;
    }
}
