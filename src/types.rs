//! Payloads exchanged with the qLog REST API.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::format::Severity;

/// `/api/server/info`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerInfo {
    pub active_listeners: Vec<ListenerInfo>,
    pub ip_addresses: Vec<String>,
    pub web_port: Option<u16>,
    pub database_path: Option<String>,
    /// 0 は無制限
    pub message_limit: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerInfo {
    pub name: String,
    pub protocol: String,
    pub port: u16,
}

impl ServerInfo {
    pub fn is_online(&self) -> bool {
        !self.active_listeners.is_empty()
    }
}

/// `/api/stats`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub total: u64,
    pub recent_hour: u64,
    /// Keyed by severity name (`Error`, `Warning`, ...)
    pub by_severity: HashMap<String, u64>,
    pub by_hostname: HashMap<String, u64>,
    /// Keyed by transport (`UDP`, `TCP`, `TLS`)
    pub by_protocol: HashMap<String, u64>,
    pub server_total: Option<u64>,
    pub last_message: Option<String>,
}

impl Stats {
    /// Counts in severity code order, missing entries as zero.
    pub fn severity_counts(&self) -> [u64; 8] {
        let mut counts = [0; 8];
        for (slot, severity) in counts.iter_mut().zip(Severity::all()) {
            *slot = self.by_severity.get(severity.name()).copied().unwrap_or(0);
        }
        counts
    }

    /// Emergency + Alert + Critical + Error
    pub fn error_count(&self) -> u64 {
        self.severity_counts()[..=Severity::ERROR.code() as usize]
            .iter()
            .fold(0u64, |acc, n| acc.saturating_add(*n))
    }

    pub fn host_count(&self) -> usize {
        self.by_hostname.len()
    }

    pub fn protocol_count(&self, protocol: &str) -> u64 {
        self.by_protocol.get(protocol).copied().unwrap_or(0)
    }
}

/// One row of `/api/logs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogEntry {
    pub id: i64,
    pub timestamp: String,
    pub severity: i64,
    pub hostname: String,
    pub appname: String,
    pub message: String,
    pub remote_addr: String,
    pub device_type: String,
    pub event_type: String,
}

/// Saved dashboard view from `/api/views/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedView {
    pub id: Option<serde_json::Value>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SavedView {
    pub fn title(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed View")
    }
}

/// `GET /api/modules` answers either with a list of module rows or with a
/// plain `device_type -> enabled` object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModuleStatusResponse {
    List(Vec<ModuleStatusEntry>),
    Map(HashMap<String, bool>),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleStatusEntry {
    pub device_type: String,
    pub enabled: bool,
}

impl ModuleStatusResponse {
    pub fn into_map(self) -> BTreeMap<String, bool> {
        match self {
            ModuleStatusResponse::List(entries) => entries
                .into_iter()
                .map(|m| (m.device_type, m.enabled))
                .collect(),
            ModuleStatusResponse::Map(map) => map.into_iter().collect(),
        }
    }
}

/// Entry of `/api/module-metadata`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleMetadata {
    pub device_type: String,
    pub device_name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub event_types: Vec<serde_json::Value>,
    pub common_fields: Vec<serde_json::Value>,
}

/// Body of `PUT /api/modules`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnabledModulesUpdate {
    pub enabled_modules: BTreeMap<String, bool>,
}
