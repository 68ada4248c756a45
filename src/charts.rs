//! The three fixed dashboard charts.
//!
//! Specs are plain data; `to_chart_js` turns one into the configuration object
//! a Chart.js front end expects.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{HashSet, VecDeque};

use crate::format::Severity;
use crate::types::Stats;

pub const SEVERITY_CHART_ID: &str = "severityChart";
pub const PROTOCOL_CHART_ID: &str = "protocolChart";
pub const TRENDS_CHART_ID: &str = "trendsChart";

/// Transports shown in the protocol pie, in display order.
pub const PROTOCOLS: [&str; 3] = ["UDP", "TCP", "TLS"];

/// 折れ線グラフに保持する最大ポイント数
pub const TREND_WINDOW: usize = 60;

const LEGEND_COLOR: &str = "#9ca3af";
const GRID_COLOR: &str = "#2d3441";
const ACCENT: &str = "#6366f1";

/// Where charts get mounted. Missing containers mean "skip this chart".
pub trait ChartHost {
    fn has_container(&self, id: &str) -> bool;
}

/// Host that has every container, e.g. a headless renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllContainers;

impl ChartHost for AllContainers {
    fn has_container(&self, _id: &str) -> bool {
        true
    }
}

impl ChartHost for HashSet<String> {
    fn has_container(&self, id: &str) -> bool {
        self.contains(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Doughnut,
    Pie,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: Option<String>,
    pub data: Vec<u64>,
    pub background_colors: Vec<String>,
    pub border_color: Option<String>,
    pub tension: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub id: String,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub dataset: Dataset,
}

impl ChartSpec {
    /// Severity doughnut, one slice per code.
    pub fn severity() -> Self {
        Self {
            id: SEVERITY_CHART_ID.to_string(),
            kind: ChartKind::Doughnut,
            labels: Severity::all().map(|s| s.name().to_string()).collect(),
            dataset: Dataset {
                label: None,
                data: vec![0; 8],
                background_colors: Severity::all().map(|s| s.color().to_string()).collect(),
                border_color: None,
                tension: None,
            },
        }
    }

    pub fn protocol() -> Self {
        Self {
            id: PROTOCOL_CHART_ID.to_string(),
            kind: ChartKind::Pie,
            labels: PROTOCOLS.iter().map(|p| p.to_string()).collect(),
            dataset: Dataset {
                label: None,
                data: vec![0; PROTOCOLS.len()],
                background_colors: ["#6366f1", "#8b5cf6", "#ec4899"]
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
                border_color: None,
                tension: None,
            },
        }
    }

    pub fn trends() -> Self {
        Self {
            id: TRENDS_CHART_ID.to_string(),
            kind: ChartKind::Line,
            labels: Vec::new(),
            dataset: Dataset {
                label: Some("Messages".to_string()),
                data: Vec::new(),
                background_colors: vec!["rgba(99, 102, 241, 0.1)".to_string()],
                border_color: Some(ACCENT.to_string()),
                tension: Some(0.4),
            },
        }
    }

    /// Chart.js configuration object.
    pub fn to_chart_js(&self) -> Value {
        let mut dataset = json!({ "data": self.dataset.data });
        if let Some(label) = &self.dataset.label {
            dataset["label"] = json!(label);
        }
        dataset["backgroundColor"] = match self.kind {
            ChartKind::Line => json!(self.dataset.background_colors.first()),
            _ => json!(self.dataset.background_colors),
        };
        if let Some(border) = &self.dataset.border_color {
            dataset["borderColor"] = json!(border);
        }
        if let Some(tension) = self.dataset.tension {
            dataset["tension"] = json!(tension);
        }

        let options = match self.kind {
            ChartKind::Line => json!({
                "responsive": true,
                "maintainAspectRatio": true,
                "plugins": { "legend": { "labels": { "color": LEGEND_COLOR } } },
                "scales": {
                    "y": {
                        "beginAtZero": true,
                        "ticks": { "color": LEGEND_COLOR },
                        "grid": { "color": GRID_COLOR }
                    },
                    "x": {
                        "ticks": { "color": LEGEND_COLOR },
                        "grid": { "color": GRID_COLOR }
                    }
                }
            }),
            _ => json!({
                "responsive": true,
                "maintainAspectRatio": true,
                "plugins": {
                    "legend": {
                        "position": "bottom",
                        "labels": { "color": LEGEND_COLOR, "font": { "size": 12 } }
                    }
                }
            }),
        };

        json!({
            "type": self.kind,
            "data": { "labels": self.labels, "datasets": [dataset] },
            "options": options,
        })
    }
}

/// The dashboard's chart widgets. Absent entries had no container.
#[derive(Debug, Clone, Default)]
pub struct ChartSet {
    pub severity: Option<ChartSpec>,
    pub protocol: Option<ChartSpec>,
    pub trends: Option<ChartSpec>,
    trend_points: VecDeque<(String, u64)>,
}

impl ChartSet {
    pub fn init(host: &dyn ChartHost) -> Self {
        Self {
            severity: host
                .has_container(SEVERITY_CHART_ID)
                .then(ChartSpec::severity),
            protocol: host
                .has_container(PROTOCOL_CHART_ID)
                .then(ChartSpec::protocol),
            trends: host.has_container(TRENDS_CHART_ID).then(ChartSpec::trends),
            trend_points: VecDeque::new(),
        }
    }

    /// Feeds severity and protocol counts from a stats snapshot.
    pub fn apply_stats(&mut self, stats: &Stats) {
        if let Some(chart) = self.severity.as_mut() {
            chart.dataset.data = stats.severity_counts().to_vec();
        }
        if let Some(chart) = self.protocol.as_mut() {
            chart.dataset.data = PROTOCOLS
                .iter()
                .map(|p| stats.protocol_count(p))
                .collect();
        }
    }

    /// Appends one point to the trend line, dropping the oldest beyond
    /// [`TREND_WINDOW`].
    pub fn push_trend_point(&mut self, label: impl Into<String>, value: u64) {
        let Some(chart) = self.trends.as_mut() else {
            return;
        };

        self.trend_points.push_back((label.into(), value));
        while self.trend_points.len() > TREND_WINDOW {
            self.trend_points.pop_front();
        }

        chart.labels = self.trend_points.iter().map(|(l, _)| l.clone()).collect();
        chart.dataset.data = self.trend_points.iter().map(|(_, v)| *v).collect();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChartSpec> {
        [&self.severity, &self.protocol, &self.trends]
            .into_iter()
            .flatten()
    }
}
