//! Display helpers: timestamps, severities, counts and event type icons.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 不明な値に使う中立色
pub const NEUTRAL_COLOR: &str = "#9ca3af";

/// Syslog severity code (RFC 5424), always within `0..=7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Severity(u8);

const SEVERITY_NAMES: [&str; 8] = [
    "Emergency",
    "Alert",
    "Critical",
    "Error",
    "Warning",
    "Notice",
    "Informational",
    "Debug",
];

const SEVERITY_COLORS: [&str; 8] = [
    "#ef4444", "#f97316", "#f59e0b", "#eab308", "#84cc16", "#22c55e", "#10b981", "#14b8a6",
];

impl Severity {
    pub const EMERGENCY: Severity = Severity(0);
    pub const ERROR: Severity = Severity(3);
    pub const DEBUG: Severity = Severity(7);

    pub fn new(code: u8) -> Option<Self> {
        (code <= 7).then_some(Severity(code))
    }

    /// Parses the textual form used in query strings. Anything that is not a
    /// code in `0..=7` yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<u8>().ok().and_then(Severity::new)
    }

    pub fn all() -> impl Iterator<Item = Severity> {
        (0..=7).map(Severity)
    }

    pub fn code(self) -> u8 {
        self.0
    }

    pub fn name(self) -> &'static str {
        SEVERITY_NAMES[self.0 as usize]
    }

    pub fn color(self) -> &'static str {
        SEVERITY_COLORS[self.0 as usize]
    }
}

impl TryFrom<u8> for Severity {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Severity::new(code).ok_or_else(|| format!("severity out of range: {}", code))
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> u8 {
        severity.0
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity name for a raw code as it arrives from the API.
pub fn severity_name(code: i64) -> &'static str {
    u8::try_from(code)
        .ok()
        .and_then(Severity::new)
        .map(Severity::name)
        .unwrap_or("Unknown")
}

/// Severity color for a raw code as it arrives from the API.
pub fn severity_color(code: i64) -> &'static str {
    u8::try_from(code)
        .ok()
        .and_then(Severity::new)
        .map(Severity::color)
        .unwrap_or(NEUTRAL_COLOR)
}

/// `MM/DD/YYYY, HH:MM:SS` in 24-hour time.
pub fn format_timestamp<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    timestamp.format("%m/%d/%Y, %H:%M:%S").to_string()
}

/// Formats an RFC 3339 timestamp in the local time zone. Unparseable input is
/// returned unchanged.
pub fn format_timestamp_str(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => format_timestamp(&ts.with_timezone(&Local)),
        Err(_) => raw.to_string(),
    }
}

/// Compact counter: `999`, `1.5K`, `2.3M`.
pub fn format_number(num: u64) -> String {
    if num >= 1_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else if num >= 1_000 {
        format!("{:.1}K", num as f64 / 1_000.0)
    } else {
        num.to_string()
    }
}

/// Escapes text for inclusion in HTML content or attribute values.
pub fn escape_html(text: &str) -> String {
    ammonia::clean_text(text)
}

/// Font Awesome icon with its tint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventIcon {
    pub class: &'static str,
    pub color: &'static str,
}

impl EventIcon {
    const fn new(class: &'static str, color: &'static str) -> Self {
        Self { class, color }
    }

    pub fn to_html(self) -> String {
        format!(
            r#"<i class="fas {}" style="margin-right: 4px; color: {};"></i>"#,
            self.class, self.color
        )
    }
}

const UNKNOWN_ICON: EventIcon = EventIcon::new("fa-question-circle", NEUTRAL_COLOR);
const DEFAULT_ICON: EventIcon = EventIcon::new("fa-info-circle", NEUTRAL_COLOR);

// Order matters: the first rule with a matching keyword wins.
const EVENT_ICON_RULES: &[(&[&str], EventIcon)] = &[
    // security
    (
        &["security", "ids", "alert", "threat"],
        EventIcon::new("fa-shield-alt", "#ef4444"),
    ),
    (
        &["firewall", "block", "deny"],
        EventIcon::new("fa-firewall", "#f59e0b"),
    ),
    (
        &["malware", "virus", "malicious"],
        EventIcon::new("fa-virus", "#ef4444"),
    ),
    // network
    (&["vpn", "ipsec", "ike"], EventIcon::new("fa-lock", "#6366f1")),
    (
        &["flow", "traffic", "connection"],
        EventIcon::new("fa-network-wired", "#3b82f6"),
    ),
    (&["url", "http", "web"], EventIcon::new("fa-globe", "#10b981")),
    (
        &["dhcp", "lease", "ip"],
        EventIcon::new("fa-network-wired", "#8b5cf6"),
    ),
    (
        &["uplink", "connectivity", "failover"],
        EventIcon::new("fa-exchange-alt", "#f59e0b"),
    ),
    // wireless
    (
        &["wifi", "wireless", "wlan"],
        EventIcon::new("fa-wifi", "#10b981"),
    ),
    (
        &["association", "connect", "disconnect"],
        EventIcon::new("fa-link", "#6366f1"),
    ),
    (
        &["rogue", "spoofing", "airmarshal"],
        EventIcon::new("fa-ghost", "#ef4444"),
    ),
    // switching
    (
        &["port", "stp", "spanning"],
        EventIcon::new("fa-plug", "#8b5cf6"),
    ),
    (&["power", "poe"], EventIcon::new("fa-bolt", "#f59e0b")),
    // authentication
    (
        &["auth", "login", "8021x"],
        EventIcon::new("fa-key", "#6366f1"),
    ),
    (&["ssh", "telnet"], EventIcon::new("fa-terminal", "#3b82f6")),
    // system
    (
        &["admin", "config", "change"],
        EventIcon::new("fa-cog", NEUTRAL_COLOR),
    ),
    (
        &["device", "adopt", "offline"],
        EventIcon::new("fa-server", "#6366f1"),
    ),
    (
        &["event", "log"],
        EventIcon::new("fa-clipboard-list", NEUTRAL_COLOR),
    ),
];

/// Picks the icon for an event type by case-insensitive substring match.
pub fn event_type_icon(event_type: Option<&str>) -> EventIcon {
    let event_type = match event_type {
        Some(t) if !t.is_empty() && t != "unknown" => t.to_lowercase(),
        _ => return UNKNOWN_ICON,
    };

    EVENT_ICON_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| event_type.contains(k)))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}
