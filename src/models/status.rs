// src/models/status.rs

//! Per-tray states and per-device severity levels.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};

/// Semantic state of a single paper tray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrayState {
    /// Paper loaded
    Available,
    /// Tray empty, needs paper
    Empty,
    /// Device reports the tray as absent or unknown (code -3)
    NotInstalled,
    /// Text-reporting device returned something other than an empty alert table
    Unknown,
    /// Integer code outside the known set
    Unrecognized(i64),
}

impl TrayState {
    /// Map a coded tray status integer to a state.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Available,
            1 => Self::Empty,
            -3 => Self::NotInstalled,
            other => Self::Unrecognized(other),
        }
    }

    /// Reduce free-form alert text from a text-reporting device to one state.
    ///
    /// Matching is case-insensitive against the whole text. An empty alert
    /// table means nothing is wrong with the tray.
    pub fn from_alert_text(text: &str) -> Self {
        let text = text.trim();
        if text.to_uppercase().contains("TRAY EMPTY") {
            Self::Empty
        } else if text.is_empty() {
            Self::Available
        } else {
            Self::Unknown
        }
    }

    /// Human-readable label used in reports.
    pub fn label(&self) -> String {
        match self {
            Self::Available => "Paper Available".to_string(),
            Self::Empty => "Paper Empty".to_string(),
            Self::NotInstalled => "Unknown/Not Installed".to_string(),
            Self::Unknown => "Unknown".to_string(),
            Self::Unrecognized(code) => format!("Code{code}"),
        }
    }

    /// Whether the tray has run out of paper.
    pub fn is_paper_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for TrayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Overall health of a device, most severe first.
///
/// Serialized as its marker, which is what the JSON document and the
/// status table hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical,
    Low,
    Ok,
}

impl Severity {
    /// Visual marker shown in the text table.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Critical => "❌",
            Self::Low => "⚠️",
            Self::Ok => "✅",
        }
    }

    /// Parse a marker back into a severity.
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "❌" => Some(Self::Critical),
            "⚠️" | "⚠" => Some(Self::Low),
            "✅" => Some(Self::Ok),
            _ => None,
        }
    }

    /// Lowercase name used in log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Low => "low",
            Self::Ok => "ok",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.marker())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_marker(&s)
            .ok_or_else(|| D::Error::custom(format!("unknown severity marker {s:?}")))
    }
}
