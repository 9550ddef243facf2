// src/models/report.rs

//! Report rows and the aggregated report.

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::models::Severity;

/// Timestamp format used in report headers, JSON and the database.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One device's line in the report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceRow {
    #[serde(rename = "status")]
    pub severity: Severity,

    #[serde(rename = "printer")]
    pub name: String,

    #[serde(rename = "ip")]
    pub address: String,

    pub tray_status: String,

    pub toner_levels: String,
}

impl DeviceRow {
    /// Cells in table column order.
    pub fn cells(&self) -> [&str; 5] {
        [
            self.severity.marker(),
            &self.name,
            &self.address,
            &self.tray_status,
            &self.toner_levels,
        ]
    }
}

/// A full poll cycle: rows in inventory order plus one shared timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Report {
    #[serde(with = "timestamp")]
    pub generated_at: NaiveDateTime,

    #[serde(rename = "printers")]
    pub rows: Vec<DeviceRow>,
}

impl Report {
    pub fn new(generated_at: NaiveDateTime, rows: Vec<DeviceRow>) -> Self {
        Self { generated_at, rows }
    }

    /// Current local time truncated to whole seconds.
    pub fn now() -> NaiveDateTime {
        let now = Local::now().naive_local();
        now.with_nanosecond(0).unwrap_or(now)
    }

    pub fn timestamp(&self) -> String {
        self.generated_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Worst severity across all rows, `Ok` when there are none.
    pub fn worst(&self) -> Severity {
        self.rows
            .iter()
            .map(|r| r.severity)
            .min()
            .unwrap_or(Severity::Ok)
    }

    /// Count rows at the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.rows.iter().filter(|r| r.severity == severity).count()
    }
}

mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT).map_err(D::Error::custom)
    }
}
