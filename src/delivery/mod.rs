//! Report delivery sinks.
//!
//! Every sink receives the finished report. A failing sink is logged and
//! skipped; it never prevents the remaining sinks from running.

#[cfg(feature = "database")]
pub mod database;
#[cfg(feature = "email")]
pub mod email;
pub mod json;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{Config, Report};

#[cfg(feature = "database")]
pub use database::DatabaseSink;
#[cfg(feature = "email")]
pub use email::EmailSink;
pub use json::JsonFileSink;

/// A destination for finished reports.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    /// Deliver one report.
    async fn deliver(&self, report: &Report) -> Result<()>;
}

/// Sink kinds selectable from configuration or the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    Json,
    Email,
    Database,
}

impl SinkKind {
    pub const ALL: [SinkKind; 3] = [SinkKind::Json, SinkKind::Email, SinkKind::Database];

    pub fn as_str(&self) -> &'static str {
        match self {
            SinkKind::Json => "json",
            SinkKind::Email => "email",
            SinkKind::Database => "database",
        }
    }

    /// Whether the configuration turns this sink on.
    pub fn enabled_in(&self, config: &Config) -> bool {
        match self {
            SinkKind::Json => config.json.enabled,
            SinkKind::Email => config.email.enabled,
            SinkKind::Database => config.database.enabled,
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SinkKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(SinkKind::Json),
            "email" | "mail" => Ok(SinkKind::Email),
            "database" | "db" => Ok(SinkKind::Database),
            other => Err(AppError::config(format!("Unknown sink: {other}"))),
        }
    }
}

/// Sinks ready to receive a report, plus the ones that could not be set up.
#[derive(Default)]
pub struct SinkSet {
    pub sinks: Vec<Box<dyn ReportSink>>,
    /// `(sink, error)` for each sink whose construction failed
    pub unavailable: Vec<(String, String)>,
}

impl From<Vec<Box<dyn ReportSink>>> for SinkSet {
    fn from(sinks: Vec<Box<dyn ReportSink>>) -> Self {
        Self {
            sinks,
            unavailable: Vec::new(),
        }
    }
}

/// Build sinks for `kinds`, or for every enabled sink when `kinds` is empty.
///
/// Sinks that cannot be constructed are logged and kept in `unavailable`
/// so the delivery summary still counts them as failed.
pub fn build_sinks(config: &Config, kinds: &[SinkKind]) -> SinkSet {
    let selected: Vec<SinkKind> = if kinds.is_empty() {
        SinkKind::ALL
            .into_iter()
            .filter(|k| k.enabled_in(config))
            .collect()
    } else {
        kinds.to_vec()
    };

    let mut set = SinkSet::default();
    for kind in selected {
        match build_sink(config, kind) {
            Ok(sink) => set.sinks.push(sink),
            Err(e) => {
                log::error!("Cannot set up {kind} delivery: {e}");
                set.unavailable.push((kind.to_string(), e.to_string()));
            }
        }
    }
    set
}

fn build_sink(config: &Config, kind: SinkKind) -> Result<Box<dyn ReportSink>> {
    match kind {
        SinkKind::Json => Ok(Box::new(JsonFileSink::new(&config.json.path))),
        #[cfg(feature = "email")]
        SinkKind::Email => Ok(Box::new(EmailSink::from_config(&config.email)?)),
        #[cfg(feature = "database")]
        SinkKind::Database => Ok(Box::new(DatabaseSink::from_config(&config.database)?)),
        #[allow(unreachable_patterns)]
        other => Err(AppError::config(format!(
            "{other} delivery is not compiled into this build"
        ))),
    }
}

/// Outcome of delivering one report to all sinks.
#[derive(Debug, Default, Clone)]
pub struct DeliverySummary {
    pub delivered: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl DeliverySummary {
    pub fn all_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Deliver `report` to every sink in order, logging each outcome.
///
/// Sinks that failed setup are reported as failed without being attempted.
pub async fn deliver_all(set: &SinkSet, report: &Report) -> DeliverySummary {
    let mut summary = DeliverySummary {
        failed: set.unavailable.clone(),
        ..DeliverySummary::default()
    };

    for sink in &set.sinks {
        match sink.deliver(report).await {
            Ok(()) => {
                log::info!("✓ Report delivered via {}", sink.name());
                summary.delivered.push(sink.name().to_string());
            }
            Err(e) => {
                log::error!("Report delivery via {} failed: {}", sink.name(), e);
                summary.failed.push((sink.name().to_string(), e.to_string()));
            }
        }
    }

    summary
}
