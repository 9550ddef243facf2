//! Pipeline stages for a poll cycle.
//!
//! - `interpret`: raw readings to tray and toner display strings
//! - `classify`: readings to a per-device severity
//! - `report`: rows to a report and its text/JSON renderings
//! - `run`: poll, build, deliver

pub mod classify;
pub mod interpret;
pub mod report;
pub mod run;

pub use classify::classify;
pub use report::{build_report, render_json, render_text};
pub use run::{run_pipeline, run_poll};
