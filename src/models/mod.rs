// src/models/mod.rs

//! Domain models for the printer monitor.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod device;
mod report;
mod status;

// Re-export all public types
pub use config::{
    COMMUNITY_ENV, Config, DatabaseConfig, EmailConfig, JsonConfig, PollConfig, SnmpConfig,
};
pub use device::{Device, TrayKind};
pub use report::{DeviceRow, Report, TIMESTAMP_FORMAT};
pub use status::{Severity, TrayState};

/// Raw readings collected from one device in one poll cycle.
///
/// Both sequences are empty when the corresponding fetch failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceReading {
    /// Supply levels in percent; negative values mean not applicable
    pub toner: Vec<i64>,
    /// One state per reported tray
    pub trays: Vec<TrayState>,
}
