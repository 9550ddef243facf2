// src/pipeline/classify.rs

//! Device severity classification.

use crate::models::{DeviceReading, Severity, TrayState};

/// Reduce one device's readings to a severity.
///
/// An empty tray is Critical and takes precedence over low toner. Toner is
/// Low when any applicable level is below `toner_low_percent`. A device with
/// no readings at all is Ok.
pub fn classify(trays: &[TrayState], toner: &[i64], toner_low_percent: i64) -> Severity {
    if trays.iter().any(TrayState::is_paper_empty) {
        Severity::Critical
    } else if toner
        .iter()
        .any(|&level| level >= 0 && level < toner_low_percent)
    {
        Severity::Low
    } else {
        Severity::Ok
    }
}

/// Classify a full device reading.
pub fn classify_reading(reading: &DeviceReading, toner_low_percent: i64) -> Severity {
    classify(&reading.trays, &reading.toner, toner_low_percent)
}
