// src/pipeline/interpret.rs

//! Tray and toner interpretation.
//!
//! Turns raw readings into the display strings shown in every report format.

use crate::models::TrayState;

/// Shown when a device returned no readings at all.
pub const UNKNOWN: &str = "Unknown";

/// Render tray states as `Tray1: ...; Tray2: ...`.
pub fn tray_summary(trays: &[TrayState]) -> String {
    if trays.is_empty() {
        return UNKNOWN.to_string();
    }

    trays
        .iter()
        .enumerate()
        .map(|(i, state)| format!("Tray{}: {}", i + 1, state))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Render supply levels as `45%, N/A, ...`.
pub fn toner_summary(levels: &[i64]) -> String {
    if levels.is_empty() {
        return UNKNOWN.to_string();
    }

    levels
        .iter()
        .map(|&level| toner_label(level))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Negative levels are sentinels for an absent cartridge or sensor.
pub fn toner_label(level: i64) -> String {
    if level >= 0 {
        format!("{level}%")
    } else {
        "N/A".to_string()
    }
}

/// Interpret coded tray readings.
pub fn trays_from_codes(codes: &[i64]) -> Vec<TrayState> {
    codes.iter().copied().map(TrayState::from_code).collect()
}

/// Interpret a text-reporting device's alert output.
///
/// `None` means the fetch failed, which yields no trays rather than a guess.
pub fn trays_from_text(text: Option<&str>) -> Vec<TrayState> {
    text.map(|t| vec![TrayState::from_alert_text(t)])
        .unwrap_or_default()
}
