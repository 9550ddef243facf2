// src/pipeline/report.rs

//! Report building and text rendering.

use chrono::NaiveDateTime;
use unicode_segmentation::UnicodeSegmentation;

use crate::models::{Device, DeviceReading, DeviceRow, Report};
use crate::pipeline::classify::classify_reading;
use crate::pipeline::interpret::{toner_summary, tray_summary};

/// Column headers, in display order.
pub const HEADER: [&str; 5] = ["Status", "Printer", "IP", "Tray Status", "Toner Levels"];

const COLUMN_GAP: &str = "  ";

/// Build one report row from a device's readings.
pub fn build_row(device: &Device, reading: &DeviceReading, toner_low_percent: i64) -> DeviceRow {
    DeviceRow {
        severity: classify_reading(reading, toner_low_percent),
        name: device.name.clone(),
        address: device.address.clone(),
        tray_status: tray_summary(&reading.trays),
        toner_levels: toner_summary(&reading.toner),
    }
}

/// Build a report from readings given in inventory order.
pub fn build_report<'a>(
    readings: impl IntoIterator<Item = (&'a Device, &'a DeviceReading)>,
    toner_low_percent: i64,
    generated_at: NaiveDateTime,
) -> Report {
    let rows = readings
        .into_iter()
        .map(|(device, reading)| build_row(device, reading, toner_low_percent))
        .collect();
    Report::new(generated_at, rows)
}

/// Display width of a cell in grapheme clusters.
fn width(cell: &str) -> usize {
    cell.graphemes(true).count()
}

fn pad(cell: &str, target: usize) -> String {
    let fill = target.saturating_sub(width(cell));
    format!("{}{}", cell, " ".repeat(fill))
}

/// Per-column widths across the header and every row.
pub fn column_widths(rows: &[DeviceRow]) -> [usize; 5] {
    let mut widths = HEADER.map(width);
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.cells()) {
            *w = (*w).max(width(cell));
        }
    }
    widths
}

fn format_line(cells: [&str; 5], widths: &[usize; 5]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| pad(cell, w))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP)
}

/// Render the aligned plain-text table used for console output and email.
pub fn render_text(report: &Report) -> String {
    let widths = column_widths(&report.rows);
    let rule_len = widths.iter().sum::<usize>() + COLUMN_GAP.len() * (widths.len() - 1);

    let mut lines = Vec::with_capacity(report.rows.len() + 4);
    lines.push(format!("Printer Status Report - {}", report.timestamp()));
    lines.push(String::new());
    lines.push(format_line(HEADER, &widths));
    lines.push("-".repeat(rule_len));
    for row in &report.rows {
        lines.push(format_line(row.cells(), &widths));
    }

    lines.join("\n")
}

/// Render the report as pretty-printed JSON.
pub fn render_json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
