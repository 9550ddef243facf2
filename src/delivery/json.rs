//! JSON document sink.
//!
//! Writes the report as a pretty-printed document, replacing any previous
//! file atomically (write to temp, then rename).

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::delivery::ReportSink;
use crate::error::Result;
use crate::models::Report;

/// Local filesystem JSON sink.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ReportSink for JsonFileSink {
    fn name(&self) -> &str {
        "json"
    }

    async fn deliver(&self, report: &Report) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(report)?;
        self.write_bytes(&bytes).await?;
        log::info!(
            "Report with {} printers saved to {}",
            report.rows.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeviceRow, Severity};
    use std::path::Path;
    use tempfile::TempDir;

    /// Read back a written report, `None` if the file doesn't exist.
    fn load(path: &Path) -> Option<Report> {
        let bytes = std::fs::read(path).ok()?;
        Some(serde_json::from_slice(&bytes).unwrap())
    }

    fn sample_report() -> Report {
        Report::new(
            Report::now(),
            vec![DeviceRow {
                severity: Severity::Critical,
                name: "lp2".to_string(),
                address: "10.0.0.2".to_string(),
                tray_status: "Tray1: Paper Empty".to_string(),
                toner_levels: "5%, N/A".to_string(),
            }],
        )
    }

    #[tokio::test]
    async fn test_deliver_and_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("reports/printer_status.json");
        let sink = JsonFileSink::new(&path);
        let report = sample_report();

        sink.deliver(&report).await.unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded, report);
        assert!(!tmp.path().join("reports/printer_status.tmp").exists());
    }

    #[tokio::test]
    async fn test_deliver_overwrites_previous_report() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("printer_status.json");
        let sink = JsonFileSink::new(&path);

        sink.deliver(&sample_report()).await.unwrap();
        sink.deliver(&Report::new(Report::now(), Vec::new()))
            .await
            .unwrap();

        let loaded = load(&path).unwrap();
        assert!(loaded.rows.is_empty());
    }

    #[tokio::test]
    async fn test_document_stores_status_marker() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("printer_status.json");
        JsonFileSink::new(&path)
            .deliver(&sample_report())
            .await
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["printers"][0]["status"], "❌");
        assert!(load(&tmp.path().join("nope.json")).is_none());
    }

    #[tokio::test]
    async fn test_unwritable_path_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let sink = JsonFileSink::new(blocker.join("printer_status.json"));

        assert!(sink.deliver(&sample_report()).await.is_err());
    }
}
