//! End-to-end poll cycle against a scripted SNMP client.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use printwatch::delivery::{JsonFileSink, ReportSink, SinkSet};
use printwatch::error::{AppError, Result};
use printwatch::models::{Config, Device, Report, Severity, TrayKind};
use printwatch::pipeline::{render_text, run_pipeline};
use printwatch::services::SnmpClient;
use tempfile::TempDir;

/// Answers walks from a fixed `(address, oid)` table; anything else times out.
struct ScriptedClient {
    responses: HashMap<(String, String), String>,
}

#[async_trait]
impl SnmpClient for ScriptedClient {
    async fn walk(&self, address: &str, oid: &str) -> Result<String> {
        self.responses
            .get(&(address.to_string(), oid.to_string()))
            .cloned()
            .ok_or_else(|| AppError::snmp(address, "timed out after 5s"))
    }
}

struct BrokenSink;

#[async_trait]
impl ReportSink for BrokenSink {
    fn name(&self) -> &str {
        "email"
    }

    async fn deliver(&self, _report: &Report) -> Result<()> {
        Err(AppError::delivery("email", "535 authentication failed"))
    }
}

fn inventory() -> Config {
    Config {
        devices: vec![
            Device::new("lp2", "10.0.0.2", TrayKind::Coded),
            Device::new("lp3", "10.0.0.3", TrayKind::Text),
            Device::new("lp4", "10.0.0.4", TrayKind::Coded),
            Device::new("clp", "10.0.0.5", TrayKind::Text),
            Device::new("lp5", "10.0.0.9", TrayKind::Coded),
        ],
        ..Config::default()
    }
}

fn scripted(config: &Config) -> ScriptedClient {
    let toner = config.snmp.toner_oid.as_str();
    let coded = config.snmp.coded_tray_oid.as_str();
    let text = config.snmp.text_tray_oid.as_str();

    let entries = [
        ("10.0.0.2", toner, "t.1 = INTEGER: 5\nt.2 = INTEGER: -1\n"),
        ("10.0.0.2", coded, "c.0 = INTEGER: 0\nc.1 = INTEGER: 1\n"),
        ("10.0.0.3", toner, "t.1 = INTEGER: 62\n"),
        ("10.0.0.3", text, ""),
        ("10.0.0.4", toner, "t.1 = INTEGER: 9\nt.2 = INTEGER: 40\n"),
        ("10.0.0.4", coded, "c.0 = INTEGER: 0\nc.1 = INTEGER: -3\n"),
        ("10.0.0.5", toner, "t.1 = INTEGER: 80\n"),
        ("10.0.0.5", text, "a.1 = STRING: \"Paper TRAY EMPTY now\"\n"),
        // lp5 never answers
    ];

    ScriptedClient {
        responses: entries
            .into_iter()
            .map(|(addr, oid, out)| ((addr.to_string(), oid.to_string()), out.to_string()))
            .collect(),
    }
}

#[tokio::test]
async fn full_cycle_builds_rows_in_inventory_order() {
    let config = inventory();
    let client = Arc::new(scripted(&config));

    let (report, summary) = run_pipeline(&config, client, &SinkSet::default()).await;

    assert!(summary.all_ok());
    let names: Vec<_> = report.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["lp2", "lp3", "lp4", "clp", "lp5"]);

    let lp2 = &report.rows[0];
    assert_eq!(lp2.severity, Severity::Critical);
    assert_eq!(lp2.tray_status, "Tray1: Paper Available; Tray2: Paper Empty");
    assert_eq!(lp2.toner_levels, "5%, N/A");

    let lp3 = &report.rows[1];
    assert_eq!(lp3.severity, Severity::Ok);
    assert_eq!(lp3.tray_status, "Tray1: Paper Available");
    assert_eq!(lp3.toner_levels, "62%");

    let lp4 = &report.rows[2];
    assert_eq!(lp4.severity, Severity::Low);
    assert_eq!(lp4.tray_status, "Tray1: Paper Available; Tray2: Unknown/Not Installed");

    let clp = &report.rows[3];
    assert_eq!(clp.severity, Severity::Critical);
    assert_eq!(clp.tray_status, "Tray1: Paper Empty");

    let lp5 = &report.rows[4];
    assert_eq!(lp5.severity, Severity::Ok);
    assert_eq!(lp5.tray_status, "Unknown");
    assert_eq!(lp5.toner_levels, "Unknown");
}

#[tokio::test]
async fn failed_sink_does_not_block_json_output() {
    let tmp = TempDir::new().unwrap();
    let config = inventory();
    let client = Arc::new(scripted(&config));
    let json_path = tmp.path().join("printer_status.json");

    let sinks: Vec<Box<dyn ReportSink>> = vec![
        Box::new(BrokenSink),
        Box::new(JsonFileSink::new(&json_path)),
    ];
    let (report, summary) = run_pipeline(&config, client, &sinks.into()).await;

    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.delivered, vec!["json".to_string()]);

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(saved["generated_at"], report.timestamp());
    assert_eq!(saved["printers"].as_array().unwrap().len(), 5);
    assert_eq!(saved["printers"][3]["printer"], "clp");
    assert_eq!(saved["printers"][3]["status"], "❌");
}

#[tokio::test]
async fn text_report_lists_every_device() {
    let config = inventory();
    let client = Arc::new(scripted(&config));

    let (report, _) = run_pipeline(&config, client, &SinkSet::default()).await;
    let text = render_text(&report);

    assert!(text.starts_with("Printer Status Report - "));
    assert_eq!(text.lines().count(), 4 + config.devices.len());
    for device in &config.devices {
        assert!(text.contains(&device.address));
    }
}
