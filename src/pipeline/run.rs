// src/pipeline/run.rs

//! End-to-end poll cycle.

use std::sync::Arc;

use crate::delivery::{DeliverySummary, SinkSet, deliver_all};
use crate::models::{Config, Device, Report, Severity};
use crate::pipeline::report::build_report;
use crate::services::{PrinterPoller, SnmpClient};

/// Poll `devices` and build a report.
///
/// The timestamp is taken once before the first device is polled.
pub async fn run_poll(config: &Config, client: Arc<dyn SnmpClient>, devices: &[Device]) -> Report {
    let generated_at = Report::now();
    let poller = PrinterPoller::new(client, config);

    let readings = poller.poll_all(devices).await;
    let report = build_report(
        readings.iter().map(|(device, reading)| (*device, reading)),
        config.poll.toner_low_percent,
        generated_at,
    );

    log::info!(
        "Report built: {} devices, {} critical, {} low",
        report.rows.len(),
        report.count(Severity::Critical),
        report.count(Severity::Low)
    );
    report
}

/// Poll the whole inventory, then hand the report to every sink.
pub async fn run_pipeline(
    config: &Config,
    client: Arc<dyn SnmpClient>,
    sinks: &SinkSet,
) -> (Report, DeliverySummary) {
    let report = run_poll(config, client, &config.devices).await;
    let summary = deliver_all(sinks, &report).await;
    (report, summary)
}
