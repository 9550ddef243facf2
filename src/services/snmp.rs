// src/services/snmp.rs

//! SNMP queries through an external `snmpwalk`-compatible command.
//!
//! The adapter reports failures as errors; the `fetch_*` helpers degrade them
//! to empty readings so a single unreachable printer never stops a cycle.

use std::process::Stdio;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tokio::process::Command;

use crate::error::{AppError, Result};
use crate::models::SnmpConfig;

/// Trailing integer of a walk line, e.g. `... = INTEGER: -3`.
static TRAILING_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)([-+]?\d+)\s*$").expect("valid regex"));

/// Source of raw SNMP walk output.
#[async_trait]
pub trait SnmpClient: Send + Sync {
    /// Walk `oid` on the device at `address`, returning the raw output.
    async fn walk(&self, address: &str, oid: &str) -> Result<String>;
}

/// Runs the configured walk command as a child process.
#[derive(Debug, Clone)]
pub struct SnmpWalk {
    command: String,
    community: String,
    timeout: Duration,
}

impl SnmpWalk {
    pub fn new(
        command: impl Into<String>,
        community: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            command: command.into(),
            community: community.into(),
            timeout,
        }
    }

    pub fn from_config(config: &SnmpConfig) -> Self {
        Self::new(&config.command, &config.community, config.timeout())
    }
}

#[async_trait]
impl SnmpClient for SnmpWalk {
    async fn walk(&self, address: &str, oid: &str) -> Result<String> {
        let child = Command::new(&self.command)
            .args(["-v2c", "-c", self.community.as_str(), address, oid])
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| AppError::snmp(address, format!("timed out after {:?}", self.timeout)))?
            .map_err(|e| {
                AppError::snmp(address, format!("failed to run {}: {}", self.command, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::snmp(
                address,
                format!("{} exited with {}: {}", self.command, output.status, stderr.trim()),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Extract one integer per `OID = TYPE: VALUE` line, in output order.
///
/// Lines without `=` or without a trailing integer are skipped.
pub fn parse_integers(output: &str) -> Vec<i64> {
    output
        .lines()
        .filter_map(|line| {
            let (_, value) = line.split_once('=')?;
            let caps = TRAILING_INT.captures(value)?;
            match caps[1].parse::<i64>() {
                Ok(n) => Some(n),
                Err(_) => {
                    log::debug!("Skipping unparseable SNMP line: {line}");
                    None
                }
            }
        })
        .collect()
}

/// Walk an integer table, returning no values on any failure.
pub async fn fetch_integers(client: &dyn SnmpClient, address: &str, oid: &str) -> Vec<i64> {
    match client.walk(address, oid).await {
        Ok(output) => parse_integers(&output),
        Err(e) => {
            log::warn!("SNMP walk of {oid} failed: {e}");
            Vec::new()
        }
    }
}

/// Walk a text table, returning `None` on any failure.
pub async fn fetch_text(client: &dyn SnmpClient, address: &str, oid: &str) -> Option<String> {
    match client.walk(address, oid).await {
        Ok(output) => Some(output.trim().to_string()),
        Err(e) => {
            log::warn!("SNMP walk of {oid} failed: {e}");
            None
        }
    }
}
