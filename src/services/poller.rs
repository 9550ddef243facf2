// src/services/poller.rs

//! Printer polling service.
//!
//! Fetches toner and tray readings for every device in the inventory.

use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::models::{Config, Device, DeviceReading, SnmpConfig, TrayKind};
use crate::pipeline::interpret::{trays_from_codes, trays_from_text};
use crate::services::snmp::{SnmpClient, fetch_integers, fetch_text};

/// Service for polling printers over SNMP.
pub struct PrinterPoller {
    client: Arc<dyn SnmpClient>,
    snmp: SnmpConfig,
    max_concurrent: usize,
}

impl PrinterPoller {
    /// Create a poller using the given client and configuration.
    pub fn new(client: Arc<dyn SnmpClient>, config: &Config) -> Self {
        Self {
            client,
            snmp: config.snmp.clone(),
            max_concurrent: config.poll.max_concurrent.max(1),
        }
    }

    /// Fetch one device's readings. Failed fetches yield empty readings.
    pub async fn poll(&self, device: &Device) -> DeviceReading {
        let client = self.client.as_ref();

        let toner = fetch_integers(client, &device.address, &self.snmp.toner_oid).await;

        let tray_oid = device.tray_oid(&self.snmp);
        let trays = match device.tray {
            TrayKind::Coded => {
                let codes = fetch_integers(client, &device.address, tray_oid).await;
                trays_from_codes(&codes)
            }
            TrayKind::Text => {
                let text = fetch_text(client, &device.address, tray_oid).await;
                trays_from_text(text.as_deref())
            }
        };

        if toner.is_empty() && trays.is_empty() {
            log::warn!(
                "No readings from {} ({}); reporting as Unknown",
                device.name,
                device.address
            );
        } else {
            log::debug!(
                "{} ({}): {} toner levels, {} trays",
                device.name,
                device.address,
                toner.len(),
                trays.len()
            );
        }

        DeviceReading { toner, trays }
    }

    /// Poll every device, returning readings in inventory order.
    ///
    /// At most `max_concurrent` devices are in flight; with the default of 1
    /// each device is finished before the next one starts.
    pub async fn poll_all<'a>(&self, devices: &'a [Device]) -> Vec<(&'a Device, DeviceReading)> {
        log::info!(
            "Polling {} devices (max {} at once)",
            devices.len(),
            self.max_concurrent
        );

        stream::iter(devices)
            .map(|device| async move { (device, self.poll(device).await) })
            .buffered(self.max_concurrent)
            .collect()
            .await
    }
}
