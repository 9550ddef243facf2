// src/models/device.rs

//! Printer inventory entries.

use serde::{Deserialize, Serialize};

use crate::models::SnmpConfig;

/// How a printer exposes its paper tray status over SNMP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrayKind {
    /// One integer status code per tray
    #[default]
    Coded,
    /// Free-form alert text; a single tray is reported
    Text,
}

impl TrayKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrayKind::Coded => "coded",
            TrayKind::Text => "text",
        }
    }
}

/// A printer in the inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Device {
    /// Logical printer name (e.g., "lp2")
    pub name: String,

    /// Network address passed to the SNMP client
    pub address: String,

    /// Tray status capability
    #[serde(default)]
    pub tray: TrayKind,

    /// Tray OID override; falls back to the default for `tray`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tray_oid: Option<String>,
}

impl Device {
    pub fn new(name: impl Into<String>, address: impl Into<String>, tray: TrayKind) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            tray,
            tray_oid: None,
        }
    }

    /// Resolve the OID used to read this device's tray status.
    pub fn tray_oid<'a>(&'a self, snmp: &'a SnmpConfig) -> &'a str {
        match (&self.tray_oid, self.tray) {
            (Some(oid), _) => oid,
            (None, TrayKind::Coded) => &snmp.coded_tray_oid,
            (None, TrayKind::Text) => &snmp.text_tray_oid,
        }
    }
}
