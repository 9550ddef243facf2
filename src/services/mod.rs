//! Service layer for the printer monitor.
//!
//! This module contains the device I/O:
//! - SNMP queries through an external command (`SnmpWalk`)
//! - Per-device polling (`PrinterPoller`)

pub mod poller;
pub mod snmp;

pub use poller::PrinterPoller;
pub use snmp::{SnmpClient, SnmpWalk};
