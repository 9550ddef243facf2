// src/lib.rs

//! printwatch: SNMP printer status monitor library

pub mod delivery;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
