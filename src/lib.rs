//! VanModule device-control library.
//!
//! Filter chains, the PID heater regulator, the per-channel command
//! protocols, chunked notification transport and the valve countdown.
//! Everything runs on the host; ESP-IDF code is guarded by
//! `#[cfg(target_os = "espidf")]` inside the adapters.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod protocol;
pub mod sensors;
pub mod settings;
pub mod signal;
pub mod transport;
