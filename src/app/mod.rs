//! Application core: routing, per-channel units and the collaborator ports.
//!
//! Nothing in here touches hardware.  Sensors, actuators, storage, time
//! and the radio are reached through the traits in [`ports`], so the
//! whole module runs under `cargo test` on the host.

pub mod events;
pub mod ports;
pub mod service;
pub mod units;
