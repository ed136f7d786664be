//! Port traits: the boundary between the control core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ units / NodeService (domain)
//! ```
//!
//! Drivers (fan, relay), the settings backend (NVS), the clock and the
//! wireless stack implement these traits.  The core consumes them via
//! generics or trait objects and never touches hardware directly.

extern crate alloc;
use alloc::boxed::Box;
use alloc::string::String;

use crate::sensors::Sensor;
use crate::sensors::bme280::EnvironmentProbe;

// ───────────────────────────────────────────────────────────────
// Actuator port (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Anything that accepts an 8-bit drive level: a PWM fan, a relay.
pub trait Actuator {
    /// Drive the output.  `0` is off, `255` is full drive.
    fn set_speed(&mut self, speed: u8);
}

impl<A: Actuator + ?Sized> Actuator for Box<A> {
    fn set_speed(&mut self, speed: u8) {
        (**self).set_speed(speed);
    }
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Wireless link ports
// ───────────────────────────────────────────────────────────────

/// Connection-lifecycle oracle owned by the wireless stack.
pub trait ConnectionState {
    fn is_connected(&self) -> bool;
}

/// Emits one notification on a channel's TX characteristic.
///
/// Callers never pass more than one fragment (20 bytes) at a time.
pub trait Notifier {
    fn notify(&mut self, channel_id: &str, fragment: &[u8]);
}

// ───────────────────────────────────────────────────────────────
// Settings port (domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Flat persisted key → integer-or-string store.
///
/// Keys are at most 15 bytes (NVS limit).  Reads never fail: a missing or
/// unreadable key yields the supplied default.
pub trait SettingsStore {
    fn get_int(&self, key: &str, default: i32) -> i32;

    fn set_int(&mut self, key: &str, value: i32) -> Result<(), StorageError>;

    fn get_str(&self, key: &str, default: &str) -> String;

    fn set_str(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Persist several integers as one unit.
    ///
    /// The default writes them one by one; backends with a commit step
    /// should override this and commit once.
    fn set_many(&mut self, entries: &[(&str, i32)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set_int(key, *value)?;
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`SettingsStore`] writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage partition is full.
    Full,
    /// Generic I/O error.
    IoError,
    /// Key is empty or longer than the backend allows.
    InvalidKey,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
            Self::InvalidKey => write!(f, "invalid key"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Board port (wiring → hardware handles)
// ───────────────────────────────────────────────────────────────

/// Turns the pin numbers of a [`ModuleConfig`](crate::config::ModuleConfig)
/// into live hardware handles.  Implemented once per board; tests pass
/// a mock.
pub trait Board {
    /// DS18B20-style probe on a one-wire line, tenths of °C.
    fn temperature_sensor(&mut self, gpio: i32) -> Box<dyn Sensor>;

    /// UART ultrasonic range finder, millimetres.
    fn level_sensor(&mut self, rx_gpio: i32, tx_gpio: i32) -> Box<dyn Sensor>;

    /// PWM fan; `channel` is the zone index.
    fn fan(&mut self, gpio: i32, channel: u8) -> Box<dyn Actuator>;

    fn relay(&mut self, gpio: i32) -> Box<dyn Actuator>;

    fn environment_probe(&mut self, sda_gpio: i32, scl_gpio: i32) -> Box<dyn EnvironmentProbe>;
}
