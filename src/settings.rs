//! Typed views over the flat persisted [`SettingsStore`].
//!
//! Every view is bound to one instance name; keys are `<name><suffix>`
//! (e.g. `grey_valve_ac_s`), so two instances never share a key as long
//! as their names differ.  Values are fixed-point integers: gains ×100,
//! temperatures ×10.

extern crate alloc;
use alloc::format;
use alloc::string::String;

use crate::app::ports::{SettingsStore, StorageError};

pub const DEFAULT_KP: i32 = 1000;
pub const DEFAULT_KI: i32 = 10;
pub const DEFAULT_KD: i32 = 50;
pub const DEFAULT_SETPOINT_TENTHS: i32 = 200;
pub const DEFAULT_TANK_VOLUME_L: i32 = 150;
pub const DEFAULT_TANK_HEIGHT_MM: i32 = 500;
pub const DEFAULT_AUTO_CLOSE_S: i32 = 30;
pub const DEFAULT_PIN_CODE: i32 = 123_456;

const KEY_DEVICE_NAME: &str = "device_name";
const KEY_PIN_CODE: &str = "pin_code";

fn key(name: &str, suffix: &str) -> String {
    format!("{name}{suffix}")
}

// ── Heater ───────────────────────────────────────────────────

/// PID gains as stored: value ×100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredGains {
    pub kp: i32,
    pub ki: i32,
    pub kd: i32,
}

impl StoredGains {
    /// Gains as floats (`stored / 100`).
    pub fn scaled(self) -> (f32, f32, f32) {
        (
            self.kp as f32 / 100.0,
            self.ki as f32 / 100.0,
            self.kd as f32 / 100.0,
        )
    }
}

impl Default for StoredGains {
    fn default() -> Self {
        Self { kp: DEFAULT_KP, ki: DEFAULT_KI, kd: DEFAULT_KD }
    }
}

#[derive(Debug, Clone)]
pub struct HeaterSettings {
    kp: String,
    ki: String,
    kd: String,
    sp: String,
}

impl HeaterSettings {
    pub fn new(name: &str) -> Self {
        Self {
            kp: key(name, "_kp"),
            ki: key(name, "_ki"),
            kd: key(name, "_kd"),
            sp: key(name, "_sp"),
        }
    }

    pub fn gains(&self, store: &dyn SettingsStore) -> StoredGains {
        StoredGains {
            kp: store.get_int(&self.kp, DEFAULT_KP),
            ki: store.get_int(&self.ki, DEFAULT_KI),
            kd: store.get_int(&self.kd, DEFAULT_KD),
        }
    }

    pub fn set_gains(&self, store: &mut dyn SettingsStore, gains: StoredGains) -> Result<(), StorageError> {
        store.set_many(&[(&self.kp, gains.kp), (&self.ki, gains.ki), (&self.kd, gains.kd)])
    }

    pub fn setpoint_tenths(&self, store: &dyn SettingsStore) -> i32 {
        store.get_int(&self.sp, DEFAULT_SETPOINT_TENTHS)
    }

    pub fn set_setpoint_tenths(&self, store: &mut dyn SettingsStore, tenths: i32) -> Result<(), StorageError> {
        store.set_int(&self.sp, tenths)
    }
}

// ── Tank ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct TankSettings {
    volume: String,
    height: String,
}

impl TankSettings {
    pub fn new(name: &str) -> Self {
        Self {
            volume: key(name, "_v_l"),
            height: key(name, "_h_mm"),
        }
    }

    pub fn volume_liters(&self, store: &dyn SettingsStore) -> i32 {
        store.get_int(&self.volume, DEFAULT_TANK_VOLUME_L)
    }

    pub fn height_mm(&self, store: &dyn SettingsStore) -> i32 {
        store.get_int(&self.height, DEFAULT_TANK_HEIGHT_MM)
    }

    pub fn set_dimensions(
        &self,
        store: &mut dyn SettingsStore,
        volume_liters: i32,
        height_mm: i32,
    ) -> Result<(), StorageError> {
        store.set_many(&[(&self.volume, volume_liters), (&self.height, height_mm)])
    }
}

// ── Valve ────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ValveSettings {
    auto_close: String,
}

impl ValveSettings {
    pub fn new(name: &str) -> Self {
        Self { auto_close: key(name, "_ac_s") }
    }

    pub fn auto_close_seconds(&self, store: &dyn SettingsStore) -> i32 {
        store.get_int(&self.auto_close, DEFAULT_AUTO_CLOSE_S)
    }

    pub fn set_auto_close_seconds(&self, store: &mut dyn SettingsStore, seconds: i32) -> Result<(), StorageError> {
        store.set_int(&self.auto_close, seconds)
    }
}

// ── Admin ────────────────────────────────────────────────────

/// Device-wide identity settings (not instance-prefixed).
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminSettings;

impl AdminSettings {
    pub fn device_name(&self, store: &dyn SettingsStore, default: &str) -> String {
        store.get_str(KEY_DEVICE_NAME, default)
    }

    pub fn set_device_name(&self, store: &mut dyn SettingsStore, name: &str) -> Result<(), StorageError> {
        store.set_str(KEY_DEVICE_NAME, name)
    }

    pub fn pin_code(&self, store: &dyn SettingsStore) -> i32 {
        store.get_int(KEY_PIN_CODE, DEFAULT_PIN_CODE)
    }

    pub fn set_pin_code(&self, store: &mut dyn SettingsStore, pin: i32) -> Result<(), StorageError> {
        store.set_int(KEY_PIN_CODE, pin)
    }
}
