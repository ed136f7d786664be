//! Module wiring.
//!
//! One [`ModuleConfig`] describes a whole board: which units exist, the
//! channel each one listens on, the pins its hardware sits on and the
//! filter chain of every signal.  Persisted per-unit tuning (gains,
//! dimensions, timers) lives in the settings store instead, see
//! [`crate::settings`].

use anyhow::Context;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pins;
use crate::signal::filter::FilterSpec;

/// NVS keys are at most 15 bytes and the longest suffix (`_h_mm`) is 5.
pub const MAX_UNIT_NAME_LEN: usize = 10;

const DEFAULT_TICK_INTERVAL_MS: u32 = 110;

fn default_tick_interval_ms() -> u32 {
    DEFAULT_TICK_INTERVAL_MS
}

fn default_admin_channel() -> String {
    pins::ADMIN_CHANNEL.into()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Advertised name used until the peer sets one with `NAME:`.
    pub device_name: String,
    /// Period of the control tick (regulators, countdowns, level
    /// notifications).
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u32,
    #[serde(default = "default_admin_channel")]
    pub admin_channel: String,
    #[serde(default)]
    pub heaters: Vec<HeaterConfig>,
    #[serde(default)]
    pub tanks: Vec<TankConfig>,
    #[serde(default)]
    pub valves: Vec<ValveConfig>,
    #[serde(default)]
    pub environment: Option<EnvironmentConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaterConfig {
    pub name: String,
    pub channel_id: String,
    pub sensor_gpio: i32,
    pub fan_gpio: i32,
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankConfig {
    pub name: String,
    pub channel_id: String,
    pub uart_rx_gpio: i32,
    pub uart_tx_gpio: i32,
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValveConfig {
    pub name: String,
    pub channel_id: String,
    pub relay_gpio: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub channel_id: String,
    pub exterior_sensor_gpio: i32,
    pub sda_gpio: i32,
    pub scl_gpio: i32,
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
}

impl ModuleConfig {
    /// Four-zone heater board with interior/exterior climate channel.
    pub fn heater_module() -> Self {
        let heaters = (0..4)
            .map(|i| HeaterConfig {
                name: pins::HEATER_NAMES[i].into(),
                channel_id: pins::HEATER_CHANNELS[i].into(),
                sensor_gpio: pins::HEATER_SENSOR_GPIOS[i],
                fan_gpio: pins::HEATER_FAN_GPIOS[i],
                filters: Vec::new(),
            })
            .collect();

        Self {
            device_name: "Heater Module".into(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            admin_channel: default_admin_channel(),
            heaters,
            tanks: Vec::new(),
            valves: Vec::new(),
            environment: Some(EnvironmentConfig {
                channel_id: pins::ENVIRONMENT_CHANNEL.into(),
                exterior_sensor_gpio: pins::EXTERIOR_SENSOR_GPIO,
                sda_gpio: pins::BME280_SDA_GPIO,
                scl_gpio: pins::BME280_SCL_GPIO,
                filters: Vec::new(),
            }),
        }
    }

    /// Clean and grey tank level sensors plus the grey-water valve.
    pub fn water_module() -> Self {
        let smoothing = vec![FilterSpec::Median { window: 9 }, FilterSpec::Ema { alpha: 0.5 }];
        Self {
            device_name: "Water Tank".into(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            admin_channel: default_admin_channel(),
            heaters: Vec::new(),
            tanks: vec![
                TankConfig {
                    name: "clean_tank".into(),
                    channel_id: pins::CLEAN_TANK_CHANNEL.into(),
                    uart_rx_gpio: pins::CLEAN_TANK_UART_RX_GPIO,
                    uart_tx_gpio: pins::CLEAN_TANK_UART_TX_GPIO,
                    filters: smoothing.clone(),
                },
                TankConfig {
                    name: "grey_tank".into(),
                    channel_id: pins::GREY_TANK_CHANNEL.into(),
                    uart_rx_gpio: pins::GREY_TANK_UART_RX_GPIO,
                    uart_tx_gpio: pins::GREY_TANK_UART_TX_GPIO,
                    filters: smoothing,
                },
            ],
            valves: vec![ValveConfig {
                name: "grey_valve".into(),
                channel_id: pins::GREY_VALVE_CHANNEL.into(),
                relay_gpio: pins::GREY_VALVE_RELAY_GPIO,
            }],
            environment: None,
        }
    }

    /// Parse a JSON wiring description and validate it.
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(text).context("module config is not valid JSON")?;
        config.validate().context("module config rejected")?;
        Ok(config)
    }

    /// Unit names in settings-key order (heaters, tanks, valves).
    fn unit_names(&self) -> impl Iterator<Item = &str> {
        self.heaters
            .iter()
            .map(|h| h.name.as_str())
            .chain(self.tanks.iter().map(|t| t.name.as_str()))
            .chain(self.valves.iter().map(|v| v.name.as_str()))
    }

    fn channel_ids(&self) -> impl Iterator<Item = &str> {
        core::iter::once(self.admin_channel.as_str())
            .chain(self.heaters.iter().map(|h| h.channel_id.as_str()))
            .chain(self.tanks.iter().map(|t| t.channel_id.as_str()))
            .chain(self.valves.iter().map(|v| v.channel_id.as_str()))
            .chain(self.environment.iter().map(|e| e.channel_id.as_str()))
    }

    fn filter_specs(&self) -> impl Iterator<Item = &FilterSpec> {
        self.heaters
            .iter()
            .flat_map(|h| h.filters.iter())
            .chain(self.tanks.iter().flat_map(|t| t.filters.iter()))
            .chain(self.environment.iter().flat_map(|e| e.filters.iter()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let result = self.check();
        if let Err(e) = result {
            warn!("module config rejected: {e}");
        }
        result
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::TickInterval);
        }

        let mut seen: Vec<&str> = Vec::new();
        for name in self.unit_names() {
            if name.is_empty() {
                return Err(ConfigError::EmptyName);
            }
            if name.len() > MAX_UNIT_NAME_LEN {
                return Err(ConfigError::NameTooLong);
            }
            if seen.contains(&name) {
                return Err(ConfigError::DuplicateName);
            }
            seen.push(name);
        }

        seen.clear();
        for id in self.channel_ids() {
            if seen.contains(&id) {
                return Err(ConfigError::DuplicateChannel);
            }
            seen.push(id);
        }

        self.filter_specs().try_for_each(FilterSpec::validate)
    }
}
