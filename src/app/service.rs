//! Node service: the hexagonal core of one module.
//!
//! [`NodeService`] owns the settings store, the clock and every unit.  It
//! is driven from two directions only:
//!
//! ```text
//!  radio write ──▶ on_write(channel, payload) ──▶ unit.on_receive ──▶ Outbound
//!  control timer ──▶ tick() ──────────────────▶ unit.tick ─────────▶ Outbound
//! ```
//!
//! Ticks run whether or not a peer is connected; the [`Outbound`] link
//! drops what it cannot deliver.

use log::{debug, info, warn};

use crate::config::ModuleConfig;
use crate::control::regulator::Regulator;
use crate::error::ConfigError;
use crate::sensors::bme280::Bme280Sensor;
use crate::settings::AdminSettings;
use crate::signal::SignalPipeline;
use crate::transport::{Outbound, inbound_text};

use super::ports::{Board, Clock, SettingsStore};
use super::units::{AdminUnit, Context, EnvironmentUnit, HeaterUnit, TankUnit, Unit, ValveUnit};

pub struct NodeService<S, C> {
    default_name: String,
    tick_interval_ms: u32,
    settings: S,
    clock: C,
    admin: AdminUnit,
    units: Vec<Box<dyn Unit>>,
    tick_count: u64,
}

impl<S: SettingsStore, C: Clock> NodeService<S, C> {
    /// An empty node answering only the admin grammar.
    pub fn new(default_name: &str, admin_channel: &str, settings: S, clock: C) -> Self {
        Self {
            default_name: default_name.into(),
            tick_interval_ms: 0,
            settings,
            clock,
            admin: AdminUnit::new(admin_channel),
            units: Vec::new(),
            tick_count: 0,
        }
    }

    /// Validate `config` and build every unit it names on `board`.
    pub fn from_config(
        config: &ModuleConfig,
        settings: S,
        clock: C,
        board: &mut impl Board,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut node = Self::new(&config.device_name, &config.admin_channel, settings, clock);
        node.tick_interval_ms = config.tick_interval_ms;

        for (zone, h) in config.heaters.iter().enumerate() {
            let pipeline = SignalPipeline::with_filters(board.temperature_sensor(h.sensor_gpio), &h.filters)?;
            let fan = board.fan(h.fan_gpio, zone as u8);
            let regulator = Regulator::new(&h.name, fan, pipeline, &node.settings);
            node.add_unit(Box::new(HeaterUnit::new(&h.channel_id, regulator)));
        }

        for t in &config.tanks {
            let sensor = board.level_sensor(t.uart_rx_gpio, t.uart_tx_gpio);
            let pipeline = SignalPipeline::with_filters(sensor, &t.filters)?;
            node.add_unit(Box::new(TankUnit::new(&t.name, &t.channel_id, pipeline)));
        }

        for v in &config.valves {
            let relay = board.relay(v.relay_gpio);
            node.add_unit(Box::new(ValveUnit::new(&v.name, &v.channel_id, relay)));
        }

        if let Some(env) = &config.environment {
            let interior = Bme280Sensor::new(board.environment_probe(env.sda_gpio, env.scl_gpio));
            let exterior =
                SignalPipeline::with_filters(board.temperature_sensor(env.exterior_sensor_gpio), &env.filters)?;
            node.add_unit(Box::new(EnvironmentUnit::new(&env.channel_id, interior, exterior)));
        }

        info!(
            "node {:?}: {} heater(s), {} tank(s), {} valve(s), environment={}",
            config.device_name,
            config.heaters.len(),
            config.tanks.len(),
            config.valves.len(),
            config.environment.is_some()
        );
        Ok(node)
    }

    pub fn add_unit(&mut self, unit: Box<dyn Unit>) {
        self.units.push(unit);
    }

    // ── Inbound ───────────────────────────────────────────────

    /// Route one radio write to the unit that owns `channel_id`.
    pub fn on_write(&mut self, channel_id: &str, payload: &[u8], out: &mut dyn Outbound) {
        let Some(rx) = inbound_text(payload) else {
            return;
        };
        debug!("rx [{channel_id}] {rx:?}");

        let now_ms = self.clock.now_ms();
        let mut ctx = Context {
            store: &mut self.settings,
            out,
            now_ms,
        };

        if self.admin.channel_id() == channel_id {
            self.admin.on_receive(rx, &mut ctx);
            if self.admin.restart_requested() {
                info!("identity changed, restart requested");
            }
            return;
        }

        match self.units.iter_mut().find(|u| u.channel_id() == channel_id) {
            Some(unit) => unit.on_receive(rx, &mut ctx),
            None => warn!("write on unknown channel {channel_id}"),
        }
    }

    // ── Periodic ──────────────────────────────────────────────

    /// One control period for every unit, in registration order.
    pub fn tick(&mut self, out: &mut dyn Outbound) {
        self.tick_count += 1;
        let now_ms = self.clock.now_ms();
        let mut ctx = Context {
            store: &mut self.settings,
            out,
            now_ms,
        };
        for unit in &mut self.units {
            unit.tick(&mut ctx);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Persisted device name, or the configured default.
    pub fn device_name(&self) -> String {
        AdminSettings.device_name(&self.settings, &self.default_name)
    }

    /// A PIN or name change was accepted; the new identity is only
    /// advertised after a restart.
    pub fn restart_requested(&self) -> bool {
        self.admin.restart_requested()
    }

    pub fn tick_interval_ms(&self) -> u32 {
        self.tick_interval_ms
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Admin channel first, then units in registration order.
    pub fn channel_ids(&self) -> impl Iterator<Item = &str> {
        core::iter::once(self.admin.channel_id()).chain(self.units.iter().map(|u| u.channel_id()))
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }
}
