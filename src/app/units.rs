//! Per-instance listeners.
//!
//! A unit owns one wireless channel.  [`NodeService`](super::service::NodeService)
//! hands it every non-empty inbound line on that channel and calls
//! [`Unit::tick`] once per control period.

use log::debug;

use super::events::Notification;
use super::ports::{Actuator, SettingsStore};
use crate::control::countdown::Countdown;
use crate::control::regulator::Regulator;
use crate::protocol::{CommandHandler, dispatch};
use crate::protocol::admin::AdminProtocol;
use crate::protocol::environment::EnvironmentProtocol;
use crate::protocol::heater::HeaterProtocol;
use crate::protocol::tank::TankProtocol;
use crate::protocol::valve::{VALVE_CLOSED, ValveProtocol, ValveVerbs};
use crate::sensors::bme280::{Bme280Sensor, EnvironmentProbe};
use crate::settings::{TankSettings, ValveSettings};
use crate::signal::SignalPipeline;
use crate::transport::Outbound;

/// Everything a unit may touch while handling a line or a tick.
pub struct Context<'a> {
    pub store: &'a mut dyn SettingsStore,
    pub out: &'a mut dyn Outbound,
    pub now_ms: u64,
}

pub trait Unit {
    fn channel_id(&self) -> &str;

    fn on_receive(&mut self, rx: &str, ctx: &mut Context<'_>);

    fn tick(&mut self, _ctx: &mut Context<'_>) {}
}

// ── Heater ───────────────────────────────────────────────────

pub struct HeaterUnit<A> {
    channel_id: String,
    regulator: Regulator<A>,
}

impl<A: Actuator> HeaterUnit<A> {
    pub fn new(channel_id: &str, regulator: Regulator<A>) -> Self {
        Self {
            channel_id: channel_id.into(),
            regulator,
        }
    }
}

impl<A: Actuator> Unit for HeaterUnit<A> {
    fn channel_id(&self) -> &str {
        &self.channel_id
    }

    fn on_receive(&mut self, rx: &str, ctx: &mut Context<'_>) {
        if let Some(reply) = HeaterProtocol::new(&mut self.regulator, ctx.store).handle(rx) {
            ctx.out.send(&self.channel_id, &reply);
        }
    }

    fn tick(&mut self, ctx: &mut Context<'_>) {
        self.regulator.update(ctx.store, ctx.now_ms);
    }
}

// ── Tank ─────────────────────────────────────────────────────

pub struct TankUnit {
    name: String,
    channel_id: String,
    settings: TankSettings,
    level: SignalPipeline,
}

impl TankUnit {
    pub fn new(name: &str, channel_id: &str, level: SignalPipeline) -> Self {
        Self {
            name: name.into(),
            channel_id: channel_id.into(),
            settings: TankSettings::new(name),
            level,
        }
    }
}

impl Unit for TankUnit {
    fn channel_id(&self) -> &str {
        &self.channel_id
    }

    fn on_receive(&mut self, rx: &str, ctx: &mut Context<'_>) {
        if let Some(reply) = TankProtocol::new(&self.settings, ctx.store).handle(rx) {
            ctx.out.send(&self.channel_id, &reply);
        }
    }

    /// Publish the current distance; nothing until the first valid frame.
    fn tick(&mut self, ctx: &mut Context<'_>) {
        let mm = self.level.read();
        if mm < 0 {
            debug!("{}: no level sample yet", self.name);
            return;
        }
        ctx.out.send(&self.channel_id, &Notification::Level(mm).to_string());
    }
}

// ── Valve ────────────────────────────────────────────────────

pub struct ValveUnit<A> {
    channel_id: String,
    settings: ValveSettings,
    actuator: A,
    countdown: Countdown,
}

impl<A: Actuator> ValveUnit<A> {
    /// The actuator is driven closed at construction.
    pub fn new(name: &str, channel_id: &str, mut actuator: A) -> Self {
        actuator.set_speed(VALVE_CLOSED);
        Self {
            channel_id: channel_id.into(),
            settings: ValveSettings::new(name),
            actuator,
            countdown: Countdown::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.countdown.is_open()
    }

    fn notify(&self, ctx: &mut Context<'_>, n: Notification) {
        ctx.out.send(&self.channel_id, &n.to_string());
    }
}

impl<A: Actuator> Unit for ValveUnit<A> {
    fn channel_id(&self) -> &str {
        &self.channel_id
    }

    fn on_receive(&mut self, rx: &str, ctx: &mut Context<'_>) {
        let seconds = self.settings.auto_close_seconds(&*ctx.store);
        let mut cfg = ValveProtocol::new(&self.settings, ctx.store);
        let mut verbs = ValveVerbs::new(
            &mut self.actuator,
            &mut self.countdown,
            u32::try_from(seconds).unwrap_or(1),
            ctx.now_ms,
        );
        let reply = dispatch(&mut [&mut cfg, &mut verbs], rx);
        match reply {
            Some(reply) => ctx.out.send(&self.channel_id, &reply),
            None => debug!("{}: ignored {rx:?}", self.channel_id),
        }
    }

    fn tick(&mut self, ctx: &mut Context<'_>) {
        let Some(n) = self.countdown.tick(ctx.now_ms) else {
            return;
        };
        if n == Notification::AutoClosed {
            self.actuator.set_speed(VALVE_CLOSED);
        }
        self.notify(ctx, n);
    }
}

// ── Admin ────────────────────────────────────────────────────

pub struct AdminUnit {
    channel_id: String,
    restart_requested: bool,
}

impl AdminUnit {
    pub fn new(channel_id: &str) -> Self {
        Self {
            channel_id: channel_id.into(),
            restart_requested: false,
        }
    }

    pub fn restart_requested(&self) -> bool {
        self.restart_requested
    }
}

impl Unit for AdminUnit {
    fn channel_id(&self) -> &str {
        &self.channel_id
    }

    fn on_receive(&mut self, rx: &str, ctx: &mut Context<'_>) {
        let mut protocol = AdminProtocol::new(ctx.store);
        let reply = protocol.handle(rx);
        self.restart_requested |= protocol.identity_changed();
        if let Some(reply) = reply {
            ctx.out.send(&self.channel_id, &reply);
        }
    }
}

// ── Environment ──────────────────────────────────────────────

pub struct EnvironmentUnit<P> {
    channel_id: String,
    interior: Bme280Sensor<P>,
    exterior: SignalPipeline,
}

impl<P: EnvironmentProbe> EnvironmentUnit<P> {
    pub fn new(channel_id: &str, interior: Bme280Sensor<P>, exterior: SignalPipeline) -> Self {
        Self {
            channel_id: channel_id.into(),
            interior,
            exterior,
        }
    }
}

impl<P: EnvironmentProbe> Unit for EnvironmentUnit<P> {
    fn channel_id(&self) -> &str {
        &self.channel_id
    }

    fn on_receive(&mut self, rx: &str, ctx: &mut Context<'_>) {
        if let Some(reply) = EnvironmentProtocol::new(&mut self.interior, &mut self.exterior).handle(rx) {
            ctx.out.send(&self.channel_id, &reply);
        }
    }
}
