//! PID temperature regulator.
//!
//! Feedback comes from a [`SignalPipeline`] in tenths of a degree; output
//! drives an [`Actuator`] in `0..=255`.  Gains are not cached: they are
//! read from the settings store on every tick so a `CFG:` write takes
//! effect on the next update.

use log::{debug, info};

use crate::app::ports::{Actuator, SettingsStore};
use crate::settings::HeaterSettings;
use crate::signal::SignalPipeline;

/// dt used for the first tick after [`Regulator::start`].
const FIRST_TICK_DT_S: f32 = 0.1;
const MIN_DT_S: f32 = 0.001;

pub const INTEGRAL_MIN: f32 = -10_000.0;
pub const INTEGRAL_MAX: f32 = 10_000.0;

pub const OUTPUT_MIN: i32 = 0;
pub const OUTPUT_MAX: i32 = 255;

pub struct Regulator<A> {
    name: String,
    settings: HeaterSettings,
    actuator: A,
    pipeline: SignalPipeline,
    setpoint: f32,
    integral: f32,
    last_error: f32,
    last_update_ms: Option<u64>,
    running: bool,
}

impl<A: Actuator> Regulator<A> {
    /// Build a stopped regulator; the setpoint is loaded from `<name>_sp`.
    pub fn new(name: &str, actuator: A, pipeline: SignalPipeline, store: &dyn SettingsStore) -> Self {
        let settings = HeaterSettings::new(name);
        let setpoint = settings.setpoint_tenths(store) as f32 / 10.0;
        Self {
            name: name.into(),
            settings,
            actuator,
            pipeline,
            setpoint,
            integral: 0.0,
            last_error: 0.0,
            last_update_ms: None,
            running: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &HeaterSettings {
        &self.settings
    }

    pub fn start(&mut self) {
        self.running = true;
        self.last_update_ms = None;
        info!("{}: regulator started", self.name);
    }

    /// Stop and force the actuator off immediately.
    pub fn stop(&mut self) {
        self.running = false;
        self.actuator.set_speed(0);
        info!("{}: regulator stopped", self.name);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_setpoint(&mut self, celsius: f32) {
        self.setpoint = celsius;
        info!("{}: setpoint changed to {:.1} C", self.name, celsius);
    }

    pub fn setpoint(&self) -> f32 {
        self.setpoint
    }

    pub fn setpoint_tenths(&self) -> i32 {
        (self.setpoint * 10.0).round() as i32
    }

    /// Fresh feedback reading in tenths, `-1` until the first valid sample.
    pub fn current_temp_tenths(&mut self) -> i32 {
        let tenths = self.pipeline.read();
        debug!("{}: temperature read {}", self.name, tenths);
        tenths
    }

    /// One control step.  No-op while stopped or while the feedback
    /// pipeline has never produced a valid sample.
    pub fn update(&mut self, store: &dyn SettingsStore, now_ms: u64) {
        if !self.running {
            return;
        }

        let dt = match self.last_update_ms {
            None => FIRST_TICK_DT_S,
            Some(last) => now_ms.saturating_sub(last) as f32 / 1000.0,
        }
        .max(MIN_DT_S);
        self.last_update_ms = Some(now_ms);

        let Some(tenths) = self.pipeline.sample() else {
            debug!("{}: no valid temperature yet, output unchanged", self.name);
            return;
        };
        let current = tenths as f32 / 10.0;

        let (kp, ki, kd) = self.settings.gains(store).scaled();
        let error = self.setpoint - current;

        let p = kp * error;

        self.integral = (self.integral + error * dt).clamp(INTEGRAL_MIN, INTEGRAL_MAX);
        let i = ki * self.integral;

        let d = kd * (error - self.last_error) / dt;
        self.last_error = error;

        let output = ((p + i + d) as i32).clamp(OUTPUT_MIN, OUTPUT_MAX);
        self.actuator.set_speed(output as u8);

        debug!(
            "{}: PID temp={:.1} sp={:.1} err={:.1} P={:.1} I={:.1} D={:.1} out={}",
            self.name, current, self.setpoint, error, p, i, d, output
        );
    }

    #[cfg(test)]
    pub(crate) fn integral(&self) -> f32 {
        self.integral
    }
}
