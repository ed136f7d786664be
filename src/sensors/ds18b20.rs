//! DS18B20 one-wire temperature probe.
//!
//! The bus driver (conversion request + scratchpad read) is external and
//! reached through [`TemperatureProbe`].  This wrapper converts to tenths
//! of a degree and declares which readings are usable.  The driver's
//! sentinels are matched on the exact float before conversion, so real
//! readings that round to the same tenths still pass:
//!
//! - `-127.0 °C`: probe disconnected
//! - `+85.0 °C`: power-on-reset scratchpad value, no conversion done yet
//! - anything outside the datasheet range of −55..=125 °C

use super::Sensor;

const DISCONNECTED_C: f32 = -127.0;
const POWER_ON_RESET_C: f32 = 85.0;

/// Reported for a sentinel or non-finite conversion; outside every range.
const REJECTED: i32 = i32::MIN;

const MIN_TENTHS: i32 = -550;
const MAX_TENTHS: i32 = 1250;

/// Blocking single-probe conversion, in degrees Celsius.
pub trait TemperatureProbe {
    fn read_celsius(&mut self) -> f32;
}

/// DS18B20 reading in tenths of a degree Celsius.
pub struct Ds18b20Sensor<P> {
    probe: P,
}

impl<P: TemperatureProbe> Ds18b20Sensor<P> {
    pub fn new(probe: P) -> Self {
        Self { probe }
    }
}

impl<P: TemperatureProbe> Sensor for Ds18b20Sensor<P> {
    #[allow(clippy::float_cmp)]
    fn read(&mut self) -> i32 {
        let celsius = self.probe.read_celsius();
        if !celsius.is_finite() || celsius == DISCONNECTED_C || celsius == POWER_ON_RESET_C {
            return REJECTED;
        }
        (celsius * 10.0).round() as i32
    }

    fn max_range(&self) -> i32 {
        MAX_TENTHS
    }

    fn accepts(&self, raw: i32) -> bool {
        (MIN_TENTHS..=MAX_TENTHS).contains(&raw)
    }
}
