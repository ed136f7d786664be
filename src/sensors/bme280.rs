//! BME280 interior environment sensor (temperature, humidity, pressure).
//!
//! The I²C driver is external ([`EnvironmentProbe`]).  This wrapper keeps
//! the last good value per channel so a missing or NaN reading never
//! reaches the protocol layer.

const DEFAULT_TEMPERATURE_C: f32 = 20.0;
const DEFAULT_HUMIDITY_PCT: f32 = 50.0;
const DEFAULT_PRESSURE_HPA: f32 = 1013.25;

/// One raw measurement set.  `None` when the device did not answer.
pub trait EnvironmentProbe {
    fn measure(&mut self) -> Option<Measurement>;
}

impl<P: EnvironmentProbe + ?Sized> EnvironmentProbe for Box<P> {
    fn measure(&mut self) -> Option<Measurement> {
        (**self).measure()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub pressure_hpa: f32,
}

impl Default for Measurement {
    fn default() -> Self {
        Self {
            temperature_c: DEFAULT_TEMPERATURE_C,
            humidity_pct: DEFAULT_HUMIDITY_PCT,
            pressure_hpa: DEFAULT_PRESSURE_HPA,
        }
    }
}

pub struct Bme280Sensor<P> {
    probe: P,
    last: Measurement,
    available: bool,
}

impl<P: EnvironmentProbe> Bme280Sensor<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            last: Measurement::default(),
            available: false,
        }
    }

    /// Measure, replacing only the channels that came back finite.
    pub fn read(&mut self) -> Measurement {
        match self.probe.measure() {
            Some(m) => {
                self.available = true;
                if m.temperature_c.is_finite() {
                    self.last.temperature_c = m.temperature_c;
                }
                if m.humidity_pct.is_finite() {
                    self.last.humidity_pct = m.humidity_pct;
                }
                if m.pressure_hpa.is_finite() {
                    self.last.pressure_hpa = m.pressure_hpa;
                }
            }
            None => {
                if self.available {
                    log::warn!("BME280: no answer, keeping last values");
                }
                self.available = false;
            }
        }
        self.last
    }

    pub fn is_available(&self) -> bool {
        self.available
    }
}
