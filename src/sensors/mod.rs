//! Sensor capability trait and the concrete probes used by the modules.
//!
//! A sensor only reports a raw integer in its own unit (millimetres,
//! tenths of a degree) plus its declared range.  Validity gating and
//! fallback to the last good value live in
//! [`SignalPipeline`](crate::signal::SignalPipeline), not here.

pub mod bme280;
pub mod ds18b20;
pub mod ultrasonic;

extern crate alloc;
use alloc::boxed::Box;

/// Raw sensor reading source.
pub trait Sensor {
    /// Non-blocking read.  Negative values mean "no data right now".
    fn read(&mut self) -> i32;

    /// Largest physically meaningful reading.
    fn max_range(&self) -> i32;

    /// Whether `raw` is a usable reading.
    ///
    /// Default rule: `0 < raw <= max_range()`.  Sensors whose unit
    /// legitimately includes zero or negatives override this.
    fn accepts(&self, raw: i32) -> bool {
        raw > 0 && raw <= self.max_range()
    }
}

impl<S: Sensor + ?Sized> Sensor for Box<S> {
    fn read(&mut self) -> i32 {
        (**self).read()
    }

    fn max_range(&self) -> i32 {
        (**self).max_range()
    }

    fn accepts(&self, raw: i32) -> bool {
        (**self).accepts(raw)
    }
}
