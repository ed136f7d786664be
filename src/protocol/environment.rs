//! Environment query: `ENV?` → `ENV:T=<t>;H=<h>;P=<p>;EXT=<t>`, every
//! value in tenths and truncated toward zero.  Nothing else is handled.

use super::{CommandHandler, Reply};
use crate::app::events::Notification;
use crate::sensors::bme280::{Bme280Sensor, EnvironmentProbe};
use crate::signal::SignalPipeline;

pub struct EnvironmentProtocol<'a, P> {
    interior: &'a mut Bme280Sensor<P>,
    exterior: &'a mut SignalPipeline,
}

impl<'a, P: EnvironmentProbe> EnvironmentProtocol<'a, P> {
    pub fn new(interior: &'a mut Bme280Sensor<P>, exterior: &'a mut SignalPipeline) -> Self {
        Self { interior, exterior }
    }

    pub fn snapshot(&mut self) -> Notification {
        let m = self.interior.read();
        Notification::Environment {
            temperature: (m.temperature_c * 10.0) as i32,
            humidity: (m.humidity_pct * 10.0) as i32,
            pressure: (m.pressure_hpa * 10.0) as i32,
            exterior: self.exterior.read(),
        }
    }
}

impl<P: EnvironmentProbe> CommandHandler for EnvironmentProtocol<'_, P> {
    fn respond(&mut self, rx: &str) -> Reply {
        (rx == "ENV?").then(|| Ok(self.snapshot().to_string()))
    }
}
