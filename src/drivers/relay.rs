//! Valve relay on a push-pull GPIO, active HIGH.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::Actuator;

pub struct Relay<P> {
    pin: P,
    energized: bool,
}

impl<P: OutputPin> Relay<P> {
    /// Wrap `pin` and release the relay.
    pub fn new(pin: P) -> Self {
        let mut relay = Self {
            pin,
            energized: false,
        };
        relay.set_speed(0);
        relay
    }

    pub fn is_energized(&self) -> bool {
        self.energized
    }
}

impl<P: OutputPin> Actuator for Relay<P> {
    /// Any non-zero speed closes the contact.
    fn set_speed(&mut self, speed: u8) {
        let on = speed > 0;
        let result = if on { self.pin.set_high() } else { self.pin.set_low() };
        match result {
            Ok(()) => self.energized = on,
            Err(e) => warn!("relay: pin write failed: {e:?}"),
        }
    }
}
