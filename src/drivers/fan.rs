//! PWM fan (heater blower) over any embedded-hal PWM channel.
//!
//! Speed `0..=255` is mapped linearly onto the channel's duty range, so
//! the same driver works with an 8-bit LEDC timer or a 13-bit one.

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::Actuator;

pub struct PwmFan<P> {
    pwm: P,
    speed: u8,
}

impl<P: SetDutyCycle> PwmFan<P> {
    /// Wrap `pwm` and force it off.
    pub fn new(pwm: P) -> Self {
        let mut fan = Self { pwm, speed: 0 };
        fan.set_speed(0);
        fan
    }

    /// Last requested speed.
    pub fn speed(&self) -> u8 {
        self.speed
    }
}

impl<P: SetDutyCycle> Actuator for PwmFan<P> {
    fn set_speed(&mut self, speed: u8) {
        self.speed = speed;
        if let Err(e) = self.pwm.set_duty_cycle_fraction(u16::from(speed), u16::from(u8::MAX)) {
            warn!("fan: duty update failed: {e:?}");
        }
    }
}
