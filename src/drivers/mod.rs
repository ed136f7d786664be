//! Actuator drivers over embedded-hal peripherals.

pub mod fan;
pub mod relay;
