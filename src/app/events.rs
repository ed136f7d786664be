//! Unsolicited outbound notifications.
//!
//! Units emit these on their own channel during a tick or as a side effect
//! of a command.  [`Display`](core::fmt::Display) renders the exact wire
//! text; the transport appends the line terminator.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification {
    /// Valve open, seconds left before auto-close.
    Countdown(u32),

    /// Valve closed by an explicit `CLOSE`.
    Closed,

    /// Valve closed because the countdown reached zero.
    AutoClosed,

    /// Tank sensor distance in millimetres.
    Level(i32),

    /// Interior climate plus exterior temperature, all in tenths.
    Environment {
        temperature: i32,
        humidity: i32,
        pressure: i32,
        exterior: i32,
    },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Countdown(n) => write!(f, "COUNTDOWN:{n}"),
            Self::Closed => f.write_str("CLOSED"),
            Self::AutoClosed => f.write_str("AUTO_CLOSED"),
            Self::Level(mm) => write!(f, "{mm}"),
            Self::Environment {
                temperature,
                humidity,
                pressure,
                exterior,
            } => write!(f, "ENV:T={temperature};H={humidity};P={pressure};EXT={exterior}"),
        }
    }
}
