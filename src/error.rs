//! Error types for the device-control core.
//!
//! Nothing in the core is fatal.  Protocol validation failures travel back
//! to the peer as short ASCII codes (see [`ProtocolError::code`]); storage
//! failures are typed by the settings port; module wiring errors are
//! reported by [`ConfigError`] before anything is constructed.
//! All variants are `Copy` so they can be returned from deep inside a
//! handler without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Protocol errors
// ---------------------------------------------------------------------------

/// A command line was understood by a handler but rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// A required `KEY=` field is missing or empty.
    CfgFormat,
    /// A config value is not a strict positive integer.
    CfgNumber,
    /// A config value parsed but falls outside its allowed range.
    CfgRange,
    /// The settings store refused the write.
    CfgStorage,
    /// Setpoint is not a plain digit string.
    SpNumber,
    /// Setpoint parsed but falls outside 0..=500 tenths.
    SpRange,
    /// PIN is not exactly six characters.
    PinLength,
    /// PIN contains a non-digit.
    PinNumber,
    /// Device name is empty or longer than 20 bytes.
    NameLength,
    /// Device name contains a character outside `[A-Za-z0-9 _-]`.
    NameChars,
    /// The handler owns this channel but does not know the verb.
    UnknownCommand,
}

impl ProtocolError {
    /// Wire representation sent back to the peer.
    pub const fn code(self) -> &'static str {
        match self {
            Self::CfgFormat => "ERR_CFG_FMT",
            Self::CfgNumber => "ERR_CFG_NUM",
            Self::CfgRange => "ERR_CFG_RANGE",
            Self::CfgStorage => "ERR_CFG_IO",
            Self::SpNumber => "ERR_SP_NUM",
            Self::SpRange => "ERR_SP_RANGE",
            Self::PinLength => "ERR_PIN_LEN",
            Self::PinNumber => "ERR_PIN_NUM",
            Self::NameLength => "ERR_NAME_LEN",
            Self::NameChars => "ERR_NAME_CHARS",
            Self::UnknownCommand => "ERR_UNKNOWN_CMD",
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// Module configuration errors
// ---------------------------------------------------------------------------

/// Rejected [`ModuleConfig`](crate::config::ModuleConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A unit name is empty.
    EmptyName,
    /// A unit name is too long to build settings keys under the NVS limit.
    NameTooLong,
    /// Two units share a name, so their settings keys would collide.
    DuplicateName,
    /// Two units share a channel id.
    DuplicateChannel,
    /// Median window outside 1..=16.
    MedianWindow,
    /// EMA alpha outside (0, 1].
    EmaAlpha,
    /// Tick interval of zero.
    TickInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "unit name must not be empty"),
            Self::NameTooLong => write!(f, "unit name longer than 10 bytes"),
            Self::DuplicateName => write!(f, "duplicate unit name"),
            Self::DuplicateChannel => write!(f, "duplicate channel id"),
            Self::MedianWindow => write!(f, "median window must be 1-16"),
            Self::EmaAlpha => write!(f, "EMA alpha must be in (0, 1]"),
            Self::TickInterval => write!(f, "tick interval must be non-zero"),
        }
    }
}

impl core::error::Error for ConfigError {}
