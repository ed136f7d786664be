//! Valve grammars.
//!
//! [`ValveProtocol`] owns the timer setting: `CFG?` → `CFG:T=<seconds>`
//! and the matching write.  [`ValveVerbs`] owns `OPEN` / `CLOSE`, which
//! drive the actuator and answer with the countdown notification.  Each
//! leaves the other's lines unhandled so they can be chained with
//! [`dispatch`](super::dispatch).

use log::{info, warn};

use super::{ACK_OK, CommandHandler, Reply, parse_cfg_fields};
use crate::app::ports::{Actuator, SettingsStore};
use crate::control::countdown::Countdown;
use crate::error::ProtocolError;
use crate::settings::ValveSettings;

const AUTO_CLOSE_RANGE: core::ops::RangeInclusive<i32> = 1..=300;

pub const VALVE_OPEN: u8 = 255;
pub const VALVE_CLOSED: u8 = 0;

pub struct ValveProtocol<'a> {
    settings: &'a ValveSettings,
    store: &'a mut dyn SettingsStore,
}

impl<'a> ValveProtocol<'a> {
    pub fn new(settings: &'a ValveSettings, store: &'a mut dyn SettingsStore) -> Self {
        Self { settings, store }
    }

    fn write_cfg(&mut self, rx: &str) -> Result<String, ProtocolError> {
        let [seconds] = parse_cfg_fields(rx, [("T", AUTO_CLOSE_RANGE)])?;
        self.settings
            .set_auto_close_seconds(self.store, seconds)
            .map_err(|e| {
                warn!("valve timer not persisted: {e}");
                ProtocolError::CfgStorage
            })?;
        info!("valve auto-close set to {seconds}s");
        Ok(ACK_OK.into())
    }
}

impl CommandHandler for ValveProtocol<'_> {
    fn respond(&mut self, rx: &str) -> Reply {
        if rx == "CFG?" {
            let t = self.settings.auto_close_seconds(&*self.store);
            return Some(Ok(format!("CFG:T={t}")));
        }
        if rx.starts_with("CFG:") {
            return Some(self.write_cfg(rx));
        }
        None
    }
}

pub struct ValveVerbs<'a, A> {
    actuator: &'a mut A,
    countdown: &'a mut Countdown,
    open_seconds: u32,
    now_ms: u64,
}

impl<'a, A: Actuator> ValveVerbs<'a, A> {
    /// `open_seconds` is the auto-close delay armed by `OPEN`.
    pub fn new(actuator: &'a mut A, countdown: &'a mut Countdown, open_seconds: u32, now_ms: u64) -> Self {
        Self {
            actuator,
            countdown,
            open_seconds,
            now_ms,
        }
    }
}

impl<A: Actuator> CommandHandler for ValveVerbs<'_, A> {
    fn respond(&mut self, rx: &str) -> Reply {
        let notification = match rx {
            "OPEN" => {
                self.actuator.set_speed(VALVE_OPEN);
                self.countdown.open(self.open_seconds, self.now_ms)
            }
            "CLOSE" => {
                self.actuator.set_speed(VALVE_CLOSED);
                self.countdown.close()
            }
            _ => return None,
        };
        Some(Ok(notification.to_string()))
    }
}
