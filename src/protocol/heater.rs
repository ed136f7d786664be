//! Heater regulator grammar.
//!
//! | Request                  | Reply                                |
//! |--------------------------|--------------------------------------|
//! | `CFG?`                   | `CFG:KP=<n>;KI=<n>;KD=<n>`           |
//! | `CFG:KP=<n>;KI=<n>;KD=<n>` | `OK` / `ERR_CFG_*`                 |
//! | `START`, `STOP`          | `OK`                                 |
//! | `SP?`                    | `SP:<tenths>`                        |
//! | `SP:<tenths>`            | `OK` / `ERR_SP_NUM` / `ERR_SP_RANGE` |
//! | `STATUS?`                | `STATUS:T=<tenths>;SP=<tenths>;RUN=<0/1>` |
//!
//! Anything else is not handled.

use log::{info, warn};

use super::{ACK_OK, CommandHandler, Reply, is_numeric, parse_cfg_fields};
use crate::app::ports::{Actuator, SettingsStore};
use crate::control::regulator::Regulator;
use crate::error::ProtocolError;
use crate::settings::StoredGains;

const GAIN_RANGE: core::ops::RangeInclusive<i32> = 1..=10_000;
const SETPOINT_RANGE: core::ops::RangeInclusive<i32> = 0..=500;

pub struct HeaterProtocol<'a, A> {
    regulator: &'a mut Regulator<A>,
    store: &'a mut dyn SettingsStore,
}

impl<'a, A: Actuator> HeaterProtocol<'a, A> {
    pub fn new(regulator: &'a mut Regulator<A>, store: &'a mut dyn SettingsStore) -> Self {
        Self { regulator, store }
    }

    fn read_cfg(&self) -> String {
        let g = self.regulator.settings().gains(&*self.store);
        format!("CFG:KP={};KI={};KD={}", g.kp, g.ki, g.kd)
    }

    fn write_cfg(&mut self, rx: &str) -> Result<String, ProtocolError> {
        let [kp, ki, kd] = parse_cfg_fields(
            rx,
            [("KP", GAIN_RANGE), ("KI", GAIN_RANGE), ("KD", GAIN_RANGE)],
        )?;
        self.regulator
            .settings()
            .set_gains(self.store, StoredGains { kp, ki, kd })
            .map_err(|e| {
                warn!("{}: gains not persisted: {e}", self.regulator.name());
                ProtocolError::CfgStorage
            })?;
        info!("{}: gains set kp={kp} ki={ki} kd={kd}", self.regulator.name());
        Ok(ACK_OK.into())
    }

    fn write_setpoint(&mut self, value: &str) -> Result<String, ProtocolError> {
        if !is_numeric(value) {
            return Err(ProtocolError::SpNumber);
        }
        // digits that overflow i32 are numeric, just out of range
        let tenths = value.parse::<i32>().map_err(|_| ProtocolError::SpRange)?;
        if !SETPOINT_RANGE.contains(&tenths) {
            return Err(ProtocolError::SpRange);
        }

        self.regulator
            .settings()
            .set_setpoint_tenths(self.store, tenths)
            .map_err(|e| {
                warn!("{}: setpoint not persisted: {e}", self.regulator.name());
                ProtocolError::CfgStorage
            })?;
        self.regulator.set_setpoint(tenths as f32 / 10.0);
        Ok(ACK_OK.into())
    }

    fn status(&mut self) -> String {
        let t = self.regulator.current_temp_tenths();
        format!(
            "STATUS:T={t};SP={};RUN={}",
            self.regulator.setpoint_tenths(),
            u8::from(self.regulator.is_running())
        )
    }
}

impl<A: Actuator> CommandHandler for HeaterProtocol<'_, A> {
    fn respond(&mut self, rx: &str) -> Reply {
        let reply = match rx {
            "CFG?" => Ok(self.read_cfg()),
            "START" => {
                self.regulator.start();
                Ok(ACK_OK.into())
            }
            "STOP" => {
                self.regulator.stop();
                Ok(ACK_OK.into())
            }
            "SP?" => Ok(format!("SP:{}", self.regulator.setpoint_tenths())),
            "STATUS?" => Ok(self.status()),
            _ if rx.starts_with("CFG:") => self.write_cfg(rx),
            _ => match rx.strip_prefix("SP:") {
                Some(value) => self.write_setpoint(value),
                None => return None,
            },
        };
        Some(reply)
    }
}
