//! Tank dimension grammar: `CFG?` → `CFG:V=<liters>;H=<mm>`, and the
//! matching write.  This grammar owns its channel, so anything else is
//! answered with `ERR_UNKNOWN_CMD`.

use log::{info, warn};

use super::{ACK_OK, CommandHandler, Reply, parse_cfg_fields};
use crate::app::ports::SettingsStore;
use crate::error::ProtocolError;
use crate::settings::TankSettings;

const VOLUME_RANGE: core::ops::RangeInclusive<i32> = 1..=5_000;
const HEIGHT_RANGE: core::ops::RangeInclusive<i32> = 1..=10_000;

pub struct TankProtocol<'a> {
    settings: &'a TankSettings,
    store: &'a mut dyn SettingsStore,
}

impl<'a> TankProtocol<'a> {
    pub fn new(settings: &'a TankSettings, store: &'a mut dyn SettingsStore) -> Self {
        Self { settings, store }
    }

    fn write_cfg(&mut self, rx: &str) -> Result<String, ProtocolError> {
        let [volume, height] = parse_cfg_fields(rx, [("V", VOLUME_RANGE), ("H", HEIGHT_RANGE)])?;
        self.settings
            .set_dimensions(self.store, volume, height)
            .map_err(|e| {
                warn!("tank dimensions not persisted: {e}");
                ProtocolError::CfgStorage
            })?;
        info!("tank dimensions set: {volume} l, {height} mm");
        Ok(ACK_OK.into())
    }
}

impl CommandHandler for TankProtocol<'_> {
    fn respond(&mut self, rx: &str) -> Reply {
        Some(if rx == "CFG?" {
            Ok(format!(
                "CFG:V={};H={}",
                self.settings.volume_liters(&*self.store),
                self.settings.height_mm(&*self.store)
            ))
        } else if rx.starts_with("CFG:") {
            self.write_cfg(rx)
        } else {
            Err(ProtocolError::UnknownCommand)
        })
    }
}
