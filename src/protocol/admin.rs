//! Device identity grammar, shared by every module.
//!
//! `PIN:<6 digits>` and `NAME:<1..=20 chars>`; anything else is
//! `ERR_UNKNOWN_CMD`.  A successful change is flagged so the caller can
//! schedule the restart that makes the new identity visible.

use log::{info, warn};

use super::{ACK_OK, CommandHandler, Reply, is_alnum_sentence, is_numeric};
use crate::app::ports::SettingsStore;
use crate::error::ProtocolError;
use crate::settings::AdminSettings;

const PIN_LEN: usize = 6;
const NAME_MAX_LEN: usize = 20;

pub struct AdminProtocol<'a> {
    store: &'a mut dyn SettingsStore,
    changed: bool,
}

impl<'a> AdminProtocol<'a> {
    pub fn new(store: &'a mut dyn SettingsStore) -> Self {
        Self { store, changed: false }
    }

    /// `true` once a PIN or name was persisted by this handler.
    pub fn identity_changed(&self) -> bool {
        self.changed
    }

    fn write_pin(&mut self, pin: &str) -> Result<String, ProtocolError> {
        if pin.len() != PIN_LEN {
            return Err(ProtocolError::PinLength);
        }
        if !is_numeric(pin) {
            return Err(ProtocolError::PinNumber);
        }
        let code = pin.parse::<i32>().map_err(|_| ProtocolError::PinNumber)?;
        AdminSettings.set_pin_code(self.store, code).map_err(|e| {
            warn!("pin not persisted: {e}");
            ProtocolError::CfgStorage
        })?;
        info!("pin code changed");
        self.changed = true;
        Ok(ACK_OK.into())
    }

    fn write_name(&mut self, name: &str) -> Result<String, ProtocolError> {
        if name.is_empty() || name.len() > NAME_MAX_LEN {
            return Err(ProtocolError::NameLength);
        }
        if !is_alnum_sentence(name) {
            return Err(ProtocolError::NameChars);
        }
        AdminSettings.set_device_name(self.store, name).map_err(|e| {
            warn!("device name not persisted: {e}");
            ProtocolError::CfgStorage
        })?;
        info!("device name changed to {name:?}");
        self.changed = true;
        Ok(ACK_OK.into())
    }
}

impl CommandHandler for AdminProtocol<'_> {
    fn respond(&mut self, rx: &str) -> Reply {
        Some(if let Some(pin) = rx.strip_prefix("PIN:") {
            self.write_pin(pin)
        } else if let Some(name) = rx.strip_prefix("NAME:") {
            self.write_name(name)
        } else {
            Err(ProtocolError::UnknownCommand)
        })
    }
}
