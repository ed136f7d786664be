//! NVS (Non-Volatile Storage) settings adapter.
//!
//! Implements [`SettingsStore`] over one NVS namespace.
//!
//! - **`target_os = "espidf"`**: `nvs_get_i32` / `nvs_set_i32` /
//!   `nvs_get_str` / `nvs_set_str` on a handle opened once at
//!   construction.  [`SettingsStore::set_many`] stages every entry and
//!   commits once.
//! - **host**: in-memory map, with a switch to make writes fail so the
//!   storage-error paths can be exercised.

use log::info;

use crate::app::ports::{SettingsStore, StorageError};

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::warn;

/// Namespace shared by every module's settings.
pub const SETTINGS_NAMESPACE: &str = "vm-settings";

/// NVS key and namespace limit, excluding the NUL terminator.
const MAX_KEY_LEN: usize = 15;

/// Copy `key` into a NUL-terminated buffer, rejecting empty or long keys.
fn key_buf(key: &str) -> Result<[u8; MAX_KEY_LEN + 1], StorageError> {
    let bytes = key.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_KEY_LEN || bytes.contains(&0) {
        return Err(StorageError::InvalidKey);
    }
    let mut buf = [0u8; MAX_KEY_LEN + 1];
    buf[..bytes.len()].copy_from_slice(bytes);
    Ok(buf)
}

#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Int(i32),
    Str(String),
}

pub struct NvsSettings {
    #[cfg(target_os = "espidf")]
    handle: nvs_handle_t,

    #[cfg(not(target_os = "espidf"))]
    store: HashMap<String, Entry>,
    #[cfg(not(target_os = "espidf"))]
    read_only: bool,
}

impl NvsSettings {
    /// Open [`SETTINGS_NAMESPACE`].
    pub fn new() -> Result<Self, StorageError> {
        Self::open(SETTINGS_NAMESPACE)
    }

    /// Initialise NVS flash (erasing it after a layout change) and open
    /// `namespace` read-write.
    #[cfg(target_os = "espidf")]
    pub fn open(namespace: &str) -> Result<Self, StorageError> {
        let ns = key_buf(namespace)?;

        // SAFETY: called from the single main-task context before any
        // other NVS access.
        let ret = unsafe { nvs_flash_init() };
        if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
            warn!("NVS: erasing and re-initialising flash partition");
            if unsafe { nvs_flash_erase() } != ESP_OK || unsafe { nvs_flash_init() } != ESP_OK {
                return Err(StorageError::IoError);
            }
        } else if ret != ESP_OK {
            return Err(StorageError::IoError);
        }

        let mut handle: nvs_handle_t = 0;
        let ret = unsafe { nvs_open(ns.as_ptr().cast(), nvs_open_mode_t_NVS_READWRITE, &mut handle) };
        if ret != ESP_OK {
            warn!("NVS: open {namespace:?} failed ({ret})");
            return Err(StorageError::IoError);
        }
        info!("NvsSettings: namespace {namespace:?} open");
        Ok(Self { handle })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn open(namespace: &str) -> Result<Self, StorageError> {
        key_buf(namespace)?;
        info!("NvsSettings: simulation backend ({namespace:?})");
        Ok(Self {
            store: HashMap::new(),
            read_only: false,
        })
    }

    /// Make every following write fail with [`StorageError::IoError`].
    #[cfg(not(target_os = "espidf"))]
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    #[cfg(target_os = "espidf")]
    fn map_err(ret: esp_err_t) -> StorageError {
        if ret == ESP_ERR_NVS_NOT_FOUND {
            StorageError::NotFound
        } else if ret == ESP_ERR_NVS_NOT_ENOUGH_SPACE {
            StorageError::Full
        } else if ret == ESP_ERR_NVS_INVALID_NAME || ret == ESP_ERR_NVS_KEY_TOO_LONG {
            StorageError::InvalidKey
        } else {
            StorageError::IoError
        }
    }

    #[cfg(target_os = "espidf")]
    fn stage_int(&mut self, key: &str, value: i32) -> Result<(), StorageError> {
        let k = key_buf(key)?;
        let ret = unsafe { nvs_set_i32(self.handle, k.as_ptr().cast(), value) };
        if ret != ESP_OK {
            warn!("NVS: set {key:?} failed ({ret})");
            return Err(Self::map_err(ret));
        }
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn commit(&mut self) -> Result<(), StorageError> {
        let ret = unsafe { nvs_commit(self.handle) };
        if ret != ESP_OK {
            warn!("NVS: commit failed ({ret})");
            return Err(Self::map_err(ret));
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn put(&mut self, key: &str, entry: Entry) -> Result<(), StorageError> {
        key_buf(key)?;
        if self.read_only {
            return Err(StorageError::IoError);
        }
        self.store.insert(key.into(), entry);
        Ok(())
    }
}

#[cfg(target_os = "espidf")]
impl Drop for NvsSettings {
    fn drop(&mut self) {
        unsafe { nvs_close(self.handle) };
    }
}

#[cfg(target_os = "espidf")]
impl SettingsStore for NvsSettings {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        let Ok(k) = key_buf(key) else {
            return default;
        };
        let mut value: i32 = 0;
        let ret = unsafe { nvs_get_i32(self.handle, k.as_ptr().cast(), &mut value) };
        if ret == ESP_OK { value } else { default }
    }

    fn set_int(&mut self, key: &str, value: i32) -> Result<(), StorageError> {
        self.stage_int(key, value)?;
        self.commit()
    }

    fn get_str(&self, key: &str, default: &str) -> String {
        let Ok(k) = key_buf(key) else {
            return default.into();
        };
        let mut len: usize = 0;
        let ret = unsafe { nvs_get_str(self.handle, k.as_ptr().cast(), core::ptr::null_mut(), &mut len) };
        if ret != ESP_OK || len == 0 {
            return default.into();
        }
        let mut buf = vec![0u8; len];
        let ret = unsafe { nvs_get_str(self.handle, k.as_ptr().cast(), buf.as_mut_ptr().cast(), &mut len) };
        if ret != ESP_OK {
            return default.into();
        }
        buf.truncate(len.saturating_sub(1)); // drop NUL
        String::from_utf8(buf).unwrap_or_else(|_| default.into())
    }

    fn set_str(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let k = key_buf(key)?;
        let mut v = Vec::with_capacity(value.len() + 1);
        v.extend_from_slice(value.as_bytes());
        v.push(0);
        let ret = unsafe { nvs_set_str(self.handle, k.as_ptr().cast(), v.as_ptr().cast()) };
        if ret != ESP_OK {
            warn!("NVS: set {key:?} failed ({ret})");
            return Err(Self::map_err(ret));
        }
        self.commit()
    }

    fn set_many(&mut self, entries: &[(&str, i32)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.stage_int(key, *value)?;
        }
        self.commit()?;
        info!("NvsSettings: {} value(s) committed", entries.len());
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
impl SettingsStore for NvsSettings {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        match self.store.get(key) {
            Some(Entry::Int(v)) => *v,
            _ => default,
        }
    }

    fn set_int(&mut self, key: &str, value: i32) -> Result<(), StorageError> {
        self.put(key, Entry::Int(value))
    }

    fn get_str(&self, key: &str, default: &str) -> String {
        match self.store.get(key) {
            Some(Entry::Str(s)) => s.clone(),
            _ => default.into(),
        }
    }

    fn set_str(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.put(key, Entry::Str(value.into()))
    }

    /// Validates every key before writing any of them.
    fn set_many(&mut self, entries: &[(&str, i32)]) -> Result<(), StorageError> {
        for (key, _) in entries {
            key_buf(key)?;
        }
        if self.read_only {
            return Err(StorageError::IoError);
        }
        for (key, value) in entries {
            self.store.insert((*key).into(), Entry::Int(*value));
        }
        Ok(())
    }
}
