//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter  | Implements      | Connects to             |
//! |----------|-----------------|-------------------------|
//! | `nvs`    | SettingsStore   | NVS / in-memory store   |
//! | `time`   | Clock           | ESP32 high-res timer    |
//! | `logger` | (log facade)    | IDF console             |

pub mod logger;
pub mod nvs;
pub mod time;
