//! Monotonic clock adapter.
//!
//! - **`target_os = "espidf"`**: `esp_timer_get_time()` (microseconds
//!   since boot) scaled to milliseconds.
//! - **host**: `std::time::Instant` taken at construction.

use crate::app::ports::Clock;

pub struct Esp32Clock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Esp32Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32Clock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }
}

impl Clock for Esp32Clock {
    #[cfg(target_os = "espidf")]
    fn now_ms(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000
    }

    #[cfg(not(target_os = "espidf"))]
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
