//! Integer smoothing filters for the signal pipeline.
//!
//! Each filter owns its own history and is never shared between
//! pipelines.  Filters are applied in registration order; swapping two
//! filters changes the output.

extern crate alloc;
use alloc::boxed::Box;

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest supported median window.
pub const MAX_MEDIAN_WINDOW: usize = 16;

/// Stateful `i32 -> i32` transform.
pub trait Filter {
    fn apply(&mut self, value: i32) -> i32;
}

// ── Median ───────────────────────────────────────────────────

/// Sliding median over the last `window` inputs.
///
/// The buffer is seeded with the first input so the first output equals
/// the input.  For an even window the upper median (`sorted[N/2]`) is
/// returned, not the mean of the two central values.
pub struct MedianFilter {
    data: Vec<i32, MAX_MEDIAN_WINDOW>,
    scratch: Vec<i32, MAX_MEDIAN_WINDOW>,
    window: usize,
    next: usize,
}

impl MedianFilter {
    pub fn new(window: usize) -> Result<Self, ConfigError> {
        if window == 0 || window > MAX_MEDIAN_WINDOW {
            return Err(ConfigError::MedianWindow);
        }
        Ok(Self {
            data: Vec::new(),
            scratch: Vec::new(),
            window,
            next: 0,
        })
    }
}

impl Filter for MedianFilter {
    fn apply(&mut self, value: i32) -> i32 {
        if self.data.is_empty() {
            // window <= capacity, checked in new()
            let _ = self.data.resize(self.window, value);
            self.next = 0;
            return value;
        }

        self.data[self.next] = value;
        self.next = (self.next + 1) % self.window;

        self.scratch.clone_from(&self.data);
        self.scratch.sort_unstable();
        self.scratch[self.window / 2]
    }
}

// ── EMA ──────────────────────────────────────────────────────

/// Exponential moving average, rounded half-up to an integer.
///
/// A stored value of exactly 0 means "not seeded yet", so a genuine 0
/// reading re-seeds the filter with the next input.
pub struct EmaFilter {
    alpha: f32,
    last: i32,
}

impl EmaFilter {
    pub fn new(alpha: f32) -> Result<Self, ConfigError> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(ConfigError::EmaAlpha);
        }
        Ok(Self { alpha, last: 0 })
    }
}

impl Filter for EmaFilter {
    fn apply(&mut self, value: i32) -> i32 {
        if self.last == 0 {
            self.last = value;
        } else {
            let blended = self.alpha * value as f32 + (1.0 - self.alpha) * self.last as f32;
            self.last = (blended + 0.5).floor() as i32;
        }
        self.last
    }
}

// ── Configuration ────────────────────────────────────────────

/// Serializable description of one filter stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterSpec {
    Median { window: usize },
    Ema { alpha: f32 },
}

impl FilterSpec {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Self::Median { window } if window == 0 || window > MAX_MEDIAN_WINDOW => {
                Err(ConfigError::MedianWindow)
            }
            Self::Ema { alpha } if !(alpha > 0.0 && alpha <= 1.0) => Err(ConfigError::EmaAlpha),
            _ => Ok(()),
        }
    }

    /// Build a fresh filter instance with empty history.
    pub fn build(&self) -> Result<Box<dyn Filter>, ConfigError> {
        Ok(match *self {
            Self::Median { window } => Box::new(MedianFilter::new(window)?),
            Self::Ema { alpha } => Box::new(EmaFilter::new(alpha)?),
        })
    }
}
