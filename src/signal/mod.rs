//! Signal conditioning: raw sensor → validity gate → filter chain.
//!
//! ```text
//!  Sensor::read ──▶ accepts()? ──yes──▶ filter[0] ─▶ … ─▶ filter[n] ──▶ last_valid
//!                      │
//!                      no ──▶ last_valid (or UNSET_SAMPLE)
//! ```
//!
//! Gating happens before any filter sees the value, so a glitching
//! sensor never pollutes filter history.

pub mod filter;

extern crate alloc;
use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::error::ConfigError;
use crate::sensors::Sensor;
use filter::{Filter, FilterSpec};

/// Returned by [`SignalPipeline::read`] until the first valid sample.
pub const UNSET_SAMPLE: i32 = -1;

/// One sensor plus its ordered filter chain.
pub struct SignalPipeline {
    sensor: Box<dyn Sensor>,
    filters: Vec<Box<dyn Filter>>,
    last_valid: Option<i32>,
}

impl SignalPipeline {
    pub fn new(sensor: Box<dyn Sensor>) -> Self {
        Self {
            sensor,
            filters: Vec::new(),
            last_valid: None,
        }
    }

    /// Build a pipeline with a fresh filter chain described by `specs`.
    pub fn with_filters(sensor: Box<dyn Sensor>, specs: &[FilterSpec]) -> Result<Self, ConfigError> {
        let mut pipeline = Self::new(sensor);
        for spec in specs {
            pipeline.add_filter(spec.build()?);
        }
        Ok(pipeline)
    }

    /// Append a filter; it runs after every filter registered before it.
    pub fn add_filter(&mut self, filter: Box<dyn Filter>) {
        self.filters.push(filter);
    }

    /// Read and condition one sample.
    ///
    /// Returns `None` only while no valid sample has ever been seen.
    pub fn sample(&mut self) -> Option<i32> {
        let raw = self.sensor.read();
        if !self.sensor.accepts(raw) {
            return self.last_valid;
        }

        let value = self
            .filters
            .iter_mut()
            .fold(raw, |acc, filter| filter.apply(acc));
        self.last_valid = Some(value);
        Some(value)
    }

    /// Like [`sample`](Self::sample) but with the integer sentinel
    /// [`UNSET_SAMPLE`] for "no data yet".
    pub fn read(&mut self) -> i32 {
        self.sample().unwrap_or(UNSET_SAMPLE)
    }
}
