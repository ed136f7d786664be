//! UART ultrasonic distance sensor (A02YYUW-style, 9600 baud).
//!
//! The sensor streams 4-byte frames:
//!
//! ```text
//! ┌──────┬──────┬──────┬──────────┐
//! │ 0xFF │ high │ low  │ checksum │   distance_mm = high << 8 | low
//! └──────┴──────┴──────┴──────────┘   checksum = (0xFF + high + low) & 0xFF
//! ```
//!
//! UART bytes are pushed in with [`UltrasonicSensor::feed`] (from the RX
//! poll or ISR path); [`Sensor::read`] consumes at most one frame per call
//! and never blocks.

use heapless::Deque;
use log::debug;

use super::Sensor;

const PACKET_SIZE: usize = 4;
const PACKET_HEADER: u8 = 0xFF;
const FIFO_CAPACITY: usize = 64;

/// Ultrasonic waterproof range finder.
pub struct UltrasonicSensor {
    fifo: Deque<u8, FIFO_CAPACITY>,
    max_range_mm: i32,
    dropped: u32,
}

impl UltrasonicSensor {
    pub fn new() -> Self {
        Self {
            fifo: Deque::new(),
            max_range_mm: 1000,
            dropped: 0,
        }
    }

    /// Append received UART bytes.  When the FIFO is full the oldest
    /// bytes are discarded so the newest frame survives.
    pub fn feed(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if self.fifo.is_full() {
                self.fifo.pop_front();
                self.dropped = self.dropped.saturating_add(1);
            }
            // capacity was just ensured
            let _ = self.fifo.push_back(b);
        }
    }

    /// Bytes discarded because of FIFO overflow since construction.
    pub fn dropped_bytes(&self) -> u32 {
        self.dropped
    }

    fn checksum(high: u8, low: u8) -> u8 {
        PACKET_HEADER.wrapping_add(high).wrapping_add(low)
    }
}

impl Default for UltrasonicSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl Sensor for UltrasonicSensor {
    fn read(&mut self) -> i32 {
        if self.fifo.len() < PACKET_SIZE {
            debug!("ultrasonic: frame incomplete, waiting for more data");
            return -1;
        }

        if self.fifo.pop_front() != Some(PACKET_HEADER) {
            debug!("ultrasonic: header missing, byte ignored");
            return -1;
        }

        let (Some(high), Some(low), Some(checksum)) =
            (self.fifo.pop_front(), self.fifo.pop_front(), self.fifo.pop_front())
        else {
            return -1;
        };

        if checksum != Self::checksum(high, low) {
            debug!("ultrasonic: checksum error, packet ignored");
            return -1;
        }

        (i32::from(high) << 8) | i32::from(low)
    }

    fn max_range(&self) -> i32 {
        self.max_range_mm
    }
}
