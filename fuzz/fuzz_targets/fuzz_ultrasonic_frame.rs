//! Fuzz target: `UltrasonicSensor` frame parser
//!
//! Feeds arbitrary byte runs (split at a fuzzer-chosen point) into the
//! UART FIFO and drains it with `read`.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - `read` yields `-1` or a 16-bit distance
//! - Every accepted frame carried a valid checksum
//!
//! cargo fuzz run fuzz_ultrasonic_frame

#![no_main]

use libfuzzer_sys::fuzz_target;
use vanmodule::sensors::Sensor;
use vanmodule::sensors::ultrasonic::UltrasonicSensor;

fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let split = usize::from(split).min(rest.len());
    let (first, second) = rest.split_at(split);

    let mut sensor = UltrasonicSensor::new();
    sensor.feed(first);
    sensor.feed(second);

    // one read consumes at least one byte, so this drains the FIFO
    for _ in 0..=rest.len() {
        let mm = sensor.read();
        assert!(mm == -1 || (0..=0xFFFF).contains(&mm), "bad distance {mm}");
        if mm >= 0 {
            let (high, low) = ((mm >> 8) as u8, mm as u8);
            let sum = 0xFFu8.wrapping_add(high).wrapping_add(low);
            assert!(rest.windows(4).any(|w| w == [0xFF, high, low, sum]));
        }
    }
});
