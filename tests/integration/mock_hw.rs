//! Mock hardware for integration tests.
//!
//! [`MockBoard`] hands out sensors and actuators whose state lives in
//! shared cells keyed by GPIO, so a test can script readings and inspect
//! drive levels after the node has taken ownership of the handles.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use vanmodule::adapters::nvs::NvsSettings;
use vanmodule::app::ports::{Actuator, Board, Clock, ConnectionState, Notifier};
use vanmodule::app::service::NodeService;
use vanmodule::config::ModuleConfig;
use vanmodule::sensors::Sensor;
use vanmodule::sensors::bme280::{EnvironmentProbe, Measurement};
use vanmodule::transport::Outbound;

// ── Sensors ───────────────────────────────────────────────────

/// Reading shared between a test and the sensor the node owns.
#[derive(Clone)]
pub struct Reading(Rc<Cell<i32>>);

#[allow(dead_code)]
impl Reading {
    pub fn set(&self, value: i32) {
        self.0.set(value);
    }
}

struct ScriptedSensor {
    value: Rc<Cell<i32>>,
    max: i32,
    min: i32,
}

impl Sensor for ScriptedSensor {
    fn read(&mut self) -> i32 {
        self.value.get()
    }

    fn max_range(&self) -> i32 {
        self.max
    }

    fn accepts(&self, raw: i32) -> bool {
        raw >= self.min && raw <= self.max && raw != -1 && raw != 0
    }
}

struct ScriptedProbe(Rc<Cell<Option<Measurement>>>);

impl EnvironmentProbe for ScriptedProbe {
    fn measure(&mut self) -> Option<Measurement> {
        self.0.get()
    }
}

// ── Actuators ─────────────────────────────────────────────────

/// Every drive level an actuator received, oldest first.
#[derive(Clone, Default)]
pub struct DriveLog(Rc<RefCell<Vec<u8>>>);

#[allow(dead_code)]
impl DriveLog {
    pub fn last(&self) -> Option<u8> {
        self.0.borrow().last().copied()
    }

    pub fn history(&self) -> Vec<u8> {
        self.0.borrow().clone()
    }
}

struct RecordingActuator(DriveLog);

impl Actuator for RecordingActuator {
    fn set_speed(&mut self, speed: u8) {
        self.0.0.borrow_mut().push(speed);
    }
}

// ── Board ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockBoard {
    temperatures: HashMap<i32, Reading>,
    levels: HashMap<i32, Reading>,
    drives: HashMap<i32, DriveLog>,
    fan_channels: Vec<u8>,
    environment: Rc<Cell<Option<Measurement>>>,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Temperature line on `gpio`, tenths of °C.
    pub fn temperature(&self, gpio: i32) -> Reading {
        self.temperatures[&gpio].clone()
    }

    /// Ultrasonic sensor whose UART RX is `rx_gpio`, millimetres.
    pub fn level(&self, rx_gpio: i32) -> Reading {
        self.levels[&rx_gpio].clone()
    }

    /// Fan or relay driven from `gpio`.
    pub fn drive(&self, gpio: i32) -> DriveLog {
        self.drives[&gpio].clone()
    }

    pub fn fan_channels(&self) -> &[u8] {
        &self.fan_channels
    }

    pub fn set_environment(&self, m: Option<Measurement>) {
        self.environment.set(m);
    }

    fn reading(map: &mut HashMap<i32, Reading>, gpio: i32) -> Rc<Cell<i32>> {
        let r = map.entry(gpio).or_insert_with(|| Reading(Rc::new(Cell::new(-1))));
        Rc::clone(&r.0)
    }

    fn actuator(&mut self, gpio: i32) -> Box<dyn Actuator> {
        let log = self.drives.entry(gpio).or_default().clone();
        Box::new(RecordingActuator(log))
    }
}

impl Board for MockBoard {
    fn temperature_sensor(&mut self, gpio: i32) -> Box<dyn Sensor> {
        Box::new(ScriptedSensor {
            value: Self::reading(&mut self.temperatures, gpio),
            min: -550,
            max: 1250,
        })
    }

    fn level_sensor(&mut self, rx_gpio: i32, _tx_gpio: i32) -> Box<dyn Sensor> {
        Box::new(ScriptedSensor {
            value: Self::reading(&mut self.levels, rx_gpio),
            min: 1,
            max: 1000,
        })
    }

    fn fan(&mut self, gpio: i32, channel: u8) -> Box<dyn Actuator> {
        self.fan_channels.push(channel);
        self.actuator(gpio)
    }

    fn relay(&mut self, gpio: i32) -> Box<dyn Actuator> {
        self.actuator(gpio)
    }

    fn environment_probe(&mut self, _sda_gpio: i32, _scl_gpio: i32) -> Box<dyn EnvironmentProbe> {
        Box::new(ScriptedProbe(Rc::clone(&self.environment)))
    }
}

// ── Clock ─────────────────────────────────────────────────────

/// Manually advanced clock shared with the node.
#[derive(Clone, Default)]
pub struct ManualClock(Rc<Cell<u64>>);

#[allow(dead_code)]
impl ManualClock {
    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

// ── Link side ─────────────────────────────────────────────────

/// Whole messages per channel, before fragmentation.
#[derive(Default)]
pub struct Sent(pub Vec<(String, String)>);

#[allow(dead_code)]
impl Sent {
    pub fn on(&self, channel_id: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(c, _)| c == channel_id)
            .map(|(_, m)| m.as_str())
            .collect()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl Outbound for Sent {
    fn send(&mut self, channel_id: &str, message: &str) {
        self.0.push((channel_id.into(), message.into()));
    }
}

/// Radio fragments as the peer would receive them.
#[derive(Clone, Default)]
pub struct Air(pub Rc<RefCell<Vec<(String, Vec<u8>)>>>);

#[allow(dead_code)]
impl Air {
    /// Reassemble every line received on `channel_id`.
    pub fn lines(&self, channel_id: &str) -> Vec<String> {
        let bytes: Vec<u8> = self
            .0
            .borrow()
            .iter()
            .filter(|(c, _)| c == channel_id)
            .flat_map(|(_, f)| f.iter().copied())
            .collect();
        String::from_utf8(bytes)
            .unwrap()
            .split_terminator('\n')
            .map(str::to_owned)
            .collect()
    }

    pub fn fragment_sizes(&self) -> Vec<usize> {
        self.0.borrow().iter().map(|(_, f)| f.len()).collect()
    }
}

impl Notifier for Air {
    fn notify(&mut self, channel_id: &str, fragment: &[u8]) {
        self.0.borrow_mut().push((channel_id.into(), fragment.to_vec()));
    }
}

#[derive(Clone, Default)]
pub struct Peer(pub Rc<Cell<bool>>);

impl ConnectionState for Peer {
    fn is_connected(&self) -> bool {
        self.0.get()
    }
}

/// Delay provider that only counts requested milliseconds.
#[derive(Clone, Default)]
pub struct CountingDelay(pub Rc<Cell<u32>>);

impl embedded_hal::delay::DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.set(self.0.get() + ns / 1_000_000);
    }
}

// ── Fixtures ──────────────────────────────────────────────────

pub type Node = NodeService<NvsSettings, ManualClock>;

pub fn build(config: &ModuleConfig) -> (Node, MockBoard, ManualClock) {
    let _ = vanmodule::adapters::logger::init();
    let mut board = MockBoard::new();
    let clock = ManualClock::default();
    let node = NodeService::from_config(config, NvsSettings::new().unwrap(), clock.clone(), &mut board)
        .expect("preset config is valid");
    (node, board, clock)
}
