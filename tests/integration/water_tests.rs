//! Water board: clean and grey tank levels, grey-water valve countdown.

use vanmodule::adapters::nvs::NvsSettings;
use vanmodule::app::service::NodeService;
use vanmodule::config::ModuleConfig;
use vanmodule::error::ConfigError;
use vanmodule::pins;

use crate::mock_hw::{ManualClock, MockBoard, Node, Sent, build};

const CLEAN: &str = pins::CLEAN_TANK_CHANNEL;
const GREY: &str = pins::GREY_TANK_CHANNEL;
const VALVE: &str = pins::GREY_VALVE_CHANNEL;

fn ask(node: &mut Node, channel: &str, rx: &str) -> Vec<String> {
    let mut out = Sent::default();
    node.on_write(channel, rx.as_bytes(), &mut out);
    out.0.into_iter().map(|(_, m)| m).collect()
}

fn tick(node: &mut Node, clock: &ManualClock, ms: u64) -> Sent {
    clock.advance(ms);
    let mut out = Sent::default();
    node.tick(&mut out);
    out
}

#[test]
fn preset_wires_tanks_and_valve() {
    let (node, board, _) = build(&ModuleConfig::water_module());
    assert_eq!(node.channel_ids().collect::<Vec<_>>(), ["0001", "0002", "0003", "0004"]);
    assert_eq!(node.device_name(), "Water Tank");
    // relay released at boot
    assert_eq!(board.drive(pins::GREY_VALVE_RELAY_GPIO).history(), [0]);
}

#[test]
fn levels_published_once_valid() {
    let (mut node, board, clock) = build(&ModuleConfig::water_module());
    let grey = board.level(pins::GREY_TANK_UART_RX_GPIO);

    let out = tick(&mut node, &clock, 110);
    assert!(out.on(GREY).is_empty());
    assert!(out.on(CLEAN).is_empty());

    grey.set(850);
    let out = tick(&mut node, &clock, 110);
    assert_eq!(out.on(GREY), ["850"]);
    assert!(out.on(CLEAN).is_empty());

    // single spike is rejected by the median stage
    grey.set(990);
    let out = tick(&mut node, &clock, 110);
    assert_eq!(out.on(GREY), ["850"]);

    // sensor drops out: last filtered value is repeated
    grey.set(-1);
    let out = tick(&mut node, &clock, 110);
    assert_eq!(out.on(GREY), ["850"]);
}

#[test]
fn tank_dimensions_per_tank() {
    let (mut node, _, _) = build(&ModuleConfig::water_module());
    assert_eq!(ask(&mut node, CLEAN, "CFG?"), ["CFG:V=150;H=500"]);
    assert_eq!(ask(&mut node, GREY, "CFG:V=80;H=420"), ["OK"]);
    assert_eq!(ask(&mut node, GREY, "CFG?"), ["CFG:V=80;H=420"]);
    assert_eq!(ask(&mut node, CLEAN, "CFG?"), ["CFG:V=150;H=500"]);
    assert_eq!(ask(&mut node, GREY, "CFG:V=6000;H=420"), ["ERR_CFG_RANGE"]);
    assert_eq!(ask(&mut node, GREY, "LEVEL?"), ["ERR_UNKNOWN_CMD"]);
}

#[test]
fn valve_auto_closes() {
    let (mut node, board, clock) = build(&ModuleConfig::water_module());
    let relay = board.drive(pins::GREY_VALVE_RELAY_GPIO);

    assert_eq!(ask(&mut node, VALVE, "CFG:T=5"), ["OK"]);
    assert_eq!(ask(&mut node, VALVE, "CFG?"), ["CFG:T=5"]);
    assert_eq!(ask(&mut node, VALVE, "OPEN"), ["COUNTDOWN:5"]);
    assert_eq!(relay.last(), Some(255));

    // sub-second ticks do not count down
    assert!(tick(&mut node, &clock, 500).on(VALVE).is_empty());

    let mut seen = Vec::new();
    for _ in 0..5 {
        let out = tick(&mut node, &clock, 1000);
        seen.extend(out.on(VALVE).iter().map(|s| s.to_string()));
    }
    assert_eq!(seen, ["COUNTDOWN:4", "COUNTDOWN:3", "COUNTDOWN:2", "COUNTDOWN:1", "AUTO_CLOSED"]);
    assert_eq!(relay.last(), Some(0));
    assert!(tick(&mut node, &clock, 1000).on(VALVE).is_empty());
}

#[test]
fn valve_manual_close_and_reopen() {
    let (mut node, board, clock) = build(&ModuleConfig::water_module());
    let relay = board.drive(pins::GREY_VALVE_RELAY_GPIO);

    assert_eq!(ask(&mut node, VALVE, "OPEN"), ["COUNTDOWN:30"]);
    tick(&mut node, &clock, 1000);
    assert_eq!(ask(&mut node, VALVE, "OPEN"), ["COUNTDOWN:30"]);
    assert_eq!(ask(&mut node, VALVE, "CLOSE"), ["CLOSED"]);
    assert_eq!(relay.history(), [0, 255, 255, 0]);
    assert!(tick(&mut node, &clock, 1000).on(VALVE).is_empty());

    assert!(ask(&mut node, VALVE, "PURGE").is_empty());
    assert_eq!(ask(&mut node, VALVE, "CFG:T=301"), ["ERR_CFG_RANGE"]);
}

#[test]
fn storage_failure_reported() {
    let mut store = NvsSettings::new().unwrap();
    store.set_read_only(true);
    let mut board = MockBoard::new();
    let mut node = NodeService::from_config(
        &ModuleConfig::water_module(),
        store,
        ManualClock::default(),
        &mut board,
    )
    .unwrap();

    assert_eq!(ask(&mut node, GREY, "CFG:V=80;H=420"), ["ERR_CFG_IO"]);
    assert_eq!(ask(&mut node, GREY, "CFG?"), ["CFG:V=150;H=500"]);
    assert_eq!(ask(&mut node, VALVE, "CFG:T=10"), ["ERR_CFG_IO"]);
}

#[test]
fn json_wiring_is_validated() {
    let json = r#"{
        "device_name": "Aux Tank",
        "tanks": [
            { "name": "aux", "channel_id": "0002", "uart_rx_gpio": 4, "uart_tx_gpio": 5,
              "filters": [{ "kind": "median", "window": 5 }] }
        ],
        "valves": [{ "name": "aux_valve", "channel_id": "0003", "relay_gpio": 23 }]
    }"#;
    let config = ModuleConfig::from_json(json).unwrap();
    let (mut node, board, clock) = build(&config);
    assert_eq!(node.tick_interval_ms(), 110);

    board.level(4).set(400);
    assert_eq!(tick(&mut node, &clock, 110).on("0002"), ["400"]);
    assert_eq!(ask(&mut node, "0003", "OPEN"), ["COUNTDOWN:30"]);

    let mut bad = config.clone();
    bad.valves[0].channel_id = "0002".into();
    let err = NodeService::from_config(&bad, NvsSettings::new().unwrap(), ManualClock::default(), &mut MockBoard::new());
    assert_eq!(err.err(), Some(ConfigError::DuplicateChannel));
}
