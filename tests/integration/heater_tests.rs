//! Heater board: four PID zones plus the climate channel.

use vanmodule::config::ModuleConfig;
use vanmodule::pins;
use vanmodule::sensors::bme280::Measurement;
use vanmodule::settings::HeaterSettings;
use vanmodule::app::ports::SettingsStore;

use crate::mock_hw::{Sent, build};

const ZONE0: &str = "0002";
const ZONE1: &str = "0003";

fn ask(node: &mut crate::mock_hw::Node, channel: &str, rx: &str) -> Vec<String> {
    let mut out = Sent::default();
    node.on_write(channel, rx.as_bytes(), &mut out);
    out.0.into_iter().map(|(_, m)| m).collect()
}

#[test]
fn preset_wires_every_zone() {
    let (node, board, _) = build(&ModuleConfig::heater_module());
    assert_eq!(
        node.channel_ids().collect::<Vec<_>>(),
        ["0001", "0002", "0003", "0004", "0005", "0006"]
    );
    assert_eq!(board.fan_channels(), &[0, 1, 2, 3]);
    assert_eq!(node.device_name(), "Heater Module");
    assert_eq!(node.tick_interval_ms(), 110);
}

#[test]
fn idle_regulator_leaves_fan_alone() {
    let (mut node, board, clock) = build(&ModuleConfig::heater_module());
    board.temperature(pins::HEATER_SENSOR_GPIOS[0]).set(150);
    let mut out = Sent::default();
    for _ in 0..5 {
        clock.advance(110);
        node.tick(&mut out);
    }
    assert!(board.drive(pins::HEATER_FAN_GPIOS[0]).history().is_empty());
    assert!(out.0.is_empty());
}

#[test]
fn start_drives_fan_toward_setpoint() {
    let (mut node, board, clock) = build(&ModuleConfig::heater_module());
    let temp = board.temperature(pins::HEATER_SENSOR_GPIOS[0]);
    let fan = board.drive(pins::HEATER_FAN_GPIOS[0]);
    temp.set(150);

    assert_eq!(ask(&mut node, ZONE0, "START"), ["OK"]);
    let mut out = Sent::default();
    node.tick(&mut out);
    // 5 °C below 20.0 with default gains: P=50, I≈0, D=25
    assert_eq!(fan.last(), Some(75));

    temp.set(250);
    clock.advance(100);
    node.tick(&mut out);
    assert_eq!(fan.last(), Some(0));

    assert_eq!(ask(&mut node, ZONE0, "STOP"), ["OK"]);
    assert_eq!(fan.last(), Some(0));
    assert!(board.drive(pins::HEATER_FAN_GPIOS[1]).history().is_empty());
}

#[test]
fn no_sample_skips_the_tick() {
    let (mut node, board, clock) = build(&ModuleConfig::heater_module());
    let fan = board.drive(pins::HEATER_FAN_GPIOS[0]);
    ask(&mut node, ZONE0, "START");
    let mut out = Sent::default();
    clock.advance(110);
    node.tick(&mut out);
    assert!(fan.history().is_empty());
}

#[test]
fn status_and_setpoint() {
    let (mut node, board, _) = build(&ModuleConfig::heater_module());
    board.temperature(pins::HEATER_SENSOR_GPIOS[1]).set(215);

    assert_eq!(ask(&mut node, ZONE1, "STATUS?"), ["STATUS:T=215;SP=200;RUN=0"]);
    assert_eq!(ask(&mut node, ZONE1, "SP:235"), ["OK"]);
    assert_eq!(ask(&mut node, ZONE1, "SP?"), ["SP:235"]);
    assert_eq!(ask(&mut node, ZONE1, "SP:501"), ["ERR_SP_RANGE"]);
    assert_eq!(ask(&mut node, ZONE1, "SP:abc"), ["ERR_SP_NUM"]);
    assert_eq!(ask(&mut node, ZONE0, "SP?"), ["SP:200"]);

    let stored = HeaterSettings::new("heater_1").setpoint_tenths(node.settings());
    assert_eq!(stored, 235);
}

#[test]
fn gains_are_per_zone() {
    let (mut node, _, _) = build(&ModuleConfig::heater_module());
    assert_eq!(ask(&mut node, ZONE0, "CFG:KP=2000;KI=20;KD=100"), ["OK"]);
    assert_eq!(ask(&mut node, ZONE0, "CFG?"), ["CFG:KP=2000;KI=20;KD=100"]);
    assert_eq!(ask(&mut node, ZONE1, "CFG?"), ["CFG:KP=1000;KI=10;KD=50"]);
    assert_eq!(node.settings().get_int("heater_0_kp", 0), 2000);

    assert_eq!(ask(&mut node, ZONE0, "CFG:KP=0;KI=20;KD=100"), ["ERR_CFG_RANGE"]);
    assert_eq!(ask(&mut node, ZONE0, "CFG:KP=1;KI=x;KD=1"), ["ERR_CFG_NUM"]);
    assert_eq!(ask(&mut node, ZONE0, "CFG:KP=1"), ["ERR_CFG_FMT"]);
}

#[test]
fn unknown_heater_line_is_silent() {
    let (mut node, _, _) = build(&ModuleConfig::heater_module());
    assert!(ask(&mut node, ZONE0, "OPEN").is_empty());
}

#[test]
fn environment_snapshot() {
    let (mut node, board, _) = build(&ModuleConfig::heater_module());
    let env = pins::ENVIRONMENT_CHANNEL;

    assert_eq!(ask(&mut node, env, "ENV?"), ["ENV:T=200;H=500;P=10132;EXT=-1"]);

    board.set_environment(Some(Measurement {
        temperature_c: 21.5,
        humidity_pct: 48.0,
        pressure_hpa: 1013.25,
    }));
    board.temperature(pins::EXTERIOR_SENSOR_GPIO).set(-35);
    assert_eq!(ask(&mut node, env, "ENV?"), ["ENV:T=215;H=480;P=10132;EXT=-35"]);

    // probe drops out: last values are kept
    board.set_environment(None);
    board.temperature(pins::EXTERIOR_SENSOR_GPIO).set(-1270);
    assert_eq!(ask(&mut node, env, "ENV?"), ["ENV:T=215;H=480;P=10132;EXT=-35"]);
}

#[test]
fn rename_requests_restart() {
    let (mut node, _, _) = build(&ModuleConfig::heater_module());
    assert_eq!(ask(&mut node, pins::ADMIN_CHANNEL, "NAME:Rear Heat"), ["OK"]);
    assert_eq!(ask(&mut node, pins::ADMIN_CHANNEL, "PIN:12ab56"), ["ERR_PIN_NUM"]);
    assert_eq!(node.device_name(), "Rear Heat");
    assert!(node.restart_requested());
}
