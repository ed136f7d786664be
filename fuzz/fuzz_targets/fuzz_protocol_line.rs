//! Fuzz target: every command grammar over one inbound write.
//!
//! The payload goes through `inbound_text` and then to the heater, tank,
//! valve and admin grammars in turn, sharing one settings store.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - Every reply is non-empty and single-line
//! - Stored gains, dimensions and timer stay inside their accepted ranges
//!
//! cargo fuzz run fuzz_protocol_line

#![no_main]

use libfuzzer_sys::fuzz_target;
use vanmodule::adapters::nvs::NvsSettings;
use vanmodule::app::ports::Actuator;
use vanmodule::control::regulator::Regulator;
use vanmodule::protocol::CommandHandler;
use vanmodule::protocol::admin::AdminProtocol;
use vanmodule::protocol::heater::HeaterProtocol;
use vanmodule::protocol::tank::TankProtocol;
use vanmodule::protocol::valve::ValveProtocol;
use vanmodule::sensors::Sensor;
use vanmodule::settings::{HeaterSettings, TankSettings, ValveSettings};
use vanmodule::signal::SignalPipeline;
use vanmodule::transport::inbound_text;

struct Fixed;

impl Sensor for Fixed {
    fn read(&mut self) -> i32 {
        215
    }
    fn max_range(&self) -> i32 {
        1250
    }
}

struct NullFan;

impl Actuator for NullFan {
    fn set_speed(&mut self, _speed: u8) {}
}

fn check(reply: Option<String>) {
    if let Some(r) = reply {
        assert!(!r.is_empty());
        assert!(!r.contains('\n'));
    }
}

fuzz_target!(|data: &[u8]| {
    let Some(rx) = inbound_text(data) else {
        return;
    };
    let Ok(mut store) = NvsSettings::new() else {
        return;
    };

    let mut regulator = Regulator::new("heater_0", NullFan, SignalPipeline::new(Box::new(Fixed)), &store);
    check(HeaterProtocol::new(&mut regulator, &mut store).handle(rx));

    let tank = TankSettings::new("grey_tank");
    check(TankProtocol::new(&tank, &mut store).handle(rx));

    let valve = ValveSettings::new("grey_valve");
    check(ValveProtocol::new(&valve, &mut store).handle(rx));

    check(AdminProtocol::new(&mut store).handle(rx));

    let g = HeaterSettings::new("heater_0").gains(&store);
    for gain in [g.kp, g.ki, g.kd] {
        assert!((1..=10_000).contains(&gain));
    }
    assert!((0..=500).contains(&HeaterSettings::new("heater_0").setpoint_tenths(&store)));
    assert!((1..=5_000).contains(&tank.volume_liters(&store)));
    assert!((1..=10_000).contains(&tank.height_mm(&store)));
    assert!((1..=300).contains(&valve.auto_close_seconds(&store)));
});
