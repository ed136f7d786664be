//! Replies and notifications through the chunked link.

use vanmodule::config::ModuleConfig;
use vanmodule::pins;
use vanmodule::transport::{CHUNK_SIZE, Link, PACING_MS};

use crate::mock_hw::{Air, CountingDelay, Peer, build};

fn link(connected: bool) -> (Link<Air, Peer, CountingDelay>, Air, Peer, CountingDelay) {
    let air = Air::default();
    let peer = Peer::default();
    peer.0.set(connected);
    let delay = CountingDelay::default();
    (Link::new(air.clone(), peer.clone(), delay.clone()), air, peer, delay)
}

#[test]
fn long_reply_is_fragmented_and_paced() {
    let (mut node, _, _) = build(&ModuleConfig::heater_module());
    let (mut link, air, _, delay) = link(true);

    node.on_write(pins::ENVIRONMENT_CHANNEL, b"ENV?", &mut link);

    assert_eq!(air.lines(pins::ENVIRONMENT_CHANNEL), ["ENV:T=200;H=500;P=10132;EXT=-1"]);
    assert_eq!(air.fragment_sizes(), [CHUNK_SIZE, 11]);
    assert_eq!(delay.0.get(), PACING_MS);
}

#[test]
fn short_reply_is_one_fragment() {
    let (mut node, _, _) = build(&ModuleConfig::water_module());
    let (mut link, air, _, delay) = link(true);

    node.on_write(pins::GREY_VALVE_CHANNEL, b"CLOSE", &mut link);

    assert_eq!(air.fragment_sizes(), [7]);
    assert_eq!(air.lines(pins::GREY_VALVE_CHANNEL), ["CLOSED"]);
    assert_eq!(delay.0.get(), 0);
}

#[test]
fn disconnected_peer_drops_everything() {
    let (mut node, board, clock) = build(&ModuleConfig::water_module());
    let (mut link, air, peer, _) = link(false);
    board.level(pins::CLEAN_TANK_UART_RX_GPIO).set(600);

    node.on_write(pins::GREY_VALVE_CHANNEL, b"OPEN", &mut link);
    clock.advance(1000);
    node.tick(&mut link);
    assert!(air.fragment_sizes().is_empty());
    // the countdown ran regardless
    assert_eq!(board.drive(pins::GREY_VALVE_RELAY_GPIO).last(), Some(255));

    peer.0.set(true);
    assert!(link.is_connected());
    clock.advance(1000);
    node.tick(&mut link);
    assert_eq!(air.lines(pins::CLEAN_TANK_CHANNEL), ["600"]);
    assert_eq!(air.lines(pins::GREY_VALVE_CHANNEL), ["COUNTDOWN:28"]);
}

#[test]
fn writes_are_split_by_channel() {
    let (mut node, _, _) = build(&ModuleConfig::heater_module());
    let (mut link, air, _, _) = link(true);

    node.on_write("0002", b"SP?", &mut link);
    node.on_write("0005", b"CFG?", &mut link);
    node.on_write("0009", b"SP?", &mut link);

    assert_eq!(air.lines("0002"), ["SP:200"]);
    assert_eq!(air.lines("0005"), ["CFG:KP=1000;KI=10;KD=50"]);
    assert!(air.lines("0009").is_empty());
}
