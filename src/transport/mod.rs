//! Connection-gated, chunked, paced text delivery.
//!
//! ```text
//!  "CFG:KP=2000;KI=50;KD=100"  + '\n'
//!        │
//!        ▼  chunks of CHUNK_SIZE
//!  [CFG:KP=2000;KI=50;K] ─10ms─ [D=100\n]
//! ```
//!
//! The radio stack accepts one 20-byte notification at a time with no
//! size negotiation.  Back-to-back notifications are silently lost, so
//! consecutive fragments are separated by [`PACING_MS`].  Delivery is
//! best effort: nothing is queued or retried while disconnected.
//!
//! On the receive side no reassembly is done; one write is one command.

use embedded_hal::delay::DelayNs;
use log::{debug, warn};

use crate::app::ports::{ConnectionState, Notifier};

pub const CHUNK_SIZE: usize = 20;
pub const PACING_MS: u32 = 10;
pub const LINE_TERMINATOR: u8 = b'\n';

/// Anything that can deliver a logical message on a channel.
pub trait Outbound {
    fn send(&mut self, channel_id: &str, message: &str);
}

/// Framed fragments of `message`: the terminator is appended, then the
/// bytes are cut into [`CHUNK_SIZE`] pieces (the last may be shorter).
pub fn fragments(message: &str) -> impl Iterator<Item = Vec<u8>> {
    let mut framed = Vec::with_capacity(message.len() + 1);
    framed.extend_from_slice(message.as_bytes());
    framed.push(LINE_TERMINATOR);

    let count = framed.len().div_ceil(CHUNK_SIZE);
    (0..count).map(move |i| {
        let end = ((i + 1) * CHUNK_SIZE).min(framed.len());
        framed[i * CHUNK_SIZE..end].to_vec()
    })
}

/// Decode one inbound write.  Empty writes are ignored; non-UTF-8 writes
/// are dropped.
pub fn inbound_text(payload: &[u8]) -> Option<&str> {
    if payload.is_empty() {
        return None;
    }
    match core::str::from_utf8(payload) {
        Ok(text) => Some(text),
        Err(_) => {
            warn!("link: dropped non-UTF-8 write ({} bytes)", payload.len());
            None
        }
    }
}

/// Outbound side of the wireless link.
pub struct Link<N, C, D> {
    notifier: N,
    connection: C,
    delay: D,
}

impl<N: Notifier, C: ConnectionState, D: DelayNs> Link<N, C, D> {
    pub fn new(notifier: N, connection: C, delay: D) -> Self {
        Self {
            notifier,
            connection,
            delay,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }
}

impl<N: Notifier, C: ConnectionState, D: DelayNs> Outbound for Link<N, C, D> {
    fn send(&mut self, channel_id: &str, message: &str) {
        if !self.connection.is_connected() {
            debug!("link: not connected, dropped message on {channel_id}");
            return;
        }

        for (i, fragment) in fragments(message).enumerate() {
            if i > 0 {
                self.delay.delay_ms(PACING_MS);
            }
            self.notifier.notify(channel_id, &fragment);
        }
    }
}
