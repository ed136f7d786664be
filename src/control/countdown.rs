//! Valve auto-close countdown.
//!
//! ```text
//!            open(n)                    tick, remaining > 1
//!  Closed ───────────▶ Open(n) ───────────────────────────▶ Open(n-1)
//!    ▲                   │ │
//!    │   close()         │ │ tick, remaining == 1
//!    └───────────────────┘ └──────────────▶ Closed (AUTO_CLOSED)
//! ```
//!
//! The machine only decides; the owning unit drives the relay and sends
//! the returned [`Notification`].

use log::info;

use crate::app::events::Notification;

const TICK_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValveState {
    Closed,
    Open { remaining: u32 },
}

#[derive(Debug)]
pub struct Countdown {
    state: ValveState,
    last_tick_ms: u64,
}

impl Countdown {
    pub const fn new() -> Self {
        Self {
            state: ValveState::Closed,
            last_tick_ms: 0,
        }
    }

    pub fn state(&self) -> ValveState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ValveState::Open { .. })
    }

    /// Open (or re-arm) the countdown.  A zero duration is treated as one
    /// second so the valve is never opened without a pending close.
    pub fn open(&mut self, seconds: u32, now_ms: u64) -> Notification {
        let remaining = seconds.max(1);
        self.state = ValveState::Open { remaining };
        self.last_tick_ms = now_ms;
        info!("valve open, auto-close in {remaining}s");
        Notification::Countdown(remaining)
    }

    /// Manual close; idempotent.
    pub fn close(&mut self) -> Notification {
        if self.is_open() {
            info!("valve closed");
        }
        self.state = ValveState::Closed;
        Notification::Closed
    }

    /// Advance by at most one second.  Returns the notification to emit,
    /// `None` while closed or when less than a second has elapsed.
    pub fn tick(&mut self, now_ms: u64) -> Option<Notification> {
        let ValveState::Open { remaining } = self.state else {
            return None;
        };
        if now_ms.saturating_sub(self.last_tick_ms) < TICK_MS {
            return None;
        }
        self.last_tick_ms = now_ms;

        let remaining = remaining - 1;
        if remaining == 0 {
            self.state = ValveState::Closed;
            info!("valve auto-closed");
            Some(Notification::AutoClosed)
        } else {
            self.state = ValveState::Open { remaining };
            Some(Notification::Countdown(remaining))
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}
