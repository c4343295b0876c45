use crate::simulgo::consts::BROADCAST_MS;
use crate::simulgo::stone::Color;

use super::{PlayerTimer, PlayerTimerState, TimerEvent};

/// An event produced by `TimerManager::tick`, identifying which side (if
/// any) the underlying `TimerEvent` belongs to, plus the periodic combined
/// snapshot used for `TIME_UPDATE` frames.
#[derive(Clone, Debug, PartialEq)]
pub enum ManagerEvent {
    Player(Color, TimerEvent),
    Broadcast { black: PlayerTimerState, white: PlayerTimerState },
}

/// Owns both players' clocks and the broadcast scheduler. Replaces the
/// reference's `startBroadcast(cb)`/`stopBroadcast()` callback pair with the
/// same tagged-event return style used throughout this crate.
#[derive(Clone, Debug)]
pub struct TimerManager {
    black: PlayerTimer,
    white: PlayerTimer,
    since_broadcast_ms: i64,
}

impl TimerManager {
    pub fn new(base_time_ms: i64, byo_yomi_periods: u32, byo_yomi_period_ms: i64) -> TimerManager {
        TimerManager {
            black: PlayerTimer::new(base_time_ms, byo_yomi_periods, byo_yomi_period_ms),
            white: PlayerTimer::new(base_time_ms, byo_yomi_periods, byo_yomi_period_ms),
            since_broadcast_ms: 0,
        }
    }

    pub fn timer(&self, color: Color) -> &PlayerTimer {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
        }
    }

    fn timer_mut(&mut self, color: Color) -> &mut PlayerTimer {
        match color {
            Color::Black => &mut self.black,
            Color::White => &mut self.white,
        }
    }

    /// Starts both sides' clocks for a new turn, skipping any side that has
    /// already timed out.
    pub fn start_turn(&mut self) {
        self.black.start();
        self.white.start();
    }

    /// Stops one side's clock because that side's move was accepted.
    pub fn stop_player(&mut self, color: Color) {
        self.timer_mut(color).stop();
    }

    pub fn is_timed_out(&self, color: Color) -> bool {
        self.timer(color).is_timed_out()
    }

    /// Advances both clocks by `elapsed_ms`, returning every timer event
    /// crossed plus, once the broadcast interval has elapsed, a `Broadcast`
    /// snapshot of both sides.
    pub fn tick(&mut self, elapsed_ms: i64) -> Vec<ManagerEvent> {
        let mut events = Vec::new();
        for event in self.black.tick(elapsed_ms) {
            events.push(ManagerEvent::Player(Color::Black, event));
        }
        for event in self.white.tick(elapsed_ms) {
            events.push(ManagerEvent::Player(Color::White, event));
        }

        self.since_broadcast_ms += elapsed_ms;
        if self.since_broadcast_ms >= BROADCAST_MS {
            self.since_broadcast_ms = 0;
            events.push(ManagerEvent::Broadcast { black: self.black.state(), white: self.white.state() });
        }

        events
    }
}
