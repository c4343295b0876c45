use serde::{Deserialize, Serialize};

use super::TimerEvent;

/// A snapshot of one player's clock, suitable for the `TIME_UPDATE` and
/// `TURN_RESULT` wire payloads.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerTimerState {
    pub remaining_base_ms: i64,
    pub in_byo_yomi: bool,
    pub byo_yomi_periods: u32,
    pub current_byo_yomi_remaining_ms: i64,
    pub timed_out: bool,
    pub running: bool,
}

/// A single player's clock: a base allotment, followed by `periods` byo-yomi
/// periods of `PERIOD_MS` each. Once in byo-yomi, a successful move (a call
/// to `stop`) refreshes the current period back to full; only letting a
/// period run out consumes it.
///
/// Mirrors the base+byo-yomi deduct/reset-on-move shape of the reference
/// engine's own clock service, adapted to a tick-driven (rather than
/// wall-clock-timestamped) model: the caller is responsible for calling
/// `tick` with the elapsed milliseconds since the last tick.
#[derive(Clone, Debug)]
pub struct PlayerTimer {
    base_remaining_ms: i64,
    in_byo_yomi: bool,
    periods_remaining: u32,
    period_ms: i64,
    current_period_remaining_ms: i64,
    timed_out: bool,
    running: bool,
}

impl PlayerTimer {
    /// `periods` and `period_ms` set the byo-yomi allotment; pass
    /// `consts::BYOYOMI_PERIODS`/`consts::BYOYOMI_PERIOD_MS` for the spec's
    /// default 3x30s.
    pub fn new(base_time_ms: i64, periods: u32, period_ms: i64) -> PlayerTimer {
        PlayerTimer {
            base_remaining_ms: base_time_ms,
            in_byo_yomi: false,
            periods_remaining: periods,
            period_ms,
            current_period_remaining_ms: period_ms,
            timed_out: false,
            running: false,
        }
    }

    pub fn state(&self) -> PlayerTimerState {
        PlayerTimerState {
            remaining_base_ms: self.base_remaining_ms,
            in_byo_yomi: self.in_byo_yomi,
            byo_yomi_periods: self.periods_remaining,
            current_byo_yomi_remaining_ms: self.current_period_remaining_ms,
            timed_out: self.timed_out,
            running: self.running,
        }
    }

    pub fn is_timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Starts the clock. No-op if already running or timed out.
    pub fn start(&mut self) {
        if self.timed_out {
            return;
        }
        self.running = true;
    }

    /// Stops the clock (a move was accepted). If the player was mid-byo-yomi,
    /// this is the refresh point: the current period resets to full,
    /// regardless of how much of it had elapsed.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        if self.in_byo_yomi && !self.timed_out {
            self.current_period_remaining_ms = self.period_ms;
        }
    }

    /// Advances the clock by `elapsed_ms`. No-op if not running or already
    /// timed out. Returns every `PeriodUsed`/`TimedOut` event crossed during
    /// this advance (a tick larger than one period correctly consumes
    /// multiple periods), followed by an `Update` snapshot of the resulting
    /// state.
    pub fn tick(&mut self, elapsed_ms: i64) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        if !self.running || self.timed_out || elapsed_ms <= 0 {
            return events;
        }

        if !self.in_byo_yomi {
            self.base_remaining_ms -= elapsed_ms;
            if self.base_remaining_ms < 0 {
                let overflow = -self.base_remaining_ms;
                self.base_remaining_ms = 0;
                self.in_byo_yomi = true;
                self.current_period_remaining_ms = self.period_ms - overflow;
            }
        } else {
            self.current_period_remaining_ms -= elapsed_ms;
        }

        if self.in_byo_yomi {
            while self.current_period_remaining_ms <= 0 {
                let overflow = -self.current_period_remaining_ms;
                self.periods_remaining -= 1;
                if self.periods_remaining == 0 {
                    self.timed_out = true;
                    self.running = false;
                    events.push(TimerEvent::TimedOut);
                    events.push(TimerEvent::Update(self.state()));
                    return events;
                }
                self.current_period_remaining_ms = self.period_ms - overflow;
                events.push(TimerEvent::PeriodUsed { remaining: self.periods_remaining });
            }
        }

        events.push(TimerEvent::Update(self.state()));
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulgo::consts::{BYOYOMI_PERIODS, BYOYOMI_PERIOD_MS};

    fn timer(base_time_ms: i64) -> PlayerTimer {
        PlayerTimer::new(base_time_ms, BYOYOMI_PERIODS, BYOYOMI_PERIOD_MS)
    }

    #[test]
    fn base_time_counts_down_without_entering_byoyomi() {
        let mut timer = timer(10_000);
        timer.start();
        let events = timer.tick(5_000);
        assert_eq!(events, vec![TimerEvent::Update(timer.state())]);
        assert_eq!(timer.state().remaining_base_ms, 5_000);
        assert!(!timer.state().in_byo_yomi);
    }

    #[test]
    fn crossing_zero_enters_byoyomi_with_correct_overflow() {
        let mut timer = timer(1_000);
        timer.start();
        let events = timer.tick(1_500);
        assert_eq!(events, vec![TimerEvent::Update(timer.state())]);
        let state = timer.state();
        assert!(state.in_byo_yomi);
        assert_eq!(state.current_byo_yomi_remaining_ms, BYOYOMI_PERIOD_MS - 500);
    }

    #[test]
    fn stopping_mid_period_refreshes_it() {
        let mut timer = timer(100);
        timer.start();
        timer.tick(200); // enters byo-yomi
        timer.tick(15_000); // spend most of the first period
        timer.stop(); // move made: refresh
        assert_eq!(timer.state().current_byo_yomi_remaining_ms, BYOYOMI_PERIOD_MS);
        assert_eq!(timer.state().byo_yomi_periods, BYOYOMI_PERIODS);

        timer.start();
        let events = timer.tick(25_000);
        assert_eq!(events, vec![TimerEvent::Update(timer.state())]);
        assert!(!timer.state().timed_out);
    }

    #[test]
    fn exhausting_all_periods_times_out() {
        let mut timer = timer(0);
        timer.start();
        for _ in 0..BYOYOMI_PERIODS {
            let events = timer.tick(BYOYOMI_PERIOD_MS);
            if timer.is_timed_out() {
                assert!(events.contains(&TimerEvent::TimedOut));
            }
        }
        assert!(timer.is_timed_out());
        assert!(!timer.is_running());
    }

    #[test]
    fn a_single_huge_tick_can_cross_multiple_periods() {
        let mut timer = timer(0);
        timer.start();
        let events = timer.tick(BYOYOMI_PERIOD_MS * i64::from(BYOYOMI_PERIODS) + 10);
        assert!(timer.is_timed_out());
        assert!(events.contains(&TimerEvent::TimedOut));
    }

    #[test]
    fn start_is_a_no_op_once_timed_out() {
        let mut timer = timer(0);
        timer.start();
        timer.tick(BYOYOMI_PERIOD_MS * i64::from(BYOYOMI_PERIODS) + 1);
        assert!(timer.is_timed_out());
        timer.start();
        assert!(!timer.is_running());
    }
}
