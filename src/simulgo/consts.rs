/// Default board side length, matching the standard 19x19 goban.
pub const DEFAULT_BOARD_SIZE: usize = 19;

/// Minimum and maximum board sizes this crate is willing to construct.
pub const MIN_BOARD_SIZE: usize = 5;
pub const MAX_BOARD_SIZE: usize = 25;

/// Komi awarded to White under Chinese area scoring.
pub const KOMI: f64 = 7.5;

/// Number of byo-yomi periods each player starts with.
pub const BYOYOMI_PERIODS: u32 = 3;

/// Length of a single byo-yomi period, in milliseconds.
pub const BYOYOMI_PERIOD_MS: i64 = 30_000;

/// Granularity at which a running timer accrues elapsed time.
pub const TICK_MS: i64 = 100;

/// Granularity at which `TimerManager` emits a combined broadcast snapshot.
pub const BROADCAST_MS: i64 = 1_000;
