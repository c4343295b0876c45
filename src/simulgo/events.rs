use crate::simulgo::mov::Move;
use crate::simulgo::coord::Pos;
use crate::simulgo::scoring::Scoring;
use crate::simulgo::stone::Color;
use crate::simulgo::timer::PlayerTimerState;

/// One resolved turn, appended to the engine's move history.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveRecord {
    pub turn: u32,
    pub black_move: Move,
    pub white_move: Move,
    pub collision: bool,
    pub collision_pos: Option<Pos>,
    pub captured_black: usize,
    pub captured_white: usize,
}

/// Why a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    DoublePass,
    Resign,
    Timeout,
    Disconnect,
}

/// The tagged events a `GameEngine` operation returns, replacing the
/// reference's per-callback registration (`onTurnResolved`, `onGameEnd`, ...)
/// with a single returned list the session broker folds into wire messages.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    TurnStart { turn: u32 },
    TurnResult {
        record: MoveRecord,
        board: Vec<Vec<u8>>,
        captured_by_black: usize,
        captured_by_white: usize,
        black_timer: PlayerTimerState,
        white_timer: PlayerTimerState,
    },
    TimeUpdate { black: PlayerTimerState, white: PlayerTimerState },
    GameEnd {
        reason: EndReason,
        winner: Option<Color>,
        scoring: Scoring,
        board: Vec<Vec<u8>>,
        move_history: Vec<MoveRecord>,
        captured_by_black: usize,
        captured_by_white: usize,
    },
}
