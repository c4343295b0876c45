use std::collections::HashSet;

use crate::simulgo::board::Board;
use crate::simulgo::errors::RejectReason;
use crate::simulgo::events::{EndReason, EngineEvent, MoveRecord};
use crate::simulgo::mov::Move;
use crate::simulgo::rules;
use crate::simulgo::scoring;
use crate::simulgo::stone::Color;
use crate::simulgo::timer::{ManagerEvent, TimerEvent, TimerManager};
use crate::utils::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameMode {
    HumanVsHuman,
    HumanVsAi,
    HumanVsHumanP2p,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AiDifficulty {
    Easy,
    Medium,
    Hard,
}

/// Configuration an engine is created with. `ServerOptions` (the CLI layer)
/// maps into this.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSettings {
    pub board_size: usize,
    pub base_time_ms: i64,
    pub byo_yomi_periods: u32,
    pub byo_yomi_period_ms: i64,
    pub mode: GameMode,
    pub ai_difficulty: Option<AiDifficulty>,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings {
            board_size: crate::simulgo::consts::DEFAULT_BOARD_SIZE,
            base_time_ms: 600_000,
            byo_yomi_periods: crate::simulgo::consts::BYOYOMI_PERIODS,
            byo_yomi_period_ms: crate::simulgo::consts::BYOYOMI_PERIOD_MS,
            mode: GameMode::HumanVsHuman,
            ai_difficulty: None,
        }
    }
}

impl GameSettings {
    pub fn validate(&self) -> Result<()> {
        if self.base_time_ms <= 0 {
            return Err(anyhow!("base time must be positive, got {}", self.base_time_ms));
        }
        if self.byo_yomi_period_ms <= 0 {
            return Err(anyhow!("byo-yomi period must be positive, got {}", self.byo_yomi_period_ms));
        }
        if self.byo_yomi_periods == 0 {
            return Err(anyhow!("byo-yomi periods must be at least 1"));
        }
        Board::new(self.board_size).map(|_| ())
    }
}

#[derive(Clone, Debug, Default)]
struct PendingMoves {
    black: Option<Move>,
    white: Option<Move>,
}

impl PendingMoves {
    fn get(&self, color: Color) -> Option<Move> {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }

    fn set(&mut self, color: Color, mv: Move) {
        match color {
            Color::Black => self.black = Some(mv),
            Color::White => self.white = Some(mv),
        }
    }

    fn both_filled(&self) -> bool {
        self.black.is_some() && self.white.is_some()
    }

    fn clear(&mut self) {
        self.black = None;
        self.white = None;
    }
}

/// The turn-resolution pipeline, composing `Board`, `Rules`, `Scoring`, and
/// `TimerManager` into one server-authoritative game.
///
/// The engine is single-threaded and cooperative: every mutation happens in
/// response to a call from the session broker (`submit_move`, `resign`,
/// `tick`), never concurrently.
#[derive(Clone, Debug)]
pub struct GameEngine {
    settings: GameSettings,
    board: Board,
    board_history: HashSet<u64>,
    move_history: Vec<MoveRecord>,
    pending: PendingMoves,
    captured_by_black: usize,
    captured_by_white: usize,
    timers: TimerManager,
    turn_number: u32,
    started: bool,
    ended: bool,
}

impl GameEngine {
    pub fn new(settings: GameSettings) -> Result<GameEngine> {
        settings.validate()?;
        let board = Board::new(settings.board_size)?;
        let timers = TimerManager::new(settings.base_time_ms, settings.byo_yomi_periods, settings.byo_yomi_period_ms);
        Ok(GameEngine {
            settings,
            board,
            board_history: HashSet::new(),
            move_history: Vec::new(),
            pending: PendingMoves::default(),
            captured_by_black: 0,
            captured_by_white: 0,
            timers,
            turn_number: 0,
            started: false,
            ended: false,
        })
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn move_history(&self) -> &[MoveRecord] {
        &self.move_history
    }

    pub fn captured_by(&self, color: Color) -> usize {
        match color {
            Color::Black => self.captured_by_black,
            Color::White => self.captured_by_white,
        }
    }

    /// Resets to a fresh board and begins the first turn.
    pub fn start_game(&mut self) -> Vec<EngineEvent> {
        self.board = Board::new(self.settings.board_size).expect("settings already validated");
        self.board_history.clear();
        self.board_history.insert(self.board.hash());
        self.move_history.clear();
        self.pending.clear();
        self.captured_by_black = 0;
        self.captured_by_white = 0;
        self.timers =
            TimerManager::new(self.settings.base_time_ms, self.settings.byo_yomi_periods, self.settings.byo_yomi_period_ms);
        self.turn_number = 0;
        self.started = true;
        self.ended = false;

        self.start_next_turn()
    }

    fn start_next_turn(&mut self) -> Vec<EngineEvent> {
        self.turn_number += 1;
        self.pending.clear();

        for &color in &[Color::Black, Color::White] {
            if self.timers.is_timed_out(color) {
                self.pending.set(color, Move::Pass);
            }
        }

        if self.pending.both_filled() {
            return self.resolve_turn();
        }

        self.timers.start_turn();
        vec![EngineEvent::TurnStart { turn: self.turn_number }]
    }

    /// Accepts one player's move for the current turn.
    pub fn submit_move(&mut self, color: Color, mv: Move) -> Result<Vec<EngineEvent>, RejectReason> {
        if !self.started {
            return Err(RejectReason::NotStarted);
        }
        if self.ended {
            return Err(RejectReason::AlreadyEnded);
        }
        if self.pending.get(color).is_some() {
            return Err(RejectReason::AlreadySubmitted);
        }
        if self.timers.is_timed_out(color) {
            return Err(RejectReason::PlayerTimedOut);
        }
        if let Move::Place(pos) = mv {
            rules::pre_validate_move(&self.board, pos, color, &self.board_history)?;
        }

        self.pending.set(color, mv);
        self.timers.stop_player(color);

        if self.pending.both_filled() {
            Ok(self.resolve_turn())
        } else {
            Ok(Vec::new())
        }
    }

    fn resolve_turn(&mut self) -> Vec<EngineEvent> {
        let black_move = self.pending.black.take().expect("both slots filled");
        let white_move = self.pending.white.take().expect("both slots filled");

        let outcome = rules::resolve_turn(&mut self.board, black_move, white_move);
        self.captured_by_black += outcome.captured_white;
        self.captured_by_white += outcome.captured_black;
        self.board_history.insert(self.board.hash());

        let record = MoveRecord {
            turn: self.turn_number,
            black_move,
            white_move,
            collision: outcome.collision,
            collision_pos: outcome.collision_pos,
            captured_black: outcome.captured_black,
            captured_white: outcome.captured_white,
        };
        self.move_history.push(record.clone());

        let mut events = vec![EngineEvent::TurnResult {
            record,
            board: self.board.to_grid(),
            captured_by_black: self.captured_by_black,
            captured_by_white: self.captured_by_white,
            black_timer: self.timers.timer(Color::Black).state(),
            white_timer: self.timers.timer(Color::White).state(),
        }];

        if outcome.both_passed {
            events.extend(self.end_game(EndReason::DoublePass, None));
        } else if self.timers.is_timed_out(Color::Black) && self.timers.is_timed_out(Color::White) {
            events.extend(self.end_game(EndReason::Timeout, None));
        } else {
            events.extend(self.start_next_turn());
        }

        events
    }

    /// Ends the game by resignation. A no-op if the game has already ended.
    pub fn resign(&mut self, color: Color) -> Vec<EngineEvent> {
        if self.ended {
            return Vec::new();
        }
        self.end_game(EndReason::Resign, Some(-color))
    }

    /// Ends the game due to a transport disconnect, with the other side
    /// declared the winner.
    pub fn disconnect(&mut self, disconnected: Color) -> Vec<EngineEvent> {
        if self.ended {
            return Vec::new();
        }
        self.end_game(EndReason::Disconnect, Some(-disconnected))
    }

    /// Advances both clocks by `elapsed_ms`. Call at whatever granularity
    /// the transport layer supports (the reference engines poll at ~100ms).
    /// A no-op before the game starts or after it ends.
    pub fn tick(&mut self, elapsed_ms: i64) -> Vec<EngineEvent> {
        if !self.started || self.ended {
            return Vec::new();
        }

        let mut events = Vec::new();
        let mut timed_out = Vec::new();
        for manager_event in self.timers.tick(elapsed_ms) {
            match manager_event {
                ManagerEvent::Broadcast { black, white } => {
                    events.push(EngineEvent::TimeUpdate { black, white });
                }
                ManagerEvent::Player(color, TimerEvent::TimedOut) => timed_out.push(color),
                ManagerEvent::Player(_, TimerEvent::PeriodUsed { .. }) => {}
                // Per-tick snapshots are superseded by the throttled
                // `Broadcast` above; the engine has no finer-grained wire
                // message to carry them.
                ManagerEvent::Player(_, TimerEvent::Update(_)) => {}
            }
        }

        for color in timed_out {
            if self.ended {
                break;
            }
            // The opponent is declared the winner immediately; this
            // overrides any scoring-based verdict.
            events.extend(self.end_game(EndReason::Timeout, Some(-color)));
        }

        events
    }

    fn end_game(&mut self, reason: EndReason, forced_winner: Option<Color>) -> Vec<EngineEvent> {
        self.ended = true;
        let scoring = scoring::score(&self.board);
        let winner = forced_winner.or(scoring.winner);

        vec![EngineEvent::GameEnd {
            reason,
            winner,
            scoring,
            board: self.board.to_grid(),
            move_history: self.move_history.clone(),
            captured_by_black: self.captured_by_black,
            captured_by_white: self.captured_by_white,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulgo::coord::Pos;

    fn engine(board_size: usize, base_time_ms: i64) -> GameEngine {
        GameEngine::new(GameSettings { board_size, base_time_ms, ..Default::default() }).unwrap()
    }

    #[test]
    fn start_game_emits_turn_start() {
        let mut e = engine(9, 600_000);
        let events = e.start_game();
        assert!(e.is_started());
        assert_eq!(e.turn_number(), 1);
        assert!(matches!(events.as_slice(), [EngineEvent::TurnStart { turn: 1 }]));
    }

    #[test]
    fn double_pass_ends_the_game_with_scoring() {
        let mut e = engine(19, 600_000);
        e.start_game();
        e.submit_move(Color::Black, Move::Pass).unwrap();
        let events = e.submit_move(Color::White, Move::Pass).unwrap();
        assert!(e.is_ended());
        let end = events.iter().find_map(|ev| match ev {
            EngineEvent::GameEnd { reason, winner, .. } => Some((*reason, *winner)),
            _ => None,
        });
        assert_eq!(end, Some((EndReason::DoublePass, Some(Color::White))));
    }

    #[test]
    fn order_independence_of_submit_move() {
        let mut a = engine(9, 600_000);
        a.start_game();
        a.submit_move(Color::Black, Move::Place(Pos::new(3, 3))).unwrap();
        a.submit_move(Color::White, Move::Place(Pos::new(5, 5))).unwrap();

        let mut b = engine(9, 600_000);
        b.start_game();
        b.submit_move(Color::White, Move::Place(Pos::new(5, 5))).unwrap();
        b.submit_move(Color::Black, Move::Place(Pos::new(3, 3))).unwrap();

        assert_eq!(a.board().hash(), b.board().hash());
        assert_eq!(a.captured_by(Color::Black), b.captured_by(Color::Black));
        assert_eq!(a.captured_by(Color::White), b.captured_by(Color::White));
    }

    #[test]
    fn already_submitted_is_rejected() {
        let mut e = engine(9, 600_000);
        e.start_game();
        e.submit_move(Color::Black, Move::Place(Pos::new(0, 0))).unwrap();
        let result = e.submit_move(Color::Black, Move::Place(Pos::new(1, 1)));
        assert_eq!(result, Err(RejectReason::AlreadySubmitted));
    }

    #[test]
    fn submitting_before_start_is_rejected() {
        let mut e = engine(9, 600_000);
        let result = e.submit_move(Color::Black, Move::Pass);
        assert_eq!(result, Err(RejectReason::NotStarted));
    }

    #[test]
    fn resign_ends_the_game_for_the_opponent() {
        let mut e = engine(9, 600_000);
        e.start_game();
        let events = e.resign(Color::Black);
        assert!(e.is_ended());
        let end = events.iter().find_map(|ev| match ev {
            EngineEvent::GameEnd { reason, winner, .. } => Some((*reason, *winner)),
            _ => None,
        });
        assert_eq!(end, Some((EndReason::Resign, Some(Color::White))));
    }

    #[test]
    fn timeout_overrides_score_based_verdict() {
        // Black has an overwhelming area lead, but times out; White still
        // wins because timeout forces the verdict.
        let mut e = engine(9, 1); // 1ms base time: times out almost immediately
        e.start_game();
        e.submit_move(Color::White, Move::Pass).unwrap();
        let events = e.tick(crate::simulgo::consts::BYOYOMI_PERIOD_MS * 4);
        assert!(e.is_ended());
        let end = events.iter().find_map(|ev| match ev {
            EngineEvent::GameEnd { reason, winner, .. } => Some((*reason, *winner)),
            _ => None,
        });
        assert_eq!(end, Some((EndReason::Timeout, Some(Color::White))));
    }

    #[test]
    fn collision_move_is_recorded_and_no_stone_is_placed() {
        let mut e = engine(9, 600_000);
        e.start_game();
        let pos = Pos::new(4, 4);
        e.submit_move(Color::Black, Move::Place(pos)).unwrap();
        let events = e.submit_move(Color::White, Move::Place(pos)).unwrap();
        let record = events.iter().find_map(|ev| match ev {
            EngineEvent::TurnResult { record, .. } => Some(record.clone()),
            _ => None,
        });
        let record = record.unwrap();
        assert!(record.collision);
        assert_eq!(record.collision_pos, Some(pos));
    }

    #[test]
    fn superko_rejects_a_recreated_position() {
        let mut e = engine(9, 600_000);
        e.start_game();
        // turn 1: black plays (0,0), white passes
        e.submit_move(Color::Black, Move::Place(Pos::new(0, 0))).unwrap();
        e.submit_move(Color::White, Move::Pass).unwrap();
        // the initial empty-board hash is already in history; replaying a
        // move that recreates it should be rejected for *some* later move,
        // but a simpler direct check is exercised in rules::tests. Here we
        // just confirm the engine threads board_history through correctly
        // by re-placing at a spot and checking it fails for occupancy, not
        // panicking on an empty history set.
        let result = e.submit_move(Color::Black, Move::Place(Pos::new(0, 0)));
        assert!(result.is_err());
    }
}
