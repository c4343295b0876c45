use serde::{Deserialize, Serialize};

use crate::simulgo::coord::Pos;
use crate::simulgo::errors::RejectReason;
use crate::simulgo::events::{EndReason, EngineEvent, MoveRecord};
use crate::simulgo::mov::Move;
use crate::simulgo::scoring::Scoring;
use crate::simulgo::stone::Color;
use crate::simulgo::timer::PlayerTimerState;

fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// A move as it appears inside a `SUBMIT_MOVE` frame: `pass` is set for a
/// pass, otherwise `x`/`y` name the placement.
fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WireMove {
    #[serde(default, skip_serializing_if = "is_false")]
    pub pass: bool,
    pub x: Option<usize>,
    pub y: Option<usize>,
}

impl From<Move> for WireMove {
    fn from(mv: Move) -> Self {
        match mv {
            Move::Pass => WireMove { pass: true, x: None, y: None },
            Move::Place(pos) => WireMove { pass: false, x: Some(pos.x), y: Some(pos.y) },
        }
    }
}

impl TryFrom<WireMove> for Move {
    type Error = anyhow::Error;

    fn try_from(wm: WireMove) -> Result<Self, Self::Error> {
        if wm.pass {
            return Ok(Move::Pass);
        }
        match (wm.x, wm.y) {
            (Some(x), Some(y)) => Ok(Move::Place(Pos::new(x, y))),
            _ => Err(anyhow::anyhow!("SUBMIT_MOVE must set either pass or both x and y")),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMoveRecord {
    pub turn: u32,
    pub black_move: WireMove,
    pub white_move: WireMove,
    pub collision: bool,
    pub collision_pos: Option<(usize, usize)>,
    pub captured_black: usize,
    pub captured_white: usize,
}

impl From<&MoveRecord> for WireMoveRecord {
    fn from(r: &MoveRecord) -> Self {
        WireMoveRecord {
            turn: r.turn,
            black_move: r.black_move.into(),
            white_move: r.white_move.into(),
            collision: r.collision,
            collision_pos: r.collision_pos.map(|p| (p.x, p.y)),
            captured_black: r.captured_black,
            captured_white: r.captured_white,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireScoring {
    pub black_score: f64,
    pub white_score: f64,
    pub black_stones: usize,
    pub white_stones: usize,
    pub red_stones: usize,
    pub black_territory: usize,
    pub white_territory: usize,
    pub neutral_territory: usize,
}

impl From<&Scoring> for WireScoring {
    fn from(s: &Scoring) -> Self {
        WireScoring {
            black_score: s.black_score,
            white_score: s.white_score,
            black_stones: s.black_stones,
            white_stones: s.white_stones,
            red_stones: s.red_stones,
            black_territory: s.black_territory,
            white_territory: s.white_territory,
            neutral_territory: s.neutral_territory,
        }
    }
}

fn color_name(color: Option<Color>) -> &'static str {
    match color {
        Some(Color::Black) => "black",
        Some(Color::White) => "white",
        None => "tie",
    }
}

fn reason_name(reason: EndReason) -> &'static str {
    match reason {
        EndReason::DoublePass => "double_pass",
        EndReason::Resign => "resign",
        EndReason::Timeout => "timeout",
        EndReason::Disconnect => "disconnect",
    }
}

/// The full wire message catalog. Every variant carries a `timestamp`
/// (milliseconds since epoch) alongside its type tag.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    Join { timestamp: i64, player_name: String },
    Joined { timestamp: i64, color: String, game_settings: serde_json::Value },
    GameStart { timestamp: i64, board_size: usize, board: Vec<Vec<u8>>, time_settings: serde_json::Value },
    TurnStart { timestamp: i64, turn_number: u32 },
    SubmitMove { timestamp: i64, #[serde(rename = "move")] mv: WireMove },
    MoveAck { timestamp: i64, waiting: bool },
    TurnResult {
        timestamp: i64,
        record: WireMoveRecord,
        board: Vec<Vec<u8>>,
        captured_by_black: usize,
        captured_by_white: usize,
        timers: serde_json::Value,
    },
    TimeUpdate { timestamp: i64, black_timer: PlayerTimerState, white_timer: PlayerTimerState },
    GameEnd {
        timestamp: i64,
        reason: String,
        winner: String,
        scoring: WireScoring,
        board: Vec<Vec<u8>>,
        move_history: Vec<WireMoveRecord>,
        captured_by_black: usize,
        captured_by_white: usize,
    },
    Resign { timestamp: i64 },
    Chat { timestamp: i64, sender: Option<String>, color: Option<String>, message: String },
    Error { timestamp: i64, reason: serde_json::Value },
    Reconnect { timestamp: i64 },
    SyncState { timestamp: i64, board: Vec<Vec<u8>>, turn_number: u32 },
}

impl Message {
    /// Builds an `ERROR` message from a free-form description (connection
    /// bookkeeping failures that have no `RejectReason` of their own).
    pub fn error(reason: impl std::fmt::Display) -> Message {
        Message::Error { timestamp: now_ms(), reason: serde_json::Value::String(reason.to_string()) }
    }

    /// Builds an `ERROR` message carrying the structured `RejectReason`
    /// itself, so a client can match on `reason.kind` rather than parse a
    /// free-form string.
    pub fn reject(reason: RejectReason) -> Message {
        let value =
            serde_json::to_value(&reason).unwrap_or_else(|_| serde_json::Value::String(reason.to_string()));
        Message::Error { timestamp: now_ms(), reason: value }
    }

    pub fn from_engine_event(event: &EngineEvent) -> Message {
        match event {
            EngineEvent::TurnStart { turn } => Message::TurnStart { timestamp: now_ms(), turn_number: *turn },
            EngineEvent::TurnResult {
                record,
                board,
                captured_by_black,
                captured_by_white,
                black_timer,
                white_timer,
            } => Message::TurnResult {
                timestamp: now_ms(),
                record: record.into(),
                board: board.clone(),
                captured_by_black: *captured_by_black,
                captured_by_white: *captured_by_white,
                timers: serde_json::json!({ "black": black_timer, "white": white_timer }),
            },
            EngineEvent::TimeUpdate { black, white } => {
                Message::TimeUpdate { timestamp: now_ms(), black_timer: *black, white_timer: *white }
            }
            EngineEvent::GameEnd {
                reason,
                winner,
                scoring,
                board,
                captured_by_black,
                captured_by_white,
                move_history,
            } => Message::GameEnd {
                timestamp: now_ms(),
                reason: reason_name(*reason).to_string(),
                winner: color_name(*winner).to_string(),
                scoring: scoring.into(),
                board: board.clone(),
                move_history: move_history.iter().map(WireMoveRecord::from).collect(),
                captured_by_black: *captured_by_black,
                captured_by_white: *captured_by_white,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_move_pass_round_trips() {
        let msg = Message::SubmitMove { timestamp: 1, mv: WireMove { pass: true, x: None, y: None } };
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, Message::SubmitMove { mv: WireMove { pass: true, .. }, .. }));
    }

    #[test]
    fn submit_move_place_round_trips() {
        let msg = Message::SubmitMove {
            timestamp: 1,
            mv: WireMove { pass: false, x: Some(3), y: Some(4) },
        };
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            back,
            Message::SubmitMove { mv: WireMove { x: Some(3), y: Some(4), .. }, .. }
        ));
    }

    #[test]
    fn message_type_tag_is_screaming_snake_case() {
        let msg = Message::Resign { timestamp: 0 };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"RESIGN\""));
    }

    #[test]
    fn wire_move_requires_pass_or_coordinates() {
        let bad = WireMove { pass: false, x: Some(1), y: None };
        assert!(Move::try_from(bad).is_err());
    }
}
