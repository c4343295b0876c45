/*
 *  A simultaneous-move variant of Go: both players commit a move each turn,
 *  moves are revealed and resolved together, and a colliding placement
 *  becomes a permanent neutral "red" stone.
 */

pub(crate) mod board;
pub mod consts;
pub mod coord;
pub mod engine;
pub mod errors;
pub mod events;
pub mod mov;
pub mod protocol;
pub mod rules;
pub mod scoring;
pub mod sets;
pub mod stone;
pub mod timer;

pub mod prelude {
    pub(crate) use crate::utils::prelude::*;

    pub use super::{
        board::{Board, Census},
        consts::*,
        coord::Pos,
        engine::{AiDifficulty, GameEngine, GameMode, GameSettings},
        errors::{RejectReason, RuleViolation},
        events::{EndReason, EngineEvent, MoveRecord},
        mov::Move,
        protocol::{Broker, LoopbackChannel, Message},
        rules::{pre_validate_move, resolve_turn, TurnOutcome},
        scoring::{score, Scoring, TerritoryCell},
        sets::{PosSet, SetOps},
        stone::{Color, Stone},
        timer::{ManagerEvent, PlayerTimer, PlayerTimerState, TimerEvent, TimerManager},
    };
}
