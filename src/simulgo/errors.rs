use serde::Serialize;

/// Why a single placement failed pre-validation against the current board.
///
/// This is the closed, client-facing error taxonomy: every variant is
/// something a player caused and can retry from, as opposed to an
/// `anyhow::Error`, which this crate reserves for I/O, parsing, and other
/// failures that are not the player's fault.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleViolation {
    OutOfBounds,
    Occupied,
    Suicide,
    KoViolation,
}

impl std::fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            RuleViolation::OutOfBounds => "position is out of bounds",
            RuleViolation::Occupied => "position is already occupied",
            RuleViolation::Suicide => "move would leave its own group with no liberties",
            RuleViolation::KoViolation => "move would repeat a previous board position",
        };
        write!(f, "{msg}")
    }
}

/// Why `GameEngine::submit_move` rejected a submission. Wraps `RuleViolation`
/// for placements, plus the turn/session-level reasons a move can be turned
/// away before it ever reaches the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    NotStarted,
    AlreadyEnded,
    AlreadySubmitted,
    PlayerTimedOut,
    Rule(RuleViolation),
}

impl From<RuleViolation> for RejectReason {
    fn from(value: RuleViolation) -> Self {
        RejectReason::Rule(value)
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::NotStarted => write!(f, "game has not started"),
            RejectReason::AlreadyEnded => write!(f, "game has already ended"),
            RejectReason::AlreadySubmitted => write!(f, "a move was already submitted this turn"),
            RejectReason::PlayerTimedOut => write!(f, "player has timed out"),
            RejectReason::Rule(rule) => write!(f, "{rule}"),
        }
    }
}
