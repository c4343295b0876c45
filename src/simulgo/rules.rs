use std::collections::HashSet;

use crate::simulgo::board::Board;
use crate::simulgo::coord::Pos;
use crate::simulgo::errors::RuleViolation;
use crate::simulgo::mov::Move;
use crate::simulgo::sets::{PosSet, SetOps};
use crate::simulgo::stone::{Color, Stone};

/// The outcome of resolving one turn's pair of moves against a board. The
/// board passed to `resolve_turn` is mutated in place to become the
/// post-resolution position; this struct records what happened for the
/// purposes of `MoveRecord`/`TURN_RESULT`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnOutcome {
    pub both_passed: bool,
    pub collision: bool,
    pub collision_pos: Option<Pos>,
    pub captured_black: usize,
    pub captured_white: usize,
}

/// Checks whether placing `color` at `pos` would be legal on `board`,
/// without mutating it. `history` is the set of Zobrist hashes of every
/// position already reached this game, used for the superko check.
///
/// Per this crate's resolution of the reference's inconsistent treatment of
/// superko (see the design notes), this is the only pre-validation entry
/// point, and it always enforces superko -- there is no separate lax path.
pub fn pre_validate_move(
    board: &Board,
    pos: Pos,
    color: Color,
    history: &HashSet<u64>,
) -> Result<(), RuleViolation> {
    if !board.in_bounds(pos) {
        return Err(RuleViolation::OutOfBounds);
    }
    if !board.get(pos).unwrap().is_empty() {
        return Err(RuleViolation::Occupied);
    }

    let mut probe = board.clone();
    probe.set_unchecked(pos, Stone::from(color));

    let opponent_dead = probe.dead_groups(-color);
    for group in &opponent_dead {
        probe.remove(group);
    }

    let own_group = probe.group(pos);
    let own_liberties = probe.liberties(&own_group).len();

    if own_liberties == 0 && opponent_dead.is_empty() {
        return Err(RuleViolation::Suicide);
    }

    if history.contains(&probe.hash()) {
        return Err(RuleViolation::KoViolation);
    }

    Ok(())
}

/// Resolves a turn's pair of moves, mutating `board` to the post-turn
/// position.
///
/// The crux of this function is that captures from both colors are computed
/// on the *same* post-placement snapshot before anything is removed, so the
/// result does not depend on which color's capture is "processed first."
pub fn resolve_turn(board: &mut Board, black: Move, white: Move) -> TurnOutcome {
    if black.is_pass() && white.is_pass() {
        return TurnOutcome { both_passed: true, ..Default::default() };
    }

    let mut collision = false;
    let mut collision_pos = None;

    if let (Move::Place(b), Move::Place(w)) = (black, white) {
        if b == w {
            collision = true;
            collision_pos = Some(b);
            board.set_unchecked(b, Stone::Red);
        } else {
            board.set_unchecked(b, Stone::Black);
            board.set_unchecked(w, Stone::White);
        }
    } else {
        if let Move::Place(pos) = black {
            board.set_unchecked(pos, Stone::Black);
        }
        if let Move::Place(pos) = white {
            board.set_unchecked(pos, Stone::White);
        }
    }

    // Dead groups are computed on the same post-placement snapshot whether
    // or not this turn collided into a Red stone -- a collision can still
    // strip the last liberty from a neighboring group.
    let dead_black = board.dead_groups(Color::Black);
    let dead_white = board.dead_groups(Color::White);

    let mut to_remove = PosSet::with_capacity(board.size() * board.size());
    let mut captured_black = 0; // stones removed *from* Black, i.e. captured by White
    let mut captured_white = 0;

    for group in &dead_black {
        captured_black += group.len();
        for idx in group.iter() {
            to_remove.insert(idx);
        }
    }
    for group in &dead_white {
        captured_white += group.len();
        for idx in group.iter() {
            to_remove.insert(idx);
        }
    }
    board.remove(&to_remove);

    TurnOutcome {
        both_passed: false,
        collision,
        collision_pos,
        captured_black,
        captured_white,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suicide_is_rejected() {
        let mut board = Board::new(5).unwrap();
        board.set(Pos::new(1, 0), Stone::White).unwrap();
        board.set(Pos::new(0, 1), Stone::White).unwrap();
        let history = HashSet::new();
        let result = pre_validate_move(&board, Pos::new(0, 0), Color::Black, &history);
        assert_eq!(result, Err(RuleViolation::Suicide));
    }

    #[test]
    fn suicide_that_captures_is_accepted() {
        // Black already owns (3,2); White's lone stone at (1,2) has exactly
        // one liberty, at the target point (2,2). Every other neighbor of
        // the would-be combined Black group is occupied, so playing (2,2)
        // would be self-atari-to-zero-liberties *unless* it captures (1,2).
        let mut board = Board::new(5).unwrap();
        board.set(Pos::new(0, 2), Stone::Black).unwrap();
        board.set(Pos::new(1, 1), Stone::Black).unwrap();
        board.set(Pos::new(1, 3), Stone::Black).unwrap();
        board.set(Pos::new(1, 2), Stone::White).unwrap();
        board.set(Pos::new(3, 2), Stone::Black).unwrap();
        board.set(Pos::new(4, 2), Stone::White).unwrap();
        board.set(Pos::new(3, 1), Stone::White).unwrap();
        board.set(Pos::new(3, 3), Stone::White).unwrap();
        board.set(Pos::new(2, 1), Stone::White).unwrap();
        board.set(Pos::new(2, 3), Stone::White).unwrap();

        let history = HashSet::new();
        let result = pre_validate_move(&board, Pos::new(2, 2), Color::Black, &history);
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn occupied_is_rejected() {
        let mut board = Board::new(9).unwrap();
        board.set(Pos::new(4, 4), Stone::Black).unwrap();
        let history = HashSet::new();
        assert_eq!(
            pre_validate_move(&board, Pos::new(4, 4), Color::White, &history),
            Err(RuleViolation::Occupied)
        );
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let board = Board::new(9).unwrap();
        let history = HashSet::new();
        assert_eq!(
            pre_validate_move(&board, Pos::new(9, 9), Color::Black, &history),
            Err(RuleViolation::OutOfBounds)
        );
    }

    #[test]
    fn superko_is_rejected() {
        let board = Board::new(9).unwrap();
        let mut probe = board.clone();
        probe.set_unchecked(Pos::new(4, 4), Stone::Black);
        let mut history = HashSet::new();
        history.insert(probe.hash());
        assert_eq!(
            pre_validate_move(&board, Pos::new(4, 4), Color::Black, &history),
            Err(RuleViolation::KoViolation)
        );
    }

    #[test]
    fn same_position_collision_becomes_red() {
        let mut board = Board::new(9).unwrap();
        let pos = Pos::new(4, 4);
        let outcome = resolve_turn(&mut board, Move::Place(pos), Move::Place(pos));
        assert!(outcome.collision);
        assert_eq!(outcome.collision_pos, Some(pos));
        assert_eq!(board.get(pos).unwrap(), Stone::Red);
    }

    #[test]
    fn simultaneous_single_stone_capture() {
        let mut board = Board::new(19).unwrap();
        board.set(Pos::new(8, 9), Stone::Black).unwrap();
        board.set(Pos::new(10, 9), Stone::Black).unwrap();
        board.set(Pos::new(9, 8), Stone::Black).unwrap();
        board.set(Pos::new(9, 9), Stone::White).unwrap();

        let outcome = resolve_turn(&mut board, Move::Place(Pos::new(9, 10)), Move::Pass);
        assert!(!outcome.collision);
        assert_eq!(outcome.captured_white, 1);
        assert_eq!(board.get(Pos::new(9, 9)).unwrap(), Stone::Empty);
        assert_eq!(board.get(Pos::new(9, 10)).unwrap(), Stone::Black);
    }

    #[test]
    fn mutual_capture_removes_both_in_one_batch() {
        // Black group at (0,0) with its single liberty at (1,1).
        // White group at (2,2) with its single liberty at (1,1)... they must
        // differ, so build two disjoint one-liberty groups instead.
        let mut board = Board::new(5).unwrap();
        // Black: single stone at (0,0), liberties (1,0) and (0,1). Surround all
        // but one with White to leave exactly one liberty at (0,1).
        board.set(Pos::new(0, 0), Stone::Black).unwrap();
        board.set(Pos::new(1, 0), Stone::White).unwrap();
        // White: single stone at (4,4), liberties (3,4) and (4,3). Surround all
        // but one with Black to leave exactly one liberty at (4,3).
        board.set(Pos::new(4, 4), Stone::White).unwrap();
        board.set(Pos::new(3, 4), Stone::Black).unwrap();

        // Black plays the last liberty of White's group; White plays the last
        // liberty of Black's group.
        let outcome = resolve_turn(&mut board, Move::Place(Pos::new(4, 3)), Move::Place(Pos::new(0, 1)));
        assert_eq!(outcome.captured_white, 1);
        assert_eq!(outcome.captured_black, 1);
        assert_eq!(board.get(Pos::new(0, 0)).unwrap(), Stone::Empty);
        assert_eq!(board.get(Pos::new(4, 4)).unwrap(), Stone::Empty);
    }

    #[test]
    fn collision_can_strip_a_groups_last_liberty() {
        // White's lone stone at (1,1) has its only remaining liberty at
        // (1,2); both players collide into that very point, so the Red
        // stone placed there leaves White's group with zero liberties.
        let mut board = Board::new(5).unwrap();
        board.set(Pos::new(1, 1), Stone::White).unwrap();
        board.set(Pos::new(0, 1), Stone::Black).unwrap();
        board.set(Pos::new(1, 0), Stone::Black).unwrap();
        board.set(Pos::new(2, 1), Stone::Black).unwrap();

        let collision_pos = Pos::new(1, 2);
        let outcome = resolve_turn(&mut board, Move::Place(collision_pos), Move::Place(collision_pos));

        assert!(outcome.collision);
        assert_eq!(board.get(collision_pos).unwrap(), Stone::Red);
        assert_eq!(outcome.captured_white, 1);
        assert_eq!(board.get(Pos::new(1, 1)).unwrap(), Stone::Empty);
    }

    #[test]
    fn both_pass_resolves_without_mutation() {
        let mut board = Board::new(9).unwrap();
        let before = board.hash();
        let outcome = resolve_turn(&mut board, Move::Pass, Move::Pass);
        assert!(outcome.both_passed);
        assert_eq!(board.hash(), before);
    }
}
