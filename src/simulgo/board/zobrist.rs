use std::{
    hash::{DefaultHasher, Hasher},
    sync::OnceLock,
};

use crate::simulgo::{consts::MAX_BOARD_SIZE, coord::Pos, stone::Stone};

use super::Board;

const STATES: usize = 3; // Black, White, Red -- Empty never contributes to the hash
const TABLE_LEN: usize = MAX_BOARD_SIZE * MAX_BOARD_SIZE * STATES;

static ZOBRIST_TABLE: OnceLock<[u64; TABLE_LEN]> = OnceLock::new();

fn state_offset(stone: Stone) -> Option<usize> {
    match stone {
        Stone::Black => Some(0),
        Stone::White => Some(1),
        Stone::Red => Some(2),
        Stone::Empty => None,
    }
}

impl Board {
    /// Looks up (lazily building) the hash contribution of a single stone at
    /// a position. The table is sized for the largest supported board so
    /// that it does not need to be rebuilt when the board size changes.
    pub(super) fn cell_hash(pos: Pos, stone: Stone) -> u64 {
        let Some(offset) = state_offset(stone) else {
            return 0;
        };
        let table = ZOBRIST_TABLE.get_or_init(|| {
            let mut table = [0u64; TABLE_LEN];
            let mut hasher = DefaultHasher::new();
            for (i, entry) in table.iter_mut().enumerate() {
                hasher.write_usize(i);
                *entry = hasher.finish();
            }
            table
        });
        let flat = pos.y * MAX_BOARD_SIZE + pos.x;
        table[offset * MAX_BOARD_SIZE * MAX_BOARD_SIZE + flat]
    }

    /// Hashes an entire grid from scratch. Only used at construction time;
    /// every subsequent mutation updates the running hash incrementally.
    pub(super) fn initial_zobrist_hash(size: usize, cells: &[Stone]) -> u64 {
        let mut h = 0;
        for (i, &stone) in cells.iter().enumerate() {
            h ^= Board::cell_hash(Pos::from_index(i, size), stone);
        }
        h
    }
}
