pub(crate) mod pretty;
pub(crate) mod zobrist;

use crate::simulgo::consts::{MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::simulgo::coord::Pos;
use crate::simulgo::sets::{PosSet, SetOps};
use crate::simulgo::stone::{Color, Stone};
use crate::utils::prelude::*;

/// Census of how many intersections hold each kind of value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Census {
    pub black: usize,
    pub white: usize,
    pub red: usize,
    pub empty: usize,
}

/// The goban: a square grid of `Stone`s plus the running Zobrist hash of its
/// contents.
///
/// `Board` is intentionally unaware of turns, history, or time controls --
/// those live on `GameEngine`. It only ever represents one snapshot.
#[derive(Clone, Debug)]
pub struct Board {
    size: usize,
    cells: Vec<Stone>,
    zobrist_hash: u64,
}

impl Board {
    /// Builds a fresh, empty board of the given side length.
    pub fn new(size: usize) -> Result<Board> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(anyhow!(
                "board size {size} out of supported range {MIN_BOARD_SIZE}..={MAX_BOARD_SIZE}"
            ));
        }
        let cells = vec![Stone::Empty; size * size];
        let zobrist_hash = Board::initial_zobrist_hash(size, &cells);
        Ok(Board { size, cells, zobrist_hash })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x < self.size && pos.y < self.size
    }

    /// Reads the stone at a position.
    pub fn get(&self, pos: Pos) -> Result<Stone> {
        if !self.in_bounds(pos) {
            return Err(anyhow!("position {pos} is out of bounds on a {0}x{0} board", self.size));
        }
        Ok(self.get_unchecked(pos))
    }

    /// Reads the stone at a position with no bounds check; engine-internal
    /// hot path used once a position has already been validated.
    pub(crate) fn get_unchecked(&self, pos: Pos) -> Stone {
        unsafe { *self.cells.get_unchecked(pos.index(self.size)) }
    }

    /// Writes a stone at a position, keeping the running Zobrist hash in
    /// sync.
    pub fn set(&mut self, pos: Pos, stone: Stone) -> Result<()> {
        if !self.in_bounds(pos) {
            return Err(anyhow!("position {pos} is out of bounds on a {0}x{0} board", self.size));
        }
        self.set_unchecked(pos, stone);
        Ok(())
    }

    pub(crate) fn set_unchecked(&mut self, pos: Pos, stone: Stone) {
        let idx = pos.index(self.size);
        let prev = self.cells[idx];
        self.zobrist_hash ^= Board::cell_hash(pos, prev);
        self.cells[idx] = stone;
        self.zobrist_hash ^= Board::cell_hash(pos, stone);
    }

    /// The in-bounds orthogonal neighbors of a position (2 to 4 of them).
    pub fn neighbors(&self, pos: Pos) -> Vec<Pos> {
        let mut out = Vec::with_capacity(4);
        if pos.x > 0 {
            out.push(Pos::new(pos.x - 1, pos.y));
        }
        if pos.x + 1 < self.size {
            out.push(Pos::new(pos.x + 1, pos.y));
        }
        if pos.y > 0 {
            out.push(Pos::new(pos.x, pos.y - 1));
        }
        if pos.y + 1 < self.size {
            out.push(Pos::new(pos.x, pos.y + 1));
        }
        out
    }

    /// The maximal 4-connected same-color group containing `pos`. Empty for
    /// `Empty`/`Red` cells, since those are never grouped.
    pub fn group(&self, pos: Pos) -> PosSet {
        let mut members = PosSet::with_capacity(self.size * self.size);
        let origin = self.get_unchecked(pos);
        if origin.is_empty() || origin.is_red() {
            return members;
        }

        let mut stack = vec![pos];
        members.insert(pos.index(self.size));
        while let Some(p) = stack.pop() {
            for n in self.neighbors(p) {
                let idx = n.index(self.size);
                if members.contains(idx) {
                    continue;
                }
                if self.get_unchecked(n) == origin {
                    members.insert(idx);
                    stack.push(n);
                }
            }
        }
        members
    }

    /// The empty positions orthogonally adjacent to any member of `group`.
    /// Red cells never count as a liberty.
    pub fn liberties(&self, group: &PosSet) -> PosSet {
        let mut libs = PosSet::with_capacity(self.size * self.size);
        for idx in group.iter() {
            let p = Pos::from_index(idx, self.size);
            for n in self.neighbors(p) {
                let nidx = n.index(self.size);
                if self.get_unchecked(n).is_empty() {
                    libs.insert(nidx);
                }
            }
        }
        libs
    }

    /// Every maximal same-color group of `color` with zero liberties, as of
    /// the board's current contents. Does not mutate the board.
    pub fn dead_groups(&self, color: Color) -> Vec<PosSet> {
        let stone = Stone::from(color);
        let mut visited = PosSet::with_capacity(self.size * self.size);
        let mut dead = Vec::new();

        for idx in 0..(self.size * self.size) {
            if visited.contains(idx) {
                continue;
            }
            let pos = Pos::from_index(idx, self.size);
            if self.get_unchecked(pos) != stone {
                continue;
            }
            let group = self.group(pos);
            for member in group.iter() {
                visited.insert(member);
            }
            if self.liberties(&group).len() == 0 {
                dead.push(group);
            }
        }
        dead
    }

    /// Sets every position in `group` to `Empty`.
    pub fn remove(&mut self, group: &PosSet) {
        for idx in group.iter() {
            let pos = Pos::from_index(idx, self.size);
            self.set_unchecked(pos, Stone::Empty);
        }
    }

    /// Counts of each stone kind currently on the board.
    pub fn census(&self) -> Census {
        let mut census = Census::default();
        for &stone in &self.cells {
            match stone {
                Stone::Black => census.black += 1,
                Stone::White => census.white += 1,
                Stone::Red => census.red += 1,
                Stone::Empty => census.empty += 1,
            }
        }
        census
    }

    pub fn hash(&self) -> u64 {
        self.zobrist_hash
    }

    /// Serializes the board as a row-major grid of the wire's integer stone
    /// encoding, for `GAME_START`/`TURN_RESULT`/`GAME_END` payloads.
    pub fn to_grid(&self) -> Vec<Vec<u8>> {
        (0..self.size)
            .map(|y| (0..self.size).map(|x| self.cells[y * self.size + x] as u8).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_board_is_all_empty() {
        let board = Board::new(9).unwrap();
        let census = board.census();
        assert_eq!(census.empty, 81);
        assert_eq!(census.black, 0);
    }

    #[test]
    fn out_of_range_size_rejected() {
        assert!(Board::new(3).is_err());
        assert!(Board::new(99).is_err());
    }

    #[test]
    fn group_and_liberties_single_stone() {
        let mut board = Board::new(9).unwrap();
        board.set(Pos::new(4, 4), Stone::Black).unwrap();
        let group = board.group(Pos::new(4, 4));
        assert_eq!(group.len(), 1);
        assert_eq!(board.liberties(&group).len(), 4);
    }

    #[test]
    fn corner_group_merges_and_counts_liberties() {
        let mut board = Board::new(9).unwrap();
        board.set(Pos::new(0, 0), Stone::Black).unwrap();
        board.set(Pos::new(1, 0), Stone::Black).unwrap();
        let group = board.group(Pos::new(0, 0));
        assert_eq!(group.len(), 2);
        // (0,1), (1,1), (2,0) are the three distinct empty neighbors.
        assert_eq!(board.liberties(&group).len(), 3);
    }

    #[test]
    fn surrounded_group_has_no_liberties() {
        let mut board = Board::new(5).unwrap();
        board.set(Pos::new(2, 2), Stone::Black).unwrap();
        board.set(Pos::new(1, 2), Stone::White).unwrap();
        board.set(Pos::new(3, 2), Stone::White).unwrap();
        board.set(Pos::new(2, 1), Stone::White).unwrap();
        board.set(Pos::new(2, 3), Stone::White).unwrap();
        let dead = board.dead_groups(Color::Black);
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].len(), 1);
    }

    #[test]
    fn red_stones_never_count_as_liberties() {
        let mut board = Board::new(5).unwrap();
        board.set(Pos::new(2, 2), Stone::Black).unwrap();
        board.set(Pos::new(1, 2), Stone::Red).unwrap();
        board.set(Pos::new(3, 2), Stone::Red).unwrap();
        board.set(Pos::new(2, 1), Stone::Red).unwrap();
        board.set(Pos::new(2, 3), Stone::Red).unwrap();
        let group = board.group(Pos::new(2, 2));
        assert_eq!(board.liberties(&group).len(), 0);
    }

    #[test]
    fn set_and_remove_round_trip_hash() {
        let mut board = Board::new(9).unwrap();
        let before = board.hash();
        board.set(Pos::new(3, 3), Stone::White).unwrap();
        assert_ne!(board.hash(), before);
        board.set(Pos::new(3, 3), Stone::Empty).unwrap();
        assert_eq!(board.hash(), before);
    }
}
