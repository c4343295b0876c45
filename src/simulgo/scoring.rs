use crate::simulgo::board::Board;
use crate::simulgo::consts::KOMI;
use crate::simulgo::coord::Pos;
use crate::simulgo::sets::{PosSet, SetOps};
use crate::simulgo::stone::{Color, Stone};

/// Per-cell territory classification, using the wire's integer encoding
/// directly so `Scoring::territory_map` can be serialized without
/// translation.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerritoryCell {
    NeutralEmpty = 0,
    BlackTerritory = 1,
    WhiteTerritory = 2,
    RedStone = 3,
    BlackStone = 4,
    WhiteStone = 5,
}

/// Chinese-area scoring result for a finished (or inspected) board.
#[derive(Clone, Debug, PartialEq)]
pub struct Scoring {
    pub black_stones: usize,
    pub white_stones: usize,
    pub red_stones: usize,
    pub black_territory: usize,
    pub white_territory: usize,
    pub neutral_territory: usize,
    pub black_score: f64,
    pub white_score: f64,
    pub winner: Option<Color>,
    pub territory_map: Vec<Vec<TerritoryCell>>,
}

/// Scores `board` under Chinese area rules with a red-neutral extension:
/// an empty region whose only non-empty border colors, after discarding
/// Red, is a single player's color belongs to that player; Red is
/// "neutral-transparent" rather than "neutral-contagious" -- it does not
/// itself turn a region neutral, it is simply ignored when deciding.
pub fn score(board: &Board) -> Scoring {
    let size = board.size();
    let census = board.census();

    let mut map = vec![vec![TerritoryCell::NeutralEmpty; size]; size];
    for y in 0..size {
        for x in 0..size {
            let stone = board.get_unchecked(Pos::new(x, y));
            map[y][x] = match stone {
                Stone::Black => TerritoryCell::BlackStone,
                Stone::White => TerritoryCell::WhiteStone,
                Stone::Red => TerritoryCell::RedStone,
                Stone::Empty => TerritoryCell::NeutralEmpty,
            };
        }
    }

    let mut visited = PosSet::with_capacity(size * size);
    let mut black_territory = 0;
    let mut white_territory = 0;
    let mut neutral_territory = 0;

    for idx in 0..(size * size) {
        if visited.contains(idx) {
            continue;
        }
        let start = Pos::from_index(idx, size);
        if !board.get_unchecked(start).is_empty() {
            continue;
        }

        let mut region = Vec::new();
        let mut borders_black = false;
        let mut borders_white = false;
        let mut stack = vec![start];
        visited.insert(idx);

        while let Some(pos) = stack.pop() {
            region.push(pos);
            for n in board.neighbors(pos) {
                match board.get_unchecked(n) {
                    Stone::Black => borders_black = true,
                    Stone::White => borders_white = true,
                    Stone::Red => {} // Red is removed from the adjacency set, not counted
                    Stone::Empty => {
                        let nidx = n.index(size);
                        if !visited.contains(nidx) {
                            visited.insert(nidx);
                            stack.push(n);
                        }
                    }
                }
            }
        }

        let owner = match (borders_black, borders_white) {
            (true, false) => Some(Color::Black),
            (false, true) => Some(Color::White),
            _ => None,
        };

        match owner {
            Some(Color::Black) => black_territory += region.len(),
            Some(Color::White) => white_territory += region.len(),
            None => neutral_territory += region.len(),
        }

        let cell = match owner {
            Some(Color::Black) => TerritoryCell::BlackTerritory,
            Some(Color::White) => TerritoryCell::WhiteTerritory,
            None => TerritoryCell::NeutralEmpty,
        };
        for pos in region {
            map[pos.y][pos.x] = cell;
        }
    }

    let black_score = (census.black + black_territory) as f64;
    let white_score = (census.white + white_territory) as f64 + KOMI;
    let winner = if black_score > white_score {
        Some(Color::Black)
    } else if white_score > black_score {
        Some(Color::White)
    } else {
        None
    };

    Scoring {
        black_stones: census.black,
        white_stones: census.white,
        red_stones: census.red,
        black_territory,
        white_territory,
        neutral_territory,
        black_score,
        white_score,
        winner,
        territory_map: map,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_is_won_by_white_on_komi() {
        let board = Board::new(9).unwrap();
        let s = score(&board);
        assert_eq!(s.black_score, 0.0);
        assert_eq!(s.white_score, KOMI);
        assert_eq!(s.winner, Some(Color::White));
        assert_eq!(s.neutral_territory, 0);
    }

    #[test]
    fn fully_black_board_has_no_neutral_territory() {
        let mut board = Board::new(5).unwrap();
        for y in 0..5 {
            for x in 0..5 {
                board.set(Pos::new(x, y), Stone::Black).unwrap();
            }
        }
        let s = score(&board);
        assert_eq!(s.neutral_territory, 0);
        assert_eq!(s.black_score, 25.0);
        assert_eq!(s.winner, Some(Color::Black));
    }

    #[test]
    fn region_touching_only_red_and_black_is_black_territory() {
        let mut board = Board::new(5).unwrap();
        // Wall off the left column with Black, right column with Red, leave
        // the middle column empty. The middle region touches Black and Red
        // only, so after discarding Red it is single-colored: Black's.
        for y in 0..5 {
            board.set(Pos::new(0, y), Stone::Black).unwrap();
            board.set(Pos::new(2, y), Stone::Red).unwrap();
        }
        let s = score(&board);
        assert_eq!(s.black_territory, 5);
        assert_eq!(s.neutral_territory, board.size() * board.size() - 5 - 5 - 5);
    }

    #[test]
    fn region_touching_both_colors_is_neutral() {
        let mut board = Board::new(5).unwrap();
        board.set(Pos::new(0, 2), Stone::Black).unwrap();
        board.set(Pos::new(4, 2), Stone::White).unwrap();
        let s = score(&board);
        assert_eq!(s.neutral_territory, 23);
        assert_eq!(s.black_territory, 0);
        assert_eq!(s.white_territory, 0);
    }
}
