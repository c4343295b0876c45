use crate::utils::prelude::*;

/// A point on the board, zero-indexed from the top-left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub fn new(x: usize, y: usize) -> Self {
        Pos { x, y }
    }

    /// Flattens this position to a `y * size + x` index, as used by the
    /// bitsets and flood-fill visited arrays.
    pub fn index(&self, size: usize) -> usize {
        self.y * size + self.x
    }

    pub fn from_index(index: usize, size: usize) -> Self {
        Pos { x: index % size, y: index / size }
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl std::str::FromStr for Pos {
    type Err = Error;

    /// Parses the `"x,y"` wire notation used in notification logs (the JSON
    /// protocol itself carries `x`/`y` as separate integer fields).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (xs, ys) = s
            .split_once(',')
            .ok_or_else(|| anyhow!("invalid notation {s} for a position"))?;
        Ok(Pos {
            x: xs.trim().parse()?,
            y: ys.trim().parse()?,
        })
    }
}
