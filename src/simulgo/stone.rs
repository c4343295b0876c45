use std::ops::Neg;

use crate::utils::prelude::*;

/// The value an intersection can take.
///
/// `Red` is not a player's color; it marks a permanent collision blocker and
/// is never removed once placed.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stone {
    Empty = 0,
    Black = 1,
    White = 2,
    Red = 3,
}

impl Stone {
    /// The color playing this stone, if it is a player's stone.
    pub fn color(&self) -> Option<Color> {
        match self {
            Stone::Black => Some(Color::Black),
            Stone::White => Some(Color::White),
            Stone::Empty | Stone::Red => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Stone::Empty)
    }

    pub fn is_red(&self) -> bool {
        matches!(self, Stone::Red)
    }
}

impl From<Color> for Stone {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => Stone::Black,
            Color::White => Stone::White,
        }
    }
}

impl std::fmt::Display for Stone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = match self {
            Stone::Empty => '.',
            Stone::Black => 'B',
            Stone::White => 'W',
            Stone::Red => '#',
        };
        write!(f, "{c}")
    }
}

/// A player's color. Distinct from `Stone` because the engine frequently
/// needs to index "the other player's timer/counters" without threading
/// `Option` around.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    Black = 0,
    White = 1,
}

impl Color {
    /// Notates the color the way the wire protocol expects it.
    pub fn notate(&self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::White => "white",
        }
    }

    pub fn parse(s: &str) -> Result<Color> {
        match s {
            "black" | "Black" | "b" | "B" => Ok(Color::Black),
            "white" | "White" | "w" | "W" => Ok(Color::White),
            _ => Err(anyhow!("invalid notation {s} for color")),
        }
    }
}

impl Neg for Color {
    type Output = Color;
    fn neg(self) -> Self::Output {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.notate())
    }
}
