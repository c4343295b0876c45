use itertools::Itertools;

use super::Board;

impl Board {
    /// Pretty-prints the board for logs and the CLI harness.
    pub fn pretty(&self) -> String {
        (0..self.size)
            .map(|y| (0..self.size).map(|x| format!("{}", self.cells[y * self.size + x])).join(""))
            .collect::<Vec<String>>()
            .join("\n")
    }
}
