use serde::{Deserialize, Serialize};

/// Player-visible covering of a cell, drives what a gesture may do to it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cover {
    Covered,
    Flagged,
    Questioned,
    Revealed,
}

impl Cover {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }

    /// Next marking in the `Covered -> Flagged -> Questioned -> Covered` rotation.
    pub const fn cycled(self) -> Option<Self> {
        use Cover::*;
        match self {
            Covered => Some(Flagged),
            Flagged => Some(Questioned),
            Questioned => Some(Covered),
            Revealed => None,
        }
    }
}

impl Default for Cover {
    fn default() -> Self {
        Self::Covered
    }
}

/// End-of-game annotation, only ever set once the board is won or lost.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalMark {
    /// The mine that was opened.
    DetonatedMine,
    /// A mine the player never flagged.
    UnflaggedMine,
    /// A flag placed on a cell without a mine.
    MisflaggedSafe,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) cover: Cover,
    pub(crate) mine: bool,
    pub(crate) adjacent_mines: u8,
    pub(crate) terminal_mark: Option<TerminalMark>,
}

impl Cell {
    pub const fn cover(self) -> Cover {
        self.cover
    }

    pub const fn is_mine(self) -> bool {
        self.mine
    }

    /// Raw adjacency count, zero before mines are placed.
    pub const fn adjacent_mines(self) -> u8 {
        self.adjacent_mines
    }

    /// The number a player gets to see: only for revealed cells without a mine.
    pub const fn number(self) -> Option<u8> {
        if self.cover.is_revealed() && !self.mine {
            Some(self.adjacent_mines)
        } else {
            None
        }
    }

    pub const fn terminal_mark(self) -> Option<TerminalMark> {
        self.terminal_mark
    }
}
