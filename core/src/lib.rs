#![no_std]

extern crate alloc;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use difficulty::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use tile::*;
pub use timer::*;
pub use types::*;

mod difficulty;
mod engine;
mod error;
mod generator;
mod tile;
mod timer;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: Coord,
    pub columns: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked((rows, columns): Coord2, mines: CellCount) -> Self {
        Self {
            rows,
            columns,
            mines,
        }
    }

    /// Validates a board shape so that any first click can get a mine-free neighbourhood.
    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        Self::new_unchecked(size, mines).validate()
    }

    /// Applies the checks of [`GameConfig::new`] to a config built some other way.
    pub fn validate(self) -> Result<Self> {
        let Self {
            rows,
            columns,
            mines,
        } = self;
        if rows == 0 || columns == 0 {
            return Err(GameError::InvalidDimensions);
        }
        if mines == 0 {
            return Err(GameError::NoMines);
        }
        let max = self.max_mines();
        if mines > max {
            log::warn!("Rejected {rows}x{columns} board with {mines} mines, at most {max} fit");
            return Err(GameError::TooManyMines {
                requested: mines,
                max,
            });
        }
        Ok(self)
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.columns)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.columns)
    }

    pub const fn safe_cell_count(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }

    /// Largest safety zone any first click can produce: the cell plus its neighbours.
    pub const fn max_safe_zone(&self) -> CellCount {
        let rows = if self.rows < 3 { self.rows } else { 3 };
        let columns = if self.columns < 3 { self.columns } else { 3 };
        mult(rows, columns)
    }

    pub const fn max_mines(&self) -> CellCount {
        self.total_cells().saturating_sub(self.max_safe_zone())
    }

    pub fn validate_index(&self, index: CellIndex) -> Result<CellIndex> {
        let total = usize::from(self.total_cells());
        if index < total {
            Ok(index)
        } else {
            Err(GameError::InvalidIndex { index, total })
        }
    }
}

/// Where the mines are on a board, independent of what the player has uncovered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX);
        Self {
            mine_mask,
            mine_count,
        }
    }

    pub fn from_mine_indices(size: Coord2, mine_indices: &[CellIndex]) -> Result<Self> {
        let config = GameConfig::new_unchecked(size, 0);
        let mut mine_mask: Array2<bool> = Array2::default(nd_index(size));

        for &index in mine_indices {
            let index = config.validate_index(index)?;
            mine_mask[nd_index(to_coords(index, size.1))] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn size(&self) -> Coord2 {
        let (rows, columns) = self.mine_mask.dim();
        (
            Coord::try_from(rows).unwrap_or(Coord::MAX),
            Coord::try_from(columns).unwrap_or(Coord::MAX),
        )
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    /// A preset has to match the board exactly and hold at least one mine.
    pub fn check_fits(&self, config: GameConfig) -> Result<()> {
        if self.size() != config.size() {
            return Err(GameError::InvalidDimensions);
        }
        if self.mine_count == 0 {
            return Err(GameError::NoMines);
        }
        if self.mine_count != config.mines {
            return Err(GameError::LayoutMismatch {
                layout_mines: self.mine_count,
                expected: config.mines,
            });
        }
        Ok(())
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.mine_mask
            .iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count() as u8
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, (row, column): Coord2) -> &Self::Output {
        &self.mine_mask[(row as usize, column as usize)]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Self::HitMine | Self::Won)
    }
}
