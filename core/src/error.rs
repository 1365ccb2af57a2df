use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cell index {index} is outside a board of {total} cells")]
    InvalidIndex { index: usize, total: usize },
    #[error("Board dimensions must be between 1 and 255")]
    InvalidDimensions,
    #[error("Too many mines, requested {requested} but at most {max} fit")]
    TooManyMines { requested: u16, max: u16 },
    #[error("A board needs at least one mine")]
    NoMines,
    #[error("Preset layout of {layout_mines} mines does not fit a board expecting {expected}")]
    LayoutMismatch { layout_mines: u16, expected: u16 },
    #[error("Unknown difficulty")]
    UnknownDifficulty,
    #[error("Mines were already placed on this board")]
    MinesAlreadyPlaced,
}

pub type Result<T> = core::result::Result<T, GameError>;
