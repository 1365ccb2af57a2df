//! Messages exchanged between a game host and whatever draws the board.
//!
//! The presentation side sends [`Command`]s and gets a [`Snapshot`] back after each one; both travel as JSON.

use minesweep_core::{Board, Cell, Cover, Difficulty, GameStatus, TerminalMark};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Replace the board with a fresh one of the named difficulty.
    NewGame { difficulty: String },
    Open { index: usize },
    ToggleFlag { index: usize },
    /// Fresh board with the current difficulty.
    Reset,
    /// One elapsed second, for hosts that drive the clock themselves.
    ///
    /// A host with its own background timer ignores it.
    Tick,
}

impl Command {
    pub fn from_json(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub cover: Cover,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mark: Option<TerminalMark>,
}

impl From<Cell> for CellView {
    fn from(cell: Cell) -> Self {
        Self {
            cover: cell.cover(),
            number: cell.number(),
            mark: cell.terminal_mark(),
        }
    }
}

/// Everything a renderer needs to draw one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub game_id: u64,
    pub difficulty: Difficulty,
    pub status: GameStatus,
    pub rows: u8,
    pub columns: u8,
    pub mine_count: u16,
    pub elapsed_seconds: u16,
    /// Mines minus flags, may be negative.
    pub mines_left: i32,
    /// Row-major, `rows * columns` long.
    pub cells: Vec<CellView>,
}

impl Snapshot {
    pub fn capture(game_id: u64, difficulty: Difficulty, board: &Board) -> Self {
        let (rows, columns) = board.size();
        Self {
            game_id,
            difficulty,
            status: board.status(),
            rows,
            columns,
            mine_count: board.total_mines(),
            elapsed_seconds: board.elapsed_secs(),
            mines_left: board.mines_left() as i32,
            cells: board.cells().map(CellView::from).collect(),
        }
    }

    /// The three-digit counter value: over-flagging shows as zero.
    pub fn mines_left_display(&self) -> u16 {
        self.mines_left.clamp(0, 999) as u16
    }

    pub fn from_json(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
