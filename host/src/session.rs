use minesweep_core::{Board, Difficulty, MarkOutcome, RevealOutcome};
use minesweep_protocol::{Command, Snapshot};

use crate::*;

/// The engine instance behind one visible game: the current board plus what is needed to replace it.
///
/// Not synchronised, see [`SharedSession`] for use with a ticking timer.
#[derive(Clone, Debug)]
pub struct Session {
    config: SessionConfig,
    difficulty: Difficulty,
    board: Board,
    game_id: u64,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let difficulty = config.difficulty;
        let seed = next_seed(&config, 1);
        Self {
            board: Board::from_difficulty(difficulty, seed),
            config,
            difficulty,
            game_id: 1,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Increments every time the board is replaced.
    pub fn game_id(&self) -> u64 {
        self.game_id
    }

    /// Starts over with `difficulty`, which also becomes the one used by [`Session::reset`].
    pub fn new_game(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.replace_board();
        log::debug!("game {} started as {}", self.game_id, difficulty);
    }

    pub fn reset(&mut self) {
        self.replace_board();
        log::debug!("game {} reset as {}", self.game_id, self.difficulty);
    }

    pub fn open_cell(&mut self, index: usize) -> Result<RevealOutcome> {
        Ok(self.board.open_cell(index)?)
    }

    pub fn toggle_flag(&mut self, index: usize) -> Result<MarkOutcome> {
        Ok(self.board.toggle_flag(index)?)
    }

    pub fn tick(&mut self) -> bool {
        self.board.tick()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.game_id, self.difficulty, &self.board)
    }

    pub fn apply(&mut self, command: Command) -> Result<Snapshot> {
        match command {
            Command::NewGame { difficulty } => self.new_game(difficulty.parse()?),
            Command::Open { index } => {
                let outcome = self.open_cell(index)?;
                if !outcome.has_update() {
                    log::trace!("open {} ignored", index);
                }
            }
            Command::ToggleFlag { index } => {
                if !self.toggle_flag(index)?.has_update() {
                    log::trace!("flag {} ignored", index);
                }
            }
            Command::Reset => self.reset(),
            Command::Tick => {
                self.tick();
            }
        }
        Ok(self.snapshot())
    }

    fn replace_board(&mut self) {
        self.game_id += 1;
        let seed = next_seed(&self.config, self.game_id);
        self.board = Board::from_difficulty(self.difficulty, seed);
    }
}

fn next_seed(config: &SessionConfig, game_id: u64) -> u64 {
    match config.seed {
        Some(seed) => seed.wrapping_add(game_id),
        None => rand::random(),
    }
}
