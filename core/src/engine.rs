use alloc::collections::VecDeque;
use core::num::Saturating;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// `New -> Active -> {Won, Lost}`, only a fresh board leaves a finished state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    New,
    Active,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_new(self) -> bool {
        matches!(self, Self::New)
    }

    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One game from the first click to a win or a loss.
///
/// Mines are only placed on the first [`Board::open_cell`], so the opened cell and its neighbours are always safe
/// (unless the board was built from a preset layout).
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    config: GameConfig,
    cells: Array2<Cell>,
    status: GameStatus,
    timer: Timer,
    mine_source: Option<MineSource>,
    flagged_count: Saturating<CellCount>,
}

impl Board {
    /// A board with randomly placed mines; `config` has to pass [`GameConfig::validate`].
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_source(config, MineSource::Random(RandomMineGenerator::new(seed)))
    }

    /// Catalog shapes are always valid.
    pub fn from_difficulty(difficulty: Difficulty, seed: u64) -> Self {
        Self::build(
            difficulty.config(),
            MineSource::Random(RandomMineGenerator::new(seed)),
        )
    }

    pub fn from_layout(layout: MineLayout) -> Result<Self> {
        let config = GameConfig::new_unchecked(layout.size(), layout.mine_count());
        Self::with_source(config, MineSource::Preset(layout))
    }

    /// Random sources need a valid config, presets have to match it exactly.
    pub fn with_source(config: GameConfig, mine_source: MineSource) -> Result<Self> {
        match &mine_source {
            MineSource::Random(_) => {
                config.validate()?;
            }
            MineSource::Preset(layout) => layout.check_fits(config)?,
        }
        Ok(Self::build(config, mine_source))
    }

    fn build(config: GameConfig, mine_source: MineSource) -> Self {
        Self {
            config,
            cells: Array2::default(nd_index(config.size())),
            status: GameStatus::New,
            timer: Timer::new(),
            mine_source: Some(mine_source),
            flagged_count: Saturating(0),
        }
    }

    /// Throws this game away and starts over with random mines on a board of the same shape.
    ///
    /// Fails, leaving the board alone, when the shape came from a preset too dense for random placement.
    pub fn reset(&mut self, seed: u64) -> Result<()> {
        let fresh = Self::new(self.config, seed)?;
        self.timer.stop();
        *self = fresh;
        log::debug!("board reset to {:?}", self.config.size());
        Ok(())
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn mines_placed(&self) -> bool {
        self.mine_source.is_none()
    }

    pub fn timer(&self) -> Timer {
        self.timer
    }

    pub fn elapsed_secs(&self) -> u16 {
        self.timer.elapsed_secs()
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count.0
    }

    /// Mines minus flags, negative when the player over-flags.
    pub fn mines_left(&self) -> isize {
        (self.config.mines as isize) - (self.flagged_count.0 as isize)
    }

    pub fn cell(&self, index: CellIndex) -> Result<Cell> {
        let index = self.config.validate_index(index)?;
        Ok(self.cell_at(to_coords(index, self.config.columns)))
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.cells[nd_index(coords)]
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    /// Neighbour indices of `index`, fewer than eight on edges and corners.
    pub fn neighbors(&self, index: CellIndex) -> Result<impl Iterator<Item = CellIndex> + use<>> {
        let index = self.config.validate_index(index)?;
        let columns = self.config.columns;
        Ok(NeighborIter::new(to_coords(index, columns), self.config.size())
            .map(move |coords| to_index(coords, columns)))
    }

    /// Distributes the mines around `first_open` and starts the game.
    ///
    /// Happens on its own with the first [`Board::open_cell`]; a second call is an error.
    pub fn place_mines(&mut self, first_open: CellIndex) -> Result<()> {
        let first_open = self.config.validate_index(first_open)?;
        let layout = self
            .mine_source
            .clone()
            .ok_or(GameError::MinesAlreadyPlaced)?
            .generate(self.config, first_open)?;
        self.mine_source = None;

        for ((row, column), cell) in self.cells.indexed_iter_mut() {
            let coords = (row as Coord, column as Coord);
            cell.mine = layout.contains_mine(coords);
            cell.adjacent_mines = if cell.mine {
                0
            } else {
                layout.adjacent_mine_count(coords)
            };
        }

        self.status = GameStatus::Active;
        self.timer.start();
        log::debug!(
            "game started at cell {} with {} mines",
            first_open,
            self.config.mines
        );
        Ok(())
    }

    /// Opens a cell, flood-filling through cells with no adjacent mines.
    ///
    /// Flagged or already revealed cells and finished games are left untouched.
    pub fn open_cell(&mut self, index: CellIndex) -> Result<RevealOutcome> {
        let index = self.config.validate_index(index)?;
        let coords = to_coords(index, self.config.columns);

        if self.status.is_finished() {
            return Ok(RevealOutcome::NoChange);
        }
        if matches!(self.cell_at(coords).cover, Cover::Flagged | Cover::Revealed) {
            return Ok(RevealOutcome::NoChange);
        }

        if self.status.is_new() {
            self.place_mines(index)?;
        }

        if self.cell_at(coords).mine {
            self.detonate(coords);
            return Ok(RevealOutcome::HitMine);
        }

        self.flood_reveal(coords);

        Ok(if self.evaluate() {
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        })
    }

    /// Rotates `Covered -> Flagged -> Questioned -> Covered`.
    pub fn toggle_flag(&mut self, index: CellIndex) -> Result<MarkOutcome> {
        let index = self.config.validate_index(index)?;
        let coords = to_coords(index, self.config.columns);

        if self.status.is_finished() {
            return Ok(MarkOutcome::NoChange);
        }

        let cell = &mut self.cells[nd_index(coords)];
        let Some(next) = cell.cover.cycled() else {
            return Ok(MarkOutcome::NoChange);
        };
        if next.is_flagged() {
            self.flagged_count += 1;
        } else if cell.cover.is_flagged() {
            self.flagged_count -= 1;
        }
        cell.cover = next;
        log::trace!("cell {} marked {:?}", index, next);

        self.evaluate();
        Ok(MarkOutcome::Changed)
    }

    /// Advances the elapsed counter, only while the game is running.
    pub fn tick(&mut self) -> bool {
        self.status.is_active() && self.timer.tick()
    }

    fn flood_reveal(&mut self, start: Coord2) {
        let mut visited: Array2<bool> = Array2::default(self.cells.raw_dim());
        let mut to_visit = VecDeque::from([start]);
        visited[nd_index(start)] = true;

        while let Some(coords) = to_visit.pop_front() {
            let cell = &mut self.cells[nd_index(coords)];
            cell.cover = Cover::Revealed;
            log::trace!("revealed {:?} with {} adjacent mines", coords, cell.adjacent_mines);

            if cell.adjacent_mines != 0 {
                continue;
            }

            for pos in self.cells.iter_neighbors(coords) {
                let neighbor = self.cells[nd_index(pos)];
                if visited[nd_index(pos)]
                    || neighbor.mine
                    || matches!(neighbor.cover, Cover::Flagged | Cover::Revealed)
                {
                    continue;
                }
                visited[nd_index(pos)] = true;
                to_visit.push_back(pos);
            }
        }
    }

    fn detonate(&mut self, coords: Coord2) {
        let cell = &mut self.cells[nd_index(coords)];
        cell.cover = Cover::Revealed;
        cell.terminal_mark = Some(TerminalMark::DetonatedMine);
        self.end_game(GameStatus::Lost);
    }

    /// Win check, returns whether this call ended the game.
    fn evaluate(&mut self) -> bool {
        if !self.status.is_active() {
            return false;
        }
        let cleared = self
            .cells
            .iter()
            .all(|cell| cell.mine || cell.cover.is_revealed());
        if cleared {
            self.end_game(GameStatus::Won);
        }
        cleared
    }

    fn end_game(&mut self, status: GameStatus) {
        self.status = status;
        self.timer.stop();

        for cell in self.cells.iter_mut() {
            match status {
                GameStatus::Won if cell.mine && !cell.cover.is_flagged() => {
                    cell.cover = Cover::Flagged;
                    self.flagged_count += 1;
                }
                GameStatus::Lost if cell.terminal_mark.is_none() => {
                    if cell.mine && !cell.cover.is_flagged() {
                        cell.terminal_mark = Some(TerminalMark::UnflaggedMine);
                    } else if !cell.mine && cell.cover.is_flagged() {
                        cell.terminal_mark = Some(TerminalMark::MisflaggedSafe);
                    }
                }
                _ => {}
            }
        }

        log::debug!(
            "game ended {:?} after {}s",
            status,
            self.timer.elapsed_secs()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn board(size: Coord2, mines: &[CellIndex]) -> Board {
        Board::from_layout(MineLayout::from_mine_indices(size, mines).unwrap()).unwrap()
    }

    fn covers(board: &Board) -> Vec<Cover> {
        board.cells().map(Cell::cover).collect()
    }

    #[test]
    fn first_open_places_mines_and_starts_timer() {
        let mut board = Board::from_difficulty(Difficulty::Beginner, 3);
        assert!(!board.mines_placed());

        let outcome = board.open_cell(40).unwrap();

        assert!(matches!(outcome, RevealOutcome::Revealed | RevealOutcome::Won));
        assert!(board.mines_placed());
        assert_eq!(board.cells().filter(|cell| cell.is_mine()).count(), 10);
        assert!(board.timer().is_running() || board.is_finished());
    }

    #[test]
    fn second_placement_is_rejected() {
        let mut board = Board::from_difficulty(Difficulty::Beginner, 3);
        board.place_mines(0).unwrap();
        assert_eq!(board.place_mines(0), Err(GameError::MinesAlreadyPlaced));
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let mut board = Board::from_difficulty(Difficulty::Beginner, 3);
        let err = GameError::InvalidIndex {
            index: 81,
            total: 81,
        };
        assert_eq!(board.open_cell(81), Err(err));
        assert_eq!(board.toggle_flag(81), Err(err));
        assert_eq!(board.status(), GameStatus::New);
    }

    #[test]
    fn hitting_a_mine_marks_the_board() {
        let mut board = board((3, 3), &[0, 2, 8]);
        board.toggle_flag(2).unwrap();
        board.toggle_flag(6).unwrap();

        assert_eq!(board.open_cell(0).unwrap(), RevealOutcome::HitMine);

        assert_eq!(board.status(), GameStatus::Lost);
        assert!(!board.timer().is_running());
        let cell = board.cell(0).unwrap();
        assert_eq!(cell.cover(), Cover::Revealed);
        assert_eq!(cell.terminal_mark(), Some(TerminalMark::DetonatedMine));
        assert_eq!(board.cell(2).unwrap().terminal_mark(), None);
        assert_eq!(
            board.cell(6).unwrap().terminal_mark(),
            Some(TerminalMark::MisflaggedSafe)
        );
        assert_eq!(
            board.cell(8).unwrap().terminal_mark(),
            Some(TerminalMark::UnflaggedMine)
        );
        assert_eq!(board.cell(4).unwrap().terminal_mark(), None);
    }

    #[test]
    fn flood_fill_opens_zero_region_and_wins() {
        let mut board = board((3, 3), &[8]);

        assert_eq!(board.open_cell(0).unwrap(), RevealOutcome::Won);

        assert_eq!(board.cell(0).unwrap().number(), Some(0));
        assert_eq!(board.cell(4).unwrap().number(), Some(1));
        // mines are flagged on a win
        assert_eq!(board.cell(8).unwrap().cover(), Cover::Flagged);
        assert_eq!(board.mines_left(), 0);
        assert!(board.cells().all(|cell| cell.terminal_mark().is_none()));
    }

    #[test]
    fn flags_block_the_flood() {
        let mut board = board((1, 5), &[4]);
        board.toggle_flag(2).unwrap();

        assert_eq!(board.open_cell(0).unwrap(), RevealOutcome::Revealed);
        assert_eq!(
            covers(&board),
            [
                Cover::Revealed,
                Cover::Revealed,
                Cover::Flagged,
                Cover::Covered,
                Cover::Covered
            ]
        );

        // flagged cells have to be unmarked before opening
        assert_eq!(board.open_cell(2).unwrap(), RevealOutcome::NoChange);
        board.toggle_flag(2).unwrap();
        board.toggle_flag(2).unwrap();
        assert_eq!(board.cell(2).unwrap().cover(), Cover::Covered);

        assert_eq!(board.open_cell(2).unwrap(), RevealOutcome::Won);
        assert_eq!(board.cell(3).unwrap().number(), Some(1));
    }

    #[test]
    fn flood_opens_questioned_cells() {
        let mut board = board((1, 5), &[4]);
        board.toggle_flag(1).unwrap();
        board.toggle_flag(1).unwrap();
        assert_eq!(board.cell(1).unwrap().cover(), Cover::Questioned);

        assert_eq!(board.open_cell(0).unwrap(), RevealOutcome::Won);
        assert_eq!(board.cell(1).unwrap().cover(), Cover::Revealed);
    }

    #[test]
    fn numbered_cell_does_not_propagate() {
        let mut board = board((1, 5), &[0]);
        board.place_mines(4).unwrap();

        assert_eq!(board.open_cell(1).unwrap(), RevealOutcome::Revealed);
        assert_eq!(
            covers(&board),
            [
                Cover::Covered,
                Cover::Revealed,
                Cover::Covered,
                Cover::Covered,
                Cover::Covered
            ]
        );
    }

    #[test]
    fn flag_cycle_is_a_three_cycle() {
        let mut board = board((3, 3), &[8]);
        let before = board.clone();

        assert_eq!(board.toggle_flag(4).unwrap(), MarkOutcome::Changed);
        assert_eq!(board.cell(4).unwrap().cover(), Cover::Flagged);
        assert_eq!(board.mines_left(), 0);
        board.toggle_flag(4).unwrap();
        assert_eq!(board.cell(4).unwrap().cover(), Cover::Questioned);
        assert_eq!(board.mines_left(), 1);
        board.toggle_flag(4).unwrap();

        assert_eq!(board, before);
    }

    #[test]
    fn revealed_cells_cannot_be_flagged() {
        let mut board = board((1, 6), &[0, 5]);
        assert_eq!(board.open_cell(1).unwrap(), RevealOutcome::Revealed);
        assert_eq!(board.toggle_flag(1).unwrap(), MarkOutcome::NoChange);
        assert_eq!(board.flagged_count(), 0);
    }

    #[test]
    fn mines_left_goes_negative() {
        let mut board = board((3, 3), &[8]);
        for index in [0, 1, 2] {
            board.toggle_flag(index).unwrap();
        }
        assert_eq!(board.mines_left(), -2);
    }

    #[test]
    fn flagged_first_click_does_not_start_the_game() {
        let mut board = Board::from_difficulty(Difficulty::Beginner, 1);
        board.toggle_flag(0).unwrap();
        assert_eq!(board.open_cell(0).unwrap(), RevealOutcome::NoChange);
        assert_eq!(board.status(), GameStatus::New);
        assert!(!board.mines_placed());
    }

    #[test]
    fn finished_board_ignores_gestures() {
        let mut board = board((3, 3), &[0, 8]);
        board.open_cell(4).unwrap();
        board.tick();
        board.tick();
        assert_eq!(board.open_cell(0).unwrap(), RevealOutcome::HitMine);
        let frozen = board.clone();

        assert_eq!(board.open_cell(1).unwrap(), RevealOutcome::NoChange);
        assert_eq!(board.toggle_flag(2).unwrap(), MarkOutcome::NoChange);
        assert!(!board.tick());

        assert_eq!(board, frozen);
        assert_eq!(board.elapsed_secs(), 2);
    }

    #[test]
    fn ticks_only_while_active() {
        let mut board = board((1, 5), &[4]);
        assert!(!board.tick());
        board.open_cell(3).unwrap();
        assert!(board.tick());
        assert_eq!(board.elapsed_secs(), 1);
        board.open_cell(0).unwrap();
        assert_eq!(board.status(), GameStatus::Won);
        assert!(!board.tick());
        assert_eq!(board.elapsed_secs(), 1);
    }

    #[test]
    fn reset_returns_to_a_fresh_board() {
        let mut board = Board::from_difficulty(Difficulty::Intermediate, 9);
        board.open_cell(100).unwrap();
        board.tick();
        board.toggle_flag(0).unwrap();

        board.reset(10).unwrap();

        assert_eq!(board.status(), GameStatus::New);
        assert_eq!(board.elapsed_secs(), 0);
        assert_eq!(board.mines_left(), 40);
        assert!(!board.mines_placed());
        assert!(board.cells().all(|cell| cell == Cell::default()));
    }

    #[test]
    fn overfull_configs_are_rejected_up_front() {
        assert_eq!(
            Board::new(GameConfig::new_unchecked((9, 9), 80), 1),
            Err(GameError::TooManyMines {
                requested: 80,
                max: 72
            })
        );
        assert_eq!(
            Board::new(GameConfig::new_unchecked((9, 9), 0), 1),
            Err(GameError::NoMines)
        );
        assert_eq!(
            Board::new(GameConfig::new_unchecked((0, 9), 5), 1),
            Err(GameError::InvalidDimensions)
        );

        let mut board = Board::new(GameConfig::new((9, 9), 72).unwrap(), 1).unwrap();
        assert_eq!(board.open_cell(40).unwrap(), RevealOutcome::Won);
        assert_eq!(board.total_mines(), 72);
        assert_eq!(board.cells().filter(|cell| cell.is_mine()).count(), 72);
    }

    #[test]
    fn presets_must_match_the_config() {
        let layout = MineLayout::from_mine_indices((3, 3), &[8]).unwrap();
        assert_eq!(
            Board::with_source(
                GameConfig::new_unchecked((3, 3), 2),
                MineSource::Preset(layout.clone())
            ),
            Err(GameError::LayoutMismatch {
                layout_mines: 1,
                expected: 2
            })
        );
        let empty = MineLayout::from_mine_indices((3, 3), &[]).unwrap();
        assert_eq!(Board::from_layout(empty), Err(GameError::NoMines));
        assert!(Board::from_layout(layout).is_ok());
    }

    #[test]
    fn dense_preset_shapes_cannot_be_reset_randomly() {
        let mut board = board((2, 2), &[0, 3]);
        board.toggle_flag(1).unwrap();
        let before = board.clone();
        assert!(matches!(
            board.reset(1),
            Err(GameError::TooManyMines { .. })
        ));
        assert_eq!(board, before);
    }

    #[test]
    fn random_boards_hold_placement_and_flood_properties() {
        let config = Difficulty::Beginner.config();
        for seed in 0..200u64 {
            let first = (seed * 7 % 81) as CellIndex;
            let mut board = Board::new(config, seed).unwrap();
            let outcome = board.open_cell(first).unwrap();
            assert_ne!(outcome, RevealOutcome::HitMine);

            let safe: Vec<_> = board.neighbors(first).unwrap().chain([first]).collect();
            for &index in &safe {
                assert!(!board.cell(index).unwrap().is_mine(), "seed {seed}");
            }

            for index in 0..81 {
                let cell = board.cell(index).unwrap();
                let neighbors: Vec<_> = board.neighbors(index).unwrap().collect();
                if !cell.is_mine() {
                    let expected = neighbors
                        .iter()
                        .filter(|&&n| board.cell(n).unwrap().is_mine())
                        .count();
                    assert_eq!(usize::from(cell.adjacent_mines()), expected);
                }
                if outcome == RevealOutcome::Won {
                    continue;
                }

                let revealed = |n: CellIndex| board.cell(n).unwrap().cover().is_revealed();
                if revealed(index) {
                    assert!(!cell.is_mine());
                    if cell.adjacent_mines() == 0 {
                        assert!(neighbors.iter().all(|&n| revealed(n)));
                    }
                    if index != first {
                        assert!(neighbors.iter().any(|&n| {
                            revealed(n) && board.cell(n).unwrap().adjacent_mines() == 0
                        }));
                    }
                }
            }
        }
    }
}
