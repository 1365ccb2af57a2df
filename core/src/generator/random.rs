use alloc::vec::Vec;
use core::iter;
use ndarray::Array2;
use smallvec::SmallVec;

use super::*;

/// Uniformly random placement that keeps the first opened cell and all of its neighbours free of mines.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomMineGenerator {
    seed: u64,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// The opened cell followed by its in-bounds neighbours.
pub fn safety_zone(config: GameConfig, first_open: CellIndex) -> SmallVec<[Coord2; 9]> {
    let start = to_coords(first_open, config.columns);
    iter::once(start)
        .chain(NeighborIter::new(start, config.size()))
        .collect()
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, config: GameConfig, first_open: CellIndex) -> Result<MineLayout> {
        use rand::prelude::*;

        let safe_zone = safety_zone(config, first_open);
        let mut candidates: Vec<Coord2> = (0..config.rows)
            .flat_map(|row| (0..config.columns).map(move |column| (row, column)))
            .filter(|coords| !safe_zone.contains(coords))
            .collect();

        let wanted = usize::from(config.mines);
        if wanted > candidates.len() {
            return Err(GameError::TooManyMines {
                requested: config.mines,
                max: candidates.len().try_into().unwrap_or(CellCount::MAX),
            });
        }

        // partial Fisher-Yates: the shuffled prefix is a uniform sample without replacement
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let (chosen, _) = candidates.partial_shuffle(&mut rng, wanted);

        let mut mine_mask: Array2<bool> = Array2::default(nd_index(config.size()));
        for &coords in chosen.iter() {
            mine_mask[nd_index(coords)] = true;
        }

        let layout = MineLayout::from_mine_mask(mine_mask);
        log::debug!(
            "Placed {} mines on {:?} avoiding {:?} (seed {})",
            layout.mine_count(),
            config.size(),
            safe_zone,
            self.seed
        );
        Ok(layout)
    }
}
