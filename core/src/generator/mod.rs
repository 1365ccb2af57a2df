use crate::*;
pub use random::*;

mod random;

/// Decides where the mines go once the first opened cell is known.
pub trait MineGenerator {
    fn generate(self, config: GameConfig, first_open: CellIndex) -> Result<MineLayout>;
}

/// A fixed layout is used as-is, the first click is not moved out of the way.
impl MineGenerator for MineLayout {
    fn generate(self, config: GameConfig, _first_open: CellIndex) -> Result<MineLayout> {
        self.check_fits(config)?;
        Ok(self)
    }
}

/// How a board will get its mines on the first open.
#[derive(Clone, Debug, PartialEq)]
pub enum MineSource {
    Random(RandomMineGenerator),
    Preset(MineLayout),
}

impl MineGenerator for MineSource {
    fn generate(self, config: GameConfig, first_open: CellIndex) -> Result<MineLayout> {
        match self {
            Self::Random(generator) => generator.generate(config, first_open),
            Self::Preset(layout) => layout.generate(config, first_open),
        }
    }
}
