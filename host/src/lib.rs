//! Runs minesweep games for a presentation layer: board lifecycle, seeding and the once-per-second timer.

pub use config::*;
pub use error::*;
pub use session::*;
pub use shared::*;
pub use ticker::*;

mod config;
mod error;
mod session;
mod shared;
mod ticker;
