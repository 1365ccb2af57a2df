use minesweep_core::GameError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("Invalid session config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Tick interval must be at least one millisecond")]
    ZeroTickInterval,
    #[error("Could not start the ticker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HostError>;
