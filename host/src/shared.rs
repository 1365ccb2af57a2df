use minesweep_core::{Difficulty, MarkOutcome, RevealOutcome};
use minesweep_protocol::{Command, Snapshot};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use web_time::Duration;

use crate::*;

/// A [`Session`] whose timer ticks on its own.
///
/// Gestures and ticks go through the same mutex, so a tick never lands in the middle of a flood fill. The ticker
/// only runs between the first open and the end of the game.
///
/// The ticker slot is only changed with the session locked (session first, then ticker), and each ticker is bound
/// to the game it was started for. Replaced tickers are joined after the session lock is released, since their
/// thread may be waiting on it.
#[derive(Debug)]
pub struct SharedSession {
    session: Arc<Mutex<Session>>,
    ticker: Mutex<Option<Ticker>>,
    tick_interval: Duration,
}

impl SharedSession {
    pub fn new(config: SessionConfig) -> Result<Self> {
        let config = config.validate()?;
        let tick_interval = config.tick_interval();
        Ok(Self {
            session: Arc::new(Mutex::new(Session::new(config))),
            ticker: Mutex::new(None),
            tick_interval,
        })
    }

    /// Runs `f` with the session locked, gestures and ticks wait until it returns.
    pub fn with_session<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        f(&*lock(&self.session))
    }

    pub fn snapshot(&self) -> Snapshot {
        lock(&self.session).snapshot()
    }

    pub fn is_ticking(&self) -> bool {
        lock(&self.ticker)
            .as_ref()
            .is_some_and(Ticker::is_running)
    }

    /// Opens a cell, starting the timer on the first open and stopping it when the game ends.
    ///
    /// A ticker that fails to start is logged; the open itself still counts.
    pub fn open_cell(&self, index: usize) -> Result<RevealOutcome> {
        let mut session = lock(&self.session);
        let was_new = session.board().status().is_new();
        let outcome = session.open_cell(index)?;

        let retired = if was_new && session.board().status().is_active() {
            self.start_ticker(session.game_id())
        } else if outcome.is_final() {
            lock(&self.ticker).take()
        } else {
            None
        };
        drop(session);

        retire(retired);
        Ok(outcome)
    }

    pub fn toggle_flag(&self, index: usize) -> Result<MarkOutcome> {
        lock(&self.session).toggle_flag(index)
    }

    pub fn new_game(&self, difficulty: Difficulty) {
        let retired = {
            let mut session = lock(&self.session);
            session.new_game(difficulty);
            lock(&self.ticker).take()
        };
        retire(retired);
    }

    pub fn reset(&self) {
        let retired = {
            let mut session = lock(&self.session);
            session.reset();
            lock(&self.ticker).take()
        };
        retire(retired);
    }

    /// Like [`Session::apply`], except that [`Command::Tick`] is ignored: the background ticker owns the timer.
    pub fn apply(&self, command: Command) -> Result<Snapshot> {
        match command {
            Command::NewGame { difficulty } => self.new_game(difficulty.parse()?),
            Command::Open { index } => {
                self.open_cell(index)?;
            }
            Command::ToggleFlag { index } => {
                self.toggle_flag(index)?;
            }
            Command::Reset => self.reset(),
            Command::Tick => log::trace!("tick command ignored, timer runs in the background"),
        }
        Ok(self.snapshot())
    }

    /// Puts a ticker for `game_id` in the slot and hands back the one it replaces.
    ///
    /// Must be called with the session locked.
    fn start_ticker(&self, game_id: u64) -> Option<Ticker> {
        let session = Arc::downgrade(&self.session);
        let spawned = Ticker::spawn(self.tick_interval, move || tick(&session, game_id));
        install(&mut lock(&self.ticker), spawned, game_id)
    }
}

impl Drop for SharedSession {
    fn drop(&mut self) {
        retire(lock(&self.ticker).take());
    }
}

fn install(slot: &mut Option<Ticker>, spawned: Result<Ticker>, game_id: u64) -> Option<Ticker> {
    match spawned {
        Ok(ticker) => {
            log::debug!("ticker started for game {}", game_id);
            slot.replace(ticker)
        }
        Err(err) => {
            log::error!("game {} runs without a timer: {}", game_id, err);
            slot.take()
        }
    }
}

fn retire(ticker: Option<Ticker>) {
    if let Some(mut ticker) = ticker {
        ticker.stop();
        log::debug!("ticker stopped");
    }
}

/// Applies one tick to game `game_id`, returns whether the ticker should keep going.
fn tick(session: &Weak<Mutex<Session>>, game_id: u64) -> bool {
    let Some(shared) = session.upgrade() else {
        return false;
    };
    let mut session = lock(&shared);
    if session.game_id() != game_id {
        return false;
    }
    if session.tick() {
        log::trace!("tick {}s", session.board().elapsed_secs());
    }
    session.board().status().is_active()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        log::warn!("recovering poisoned lock");
        poisoned.into_inner()
    })
}
