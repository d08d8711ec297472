//! Thread-safe keypad driver with a live commit timer.
//!
//! `Keypad` shares a `MultiTapEngine` between the caller's thread and a
//! `CommitTimer` worker. Presses and timer firings both run under the same
//! mutex, so they never interleave. The timer is re-armed (or cancelled)
//! while the press still holds the lock, and a firing only commits through
//! `MultiTapEngine::expire`, which checks the deadline again: a firing that
//! lost the race against a newer press is a no-op.

use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::ime_engine::{KeyResult, MultiTapEngine};
use crate::timer::CommitTimer;

pub struct Keypad {
    engine: Arc<Mutex<MultiTapEngine>>,
    timer: CommitTimer,
}

impl Keypad {
    pub fn new(engine: MultiTapEngine) -> Result<Self> {
        let engine = Arc::new(Mutex::new(engine));
        let shared = Arc::clone(&engine);
        let timer = CommitTimer::spawn(move || {
            if let Some(ch) = shared.lock().expire(Instant::now()) {
                tracing::debug!(committed = %ch, "commit timeout elapsed");
            }
        })?;

        Ok(Self { engine, timer })
    }

    /// Press `key` now.
    pub fn press(&self, key: char) -> KeyResult {
        let mut engine = self.engine.lock();
        let result = engine.press(key);
        self.sync_timer(&engine);
        result
    }

    /// Commit the open key without waiting for the timer.
    pub fn force_commit(&self) -> Option<char> {
        let mut engine = self.engine.lock();
        let committed = engine.force_commit();
        self.sync_timer(&engine);
        committed
    }

    pub fn text(&self) -> String {
        self.engine.lock().text().to_string()
    }

    pub fn display_text(&self) -> String {
        self.engine.lock().display_text()
    }

    pub fn pending(&self) -> Option<char> {
        self.engine.lock().pending()
    }

    pub fn subscribe(&self) -> Receiver<String> {
        self.engine.lock().subscribe()
    }

    /// Run `f` with exclusive access to the engine.
    ///
    /// The timer is re-synchronised afterwards in case `f` changed the
    /// decoder state.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut MultiTapEngine) -> R) -> R {
        let mut engine = self.engine.lock();
        let out = f(&mut *engine);
        self.sync_timer(&engine);
        out
    }

    fn sync_timer(&self, engine: &MultiTapEngine) {
        match engine.deadline() {
            Some(deadline) => self.timer.arm(deadline),
            None => self.timer.cancel(),
        }
    }
}
