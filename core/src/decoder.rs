//! Multi-tap decoding state machine.
//!
//! The decoder resolves repeated presses of one key into a single character.
//! A key stays "open" while it is being tapped; the character under the tap
//! index is committed when a different key is pressed, when the commit
//! deadline passes, or when the caller forces it.
//!
//! The decoder does not own a buffer or a timer. Methods return the committed
//! character and the caller appends it; the deadline is reported so a
//! scheduler can arm its timer.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::keymap::KeyMap;

/// Open key, tap index and pending-commit deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderState {
    pub open_key: Option<char>,
    pub tap_index: usize,
    pub deadline: Option<Instant>,
}

impl DecoderState {
    pub fn is_idle(&self) -> bool {
        self.open_key.is_none()
    }

    fn clear(&mut self) {
        *self = DecoderState::default();
    }
}

/// Multi-tap decoder over a shared key map.
#[derive(Debug, Clone)]
pub struct KeyDecoder {
    keymap: Arc<KeyMap>,
    state: DecoderState,
    timeout: Duration,
}

impl KeyDecoder {
    pub fn new(keymap: Arc<KeyMap>, timeout: Duration) -> Self {
        Self {
            keymap,
            state: DecoderState::default(),
            timeout,
        }
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.state.deadline
    }

    /// The character the open key currently selects, not yet committed.
    pub fn pending(&self) -> Option<char> {
        let key = self.state.open_key?;
        self.keymap.char_at(key, self.state.tap_index)
    }

    /// Register a press of `key` at `now`.
    ///
    /// Returns the character committed by switching away from the previously
    /// open key, if any. Pressing the open key again advances its tap index
    /// cyclically and commits nothing. Every press restarts the deadline.
    pub fn press(&mut self, key: char, now: Instant) -> Result<Option<char>> {
        let cycle = self.keymap.cycle_len(key).ok_or(Error::UnknownKey(key))?;

        let committed = if self.state.open_key == Some(key) {
            self.state.tap_index = (self.state.tap_index + 1) % cycle;
            None
        } else {
            let prev = self.commit();
            self.state.open_key = Some(key);
            self.state.tap_index = 0;
            prev
        };

        self.state.deadline = Some(now + self.timeout);
        tracing::trace!(
            key = %key,
            tap = self.state.tap_index,
            committed = ?committed,
            "multi-tap press"
        );
        Ok(committed)
    }

    /// Commit unconditionally, as a timer firing does.
    pub fn on_timeout(&mut self) -> Option<char> {
        self.commit()
    }

    /// Commit only if the deadline has passed at `now`.
    pub fn expire(&mut self, now: Instant) -> Option<char> {
        match self.state.deadline {
            Some(deadline) if now >= deadline => self.commit(),
            _ => None,
        }
    }

    /// Commit the open key's character right away.
    pub fn force_commit(&mut self) -> Option<char> {
        self.commit()
    }

    fn commit(&mut self) -> Option<char> {
        let ch = self.pending();
        self.state.clear();
        ch
    }
}
