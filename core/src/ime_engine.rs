//! Multi-tap engine with key routing and text buffer management.
//!
//! `MultiTapEngine` ties the decoder, the committed text buffer and the word
//! corrector together behind a `press()` entry point. Control keys (finalize,
//! delete, space) are handled directly; every other key goes through the
//! multi-tap decoder.
//!
//! The engine is single-threaded and clock-agnostic: `press_at` and `expire`
//! take the current instant explicitly. `Keypad` adds the real timer.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use std::time::Instant;

use crate::buffer::TextBuffer;
use crate::corrector::{Correction, WordCorrector};
use crate::decoder::{DecoderState, KeyDecoder};
use crate::dictionary::Dictionary;
use crate::error::Result;
use crate::keymap::KeyMap;
use crate::Config;

/// What a key does when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    /// Run word correction over the buffer
    Finalize,
    /// Remove the last committed character
    Delete,
    /// Append a space
    Space,
    /// Multi-tap letter key
    Tap,
}

/// Result of processing a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    /// Key was handled by the engine
    Handled,
    /// Key is not part of the layout; nothing changed
    NotHandled,
}

/// Multi-tap text entry engine.
pub struct MultiTapEngine {
    decoder: KeyDecoder,
    buffer: TextBuffer,
    corrector: WordCorrector,
    config: Config,
    /// Receivers of the full text after every change
    listeners: Vec<Sender<String>>,
}

impl MultiTapEngine {
    /// Create an engine from configuration and a loaded dictionary.
    pub fn new(config: Config, dictionary: Dictionary) -> Result<Self> {
        config.validate()?;

        let keymap = Arc::new(config.keymap());
        let decoder = KeyDecoder::new(Arc::clone(&keymap), config.commit_timeout());
        let corrector = WordCorrector::new(
            Arc::new(dictionary),
            keymap,
            config.edit_costs(),
            config.length_tolerance,
            config.max_cache_size,
        );

        Ok(Self {
            decoder,
            buffer: TextBuffer::new(),
            corrector,
            config,
            listeners: Vec::new(),
        })
    }

    /// Engine with the default configuration and the given dictionary.
    pub fn with_dictionary(dictionary: Dictionary) -> Result<Self> {
        Self::new(Config::default(), dictionary)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn keymap(&self) -> &KeyMap {
        self.decoder.keymap()
    }

    pub fn corrector(&self) -> &WordCorrector {
        &self.corrector
    }

    /// Committed text.
    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    /// Uncommitted character of the open key.
    pub fn pending(&self) -> Option<char> {
        self.decoder.pending()
    }

    /// Committed text followed by the pending character, as a display would show it.
    pub fn display_text(&self) -> String {
        let mut out = self.buffer.text().to_string();
        out.extend(self.decoder.pending());
        out
    }

    pub fn decoder_state(&self) -> DecoderState {
        self.decoder.state()
    }

    /// When the open key commits by itself, if a key is open.
    pub fn deadline(&self) -> Option<Instant> {
        self.decoder.deadline()
    }

    /// Receive the full text after every commit, delete, space and finalize.
    pub fn subscribe(&mut self) -> Receiver<String> {
        let (tx, rx) = unbounded();
        self.listeners.push(tx);
        rx
    }

    /// Role of `key` under the current configuration.
    pub fn key_role(&self, key: char) -> Option<KeyRole> {
        self.config.key_role(key).or_else(|| {
            self.decoder
                .keymap()
                .contains(key)
                .then_some(KeyRole::Tap)
        })
    }

    /// Process a key press at the current time.
    pub fn press(&mut self, key: char) -> KeyResult {
        self.press_at(key, Instant::now())
    }

    /// Process a key press at `now`.
    pub fn press_at(&mut self, key: char, now: Instant) -> KeyResult {
        match self.key_role(key) {
            Some(KeyRole::Finalize) => {
                self.finalize();
                KeyResult::Handled
            }
            Some(KeyRole::Delete) => {
                if self.buffer.delete_last().is_some() {
                    self.notify();
                }
                KeyResult::Handled
            }
            Some(KeyRole::Space) => {
                if self.buffer.push_space() {
                    self.notify();
                }
                KeyResult::Handled
            }
            Some(KeyRole::Tap) => match self.decoder.press(key, now) {
                Ok(committed) => {
                    self.append(committed);
                    KeyResult::Handled
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "key press failed");
                    KeyResult::NotHandled
                }
            },
            None => {
                tracing::debug!(key = %key, "ignoring key outside the layout");
                KeyResult::NotHandled
            }
        }
    }

    /// The commit timer fired: commit the open key, if any.
    pub fn on_timeout(&mut self) -> Option<char> {
        let committed = self.decoder.on_timeout();
        self.append(committed);
        committed
    }

    /// Commit the open key only if its deadline has passed at `now`.
    ///
    /// Timers that may fire late should call this instead of `on_timeout`,
    /// so a firing that raced with a newer press does nothing.
    pub fn expire(&mut self, now: Instant) -> Option<char> {
        let committed = self.decoder.expire(now);
        self.append(committed);
        committed
    }

    /// Commit the open key right away.
    pub fn force_commit(&mut self) -> Option<char> {
        let committed = self.decoder.force_commit();
        self.append(committed);
        committed
    }

    /// Correct every word of the buffer and replace it with the result.
    ///
    /// The decoder is left alone: an open key keeps cycling and commits onto
    /// the corrected text later. An empty buffer is left untouched.
    pub fn finalize(&mut self) -> Vec<Correction> {
        if self.buffer.is_empty() {
            return Vec::new();
        }

        let corrections = self.corrector.correct_words(self.buffer.text());
        let corrected = WordCorrector::render(&corrections);
        tracing::debug!(
            before = self.buffer.text(),
            after = %corrected,
            changed = corrections.iter().filter(|c| c.is_changed()).count(),
            "finalized text"
        );
        self.buffer.replace(corrected);
        self.notify();
        corrections
    }

    fn append(&mut self, committed: Option<char>) {
        if let Some(ch) = committed {
            self.buffer.push(ch);
            self.notify();
        }
    }

    fn notify(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let text = self.buffer.text().to_string();
        self.listeners.retain(|tx| tx.send(text.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn engine(words: &[&str]) -> MultiTapEngine {
        MultiTapEngine::with_dictionary(Dictionary::from_lines(words.iter().copied())).unwrap()
    }

    fn tap(e: &mut MultiTapEngine, keys: &str, at: Instant) {
        for k in keys.chars() {
            assert_eq!(e.press_at(k, at), KeyResult::Handled);
        }
    }

    #[test]
    fn control_keys_leave_decoder_alone() {
        let mut e = engine(&[]);
        let t = Instant::now();
        tap(&mut e, "2", t);
        e.press_at('0', t);
        e.press_at('*', t);
        assert_eq!(e.text(), "");
        assert_eq!(e.pending(), Some('A'));
        assert_eq!(e.decoder_state().open_key, Some('2'));
    }

    #[test]
    fn space_and_delete() {
        let mut e = engine(&[]);
        let t = Instant::now();
        tap(&mut e, "23", t);
        e.force_commit();
        assert_eq!(e.text(), "AD");
        e.press_at('0', t);
        assert_eq!(e.text(), "AD ");
        e.press_at('*', t);
        e.press_at('*', t);
        assert_eq!(e.text(), "A");
    }

    #[test]
    fn unknown_key_is_not_handled() {
        let mut e = engine(&[]);
        assert_eq!(e.press('x'), KeyResult::NotHandled);
        assert_eq!(e.key_role('x'), None);
        assert_eq!(e.key_role('5'), Some(KeyRole::Tap));
        assert_eq!(e.key_role('#'), Some(KeyRole::Finalize));
    }

    #[test]
    fn key_roles_route_presses() {
        let mut e = engine(&[]);
        assert_eq!(e.key_role('#'), Some(KeyRole::Finalize));
        assert_eq!(e.key_role('*'), Some(KeyRole::Delete));
        assert_eq!(e.key_role('0'), Some(KeyRole::Space));
        assert_eq!(e.key_role('7'), Some(KeyRole::Tap));
        assert_eq!(e.key_role('x'), None);

        let t0 = Instant::now();
        assert_eq!(e.press_at('7', t0), KeyResult::Handled);
        assert_eq!(e.press_at('x', t0), KeyResult::NotHandled);
        assert_eq!(e.decoder_state().open_key, Some('7'));
    }

    #[test]
    fn finalize_on_empty_buffer_is_noop() {
        let mut e = engine(&["cat"]);
        assert!(e.finalize().is_empty());
        assert_eq!(e.text(), "");
    }

    #[test]
    fn display_text_includes_pending() {
        let mut e = engine(&[]);
        let t = Instant::now();
        tap(&mut e, "44", t);
        assert_eq!(e.display_text(), "H");
        e.expire(t + Duration::from_secs(2));
        assert_eq!(e.display_text(), "H");
        assert_eq!(e.pending(), None);
    }

    #[test]
    fn subscribers_see_every_change() {
        let mut e = engine(&["hi"]);
        let rx = e.subscribe();
        let t = Instant::now();
        tap(&mut e, "44", t);
        e.force_commit();
        tap(&mut e, "444", t);
        e.force_commit();
        e.press_at('#', t);

        let seen: Vec<String> = rx.try_iter().collect();
        assert_eq!(seen, vec!["H", "HI", "HI"]);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut e = engine(&[]);
        drop(e.subscribe());
        e.force_commit();
        tap(&mut e, "2", Instant::now());
        e.force_commit();
        assert!(e.listeners.is_empty());
    }
}
