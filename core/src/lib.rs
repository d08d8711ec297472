//! multitap-core
//!
//! Multi-tap keypad text entry with keypad-aware autocorrection.
//!
//! A phone keypad assigns several letters to each digit key; pressing a key
//! repeatedly within a timeout cycles through its letters. This crate decodes
//! such key presses into text and, on request, corrects every word of the
//! text against a dictionary using an edit distance that treats letters of
//! the same key as near misses.
//!
//! Public API:
//! - `KeyMap` - key -> tap-cycle characters, standard E.161 layout
//! - `KeyDecoder` - multi-tap state machine with commit deadline
//! - `TextBuffer` - committed text
//! - `Dictionary` - normalized word list with length buckets
//! - `weighted_distance` / `EditCosts` - keypad-aware edit distance
//! - `WordCorrector` / `Correction` - nearest-word correction
//! - `MultiTapEngine` - key routing, buffer, correction
//! - `Keypad` / `CommitTimer` - threaded driver with a live timer
//! - `Config` - configuration (TOML)
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod error;
pub use error::{Error, Result};

pub mod keymap;
pub use keymap::{standard_layout_rules, KeyMap, STANDARD_LAYOUT};

pub mod buffer;
pub use buffer::TextBuffer;

pub mod decoder;
pub use decoder::{DecoderState, KeyDecoder};

pub mod distance;
pub use distance::{weighted_distance, EditCosts};

pub mod dictionary;
pub use dictionary::Dictionary;

pub mod corrector;
pub use corrector::{Correction, WordCorrector};

pub mod ime_engine;
pub use ime_engine::{KeyResult, KeyRole, MultiTapEngine};

pub mod timer;
pub use timer::CommitTimer;

pub mod keypad;
pub use keypad::Keypad;

/// Generic configuration for multi-tap entry and correction.
///
/// Front-end crates flatten this into their own configuration and add
/// platform concerns (dictionary location, logging).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Key layout rules (e.g., "2=ABC"), in tap-cycle order
    pub layout: Vec<String>,

    // Control keys
    /// Runs word correction over the whole text
    pub finalize_key: char,
    /// Removes the last committed character
    pub delete_key: char,
    /// Appends a space
    pub space_key: char,

    /// Inactivity after the last tap before the character commits (ms)
    pub commit_timeout_ms: u64,

    // Correction costs
    /// Cost of inserting or deleting one character. Default: 2
    pub insert_delete_cost: u32,
    /// Substitution between letters of the same key. Default: 1
    pub same_key_cost: u32,
    /// Any other substitution. Default: 3
    pub mismatch_cost: u32,
    /// Candidates differ from the typed word by at most this many characters
    pub length_tolerance: usize,

    /// Maximum number of entries in the word -> correction cache
    pub max_cache_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        let costs = EditCosts::default();
        Self {
            layout: standard_layout_rules(),
            finalize_key: '#',
            delete_key: '*',
            space_key: '0',
            commit_timeout_ms: 1000,
            insert_delete_cost: costs.insert_delete,
            same_key_cost: costs.same_key,
            mismatch_cost: costs.mismatch,
            length_tolerance: 1,
            max_cache_size: 1000,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = self.to_toml_string()?;
        std::fs::write(path, content).map_err(|e| Error::io(path, e))
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check that the control keys are distinct and the layout is usable.
    pub fn validate(&self) -> Result<()> {
        let controls = [self.finalize_key, self.delete_key, self.space_key];
        if controls[0] == controls[1] || controls[0] == controls[2] || controls[1] == controls[2] {
            return Err(Error::InvalidConfig(format!(
                "control keys must be distinct, got finalize={:?} delete={:?} space={:?}",
                self.finalize_key, self.delete_key, self.space_key
            )));
        }
        if self.commit_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "commit_timeout_ms must be positive".to_string(),
            ));
        }
        let keymap = self.keymap();
        if keymap.iter().all(|(key, _)| controls.contains(&key)) {
            return Err(Error::InvalidConfig(
                "layout has no letter keys".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the key map described by `layout`.
    pub fn keymap(&self) -> KeyMap {
        KeyMap::from_rules(&self.layout)
    }

    /// What `key` does, if it is one of the control keys.
    ///
    /// Letter keys return `None`; whether they are mapped at all is a
    /// question for the key map.
    pub fn key_role(&self, key: char) -> Option<KeyRole> {
        if key == self.finalize_key {
            Some(KeyRole::Finalize)
        } else if key == self.delete_key {
            Some(KeyRole::Delete)
        } else if key == self.space_key {
            Some(KeyRole::Space)
        } else {
            None
        }
    }

    pub fn commit_timeout(&self) -> Duration {
        Duration::from_millis(self.commit_timeout_ms)
    }

    pub fn set_commit_timeout(&mut self, timeout: Duration) {
        self.commit_timeout_ms = u64::try_from(timeout.as_millis().max(1)).unwrap_or(u64::MAX);
    }

    pub fn edit_costs(&self) -> EditCosts {
        EditCosts {
            insert_delete: self.insert_delete_cost,
            same_key: self.same_key_cost,
            mismatch: self.mismatch_cost,
        }
    }
}

/// Utility helpers.
pub mod utils {
    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_string()
    }
}
