//! Word list used by the corrector.
//!
//! Words are normalized (NFC, trimmed, lowercased) and deduplicated on
//! insert. They are kept in a sorted set for membership checks and
//! additionally bucketed by character length, since correction only ever
//! looks at words whose length is close to the input's.
//!
//! Sources:
//! - newline-delimited text (`load_text` / `from_lines`); a missing file is
//!   an empty dictionary, not an error
//! - bincode snapshots written by `save_bincode`

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::{Error, Result};
use crate::utils::normalize;

/// Read-only set of known words.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dictionary {
    words: BTreeSet<String>,
    /// char length -> words of that length, sorted
    by_len: BTreeMap<usize, Vec<String>>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from any iterator of lines. Blank lines are dropped.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: BTreeSet<String> = lines
            .into_iter()
            .map(|line| normalize(line.as_ref()).to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        let mut by_len: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        // BTreeSet iteration is sorted, so every bucket ends up sorted too.
        for w in &words {
            by_len.entry(w.chars().count()).or_default().push(w.clone());
        }

        Self { words, by_len }
    }

    /// Load a newline-delimited word list.
    ///
    /// A missing file yields an empty dictionary. Other I/O errors are
    /// returned.
    pub fn load_text<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let dict = Self::from_lines(content.lines());
                tracing::debug!(path = %path.display(), words = dict.len(), "loaded dictionary");
                Ok(dict)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "dictionary not found, continuing with an empty word list");
                Ok(Self::new())
            }
            Err(e) => Err(Error::io(path, e)),
        }
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    /// Words whose character length lies in `len - tolerance ..= len + tolerance`,
    /// in lexicographic order within each length.
    pub fn within_length(&self, len: usize, tolerance: usize) -> impl Iterator<Item = &str> {
        let lo = len.saturating_sub(tolerance);
        let hi = len.saturating_add(tolerance);
        self.by_len
            .range(lo..=hi)
            .flat_map(|(_, bucket)| bucket.iter().map(String::as_str))
    }

    /// All words in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Save a bincode snapshot.
    pub fn save_bincode<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        bincode::serialize_into(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Load a snapshot written by `save_bincode`.
    pub fn load_bincode<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let dict: Self = bincode::deserialize_from(BufReader::new(file))?;
        Ok(dict)
    }
}
