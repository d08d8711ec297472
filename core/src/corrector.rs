//! Nearest-word correction over a dictionary.
//!
//! Each space-separated word is checked against the dictionary; unknown words
//! are replaced by the closest dictionary word under the keypad-aware
//! [`weighted_distance`](crate::distance::weighted_distance). Only words whose
//! length is within the configured tolerance are candidates.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::dictionary::Dictionary;
use crate::distance::{weighted_distance, EditCosts};
use crate::keymap::KeyMap;

/// Outcome of correcting a single word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Correction {
    /// Empty segment between consecutive spaces
    Blank,
    /// Word is in the dictionary
    Known { word: String },
    /// Replaced by the nearest dictionary word (title-cased)
    Replaced {
        original: String,
        replacement: String,
        distance: u32,
    },
    /// No dictionary word within the length band; kept as typed
    NoCandidate { word: String },
}

impl Correction {
    /// Text to put back into the sentence for this word.
    pub fn text(&self) -> &str {
        match self {
            Correction::Blank => "",
            Correction::Known { word } | Correction::NoCandidate { word } => word,
            Correction::Replaced { replacement, .. } => replacement,
        }
    }

    pub fn is_changed(&self) -> bool {
        matches!(self, Correction::Replaced { .. })
    }
}

/// Dictionary-backed word corrector with a per-word LRU cache.
pub struct WordCorrector {
    dictionary: Arc<Dictionary>,
    keymap: Arc<KeyMap>,
    costs: EditCosts,
    length_tolerance: usize,
    cache: RefCell<lru::LruCache<String, Correction>>,
    cache_hits: RefCell<usize>,
    cache_misses: RefCell<usize>,
}

impl WordCorrector {
    pub fn new(
        dictionary: Arc<Dictionary>,
        keymap: Arc<KeyMap>,
        costs: EditCosts,
        length_tolerance: usize,
        cache_size: usize,
    ) -> Self {
        let capacity = NonZeroUsize::new(cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            dictionary,
            keymap,
            costs,
            length_tolerance,
            cache: RefCell::new(lru::LruCache::new(capacity)),
            cache_hits: RefCell::new(0),
            cache_misses: RefCell::new(0),
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Correct a whole text.
    ///
    /// Words are split on single spaces (empty segments kept), corrected
    /// independently, re-joined with single spaces and the result is
    /// upper-cased.
    pub fn correct(&self, text: &str) -> String {
        Self::render(&self.correct_words(text))
    }

    /// Join per-word corrections back into upper-cased text.
    pub fn render(corrections: &[Correction]) -> String {
        corrections
            .iter()
            .map(Correction::text)
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase()
    }

    /// Per-word corrections for `text`, in order.
    pub fn correct_words(&self, text: &str) -> Vec<Correction> {
        text.split(' ').map(|w| self.correct_word(w)).collect()
    }

    /// Correct one word.
    pub fn correct_word(&self, word: &str) -> Correction {
        if word.is_empty() {
            return Correction::Blank;
        }

        if let Some(cached) = self.cache.borrow_mut().get(word) {
            *self.cache_hits.borrow_mut() += 1;
            return cached.clone();
        }
        *self.cache_misses.borrow_mut() += 1;

        let result = self.lookup(word);
        self.cache.borrow_mut().put(word.to_string(), result.clone());
        result
    }

    fn lookup(&self, word: &str) -> Correction {
        if self.dictionary.contains(word) {
            return Correction::Known {
                word: word.to_string(),
            };
        }

        let input = word.to_lowercase();
        let len = input.chars().count();

        // Equal distances fall back to comparing the words themselves.
        let best = self
            .dictionary
            .within_length(len, self.length_tolerance)
            .map(|cand| {
                let d = weighted_distance(&input, cand, &self.keymap, &self.costs);
                (d, cand)
            })
            .min();

        match best {
            Some((distance, cand)) => {
                tracing::debug!(word, replacement = cand, distance, "corrected word");
                Correction::Replaced {
                    original: word.to_string(),
                    replacement: title_case(cand),
                    distance,
                }
            }
            None => {
                tracing::debug!(word, "no dictionary word within length band");
                Correction::NoCandidate {
                    word: word.to_string(),
                }
            }
        }
    }

    /// (hits, misses) of the word cache since construction or last clear.
    pub fn cache_stats(&self) -> (usize, usize) {
        (*self.cache_hits.borrow(), *self.cache_misses.borrow())
    }

    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
        *self.cache_hits.borrow_mut() = 0;
        *self.cache_misses.borrow_mut() = 0;
    }
}

/// Upper-case the first character, keep the rest.
fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corrector(words: &[&str]) -> WordCorrector {
        WordCorrector::new(
            Arc::new(Dictionary::from_lines(words.iter().copied())),
            Arc::new(KeyMap::standard()),
            EditCosts::default(),
            1,
            16,
        )
    }

    #[test]
    fn known_word_passes_through() {
        let c = corrector(&["cat"]);
        assert_eq!(c.correct("cat"), "CAT");
        assert_eq!(
            c.correct_word("Cat"),
            Correction::Known {
                word: "Cat".to_string()
            }
        );
    }

    #[test]
    fn replacement_is_title_cased() {
        let c = corrector(&["cool"]);
        assert_eq!(
            c.correct_word("COO"),
            Correction::Replaced {
                original: "COO".to_string(),
                replacement: "Cool".to_string(),
                distance: 2,
            }
        );
    }

    #[test]
    fn candidates_outside_length_band_are_ignored() {
        let c = corrector(&["a", "hello"]);
        assert_eq!(
            c.correct_word("abc"),
            Correction::NoCandidate {
                word: "abc".to_string()
            }
        );
        assert_eq!(c.correct("abc"), "ABC");
    }

    #[test]
    fn ties_pick_lexicographically_smallest() {
        // "bat" and "cat" are both one same-key substitution from "aat"
        let c = corrector(&["cat", "bat"]);
        match c.correct_word("aat") {
            Correction::Replaced {
                replacement,
                distance,
                ..
            } => {
                assert_eq!(replacement, "Bat");
                assert_eq!(distance, 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn blank_segments_are_preserved() {
        let c = corrector(&["hi"]);
        assert_eq!(c.correct("hi  hi "), "HI  HI ");
        assert_eq!(c.correct_words("a  b").len(), 3);
    }

    #[test]
    fn cache_counts_hits_and_misses() {
        let c = corrector(&["cool"]);
        c.correct("coo coo coo");
        assert_eq!(c.cache_stats(), (2, 1));
        c.clear_cache();
        assert_eq!(c.cache_stats(), (0, 0));
    }

    #[test]
    fn empty_dictionary_keeps_words() {
        let c = corrector(&[]);
        assert_eq!(c.correct("hello world"), "HELLO WORLD");
    }
}
