//! Keypad-aware weighted edit distance.
//!
//! A Levenshtein variant tuned for multi-tap typos: over- or under-tapping a
//! key lands on a neighbour in the same cycle, so substituting two letters of
//! one key is cheap, unrelated substitutions are expensive, and inserting or
//! deleting a character sits in between.

use serde::{Deserialize, Serialize};

use crate::keymap::{fold, KeyMap};

/// Edit costs used by [`weighted_distance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditCosts {
    /// Cost of inserting or deleting one character
    pub insert_delete: u32,
    /// Substitution between two characters of the same key
    pub same_key: u32,
    /// Any other substitution
    pub mismatch: u32,
}

impl Default for EditCosts {
    fn default() -> Self {
        Self {
            insert_delete: 2,
            same_key: 1,
            mismatch: 3,
        }
    }
}

impl EditCosts {
    /// Cost of replacing `a` with `b`.
    pub fn substitution(&self, keymap: &KeyMap, a: char, b: char) -> u32 {
        if fold(a) == fold(b) {
            0
        } else if keymap.same_key(a, b) {
            self.same_key
        } else {
            self.mismatch
        }
    }
}

/// Weighted edit distance between `input` and `target`.
///
/// Classic dynamic programme over `(len(input)+1) x (len(target)+1)` cells,
/// kept to two rows. Empty operands cost `insert_delete` per character of the
/// other string. The result is symmetric in its arguments. Sums saturate at
/// `u32::MAX`, so oversized costs rank candidates as unreachable.
pub fn weighted_distance(input: &str, target: &str, keymap: &KeyMap, costs: &EditCosts) -> u32 {
    let a: Vec<char> = input.chars().collect();
    let b: Vec<char> = target.chars().collect();
    let step = costs.insert_delete;

    let mut prev: Vec<u32> = (0..=b.len() as u32).map(|j| j.saturating_mul(step)).collect();
    let mut curr = vec![0u32; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = (i as u32 + 1).saturating_mul(step);
        for (j, &cb) in b.iter().enumerate() {
            let sub = prev[j].saturating_add(costs.substitution(keymap, ca, cb));
            let del = prev[j + 1].saturating_add(step);
            let ins = curr[j].saturating_add(step);
            curr[j + 1] = sub.min(del).min(ins);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
