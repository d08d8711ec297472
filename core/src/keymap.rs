//! Key layouts for multi-tap entry.
//!
//! A `KeyMap` assigns every key an ordered list of characters. Pressing the
//! same key repeatedly walks through that list; the order is the tap-cycle
//! order and never changes after construction.
use ahash::AHashMap;

/// The ITU-T E.161 letter assignment used by classic phone keypads.
///
/// Control keys (`*`, `0`, `#`) and `1` map to themselves.
pub const STANDARD_LAYOUT: &[(char, &str)] = &[
    ('1', "1"),
    ('2', "ABC"),
    ('3', "DEF"),
    ('4', "GHI"),
    ('5', "JKL"),
    ('6', "MNO"),
    ('7', "PQRS"),
    ('8', "TUV"),
    ('9', "WXYZ"),
    ('*', "*"),
    ('0', "0"),
    ('#', "#"),
];

/// Render the standard layout as `"key=chars"` rules, the format accepted by
/// [`KeyMap::from_rules`] and stored in `Config::layout`.
pub fn standard_layout_rules() -> Vec<String> {
    STANDARD_LAYOUT
        .iter()
        .map(|(key, chars)| format!("{}={}", key, chars))
        .collect()
}

/// Immutable mapping from key identifier to its tap-cycle characters.
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    /// Keys in declaration order, each with a non-empty character list
    keys: Vec<(char, Vec<char>)>,
    /// key -> index into `keys`
    index: AHashMap<char, usize>,
    /// upper-cased character -> keys whose list contains it
    owners: AHashMap<char, Vec<char>>,
}

impl KeyMap {
    /// The standard phone keypad layout.
    pub fn standard() -> Self {
        let mut km = KeyMap::default();
        for (key, chars) in STANDARD_LAYOUT {
            km.insert(*key, chars.chars().collect());
        }
        km
    }

    /// Build a key map from textual rules like `"2=ABC"`.
    ///
    /// The key is the single character left of `=`; the characters right of
    /// it (whitespace ignored) are the cycle. Malformed rules and rules with
    /// no characters are skipped. A later rule for the same key replaces the
    /// earlier one.
    pub fn from_rules(rules: &[String]) -> Self {
        let mut km = KeyMap::default();

        for rule in rules {
            let Some((key, chars)) = rule.split_once('=') else {
                tracing::warn!(rule = %rule, "skipping layout rule without '='");
                continue;
            };
            let mut key_chars = key.trim().chars();
            let (Some(key), None) = (key_chars.next(), key_chars.next()) else {
                tracing::warn!(rule = %rule, "skipping layout rule: key must be one character");
                continue;
            };
            let seq: Vec<char> = chars.chars().filter(|c| !c.is_whitespace()).collect();
            if seq.is_empty() {
                tracing::warn!(rule = %rule, "skipping layout rule with no characters");
                continue;
            }
            km.insert(key, seq);
        }

        km
    }

    fn insert(&mut self, key: char, seq: Vec<char>) {
        if let Some(&pos) = self.index.get(&key) {
            self.keys[pos].1 = seq;
        } else {
            self.index.insert(key, self.keys.len());
            self.keys.push((key, seq));
        }
        self.rebuild_owners();
    }

    fn rebuild_owners(&mut self) {
        self.owners.clear();
        for (key, seq) in &self.keys {
            for &c in seq {
                let owners = self.owners.entry(fold(c)).or_default();
                if !owners.contains(key) {
                    owners.push(*key);
                }
            }
        }
    }

    /// Characters cycled by `key`, or `None` if the key is not mapped.
    pub fn chars(&self, key: char) -> Option<&[char]> {
        self.index.get(&key).map(|&pos| self.keys[pos].1.as_slice())
    }

    /// Character selected after tapping `key` so that the tap index is `tap`.
    ///
    /// The index wraps around the cycle length.
    pub fn char_at(&self, key: char, tap: usize) -> Option<char> {
        let seq = self.chars(key)?;
        seq.get(tap % seq.len()).copied()
    }

    /// Number of characters in the cycle of `key`.
    pub fn cycle_len(&self, key: char) -> Option<usize> {
        self.chars(key).map(<[char]>::len)
    }

    pub fn contains(&self, key: char) -> bool {
        self.index.contains_key(&key)
    }

    /// Whether `a` and `b` are both reachable from one physical key.
    ///
    /// Comparison is case-insensitive.
    pub fn same_key(&self, a: char, b: char) -> bool {
        match (self.owners.get(&fold(a)), self.owners.get(&fold(b))) {
            (Some(ka), Some(kb)) => ka.iter().any(|k| kb.contains(k)),
            _ => false,
        }
    }

    /// Iterate keys in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &[char])> {
        self.keys.iter().map(|(k, seq)| (*k, seq.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Case-fold a single character to its upper-case form.
pub(crate) fn fold(c: char) -> char {
    c.to_uppercase().next().unwrap_or(c)
}
