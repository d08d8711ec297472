//! phonepad
//!
//! Phone keypad front end for `multitap-core`: configuration with a
//! dictionary location, engine factories, deterministic key scripts and
//! logging setup for the `phonepad` binary.

use anyhow::Context;
use std::path::Path;

pub use multitap_core::{
    Config, Correction, Dictionary, KeyResult, KeyRole, Keypad, MultiTapEngine,
};

mod config;
pub use config::PhoneConfig;

pub mod logging;
pub mod script;

pub use script::{parse_script, run_script, ScriptEvent, ScriptStep, Transcript};

/// Load a word list.
///
/// Files ending in `.bin` are bincode snapshots written by
/// `Dictionary::save_bincode`; anything else is read as newline-delimited
/// text. A missing text file yields an empty dictionary.
pub fn load_dictionary<P: AsRef<Path>>(path: P) -> anyhow::Result<Dictionary> {
    let path = path.as_ref();
    let is_snapshot = path.extension().is_some_and(|ext| ext == "bin");
    let dictionary = if is_snapshot {
        Dictionary::load_bincode(path)
    } else {
        Dictionary::load_text(path)
    }
    .with_context(|| format!("failed to load dictionary {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        words = dictionary.len(),
        snapshot = is_snapshot,
        "loaded dictionary"
    );
    Ok(dictionary)
}

/// Build an engine from a phone configuration, loading its dictionary.
pub fn create_engine(config: &PhoneConfig) -> anyhow::Result<MultiTapEngine> {
    let dictionary = load_dictionary(&config.dictionary)?;
    create_engine_with(config, dictionary)
}

/// Build an engine from a phone configuration and an already loaded dictionary.
pub fn create_engine_with(
    config: &PhoneConfig,
    dictionary: Dictionary,
) -> anyhow::Result<MultiTapEngine> {
    MultiTapEngine::new(config.base().clone(), dictionary).context("invalid keypad configuration")
}

/// Build a threaded keypad with a live commit timer.
pub fn create_keypad(config: &PhoneConfig) -> anyhow::Result<Keypad> {
    let engine = create_engine(config)?;
    Keypad::new(engine).context("failed to start the commit timer")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_dictionary_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("words.txt");
        std::fs::write(&text, "cool\nbook\n").unwrap();
        let from_text = load_dictionary(&text).unwrap();
        assert_eq!(from_text.len(), 2);

        let snapshot = dir.path().join("words.bin");
        from_text.save_bincode(&snapshot).unwrap();
        assert_eq!(load_dictionary(&snapshot).unwrap(), from_text);
    }

    #[test]
    fn missing_text_dictionary_is_empty_but_missing_snapshot_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_dictionary(dir.path().join("absent.txt"))
            .unwrap()
            .is_empty());
        assert!(load_dictionary(dir.path().join("absent.bin")).is_err());
    }

    #[test]
    fn create_engine_rejects_bad_config() {
        let mut config = PhoneConfig::default();
        config.base_mut().space_key = '#';
        assert!(create_engine_with(&config, Dictionary::new()).is_err());
    }
}
