// core/tests/tap_decoding.rs
//
// Integration tests for multi-tap decoding through the engine.
//
// Tests cover:
// - Cyclic tap selection and no commit before switch/timeout
// - Commit on key switch
// - Timeout commit and timeouts racing with newer presses
// - Delete / space edge cases
// - Custom layouts and control keys from configuration

use multitap_core::{Config, Dictionary, KeyResult, MultiTapEngine};
use std::time::{Duration, Instant};

const TIMEOUT: Duration = Duration::from_millis(1000);

fn engine() -> MultiTapEngine {
    MultiTapEngine::with_dictionary(Dictionary::new()).unwrap()
}

fn press_all(e: &mut MultiTapEngine, keys: &str, at: Instant) {
    for k in keys.chars() {
        e.press_at(k, at);
    }
}

#[test]
fn test_tap_index_wraps_around_cycle() {
    let t0 = Instant::now();
    for n in 1..=9 {
        let mut e = engine();
        press_all(&mut e, &"2".repeat(n), t0);
        assert_eq!(e.text(), "", "nothing commits while tapping ({} taps)", n);
        assert_eq!(e.pending(), Some(['A', 'B', 'C'][(n - 1) % 3]));
        assert_eq!(e.decoder_state().tap_index, (n - 1) % 3);
    }

    // four-letter key
    let mut e = engine();
    press_all(&mut e, "77777", t0);
    assert_eq!(e.pending(), Some('P'));
}

#[test]
fn test_switch_commits_previous_key() {
    let mut e = engine();
    let t0 = Instant::now();
    press_all(&mut e, "223", t0);

    assert_eq!(e.text(), "B");
    let state = e.decoder_state();
    assert_eq!(state.open_key, Some('3'));
    assert_eq!(state.tap_index, 0);
}

#[test]
fn test_timeout_commits() {
    let mut e = engine();
    let t0 = Instant::now();
    e.press_at('2', t0);

    assert_eq!(e.expire(t0 + TIMEOUT / 2), None);
    assert_eq!(e.expire(t0 + TIMEOUT), Some('A'));
    assert_eq!(e.text(), "A");
    assert!(e.decoder_state().is_idle());
}

#[test]
fn test_same_key_after_timeout_starts_new_letter() {
    let mut e = engine();
    let t0 = Instant::now();
    press_all(&mut e, "666", t0);
    e.expire(t0 + TIMEOUT);
    let t1 = t0 + TIMEOUT * 2;
    press_all(&mut e, "666", t1);
    e.expire(t1 + TIMEOUT);
    assert_eq!(e.text(), "OO");
}

#[test]
fn test_stale_timeout_does_not_commit() {
    let mut e = engine();
    let t0 = Instant::now();
    e.press_at('4', t0);
    // second tap just before the first deadline re-arms it
    e.press_at('4', t0 + Duration::from_millis(900));
    // the timer armed by the first tap fires late
    assert_eq!(e.expire(t0 + TIMEOUT), None);
    assert_eq!(e.pending(), Some('H'));
    assert_eq!(e.expire(t0 + Duration::from_millis(1900)), Some('H'));
    assert_eq!(e.text(), "H");
}

#[test]
fn test_on_timeout_is_unconditional_but_idempotent() {
    let mut e = engine();
    let t0 = Instant::now();
    e.press_at('5', t0);
    assert_eq!(e.on_timeout(), Some('J'));
    assert_eq!(e.on_timeout(), None);
    assert_eq!(e.text(), "J");
}

#[test]
fn test_delete_and_space_edges() {
    let t0 = Instant::now();

    let mut e = engine();
    e.press_at('*', t0);
    assert_eq!(e.text(), "");
    e.press_at('0', t0);
    assert_eq!(e.text(), "");

    press_all(&mut e, "23", t0);
    e.force_commit();
    assert_eq!(e.text(), "AD");
    e.press_at('*', t0);
    assert_eq!(e.text(), "A");
    e.press_at('0', t0);
    assert_eq!(e.text(), "A ");
}

#[test]
fn test_space_does_not_commit_open_key() {
    let mut e = engine();
    let t0 = Instant::now();
    press_all(&mut e, "2", t0);
    e.force_commit();
    press_all(&mut e, "3", t0);
    e.press_at('0', t0);
    // the space lands before the still-open D
    e.expire(t0 + TIMEOUT);
    assert_eq!(e.text(), "A D");
}

#[test]
fn test_unknown_keys_are_passed_through() {
    let mut e = engine();
    let t0 = Instant::now();
    e.press_at('2', t0);
    assert_eq!(e.press_at('x', t0), KeyResult::NotHandled);
    assert_eq!(e.pending(), Some('A'));
    assert_eq!(e.text(), "");
}

#[test]
fn test_custom_layout_and_control_keys() {
    let mut cfg = Config::default();
    cfg.layout = vec!["a=xyz".to_string(), "b=pq".to_string(), "-=-".to_string()];
    cfg.finalize_key = '!';
    cfg.delete_key = '-';
    cfg.space_key = '_';
    cfg.set_commit_timeout(Duration::from_millis(200));

    let mut e = MultiTapEngine::new(cfg, Dictionary::new()).unwrap();
    let t0 = Instant::now();
    press_all(&mut e, "aab", t0);
    assert_eq!(e.text(), "y");
    e.press_at('_', t0);
    e.expire(t0 + Duration::from_millis(200));
    assert_eq!(e.text(), "y p");
    e.press_at('-', t0);
    assert_eq!(e.text(), "y ");
    assert_eq!(e.press_at('2', t0), KeyResult::NotHandled);
}
