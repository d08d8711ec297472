//! Deterministic key scripts.
//!
//! A script is a list of whitespace-separated tokens. A token is either a
//! group of keys pressed back to back (`222`, `#`, `66*`) or a wait
//! (`w`, `wait`, `wait:1500`). Waits advance a virtual clock, by the commit
//! timeout unless a duration in milliseconds is given, and then let an
//! expired key commit. No real time passes, so replays are reproducible.
//!
//! Two key groups without a wait between them behave like uninterrupted
//! tapping: `22 2` is the same as `222`.

use multitap_core::{Correction, KeyResult, KeyRole, MultiTapEngine};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::time::{Duration, Instant};

static WAIT_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:w|wait)(?::(\d+))?$").expect("wait pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    /// Press every key of the group at the current virtual time
    Keys(String),
    /// Advance the clock; `None` means one full commit timeout
    Wait(Option<Duration>),
}

/// One entry per script step, recorded after the step ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptEvent {
    pub step: String,
    pub text: String,
    pub pending: Option<char>,
    /// Keys the engine did not handle
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignored: Vec<char>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    pub events: Vec<ScriptEvent>,
    /// Committed text at the end of the script
    pub text: String,
    /// Key still open at the end of the script
    pub pending: Option<char>,
    /// Per-word results of the last finalize key, if any
    pub corrections: Vec<Correction>,
}

/// Split tokens into script steps.
///
/// A wait whose duration does not fit in `u64` milliseconds waits forever,
/// which commits any open key.
pub fn parse_script<S: AsRef<str>>(tokens: &[S]) -> Vec<ScriptStep> {
    tokens
        .iter()
        .flat_map(|t| t.as_ref().split_whitespace())
        .map(parse_token)
        .collect()
}

fn parse_token(token: &str) -> ScriptStep {
    let Some(caps) = WAIT_TOKEN.captures(token) else {
        return ScriptStep::Keys(token.to_string());
    };
    let Some(ms) = caps.get(1) else {
        return ScriptStep::Wait(None);
    };
    match ms.as_str().parse::<u64>() {
        Ok(ms) => ScriptStep::Wait(Some(Duration::from_millis(ms))),
        Err(e) => {
            tracing::warn!(token, error = %e, "wait duration out of range, waiting forever");
            ScriptStep::Wait(Some(Duration::MAX))
        }
    }
}

/// Replay `steps` against `engine` on a virtual clock.
///
/// When `flush` is set the open key, if any, is committed after the last
/// step.
pub fn run_script(engine: &mut MultiTapEngine, steps: &[ScriptStep], flush: bool) -> Transcript {
    let timeout = engine.config().commit_timeout();
    let mut now = Instant::now();
    let mut events = Vec::with_capacity(steps.len());
    let mut corrections = Vec::new();

    for step in steps {
        let mut ignored = Vec::new();
        let label = match step {
            ScriptStep::Keys(keys) => {
                for key in keys.chars() {
                    // Finalize directly so the per-word results can be reported.
                    if engine.key_role(key) == Some(KeyRole::Finalize) {
                        corrections = engine.finalize();
                        continue;
                    }
                    if engine.press_at(key, now) == KeyResult::NotHandled {
                        ignored.push(key);
                    }
                }
                keys.clone()
            }
            ScriptStep::Wait(duration) => {
                let d = duration.unwrap_or(timeout);
                match now.checked_add(d) {
                    Some(later) => {
                        now = later;
                        engine.expire(now);
                    }
                    // Past the end of the clock every deadline has expired.
                    None => {
                        engine.force_commit();
                    }
                }
                format!("wait:{}", d.as_millis())
            }
        };

        tracing::trace!(step = %label, text = engine.text(), "script step");
        events.push(ScriptEvent {
            step: label,
            text: engine.text().to_string(),
            pending: engine.pending(),
            ignored,
        });
    }

    if flush {
        engine.force_commit();
    }

    Transcript {
        events,
        text: engine.text().to_string(),
        pending: engine.pending(),
        corrections,
    }
}
