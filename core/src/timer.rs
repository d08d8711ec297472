//! Single-shot commit timer running on its own thread.
//!
//! The worker waits on a command channel with the armed deadline as its
//! receive deadline. Arming replaces the previous deadline, cancelling
//! disarms, and dropping the timer shuts the worker down and joins it.

use crossbeam_channel::{unbounded, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Instant;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy)]
enum TimerCommand {
    Arm(Instant),
    Cancel,
}

/// Cancellable single-shot timer that calls `on_fire` when a deadline passes.
pub struct CommitTimer {
    tx: Option<Sender<TimerCommand>>,
    worker: Option<JoinHandle<()>>,
}

impl CommitTimer {
    /// Start the worker thread.
    ///
    /// `on_fire` runs on the worker thread, at most once per armed deadline.
    pub fn spawn<F>(mut on_fire: F) -> Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (tx, rx) = unbounded::<TimerCommand>();

        let worker = std::thread::Builder::new()
            .name("multitap-commit-timer".to_string())
            .spawn(move || {
                let mut armed: Option<Instant> = None;
                loop {
                    let msg = match armed {
                        Some(deadline) => rx.recv_deadline(deadline),
                        None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
                    };
                    match msg {
                        Ok(TimerCommand::Arm(deadline)) => armed = Some(deadline),
                        Ok(TimerCommand::Cancel) => armed = None,
                        Err(RecvTimeoutError::Timeout) => {
                            armed = None;
                            on_fire();
                        }
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                tracing::trace!("commit timer stopped");
            })
            .map_err(Error::Spawn)?;

        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
        })
    }

    /// Fire at `deadline`, replacing any pending deadline.
    pub fn arm(&self, deadline: Instant) {
        self.send(TimerCommand::Arm(deadline));
    }

    /// Disarm without firing.
    pub fn cancel(&self) {
        self.send(TimerCommand::Cancel);
    }

    fn send(&self, cmd: TimerCommand) {
        if let Some(tx) = &self.tx {
            if tx.send(cmd).is_err() {
                tracing::warn!(?cmd, "commit timer worker is gone");
            }
        }
    }
}

impl Drop for CommitTimer {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop.
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("commit timer worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use std::time::Duration;

    #[test]
    fn fires_once_after_deadline() {
        let (tx, rx) = bounded(4);
        let timer = CommitTimer::spawn(move || {
            let _ = tx.send(Instant::now());
        })
        .unwrap();

        let deadline = Instant::now() + Duration::from_millis(30);
        timer.arm(deadline);
        let fired = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(fired >= deadline);
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn cancel_prevents_firing() {
        let (tx, rx) = bounded(4);
        let timer = CommitTimer::spawn(move || {
            let _ = tx.send(());
        })
        .unwrap();

        timer.arm(Instant::now() + Duration::from_millis(200));
        timer.cancel();
        assert!(rx.recv_timeout(Duration::from_millis(400)).is_err());
    }

    #[test]
    fn rearm_replaces_deadline() {
        let (tx, rx) = bounded(4);
        let timer = CommitTimer::spawn(move || {
            let _ = tx.send(Instant::now());
        })
        .unwrap();

        let start = Instant::now();
        timer.arm(start + Duration::from_millis(50));
        let later = start + Duration::from_millis(250);
        timer.arm(later);
        let fired = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(fired >= later);
        assert!(rx.try_recv().is_err());
    }
}
