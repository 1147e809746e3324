//! Shared handle for cancelling and polling a commit.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::CommitError;
use crate::types::{CommitProgress, CommitState};

/// Handle to cancel or observe an in-progress commit.
///
/// Clones share the same token and counters.
#[derive(Debug, Clone, Default)]
pub struct CommitHandle {
    cancel_flag: Arc<AtomicBool>,
    processed: Arc<AtomicUsize>,
    total: Arc<AtomicUsize>,
    state: Arc<Mutex<CommitState>>,
}

impl CommitHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    ///
    /// Takes effect at the next batch boundary; rows already committed stay
    /// committed.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> CommitState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn progress(&self) -> CommitProgress {
        CommitProgress {
            processed: self.processed.load(Ordering::SeqCst),
            total: self.total.load(Ordering::SeqCst),
        }
    }

    pub(crate) fn set_state(&self, state: CommitState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Move an idle handle to `Running`.
    ///
    /// The check and the transition happen under one lock, so two runs
    /// racing on the same handle cannot both start.
    pub(crate) fn start(&self, total: usize) -> Result<(), CommitError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state != CommitState::Idle {
            return Err(CommitError::HandleInUse {
                state: state.label().to_string(),
            });
        }
        self.total.store(total, Ordering::SeqCst);
        self.processed.store(0, Ordering::SeqCst);
        *state = CommitState::Running;
        Ok(())
    }

    pub(crate) fn advance(&self, rows: usize) -> CommitProgress {
        self.processed.fetch_add(rows, Ordering::SeqCst);
        self.progress()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let handle = CommitHandle::new();
        let observer = handle.clone();
        assert_eq!(observer.state(), CommitState::Idle);

        handle.start(10).unwrap();
        handle.advance(4);
        assert_eq!(observer.state(), CommitState::Running);
        assert_eq!(
            observer.progress(),
            CommitProgress {
                processed: 4,
                total: 10
            }
        );

        observer.cancel();
        assert!(handle.is_cancelled());
    }

    #[test]
    fn test_start_only_once() {
        let handle = CommitHandle::new();
        let racer = handle.clone();
        let joins: Vec<_> = [handle, racer]
            .into_iter()
            .map(|h| std::thread::spawn(move || h.start(5).is_ok()))
            .collect();
        let starts: Vec<bool> = joins.into_iter().map(|j| j.join().unwrap()).collect();
        assert_eq!(starts.iter().filter(|&&ok| ok).count(), 1);
    }
}
