//! Observable pipeline state.
//!
//! The store wraps a `watch` channel holding the latest [`PipelineSnapshot`]
//! and a generation counter. Every submit and every clear starts a new
//! generation; a write tagged with an older generation is dropped. Generation
//! bumps and guarded writes both happen under the channel's write lock, so a
//! superseded run can never interleave a write after its successor started.
//! The `notify` callbacks run under the same lock; they must not read the
//! store back.

use std::sync::atomic::{AtomicU64, Ordering};

use spectra_core::{AnalysisResults, PipelineState};
use tokio::sync::watch;

/// Everything a front end renders: run state, results and the attached file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineSnapshot {
    /// Phase and error message of the latest run.
    pub state: PipelineState,
    /// Result collections of the latest successful steps.
    pub results: AnalysisResults,
    /// Name of the uploaded document of the latest file run, if any.
    pub upload: Option<String>,
}

pub(crate) struct StateStore {
    tx: watch::Sender<PipelineSnapshot>,
    generation: AtomicU64,
}

impl StateStore {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(PipelineSnapshot::default());
        Self {
            tx,
            generation: AtomicU64::new(0),
        }
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<PipelineSnapshot> {
        self.tx.subscribe()
    }

    pub(crate) fn snapshot(&self) -> PipelineSnapshot {
        self.tx.borrow().clone()
    }

    /// Start a run: new generation, `Loading`, empty results.
    pub(crate) fn begin(&self, upload: Option<String>, notify: impl FnOnce()) -> u64 {
        let mut generation = 0;
        self.tx.send_modify(|s| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *s = PipelineSnapshot {
                state: PipelineState::loading(),
                results: AnalysisResults::default(),
                upload,
            };
            notify();
        });
        generation
    }

    /// Supersede any in-flight run and return to an empty `Idle` snapshot.
    pub(crate) fn reset(&self, notify: impl FnOnce()) {
        self.tx.send_modify(|s| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            *s = PipelineSnapshot::default();
            notify();
        });
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Apply `f` only while `generation` is current. Returns whether it ran.
    pub(crate) fn update(&self, generation: u64, f: impl FnOnce(&mut PipelineSnapshot)) -> bool {
        self.tx.send_if_modified(|s| {
            if self.is_current(generation) {
                f(s);
                true
            } else {
                false
            }
        })
    }

    pub(crate) fn finish(&self, generation: u64, state: PipelineState) -> bool {
        self.update(generation, |s| s.state = state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spectra_core::Phase;

    #[test]
    fn stale_generation_cannot_write() {
        let store = StateStore::new();
        let first = store.begin(None, || ());
        let second = store.begin(None, || ());
        assert!(!store.finish(first, PipelineState::error("late")));
        assert_eq!(store.snapshot().state.phase(), Phase::Loading);
        assert!(store.finish(second, PipelineState::success()));
        assert_eq!(store.snapshot().state.phase(), Phase::Success);
    }

    #[test]
    fn reset_supersedes_and_empties() {
        let store = StateStore::new();
        let g = store.begin(Some("data.json".into()), || ());
        let mut notified = false;
        store.reset(|| notified = true);
        assert!(notified);
        assert!(!store.is_current(g));
        assert_eq!(store.snapshot(), PipelineSnapshot::default());
    }

    #[test]
    fn stale_update_skips_side_effects() {
        let store = StateStore::new();
        let g = store.begin(None, || ());
        store.reset(|| ());
        let mut ran = false;
        assert!(!store.update(g, |_| ran = true));
        assert!(!ran);
    }
}
