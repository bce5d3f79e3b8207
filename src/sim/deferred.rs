//! Deferred work on the game thread
//!
//! Entries become due at a wall-clock time and run at the start of the first
//! tick at or after it. There is no cancellation: work queued before a phase
//! change still runs after it.

/// Work that runs later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Launch one object
    Spawn,
    /// Clear the combo banner if it is still the one with this serial
    ExpireComboMessage { serial: u32 },
}

/// Time-ordered queue of [`Deferred`] work
#[derive(Debug, Clone, Default)]
pub struct DeferredQueue {
    entries: Vec<(f64, Deferred)>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: f64, work: Deferred) {
        self.entries.push((due_ms, work));
    }

    /// Remove and return everything due at `now_ms`, earliest first.
    /// Entries due at the same time keep their scheduling order.
    pub fn take_due(&mut self, now_ms: f64) -> Vec<Deferred> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|(at, _)| *at <= now_ms);
        self.entries = pending;

        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.into_iter().map(|(_, work)| work).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
