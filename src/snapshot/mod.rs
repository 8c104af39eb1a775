// Snapshot management for reverse execution

pub mod state;

pub use state::{InputRequest, LogEntry, LoopFrame, OutputBuffer, RuntimeState};

/// Frozen copy of the runtime state at one point in history.
///
/// A snapshot owns its data outright and exposes it read-only, so nothing a
/// later step does can reach back into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    state: RuntimeState,
}

impl Snapshot {
    pub fn capture(state: &RuntimeState) -> Self {
        Snapshot {
            state: state.clone(),
        }
    }

    pub fn state(&self) -> &RuntimeState {
        &self.state
    }

    /// A fresh, independent copy to resume from
    pub fn restore(&self) -> RuntimeState {
        self.state.clone()
    }
}

/// Ordered stepping history; index `i` is the state before step `i + 1`
#[derive(Debug, Default)]
pub struct History {
    snapshots: Vec<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    /// Drop the newest snapshot and return the one before it.
    ///
    /// Refuses (returns `None`, history untouched) when fewer than two exist.
    pub fn rewind(&mut self) -> Option<&Snapshot> {
        if self.snapshots.len() < 2 {
            return None;
        }
        self.snapshots.pop();
        self.snapshots.last()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    /// Get the number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
