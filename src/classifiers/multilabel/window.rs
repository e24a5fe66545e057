use crate::core::instances::MultiLabelInstance;
use std::collections::HashMap;

/// A window member: the stored instance plus the identity token it was
/// assigned at insertion. Identities keep duplicate-valued instances
/// distinguishable in the error map.
pub(crate) struct WindowEntry {
    pub(crate) id: u64,
    pub(crate) instance: MultiLabelInstance,
}

/// The ordered sequence of retained instances, oldest first.
pub(crate) struct WindowStore {
    entries: Vec<WindowEntry>,
    next_id: u64,
}

impl WindowStore {
    pub(crate) fn new(max_size: usize) -> WindowStore {
        WindowStore {
            entries: Vec::with_capacity(max_size),
            next_id: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn entries(&self) -> &[WindowEntry] {
        &self.entries
    }

    /// Stores `instance` at the back and returns its identity token.
    pub(crate) fn push(&mut self, instance: MultiLabelInstance) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(WindowEntry { id, instance });
        id
    }

    pub(crate) fn position_of(&self, id: u64) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> WindowEntry {
        self.entries.remove(index)
    }

    pub(crate) fn drain_front(&mut self, count: usize) -> Vec<WindowEntry> {
        self.entries.drain(..count).collect()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Accumulated wrong-label votes per window identity. Counts only grow
/// while an instance lives in the window; the record leaves with it.
#[derive(Default)]
pub(crate) struct ErrorTracker {
    counts: HashMap<u64, u32>,
}

impl ErrorTracker {
    pub(crate) fn new() -> ErrorTracker {
        ErrorTracker::default()
    }

    pub(crate) fn record_miss(&mut self, id: u64, count: u32) {
        *self.counts.entry(id).or_insert(0) += count;
    }

    /// Identities whose accumulated error exceeds `penalty × num_labels`.
    /// No ordering among equally-over-threshold instances.
    pub(crate) fn over_threshold(&self, penalty: f64, num_labels: usize) -> Vec<u64> {
        let threshold = penalty * num_labels as f64;
        self.counts
            .iter()
            .filter(|&(_, &count)| f64::from(count) > threshold)
            .map(|(&id, _)| id)
            .collect()
    }

    pub(crate) fn remove(&mut self, id: u64) {
        self.counts.remove(&id);
    }

    pub(crate) fn count(&self, id: u64) -> u32 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    pub(crate) fn clear(&mut self) {
        self.counts.clear();
    }
}
