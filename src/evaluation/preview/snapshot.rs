use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result};

/// Point-in-time view of an evaluation run: the two headline multi-label
/// metrics plus everything else the evaluator reported, keyed by name.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub instances_seen: u64,
    pub subset_accuracy: f64,
    pub hamming_score: f64,
    pub seconds: f64,
    pub extras: BTreeMap<String, f64>,
}

impl Display for Snapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "seen={}, subset_acc={:.6}, hamming={:.6}, t={:.3}s",
            self.instances_seen, self.subset_accuracy, self.hamming_score, self.seconds
        )
    }
}
