/// Per-label vote pairs `[p(label = 0), p(label = 1)]` produced by a
/// multi-label classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiLabelPrediction {
    votes: Vec<[f64; 2]>,
}

impl MultiLabelPrediction {
    pub fn new(num_labels: usize) -> MultiLabelPrediction {
        MultiLabelPrediction {
            votes: vec![[0.0, 0.0]; num_labels],
        }
    }

    /// The vote pair a classifier falls back to when it has no evidence at
    /// all for a label (e.g. an empty neighborhood).
    pub fn neutral(num_labels: usize) -> MultiLabelPrediction {
        MultiLabelPrediction {
            votes: vec![[0.5, 0.5]; num_labels],
        }
    }

    pub fn num_output_attributes(&self) -> usize {
        self.votes.len()
    }

    pub fn set_votes(&mut self, label: usize, pair: [f64; 2]) {
        self.votes[label] = pair;
    }

    pub fn votes(&self, label: usize) -> [f64; 2] {
        self.votes[label]
    }

    pub fn vote(&self, label: usize, class: usize) -> f64 {
        self.votes[label][class]
    }

    /// A label counts as predicted positive when the positive vote is at
    /// least as large as the negative one.
    pub fn positive(&self, label: usize) -> bool {
        self.votes[label][1] >= self.votes[label][0]
    }
}
