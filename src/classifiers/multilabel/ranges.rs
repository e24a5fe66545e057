use crate::core::instances::MultiLabelInstance;

/// Running per-attribute minimum and maximum, used to min-max normalize
/// features for distance computation.
///
/// Ranges start at `[0, 0]` and only ever widen; they are never retightened
/// when old instances leave the window. An exact re-scan would cost a full
/// window pass per step for a normalization that is approximate anyway.
pub(crate) struct AttributeRangeTracker {
    min: Vec<f64>,
    max: Vec<f64>,
}

impl AttributeRangeTracker {
    pub(crate) fn new(num_attributes: usize) -> AttributeRangeTracker {
        AttributeRangeTracker {
            min: vec![0.0; num_attributes],
            max: vec![0.0; num_attributes],
        }
    }

    pub(crate) fn observe(&mut self, instance: &MultiLabelInstance) {
        for i in 0..self.min.len() {
            let value = instance.input_value(i);
            if value < self.min[i] {
                self.min[i] = value;
            }
            if value > self.max[i] {
                self.max[i] = value;
            }
        }
    }

    pub(crate) fn span(&self, index: usize) -> f64 {
        self.max[index] - self.min[index]
    }

    /// Maps `value` into `[0, 1]` for attribute `index`. Callers must skip
    /// attributes whose [`span`] is zero.
    pub(crate) fn normalize(&self, index: usize, value: f64) -> f64 {
        (value - self.min[index]) / (self.max[index] - self.min[index])
    }
}
