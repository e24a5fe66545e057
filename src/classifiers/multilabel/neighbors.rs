use super::ranges::AttributeRangeTracker;
use super::window::WindowEntry;
use crate::core::instances::{FeatureVector, MultiLabelInstance};
use crate::core::prediction::MultiLabelPrediction;
use std::ops::Range;

/// Euclidean distance between `a` and `b` over min-max normalized inputs.
/// Attributes whose observed range has not opened yet contribute nothing.
pub(crate) fn distance(
    a: &MultiLabelInstance,
    b: &MultiLabelInstance,
    ranges: &AttributeRangeTracker,
) -> f64 {
    let sum = match a.features() {
        FeatureVector::Dense(values) => {
            let mut sum = 0.0;
            for (i, &va) in values.iter().enumerate() {
                if ranges.span(i) == 0.0 {
                    continue;
                }
                let diff = ranges.normalize(i, va) - ranges.normalize(i, b.input_value(i));
                sum += diff * diff;
            }
            sum
        }
        FeatureVector::Sparse { .. } => sparse_sum(a.features(), b.features(), ranges),
    };
    sum.sqrt()
}

enum MergedEntry {
    Pair(f64, f64),
    Lone(f64),
}

/// Merge walk over two entry streams. Positions stored on both sides
/// contribute the squared difference of their normalized values; a
/// position stored on one side only contributes its normalized value
/// squared; positions stored on neither side drop out of the sum.
fn sparse_sum(a: &FeatureVector, b: &FeatureVector, ranges: &AttributeRangeTracker) -> f64 {
    let mut left = a.entries().peekable();
    let mut right = b.entries().peekable();
    let mut sum = 0.0;
    loop {
        let (index, entry) = match (left.peek(), right.peek()) {
            (Some(&(i, va)), Some(&(j, vb))) if i == j => {
                left.next();
                right.next();
                (i, MergedEntry::Pair(va, vb))
            }
            (Some(&(i, va)), Some(&(j, _))) if i < j => {
                left.next();
                (i, MergedEntry::Lone(va))
            }
            (Some(_), Some(&(j, vb))) => {
                right.next();
                (j, MergedEntry::Lone(vb))
            }
            (Some(&(i, va)), None) => {
                left.next();
                (i, MergedEntry::Lone(va))
            }
            (None, Some(&(j, vb))) => {
                right.next();
                (j, MergedEntry::Lone(vb))
            }
            (None, None) => break,
        };
        if ranges.span(index) == 0.0 {
            continue;
        }
        let diff = match entry {
            MergedEntry::Pair(va, vb) => {
                ranges.normalize(index, va) - ranges.normalize(index, vb)
            }
            MergedEntry::Lone(v) => ranges.normalize(index, v),
        };
        sum += diff * diff;
    }
    sum
}

/// Indices of the `k` smallest values within `range`, smallest first.
/// Ties resolve toward the lower index; when the range holds fewer than
/// `k` values, all of them are returned.
pub(crate) fn nearest_k(k: usize, values: &[f64], range: Range<usize>) -> Vec<usize> {
    let limit = k.min(range.len());
    let mut picked: Vec<usize> = Vec::with_capacity(limit);
    for _ in 0..limit {
        let mut best: Option<usize> = None;
        for i in range.clone() {
            if picked.contains(&i) {
                continue;
            }
            match best {
                Some(current) if values[i] >= values[current] => {}
                _ => best = Some(i),
            }
        }
        if let Some(index) = best {
            picked.push(index);
        }
    }
    picked
}

/// Per-label vote pairs from neighbor label frequencies. An empty
/// neighborhood yields the neutral prediction.
pub(crate) fn vote(
    neighbors: &[usize],
    window: &[WindowEntry],
    num_labels: usize,
) -> MultiLabelPrediction {
    if neighbors.is_empty() {
        return MultiLabelPrediction::neutral(num_labels);
    }
    let mut prediction = MultiLabelPrediction::new(num_labels);
    for label in 0..num_labels {
        let positives = neighbors
            .iter()
            .filter(|&&i| window[i].instance.label(label) == 1)
            .count();
        let frequency = positives as f64 / neighbors.len() as f64;
        prediction.set_votes(label, [1.0 - frequency, frequency]);
    }
    prediction
}
