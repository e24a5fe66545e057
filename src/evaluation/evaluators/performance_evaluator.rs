use crate::core::instances::MultiLabelInstance;
use crate::core::prediction::MultiLabelPrediction;
use crate::evaluation::Measurement;
use std::collections::HashMap;

/// Online evaluator of multi-label predictive performance.
///
/// A `PerformanceEvaluator` consumes ground-truth examples paired with the
/// per-label votes produced for them and exposes aggregated metrics via
/// [`performance`].
pub trait PerformanceEvaluator {
    /// Clears internal state/metrics (schema does not change).
    fn reset(&mut self);

    /// Feeds one labeled example and the prediction made for it.
    ///
    /// If the prediction is unusable (e.g. covers fewer labels than the
    /// example carries), the implementation may choose to skip the update.
    fn add_result(&mut self, example: &MultiLabelInstance, prediction: &MultiLabelPrediction);

    /// Returns a snapshot of current metrics.
    fn performance(&self) -> Vec<Measurement>;
}

pub trait PerformanceEvaluatorExt {
    /// Returns (name, Some(value)|None) for each requested metric, preserving order.
    fn metrics<'a, I>(&self, names: I) -> Vec<(String, Option<f64>)>
    where
        I: IntoIterator<Item = &'a str>;

    fn metric(&self, name: &str) -> Option<f64> {
        self.metrics([name]).into_iter().next().unwrap().1
    }
}

impl<T: PerformanceEvaluator + ?Sized> PerformanceEvaluatorExt for T {
    fn metrics<'a, I>(&self, names: I) -> Vec<(String, Option<f64>)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let ms = self.performance();
        let map: HashMap<_, _> = ms.into_iter().map(|m| (m.name, m.value)).collect();
        names
            .into_iter()
            .map(|n| (n.to_string(), map.get(n).copied()))
            .collect()
    }
}
