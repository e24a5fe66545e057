use crate::core::instances::MultiLabelInstance;
use crate::core::prediction::MultiLabelPrediction;
use crate::evaluation::Measurement;
use crate::evaluation::evaluators::PerformanceEvaluator;
use std::io::{Error, ErrorKind};

const DEFAULT_ALPHA: f64 = 0.995;

/// Prequential multi-label evaluator with exponential fading.
///
/// Every accumulated sum is decayed by `alpha` before each new example, so
/// recent examples dominate the reported metrics and old concepts fade out.
/// The faded example count `b` shares the same decay and serves as the
/// denominator for all example-based ratios.
///
/// Exposed metrics: subset accuracy, Hamming score, example-based
/// accuracy/precision/recall/F-measure, and micro- and macro-averaged
/// precision/recall/F-measure over per-label true/false positive and
/// false negative sums.
pub struct MultiLabelPrequentialEvaluator {
    alpha: f64,

    /// Label count, fixed by the first example observed.
    num_labels: usize,

    b: f64,
    sum_exact_match: f64,
    sum_hamming: f64,
    sum_tp: Vec<f64>,
    sum_fp: Vec<f64>,
    sum_fn: Vec<f64>,
    sum_example_precision: f64,
    sum_example_recall: f64,
    sum_example_accuracy: f64,
}

impl MultiLabelPrequentialEvaluator {
    pub fn new(alpha: f64) -> Result<MultiLabelPrequentialEvaluator, Error> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "alpha must lie in (0, 1]",
            ));
        }
        Ok(MultiLabelPrequentialEvaluator {
            alpha,
            num_labels: 0,
            b: 0.0,
            sum_exact_match: 0.0,
            sum_hamming: 0.0,
            sum_tp: Vec::new(),
            sum_fp: Vec::new(),
            sum_fn: Vec::new(),
            sum_example_precision: 0.0,
            sum_example_recall: 0.0,
            sum_example_accuracy: 0.0,
        })
    }

    /// Faded average over the faded example count; 0 before any example.
    fn faded(&self, sum: f64) -> f64 {
        if self.b > 0.0 { sum / self.b } else { 0.0 }
    }

    fn micro_ratio(numerators: &[f64], complements: &[f64]) -> f64 {
        let hits: f64 = numerators.iter().sum();
        let total: f64 = hits + complements.iter().sum::<f64>();
        if total > 0.0 { hits / total } else { 0.0 }
    }

    fn macro_ratio(&self, numerators: &[f64], complements: &[f64]) -> f64 {
        if self.num_labels == 0 {
            return 0.0;
        }
        let sum: f64 = (0..self.num_labels)
            .map(|j| {
                let denom = numerators[j] + complements[j];
                if denom == 0.0 { 0.0 } else { numerators[j] / denom }
            })
            .sum();
        sum / self.num_labels as f64
    }

    fn f_measure(precision: f64, recall: f64) -> f64 {
        if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        }
    }
}

impl Default for MultiLabelPrequentialEvaluator {
    fn default() -> MultiLabelPrequentialEvaluator {
        MultiLabelPrequentialEvaluator {
            alpha: DEFAULT_ALPHA,
            num_labels: 0,
            b: 0.0,
            sum_exact_match: 0.0,
            sum_hamming: 0.0,
            sum_tp: Vec::new(),
            sum_fp: Vec::new(),
            sum_fn: Vec::new(),
            sum_example_precision: 0.0,
            sum_example_recall: 0.0,
            sum_example_accuracy: 0.0,
        }
    }
}

impl PerformanceEvaluator for MultiLabelPrequentialEvaluator {
    fn reset(&mut self) {
        self.b = 0.0;
        self.sum_exact_match = 0.0;
        self.sum_hamming = 0.0;
        self.sum_tp = vec![0.0; self.num_labels];
        self.sum_fp = vec![0.0; self.num_labels];
        self.sum_fn = vec![0.0; self.num_labels];
        self.sum_example_precision = 0.0;
        self.sum_example_recall = 0.0;
        self.sum_example_accuracy = 0.0;
    }

    fn add_result(&mut self, example: &MultiLabelInstance, prediction: &MultiLabelPrediction) {
        if self.num_labels == 0 {
            self.num_labels = example.num_output_attributes();
            self.reset();
        }

        if prediction.num_output_attributes() < example.num_output_attributes() {
            eprintln!(
                "[WARNING] Only {} labels found! (Expecting {}) (Ignoring this prediction)",
                prediction.num_output_attributes(),
                example.num_output_attributes()
            );
            return;
        }

        let mut correct = 0usize;
        let mut cur_tp = 0.0;
        let mut cur_fp = 0.0;
        let mut cur_fn = 0.0;

        for j in 0..self.num_labels {
            let yp = u8::from(prediction.positive(j));
            let y_true = example.label(j);

            self.sum_tp[j] =
                self.sum_tp[j] * self.alpha + f64::from(u8::from(y_true == 1 && yp == 1));
            cur_tp += f64::from(u8::from(y_true == 1 && yp == 1));

            self.sum_fn[j] =
                self.sum_fn[j] * self.alpha + f64::from(u8::from(y_true == 1 && yp == 0));
            cur_fn += f64::from(u8::from(y_true == 1 && yp == 0));

            self.sum_fp[j] =
                self.sum_fp[j] * self.alpha + f64::from(u8::from(y_true == 0 && yp == 1));
            cur_fp += f64::from(u8::from(y_true == 0 && yp == 1));

            correct += usize::from(y_true == yp);
        }

        self.sum_hamming = self.sum_hamming * self.alpha + correct as f64 / self.num_labels as f64;
        self.sum_exact_match =
            self.sum_exact_match * self.alpha + f64::from(u8::from(correct == self.num_labels));

        // Example-based ratios only accumulate when their denominator is
        // nonzero, but they are still averaged over the shared count `b`.
        if cur_tp + cur_fp > 0.0 {
            self.sum_example_precision =
                self.sum_example_precision * self.alpha + cur_tp / (cur_tp + cur_fp);
        }
        if cur_tp + cur_fn > 0.0 {
            self.sum_example_recall =
                self.sum_example_recall * self.alpha + cur_tp / (cur_tp + cur_fn);
        }
        if cur_tp + cur_fn + cur_fp > 0.0 {
            self.sum_example_accuracy =
                self.sum_example_accuracy * self.alpha + cur_tp / (cur_tp + cur_fn + cur_fp);
        }

        self.b = self.alpha * self.b + 1.0;
    }

    fn performance(&self) -> Vec<Measurement> {
        let example_precision = self.faded(self.sum_example_precision);
        let example_recall = self.faded(self.sum_example_recall);
        let example_f = Self::f_measure(example_precision, example_recall);

        let micro_precision = Self::micro_ratio(&self.sum_tp, &self.sum_fp);
        let micro_recall = Self::micro_ratio(&self.sum_tp, &self.sum_fn);
        let micro_f = Self::f_measure(micro_precision, micro_recall);

        let macro_precision = self.macro_ratio(&self.sum_tp, &self.sum_fp);
        let macro_recall = self.macro_ratio(&self.sum_tp, &self.sum_fn);
        let macro_f = Self::f_measure(macro_precision, macro_recall);

        vec![
            Measurement::new("Subset Accuracy", self.faded(self.sum_exact_match)),
            Measurement::new("Hamming Score", self.faded(self.sum_hamming)),
            Measurement::new("Example-Based Accuracy", self.faded(self.sum_example_accuracy)),
            Measurement::new("Example-Based Precision", example_precision),
            Measurement::new("Example-Based Recall", example_recall),
            Measurement::new("Example-Based F-Measure", example_f),
            Measurement::new("Micro-Averaged Precision", micro_precision),
            Measurement::new("Micro-Averaged Recall", micro_recall),
            Measurement::new("Micro-Averaged F-Measure", micro_f),
            Measurement::new("Macro-Averaged Precision", macro_precision),
            Measurement::new("Macro-Averaged Recall", macro_recall),
            Measurement::new("Macro-Averaged F-Measure", macro_f),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::evaluators::PerformanceEvaluatorExt;
    use crate::testing::header_multilabel;

    fn example(labels: Vec<u8>) -> MultiLabelInstance {
        let header = header_multilabel(1, labels.len());
        MultiLabelInstance::dense(header, vec![0.0], labels).unwrap()
    }

    fn prediction(pairs: Vec<[f64; 2]>) -> MultiLabelPrediction {
        let mut p = MultiLabelPrediction::new(pairs.len());
        for (j, pair) in pairs.into_iter().enumerate() {
            p.set_votes(j, pair);
        }
        p
    }

    #[test]
    fn rejects_alpha_outside_unit_interval() {
        assert!(MultiLabelPrequentialEvaluator::new(0.0).is_err());
        assert!(MultiLabelPrequentialEvaluator::new(1.5).is_err());
        assert!(MultiLabelPrequentialEvaluator::new(1.0).is_ok());
    }

    #[test]
    fn empty_evaluator_reports_zeroes() {
        let evaluator = MultiLabelPrequentialEvaluator::default();
        for m in evaluator.performance() {
            assert_eq!(m.value, 0.0, "{}", m.name);
        }
    }

    #[test]
    fn perfect_prediction_scores_one_everywhere() {
        let mut evaluator = MultiLabelPrequentialEvaluator::default();
        evaluator.add_result(
            &example(vec![1, 0]),
            &prediction(vec![[0.0, 1.0], [1.0, 0.0]]),
        );
        for m in evaluator.performance() {
            let expected = if m.name.starts_with("Macro") {
                // Label 1 is negative everywhere, so its per-label ratios
                // contribute 0 to the macro average.
                0.5
            } else {
                1.0
            };
            assert!((m.value - expected).abs() < 1e-12, "{}: {}", m.name, m.value);
        }
    }

    #[test]
    fn half_right_prediction() {
        let mut evaluator = MultiLabelPrequentialEvaluator::default();
        // true [1, 0], predicted [1, 1]
        evaluator.add_result(
            &example(vec![1, 0]),
            &prediction(vec![[0.0, 1.0], [0.2, 0.8]]),
        );

        assert_eq!(evaluator.metric("Subset Accuracy"), Some(0.0));
        assert_eq!(evaluator.metric("Hamming Score"), Some(0.5));
        assert_eq!(evaluator.metric("Example-Based Precision"), Some(0.5));
        assert_eq!(evaluator.metric("Example-Based Recall"), Some(1.0));
        assert_eq!(evaluator.metric("Example-Based Accuracy"), Some(0.5));
        assert_eq!(evaluator.metric("Micro-Averaged Precision"), Some(0.5));
        assert_eq!(evaluator.metric("Micro-Averaged Recall"), Some(1.0));
        let f = evaluator.metric("Micro-Averaged F-Measure").unwrap();
        assert!((f - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn fading_weights_recent_examples_higher() {
        let mut evaluator = MultiLabelPrequentialEvaluator::new(0.5).unwrap();
        // first example entirely wrong, second entirely right
        evaluator.add_result(&example(vec![1]), &prediction(vec![[1.0, 0.0]]));
        evaluator.add_result(&example(vec![1]), &prediction(vec![[0.0, 1.0]]));

        // b = 0.5 · 1 + 1 = 1.5, exact-match sum = 0.5 · 0 + 1 = 1
        let subset = evaluator.metric("Subset Accuracy").unwrap();
        assert!((subset - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn short_predictions_are_skipped() {
        let mut evaluator = MultiLabelPrequentialEvaluator::default();
        evaluator.add_result(&example(vec![1, 1]), &prediction(vec![[0.0, 1.0], [0.0, 1.0]]));
        let before = evaluator.performance();

        evaluator.add_result(&example(vec![1, 1]), &prediction(vec![[0.0, 1.0]]));
        assert_eq!(evaluator.performance(), before);
    }

    #[test]
    fn reset_clears_accumulated_state() {
        let mut evaluator = MultiLabelPrequentialEvaluator::default();
        evaluator.add_result(&example(vec![1]), &prediction(vec![[0.0, 1.0]]));
        evaluator.reset();
        for m in evaluator.performance() {
            assert_eq!(m.value, 0.0, "{}", m.name);
        }
    }

    #[test]
    fn metric_lookup_by_name() {
        let mut evaluator = MultiLabelPrequentialEvaluator::default();
        evaluator.add_result(&example(vec![1]), &prediction(vec![[0.0, 1.0]]));
        let pairs = evaluator.metrics(["Hamming Score", "no such metric"]);
        assert_eq!(pairs[0].1, Some(1.0));
        assert_eq!(pairs[1].1, None);
    }
}
