use crate::classifiers::{ClassifierError, MultiLabelClassifier};
use crate::evaluation::{LearningCurve, PerformanceEvaluator, Snapshot};
use crate::streams::Stream;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Learner(#[from] ClassifierError),
}

/// Test-then-train evaluation loop: each instance is first used to score
/// the learner, then to train it, so every prediction is made on an
/// unseen example.
pub struct PrequentialEvaluator {
    learner: Box<dyn MultiLabelClassifier>,
    stream: Box<dyn Stream>,
    evaluator: Box<dyn PerformanceEvaluator>,

    curve: LearningCurve,

    max_instances: Option<u64>,
    max_seconds: Option<u64>,
    sample_frequency: u64,

    processed: u64,
    start_time: Instant,

    progress_tx: Option<Sender<Snapshot>>,
}

impl PrequentialEvaluator {
    pub fn new(
        mut learner: Box<dyn MultiLabelClassifier>,
        stream: Box<dyn Stream>,
        evaluator: Box<dyn PerformanceEvaluator>,
        max_instances: Option<u64>,
        max_seconds: Option<u64>,
        sample_frequency: u64,
    ) -> Result<Self, TaskError> {
        if sample_frequency == 0 {
            return Err(TaskError::InvalidParameter(
                "sample_frequency must be > 0".into(),
            ));
        }

        learner.set_model_context(Arc::clone(stream.header()))?;

        Ok(Self {
            learner,
            stream,
            evaluator,
            curve: LearningCurve::default(),
            max_instances,
            max_seconds,
            sample_frequency,
            processed: 0,
            start_time: Instant::now(),
            progress_tx: None,
        })
    }

    pub fn with_progress(mut self, tx: Sender<Snapshot>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn run(&mut self) -> Result<(), TaskError> {
        self.start_time = Instant::now();

        while self.stream.has_more_instances() {
            if let Some(n) = self.max_instances {
                if self.processed >= n {
                    break;
                }
            }
            if let Some(s) = self.max_seconds {
                if self.start_time.elapsed().as_secs() >= s {
                    break;
                }
            }
            let Some(instance) = self.stream.next_instance() else {
                break;
            };
            self.processed += 1;

            let prediction = self.learner.votes_for_instance(&instance)?;
            self.evaluator.add_result(&instance, &prediction);
            self.learner.train_on_instance(instance)?;

            if self.processed % self.sample_frequency == 0 {
                self.push_snapshot();
            }
        }

        self.push_snapshot();
        Ok(())
    }

    pub fn curve(&self) -> &LearningCurve {
        &self.curve
    }

    fn push_snapshot(&mut self) {
        let secs = self.start_time.elapsed().as_secs_f64();
        let perf = self.evaluator.performance();

        let mut subset_accuracy = f64::NAN;
        let mut hamming_score = f64::NAN;
        let mut extras = BTreeMap::new();

        for m in perf {
            match m.name.as_str() {
                "Subset Accuracy" => subset_accuracy = m.value,
                "Hamming Score" => hamming_score = m.value,
                _ => {
                    extras.insert(m.name, m.value);
                }
            }
        }

        let snapshot = Snapshot {
            instances_seen: self.processed,
            subset_accuracy,
            hamming_score,
            seconds: secs,
            extras,
        };

        if let Some(tx) = &self.progress_tx {
            let _ = tx.send(snapshot.clone());
        }

        self.curve.push(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::multilabel::{SamPunitiveKnn, SamPunitiveKnnOptions};
    use crate::evaluation::MultiLabelPrequentialEvaluator;
    use crate::testing::VecStream;

    fn constant_rows(n: usize) -> Vec<(Vec<f64>, Vec<u8>)> {
        (0..n).map(|_| (vec![1.0, 2.0], vec![1, 0])).collect()
    }

    fn knn() -> Box<dyn MultiLabelClassifier> {
        let options = SamPunitiveKnnOptions {
            k: 3,
            max_window_size: 50,
            min_window_size: 5,
            ..SamPunitiveKnnOptions::default()
        };
        Box::new(SamPunitiveKnn::new(options).unwrap())
    }

    fn evaluator() -> Box<dyn PerformanceEvaluator> {
        Box::new(MultiLabelPrequentialEvaluator::default())
    }

    #[test]
    fn ctor_rejects_zero_sample_frequency() {
        let stream: Box<dyn Stream> = Box::new(VecStream::new(constant_rows(10)));
        let err = PrequentialEvaluator::new(knn(), stream, evaluator(), None, None, 0)
            .err()
            .unwrap();
        assert!(matches!(err, TaskError::InvalidParameter(_)));
    }

    #[test]
    fn periodic_and_final_snapshots() {
        let stream: Box<dyn Stream> = Box::new(VecStream::new(constant_rows(100)));
        let mut pq =
            PrequentialEvaluator::new(knn(), stream, evaluator(), None, None, 10).unwrap();
        pq.run().unwrap();

        assert_eq!(pq.curve().len(), 11);
        let last = pq.curve().latest().unwrap();
        assert_eq!(last.instances_seen, 100);
        // Only the very first prediction (empty window) can miss.
        assert!(last.subset_accuracy > 0.95);
        assert!(last.hamming_score > 0.95);
        assert!(last.extras.contains_key("Micro-Averaged F-Measure"));
    }

    #[test]
    fn stops_at_max_instances() {
        let stream: Box<dyn Stream> = Box::new(VecStream::new(constant_rows(1000)));
        let mut pq =
            PrequentialEvaluator::new(knn(), stream, evaluator(), Some(25), None, 5).unwrap();
        pq.run().unwrap();

        assert_eq!(pq.curve().len(), 6);
        assert_eq!(pq.curve().latest().unwrap().instances_seen, 25);
    }

    #[test]
    fn stops_immediately_when_time_zero() {
        let stream: Box<dyn Stream> = Box::new(VecStream::new(constant_rows(100)));
        let mut pq =
            PrequentialEvaluator::new(knn(), stream, evaluator(), None, Some(0), 10).unwrap();
        pq.run().unwrap();

        assert_eq!(pq.curve().len(), 1);
        let last = pq.curve().latest().unwrap();
        assert_eq!(last.instances_seen, 0);
        assert_eq!(last.subset_accuracy, 0.0);
    }

    #[test]
    fn progress_channel_receives_every_snapshot() {
        let stream: Box<dyn Stream> = Box::new(VecStream::new(constant_rows(12)));
        let (tx, rx) = std::sync::mpsc::channel();
        let mut pq = PrequentialEvaluator::new(knn(), stream, evaluator(), None, None, 5)
            .unwrap()
            .with_progress(tx);
        pq.run().unwrap();

        let received: Vec<Snapshot> = rx.try_iter().collect();
        assert_eq!(received.len(), pq.curve().len());
        assert_eq!(received.last().unwrap().instances_seen, 12);
    }
}
