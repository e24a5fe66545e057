use crate::core::instance_header::InstanceHeader;
use crate::core::instances::MultiLabelInstance;
use crate::core::prediction::MultiLabelPrediction;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The learner was asked to train or predict before receiving a header.
    #[error("no model context available")]
    MissingModelContext,

    #[error("invalid model context: {0}")]
    InvalidModelContext(&'static str),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// The instance does not match the configured header; the call is
    /// rejected without touching learner state.
    #[error(
        "instance shape mismatch: expected {expected_inputs} inputs / {expected_labels} labels, \
         got {got_inputs} / {got_labels}"
    )]
    ShapeMismatch {
        expected_inputs: usize,
        got_inputs: usize,
        expected_labels: usize,
        got_labels: usize,
    },
}

/// An online multi-label learner driven one instance at a time.
///
/// The model context must be set before the first call to
/// [`train_on_instance`] or [`votes_for_instance`]; both report
/// [`ClassifierError::MissingModelContext`] otherwise.
pub trait MultiLabelClassifier {
    fn set_model_context(&mut self, header: Arc<InstanceHeader>) -> Result<(), ClassifierError>;

    /// Produces per-label votes for `instance`. Implementations may update
    /// internal bookkeeping as a side effect of prediction.
    fn votes_for_instance(
        &mut self,
        instance: &MultiLabelInstance,
    ) -> Result<MultiLabelPrediction, ClassifierError>;

    fn train_on_instance(&mut self, instance: MultiLabelInstance) -> Result<(), ClassifierError>;

    /// Clears learned state; the model context is kept.
    fn reset(&mut self);
}
