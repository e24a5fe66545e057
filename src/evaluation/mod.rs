mod evaluators;
mod measurement;
mod preview;

pub use evaluators::{
    MultiLabelPrequentialEvaluator, PerformanceEvaluator, PerformanceEvaluatorExt,
};
pub use measurement::Measurement;
pub use preview::{CurveFormat, LearningCurve, Snapshot};
