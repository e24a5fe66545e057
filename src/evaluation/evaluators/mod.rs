mod multilabel_prequential_evaluator;
mod performance_evaluator;

pub use multilabel_prequential_evaluator::MultiLabelPrequentialEvaluator;
pub use performance_evaluator::{PerformanceEvaluator, PerformanceEvaluatorExt};
