pub mod classifier;
pub mod multilabel;

pub use classifier::{ClassifierError, MultiLabelClassifier};
