mod multi_label_instance;

pub use multi_label_instance::{FeatureVector, MultiLabelInstance};
