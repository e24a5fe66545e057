mod drifting_clusters;

pub use drifting_clusters::{ClusterSpec, DriftingClustersGenerator};
