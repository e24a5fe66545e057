mod distance_cache;
mod neighbors;
mod ranges;
mod sam_punitive_knn;
mod size_adapter;
mod window;

pub use sam_punitive_knn::{SamPunitiveKnn, SamPunitiveKnnOptions};
pub use size_adapter::WindowMetric;
