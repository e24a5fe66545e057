use super::distance_cache::DistanceCache;
use super::neighbors::{distance, nearest_k, vote};
use super::ranges::AttributeRangeTracker;
use super::size_adapter::{WindowMetric, WindowSizeAdapter};
use super::window::{ErrorTracker, WindowStore};
use crate::classifiers::{ClassifierError, MultiLabelClassifier};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::MultiLabelInstance;
use crate::core::prediction::MultiLabelPrediction;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Configuration for [`SamPunitiveKnn`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamPunitiveKnnOptions {
    /// Number of neighbors consulted per query.
    pub k: usize,
    /// Hard upper bound on retained instances.
    pub max_window_size: usize,
    /// Smallest window size adaptation may select.
    pub min_window_size: usize,
    /// Error tolerance multiplier: an instance is evicted once its
    /// accumulated wrong votes exceed `penalty_ratio × num_labels`.
    pub penalty_ratio: f64,
    /// Geometric shrink factor for candidate window sizes.
    pub reduction_ratio: f64,
    /// Score used to compare candidate windows.
    pub metric: WindowMetric,
}

impl Default for SamPunitiveKnnOptions {
    fn default() -> SamPunitiveKnnOptions {
        SamPunitiveKnnOptions {
            k: 3,
            max_window_size: 1000,
            min_window_size: 50,
            penalty_ratio: 1.0,
            reduction_ratio: 0.5,
            metric: WindowMetric::default(),
        }
    }
}

impl SamPunitiveKnnOptions {
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.k == 0 {
            return Err(ClassifierError::InvalidOption(
                "k must be at least 1".into(),
            ));
        }
        if self.min_window_size == 0 {
            return Err(ClassifierError::InvalidOption(
                "min_window_size must be at least 1".into(),
            ));
        }
        if self.max_window_size < self.min_window_size {
            return Err(ClassifierError::InvalidOption(format!(
                "max_window_size ({}) must not be below min_window_size ({})",
                self.max_window_size, self.min_window_size
            )));
        }
        if self.penalty_ratio < 0.0 {
            return Err(ClassifierError::InvalidOption(
                "penalty_ratio must not be negative".into(),
            ));
        }
        if !(self.reduction_ratio > 0.0 && self.reduction_ratio < 1.0) {
            return Err(ClassifierError::InvalidOption(
                "reduction_ratio must lie in (0, 1)".into(),
            ));
        }
        Ok(())
    }
}

struct ModelState {
    num_inputs: usize,
    num_labels: usize,
    window: WindowStore,
    cache: DistanceCache,
    ranges: AttributeRangeTracker,
    errors: ErrorTracker,
    adapter: WindowSizeAdapter,
}

/// Multi-label k-nearest-neighbors over a self-adjusting sliding window
/// with punitive eviction.
///
/// The window holds the most recent instances up to a hard cap. Every
/// prediction charges the consulted neighbors for each label on which
/// they disagreed with the query's true labels; an instance whose charge
/// grows past the penalty threshold is evicted regardless of age. After
/// each training step the window size is re-selected by replaying recent
/// predictions over geometrically shrinking suffixes, so the model sheds
/// pre-drift history on its own.
pub struct SamPunitiveKnn {
    options: SamPunitiveKnnOptions,
    state: Option<ModelState>,
}

impl SamPunitiveKnn {
    pub fn new(options: SamPunitiveKnnOptions) -> Result<SamPunitiveKnn, ClassifierError> {
        options.validate()?;
        Ok(SamPunitiveKnn {
            options,
            state: None,
        })
    }

    pub fn window_size(&self) -> usize {
        self.state.as_ref().map_or(0, |state| state.window.len())
    }

    fn state_mut(&mut self) -> Result<&mut ModelState, ClassifierError> {
        self.state
            .as_mut()
            .ok_or(ClassifierError::MissingModelContext)
    }
}

impl Default for SamPunitiveKnn {
    fn default() -> SamPunitiveKnn {
        SamPunitiveKnn {
            options: SamPunitiveKnnOptions::default(),
            state: None,
        }
    }
}

fn check_shape(state: &ModelState, instance: &MultiLabelInstance) -> Result<(), ClassifierError> {
    if instance.num_input_attributes() != state.num_inputs
        || instance.num_output_attributes() != state.num_labels
    {
        return Err(ClassifierError::ShapeMismatch {
            expected_inputs: state.num_inputs,
            got_inputs: instance.num_input_attributes(),
            expected_labels: state.num_labels,
            got_labels: instance.num_output_attributes(),
        });
    }
    Ok(())
}

impl MultiLabelClassifier for SamPunitiveKnn {
    fn set_model_context(&mut self, header: Arc<InstanceHeader>) -> Result<(), ClassifierError> {
        let num_inputs = header.num_input_attributes();
        let num_labels = header.num_output_attributes();
        if num_inputs == 0 {
            return Err(ClassifierError::InvalidModelContext(
                "header declares no input attributes",
            ));
        }
        if num_labels == 0 {
            return Err(ClassifierError::InvalidModelContext(
                "header declares no output attributes",
            ));
        }
        self.state = Some(ModelState {
            num_inputs,
            num_labels,
            window: WindowStore::new(self.options.max_window_size),
            cache: DistanceCache::new(self.options.max_window_size),
            ranges: AttributeRangeTracker::new(num_inputs),
            errors: ErrorTracker::new(),
            adapter: WindowSizeAdapter::new(
                self.options.k,
                self.options.min_window_size,
                self.options.reduction_ratio,
                num_labels,
                self.options.metric,
            ),
        });
        Ok(())
    }

    fn votes_for_instance(
        &mut self,
        instance: &MultiLabelInstance,
    ) -> Result<MultiLabelPrediction, ClassifierError> {
        let k = self.options.k;
        let state = self.state_mut()?;
        check_shape(state, instance)?;

        let distances: Vec<f64> = state
            .window
            .entries()
            .iter()
            .map(|entry| distance(instance, &entry.instance, &state.ranges))
            .collect();
        let neighbors = nearest_k(k, &distances, 0..state.window.len());
        let prediction = vote(&neighbors, state.window.entries(), state.num_labels);

        // Charge each consulted neighbor for every label on which it
        // contradicts the query's true labels.
        for &i in &neighbors {
            let entry = &state.window.entries()[i];
            let misses = (0..state.num_labels)
                .filter(|&label| entry.instance.label(label) != instance.label(label))
                .count() as u32;
            if misses > 0 {
                state.errors.record_miss(entry.id, misses);
            }
        }

        Ok(prediction)
    }

    fn train_on_instance(&mut self, instance: MultiLabelInstance) -> Result<(), ClassifierError> {
        let penalty_ratio = self.options.penalty_ratio;
        let max_window_size = self.options.max_window_size;
        let state = self.state_mut()?;
        check_shape(state, &instance)?;

        // Make room before inserting so the cap is never exceeded, not
        // even transiently.
        if state.window.len() == max_window_size {
            state.cache.truncate_front(1, state.window.len());
            for evicted in state.window.drain_front(1) {
                state.errors.remove(evicted.id);
            }
        }

        state.ranges.observe(&instance);
        let distances: Vec<f64> = state
            .window
            .entries()
            .iter()
            .map(|entry| distance(&instance, &entry.instance, &state.ranges))
            .collect();
        let row = state.window.len();
        state.window.push(instance);
        state.cache.append_row(row, &distances);

        for id in state.errors.over_threshold(penalty_ratio, state.num_labels) {
            if let Some(position) = state.window.position_of(id) {
                state.cache.remove_at(position, state.window.len());
                state.window.remove_at(position);
            }
            state.errors.remove(id);
        }

        let size = state.window.len();
        let best = state.adapter.select_size(state.window.entries(), &state.cache);
        if best < size {
            let surplus = size - best;
            state.cache.truncate_front(surplus, size);
            for evicted in state.window.drain_front(surplus) {
                state.errors.remove(evicted.id);
            }
        }

        Ok(())
    }

    fn reset(&mut self) {
        if let Some(state) = self.state.as_mut() {
            state.window.clear();
            state.errors.clear();
            state.adapter.clear();
        }
    }
}
