use super::distance_cache::DistanceCache;
use super::neighbors::{nearest_k, vote};
use super::window::WindowEntry;
use crate::core::prediction::MultiLabelPrediction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumIter, EnumString};

/// Score used to compare candidate window sizes during adaptation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
pub enum WindowMetric {
    #[default]
    #[strum(serialize = "Subset Accuracy")]
    #[serde(rename = "Subset Accuracy")]
    SubsetAccuracy,
    #[strum(serialize = "Hamming Score")]
    #[serde(rename = "Hamming Score")]
    HammingScore,
}

/// Picks the window size whose retained suffix would have predicted the
/// recent stream best.
///
/// Candidate sizes shrink geometrically from the full window down toward
/// the minimum. Each candidate is scored by replaying a test-then-train
/// pass over its suffix using the cached pairwise distances; per-instance
/// outcomes are memoized per suffix start offset so each adaptation step
/// only evaluates the instances added since the last one.
pub(crate) struct WindowSizeAdapter {
    k: usize,
    min_window_size: usize,
    reduction_ratio: f64,
    num_labels: usize,
    metric: WindowMetric,
    histories: BTreeMap<usize, Vec<u32>>,
}

impl WindowSizeAdapter {
    pub(crate) fn new(
        k: usize,
        min_window_size: usize,
        reduction_ratio: f64,
        num_labels: usize,
        metric: WindowMetric,
    ) -> WindowSizeAdapter {
        WindowSizeAdapter {
            k,
            min_window_size,
            reduction_ratio,
            num_labels,
            metric,
            histories: BTreeMap::new(),
        }
    }

    /// Chooses the best window size for the current window. Returns the
    /// full size unchanged while the window is too small to halve.
    pub(crate) fn select_size(&mut self, window: &[WindowEntry], cache: &DistanceCache) -> usize {
        let n = window.len();
        if n < 2 * self.min_window_size {
            return n;
        }

        let candidates = self.candidate_sizes(n);
        let offsets: Vec<usize> = candidates.iter().map(|&size| n - size).collect();
        self.histories.retain(|key, _| offsets.contains(key));

        let mut best_idx = 0;
        let mut best_score = f64::MIN;
        for (idx, &offset) in offsets.iter().enumerate() {
            let mut history = self.histories.remove(&offset).unwrap_or_default();
            for i in (offset + history.len())..n {
                let neighbors = nearest_k(self.k, cache.row(i), offset..i);
                let prediction = vote(&neighbors, window, self.num_labels);
                history.push(self.outcome(&prediction, &window[i]));
            }
            let score = self.score(&history);
            self.histories.insert(offset, history);
            if score > best_score {
                best_score = score;
                best_idx = idx;
            }
        }

        self.adapt_histories(best_idx);
        candidates[best_idx]
    }

    pub(crate) fn clear(&mut self) {
        self.histories.clear();
    }

    /// `[n, n·r, n·r², …]`, extended while the last size can still be
    /// halved against the minimum.
    fn candidate_sizes(&self, n: usize) -> Vec<usize> {
        let mut sizes = vec![n];
        while let Some(&last) = sizes.last() {
            if last < 2 * self.min_window_size {
                break;
            }
            sizes.push((last as f64 * self.reduction_ratio) as usize);
        }
        sizes
    }

    /// Number of labels the replayed prediction got right; histories store
    /// this raw count and the metric is applied at scoring time.
    fn outcome(&self, prediction: &MultiLabelPrediction, entry: &WindowEntry) -> u32 {
        (0..self.num_labels)
            .filter(|&label| {
                let predicted = prediction.vote(label, 1) >= 0.5;
                predicted == (entry.instance.label(label) == 1)
            })
            .count() as u32
    }

    fn score(&self, history: &[u32]) -> f64 {
        if history.is_empty() {
            return 0.0;
        }
        match self.metric {
            WindowMetric::SubsetAccuracy => {
                let exact = history
                    .iter()
                    .filter(|&&matches| matches as usize == self.num_labels)
                    .count();
                exact as f64 / history.len() as f64
            }
            WindowMetric::HammingScore => {
                let sum: u32 = history.iter().sum();
                f64::from(sum) / (history.len() * self.num_labels) as f64
            }
        }
    }

    /// Realigns memoized histories after the window shrinks by
    /// `deletions` candidate steps: the shortest suffix that was dropped
    /// loses its history, and the surviving offsets shift to the new
    /// window origin.
    fn adapt_histories(&mut self, deletions: usize) {
        for _ in 0..deletions {
            let Some(first) = self.histories.keys().next().copied() else {
                break;
            };
            self.histories.remove(&first);
            let Some(new_first) = self.histories.keys().next().copied() else {
                break;
            };
            let rekeyed: BTreeMap<usize, Vec<u32>> = std::mem::take(&mut self.histories)
                .into_iter()
                .map(|(key, history)| (key - new_first, history))
                .collect();
            self.histories = rekeyed;
        }
    }

    #[cfg(test)]
    fn history_offsets(&self) -> Vec<usize> {
        self.histories.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::multilabel::distance_cache::DistanceCache;
    use crate::classifiers::multilabel::window::WindowStore;
    use crate::core::instances::MultiLabelInstance;
    use crate::testing::header_multilabel;

    /// Window of 1-d instances with |a - b| pairwise distances.
    fn build_window(
        points: &[(f64, u8)],
        max_size: usize,
    ) -> (WindowStore, DistanceCache) {
        let header = header_multilabel(1, 1);
        let mut window = WindowStore::new(max_size);
        let mut cache = DistanceCache::new(max_size);
        for &(value, label) in points {
            let distances: Vec<f64> = window
                .entries()
                .iter()
                .map(|entry| (entry.instance.input_value(0) - value).abs())
                .collect();
            let instance =
                MultiLabelInstance::dense(header.clone(), vec![value], vec![label]).unwrap();
            let row = window.len();
            window.push(instance);
            cache.append_row(row, &distances);
        }
        (window, cache)
    }

    #[test]
    fn small_windows_are_left_alone() {
        let (window, cache) = build_window(&[(0.0, 0), (1.0, 1), (2.0, 0)], 8);
        let mut adapter = WindowSizeAdapter::new(1, 2, 0.5, 1, WindowMetric::SubsetAccuracy);
        assert_eq!(adapter.select_size(window.entries(), &cache), 3);
        assert!(adapter.history_offsets().is_empty());
    }

    #[test]
    fn candidate_sizes_shrink_geometrically() {
        let adapter = WindowSizeAdapter::new(1, 2, 0.5, 1, WindowMetric::SubsetAccuracy);
        assert_eq!(adapter.candidate_sizes(16), vec![16, 8, 4, 2]);
        assert_eq!(adapter.candidate_sizes(10), vec![10, 5, 2]);
    }

    #[test]
    fn uniform_window_keeps_full_size() {
        // All instances identical in features and labels: every suffix
        // predicts perfectly, the tie resolves to the largest size.
        let points: Vec<(f64, u8)> = (0..8).map(|_| (1.0, 1)).collect();
        let (window, cache) = build_window(&points, 8);
        let mut adapter = WindowSizeAdapter::new(1, 2, 0.5, 1, WindowMetric::SubsetAccuracy);
        assert_eq!(adapter.select_size(window.entries(), &cache), 8);
    }

    #[test]
    fn label_flip_prefers_recent_suffix() {
        // First half labeled 0, second half labeled 1, features identical.
        // Replaying the full window mixes both concepts; the suffix of 4
        // covering only the new concept scores higher.
        let mut points: Vec<(f64, u8)> = (0..4).map(|_| (1.0, 0)).collect();
        points.extend((0..4).map(|_| (1.0, 1)));
        let (window, cache) = build_window(&points, 8);
        let mut adapter = WindowSizeAdapter::new(1, 2, 0.5, 1, WindowMetric::SubsetAccuracy);
        let chosen = adapter.select_size(window.entries(), &cache);
        assert!(chosen < 8, "expected a shrink, got {chosen}");
    }

    #[test]
    fn repeated_selection_without_new_training_is_stable() {
        let mut points: Vec<(f64, u8)> = (0..4).map(|_| (1.0, 0)).collect();
        points.extend((0..4).map(|_| (1.0, 1)));
        let (window, cache) = build_window(&points, 8);
        let mut adapter = WindowSizeAdapter::new(1, 2, 0.5, 1, WindowMetric::SubsetAccuracy);
        let first = adapter.select_size(window.entries(), &cache);
        let second = adapter.select_size(window.entries(), &cache);
        assert_eq!(first, second);
    }

    #[test]
    fn score_applies_metric_to_raw_match_counts() {
        let subset = WindowSizeAdapter::new(1, 2, 0.5, 2, WindowMetric::SubsetAccuracy);
        let hamming = WindowSizeAdapter::new(1, 2, 0.5, 2, WindowMetric::HammingScore);
        // three replays over two labels: fully right, half right, fully wrong
        let history = [2, 1, 0];
        assert!((subset.score(&history) - 1.0 / 3.0).abs() < 1e-12);
        assert!((hamming.score(&history) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn histories_extend_instead_of_replaying() {
        let points: Vec<(f64, u8)> = (0..8).map(|i| (i as f64, (i % 2) as u8)).collect();
        let (mut window, mut cache) = build_window(&points, 12);
        let mut adapter = WindowSizeAdapter::new(2, 2, 0.5, 1, WindowMetric::HammingScore);
        adapter.select_size(window.entries(), &cache);
        let offsets = adapter.history_offsets();
        assert!(offsets.contains(&0));

        // Append one more instance and adapt again; the memoized entries
        // must produce the same decision as a cold replay.
        let header = header_multilabel(1, 1);
        let distances: Vec<f64> = window
            .entries()
            .iter()
            .map(|entry| (entry.instance.input_value(0) - 8.0).abs())
            .collect();
        let row = window.len();
        window.push(MultiLabelInstance::dense(header, vec![8.0], vec![0]).unwrap());
        cache.append_row(row, &distances);

        let warm = adapter.select_size(window.entries(), &cache);
        let mut cold = WindowSizeAdapter::new(2, 2, 0.5, 1, WindowMetric::HammingScore);
        assert_eq!(warm, cold.select_size(window.entries(), &cache));
    }

    #[test]
    fn shrink_rekeys_surviving_histories() {
        let mut adapter = WindowSizeAdapter::new(1, 2, 0.5, 1, WindowMetric::SubsetAccuracy);
        adapter.histories.insert(0, vec![1, 1]);
        adapter.histories.insert(4, vec![1]);
        adapter.histories.insert(6, vec![1]);
        adapter.adapt_histories(1);
        assert_eq!(adapter.history_offsets(), vec![0, 2]);
        adapter.adapt_histories(1);
        assert_eq!(adapter.history_offsets(), vec![0]);
    }

    #[test]
    fn metric_names_round_trip() {
        use strum::IntoEnumIterator;

        assert_eq!(WindowMetric::SubsetAccuracy.to_string(), "Subset Accuracy");
        for metric in WindowMetric::iter() {
            assert_eq!(metric.to_string().parse::<WindowMetric>().unwrap(), metric);
        }
    }
}
