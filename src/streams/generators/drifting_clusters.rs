use std::io::{Error, ErrorKind};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::MultiLabelInstance;
use crate::streams::stream::Stream;

/// One generating cluster: a center in feature space and the label set
/// assigned to points drawn around it.
#[derive(Debug, Clone)]
pub struct ClusterSpec {
    pub center: Vec<f64>,
    pub labels: Vec<u8>,
}

/// Synthetic multi-label stream with an optional abrupt concept drift.
///
/// Instances are drawn round-robin from the clusters, each point jittered
/// uniformly within `spread` of its cluster center. At the drift point the
/// label sets rotate by one cluster while the feature distribution stays
/// unchanged, so only learners tracking the label concept notice anything.
#[derive(Debug)]
pub struct DriftingClustersGenerator {
    seed: u64,
    rng: StdRng,
    clusters: Vec<ClusterSpec>,
    spread: f64,
    drift_at: Option<u64>,
    header: Arc<InstanceHeader>,
    max_instances: Option<u64>,
    produced: u64,
}

impl DriftingClustersGenerator {
    pub fn new(
        clusters: Vec<ClusterSpec>,
        spread: f64,
        drift_at: Option<u64>,
        max_instances: Option<u64>,
        seed: u64,
    ) -> Result<Self, Error> {
        let Some(first) = clusters.first() else {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "At least one cluster is required",
            ));
        };
        let num_inputs = first.center.len();
        let num_labels = first.labels.len();
        if num_inputs == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Cluster centers must have at least one dimension",
            ));
        }
        if num_labels == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Clusters must carry at least one label",
            ));
        }
        for cluster in &clusters {
            if cluster.center.len() != num_inputs || cluster.labels.len() != num_labels {
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    "All clusters must share the same center and label dimensions",
                ));
            }
            if cluster.labels.iter().any(|&label| label > 1) {
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    "Cluster labels must be binary",
                ));
            }
        }
        if !spread.is_finite() || spread < 0.0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Spread must be non-negative",
            ));
        }

        let input_attributes: Vec<AttributeRef> = (0..num_inputs)
            .map(|i| Arc::new(NumericAttribute::new(format!("attrib{}", i + 1))) as AttributeRef)
            .collect();
        let output_attributes: Vec<AttributeRef> = (0..num_labels)
            .map(|j| Arc::new(NominalAttribute::binary(format!("label{}", j + 1))) as AttributeRef)
            .collect();
        let header = Arc::new(InstanceHeader::new(
            "DriftingClusters".into(),
            input_attributes,
            output_attributes,
        ));

        Ok(Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            clusters,
            spread,
            drift_at,
            header,
            max_instances,
            produced: 0,
        })
    }

    fn drifted(&self) -> bool {
        self.drift_at.is_some_and(|at| self.produced >= at)
    }
}

impl Stream for DriftingClustersGenerator {
    fn header(&self) -> &Arc<InstanceHeader> {
        &self.header
    }

    fn has_more_instances(&self) -> bool {
        self.max_instances.is_none_or(|max| self.produced < max)
    }

    fn next_instance(&mut self) -> Option<MultiLabelInstance> {
        if !self.has_more_instances() {
            return None;
        }

        let index = (self.produced as usize) % self.clusters.len();
        let label_index = if self.drifted() {
            (index + 1) % self.clusters.len()
        } else {
            index
        };

        let center = &self.clusters[index].center;
        let mut values = Vec::with_capacity(center.len());
        for &c in center {
            let jitter = if self.spread > 0.0 {
                self.rng.random_range(-self.spread..=self.spread)
            } else {
                0.0
            };
            values.push(c + jitter);
        }
        let labels = self.clusters[label_index].labels.clone();

        self.produced += 1;
        // Values and labels are shaped by construction, so this cannot fail.
        MultiLabelInstance::dense(Arc::clone(&self.header), values, labels).ok()
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.produced = 0;
        Ok(())
    }
}
