use crate::core::instance_header::InstanceHeader;
use std::io::{Error, ErrorKind};
use std::sync::Arc;

/// Input feature storage. Sparse vectors keep only nonzero positions;
/// unlisted positions read as `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureVector {
    Dense(Vec<f64>),
    Sparse {
        indices: Vec<usize>,
        values: Vec<f64>,
        num_attributes: usize,
    },
}

impl FeatureVector {
    /// Builds a sparse vector, checking that `indices` is strictly
    /// increasing, stays below `num_attributes` and pairs up with `values`.
    pub fn sparse(
        indices: Vec<usize>,
        values: Vec<f64>,
        num_attributes: usize,
    ) -> Result<FeatureVector, Error> {
        if indices.len() != values.len() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Sparse indices and values must have the same length",
            ));
        }
        if !indices.windows(2).all(|w| w[0] < w[1]) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Sparse indices must be strictly increasing",
            ));
        }
        if indices.last().is_some_and(|&last| last >= num_attributes) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Sparse index out of bounds",
            ));
        }
        Ok(FeatureVector::Sparse {
            indices,
            values,
            num_attributes,
        })
    }

    pub fn num_attributes(&self) -> usize {
        match self {
            FeatureVector::Dense(values) => values.len(),
            FeatureVector::Sparse { num_attributes, .. } => *num_attributes,
        }
    }

    pub fn value(&self, index: usize) -> f64 {
        match self {
            FeatureVector::Dense(values) => values.get(index).copied().unwrap_or(0.0),
            FeatureVector::Sparse {
                indices, values, ..
            } => match indices.binary_search(&index) {
                Ok(pos) => values[pos],
                Err(_) => 0.0,
            },
        }
    }

    /// Stored `(attribute index, value)` pairs in increasing index order.
    /// Dense vectors yield every position, sparse ones only those stored.
    pub(crate) fn entries(&self) -> FeatureEntries<'_> {
        match self {
            FeatureVector::Dense(values) => FeatureEntries::Dense { values, pos: 0 },
            FeatureVector::Sparse {
                indices, values, ..
            } => FeatureEntries::Sparse {
                indices,
                values,
                pos: 0,
            },
        }
    }
}

pub(crate) enum FeatureEntries<'a> {
    Dense {
        values: &'a [f64],
        pos: usize,
    },
    Sparse {
        indices: &'a [usize],
        values: &'a [f64],
        pos: usize,
    },
}

impl Iterator for FeatureEntries<'_> {
    type Item = (usize, f64);

    fn next(&mut self) -> Option<(usize, f64)> {
        match self {
            FeatureEntries::Dense { values, pos } => {
                let value = values.get(*pos).copied()?;
                let index = *pos;
                *pos += 1;
                Some((index, value))
            }
            FeatureEntries::Sparse {
                indices,
                values,
                pos,
            } => {
                let index = indices.get(*pos).copied()?;
                let value = values[*pos];
                *pos += 1;
                Some((index, value))
            }
        }
    }
}

/// A labeled example: input features plus a fixed-length binary label vector.
#[derive(Clone)]
pub struct MultiLabelInstance {
    header: Arc<InstanceHeader>,
    features: FeatureVector,
    labels: Vec<u8>,
    weight: f64,
}

impl MultiLabelInstance {
    pub fn new(
        header: Arc<InstanceHeader>,
        features: FeatureVector,
        labels: Vec<u8>,
        weight: f64,
    ) -> Result<MultiLabelInstance, Error> {
        if features.num_attributes() != header.num_input_attributes() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Feature count does not match header input attributes",
            ));
        }
        if labels.len() != header.num_output_attributes() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Label count does not match header output attributes",
            ));
        }
        if labels.iter().any(|&label| label > 1) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Labels must be binary",
            ));
        }
        if weight < 0.0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Weight cannot be negative",
            ));
        }
        Ok(MultiLabelInstance {
            header,
            features,
            labels,
            weight,
        })
    }

    pub fn dense(
        header: Arc<InstanceHeader>,
        values: Vec<f64>,
        labels: Vec<u8>,
    ) -> Result<MultiLabelInstance, Error> {
        MultiLabelInstance::new(header, FeatureVector::Dense(values), labels, 1.0)
    }

    pub fn header(&self) -> &Arc<InstanceHeader> {
        &self.header
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn num_input_attributes(&self) -> usize {
        self.features.num_attributes()
    }

    pub fn num_output_attributes(&self) -> usize {
        self.labels.len()
    }

    pub fn input_value(&self, index: usize) -> f64 {
        self.features.value(index)
    }

    pub fn label(&self, index: usize) -> u8 {
        self.labels[index]
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    pub fn features(&self) -> &FeatureVector {
        &self.features
    }
}
