use crate::core::instance_header::InstanceHeader;
use crate::core::instances::MultiLabelInstance;
use crate::streams::Stream;
use crate::testing::dummies::header_multilabel;
use std::io::Error;
use std::sync::Arc;

/// In-memory stream over `(features, labels)` rows. The header is derived
/// from the first row; every row must share its shape.
pub struct VecStream {
    pub header: Arc<InstanceHeader>,
    pub rows: Vec<(Vec<f64>, Vec<u8>)>,
    idx: usize,
}

impl VecStream {
    pub fn new(rows: Vec<(Vec<f64>, Vec<u8>)>) -> Self {
        let (num_inputs, num_labels) = rows
            .first()
            .map_or((1, 1), |(values, labels)| (values.len(), labels.len()));
        Self {
            header: header_multilabel(num_inputs, num_labels),
            rows,
            idx: 0,
        }
    }
}

impl Stream for VecStream {
    fn header(&self) -> &Arc<InstanceHeader> {
        &self.header
    }

    fn has_more_instances(&self) -> bool {
        self.idx < self.rows.len()
    }

    fn next_instance(&mut self) -> Option<MultiLabelInstance> {
        if !self.has_more_instances() {
            return None;
        }

        let (values, labels) = self.rows[self.idx].clone();
        self.idx += 1;
        MultiLabelInstance::dense(Arc::clone(&self.header), values, labels).ok()
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.idx = 0;
        Ok(())
    }
}
