use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use std::sync::Arc;

/// A multi-label header with `num_inputs` numeric inputs and `num_labels`
/// binary output attributes.
pub fn header_multilabel(num_inputs: usize, num_labels: usize) -> Arc<InstanceHeader> {
    let input_attributes: Vec<AttributeRef> = (0..num_inputs)
        .map(|i| Arc::new(NumericAttribute::new(format!("attrib{}", i + 1))) as AttributeRef)
        .collect();
    let output_attributes: Vec<AttributeRef> = (0..num_labels)
        .map(|j| Arc::new(NominalAttribute::binary(format!("label{}", j + 1))) as AttributeRef)
        .collect();

    Arc::new(InstanceHeader::new(
        "ml".into(),
        input_attributes,
        output_attributes,
    ))
}
