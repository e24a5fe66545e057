use crate::core::attributes::{Attribute, AttributeRef};
use std::fmt;

/// Immutable schema shared by every instance of a multi-label stream:
/// the input (feature) attributes and the output (label) attributes.
pub struct InstanceHeader {
    pub relation_name: String,
    pub input_attributes: Vec<AttributeRef>,
    pub output_attributes: Vec<AttributeRef>,
}

impl InstanceHeader {
    pub fn new(
        relation_name: String,
        input_attributes: Vec<AttributeRef>,
        output_attributes: Vec<AttributeRef>,
    ) -> InstanceHeader {
        InstanceHeader {
            relation_name,
            input_attributes,
            output_attributes,
        }
    }

    pub fn num_input_attributes(&self) -> usize {
        self.input_attributes.len()
    }

    pub fn num_output_attributes(&self) -> usize {
        self.output_attributes.len()
    }

    pub fn relation_name(&self) -> &str {
        &self.relation_name
    }

    pub fn input_attribute_at(&self, index: usize) -> Option<&dyn Attribute> {
        self.input_attributes.get(index).map(|attr| attr.as_ref())
    }

    pub fn output_attribute_at(&self, index: usize) -> Option<&dyn Attribute> {
        self.output_attributes.get(index).map(|attr| attr.as_ref())
    }
}

// Attribute trait objects carry no `Debug`; summarize by name and shape.
impl fmt::Debug for InstanceHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceHeader")
            .field("relation_name", &self.relation_name)
            .field("num_input_attributes", &self.input_attributes.len())
            .field("num_output_attributes", &self.output_attributes.len())
            .finish()
    }
}
