use crate::core::attributes::Attribute;
use std::any::Any;
use std::collections::HashMap;

pub struct NominalAttribute {
    pub name: String,
    pub values: Vec<String>,
    pub label_to_index: HashMap<String, usize>,
}

impl NominalAttribute {
    pub fn with_values(
        name: String,
        values: Vec<String>,
        label_to_index: HashMap<String, usize>,
    ) -> NominalAttribute {
        NominalAttribute {
            name,
            values,
            label_to_index,
        }
    }

    /// A two-valued attribute with values `"0"` and `"1"`, the shape every
    /// output label attribute takes in a multi-label header.
    pub fn binary(name: String) -> NominalAttribute {
        let values = vec!["0".to_string(), "1".to_string()];
        let mut label_to_index = HashMap::new();
        label_to_index.insert("0".to_string(), 0);
        label_to_index.insert("1".to_string(), 1);
        NominalAttribute {
            name,
            values,
            label_to_index,
        }
    }
}

impl Attribute for NominalAttribute {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
