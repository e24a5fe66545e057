use std::any::Any;
use std::sync::Arc;

/// Schema-level description of a single attribute (input feature or output
/// label). Concrete types are recovered through [`as_any`] downcasts.
pub trait Attribute: Send + Sync {
    fn name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;
}

pub type AttributeRef = Arc<dyn Attribute>;
