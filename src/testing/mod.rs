pub mod dummies;
pub mod stubs;

pub use dummies::header_multilabel;
pub use stubs::VecStream;
