pub mod classifiers;
pub mod core;
pub mod evaluation;
pub mod streams;
pub mod tasks;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
