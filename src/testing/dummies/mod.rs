pub mod headers;

pub use headers::header_multilabel;
