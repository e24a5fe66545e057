/// Summarized scalar metric produced by a performance evaluator.
///
/// Typical examples: `"Subset Accuracy"`, `"Hamming Score"`,
/// `"Micro-Averaged F-Measure"`.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub name: String,
    pub value: f64,
}

impl Measurement {
    /// Convenience constructor
    #[inline]
    pub fn new<N: Into<String>>(name: N, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}
