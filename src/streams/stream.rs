use crate::core::instance_header::InstanceHeader;
use crate::core::instances::MultiLabelInstance;
use std::io::Error;
use std::sync::Arc;

/// Pull-based interface for streams of multi-label instances.
///
/// Implementations may represent finite datasets (e.g., files) or unbounded
/// generators. All returned instances must conform to the same, immutable
/// [`InstanceHeader`] for the lifetime of the stream.
pub trait Stream {
    /// Returns the stream header (relation name, input and output attributes).
    ///
    /// The header must remain valid and immutable for the entire lifetime of
    /// the stream. Every instance yielded by [`next_instance`] must match this
    /// schema.
    fn header(&self) -> &Arc<InstanceHeader>;

    /// Indicates whether the stream *may* produce more instances.
    ///
    /// Finite streams should return `false` once exhausted. Unbounded streams
    /// (e.g., generators) typically return `true` always.
    ///
    /// This call should be cheap and side effect free. If it returns `false`,
    /// a subsequent call to [`next_instance`] must return `None`.
    fn has_more_instances(&self) -> bool;

    /// Produces the next instance, or `None` if the stream is exhausted.
    fn next_instance(&mut self) -> Option<MultiLabelInstance>;

    /// Resets the stream to its initial state.
    ///
    /// For file-backed streams, this typically seeks back to the start of the
    /// data section; for generators, it usually re-seeds the RNG and clears
    /// internal counters. The header must remain unchanged.
    ///
    /// Returns an error if the underlying source cannot be reopened or sought.
    fn restart(&mut self) -> Result<(), Error>;
}
