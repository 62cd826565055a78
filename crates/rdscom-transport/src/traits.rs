use crate::error::Result;

/// A byte-oriented transport carrying whole message frames.
///
/// Implementations must be non-blocking or best-effort: neither operation may
/// stall the caller's tick loop. `receive` returns at most one complete frame
/// per call — a transport that buffers several frames is expected to slice
/// them and hand them out one at a time.
pub trait Channel {
    /// Drain available bytes. Empty means "nothing to do", not an error.
    fn receive(&mut self) -> Result<Vec<u8>>;

    /// Write one serialized frame, atomically at frame granularity.
    fn send(&mut self, frame: &[u8]) -> Result<()>;
}
