/// Errors that can occur in peer operations.
#[derive(Debug, thiserror::Error)]
pub enum PeerError {
    /// No prototype is registered under the requested id.
    #[error("no prototype registered for id {0}")]
    UnknownPrototype(u8),

    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] rdscom_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] rdscom_frame::FrameError),
}

pub type Result<T> = std::result::Result<T, PeerError>;
