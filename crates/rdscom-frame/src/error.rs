use rdscom_schema::SchemaError;

/// Errors that can occur while encoding or decoding message frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The input is shorter than a minimal frame or header.
    #[error("frame too short ({len} bytes)")]
    Truncated { len: usize },

    /// The frame does not start with the "RDS" guard bytes.
    #[error("invalid preamble (expected \"RDS\")")]
    InvalidPreamble,

    /// The frame does not end with the "END" guard bytes.
    #[error("invalid trailer (expected \"END\")")]
    InvalidTrailer,

    /// The frame length does not match the expected prototype payload size.
    #[error("frame size mismatch (expected {expected} bytes, got {got})")]
    SizeMismatch { expected: usize, got: usize },

    /// The prototype id is the reserved "unset/invalid" value.
    #[error("invalid prototype id {0}")]
    InvalidPrototype(u8),

    /// The header kind byte is not REQUEST, RESPONSE, or ERROR.
    #[error("unknown message kind {0}")]
    UnknownKind(u8),

    /// The payload could not be bound to the expected prototype.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

pub type Result<T> = std::result::Result<T, FrameError>;
