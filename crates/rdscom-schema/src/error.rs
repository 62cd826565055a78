/// Errors that can occur in schema and buffer operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The named field does not exist in the prototype.
    #[error("unknown field: {name}")]
    UnknownField { name: String },

    /// The requested value width does not match the stored field width.
    #[error("field width mismatch for '{name}' (stored {stored} bytes, requested {requested})")]
    WidthMismatch {
        name: String,
        stored: usize,
        requested: usize,
    },

    /// The payload length does not match the prototype size.
    #[error("payload size mismatch (expected {expected} bytes, got {got})")]
    SizeMismatch { expected: usize, got: usize },

    /// The prototype carries the reserved "unset/invalid" identifier.
    #[error("prototype id 80 is reserved (unset/invalid)")]
    ReservedPrototype,

    /// A serialized schema ended before all announced fields were read.
    #[error("serialized prototype truncated ({len} bytes)")]
    Truncated { len: usize },

    /// A serialized schema carries a field kind tag outside the known table.
    #[error("unknown field kind tag {0}")]
    UnknownKindTag(u8),

    /// A serialized field name is not valid UTF-8.
    #[error("field name is not valid UTF-8")]
    InvalidFieldName,
}

pub type Result<T> = std::result::Result<T, SchemaError>;
