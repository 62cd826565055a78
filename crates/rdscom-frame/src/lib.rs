//! Framed message envelope with request/response numbering.
//!
//! Every message is framed with:
//! - A 3-byte preamble ("RDS") and a 3-byte trailer ("END") as guards
//! - A 4-byte header: kind, prototype id, big-endian request number
//! - A fixed-size payload described by a [`rdscom_schema::Prototype`]
//!
//! There is no length field and no delimiter scanning: the receiver already
//! knows the payload size from the prototype named in the header, and the
//! transport delivers one frame per receive.

pub mod error;
pub mod header;
pub mod kind;
pub mod message;

pub use error::{FrameError, Result};
pub use header::{MessageHeader, HEADER_SIZE};
pub use kind::MessageKind;
pub use message::{Message, FRAME_OVERHEAD, PREAMBLE, TRAILER};
