//! Compact reliable messaging for embedded devices and their PC-side peers.
//!
//! rdscom exchanges strongly-shaped, fixed-layout binary records over any
//! byte-oriented transport (UART, TCP, an in-memory loopback), with
//! request/response matching and retransmission of unanswered requests.
//!
//! # Crate Structure
//!
//! - [`schema`] — Runtime-defined record layouts and typed buffers
//! - [`frame`] — Framed message envelope with request numbering
//! - [`transport`] — Byte-level channel contract and adapters
//! - [`peer`] — Tick-driven dispatch and retry engine

/// Re-export schema types.
pub mod schema {
    pub use rdscom_schema::*;
}

/// Re-export frame types.
pub mod frame {
    pub use rdscom_frame::*;
}

/// Re-export transport types.
pub mod transport {
    pub use rdscom_transport::*;
}

/// Re-export peer types.
pub mod peer {
    pub use rdscom_peer::*;
}
