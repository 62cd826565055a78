//! Byte-level transport abstraction for rdscom peers.
//!
//! The engine only needs two capabilities from a transport: "drain available
//! bytes" and "push bytes" — the [`Channel`] trait. Ships with an in-memory
//! [`LoopbackChannel`] for tests and demos and a [`StreamChannel`] adapter
//! for non-blocking `Read + Write` streams such as TCP sockets or serial
//! ports.

pub mod error;
pub mod loopback;
pub mod stream;
pub mod traits;

pub use error::{Result, TransportError};
pub use loopback::LoopbackChannel;
pub use stream::StreamChannel;
pub use traits::Channel;
