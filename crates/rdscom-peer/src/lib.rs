//! Tick-driven reliable request/response engine.
//!
//! This is the "just works" layer. A [`Peer`] owns a channel, a prototype
//! registry, and per-kind callback tables; the host calls [`Peer::tick`] from
//! its main loop. Sent REQUESTs that require acknowledgment are tracked and
//! retransmitted until the matching RESPONSE arrives or the retry budget is
//! spent — at-least-once delivery on top of a lossy byte link.
//!
//! Time is injected: the engine never reads the system clock directly, so
//! tests (and embedded ports with their own tick counters) control it fully.

pub mod config;
pub mod error;
pub mod peer;

pub use config::{monotonic_clock, Clock, PeerConfig};
pub use error::{PeerError, Result};
pub use peer::{Handler, Peer};
