//! Runtime-defined record schemas with typed fixed-layout buffers.
//!
//! A [`Prototype`] is the blueprint of a record: an insertion-ordered list of
//! named fields, each with a fixed width and a byte offset computed at add
//! time, plus a `u8` identifier used on the wire. A [`Buffer`] is one
//! instance of that blueprint: a byte array sized exactly to the prototype,
//! read and written through typed accessors. One prototype can back any
//! number of buffers, so field access stays O(1) with no per-field
//! allocation.
//!
//! Multi-byte field values are encoded little-endian; see [`value`].

mod buffer;
mod check;
mod error;
mod field;
mod prototype;
pub mod value;

pub use buffer::Buffer;
pub use error::{Result, SchemaError};
pub use field::{Field, FieldKind};
pub use prototype::{Prototype, RESERVED_PROTOTYPE_ID};
pub use value::FieldValue;
