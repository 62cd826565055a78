use std::sync::atomic::{AtomicU16, Ordering};

use bytes::{BufMut, Bytes, BytesMut};
use rdscom_schema::{Buffer, FieldValue, Prototype, RESERVED_PROTOTYPE_ID};

use crate::error::{FrameError, Result};
use crate::header::{MessageHeader, HEADER_SIZE};
use crate::kind::MessageKind;

/// Frame guard bytes preceding the header.
pub const PREAMBLE: [u8; 3] = *b"RDS";

/// Frame guard bytes following the payload.
pub const TRAILER: [u8; 3] = *b"END";

/// Bytes a frame adds around the payload: preamble + header + trailer.
pub const FRAME_OVERHEAD: usize = PREAMBLE.len() + HEADER_SIZE + TRAILER.len();

// Process-wide counter; wraps at u16::MAX. Atomic so multi-threaded senders
// still get distinct numbers.
static REQUEST_NUMBER: AtomicU16 = AtomicU16::new(0);

fn next_request_number() -> u16 {
    REQUEST_NUMBER.fetch_add(1, Ordering::Relaxed)
}

/// A framed message: header plus typed payload buffer.
///
/// Wire layout:
///
/// ```text
/// ┌──────────┬─────────┬────────────┬──────────────┬───────────────────┬──────────┐
/// │ "RDS"    │ kind    │ protoId    │ reqNum       │ payload           │ "END"    │
/// │ (3B)     │ (1B)    │ (1B)       │ (2B BE)      │ (proto.size() B)  │ (3B)     │
/// └──────────┴─────────┴────────────┴──────────────┴───────────────────┴──────────┘
/// ```
///
/// The preamble and trailer are guards, not sync markers: the transport is
/// expected to deliver exactly one frame per receive.
#[derive(Debug, Clone)]
pub struct Message {
    header: MessageHeader,
    buffer: Buffer,
}

impl Message {
    /// Create a message with a zeroed payload for `proto`, assigning the next
    /// process-wide request number.
    pub fn new(kind: MessageKind, proto: Prototype) -> Self {
        Self::from_buffer(kind, Buffer::new(proto))
    }

    /// Create a message adopting an existing buffer, assigning the next
    /// process-wide request number.
    pub fn from_buffer(kind: MessageKind, buffer: Buffer) -> Self {
        if kind == MessageKind::Response {
            tracing::warn!(
                "constructing a response without a request number; use Message::response_to so \
                 the response matches its request"
            );
        }
        Self::with_request_number(kind, buffer, next_request_number())
    }

    /// Create a message with an explicit request number.
    pub fn with_request_number(kind: MessageKind, buffer: Buffer, request_number: u16) -> Self {
        let prototype_id = buffer.prototype().identifier();
        if prototype_id == RESERVED_PROTOTYPE_ID {
            tracing::warn!(
                prototype_id,
                "message built on the reserved prototype id; receivers will drop it"
            );
        }
        Self {
            header: MessageHeader::new(kind, prototype_id, request_number),
            buffer,
        }
    }

    /// Create the RESPONSE answering `request`, carrying `buffer`.
    ///
    /// The request number is copied from the request; the prototype id is
    /// taken from the response buffer, which may differ from the request's.
    pub fn response_to(request: &Message, buffer: Buffer) -> Self {
        Self::with_request_number(MessageKind::Response, buffer, request.request_number())
    }

    /// Create the RESPONSE answering `request` with a zeroed payload for
    /// `proto`.
    pub fn response_with_prototype(request: &Message, proto: Prototype) -> Self {
        Self::response_to(request, Buffer::new(proto))
    }

    /// The prototype id at a fixed offset in a serialized frame, or the
    /// reserved sentinel when the input is too short to carry one.
    ///
    /// Lets a receiver pick the right prototype before the full parse.
    pub fn peek_prototype_id(bytes: &[u8]) -> u8 {
        if bytes.len() <= PREAMBLE.len() + 1 {
            return RESERVED_PROTOTYPE_ID;
        }
        bytes[PREAMBLE.len() + 1]
    }

    /// Parse a serialized frame against the prototype the receiver expects.
    ///
    /// Validates the guards and the exact frame length before binding the
    /// payload to `proto`.
    pub fn from_serialized(proto: &Prototype, bytes: &[u8]) -> Result<Self> {
        if proto.identifier() == RESERVED_PROTOTYPE_ID {
            return Err(FrameError::InvalidPrototype(RESERVED_PROTOTYPE_ID));
        }

        if bytes.len() < FRAME_OVERHEAD {
            return Err(FrameError::Truncated { len: bytes.len() });
        }

        if bytes[..PREAMBLE.len()] != PREAMBLE {
            return Err(FrameError::InvalidPreamble);
        }

        if bytes[bytes.len() - TRAILER.len()..] != TRAILER {
            return Err(FrameError::InvalidTrailer);
        }

        let header = MessageHeader::decode(&bytes[PREAMBLE.len()..PREAMBLE.len() + HEADER_SIZE])?;

        let expected = FRAME_OVERHEAD + proto.size();
        if bytes.len() != expected {
            return Err(FrameError::SizeMismatch {
                expected,
                got: bytes.len(),
            });
        }

        let payload = bytes[PREAMBLE.len() + HEADER_SIZE..bytes.len() - TRAILER.len()].to_vec();
        let buffer = Buffer::from_bytes(proto.clone(), payload)?;

        Ok(Self { header, buffer })
    }

    /// Assemble the wire frame.
    pub fn serialize(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(FRAME_OVERHEAD + self.buffer.size());
        out.put_slice(&PREAMBLE);
        self.header.encode(&mut out);
        out.put_slice(self.buffer.data());
        out.put_slice(&TRAILER);
        out.freeze()
    }

    /// Read a payload field. See [`Buffer::get`].
    pub fn get<T: FieldValue>(&self, name: &str) -> rdscom_schema::Result<T> {
        self.buffer.get(name)
    }

    /// Write a payload field. See [`Buffer::set`].
    pub fn set<T: FieldValue>(&mut self, name: &str, value: T) -> rdscom_schema::Result<T> {
        self.buffer.set(name, value)
    }

    /// Message kind (REQUEST, RESPONSE, or ERROR).
    pub fn kind(&self) -> MessageKind {
        self.header.kind
    }

    /// Prototype id carried in the header.
    pub fn prototype_id(&self) -> u8 {
        self.header.prototype_id
    }

    /// Request number carried in the header.
    pub fn request_number(&self) -> u16 {
        self.header.request_number
    }

    /// The payload buffer.
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// The payload buffer, mutably. Only meaningful before the message is
    /// sent; the serialized form on the wire is frozen.
    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header && self.buffer.data() == other.buffer.data()
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} #{} proto {} ({} payload bytes)",
            self.header.kind,
            self.header.request_number,
            self.header.prototype_id,
            self.buffer.size()
        )
    }
}

#[cfg(test)]
mod tests {
    use rdscom_schema::FieldKind;

    use super::*;

    fn person() -> Prototype {
        Prototype::new(0)
            .with_field("id", FieldKind::I8)
            .with_field("age", FieldKind::U8)
    }

    fn person_request() -> Message {
        let mut buf = Buffer::new(person());
        buf.set::<i8>("id", 1).unwrap();
        buf.set::<u8>("age", 30).unwrap();
        Message::with_request_number(MessageKind::Request, buf, 0)
    }

    #[test]
    fn serializes_the_documented_frame() {
        let wire = person_request().serialize();
        assert_eq!(
            wire.as_ref(),
            &[
                0x52, 0x44, 0x53, // "RDS"
                0x00, // REQUEST
                0x00, // proto id
                0x00, 0x00, // request number 0
                0x01, 0x1E, // id=1, age=30
                0x45, 0x4E, 0x44, // "END"
            ]
        );
    }

    #[test]
    fn roundtrip_preserves_header_and_payload() {
        let msg = person_request();
        let wire = msg.serialize();

        let parsed = Message::from_serialized(&person(), &wire).unwrap();
        assert_eq!(parsed, msg);
        assert_eq!(parsed.kind(), MessageKind::Request);
        assert_eq!(parsed.prototype_id(), 0);
        assert_eq!(parsed.request_number(), 0);
        assert_eq!(parsed.get::<u8>("age").unwrap(), 30);
    }

    #[test]
    fn peek_reads_the_prototype_id() {
        let proto = Prototype::new(42).with_field("x", FieldKind::U8);
        let msg = Message::new(MessageKind::Request, proto);
        assert_eq!(Message::peek_prototype_id(&msg.serialize()), 42);
    }

    #[test]
    fn peek_on_short_input_is_the_reserved_sentinel() {
        assert_eq!(Message::peek_prototype_id(&[]), RESERVED_PROTOTYPE_ID);
        assert_eq!(
            Message::peek_prototype_id(&PREAMBLE),
            RESERVED_PROTOTYPE_ID
        );
        assert_eq!(
            Message::peek_prototype_id(&[0x52, 0x44, 0x53, 0x00]),
            RESERVED_PROTOTYPE_ID
        );
        assert_eq!(Message::peek_prototype_id(&[0x52, 0x44, 0x53, 0x00, 0x07]), 7);
    }

    #[test]
    fn tampered_preamble_rejected() {
        let mut wire = person_request().serialize().to_vec();
        for i in 0..PREAMBLE.len() {
            let mut bad = wire.clone();
            bad[i] = 0x00;
            assert!(matches!(
                Message::from_serialized(&person(), &bad),
                Err(FrameError::InvalidPreamble)
            ));
        }
        // untampered still parses
        assert!(Message::from_serialized(&person(), &wire).is_ok());
        wire[0] = 0x00;
        assert!(matches!(
            Message::from_serialized(&person(), &wire),
            Err(FrameError::InvalidPreamble)
        ));
    }

    #[test]
    fn tampered_trailer_rejected() {
        let wire = person_request().serialize();
        for i in wire.len() - TRAILER.len()..wire.len() {
            let mut bad = wire.to_vec();
            bad[i] = 0x00;
            assert!(matches!(
                Message::from_serialized(&person(), &bad),
                Err(FrameError::InvalidTrailer)
            ));
        }
    }

    #[test]
    fn truncated_payload_is_a_size_mismatch() {
        let wire = person_request().serialize();
        // drop one payload byte, keep the trailer
        let mut bad = wire[..wire.len() - TRAILER.len() - 1].to_vec();
        bad.extend_from_slice(&TRAILER);

        assert!(matches!(
            Message::from_serialized(&person(), &bad),
            Err(FrameError::SizeMismatch {
                expected: 12,
                got: 11
            })
        ));
    }

    #[test]
    fn far_too_short_input_is_truncated() {
        assert!(matches!(
            Message::from_serialized(&person(), &[0x52, 0x44]),
            Err(FrameError::Truncated { len: 2 })
        ));
    }

    #[test]
    fn reserved_expected_prototype_rejected() {
        let reserved = Prototype::new(RESERVED_PROTOTYPE_ID).with_field("x", FieldKind::U8);
        let wire = person_request().serialize();
        assert!(matches!(
            Message::from_serialized(&reserved, &wire),
            Err(FrameError::InvalidPrototype(RESERVED_PROTOTYPE_ID))
        ));
    }

    #[test]
    fn response_copies_request_number_and_may_switch_prototype() {
        let request = person_request();
        let car = Prototype::new(1)
            .with_field("make", FieldKind::Byte)
            .with_field("model", FieldKind::Byte)
            .with_field("year", FieldKind::U16);

        let response = Message::response_with_prototype(&request, car);

        assert_eq!(response.kind(), MessageKind::Response);
        assert_eq!(response.request_number(), request.request_number());
        assert_eq!(response.prototype_id(), 1);
    }

    #[test]
    fn request_numbers_are_distinct_per_message() {
        // The counter is process-wide and other tests construct messages
        // concurrently, so only distinctness is checkable here.
        let proto = Prototype::new(5).with_field("x", FieldKind::U8);
        let first = Message::new(MessageKind::Request, proto.clone());
        let second = Message::new(MessageKind::Request, proto);
        assert_ne!(first.request_number(), second.request_number());
    }

    #[test]
    fn empty_payload_prototype_frames() {
        let empty = Prototype::new(3);
        let msg = Message::with_request_number(MessageKind::Request, Buffer::new(empty.clone()), 9);
        let wire = msg.serialize();

        assert_eq!(wire.len(), FRAME_OVERHEAD);
        let parsed = Message::from_serialized(&empty, &wire).unwrap();
        assert_eq!(parsed.request_number(), 9);
        assert_eq!(parsed.buffer().size(), 0);
    }
}
