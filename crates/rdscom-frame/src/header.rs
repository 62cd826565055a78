use bytes::{BufMut, BytesMut};

use crate::error::{FrameError, Result};
use crate::kind::MessageKind;

/// Encoded header size: kind (1) + prototype id (1) + request number (2).
pub const HEADER_SIZE: usize = 4;

/// Frame header: message kind, prototype id, and request number.
///
/// The request number is big-endian on the wire and matches a RESPONSE to
/// the REQUEST it answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub kind: MessageKind,
    pub prototype_id: u8,
    pub request_number: u16,
}

impl MessageHeader {
    /// Create a header.
    pub const fn new(kind: MessageKind, prototype_id: u8, request_number: u16) -> Self {
        Self {
            kind,
            prototype_id,
            request_number,
        }
    }

    /// Append the 4 encoded header bytes to `dst`.
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.put_u8(self.kind.as_u8());
        dst.put_u8(self.prototype_id);
        dst.put_u16(self.request_number);
    }

    /// Decode a header from the first [`HEADER_SIZE`] bytes of `src`.
    pub fn decode(src: &[u8]) -> Result<Self> {
        if src.len() < HEADER_SIZE {
            return Err(FrameError::Truncated { len: src.len() });
        }

        let kind = MessageKind::from_u8(src[0])?;
        let prototype_id = src[1];
        let request_number = u16::from_be_bytes([src[2], src[3]]);

        Ok(Self::new(kind, prototype_id, request_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_roundtrip() {
        let header = MessageHeader::new(MessageKind::Request, 7, 0xBEEF);

        let mut wire = BytesMut::new();
        header.encode(&mut wire);
        assert_eq!(wire.len(), HEADER_SIZE);

        let decoded = MessageHeader::decode(&wire).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn request_number_is_big_endian() {
        let mut wire = BytesMut::new();
        MessageHeader::new(MessageKind::Response, 1, 0x1234).encode(&mut wire);
        assert_eq!(wire.as_ref(), &[1, 1, 0x12, 0x34]);
    }

    #[test]
    fn short_input_rejected() {
        assert!(matches!(
            MessageHeader::decode(&[0, 1, 2]),
            Err(FrameError::Truncated { len: 3 })
        ));
    }

    #[test]
    fn bad_kind_byte_rejected() {
        assert!(matches!(
            MessageHeader::decode(&[9, 1, 0, 0]),
            Err(FrameError::UnknownKind(9))
        ));
    }
}
