use crate::error::{Result, SchemaError};
use crate::prototype::{Prototype, RESERVED_PROTOTYPE_ID};
use crate::value::FieldValue;

/// A fixed-size byte record typed by a [`Prototype`].
///
/// The invariant `data.len() == prototype.size()` holds for the whole
/// lifetime of the buffer; all mutation goes through the typed accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer {
    proto: Prototype,
    data: Vec<u8>,
}

impl Buffer {
    /// Create a zero-filled buffer for the given prototype.
    pub fn new(proto: Prototype) -> Self {
        let data = vec![0; proto.size()];
        Self { proto, data }
    }

    /// Create a buffer from existing payload bytes.
    ///
    /// Fails when the prototype id is reserved or the payload length does not
    /// match the prototype size.
    pub fn from_bytes(proto: Prototype, data: Vec<u8>) -> Result<Self> {
        if proto.identifier() == RESERVED_PROTOTYPE_ID {
            return Err(SchemaError::ReservedPrototype);
        }
        if data.len() != proto.size() {
            return Err(SchemaError::SizeMismatch {
                expected: proto.size(),
                got: data.len(),
            });
        }
        Ok(Self { proto, data })
    }

    /// Read the named field as `T`.
    ///
    /// Fails when the name is unknown or `T`'s width does not match the
    /// stored field width.
    pub fn get<T: FieldValue>(&self, name: &str) -> Result<T> {
        let field = self.locate::<T>(name)?;
        let bytes = &self.data[field.offset..field.offset + field.width()];
        Ok(T::read_le(bytes))
    }

    /// Write the named field as `T`, returning the written value.
    ///
    /// Same validation as [`Buffer::get`]; on error the payload bytes are
    /// untouched.
    pub fn set<T: FieldValue>(&mut self, name: &str, value: T) -> Result<T> {
        let field = self.locate::<T>(name)?;
        let bytes = &mut self.data[field.offset..field.offset + field.width()];
        value.write_le(bytes);
        Ok(value)
    }

    fn locate<T: FieldValue>(&self, name: &str) -> Result<crate::field::Field> {
        let field = self.proto.find_field(name)?;
        if T::WIDTH != field.width() {
            return Err(SchemaError::WidthMismatch {
                name: name.to_string(),
                stored: field.width(),
                requested: T::WIDTH,
            });
        }
        Ok(field)
    }

    /// The raw payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Payload size in bytes. Always equals `prototype().size()`.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// The prototype describing this buffer's layout.
    pub fn prototype(&self) -> &Prototype {
        &self.proto
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;

    fn person() -> Prototype {
        Prototype::new(0)
            .with_field("id", FieldKind::I8)
            .with_field("age", FieldKind::U8)
    }

    #[test]
    fn new_buffer_is_zero_filled_to_prototype_size() {
        let buf = Buffer::new(person());
        assert_eq!(buf.size(), 2);
        assert_eq!(buf.data(), &[0, 0]);
    }

    #[test]
    fn set_then_get_roundtrip() {
        let mut buf = Buffer::new(person());
        assert_eq!(buf.set::<i8>("id", 1).unwrap(), 1);
        assert_eq!(buf.set::<u8>("age", 30).unwrap(), 30);

        assert_eq!(buf.get::<i8>("id").unwrap(), 1);
        assert_eq!(buf.get::<u8>("age").unwrap(), 30);
        assert_eq!(buf.data(), &[0x01, 0x1E]);
    }

    #[test]
    fn multibyte_fields_land_at_their_offsets_little_endian() {
        let proto = Prototype::new(1)
            .with_field("a", FieldKind::U32)
            .with_field("b", FieldKind::U8)
            .with_field("c", FieldKind::I16);
        let mut buf = Buffer::new(proto);

        buf.set::<u32>("a", 0x0403_0201).unwrap();
        buf.set::<u8>("b", 0xAA).unwrap();
        buf.set::<i16>("c", 0x0605).unwrap();

        assert_eq!(buf.data(), &[0x01, 0x02, 0x03, 0x04, 0xAA, 0x05, 0x06]);
    }

    #[test]
    fn width_mismatch_leaves_bytes_unchanged() {
        let proto = Prototype::new(0).with_field("a", FieldKind::U16);
        let mut buf = Buffer::new(proto);
        buf.set::<u16>("a", 0x1234).unwrap();
        let before = buf.data().to_vec();

        let err = buf.set::<u32>("a", 5).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::WidthMismatch {
                stored: 2,
                requested: 4,
                ..
            }
        ));
        assert_eq!(buf.data(), before.as_slice());
    }

    #[test]
    fn unknown_field_access_fails() {
        let mut buf = Buffer::new(person());
        assert!(matches!(
            buf.get::<u8>("height"),
            Err(SchemaError::UnknownField { .. })
        ));
        assert!(matches!(
            buf.set::<u8>("height", 1),
            Err(SchemaError::UnknownField { .. })
        ));
    }

    #[test]
    fn from_bytes_validates_length() {
        let err = Buffer::from_bytes(person(), vec![1, 2, 3]).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::SizeMismatch {
                expected: 2,
                got: 3
            }
        ));

        let buf = Buffer::from_bytes(person(), vec![0x01, 0x1E]).unwrap();
        assert_eq!(buf.get::<u8>("age").unwrap(), 30);
    }

    #[test]
    fn from_bytes_rejects_reserved_prototype() {
        let proto = Prototype::new(RESERVED_PROTOTYPE_ID).with_field("x", FieldKind::U8);
        assert!(matches!(
            Buffer::from_bytes(proto, vec![0]),
            Err(SchemaError::ReservedPrototype)
        ));
    }

    #[test]
    fn bool_and_byte_fields() {
        let proto = Prototype::new(4)
            .with_field("ok", FieldKind::Bool)
            .with_field("raw", FieldKind::Byte);
        let mut buf = Buffer::new(proto);

        buf.set::<bool>("ok", true).unwrap();
        buf.set::<u8>("raw", 0x5A).unwrap();

        assert!(buf.get::<bool>("ok").unwrap());
        assert_eq!(buf.get::<u8>("raw").unwrap(), 0x5A);
        assert_eq!(buf.data(), &[0x01, 0x5A]);
    }
}
