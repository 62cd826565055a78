use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Result, SchemaError};
use crate::field::{Field, FieldKind};

/// Prototype identifier reserved to mean "unset/invalid".
pub const RESERVED_PROTOTYPE_ID: u8 = 80;

/// A named, ordered record layout with a `u8` identifier.
///
/// Prototypes are built once during application setup and registered with the
/// peer; field order is insertion order and is also the wire order of the
/// payload, so both endpoints must construct equivalent prototypes (same id,
/// same fields, same kinds, same order) to interoperate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prototype {
    id: u8,
    size: usize,
    fields: Vec<(String, Field)>,
}

impl Prototype {
    /// Create an empty prototype. `id` must not be [`RESERVED_PROTOTYPE_ID`];
    /// the registry and the message constructors reject the reserved value.
    pub fn new(id: u8) -> Self {
        Self {
            id,
            size: 0,
            fields: Vec::new(),
        }
    }

    /// Append a field, builder style.
    pub fn with_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.add_field(name, kind);
        self
    }

    /// Append a field at the current end offset.
    ///
    /// Re-adding an existing name replaces its kind and recomputes every
    /// offset so the layout stays contiguous.
    pub fn add_field(&mut self, name: impl Into<String>, kind: FieldKind) -> &mut Self {
        let name = name.into();
        debug_assert!(name.len() <= u8::MAX as usize, "field name too long");
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, field)) => {
                field.kind = kind;
                self.relayout();
            }
            None => {
                self.fields.push((name, Field::new(self.size, kind)));
                self.size += kind.width();
            }
        }
        self
    }

    fn relayout(&mut self) {
        let mut offset = 0;
        for (_, field) in &mut self.fields {
            field.offset = offset;
            offset += field.kind.width();
        }
        self.size = offset;
    }

    /// Look up a field by name.
    pub fn find_field(&self, name: &str) -> Result<Field> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, field)| *field)
            .ok_or_else(|| SchemaError::UnknownField {
                name: name.to_string(),
            })
    }

    /// Total payload size in bytes (sum of field widths).
    pub fn size(&self) -> usize {
        self.size
    }

    /// The `u8` identifier carried in message headers.
    pub fn identifier(&self) -> u8 {
        self.id
    }

    /// Number of fields.
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// True when no fields have been added.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in insertion (wire) order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Fields with their names, in insertion (wire) order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), *field))
    }

    /// Serialize the schema itself for out-of-band exchange.
    ///
    /// Wire format: `id(u8) | nFields(u8) | { nameLen(u8) | nameBytes |
    /// kindTag(u8) }*`. Field order equals insertion order.
    pub fn serialize_format(&self) -> Bytes {
        let body: usize = self.fields.iter().map(|(name, _)| name.len() + 2).sum();
        let mut out = BytesMut::with_capacity(2 + body);
        out.put_u8(self.id);
        out.put_u8(self.fields.len() as u8);
        for (name, field) in &self.fields {
            out.put_u8(name.len() as u8);
            out.put_slice(name.as_bytes());
            out.put_u8(field.kind.tag());
        }
        out.freeze()
    }

    /// Inverse of [`Prototype::serialize_format`]. Fails on truncated input,
    /// unknown kind tags, and non-UTF-8 names.
    pub fn from_serialized_format(bytes: &[u8]) -> Result<Self> {
        let truncated = || SchemaError::Truncated { len: bytes.len() };

        if bytes.len() < 2 {
            return Err(truncated());
        }

        let mut proto = Prototype::new(bytes[0]);
        let num_fields = bytes[1] as usize;
        let mut cursor = 2;

        for _ in 0..num_fields {
            let name_len = *bytes.get(cursor).ok_or_else(truncated)? as usize;
            cursor += 1;

            let name_bytes = bytes
                .get(cursor..cursor + name_len)
                .ok_or_else(truncated)?;
            cursor += name_len;

            let tag = *bytes.get(cursor).ok_or_else(truncated)?;
            cursor += 1;

            let name =
                std::str::from_utf8(name_bytes).map_err(|_| SchemaError::InvalidFieldName)?;
            proto.add_field(name, FieldKind::from_tag(tag)?);
        }

        Ok(proto)
    }
}

impl std::fmt::Display for Prototype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "prototype {} ({} bytes):", self.id, self.size)?;
        for (name, field) in &self.fields {
            write!(f, " {}@{}:{}", name, field.offset, field.kind)?;
        }
        Ok(())
    }
}
