//! Typed access to fixed-width payload bytes.
//!
//! Multi-byte values are encoded little-endian on the wire so that two peers
//! of differing host endianness read the same numbers. Only the frame header's
//! request number (owned by `rdscom-frame`) is big-endian.

mod sealed {
    pub trait Sealed {}
}

/// A value that can be stored in a record field.
///
/// Implemented for the fixed-width integers, floats, and `bool`; the trait is
/// sealed so the width check in the buffer accessors stays exhaustive.
pub trait FieldValue: sealed::Sealed + Copy {
    /// Encoded width in bytes.
    const WIDTH: usize;

    /// Write the value into `out`, which is exactly `WIDTH` bytes.
    fn write_le(self, out: &mut [u8]);

    /// Read a value from `bytes`, which is exactly `WIDTH` bytes.
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_field_value {
    ($($ty:ty),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl FieldValue for $ty {
            const WIDTH: usize = std::mem::size_of::<$ty>();

            fn write_le(self, out: &mut [u8]) {
                out.copy_from_slice(&self.to_le_bytes());
            }

            fn read_le(bytes: &[u8]) -> Self {
                <$ty>::from_le_bytes(bytes.try_into().expect("caller checked width"))
            }
        }
    )*};
}

impl_field_value!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl sealed::Sealed for bool {}

impl FieldValue for bool {
    const WIDTH: usize = 1;

    fn write_le(self, out: &mut [u8]) {
        out[0] = self as u8;
    }

    fn read_le(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_encode_little_endian() {
        let mut out = [0u8; 4];
        0xAABBCCDDu32.write_le(&mut out);
        assert_eq!(out, [0xDD, 0xCC, 0xBB, 0xAA]);
        assert_eq!(u32::read_le(&out), 0xAABBCCDD);
    }

    #[test]
    fn signed_roundtrip() {
        let mut out = [0u8; 2];
        (-12345i16).write_le(&mut out);
        assert_eq!(i16::read_le(&out), -12345);
    }

    #[test]
    fn floats_roundtrip() {
        let mut out = [0u8; 8];
        (-0.5f64).write_le(&mut out);
        assert_eq!(f64::read_le(&out), -0.5);
    }

    #[test]
    fn bool_is_one_byte() {
        let mut out = [0u8; 1];
        true.write_le(&mut out);
        assert_eq!(out, [1]);
        assert!(bool::read_le(&out));
        assert!(!bool::read_le(&[0]));
        assert!(bool::read_le(&[7]));
    }
}
