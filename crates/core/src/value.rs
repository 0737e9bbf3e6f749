//! Scalar values and encoded records.
//!
//! A record is carried as a `Vec<Value>`, one entry per layout field. Integer
//! values are held as `i64` regardless of field width; the codec range-checks
//! them on encode. The encoded form is an [`EncodedRecord`], an immutable byte
//! buffer whose length always equals the layout width it was produced for.

use std::fmt;
use std::ops::Deref;

/// One scalar value of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Signed integer, stored in an `Int*` field
    Int(i64),
    /// Byte string, stored in a `Bytes` field
    Bytes(Vec<u8>),
}

/// Ordered values of one record, matching a layout field for field.
pub type RecordValues = Vec<Value>;

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Int(_) => None,
            Value::Bytes(b) => Some(b),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Int(i64::from(n))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64);

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Value {
    fn from(b: &[u8; N]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Bytes(s.as_bytes().to_vec())
    }
}

/// Integers print in decimal, byte strings as escaped `b"..."` literals.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Bytes(bytes) => {
                f.write_str("b\"")?;
                for &byte in bytes {
                    match byte {
                        b'"' => f.write_str("\\\"")?,
                        b'\\' => f.write_str("\\\\")?,
                        b'\n' => f.write_str("\\n")?,
                        b'\r' => f.write_str("\\r")?,
                        b'\t' => f.write_str("\\t")?,
                        0x20..=0x7e => write!(f, "{}", byte as char)?,
                        _ => write!(f, "\\x{byte:02x}")?,
                    }
                }
                f.write_str("\"")
            }
        }
    }
}

/// Fixed-length output of the encoder.
///
/// There is no mutable access; use [`EncodedRecord::into_vec`] to take the
/// bytes out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedRecord {
    bytes: Box<[u8]>,
}

impl EncodedRecord {
    /// Only the codec produces records, so the length always matches a layout.
    pub(crate) fn from_vec(bytes: Vec<u8>) -> Self {
        Self {
            bytes: bytes.into_boxed_slice(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes.into_vec()
    }
}

impl AsRef<[u8]> for EncodedRecord {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl Deref for EncodedRecord {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Format values the way a tuple literal reads: `(7, b"spam", 8)`.
pub fn format_values(values: &[Value]) -> String {
    let parts: Vec<String> = values.iter().map(Value::to_string).collect();
    if parts.len() == 1 {
        format!("({},)", parts[0])
    } else {
        format!("({})", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_conversions() {
        assert_eq!(Value::from(7i32), Value::Int(7));
        assert_eq!(Value::from(-3i8), Value::Int(-3));
        assert_eq!(Value::from(b"spam"), Value::Bytes(b"spam".to_vec()));
        assert_eq!(Value::from("spam"), Value::Bytes(b"spam".to_vec()));
        assert_eq!(Value::from(&b"ab"[..]), Value::Bytes(vec![b'a', b'b']));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Int(8).as_int(), Some(8));
        assert_eq!(Value::Int(8).as_bytes(), None);
        assert_eq!(Value::from("x").as_bytes(), Some(&b"x"[..]));
        assert_eq!(Value::from("x").as_int(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(-42).to_string(), "-42");
        assert_eq!(Value::from("spam").to_string(), "b\"spam\"");
        assert_eq!(Value::from(b"ab\0\0").to_string(), "b\"ab\\x00\\x00\"");
        assert_eq!(Value::from("a\"b\\").to_string(), "b\"a\\\"b\\\\\"");
        assert_eq!(Value::Bytes(vec![0xff, b'\n']).to_string(), "b\"\\xff\\n\"");
    }

    #[test]
    fn test_format_values() {
        let values = vec![Value::Int(7), Value::from("spam"), Value::Int(8)];
        assert_eq!(format_values(&values), "(7, b\"spam\", 8)");
        assert_eq!(format_values(&[Value::Int(1)]), "(1,)");
        assert_eq!(format_values(&[]), "()");
    }

    #[test]
    fn test_encoded_record_views() {
        let record = EncodedRecord::from_vec(vec![1, 2, 3]);
        assert_eq!(record.len(), 3);
        assert!(!record.is_empty());
        assert_eq!(record.as_bytes(), &[1, 2, 3]);
        assert_eq!(&record[1..], &[2, 3]);
        assert_eq!(record.as_ref(), &[1, 2, 3]);
        assert_eq!(record.into_vec(), vec![1, 2, 3]);
    }
}
