//! Encoding and decoding of fixed-layout records.
//!
//! # Record Format
//!
//! Fields are concatenated in layout order with no header, padding or
//! checksum. For the layout `>i4sh`:
//!
//! ```text
//! +------------------+
//! | int32 (4 bytes)  |  two's complement, big-endian
//! +------------------+
//! | bytes (4 bytes)  |  raw bytes, right-padded with 0x00
//! +------------------+
//! | int16 (2 bytes)  |  two's complement, big-endian
//! +------------------+
//! ```
//!
//! Encoding `(7, b"spam", 8)` gives `00 00 00 07 73 70 61 6d 00 08`.
//!
//! # Failure Semantics
//!
//! `encode` validates every value before writing the first byte, so an error
//! never leaves a partially written record behind. `decode` only checks the
//! buffer length; once the length matches, every field slice is decodable.
//! Decoded byte strings keep their zero padding since the format has no
//! length prefix to tell padding from content.

use std::sync::Arc;

use tracing::trace;

use crate::error::{DecodeError, EncodeError, Result};
use crate::layout::{ByteOrder, FieldKind, FieldSpec, RecordLayout};
use crate::value::{EncodedRecord, RecordValues, Value};

/// A value that passed its field checks and is ready to be written.
enum Checked<'a> {
    Int(i64),
    Bytes(&'a [u8]),
}

/// Encode `values` against `layout`.
///
/// # Errors
/// - `EncodeError::LengthMismatch` if `values.len() != layout.len()`
/// - `EncodeError::ValueOutOfRange` if an integer does not fit its field's
///   signed width, or a value's variant does not match its field kind
/// - `EncodeError::StringTooLong` if a byte string is wider than its field
pub fn encode(layout: &RecordLayout, values: &[Value]) -> Result<EncodedRecord> {
    if values.len() != layout.len() {
        return Err(EncodeError::LengthMismatch {
            expected: layout.len(),
            actual: values.len(),
        }
        .into());
    }

    // Check everything first; nothing is written unless all values fit
    let checked = layout
        .fields()
        .iter()
        .zip(values)
        .enumerate()
        .map(|(index, (field, value))| check_value(index, field, value))
        .collect::<Result<Vec<_>>>()?;

    let mut bytes = Vec::with_capacity(layout.width());
    for (field, value) in layout.fields().iter().zip(checked) {
        match value {
            Checked::Int(n) => write_int(&mut bytes, n, field.width(), field.order()),
            Checked::Bytes(b) => {
                bytes.extend_from_slice(b);
                bytes.resize(bytes.len() + field.width() - b.len(), 0);
            }
        }
    }

    debug_assert_eq!(bytes.len(), layout.width());
    trace!(layout = %layout, width = bytes.len(), "encoded record");

    Ok(EncodedRecord::from_vec(bytes))
}

/// Decode a buffer produced for `layout` back into values.
///
/// Byte-string fields are returned as their full raw slice, trailing zero
/// padding included.
///
/// # Errors
/// `DecodeError::BufferLengthMismatch` if `buffer.len() != layout.width()`.
pub fn decode(layout: &RecordLayout, buffer: &[u8]) -> Result<RecordValues> {
    if buffer.len() != layout.width() {
        return Err(DecodeError::BufferLengthMismatch {
            expected: layout.width(),
            actual: buffer.len(),
        }
        .into());
    }

    let mut values = Vec::with_capacity(layout.len());
    let mut rest = buffer;

    for field in layout.fields() {
        let (slice, tail) = rest.split_at(field.width());
        rest = tail;

        let value = if field.kind().is_int() {
            Value::Int(read_int(slice, field.order()))
        } else {
            Value::Bytes(slice.to_vec())
        };
        values.push(value);
    }

    trace!(layout = %layout, fields = values.len(), "decoded record");

    Ok(values)
}

/// Check one value against its field.
fn check_value<'a>(index: usize, field: &FieldSpec, value: &'a Value) -> Result<Checked<'a>> {
    let out_of_range = || EncodeError::ValueOutOfRange {
        index,
        kind: field.kind(),
        width: field.width(),
        value: value.clone(),
    };

    match (field.kind(), value) {
        (FieldKind::Bytes, Value::Bytes(b)) => {
            if b.len() > field.width() {
                return Err(EncodeError::StringTooLong {
                    index,
                    width: field.width(),
                    actual: b.len(),
                }
                .into());
            }
            Ok(Checked::Bytes(b.as_slice()))
        }
        (FieldKind::Bytes, Value::Int(_)) => Err(out_of_range().into()),
        (_, Value::Int(n)) => {
            let (min, max) = signed_range(field.width());
            if *n < min || *n > max {
                return Err(out_of_range().into());
            }
            Ok(Checked::Int(*n))
        }
        (_, Value::Bytes(_)) => Err(out_of_range().into()),
    }
}

/// Inclusive bounds of a signed integer `width` bytes wide (1..=8).
pub fn signed_range(width: usize) -> (i64, i64) {
    if width >= 8 {
        return (i64::MIN, i64::MAX);
    }
    let bits = width * 8;
    let max = (1i64 << (bits - 1)) - 1;
    (-max - 1, max)
}

/// Append the low `width` bytes of `n` in the requested order.
fn write_int(out: &mut Vec<u8>, n: i64, width: usize, order: ByteOrder) {
    match order {
        ByteOrder::Big => out.extend_from_slice(&n.to_be_bytes()[8 - width..]),
        ByteOrder::Little => out.extend_from_slice(&n.to_le_bytes()[..width]),
    }
}

/// Read a sign-extended integer from a 1..=8 byte slice.
fn read_int(slice: &[u8], order: ByteOrder) -> i64 {
    let width = slice.len();
    let mut buf = [0u8; 8];

    match order {
        ByteOrder::Big => {
            if slice[0] & 0x80 != 0 {
                buf = [0xff; 8];
            }
            buf[8 - width..].copy_from_slice(slice);
            i64::from_be_bytes(buf)
        }
        ByteOrder::Little => {
            if slice[width - 1] & 0x80 != 0 {
                buf = [0xff; 8];
            }
            buf[..width].copy_from_slice(slice);
            i64::from_le_bytes(buf)
        }
    }
}

/// Reusable encoder/decoder bound to one layout.
///
/// Cloning is cheap: the layout sits behind an `Arc` and is never mutated, so
/// clones can be handed to other threads freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCodec {
    layout: Arc<RecordLayout>,
}

impl RecordCodec {
    pub fn new(layout: RecordLayout) -> Self {
        Self {
            layout: Arc::new(layout),
        }
    }

    pub fn with_shared(layout: Arc<RecordLayout>) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &RecordLayout {
        &self.layout
    }

    /// Total encoded width in bytes.
    pub fn width(&self) -> usize {
        self.layout.width()
    }

    pub fn encode(&self, values: &[Value]) -> Result<EncodedRecord> {
        encode(&self.layout, values)
    }

    pub fn decode(&self, buffer: &[u8]) -> Result<RecordValues> {
        decode(&self.layout, buffer)
    }
}

impl From<RecordLayout> for RecordCodec {
    fn from(layout: RecordLayout) -> Self {
        Self::new(layout)
    }
}
