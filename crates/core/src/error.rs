//! Error types for the fixrec codec.
//!
//! All operations return structured errors rather than panicking, so callers
//! can tell a wrong value count from a value that will not fit from a
//! truncated buffer.

use thiserror::Error;

use crate::layout::FieldKind;
use crate::value::Value;

/// Top-level error type for all operations in the crate.
///
/// Each variant corresponds to a specific failure domain:
/// - Layout: building or parsing a record layout
/// - Encode: values that do not fit the layout
/// - Decode: buffers that do not match the layout
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Layout construction or notation parsing failed
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Values could not be encoded against the layout
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Buffer could not be decoded against the layout
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Layout construction and notation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// A layout needs at least one field
    #[error("layout has no fields")]
    Empty,

    /// Field widths must be positive
    #[error("field {index} has zero width")]
    ZeroWidth { index: usize },

    /// Integer fields must use their natural width
    #[error("field {index} ({kind}) must be {expected} bytes wide, got {actual}")]
    WidthMismatch {
        index: usize,
        kind: FieldKind,
        expected: usize,
        actual: usize,
    },

    /// All fields of a layout share one byte order
    #[error("field {index} byte order differs from the rest of the layout")]
    MixedByteOrder { index: usize },

    /// Unexpected character in layout notation
    #[error("unexpected {found:?} at position {position} in layout notation")]
    Syntax { position: usize, found: char },

    /// Native byte order (`@` or `=`) depends on the host and is not supported
    #[error("native byte order is not supported; use '>' or '<'")]
    NativeByteOrder,

    /// Notation ends with a count that has no field code after it
    #[error("count at position {position} is not followed by a field code")]
    TrailingCount { position: usize },

    /// Total width would exceed `MAX_RECORD_WIDTH`
    #[error("field {index} takes the record past {} bytes", crate::layout::MAX_RECORD_WIDTH)]
    TooWide { index: usize },

    /// A repeat count or string width of zero
    #[error("zero count at position {position} in layout notation")]
    ZeroCount { position: usize },
}

/// Encoding errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// Number of values differs from number of fields
    #[error("expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Value cannot be represented in the field
    #[error("value {value} cannot be stored in field {index} ({kind}, {width} bytes)")]
    ValueOutOfRange {
        index: usize,
        kind: FieldKind,
        width: usize,
        value: Value,
    },

    /// Byte string longer than its field
    #[error("byte string of {actual} bytes does not fit field {index} ({width} bytes)")]
    StringTooLong {
        index: usize,
        width: usize,
        actual: usize,
    },
}

/// Decoding errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Buffer length differs from the layout's total width
    #[error("buffer length mismatch: layout needs {expected} bytes, got {actual}")]
    BufferLengthMismatch { expected: usize, actual: usize },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
