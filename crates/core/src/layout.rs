//! Record layouts: the ordered field declarations a record is encoded against.
//!
//! A layout is a non-empty sequence of [`FieldSpec`] entries. Each entry names
//! a semantic type, a byte width and a byte order. Fields are laid out back to
//! back with no alignment padding, so the record width is the sum of the field
//! widths.
//!
//! # Example
//!
//! ```
//! use fixrec_core::layout::{ByteOrder, RecordLayout};
//!
//! let layout = RecordLayout::builder(ByteOrder::Big)
//!     .int32()
//!     .bytes(4)
//!     .int16()
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(layout.len(), 3);
//! assert_eq!(layout.width(), 10);
//! assert_eq!(layout.offsets(), vec![0, 4, 8]);
//! ```
//!
//! # Invariants
//!
//! - at least one field
//! - every field width > 0
//! - integer fields use their natural width (1, 2, 4 or 8 bytes)
//! - every field shares the layout's byte order
//! - total width <= [`MAX_RECORD_WIDTH`]

use std::fmt;

use crate::error::{LayoutError, Result};

/// Largest record a layout may describe, in bytes (1 MiB).
pub const MAX_RECORD_WIDTH: usize = 1 << 20;

/// Byte order of multi-byte integer fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Most significant byte first
    Big,
    /// Least significant byte first
    Little,
}

/// Semantic type tag of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Int8,
    Int16,
    Int32,
    Int64,
    /// Fixed-length byte string, zero-padded on encode
    Bytes,
}

impl FieldKind {
    /// Width an integer kind always occupies, `None` for byte strings.
    pub const fn natural_width(self) -> Option<usize> {
        match self {
            FieldKind::Int8 => Some(1),
            FieldKind::Int16 => Some(2),
            FieldKind::Int32 => Some(4),
            FieldKind::Int64 => Some(8),
            FieldKind::Bytes => None,
        }
    }

    pub const fn is_int(self) -> bool {
        !matches!(self, FieldKind::Bytes)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Int8 => "int8",
            FieldKind::Int16 => "int16",
            FieldKind::Int32 => "int32",
            FieldKind::Int64 => "int64",
            FieldKind::Bytes => "bytes",
        };
        f.write_str(name)
    }
}

/// Declared type, width and byte order for one position in a record.
///
/// A `FieldSpec` on its own is just a triple; it is checked when placed in a
/// [`RecordLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    kind: FieldKind,
    width: usize,
    order: ByteOrder,
}

impl FieldSpec {
    pub const fn new(kind: FieldKind, width: usize, order: ByteOrder) -> Self {
        Self { kind, width, order }
    }

    pub const fn int8(order: ByteOrder) -> Self {
        Self::new(FieldKind::Int8, 1, order)
    }

    pub const fn int16(order: ByteOrder) -> Self {
        Self::new(FieldKind::Int16, 2, order)
    }

    pub const fn int32(order: ByteOrder) -> Self {
        Self::new(FieldKind::Int32, 4, order)
    }

    pub const fn int64(order: ByteOrder) -> Self {
        Self::new(FieldKind::Int64, 8, order)
    }

    /// Fixed-length byte string of `width` bytes.
    pub const fn bytes(width: usize, order: ByteOrder) -> Self {
        Self::new(FieldKind::Bytes, width, order)
    }

    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn order(&self) -> ByteOrder {
        self.order
    }

    /// Check the width rules for the field at position `index`.
    fn validate(&self, index: usize) -> Result<()> {
        if self.width == 0 {
            return Err(LayoutError::ZeroWidth { index }.into());
        }

        if let Some(expected) = self.kind.natural_width() {
            if self.width != expected {
                return Err(LayoutError::WidthMismatch {
                    index,
                    kind: self.kind,
                    expected,
                    actual: self.width,
                }
                .into());
            }
        }

        Ok(())
    }
}

/// Ordered, validated sequence of fields describing a whole record.
///
/// Immutable once built. Share it by reference or behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordLayout {
    fields: Box<[FieldSpec]>,
    width: usize,
    order: ByteOrder,
}

impl RecordLayout {
    /// Build a layout from explicit field specs.
    ///
    /// # Errors
    /// - `LayoutError::Empty` if `fields` is empty
    /// - `LayoutError::ZeroWidth` / `LayoutError::WidthMismatch` for bad widths
    /// - `LayoutError::MixedByteOrder` if fields disagree on byte order
    /// - `LayoutError::TooWide` if the total width exceeds `MAX_RECORD_WIDTH`
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self> {
        let order = match fields.first() {
            Some(first) => first.order,
            None => return Err(LayoutError::Empty.into()),
        };

        let mut width = 0usize;
        for (index, field) in fields.iter().enumerate() {
            field.validate(index)?;
            if field.order != order {
                return Err(LayoutError::MixedByteOrder { index }.into());
            }
            width = width
                .checked_add(field.width)
                .filter(|w| *w <= MAX_RECORD_WIDTH)
                .ok_or(LayoutError::TooWide { index })?;
        }

        Ok(Self {
            fields: fields.into_boxed_slice(),
            width,
            order,
        })
    }

    /// Start a layout whose fields all use `order`.
    pub fn builder(order: ByteOrder) -> RecordLayoutBuilder {
        RecordLayoutBuilder {
            order,
            fields: Vec::new(),
        }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false for a constructed layout.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Total encoded width in bytes.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Byte offset at which each field starts.
    pub fn offsets(&self) -> Vec<usize> {
        self.fields
            .iter()
            .scan(0, |offset, field| {
                let start = *offset;
                *offset += field.width;
                Some(start)
            })
            .collect()
    }
}

/// Chained construction of a single-byte-order [`RecordLayout`].
#[derive(Debug, Clone)]
pub struct RecordLayoutBuilder {
    order: ByteOrder,
    fields: Vec<FieldSpec>,
}

impl RecordLayoutBuilder {
    pub fn int8(mut self) -> Self {
        self.fields.push(FieldSpec::int8(self.order));
        self
    }

    pub fn int16(mut self) -> Self {
        self.fields.push(FieldSpec::int16(self.order));
        self
    }

    pub fn int32(mut self) -> Self {
        self.fields.push(FieldSpec::int32(self.order));
        self
    }

    pub fn int64(mut self) -> Self {
        self.fields.push(FieldSpec::int64(self.order));
        self
    }

    pub fn bytes(mut self, width: usize) -> Self {
        self.fields.push(FieldSpec::bytes(width, self.order));
        self
    }

    /// Append a field of the given kind at its natural width.
    ///
    /// Byte strings take `width`; integer kinds ignore it.
    pub fn field(self, kind: FieldKind, width: usize) -> Self {
        match kind {
            FieldKind::Int8 => self.int8(),
            FieldKind::Int16 => self.int16(),
            FieldKind::Int32 => self.int32(),
            FieldKind::Int64 => self.int64(),
            FieldKind::Bytes => self.bytes(width),
        }
    }

    pub fn build(self) -> Result<RecordLayout> {
        RecordLayout::new(self.fields)
    }
}
