//! Compact textual notation for record layouts.
//!
//! ```text
//! >i4sh
//! |||||
//! ||||+-- h: int16
//! |||+--- s: byte string, width 4 (the count before it)
//! ||+---- 4: count
//! |+----- i: int32
//! +------ byte order: '>' or '!' big-endian, '<' little-endian
//! ```
//!
//! | code     | field  |
//! |----------|--------|
//! | `b`      | int8   |
//! | `h`      | int16  |
//! | `i`, `l` | int32  |
//! | `q`      | int64  |
//! | `Ns`     | bytes  |
//!
//! A count before an integer code repeats the field (`2h` is two int16
//! fields). Without a byte-order prefix the layout is big-endian. Native
//! order (`@`, `=`) is rejected. Whitespace between items is ignored.
//!
//! ```
//! use fixrec_core::RecordLayout;
//!
//! let layout: RecordLayout = ">i4sh".parse().unwrap();
//! assert_eq!(layout.width(), 10);
//! assert_eq!(layout.to_string(), ">i4sh");
//! ```

use std::fmt;
use std::iter::Peekable;
use std::str::{CharIndices, FromStr};

use tracing::debug;

use crate::error::{Error, LayoutError, Result};
use crate::layout::{ByteOrder, FieldKind, RecordLayout, MAX_RECORD_WIDTH};

impl FromStr for RecordLayout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let layout = parse(s)?;
        debug!(notation = s, fields = layout.len(), width = layout.width(), "parsed layout");
        Ok(layout)
    }
}

fn parse(s: &str) -> Result<RecordLayout> {
    let mut chars = s.char_indices().peekable();
    skip_whitespace(&mut chars);

    let order = match chars.peek() {
        Some((_, '>' | '!')) => {
            chars.next();
            ByteOrder::Big
        }
        Some((_, '<')) => {
            chars.next();
            ByteOrder::Little
        }
        Some((_, '@' | '=')) => return Err(LayoutError::NativeByteOrder.into()),
        _ => ByteOrder::Big,
    };

    let mut builder = RecordLayout::builder(order);
    let mut fields = 0usize;
    let mut width = 0usize;

    loop {
        skip_whitespace(&mut chars);
        let Some(&(start, _)) = chars.peek() else {
            break;
        };

        let count = parse_count(&mut chars)?;
        if count == Some(0) {
            return Err(LayoutError::ZeroCount { position: start }.into());
        }

        let (position, code) = match chars.next() {
            Some(item) => item,
            None => return Err(LayoutError::TrailingCount { position: start }.into()),
        };

        let kind = match code {
            'b' => FieldKind::Int8,
            'h' => FieldKind::Int16,
            'i' | 'l' => FieldKind::Int32,
            'q' => FieldKind::Int64,
            's' => FieldKind::Bytes,
            found => return Err(LayoutError::Syntax { position, found }.into()),
        };

        let count = count.unwrap_or(1);

        // Bound the total before expanding repeats
        let (field_width, repeats) = match kind.natural_width() {
            Some(natural) => (natural, count),
            None => (count, 1),
        };
        width = field_width
            .checked_mul(repeats)
            .and_then(|added| width.checked_add(added))
            .filter(|w| *w <= MAX_RECORD_WIDTH)
            .ok_or(LayoutError::TooWide {
                index: fields + (MAX_RECORD_WIDTH - width) / field_width,
            })?;
        fields += repeats;

        if kind == FieldKind::Bytes {
            builder = builder.bytes(count);
        } else {
            for _ in 0..count {
                builder = builder.field(kind, 0);
            }
        }
    }

    builder.build()
}

fn skip_whitespace(chars: &mut Peekable<CharIndices<'_>>) {
    while chars.next_if(|(_, c)| c.is_ascii_whitespace()).is_some() {}
}

/// Read an optional decimal count.
fn parse_count(chars: &mut Peekable<CharIndices<'_>>) -> Result<Option<usize>> {
    let mut count: Option<usize> = None;

    while let Some((position, c)) = chars.next_if(|(_, c)| c.is_ascii_digit()) {
        let digit = c as usize - '0' as usize;
        let next = count
            .unwrap_or(0)
            .checked_mul(10)
            .and_then(|n| n.checked_add(digit))
            .ok_or(LayoutError::Syntax { position, found: c })?;
        count = Some(next);
    }

    Ok(count)
}

/// Canonical notation: explicit byte order, one code per field.
impl fmt::Display for RecordLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.byte_order() {
            ByteOrder::Big => f.write_str(">")?,
            ByteOrder::Little => f.write_str("<")?,
        }

        for field in self.fields() {
            match field.kind() {
                FieldKind::Int8 => f.write_str("b")?,
                FieldKind::Int16 => f.write_str("h")?,
                FieldKind::Int32 => f.write_str("i")?,
                FieldKind::Int64 => f.write_str("q")?,
                FieldKind::Bytes => write!(f, "{}s", field.width())?,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FieldSpec;

    #[test]
    fn test_parse_spam_layout() {
        let layout: RecordLayout = ">i4sh".parse().unwrap();
        let expected = RecordLayout::builder(ByteOrder::Big)
            .int32()
            .bytes(4)
            .int16()
            .build()
            .unwrap();

        assert_eq!(layout, expected);
    }

    #[test]
    fn test_byte_order_prefixes() {
        let big: RecordLayout = "!h".parse().unwrap();
        assert_eq!(big.byte_order(), ByteOrder::Big);

        let little: RecordLayout = "<h".parse().unwrap();
        assert_eq!(little.byte_order(), ByteOrder::Little);

        let default: RecordLayout = "h".parse().unwrap();
        assert_eq!(default.byte_order(), ByteOrder::Big);
    }

    #[test]
    fn test_native_order_rejected() {
        assert_eq!(
            "@i".parse::<RecordLayout>(),
            Err(Error::Layout(LayoutError::NativeByteOrder))
        );
        assert_eq!(
            "=i".parse::<RecordLayout>(),
            Err(Error::Layout(LayoutError::NativeByteOrder))
        );
    }

    #[test]
    fn test_repeat_counts() {
        let layout: RecordLayout = "<2h q 10s".parse().unwrap();
        assert_eq!(
            layout.fields(),
            &[
                FieldSpec::int16(ByteOrder::Little),
                FieldSpec::int16(ByteOrder::Little),
                FieldSpec::int64(ByteOrder::Little),
                FieldSpec::bytes(10, ByteOrder::Little),
            ]
        );
        assert_eq!(layout.width(), 22);
    }

    #[test]
    fn test_bare_s_is_one_byte() {
        let layout: RecordLayout = "s".parse().unwrap();
        assert_eq!(layout.fields(), &[FieldSpec::bytes(1, ByteOrder::Big)]);
    }

    #[test]
    fn test_l_is_int32() {
        let layout: RecordLayout = ">l".parse().unwrap();
        assert_eq!(layout.fields()[0].kind(), FieldKind::Int32);
    }

    #[test]
    fn test_zero_count() {
        assert_eq!(
            ">i0s".parse::<RecordLayout>(),
            Err(Error::Layout(LayoutError::ZeroCount { position: 2 }))
        );
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(
            ">ix".parse::<RecordLayout>(),
            Err(Error::Layout(LayoutError::Syntax {
                position: 2,
                found: 'x',
            }))
        );
    }

    #[test]
    fn test_order_only_in_prefix() {
        assert_eq!(
            ">i<h".parse::<RecordLayout>(),
            Err(Error::Layout(LayoutError::Syntax {
                position: 2,
                found: '<',
            }))
        );
    }

    #[test]
    fn test_trailing_count() {
        assert_eq!(
            ">i4".parse::<RecordLayout>(),
            Err(Error::Layout(LayoutError::TrailingCount { position: 2 }))
        );
    }

    #[test]
    fn test_oversized_string_width() {
        assert_eq!(
            "18446744073709551615s".parse::<RecordLayout>(),
            Err(Error::Layout(LayoutError::TooWide { index: 0 }))
        );
        assert_eq!(
            "18446744073709551615s2h".parse::<RecordLayout>(),
            Err(Error::Layout(LayoutError::TooWide { index: 0 }))
        );
        assert_eq!(
            ">h 1048575s".parse::<RecordLayout>(),
            Err(Error::Layout(LayoutError::TooWide { index: 1 }))
        );
    }

    #[test]
    fn test_oversized_repeat_count() {
        assert_eq!(
            "4000000000h".parse::<RecordLayout>(),
            Err(Error::Layout(LayoutError::TooWide {
                index: MAX_RECORD_WIDTH / 2,
            }))
        );
        assert_eq!(
            ">i 18446744073709551615q".parse::<RecordLayout>(),
            Err(Error::Layout(LayoutError::TooWide {
                index: 1 + (MAX_RECORD_WIDTH - 4) / 8,
            }))
        );
    }

    #[test]
    fn test_repeat_count_up_to_limit() {
        let notation = format!("<{}b", MAX_RECORD_WIDTH);
        let layout: RecordLayout = notation.parse().unwrap();
        assert_eq!(layout.len(), MAX_RECORD_WIDTH);
        assert_eq!(layout.width(), MAX_RECORD_WIDTH);
    }

    #[test]
    fn test_empty_notation() {
        assert_eq!("".parse::<RecordLayout>(), Err(Error::Layout(LayoutError::Empty)));
        assert_eq!(" > ".parse::<RecordLayout>(), Err(Error::Layout(LayoutError::Empty)));
    }

    #[test]
    fn test_display_round_trip() {
        for notation in [">i4sh", "<bhiq", ">1s", "<16s2q"] {
            let layout: RecordLayout = notation.parse().unwrap();
            let reparsed: RecordLayout = layout.to_string().parse().unwrap();
            assert_eq!(reparsed, layout);
        }

        let layout: RecordLayout = "<2h".parse().unwrap();
        assert_eq!(layout.to_string(), "<hh");
    }
}
