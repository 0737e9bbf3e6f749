//! fixrec-core: fixed-layout binary record codec
//!
//! Translates an ordered tuple of typed scalars into a fixed-width byte
//! record and back, given a declared field layout.
//!
//! # Architecture
//!
//! - `layout`: field specs and validated record layouts
//! - `notation`: the compact `>i4sh` layout notation (`FromStr` / `Display`)
//! - `value`: scalar values and the immutable encoded record
//! - `codec`: encode/decode and the reusable `RecordCodec` handle
//! - `error`: structured errors per failure domain
//!
//! # Example
//!
//! ```
//! use fixrec_core::{decode, encode, RecordLayout, Value};
//!
//! let layout: RecordLayout = ">i4sh".parse().unwrap();
//! let values = vec![Value::from(7), Value::from(b"spam"), Value::from(8)];
//!
//! let record = encode(&layout, &values).unwrap();
//! assert_eq!(record.as_bytes(), b"\x00\x00\x00\x07spam\x00\x08");
//! assert_eq!(decode(&layout, &record).unwrap(), values);
//! ```
//!
//! # Design Principles
//!
//! - **No panics**: all failures are structured errors
//! - **No partial output**: values are validated before any byte is written
//! - **No I/O**: callers own files and streams; the codec sees only bytes

pub mod codec;
pub mod error;
pub mod layout;
pub mod notation;
pub mod value;

// Re-export commonly used types
pub use codec::{decode, encode, RecordCodec};
pub use error::{Error, Result};
pub use layout::{ByteOrder, FieldKind, FieldSpec, RecordLayout, MAX_RECORD_WIDTH};
pub use value::{EncodedRecord, RecordValues, Value};
