//! Subcommand implementations.
//!
//! Each command prints its results to stdout and returns what it decoded or
//! encoded so callers (and tests) can inspect it.

use std::path::Path;

use anyhow::{Context, Result};
use fixrec_core::value::format_values;
use fixrec_core::{EncodedRecord, RecordCodec, RecordLayout, RecordValues, Value};
use tracing::info;

use crate::config::{Action, DEMO_LAYOUT};
use crate::{sample, store};

pub fn run(action: &Action) -> Result<()> {
    match action {
        Action::Demo { out } => demo(out).map(drop),
        Action::Pack {
            layout,
            values,
            out,
        } => pack(layout, values, out).map(drop),
        Action::Unpack { layout, input } => unpack(layout, input).map(drop),
        Action::Sample { layout, seed, out } => sample(layout, *seed, out.as_deref()).map(drop),
    }
}

/// Pack `(7, b"spam", 8)`, write it, read it back and unpack it.
pub fn demo(out: &Path) -> Result<RecordValues> {
    let layout: RecordLayout = DEMO_LAYOUT.parse()?;
    let codec = RecordCodec::new(layout);

    let values = vec![Value::from(7), Value::from(b"spam"), Value::from(8)];
    let record = codec.encode(&values)?;
    println!("packed:   {}", bytes_literal(&record));
    println!("hex:      {}", hex::encode(&record));

    let written = store::write_record(out, &record)?;
    println!("written:  {written} bytes to {}", out.display());

    let data = store::read_record(out, codec.width())?;
    println!("read:     {}", bytes_literal(&data));

    let decoded = codec
        .decode(&data)
        .with_context(|| format!("cannot decode {}", out.display()))?;
    println!("unpacked: {}", format_values(&decoded));

    Ok(decoded)
}

/// Encode `values` against `layout` and write the record to `out`.
pub fn pack(layout: &RecordLayout, values: &[Value], out: &Path) -> Result<EncodedRecord> {
    let record = fixrec_core::encode(layout, values)
        .with_context(|| format!("cannot pack {} with layout {layout}", format_values(values)))?;

    let written = store::write_record(out, &record)?;
    println!("{}", hex::encode(&record));
    info!(layout = %layout, bytes = written, "packed record");

    Ok(record)
}

/// Read a record file and print its values.
pub fn unpack(layout: &RecordLayout, input: &Path) -> Result<RecordValues> {
    let codec = RecordCodec::new(layout.clone());
    let values = store::load_record(input, &codec)?;
    println!("{}", format_values(&values));
    Ok(values)
}

/// Generate a record for `layout`, print it and optionally write it.
pub fn sample(layout: &RecordLayout, seed: u64, out: Option<&Path>) -> Result<EncodedRecord> {
    let (values, record) = sample::generate_record(layout, seed)?;
    println!("values: {}", format_values(&values));
    println!("hex:    {}", hex::encode(&record));

    if let Some(path) = out {
        store::write_record(path, &record)?;
    }

    Ok(record)
}

/// Render raw bytes the way a byte-string literal reads: `b"\x00spam"`.
fn bytes_literal(bytes: &[u8]) -> String {
    Value::from(bytes).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.bin");

        let decoded = demo(&path).unwrap();
        assert_eq!(
            decoded,
            vec![Value::from(7), Value::from(b"spam"), Value::from(8)]
        );
        assert_eq!(std::fs::read(&path).unwrap().len(), 10);
    }

    #[test]
    fn test_pack_then_unpack() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rec.bin");
        let layout: RecordLayout = "<q 6s b".parse().unwrap();

        let values = vec![Value::Int(-123_456_789), Value::from("eggs"), Value::Int(-1)];
        let record = pack(&layout, &values, &path).unwrap();
        assert_eq!(record.len(), 15);

        let decoded = unpack(&layout, &path).unwrap();
        assert_eq!(decoded[0], Value::Int(-123_456_789));
        assert_eq!(decoded[1], Value::from(b"eggs\0\0"));
        assert_eq!(decoded[2], Value::Int(-1));
    }

    #[test]
    fn test_pack_error_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.bin");
        let layout: RecordLayout = ">i4sh".parse().unwrap();

        let values = vec![Value::from(7), Value::from("toolong"), Value::from(8)];
        assert!(pack(&layout, &values, &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_unpack_with_wrong_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rec.bin");
        let layout: RecordLayout = ">i4sh".parse().unwrap();
        pack(
            &layout,
            &[Value::from(7), Value::from("spam"), Value::from(8)],
            &path,
        )
        .unwrap();

        let wider: RecordLayout = ">q4sh".parse().unwrap();
        assert!(unpack(&wider, &path).is_err());
    }

    #[test]
    fn test_sample_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.bin");
        let layout: RecordLayout = ">i4sh".parse().unwrap();

        let record = sample(&layout, 7, Some(&path)).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), record.as_bytes());
    }
}
