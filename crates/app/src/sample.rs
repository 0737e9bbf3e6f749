//! Sample record generation.
//!
//! Produces values that always fit a layout, so the encoded output can be
//! inspected without typing values by hand.
//!
//! # Design
//!
//! - Integers are drawn uniformly over the field's full signed range
//! - Byte strings get a random length in `0..=width` from a printable
//!   alphabet, so decoded output shows the zero padding
//!
//! All randomness comes from a seeded ChaCha8 RNG; the same seed and layout
//! give the same values.

use fixrec_core::codec::signed_range;
use fixrec_core::{encode, EncodedRecord, FieldSpec, RecordLayout, Result, Value};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generate one value per field of `layout`.
pub fn generate_values(layout: &RecordLayout, seed: u64) -> Vec<Value> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    layout
        .fields()
        .iter()
        .map(|field| random_value(&mut rng, field))
        .collect()
}

/// Generate values for `layout` and encode them.
pub fn generate_record(layout: &RecordLayout, seed: u64) -> Result<(Vec<Value>, EncodedRecord)> {
    let values = generate_values(layout, seed);
    let record = encode(layout, &values)?;
    Ok((values, record))
}

fn random_value(rng: &mut ChaCha8Rng, field: &FieldSpec) -> Value {
    if field.kind().is_int() {
        let (min, max) = signed_range(field.width());
        Value::Int(rng.gen_range(min..=max))
    } else {
        let len = rng.gen_range(0..=field.width());
        let bytes = (0..len)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())])
            .collect();
        Value::Bytes(bytes)
    }
}
