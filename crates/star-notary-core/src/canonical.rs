//! Canonical CBOR encoding for deterministic block hashing.
//!
//! This module implements RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats (timestamps are integer seconds)
//!
//! The hashed document is always
//! `{ height, time, previousBlockHash, hash: "", body }`, with a star body
//! encoded as `{ address, star: { ra, dec, mag, con, story } }`. The field set
//! is fixed here, not derived from struct layout, so the same block hashes to
//! the same digest on every platform. `storyDecoded` is never part of it.

use ciborium::value::Value;

use crate::block::{Block, BlockBody, StarRecord};
use crate::crypto::Sha256Hash;
use crate::error::CoreError;

/// Field names of the hashed document.
mod keys {
    pub const HEIGHT: &str = "height";
    pub const TIME: &str = "time";
    pub const PREVIOUS_BLOCK_HASH: &str = "previousBlockHash";
    pub const HASH: &str = "hash";
    pub const BODY: &str = "body";

    pub const ADDRESS: &str = "address";
    pub const STAR: &str = "star";

    pub const RA: &str = "ra";
    pub const DEC: &str = "dec";
    pub const MAG: &str = "mag";
    pub const CON: &str = "con";
    pub const STORY: &str = "story";
}

/// Encode a block to canonical CBOR bytes with its hash field cleared.
pub fn canonical_block_bytes(block: &Block) -> Result<Vec<u8>, CoreError> {
    let value = block_to_cbor_value(block);
    let mut buf = Vec::new();
    encode_value_to(&mut buf, &value)?;
    Ok(buf)
}

/// SHA-256 of the canonical encoding.
pub fn block_hash(block: &Block) -> Result<Sha256Hash, CoreError> {
    Ok(Sha256Hash::hash(&canonical_block_bytes(block)?))
}

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn block_to_cbor_value(block: &Block) -> Value {
    let body = match &block.body {
        BlockBody::Genesis(marker) => text(marker),
        BlockBody::Star(record) => star_record_to_cbor_value(record),
    };

    Value::Map(vec![
        (text(keys::HEIGHT), Value::Integer(block.height.into())),
        (text(keys::TIME), Value::Integer(block.time.into())),
        (
            text(keys::PREVIOUS_BLOCK_HASH),
            text(&block.previous_block_hash),
        ),
        // Always hashed as empty
        (text(keys::HASH), text("")),
        (text(keys::BODY), body),
    ])
}

fn star_record_to_cbor_value(record: &StarRecord) -> Value {
    let star = Value::Map(vec![
        (text(keys::RA), text(&record.star.ra)),
        (text(keys::DEC), text(&record.star.dec)),
        (text(keys::MAG), text(&record.star.mag)),
        (text(keys::CON), text(&record.star.con)),
        (text(keys::STORY), text(&record.star.story_hex)),
    ]);

    Value::Map(vec![
        (text(keys::ADDRESS), text(&record.address)),
        (text(keys::STAR), star),
    ])
}

/// Recursively encode a CBOR value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) -> Result<(), CoreError> {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Text(s) => encode_text(buf, s),
        Value::Map(entries) => encode_map_canonical(buf, entries)?,
        other => {
            return Err(CoreError::EncodingError(format!(
                "unsupported CBOR value in canonical encoding: {:?}",
                other
            )))
        }
    }
    Ok(())
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: ciborium::value::Integer) {
    let n: i128 = i.into();

    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        encode_uint(buf, 1, (-1 - n) as u64);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) -> Result<(), CoreError> {
    let mut pairs = Vec::with_capacity(entries.len());
    for (k, v) in entries {
        let mut key_buf = Vec::new();
        encode_value_to(&mut key_buf, k)?;
        pairs.push((key_buf, v));
    }

    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, pairs.len() as u64);
    for (key_bytes, value) in pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value)?;
    }
    Ok(())
}
