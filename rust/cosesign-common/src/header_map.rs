// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! COSE header map encoding and decoding.
//!
//! COSE header parameters live in two header maps:
//! - Protected headers: encoded as a CBOR bstr containing a CBOR map
//! - Unprotected headers: encoded as an inline CBOR map
//!
//! Decoding is conservative: indefinite-length arrays/maps and unsupported
//! key/value types are rejected with clear errors.
//!
//! Encoding has two modes. [`EncodingMode::Canonical`] follows RFC 8949 §4.2.1
//! (shortest-form integers, map entries sorted by the bytes of their encoded
//! keys) and is used wherever the bytes are signed or compared.
//! [`EncodingMode::Ordered`] writes entries in [`HeaderMap`] order.

use cosesign_abstractions::{CoseError, HeaderKey, HeaderMap, HeaderValue};
use minicbor::data::Type;
use minicbor::{Decoder, Encoder};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum EncodingMode {
    #[default]
    Canonical,
    Ordered,
}

/// Encode a header map as a standalone CBOR map.
pub fn encode_header_map(map: &HeaderMap, mode: EncodingMode) -> Result<Vec<u8>, CoseError> {
    let mut out = Vec::new();
    write_map(&mut out, map, mode)?;
    Ok(out)
}

/// Encode protected headers into the bytes carried inside the protected bstr.
///
/// With `compact_empty`, an empty map encodes as zero bytes rather than `0xa0`.
pub fn encode_protected_header_map(
    map: &HeaderMap,
    compact_empty: bool,
) -> Result<Vec<u8>, CoseError> {
    if map.is_empty() && compact_empty {
        return Ok(Vec::new());
    }
    encode_header_map(map, EncodingMode::Canonical)
}

fn write_key(out: &mut Vec<u8>, key: &HeaderKey) -> Result<(), CoseError> {
    let mut enc = Encoder::new(out);
    match key {
        HeaderKey::Int(i) => enc.i64(*i).map_err(CoseError::encoding)?,
        HeaderKey::Text(s) => enc.str(s).map_err(CoseError::encoding)?,
    };
    Ok(())
}

fn write_map(out: &mut Vec<u8>, map: &HeaderMap, mode: EncodingMode) -> Result<(), CoseError> {
    Encoder::new(&mut *out)
        .map(map.len() as u64)
        .map_err(CoseError::encoding)?;

    match mode {
        EncodingMode::Ordered => {
            for (k, v) in map {
                write_key(out, k)?;
                write_value(out, v, mode)?;
            }
        }
        EncodingMode::Canonical => {
            let mut entries = Vec::with_capacity(map.len());
            for (k, v) in map {
                let mut key_bytes = Vec::new();
                write_key(&mut key_bytes, k)?;
                entries.push((key_bytes, v));
            }
            entries.sort_by(|a, b| a.0.cmp(&b.0));

            for (key_bytes, v) in entries {
                out.extend_from_slice(&key_bytes);
                write_value(out, v, mode)?;
            }
        }
    }
    Ok(())
}

fn write_value(
    out: &mut Vec<u8>,
    value: &HeaderValue,
    mode: EncodingMode,
) -> Result<(), CoseError> {
    let mut enc = Encoder::new(&mut *out);
    match value {
        HeaderValue::Int(i) => {
            enc.i64(*i).map_err(CoseError::encoding)?;
        }
        HeaderValue::Bytes(b) => {
            enc.bytes(b).map_err(CoseError::encoding)?;
        }
        HeaderValue::Text(s) => {
            enc.str(s).map_err(CoseError::encoding)?;
        }
        HeaderValue::Bool(b) => {
            enc.bool(*b).map_err(CoseError::encoding)?;
        }
        HeaderValue::Null => {
            enc.null().map_err(CoseError::encoding)?;
        }
        HeaderValue::Array(items) => {
            enc.array(items.len() as u64).map_err(CoseError::encoding)?;
            for it in items {
                write_value(out, it, mode)?;
            }
        }
        HeaderValue::Map(m) => write_map(out, m, mode)?,
    }
    Ok(())
}

/// Decode a header map from the CBOR bytes contained within a protected header bstr.
///
/// An empty bstr decodes to an empty map.
pub fn decode_header_map_from_cbor(bytes: &[u8]) -> Result<HeaderMap, String> {
    if bytes.is_empty() {
        return Ok(HeaderMap::new());
    }

    let mut dec = Decoder::new(bytes);
    let map = decode_header_map_from_decoder(&mut dec)?;

    if dec.position() != bytes.len() {
        return Err("trailing bytes after header map".to_string());
    }

    Ok(map)
}

/// Decode a header map directly from a CBOR decoder.
///
/// This is used for unprotected headers, which appear inline in the envelope.
pub fn decode_header_map_from_decoder(dec: &mut Decoder<'_>) -> Result<HeaderMap, String> {
    decode_map_at(dec, 0)
}

/// Nested arrays and maps deeper than this are rejected.
const MAX_HEADER_DEPTH: usize = 32;

fn decode_map_at(dec: &mut Decoder<'_>, depth: usize) -> Result<HeaderMap, String> {
    let len = dec
        .map()
        .map_err(|e| format!("failed to read map: {e}"))?
        .ok_or_else(|| "indefinite-length maps are not supported".to_string())?;

    let mut map = HeaderMap::new();
    for _ in 0..len {
        let key = decode_header_key(dec)?;
        let value = decode_header_value(dec, depth)?;
        map.insert(key, value);
    }

    Ok(map)
}

fn is_int(t: Type) -> bool {
    matches!(
        t,
        Type::I8
            | Type::I16
            | Type::I32
            | Type::I64
            | Type::Int
            | Type::U8
            | Type::U16
            | Type::U32
            | Type::U64
    )
}

/// COSE keys are most often small integers, but may also be text.
fn decode_header_key(dec: &mut Decoder<'_>) -> Result<HeaderKey, String> {
    match dec.datatype().map_err(|e| e.to_string())? {
        t if is_int(t) => {
            let i = dec
                .i64()
                .map_err(|e| format!("failed to decode int header key: {e}"))?;
            Ok(HeaderKey::Int(i))
        }
        Type::String => {
            let s = dec
                .str()
                .map_err(|e| format!("failed to decode text header key: {e}"))?;
            Ok(HeaderKey::Text(s.to_string()))
        }
        other => Err(format!("unsupported header key type: {other:?}")),
    }
}

fn decode_header_value(dec: &mut Decoder<'_>, depth: usize) -> Result<HeaderValue, String> {
    let datatype = dec.datatype().map_err(|e| e.to_string())?;
    if matches!(datatype, Type::Array | Type::Map) && depth >= MAX_HEADER_DEPTH {
        return Err("header nesting too deep".to_string());
    }

    match datatype {
        Type::Null => {
            dec.null().map_err(|e| e.to_string())?;
            Ok(HeaderValue::Null)
        }
        Type::Bool => {
            let b = dec.bool().map_err(|e| e.to_string())?;
            Ok(HeaderValue::Bool(b))
        }
        Type::Bytes => {
            let b = dec.bytes().map_err(|e| e.to_string())?;
            Ok(HeaderValue::Bytes(b.to_vec()))
        }
        Type::String => {
            let s = dec.str().map_err(|e| e.to_string())?;
            Ok(HeaderValue::Text(s.to_string()))
        }
        t if is_int(t) => {
            let i = dec.i64().map_err(|e| e.to_string())?;
            Ok(HeaderValue::Int(i))
        }
        Type::Array => {
            let len = dec
                .array()
                .map_err(|e| format!("failed to read array: {e}"))?
                .ok_or_else(|| "indefinite-length arrays are not supported".to_string())?;
            let mut out = Vec::with_capacity(len.min(64) as usize);
            for _ in 0..len {
                out.push(decode_header_value(dec, depth + 1)?);
            }
            Ok(HeaderValue::Array(out))
        }
        Type::Map => {
            let nested = decode_map_at(dec, depth + 1)
                .map_err(|e| format!("failed to read nested map: {e}"))?;
            Ok(HeaderValue::Map(nested))
        }
        other => Err(format!("unsupported header value type: {other:?}")),
    }
}
