// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! COSE header map types.

use std::collections::BTreeMap;

/// Header label for `alg`.
pub const HEADER_ALG: i64 = 1;

/// Header label for `kid`.
pub const HEADER_KID: i64 = 4;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeaderKey {
    /// Integer label (the most common COSE header key form).
    Int(i64),
    /// Text label.
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    Int(i64),
    Bytes(Vec<u8>),
    Text(String),
    Array(Vec<HeaderValue>),
    Map(HeaderMap),
    Bool(bool),
    Null,
}

/// A logical header bucket (protected or unprotected).
///
/// Iteration order is the `HeaderKey` order; canonical CBOR ordering is applied
/// by the encoder, not by this type.
pub type HeaderMap = BTreeMap<HeaderKey, HeaderValue>;

impl From<i64> for HeaderValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for HeaderValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<bool> for HeaderValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for HeaderValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&[u8]> for HeaderValue {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for HeaderValue {
    fn from(v: &[u8; N]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl From<Vec<u8>> for HeaderValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<HeaderMap> for HeaderValue {
    fn from(v: HeaderMap) -> Self {
        Self::Map(v)
    }
}

/// A header bucket decoded from an envelope.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CoseHeaderMap {
    /// For protected headers, COSE requires the original CBOR bytes (bstr content)
    /// to be included in Sig_structure. We retain those bytes to avoid re-encoding.
    encoded_map_cbor: Vec<u8>,

    /// Decoded map used for lookups.
    map: HeaderMap,
}

impl CoseHeaderMap {
    /// Construct a protected header map from its original CBOR bytes + decoded map.
    pub fn new_protected(encoded_map_cbor: Vec<u8>, map: HeaderMap) -> Self {
        Self { encoded_map_cbor, map }
    }

    /// Construct an unprotected header map from a decoded map.
    ///
    /// Unprotected headers are not part of Sig_structure, so `encoded_map_cbor` is empty.
    pub fn new_unprotected(map: HeaderMap) -> Self {
        Self {
            encoded_map_cbor: Vec::new(),
            map,
        }
    }

    pub fn encoded_map_cbor(&self) -> &[u8] {
        &self.encoded_map_cbor
    }

    pub fn get_i64(&self, key: i64) -> Option<i64> {
        self.map.get(&HeaderKey::Int(key)).and_then(|v| match v {
            HeaderValue::Int(i) => Some(*i),
            _ => None,
        })
    }

    pub fn get_bytes(&self, key: i64) -> Option<&[u8]> {
        self.map.get(&HeaderKey::Int(key)).and_then(|v| match v {
            HeaderValue::Bytes(b) => Some(b.as_slice()),
            _ => None,
        })
    }

    /// The `kid` header as raw bytes.
    ///
    /// Text-valued `kid`s (written by some producers) compare as their UTF-8 bytes.
    pub fn kid(&self) -> Option<&[u8]> {
        self.map.get(&HeaderKey::Int(HEADER_KID)).and_then(|v| match v {
            HeaderValue::Bytes(b) => Some(b.as_slice()),
            HeaderValue::Text(s) => Some(s.as_bytes()),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn map(&self) -> &HeaderMap {
        &self.map
    }
}
