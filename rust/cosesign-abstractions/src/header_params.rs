// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Header translation.
//!
//! Callers may name header parameters symbolically (`"alg"`, `"kid"`) or by their
//! numeric label. Everything past this module only sees integer-keyed
//! [`HeaderMap`]s.

use std::borrow::Cow;

use crate::{CoseAlgorithm, CoseError, HeaderKey, HeaderMap, HeaderValue, HEADER_ALG, HEADER_KID};

/// Symbolic header parameter names and their labels (IANA COSE Header Parameters).
pub static HEADER_PARAMETERS: [(&str, i64); 12] = [
    ("alg", 1),
    ("crit", 2),
    ("content_type", 3),
    ("ctyp", 3),
    ("kid", 4),
    ("IV", 5),
    ("Partial_IV", 6),
    ("counter_signature", 7),
    ("x5bag", 32),
    ("x5chain", 33),
    ("x5t", 34),
    ("x5u", 35),
];

pub fn header_parameter_id(name: &str) -> Option<i64> {
    HEADER_PARAMETERS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, id)| *id)
}

/// A header parameter as written by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderLabel {
    Id(i64),
    Name(Cow<'static, str>),
}

impl From<i64> for HeaderLabel {
    fn from(v: i64) -> Self {
        Self::Id(v)
    }
}

impl From<i32> for HeaderLabel {
    fn from(v: i32) -> Self {
        Self::Id(i64::from(v))
    }
}

impl From<&'static str> for HeaderLabel {
    fn from(v: &'static str) -> Self {
        Self::Name(Cow::Borrowed(v))
    }
}

impl From<String> for HeaderLabel {
    fn from(v: String) -> Self {
        Self::Name(Cow::Owned(v))
    }
}

/// Caller-facing header bucket, in insertion order.
///
/// ```ignore
/// let protected = Headers::new().with("alg", "ES256").with("kid", b"key-1");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Headers {
    entries: Vec<(HeaderLabel, HeaderValue)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, label: impl Into<HeaderLabel>, value: impl Into<HeaderValue>) -> Self {
        self.insert(label, value);
        self
    }

    pub fn insert(&mut self, label: impl Into<HeaderLabel>, value: impl Into<HeaderValue>) {
        self.entries.push((label.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(HeaderLabel, HeaderValue)> {
        self.entries.iter()
    }
}

/// Translate a caller header bucket into an integer-keyed [`HeaderMap`].
///
/// - Names resolve through [`HEADER_PARAMETERS`]; unknown names fail.
/// - A textual `alg` value resolves through the algorithm registry.
/// - A textual `kid` value becomes its UTF-8 bytes.
/// - Later entries for the same label replace earlier ones.
pub fn translate_headers(headers: &Headers) -> Result<HeaderMap, CoseError> {
    let mut map = HeaderMap::new();
    for (label, value) in headers.iter() {
        let id = match label {
            HeaderLabel::Id(id) => *id,
            HeaderLabel::Name(name) => header_parameter_id(name)
                .ok_or_else(|| CoseError::UnknownHeaderParameter(name.to_string()))?,
        };

        let value = match (id, value) {
            (HEADER_ALG, HeaderValue::Text(name)) => {
                let alg = CoseAlgorithm::from_name(name)
                    .ok_or_else(|| CoseError::UnknownAlgorithmName(name.clone()))?;
                HeaderValue::Int(alg.id())
            }
            (HEADER_KID, HeaderValue::Text(kid)) => HeaderValue::Bytes(kid.as_bytes().to_vec()),
            (_, v) => v.clone(),
        };

        map.insert(HeaderKey::Int(id), value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_ids_translate_to_the_same_map() {
        let by_name = Headers::new().with("alg", -7).with("kid", b"k1");
        let by_id = Headers::new().with(1, -7).with(4, b"k1");

        let a = translate_headers(&by_name).unwrap();
        let b = translate_headers(&by_id).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.get(&HeaderKey::Int(1)), Some(&HeaderValue::Int(-7)));
    }

    #[test]
    fn textual_values_are_normalized() {
        let headers = Headers::new().with("alg", "PS384").with("kid", "key-1");
        let map = translate_headers(&headers).unwrap();
        assert_eq!(map.get(&HeaderKey::Int(1)), Some(&HeaderValue::Int(-38)));
        assert_eq!(
            map.get(&HeaderKey::Int(4)),
            Some(&HeaderValue::Bytes(b"key-1".to_vec()))
        );
    }

    #[test]
    fn unknown_names_fail() {
        let err = translate_headers(&Headers::new().with("algorithm", -7)).unwrap_err();
        assert!(matches!(err, CoseError::UnknownHeaderParameter(n) if n == "algorithm"));

        let err = translate_headers(&Headers::new().with("alg", "ES999")).unwrap_err();
        assert!(matches!(err, CoseError::UnknownAlgorithmName(n) if n == "ES999"));
    }

    #[test]
    fn aliases_and_later_entries() {
        let headers = Headers::new()
            .with("content_type", 0)
            .with("ctyp", 60)
            .with(99, true);
        let map = translate_headers(&headers).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&HeaderKey::Int(3)), Some(&HeaderValue::Int(60)));
        assert_eq!(map.get(&HeaderKey::Int(99)), Some(&HeaderValue::Bool(true)));
    }
}
