// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! COSE `Sig_structure` construction (RFC 9052 §4.4).
//!
//! ```text
//! Sig_structure = [ context : "Signature" / "Signature1",
//!                   body_protected : bstr,
//!                   ? sign_protected : bstr,   ; COSE_Sign only
//!                   external_aad : bstr,
//!                   payload : bstr ]
//! ```
//!
//! Header buckets are always placed as their encoded bytes, never as live maps.

use std::borrow::Cow;

use minicbor::Encoder;

use cosesign_abstractions::{CoseError, CoseKind, HeaderMap};

use crate::header_map::encode_protected_header_map;

/// The to-be-signed structure for one signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigStructure<'a> {
    kind: CoseKind,
    body_protected: Cow<'a, [u8]>,
    sign_protected: Option<Cow<'a, [u8]>>,
    external_aad: &'a [u8],
    payload: &'a [u8],
}

/// Build a Sig_structure from logical header buckets.
///
/// `sign_protected` must be present for [`CoseKind::Sign`] and absent for
/// [`CoseKind::Sign1`]. `compact_empty` selects the zero-length encoding for empty
/// protected buckets; the verifier must see the same bytes.
pub fn build_sig_structure<'a>(
    kind: CoseKind,
    body_protected: &HeaderMap,
    sign_protected: Option<&HeaderMap>,
    external_aad: &'a [u8],
    payload: &'a [u8],
    compact_empty: bool,
) -> Result<SigStructure<'a>, CoseError> {
    let body = encode_protected_header_map(body_protected, compact_empty)?;
    let sign = sign_protected
        .map(|m| encode_protected_header_map(m, compact_empty))
        .transpose()?;

    SigStructure::new(
        kind,
        Cow::Owned(body),
        sign.map(Cow::Owned),
        external_aad,
        payload,
    )
}

impl<'a> SigStructure<'a> {
    fn new(
        kind: CoseKind,
        body_protected: Cow<'a, [u8]>,
        sign_protected: Option<Cow<'a, [u8]>>,
        external_aad: &'a [u8],
        payload: &'a [u8],
    ) -> Result<Self, CoseError> {
        match (kind, &sign_protected) {
            (CoseKind::Sign, None) => {
                return Err(CoseError::MalformedEnvelope(
                    "COSE_Sign Sig_structure requires signer protected headers".to_string(),
                ))
            }
            (CoseKind::Sign1, Some(_)) => {
                return Err(CoseError::MalformedEnvelope(
                    "COSE_Sign1 Sig_structure has no signer protected headers".to_string(),
                ))
            }
            _ => {}
        }

        Ok(Self {
            kind,
            body_protected,
            sign_protected,
            external_aad,
            payload,
        })
    }

    /// Rebuild a Sig_structure from the exact protected bytes carried on the wire.
    pub fn from_encoded(
        kind: CoseKind,
        body_protected: &'a [u8],
        sign_protected: Option<&'a [u8]>,
        external_aad: &'a [u8],
        payload: &'a [u8],
    ) -> Result<Self, CoseError> {
        Self::new(
            kind,
            Cow::Borrowed(body_protected),
            sign_protected.map(Cow::Borrowed),
            external_aad,
            payload,
        )
    }

    pub fn kind(&self) -> CoseKind {
        self.kind
    }

    pub fn body_protected(&self) -> &[u8] {
        &self.body_protected
    }

    pub fn sign_protected(&self) -> Option<&[u8]> {
        self.sign_protected.as_deref()
    }

    pub fn external_aad(&self) -> &[u8] {
        self.external_aad
    }

    pub fn payload(&self) -> &[u8] {
        self.payload
    }

    /// Encode to the ToBeSigned bytes.
    pub fn to_be_signed(&self) -> Result<Vec<u8>, CoseError> {
        let len = if self.sign_protected.is_some() { 5 } else { 4 };
        let mut out = Vec::with_capacity(
            32 + self.body_protected.len()
                + self.sign_protected.as_ref().map_or(0, |s| s.len())
                + self.external_aad.len()
                + self.payload.len(),
        );

        let mut enc = Encoder::new(&mut out);
        enc.array(len).map_err(CoseError::encoding)?;
        enc.str(self.kind.context()).map_err(CoseError::encoding)?;
        enc.bytes(&self.body_protected).map_err(CoseError::encoding)?;
        if let Some(sign) = &self.sign_protected {
            enc.bytes(sign).map_err(CoseError::encoding)?;
        }
        enc.bytes(self.external_aad).map_err(CoseError::encoding)?;
        enc.bytes(self.payload).map_err(CoseError::encoding)?;

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosesign_abstractions::{HeaderKey, HeaderValue};

    fn alg(id: i64) -> HeaderMap {
        let mut m = HeaderMap::new();
        m.insert(HeaderKey::Int(1), HeaderValue::Int(id));
        m
    }

    #[test]
    fn signature1_layout() {
        let s = build_sig_structure(CoseKind::Sign1, &alg(-7), None, b"", b"hello", false).unwrap();
        assert_eq!(
            hex::encode(s.to_be_signed().unwrap()),
            // ["Signature1", h'a10126', h'', h'68656c6c6f']
            "846a5369676e61747572653143a101264045\
             68656c6c6f"
        );
    }

    #[test]
    fn signature_layout_includes_signer_protected() {
        let s = build_sig_structure(
            CoseKind::Sign,
            &HeaderMap::new(),
            Some(&alg(-7)),
            b"aad",
            b"p",
            true,
        )
        .unwrap();
        assert_eq!(s.body_protected(), b"");
        assert_eq!(
            hex::encode(s.to_be_signed().unwrap()),
            // ["Signature", h'', h'a10126', h'616164', h'70']
            "85695369676e61747572654043a10126436161644170"
        );
    }

    #[test]
    fn kind_and_signer_bucket_must_agree() {
        assert!(SigStructure::from_encoded(CoseKind::Sign, b"", None, b"", b"").is_err());
        assert!(SigStructure::from_encoded(CoseKind::Sign1, b"", Some(&[][..]), b"", b"").is_err());
    }

    #[test]
    fn from_encoded_matches_build() {
        let built =
            build_sig_structure(CoseKind::Sign1, &alg(-35), None, b"x", b"y", false).unwrap();
        let rebuilt =
            SigStructure::from_encoded(CoseKind::Sign1, &[0xa1, 0x01, 0x38, 0x22], None, b"x", b"y")
                .unwrap();
        assert_eq!(built.to_be_signed().unwrap(), rebuilt.to_be_signed().unwrap());
    }
}
