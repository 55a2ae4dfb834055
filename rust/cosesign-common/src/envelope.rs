// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! COSE_Sign / COSE_Sign1 envelope parsing and encoding.
//!
//! ```text
//! COSE_Sign1 = [ protected : bstr, unprotected : map,
//!                payload : bstr / nil, signature : bstr ]
//!
//! COSE_Sign  = [ protected : bstr, unprotected : map,
//!                payload : bstr / nil, signatures : [+ COSE_Signature] ]
//!
//! COSE_Signature = [ protected : bstr, unprotected : map, signature : bstr ]
//! ```
//!
//! The parser is deliberately strict:
//! - Rejects empty input and trailing bytes.
//! - Accepts tag 18 (COSE_Sign1) or tag 98 (COSE_Sign); any other tag is an error.
//!   Untagged input is read as the caller-supplied default kind.
//! - Requires definite-length arrays and maps of the expected sizes.

use minicbor::data::{Tag, Type};
use minicbor::{Decoder, Encoder};

use cosesign_abstractions::{
    CoseError, CoseHeaderMap, CoseKind, HeaderMap, ParsedCose, ParsedCoseSign, ParsedCoseSign1,
    ParsedCoseSigner,
};

use crate::header_map::{
    decode_header_map_from_cbor, decode_header_map_from_decoder, encode_header_map, EncodingMode,
};

/// Parse a COSE_Sign or COSE_Sign1 envelope.
pub fn parse_cose(input: &[u8], default_kind: CoseKind) -> Result<ParsedCose, CoseError> {
    parse_cose_inner(input, default_kind).map_err(CoseError::MalformedEnvelope)
}

/// Parse a COSE_Sign1 envelope (tag 18 or untagged).
pub fn parse_cose_sign1(input: &[u8]) -> Result<ParsedCoseSign1, CoseError> {
    match parse_cose(input, CoseKind::Sign1)? {
        ParsedCose::Sign1(m) => Ok(m),
        ParsedCose::Sign(_) => Err(CoseError::MalformedEnvelope(
            "expected COSE_Sign1, found COSE_Sign".to_string(),
        )),
    }
}

/// Parse a COSE_Sign envelope (tag 98 or untagged).
pub fn parse_cose_sign(input: &[u8]) -> Result<ParsedCoseSign, CoseError> {
    match parse_cose(input, CoseKind::Sign)? {
        ParsedCose::Sign(m) => Ok(m),
        ParsedCose::Sign1(_) => Err(CoseError::MalformedEnvelope(
            "expected COSE_Sign, found COSE_Sign1".to_string(),
        )),
    }
}

fn parse_cose_inner(input: &[u8], default_kind: CoseKind) -> Result<ParsedCose, String> {
    if input.is_empty() {
        return Err("empty input".to_string());
    }

    let mut dec = Decoder::new(input);

    let kind = if matches!(dec.datatype().map_err(|e| e.to_string())?, Type::Tag) {
        let tag = dec.tag().map_err(|e| format!("failed to read CBOR tag: {e}"))?;
        CoseKind::from_tag(tag.as_u64()).ok_or_else(|| {
            format!(
                "unexpected CBOR tag {} (expected 18, 98 or no tag)",
                tag.as_u64()
            )
        })?
    } else {
        default_kind
    };

    let len = dec
        .array()
        .map_err(|e| format!("top-level item is not an array: {e}"))?
        .ok_or_else(|| "indefinite-length arrays are not supported".to_string())?;

    if len != 4 {
        return Err("array length was not 4".to_string());
    }

    let protected_headers = decode_protected(&mut dec)?;
    let unprotected_headers = decode_unprotected(&mut dec)?;

    // payload (bstr or null); `null` represents a detached payload.
    let payload = match dec.datatype().map_err(|e| e.to_string())? {
        Type::Null => {
            dec.null().map_err(|e| e.to_string())?;
            None
        }
        Type::Bytes => Some(
            dec.bytes()
                .map_err(|e| format!("failed to read payload (bstr or null): {e}"))?
                .to_vec(),
        ),
        _ => return Err("failed to read payload (bstr or null)".to_string()),
    };

    let parsed = match kind {
        CoseKind::Sign1 => {
            let signature = dec
                .bytes()
                .map_err(|e| format!("failed to read signature (bstr): {e}"))?
                .to_vec();
            ParsedCose::Sign1(ParsedCoseSign1 {
                protected_headers,
                unprotected_headers,
                payload,
                signature,
            })
        }
        CoseKind::Sign => {
            let signers = decode_signers(&mut dec)?;
            ParsedCose::Sign(ParsedCoseSign {
                protected_headers,
                unprotected_headers,
                payload,
                signers,
            })
        }
    };

    if dec.position() != input.len() {
        return Err("trailing bytes after COSE structure".to_string());
    }

    Ok(parsed)
}

fn decode_protected(dec: &mut Decoder<'_>) -> Result<CoseHeaderMap, String> {
    // A CBOR byte string that itself encodes a CBOR map.
    let bstr = dec
        .bytes()
        .map_err(|e| format!("failed to read protected headers (bstr): {e}"))?
        .to_vec();
    let map = decode_header_map_from_cbor(&bstr)
        .map_err(|e| format!("failed to parse protected headers: {e}"))?;
    Ok(CoseHeaderMap::new_protected(bstr, map))
}

fn decode_unprotected(dec: &mut Decoder<'_>) -> Result<CoseHeaderMap, String> {
    if !matches!(dec.datatype().map_err(|e| e.to_string())?, Type::Map) {
        return Err("unprotected headers are not a map".to_string());
    }
    let map = decode_header_map_from_decoder(dec)
        .map_err(|e| format!("failed to parse unprotected headers map: {e}"))?;
    Ok(CoseHeaderMap::new_unprotected(map))
}

fn decode_signers(dec: &mut Decoder<'_>) -> Result<Vec<ParsedCoseSigner>, String> {
    if !matches!(dec.datatype().map_err(|e| e.to_string())?, Type::Array) {
        return Err("signatures are not an array of COSE_Signature".to_string());
    }
    let count = dec
        .array()
        .map_err(|e| format!("failed to read signatures array: {e}"))?
        .ok_or_else(|| "indefinite-length arrays are not supported".to_string())?;

    let mut signers = Vec::with_capacity(count.min(16) as usize);
    for i in 0..count {
        let len = dec
            .array()
            .map_err(|e| format!("COSE_Signature {i} is not an array: {e}"))?
            .ok_or_else(|| "indefinite-length arrays are not supported".to_string())?;
        if len != 3 {
            return Err(format!("COSE_Signature {i} array length was not 3"));
        }

        let protected_headers = decode_protected(dec)?;
        let unprotected_headers = decode_unprotected(dec)?;
        let signature = dec
            .bytes()
            .map_err(|e| format!("failed to read COSE_Signature {i} signature (bstr): {e}"))?
            .to_vec();

        signers.push(ParsedCoseSigner {
            protected_headers,
            unprotected_headers,
            signature,
        });
    }
    Ok(signers)
}

/// A signer record ready to be written into a COSE_Sign envelope.
#[derive(Debug, Clone, Copy)]
pub struct SignerRecord<'a> {
    pub protected: &'a [u8],
    pub unprotected: &'a HeaderMap,
    pub signature: &'a [u8],
}

/// Encode the 4-element envelope body shared by both shapes, up to the signature field.
fn encode_prefix(
    out: &mut Vec<u8>,
    tag: Option<u64>,
    protected: &[u8],
    unprotected: &HeaderMap,
    payload: Option<&[u8]>,
    mode: EncodingMode,
) -> Result<(), CoseError> {
    let mut enc = Encoder::new(&mut *out);
    if let Some(tag) = tag {
        enc.tag(Tag::new(tag)).map_err(CoseError::encoding)?;
    }
    enc.array(4).map_err(CoseError::encoding)?;
    enc.bytes(protected).map_err(CoseError::encoding)?;

    out.extend_from_slice(&encode_header_map(unprotected, mode)?);

    let mut enc = Encoder::new(&mut *out);
    match payload {
        Some(p) => enc.bytes(p),
        None => enc.null(),
    }
    .map_err(CoseError::encoding)?;
    Ok(())
}

/// Encode a COSE_Sign1 envelope.
///
/// `protected` is the already-encoded protected bucket (the bytes that were signed).
pub fn encode_cose_sign1(
    protected: &[u8],
    unprotected: &HeaderMap,
    payload: Option<&[u8]>,
    signature: &[u8],
    include_tag: bool,
    mode: EncodingMode,
) -> Result<Vec<u8>, CoseError> {
    let mut out = Vec::with_capacity(
        16 + protected.len() + payload.map_or(0, <[u8]>::len) + signature.len(),
    );
    let tag = include_tag.then_some(CoseKind::Sign1.tag());
    encode_prefix(&mut out, tag, protected, unprotected, payload, mode)?;

    Encoder::new(&mut out)
        .bytes(signature)
        .map_err(CoseError::encoding)?;
    Ok(out)
}

/// Encode a COSE_Sign envelope.
pub fn encode_cose_sign(
    protected: &[u8],
    unprotected: &HeaderMap,
    payload: Option<&[u8]>,
    signers: &[SignerRecord<'_>],
    include_tag: bool,
    mode: EncodingMode,
) -> Result<Vec<u8>, CoseError> {
    let mut out = Vec::with_capacity(32 + protected.len() + payload.map_or(0, <[u8]>::len));
    let tag = include_tag.then_some(CoseKind::Sign.tag());
    encode_prefix(&mut out, tag, protected, unprotected, payload, mode)?;

    Encoder::new(&mut out)
        .array(signers.len() as u64)
        .map_err(CoseError::encoding)?;
    for signer in signers {
        let mut enc = Encoder::new(&mut out);
        enc.array(3).map_err(CoseError::encoding)?;
        enc.bytes(signer.protected).map_err(CoseError::encoding)?;

        out.extend_from_slice(&encode_header_map(signer.unprotected, mode)?);

        Encoder::new(&mut out)
            .bytes(signer.signature)
            .map_err(CoseError::encoding)?;
    }
    Ok(out)
}
