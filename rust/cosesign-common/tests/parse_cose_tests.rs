// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Positive envelope parsing tests.
//!
//! These focus on accepted encodings (tagged/untagged, both shapes, detached
//! payload) and basic header-map decoding behavior.

use cosesign_common::{
    parse_cose, parse_cose_sign, parse_cose_sign1, CoseKind, HeaderValue, ParsedCose,
};
use minicbor::data::Tag;
use minicbor::Encoder;

// {1: -7}
const ALG_ES256: [u8; 3] = [0xa1, 0x01, 0x26];

// Helper to build a minimal COSE_Sign1.
fn make_basic_sign1(tag: Option<u64>, detached: bool) -> Vec<u8> {
    let mut out = Vec::new();
    let mut enc = Encoder::new(&mut out);
    if let Some(tag) = tag {
        enc.tag(Tag::new(tag)).unwrap();
    }
    enc.array(4).unwrap();
    enc.bytes(&ALG_ES256).unwrap();
    enc.map(0).unwrap();
    if detached {
        enc.null().unwrap();
    } else {
        enc.bytes(b"payload").unwrap();
    }
    enc.bytes(b"sig").unwrap();
    out
}

// Helper to build a COSE_Sign with the given signer kids.
fn make_basic_sign(tag: Option<u64>, kids: &[&[u8]]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut enc = Encoder::new(&mut out);
    if let Some(tag) = tag {
        enc.tag(Tag::new(tag)).unwrap();
    }
    enc.array(4).unwrap();
    enc.bytes(&[]).unwrap();
    enc.map(1).unwrap();
    enc.i64(3).unwrap();
    enc.str("text/plain").unwrap();
    enc.bytes(b"payload").unwrap();
    enc.array(kids.len() as u64).unwrap();
    for kid in kids {
        let mut protected = Vec::new();
        let mut penc = Encoder::new(&mut protected);
        penc.map(2).unwrap();
        penc.i64(1).unwrap();
        penc.i64(-7).unwrap();
        penc.i64(4).unwrap();
        penc.bytes(kid).unwrap();

        enc.array(3).unwrap();
        enc.bytes(&protected).unwrap();
        enc.map(0).unwrap();
        enc.bytes(kid).unwrap();
    }
    out
}

#[test]
fn parse_accepts_tagged_and_untagged_sign1() {
    for tag in [None, Some(18)] {
        let cose = make_basic_sign1(tag, false);
        let parsed = parse_cose_sign1(&cose).expect("parse");
        assert_eq!(parsed.signature, b"sig");
        assert_eq!(parsed.payload.as_deref(), Some(b"payload".as_slice()));
        assert_eq!(parsed.protected_headers.get_i64(1), Some(-7));
        assert_eq!(parsed.protected_headers.encoded_map_cbor(), ALG_ES256);
    }
}

#[test]
fn tag_overrides_default_kind() {
    let sign1 = make_basic_sign1(Some(18), false);
    assert_eq!(parse_cose(&sign1, CoseKind::Sign).unwrap().kind(), CoseKind::Sign1);

    let sign = make_basic_sign(Some(98), &[b"k1"]);
    assert_eq!(parse_cose(&sign, CoseKind::Sign1).unwrap().kind(), CoseKind::Sign);
}

#[test]
fn untagged_uses_default_kind() {
    let sign = make_basic_sign(None, &[b"k1"]);
    assert_eq!(parse_cose(&sign, CoseKind::Sign).unwrap().kind(), CoseKind::Sign);

    // The same bytes are not a valid COSE_Sign1: the 4th element is an array.
    assert!(parse_cose(&sign, CoseKind::Sign1).is_err());
}

#[test]
fn parse_sign_keeps_signer_order_and_bytes() {
    let cose = make_basic_sign(Some(98), &[b"k1", b"k2", b"k3"]);
    let parsed = parse_cose_sign(&cose).expect("parse");

    assert!(parsed.protected_headers.is_empty());
    assert_eq!(parsed.protected_headers.encoded_map_cbor(), b"");
    assert_eq!(
        parsed.unprotected_headers.map().values().next(),
        Some(&HeaderValue::Text("text/plain".to_string()))
    );

    let kids: Vec<_> = parsed
        .signers
        .iter()
        .map(|s| s.protected_headers.kid().unwrap().to_vec())
        .collect();
    assert_eq!(kids, vec![b"k1".to_vec(), b"k2".to_vec(), b"k3".to_vec()]);
    assert_eq!(parsed.signers[1].signature, b"k2");
    assert_eq!(parsed.signers[0].protected_headers.get_i64(1), Some(-7));
}

#[test]
fn parse_supports_detached_payload() {
    let cose = make_basic_sign1(None, true);
    let parsed = parse_cose(&cose, CoseKind::Sign1).expect("parse");
    assert!(parsed.payload().is_none());
    match parsed {
        ParsedCose::Sign1(m) => assert_eq!(m.signature, b"sig"),
        ParsedCose::Sign(_) => panic!("expected COSE_Sign1"),
    }
}

#[test]
fn empty_signer_list_parses() {
    // Creation rejects zero signers, parsing does not.
    let cose = make_basic_sign(Some(98), &[]);
    let parsed = parse_cose_sign(&cose).expect("parse");
    assert!(parsed.signers.is_empty());
}
