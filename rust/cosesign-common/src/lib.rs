// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Common COSE parsing and encoding helpers.
//!
//! Everything in here is pure CBOR plumbing; no cryptography. The signing and
//! verification engines live in the `cosesign` crate.

pub mod envelope;
pub mod header_map;
pub mod sig_structure;

pub use cosesign_abstractions::{
    CoseError, CoseHeaderMap, CoseKind, HeaderKey, HeaderMap, HeaderValue, ParsedCose,
    ParsedCoseSign, ParsedCoseSign1, ParsedCoseSigner, COSE_SIGN1_TAG, COSE_SIGN_TAG,
    SIG_STRUCTURE_CONTEXT_SIGNATURE, SIG_STRUCTURE_CONTEXT_SIGNATURE1,
};

pub use envelope::{
    encode_cose_sign, encode_cose_sign1, parse_cose, parse_cose_sign, parse_cose_sign1,
    SignerRecord,
};
pub use header_map::{
    decode_header_map_from_cbor, encode_header_map, encode_protected_header_map, EncodingMode,
};
pub use sig_structure::{build_sig_structure, SigStructure};
