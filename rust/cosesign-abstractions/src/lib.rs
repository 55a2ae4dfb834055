// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared interfaces and datatypes for the COSE signing crates.
//!
//! This crate exists to prevent circular dependencies between the CBOR plumbing
//! (`cosesign-common`) and the signing/verification facade (`cosesign`).
//! It holds the static tables (header parameters, algorithms), the key
//! capabilities and the error taxonomy.

pub mod algorithms;
pub mod error;
pub mod header_map;
pub mod header_params;
pub mod keys;
pub mod message;

pub use algorithms::{
    resolve, AlgorithmDescriptor, CoseAlgorithm, CoseHashAlgorithm, EcCurve, SignatureFamily,
    ALGORITHMS,
};
pub use error::CoseError;
pub use header_map::{CoseHeaderMap, HeaderKey, HeaderMap, HeaderValue, HEADER_ALG, HEADER_KID};
pub use header_params::{
    header_parameter_id, translate_headers, HeaderLabel, Headers, HEADER_PARAMETERS,
};
pub use keys::{
    EcPrivateKey, EcPublicKey, RsaPrivateKey, RsaPublicKey, Signer, SigningKey, VerificationKey,
    Verifier,
};
pub use message::{
    CoseKind, ParsedCose, ParsedCoseSign, ParsedCoseSign1, ParsedCoseSigner, COSE_SIGN1_TAG,
    COSE_SIGN_TAG, SIG_STRUCTURE_CONTEXT_SIGNATURE, SIG_STRUCTURE_CONTEXT_SIGNATURE1,
};
