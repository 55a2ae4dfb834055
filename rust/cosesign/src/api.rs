// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Envelope creation and verification entry points.

use cosesign_abstractions::{
    resolve, translate_headers, CoseError, CoseHeaderMap, CoseKind, HeaderKey, HeaderMap,
    HeaderLabel, HeaderValue, Headers, ParsedCose, Signer, Verifier, HEADER_ALG,
};
use cosesign_common::{
    build_sig_structure, encode_cose_sign, encode_cose_sign1, parse_cose, EncodingMode,
    SigStructure, SignerRecord,
};
use tracing::debug;

use crate::resolution::find_signer;
use crate::signing::sign_sig_structure;
use crate::verification::verify_sig_structure;
use crate::{SignOptions, VerifyOptions};

/// Body-level header buckets supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct CoseHeaders {
    pub protected: Headers,
    pub unprotected: Headers,
}

impl CoseHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_protected(
        mut self,
        label: impl Into<HeaderLabel>,
        value: impl Into<HeaderValue>,
    ) -> Self {
        self.protected.insert(label, value);
        self
    }

    pub fn with_unprotected(
        mut self,
        label: impl Into<HeaderLabel>,
        value: impl Into<HeaderValue>,
    ) -> Self {
        self.unprotected.insert(label, value);
        self
    }
}

/// Signers for [`create`]; the variant selects the envelope shape.
#[derive(Debug, Clone, Copy)]
pub enum Signers<'a> {
    /// COSE_Sign1.
    Single(&'a Signer),
    /// COSE_Sign. Exactly one signer is accepted.
    Multi(&'a [Signer]),
}

fn int_alg(map: &HeaderMap) -> Option<i64> {
    match map.get(&HeaderKey::Int(HEADER_ALG)) {
        Some(HeaderValue::Int(alg)) => Some(*alg),
        _ => None,
    }
}

/// Create a COSE_Sign1 envelope.
///
/// `alg` is read from the body protected headers, falling back to the body
/// unprotected headers. The signer's own header buckets are not used in this
/// shape; only its key and external AAD are.
pub fn sign1(
    headers: &CoseHeaders,
    payload: &[u8],
    signer: &Signer,
    options: &SignOptions,
) -> Result<Vec<u8>, CoseError> {
    let body_protected = translate_headers(&headers.protected)?;
    let body_unprotected = translate_headers(&headers.unprotected)?;

    let alg = int_alg(&body_protected)
        .or_else(|| int_alg(&body_unprotected))
        .ok_or(CoseError::MissingAlgorithm)?;
    debug!(alg, kind = "COSE_Sign1", detached = options.detached, "creating envelope");

    let sig_structure = build_sig_structure(
        CoseKind::Sign1,
        &body_protected,
        None,
        &signer.external_aad,
        payload,
        options.compact_empty_protected,
    )?;
    let signature = sign_sig_structure(&sig_structure, &signer.key, alg)?;

    encode_cose_sign1(
        sig_structure.body_protected(),
        &body_unprotected,
        (!options.detached).then_some(payload),
        &signature,
        !options.exclude_tag,
        EncodingMode::Canonical,
    )
}

/// Create a COSE_Sign envelope with a single signer record.
///
/// `alg` must be in the signer's protected headers. Zero or several signers
/// fail with [`CoseError::SignerCount`].
pub fn sign_multi(
    headers: &CoseHeaders,
    payload: &[u8],
    signers: &[Signer],
    options: &SignOptions,
) -> Result<Vec<u8>, CoseError> {
    let [signer] = signers else {
        return Err(CoseError::SignerCount(signers.len()));
    };

    let body_protected = translate_headers(&headers.protected)?;
    let body_unprotected = translate_headers(&headers.unprotected)?;
    let sign_protected = translate_headers(&signer.protected)?;
    let sign_unprotected = translate_headers(&signer.unprotected)?;

    let alg = int_alg(&sign_protected).ok_or(CoseError::MissingAlgorithm)?;
    debug!(alg, kind = "COSE_Sign", detached = options.detached, "creating envelope");

    let sig_structure = build_sig_structure(
        CoseKind::Sign,
        &body_protected,
        Some(&sign_protected),
        &signer.external_aad,
        payload,
        options.compact_empty_protected,
    )?;
    let signature = sign_sig_structure(&sig_structure, &signer.key, alg)?;

    let record = SignerRecord {
        protected: sig_structure.sign_protected().unwrap_or_default(),
        unprotected: &sign_unprotected,
        signature: &signature,
    };

    encode_cose_sign(
        sig_structure.body_protected(),
        &body_unprotected,
        (!options.detached).then_some(payload),
        &[record],
        !options.exclude_tag,
        EncodingMode::Ordered,
    )
}

/// Create an envelope of the shape selected by `signers`.
pub fn create(
    headers: &CoseHeaders,
    payload: &[u8],
    signers: Signers<'_>,
    options: &SignOptions,
) -> Result<Vec<u8>, CoseError> {
    match signers {
        Signers::Single(signer) => sign1(headers, payload, signer, options),
        Signers::Multi(signers) => sign_multi(headers, payload, signers, options),
    }
}

/// Verify an envelope and return the authenticated payload.
///
/// For COSE_Sign the signer record is selected by the verifier's `kid`. For
/// COSE_Sign1 `alg` is read from the protected headers, falling back to the
/// unprotected headers unless [`VerifyOptions::protected_alg_only`] is set.
pub fn verify(
    cose: &[u8],
    verifier: &Verifier,
    options: &VerifyOptions,
) -> Result<Vec<u8>, CoseError> {
    let parsed = parse_cose(cose, options.default_kind)?;
    let payload = select_payload(parsed.payload(), options)?;

    match &parsed {
        ParsedCose::Sign1(msg) => {
            let mut alg = msg.protected_headers.get_i64(HEADER_ALG);
            if alg.is_none() && !options.protected_alg_only {
                alg = msg.unprotected_headers.get_i64(HEADER_ALG);
            }
            let alg = alg.ok_or(CoseError::MissingAlgorithm)?;
            check_alg(alg, options)?;
            debug!(alg, kind = "COSE_Sign1", "verifying envelope");

            let sig_structure = SigStructure::from_encoded(
                CoseKind::Sign1,
                msg.protected_headers.encoded_map_cbor(),
                None,
                &verifier.external_aad,
                payload,
            )?;
            verify_sig_structure(&sig_structure, &verifier.key, alg, &msg.signature)?;
        }
        ParsedCose::Sign(msg) => {
            let signer = find_signer(&msg.signers, verifier)?;
            let alg = signer_alg(&signer.protected_headers)?;
            check_alg(alg, options)?;
            debug!(alg, kind = "COSE_Sign", signers = msg.signers.len(), "verifying envelope");

            let sig_structure = SigStructure::from_encoded(
                CoseKind::Sign,
                msg.protected_headers.encoded_map_cbor(),
                Some(signer.protected_headers.encoded_map_cbor()),
                &verifier.external_aad,
                payload,
            )?;
            verify_sig_structure(&sig_structure, &verifier.key, alg, &signer.signature)?;
        }
    }

    Ok(payload.to_vec())
}

fn signer_alg(protected: &CoseHeaderMap) -> Result<i64, CoseError> {
    protected
        .get_i64(HEADER_ALG)
        .ok_or(CoseError::MissingAlgorithm)
}

fn check_alg(alg: i64, options: &VerifyOptions) -> Result<(), CoseError> {
    let descriptor = resolve(alg)?;
    match options.expected_alg {
        Some(expected) if expected != descriptor.algorithm => {
            Err(CoseError::AlgorithmMismatch {
                expected,
                actual: alg,
            })
        }
        _ => Ok(()),
    }
}

fn select_payload<'a>(
    embedded: Option<&'a [u8]>,
    options: &'a VerifyOptions,
) -> Result<&'a [u8], CoseError> {
    options
        .external_payload
        .as_deref()
        .or(embedded)
        .ok_or(CoseError::DetachedPayloadRequired)
}

pub async fn sign1_async(
    headers: &CoseHeaders,
    payload: &[u8],
    signer: &Signer,
    options: &SignOptions,
) -> Result<Vec<u8>, CoseError> {
    sign1(headers, payload, signer, options)
}

pub async fn sign_multi_async(
    headers: &CoseHeaders,
    payload: &[u8],
    signers: &[Signer],
    options: &SignOptions,
) -> Result<Vec<u8>, CoseError> {
    sign_multi(headers, payload, signers, options)
}

pub async fn create_async(
    headers: &CoseHeaders,
    payload: &[u8],
    signers: Signers<'_>,
    options: &SignOptions,
) -> Result<Vec<u8>, CoseError> {
    create(headers, payload, signers, options)
}

pub async fn verify_async(
    cose: &[u8],
    verifier: &Verifier,
    options: &VerifyOptions,
) -> Result<Vec<u8>, CoseError> {
    verify(cose, verifier, options)
}
