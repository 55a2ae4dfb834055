// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error taxonomy shared by every crate in the workspace.

use crate::CoseAlgorithm;

/// Errors surfaced by signing, verification and envelope handling.
///
/// None of these are retried internally. Verification failures are reported as
/// [`CoseError::SignatureMismatch`] regardless of the underlying cause.
#[derive(Debug, thiserror::Error)]
pub enum CoseError {
    #[error("unknown header parameter '{0}'")]
    UnknownHeaderParameter(String),

    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(i64),

    #[error("unknown algorithm name '{0}'")]
    UnknownAlgorithmName(String),

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(i64),

    #[error("missing or invalid alg header")]
    MissingAlgorithm,

    #[error("alg header mismatch: expected {expected:?}, got {actual}")]
    AlgorithmMismatch { expected: CoseAlgorithm, actual: i64 },

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("detached payload requires external payload bytes")]
    DetachedPayloadRequired,

    #[error("exactly one signer is supported, got {0}")]
    SignerCount(usize),

    #[error("no signer matches the verifier key identifier")]
    SignerNotFound,

    #[error("signature verification failed")]
    SignatureMismatch,

    #[error("signing failed: {0}")]
    SigningFailure(String),

    #[error("CBOR encoding failed: {0}")]
    Encoding(String),
}

impl CoseError {
    /// Helper to normalize decoder failures into `CoseError::MalformedEnvelope`.
    pub fn malformed<E: std::fmt::Display>(e: E) -> Self {
        Self::MalformedEnvelope(e.to_string())
    }

    /// Helper to normalize encoder failures into `CoseError::Encoding`.
    pub fn encoding<E: std::fmt::Display>(e: E) -> Self {
        Self::Encoding(e.to_string())
    }
}
