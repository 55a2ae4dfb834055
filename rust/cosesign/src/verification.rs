// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Verification engine: checks signature bytes against a Sig_structure.
//!
//! Every failure past algorithm resolution (bad key material, wrong key family,
//! malformed signature, failed check) surfaces as [`CoseError::SignatureMismatch`].
//! The reason is only visible in `debug`-level tracing.

use cosesign_abstractions::{
    resolve, CoseError, CoseHashAlgorithm, EcCurve, EcPublicKey, RsaPublicKey, SignatureFamily,
    VerificationKey,
};
use cosesign_common::SigStructure;
use rsa::pss;
use rsa::BigUint;
use sha2::{Sha256, Sha384, Sha512};
use signature::hazmat::PrehashVerifier;
use signature::Verifier as _;
use tracing::{debug, trace};

use crate::digest::digest;
use crate::keys::sec1_uncompressed;

/// Verify `signature` over a Sig_structure with `key` using the algorithm registered as `alg_id`.
pub fn verify_sig_structure(
    sig_structure: &SigStructure<'_>,
    key: &VerificationKey,
    alg_id: i64,
    signature: &[u8],
) -> Result<(), CoseError> {
    let descriptor = resolve(alg_id)?;
    let tbs = sig_structure.to_be_signed()?;
    trace!(alg = descriptor.name, tbs_len = tbs.len(), "verifying Sig_structure");

    let result = match (descriptor.family, key) {
        (SignatureFamily::Ecdsa(curve), VerificationKey::Ec(k)) => {
            verify_ecdsa(curve, descriptor.hash, k, &tbs, signature)
        }
        (SignatureFamily::RsaPss, VerificationKey::Rsa(k)) => {
            verify_rsa_pss(descriptor.hash, k, &tbs, signature)
        }
        (SignatureFamily::Ecdsa(_), VerificationKey::Rsa(_))
        | (SignatureFamily::RsaPss, VerificationKey::Ec(_)) => {
            Err("key family does not match algorithm".to_string())
        }
        // `resolve` only hands out implemented families.
        _ => return Err(CoseError::UnsupportedAlgorithm(alg_id)),
    };

    result.map_err(|reason| {
        debug!(alg = descriptor.name, %reason, "signature verification failed");
        CoseError::SignatureMismatch
    })
}

fn verify_ecdsa(
    curve: EcCurve,
    hash: CoseHashAlgorithm,
    key: &EcPublicKey,
    tbs: &[u8],
    sig: &[u8],
) -> Result<(), String> {
    if sig.len() != 2 * curve.field_size() {
        return Err(format!(
            "ECDSA signature length {} is not 2 x {}",
            sig.len(),
            curve.field_size()
        ));
    }
    let point = sec1_uncompressed(key, curve)
        .ok_or_else(|| format!("EC public key coordinates too long for {curve:?}"))?;
    let prehash = digest(hash, tbs);

    match curve {
        EcCurve::P256 => verify_ecdsa_p256(&point, &prehash, sig),
        EcCurve::P384 => verify_ecdsa_p384(&point, &prehash, sig),
        EcCurve::P521 => verify_ecdsa_p521(&point, &prehash, sig),
    }
}

fn verify_ecdsa_p256(point: &[u8], prehash: &[u8], sig: &[u8]) -> Result<(), String> {
    let vk = p256::ecdsa::VerifyingKey::from_sec1_bytes(point)
        .map_err(|e| format!("bad P-256 public key: {e}"))?;
    let signature =
        p256::ecdsa::Signature::from_slice(sig).map_err(|e| format!("bad ES256 signature: {e}"))?;
    vk.verify_prehash(prehash, &signature)
        .map_err(|_| "signature verification failed".to_string())
}

fn verify_ecdsa_p384(point: &[u8], prehash: &[u8], sig: &[u8]) -> Result<(), String> {
    let vk = p384::ecdsa::VerifyingKey::from_sec1_bytes(point)
        .map_err(|e| format!("bad P-384 public key: {e}"))?;
    let signature =
        p384::ecdsa::Signature::from_slice(sig).map_err(|e| format!("bad ES384 signature: {e}"))?;
    vk.verify_prehash(prehash, &signature)
        .map_err(|_| "signature verification failed".to_string())
}

fn verify_ecdsa_p521(point: &[u8], prehash: &[u8], sig: &[u8]) -> Result<(), String> {
    let vk = p521::ecdsa::VerifyingKey::from_sec1_bytes(point)
        .map_err(|e| format!("bad P-521 public key: {e}"))?;
    let signature =
        p521::ecdsa::Signature::from_slice(sig).map_err(|e| format!("bad ES512 signature: {e}"))?;
    vk.verify_prehash(prehash, &signature)
        .map_err(|_| "signature verification failed".to_string())
}

fn rsa_public_key(key: &RsaPublicKey) -> Result<rsa::RsaPublicKey, String> {
    rsa::RsaPublicKey::new(BigUint::from_bytes_be(&key.n), BigUint::from_bytes_be(&key.e))
        .map_err(|e| format!("bad RSA public key: {e}"))
}

fn verify_rsa_pss(
    hash: CoseHashAlgorithm,
    key: &RsaPublicKey,
    tbs: &[u8],
    sig: &[u8],
) -> Result<(), String> {
    let key = rsa_public_key(key)?;
    let signature = pss::Signature::try_from(sig).map_err(|e| format!("bad PSS signature: {e}"))?;
    match hash {
        CoseHashAlgorithm::Sha256 => pss::VerifyingKey::<Sha256>::new(key).verify(tbs, &signature),
        CoseHashAlgorithm::Sha384 => pss::VerifyingKey::<Sha384>::new(key).verify(tbs, &signature),
        CoseHashAlgorithm::Sha512 => pss::VerifyingKey::<Sha512>::new(key).verify(tbs, &signature),
    }
    .map_err(|_| "signature verification failed".to_string())
}
