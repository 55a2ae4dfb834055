// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Signing engine: turns a Sig_structure into signature bytes.
//!
//! ECDSA signatures are emitted in the fixed-width COSE form (`r || s`, each
//! padded to the curve's field size), never DER. RSA-PSS uses a salt as long as
//! the digest and draws fresh randomness from the OS for every signature.

use cosesign_abstractions::{
    resolve, CoseError, CoseHashAlgorithm, EcCurve, RsaPrivateKey, SignatureFamily, SigningKey,
};
use cosesign_common::SigStructure;
use rand_core::OsRng;
use rsa::pss;
use rsa::BigUint;
use sha2::{Sha256, Sha384, Sha512};
use signature::hazmat::PrehashSigner;
use signature::{RandomizedSigner as _, SignatureEncoding as _};
use tracing::trace;

use crate::digest::digest;
use crate::keys::fixed_width;

/// Sign a Sig_structure with `key` using the algorithm registered as `alg_id`.
pub fn sign_sig_structure(
    sig_structure: &SigStructure<'_>,
    key: &SigningKey,
    alg_id: i64,
) -> Result<Vec<u8>, CoseError> {
    let descriptor = resolve(alg_id)?;
    let tbs = sig_structure.to_be_signed()?;
    trace!(alg = descriptor.name, tbs_len = tbs.len(), "signing Sig_structure");

    match (descriptor.family, key) {
        (SignatureFamily::Ecdsa(curve), SigningKey::Ec(k)) => {
            sign_ecdsa(curve, descriptor.hash, &k.d, &tbs)
        }
        (SignatureFamily::RsaPss, SigningKey::Rsa(k)) => sign_rsa_pss(descriptor.hash, k, &tbs),
        (SignatureFamily::Ecdsa(_), SigningKey::Rsa(_)) => Err(CoseError::SigningFailure(format!(
            "{} requires an EC private key",
            descriptor.name
        ))),
        (SignatureFamily::RsaPss, SigningKey::Ec(_)) => Err(CoseError::SigningFailure(format!(
            "{} requires an RSA private key",
            descriptor.name
        ))),
        // `resolve` only hands out implemented families.
        _ => Err(CoseError::UnsupportedAlgorithm(alg_id)),
    }
}

fn sign_ecdsa(
    curve: EcCurve,
    hash: CoseHashAlgorithm,
    d: &[u8],
    tbs: &[u8],
) -> Result<Vec<u8>, CoseError> {
    let d = fixed_width(d, curve.field_size()).ok_or_else(|| {
        CoseError::SigningFailure(format!("EC private key too long for {curve:?}"))
    })?;
    let prehash = digest(hash, tbs);

    match curve {
        EcCurve::P256 => sign_ecdsa_p256(&d, &prehash),
        EcCurve::P384 => sign_ecdsa_p384(&d, &prehash),
        EcCurve::P521 => sign_ecdsa_p521(&d, &prehash),
    }
}

fn sign_ecdsa_p256(d: &[u8], prehash: &[u8]) -> Result<Vec<u8>, CoseError> {
    let sk = p256::ecdsa::SigningKey::from_slice(d)
        .map_err(|e| CoseError::SigningFailure(format!("bad P-256 private key: {e}")))?;
    let sig: p256::ecdsa::Signature = sk
        .sign_prehash(prehash)
        .map_err(|e| CoseError::SigningFailure(format!("ES256 signing failed: {e}")))?;
    Ok(sig.to_bytes().to_vec())
}

fn sign_ecdsa_p384(d: &[u8], prehash: &[u8]) -> Result<Vec<u8>, CoseError> {
    let sk = p384::ecdsa::SigningKey::from_slice(d)
        .map_err(|e| CoseError::SigningFailure(format!("bad P-384 private key: {e}")))?;
    let sig: p384::ecdsa::Signature = sk
        .sign_prehash(prehash)
        .map_err(|e| CoseError::SigningFailure(format!("ES384 signing failed: {e}")))?;
    Ok(sig.to_bytes().to_vec())
}

fn sign_ecdsa_p521(d: &[u8], prehash: &[u8]) -> Result<Vec<u8>, CoseError> {
    let sk = p521::ecdsa::SigningKey::from_slice(d)
        .map_err(|e| CoseError::SigningFailure(format!("bad P-521 private key: {e}")))?;
    let sig: p521::ecdsa::Signature = sk
        .sign_prehash(prehash)
        .map_err(|e| CoseError::SigningFailure(format!("ES512 signing failed: {e}")))?;
    Ok(sig.to_bytes().to_vec())
}

fn rsa_private_key(key: &RsaPrivateKey) -> Result<rsa::RsaPrivateKey, CoseError> {
    let n = BigUint::from_bytes_be(&key.n);
    let e = BigUint::from_bytes_be(&key.e);
    let d = BigUint::from_bytes_be(&key.d);
    let primes = vec![
        BigUint::from_bytes_be(&key.p),
        BigUint::from_bytes_be(&key.q),
    ];
    rsa::RsaPrivateKey::from_components(n, e, d, primes)
        .map_err(|e| CoseError::SigningFailure(format!("bad RSA private key: {e}")))
}

fn sign_rsa_pss(
    hash: CoseHashAlgorithm,
    key: &RsaPrivateKey,
    tbs: &[u8],
) -> Result<Vec<u8>, CoseError> {
    let key = rsa_private_key(key)?;
    let sig = match hash {
        CoseHashAlgorithm::Sha256 => {
            pss::SigningKey::<Sha256>::new(key).try_sign_with_rng(&mut OsRng, tbs)
        }
        CoseHashAlgorithm::Sha384 => {
            pss::SigningKey::<Sha384>::new(key).try_sign_with_rng(&mut OsRng, tbs)
        }
        CoseHashAlgorithm::Sha512 => {
            pss::SigningKey::<Sha512>::new(key).try_sign_with_rng(&mut OsRng, tbs)
        }
    }
    .map_err(|e| CoseError::SigningFailure(format!("RSA-PSS signing failed: {e}")))?;
    Ok(sig.to_vec())
}
