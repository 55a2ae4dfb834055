// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared helpers for `cosesign` integration tests.
//!
//! Key generation lives here so each test file can stay focused on envelope
//! behavior. RSA keys are slow to generate, so two are created per test binary
//! and reused.

#![allow(dead_code)]

use std::sync::OnceLock;

use cosesign::{
    CoseAlgorithm, EcPrivateKey, EcPublicKey, RsaPrivateKey, RsaPublicKey, SigningKey,
    VerificationKey,
};
use rand_core::OsRng;

pub(crate) const ALL_ALGORITHMS: [CoseAlgorithm; 6] = [
    CoseAlgorithm::ES256,
    CoseAlgorithm::ES384,
    CoseAlgorithm::ES512,
    CoseAlgorithm::PS256,
    CoseAlgorithm::PS384,
    CoseAlgorithm::PS512,
];

pub(crate) fn p256_keypair() -> (SigningKey, VerificationKey) {
    use p256::elliptic_curve::sec1::ToEncodedPoint as _;

    let sk = p256::SecretKey::random(&mut OsRng);
    let point = sk.public_key().to_encoded_point(false);
    ec_pair(
        sk.to_bytes().to_vec(),
        point.x().unwrap().to_vec(),
        point.y().unwrap().to_vec(),
    )
}

pub(crate) fn p384_keypair() -> (SigningKey, VerificationKey) {
    use p384::elliptic_curve::sec1::ToEncodedPoint as _;

    let sk = p384::SecretKey::random(&mut OsRng);
    let point = sk.public_key().to_encoded_point(false);
    ec_pair(
        sk.to_bytes().to_vec(),
        point.x().unwrap().to_vec(),
        point.y().unwrap().to_vec(),
    )
}

pub(crate) fn p521_keypair() -> (SigningKey, VerificationKey) {
    use p521::elliptic_curve::sec1::ToEncodedPoint as _;

    let sk = p521::SecretKey::random(&mut OsRng);
    let point = sk.public_key().to_encoded_point(false);
    ec_pair(
        sk.to_bytes().to_vec(),
        point.x().unwrap().to_vec(),
        point.y().unwrap().to_vec(),
    )
}

fn ec_pair(d: Vec<u8>, x: Vec<u8>, y: Vec<u8>) -> (SigningKey, VerificationKey) {
    (
        SigningKey::Ec(EcPrivateKey { d }),
        VerificationKey::Ec(EcPublicKey { x, y }),
    )
}

fn rsa_pair(key: &rsa::RsaPrivateKey) -> (SigningKey, VerificationKey) {
    (
        SigningKey::Rsa(RsaPrivateKey::try_from(key).unwrap()),
        VerificationKey::Rsa(RsaPublicKey::from(&key.to_public_key())),
    )
}

/// A cached 2048-bit RSA key.
pub(crate) fn rsa_keypair() -> (SigningKey, VerificationKey) {
    static KEY: OnceLock<rsa::RsaPrivateKey> = OnceLock::new();
    rsa_pair(KEY.get_or_init(|| rsa::RsaPrivateKey::new(&mut OsRng, 2048).unwrap()))
}

/// A second cached RSA key, distinct from [`rsa_keypair`].
pub(crate) fn other_rsa_keypair() -> (SigningKey, VerificationKey) {
    static KEY: OnceLock<rsa::RsaPrivateKey> = OnceLock::new();
    rsa_pair(KEY.get_or_init(|| rsa::RsaPrivateKey::new(&mut OsRng, 2048).unwrap()))
}

/// A key pair suitable for `alg`.
pub(crate) fn keypair_for(alg: CoseAlgorithm) -> (SigningKey, VerificationKey) {
    match alg {
        CoseAlgorithm::ES256 => p256_keypair(),
        CoseAlgorithm::ES384 => p384_keypair(),
        CoseAlgorithm::ES512 => p521_keypair(),
        CoseAlgorithm::PS256 | CoseAlgorithm::PS384 | CoseAlgorithm::PS512 => rsa_keypair(),
        other => panic!("no test key for {other:?}"),
    }
}

/// Flip the lowest bit of the last byte of the first occurrence of `needle`.
pub(crate) fn flip_in(bytes: &[u8], needle: &[u8]) -> Vec<u8> {
    let pos = bytes
        .windows(needle.len())
        .position(|w| w == needle)
        .expect("needle not found");
    let mut out = bytes.to_vec();
    out[pos + needle.len() - 1] ^= 0x01;
    out
}

/// Flip the lowest bit of the final byte (the tail of the last signature).
pub(crate) fn flip_last(bytes: &[u8]) -> Vec<u8> {
    let mut out = bytes.to_vec();
    let last = out.len() - 1;
    out[last] ^= 0x01;
    out
}
