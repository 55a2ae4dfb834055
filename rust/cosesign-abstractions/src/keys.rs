// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Key capabilities, signer and verifier descriptors.
//!
//! Keys are carried as their raw big-endian components. The engines pick the
//! primitive from the resolved algorithm, then ask the key for the components
//! that family needs; a key of the wrong family is rejected by the engine.

use rsa::traits::{PrivateKeyParts as _, PublicKeyParts as _};

use crate::{CoseError, Headers};

/// EC private scalar `d`.
#[derive(Clone, PartialEq, Eq)]
pub struct EcPrivateKey {
    pub d: Vec<u8>,
}

impl std::fmt::Debug for EcPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcPrivateKey").finish_non_exhaustive()
    }
}

/// EC public point, affine coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcPublicKey {
    pub x: Vec<u8>,
    pub y: Vec<u8>,
}

/// RSA private components (two-prime).
#[derive(Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub n: Vec<u8>,
    pub e: Vec<u8>,
    pub d: Vec<u8>,
    pub p: Vec<u8>,
    pub q: Vec<u8>,
}

impl std::fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("n", &self.n.len())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub n: Vec<u8>,
    pub e: Vec<u8>,
}

/// Multi-prime keys are rejected; only `p` and `q` are carried.
impl TryFrom<&rsa::RsaPrivateKey> for RsaPrivateKey {
    type Error = CoseError;

    fn try_from(key: &rsa::RsaPrivateKey) -> Result<Self, Self::Error> {
        let [p, q] = key.primes() else {
            return Err(CoseError::SigningFailure(format!(
                "RSA private key must have two primes, got {}",
                key.primes().len()
            )));
        };
        Ok(Self {
            n: key.n().to_bytes_be(),
            e: key.e().to_bytes_be(),
            d: key.d().to_bytes_be(),
            p: p.to_bytes_be(),
            q: q.to_bytes_be(),
        })
    }
}

impl From<&rsa::RsaPublicKey> for RsaPublicKey {
    fn from(key: &rsa::RsaPublicKey) -> Self {
        Self {
            n: key.n().to_bytes_be(),
            e: key.e().to_bytes_be(),
        }
    }
}

/// Private key capability handed to the signing engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningKey {
    Ec(EcPrivateKey),
    Rsa(RsaPrivateKey),
}

impl From<EcPrivateKey> for SigningKey {
    fn from(k: EcPrivateKey) -> Self {
        Self::Ec(k)
    }
}

impl From<RsaPrivateKey> for SigningKey {
    fn from(k: RsaPrivateKey) -> Self {
        Self::Rsa(k)
    }
}

/// Public key capability handed to the verification engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationKey {
    Ec(EcPublicKey),
    Rsa(RsaPublicKey),
}

impl From<EcPublicKey> for VerificationKey {
    fn from(k: EcPublicKey) -> Self {
        Self::Ec(k)
    }
}

impl From<RsaPublicKey> for VerificationKey {
    fn from(k: RsaPublicKey) -> Self {
        Self::Rsa(k)
    }
}

/// Everything needed to produce one signature.
#[derive(Debug, Clone)]
pub struct Signer {
    pub key: SigningKey,
    /// Signer-level protected headers (multi-signer envelopes only).
    pub protected: Headers,
    /// Signer-level unprotected headers (multi-signer envelopes only).
    pub unprotected: Headers,
    /// Bound into the Sig_structure, never carried in the envelope.
    pub external_aad: Vec<u8>,
}

impl Signer {
    pub fn new(key: impl Into<SigningKey>) -> Self {
        Self {
            key: key.into(),
            protected: Headers::new(),
            unprotected: Headers::new(),
            external_aad: Vec::new(),
        }
    }

    pub fn with_protected(mut self, headers: Headers) -> Self {
        self.protected = headers;
        self
    }

    pub fn with_unprotected(mut self, headers: Headers) -> Self {
        self.unprotected = headers;
        self
    }

    pub fn with_external_aad(mut self, aad: impl Into<Vec<u8>>) -> Self {
        self.external_aad = aad.into();
        self
    }
}

/// Everything needed to check one signature.
#[derive(Debug, Clone)]
pub struct Verifier {
    pub key: VerificationKey,
    /// Selects the signer record in multi-signer envelopes; compared byte for byte.
    pub kid: Option<Vec<u8>>,
    pub external_aad: Vec<u8>,
}

impl Verifier {
    pub fn new(key: impl Into<VerificationKey>) -> Self {
        Self {
            key: key.into(),
            kid: None,
            external_aad: Vec::new(),
        }
    }

    pub fn with_kid(mut self, kid: impl Into<Vec<u8>>) -> Self {
        self.kid = Some(kid.into());
        self
    }

    pub fn with_external_aad(mut self, aad: impl Into<Vec<u8>>) -> Self {
        self.external_aad = aad.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::BigUint;

    fn toy_key(primes: &[u64], d: u64) -> rsa::RsaPrivateKey {
        let n = primes.iter().product::<u64>();
        rsa::RsaPrivateKey::from_components(
            BigUint::from(n),
            BigUint::from(17u64),
            BigUint::from(d),
            primes.iter().map(|&p| BigUint::from(p)).collect(),
        )
        .unwrap()
    }

    #[test]
    fn two_prime_rsa_key_converts() {
        let key = RsaPrivateKey::try_from(&toy_key(&[61, 53], 413)).unwrap();
        assert_eq!(key.n, [0x0c, 0xa1]);
        assert_eq!(key.e, [17]);
        assert_eq!(key.p, [61]);
        assert_eq!(key.q, [53]);
    }

    #[test]
    fn multi_prime_rsa_key_is_rejected() {
        let err = RsaPrivateKey::try_from(&toy_key(&[61, 53, 71], 3533)).unwrap_err();
        assert!(matches!(err, CoseError::SigningFailure(ref m) if m.contains("got 3")), "{err:?}");
    }
}
