// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Algorithm registry.
//!
//! Maps COSE algorithm identifiers (IANA COSE Algorithms registry) to the
//! signature family and digest used to produce and check signatures. The table is
//! static; adding an algorithm means adding one row here and, if the family is
//! new, wiring it into the signing and verification engines.

use crate::CoseError;

/// Registered COSE algorithms.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(i64)]
pub enum CoseAlgorithm {
    /// ECDSA w/ SHA-256 over P-256.
    ES256 = -7,
    /// ECDSA w/ SHA-384 over P-384.
    ES384 = -35,
    /// ECDSA w/ SHA-512 over P-521.
    ES512 = -36,
    /// RSASSA-PSS w/ SHA-256.
    PS256 = -37,
    /// RSASSA-PSS w/ SHA-384.
    PS384 = -38,
    /// RSASSA-PSS w/ SHA-512.
    PS512 = -39,
    /// EdDSA. Registered, not implemented.
    EdDSA = -8,
    /// RSASSA-PKCS1-v1_5 w/ SHA-256. Registered, not implemented.
    RS256 = -257,
    /// RSASSA-PKCS1-v1_5 w/ SHA-384. Registered, not implemented.
    RS384 = -258,
    /// RSASSA-PKCS1-v1_5 w/ SHA-512. Registered, not implemented.
    RS512 = -259,
}

impl CoseAlgorithm {
    /// The wire identifier.
    pub const fn id(self) -> i64 {
        self as i64
    }

    pub fn from_id(id: i64) -> Option<Self> {
        ALGORITHMS
            .iter()
            .find(|d| d.algorithm.id() == id)
            .map(|d| d.algorithm)
    }

    /// Look up an algorithm by its IANA name (e.g. `"ES256"`).
    pub fn from_name(name: &str) -> Option<Self> {
        ALGORITHMS
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.algorithm)
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Registry row for this algorithm (bypasses the "implemented" check).
    pub fn descriptor(self) -> &'static AlgorithmDescriptor {
        let row = match self {
            Self::ES256 => 0,
            Self::ES384 => 1,
            Self::ES512 => 2,
            Self::PS256 => 3,
            Self::PS384 => 4,
            Self::PS512 => 5,
            Self::EdDSA => 6,
            Self::RS256 => 7,
            Self::RS384 => 8,
            Self::RS512 => 9,
        };
        &ALGORITHMS[row]
    }
}

/// Digest algorithms referenced by the registry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CoseHashAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl CoseHashAlgorithm {
    /// Digest output length in bytes. Also the RSA-PSS salt length.
    pub const fn output_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }
}

/// NIST curves used by the ECDSA family.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EcCurve {
    P256,
    P384,
    P521,
}

impl EcCurve {
    /// `ceil(order_bits / 8)`: the width of each of `r` and `s` in a COSE ECDSA signature.
    pub const fn field_size(self) -> usize {
        match self {
            Self::P256 => 32,
            Self::P384 => 48,
            Self::P521 => 66,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SignatureFamily {
    Ecdsa(EcCurve),
    RsaPss,
    RsaPkcs1v15,
    EdDsa,
}

impl SignatureFamily {
    /// Whether the signing and verification engines implement this family.
    pub const fn is_implemented(self) -> bool {
        matches!(self, Self::Ecdsa(_) | Self::RsaPss)
    }
}

/// One row of the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmDescriptor {
    pub algorithm: CoseAlgorithm,
    pub name: &'static str,
    pub family: SignatureFamily,
    pub hash: CoseHashAlgorithm,
}

impl AlgorithmDescriptor {
    pub const fn id(&self) -> i64 {
        self.algorithm.id()
    }
}

/// The process-wide algorithm table.
pub static ALGORITHMS: [AlgorithmDescriptor; 10] = [
    AlgorithmDescriptor {
        algorithm: CoseAlgorithm::ES256,
        name: "ES256",
        family: SignatureFamily::Ecdsa(EcCurve::P256),
        hash: CoseHashAlgorithm::Sha256,
    },
    AlgorithmDescriptor {
        algorithm: CoseAlgorithm::ES384,
        name: "ES384",
        family: SignatureFamily::Ecdsa(EcCurve::P384),
        hash: CoseHashAlgorithm::Sha384,
    },
    AlgorithmDescriptor {
        algorithm: CoseAlgorithm::ES512,
        name: "ES512",
        family: SignatureFamily::Ecdsa(EcCurve::P521),
        hash: CoseHashAlgorithm::Sha512,
    },
    AlgorithmDescriptor {
        algorithm: CoseAlgorithm::PS256,
        name: "PS256",
        family: SignatureFamily::RsaPss,
        hash: CoseHashAlgorithm::Sha256,
    },
    AlgorithmDescriptor {
        algorithm: CoseAlgorithm::PS384,
        name: "PS384",
        family: SignatureFamily::RsaPss,
        hash: CoseHashAlgorithm::Sha384,
    },
    AlgorithmDescriptor {
        algorithm: CoseAlgorithm::PS512,
        name: "PS512",
        family: SignatureFamily::RsaPss,
        hash: CoseHashAlgorithm::Sha512,
    },
    AlgorithmDescriptor {
        algorithm: CoseAlgorithm::EdDSA,
        name: "EdDSA",
        family: SignatureFamily::EdDsa,
        hash: CoseHashAlgorithm::Sha512,
    },
    AlgorithmDescriptor {
        algorithm: CoseAlgorithm::RS256,
        name: "RS256",
        family: SignatureFamily::RsaPkcs1v15,
        hash: CoseHashAlgorithm::Sha256,
    },
    AlgorithmDescriptor {
        algorithm: CoseAlgorithm::RS384,
        name: "RS384",
        family: SignatureFamily::RsaPkcs1v15,
        hash: CoseHashAlgorithm::Sha384,
    },
    AlgorithmDescriptor {
        algorithm: CoseAlgorithm::RS512,
        name: "RS512",
        family: SignatureFamily::RsaPkcs1v15,
        hash: CoseHashAlgorithm::Sha512,
    },
];

/// Resolve an algorithm identifier to an implemented registry row.
pub fn resolve(alg_id: i64) -> Result<&'static AlgorithmDescriptor, CoseError> {
    let descriptor = ALGORITHMS
        .iter()
        .find(|d| d.id() == alg_id)
        .ok_or(CoseError::UnknownAlgorithm(alg_id))?;

    if !descriptor.family.is_implemented() {
        return Err(CoseError::UnsupportedAlgorithm(alg_id));
    }

    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_wire_constants() {
        let cases = [
            (-7, EcCurve::P256, CoseHashAlgorithm::Sha256),
            (-35, EcCurve::P384, CoseHashAlgorithm::Sha384),
            (-36, EcCurve::P521, CoseHashAlgorithm::Sha512),
        ];
        for (id, curve, hash) in cases {
            let d = resolve(id).unwrap();
            assert_eq!(d.family, SignatureFamily::Ecdsa(curve));
            assert_eq!(d.hash, hash);
        }

        assert_eq!(resolve(-37).unwrap().hash.output_len(), 32);
        assert_eq!(resolve(-38).unwrap().hash.output_len(), 48);
        assert_eq!(resolve(-39).unwrap().hash.output_len(), 64);
    }

    #[test]
    fn unknown_and_unsupported_are_distinct() {
        assert!(matches!(resolve(0), Err(CoseError::UnknownAlgorithm(0))));
        assert!(matches!(resolve(-257), Err(CoseError::UnsupportedAlgorithm(-257))));
        assert!(matches!(resolve(-8), Err(CoseError::UnsupportedAlgorithm(-8))));
    }

    #[test]
    fn names_round_trip_through_the_table() {
        for d in ALGORITHMS.iter() {
            assert_eq!(d.algorithm.descriptor(), d);
            assert_eq!(CoseAlgorithm::from_name(d.name), Some(d.algorithm));
            assert_eq!(CoseAlgorithm::from_id(d.id()), Some(d.algorithm));
            assert_eq!(d.algorithm.name(), d.name);
        }
        assert_eq!(CoseAlgorithm::from_name("es256"), None);
    }
}
