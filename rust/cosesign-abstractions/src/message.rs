// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Parsed COSE_Sign / COSE_Sign1 message types.

use crate::header_map::CoseHeaderMap;

/// Standard CBOR tag number used for COSE_Sign1.
pub const COSE_SIGN1_TAG: u64 = 18;

/// Standard CBOR tag number used for COSE_Sign.
pub const COSE_SIGN_TAG: u64 = 98;

/// Context string for COSE Sig_structure for COSE_Sign1.
pub const SIG_STRUCTURE_CONTEXT_SIGNATURE1: &str = "Signature1";

/// Context string for COSE Sig_structure for COSE_Sign.
pub const SIG_STRUCTURE_CONTEXT_SIGNATURE: &str = "Signature";

/// Envelope shape: one signature (`COSE_Sign1`) or a signer list (`COSE_Sign`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum CoseKind {
    Sign,
    #[default]
    Sign1,
}

impl CoseKind {
    pub const fn tag(self) -> u64 {
        match self {
            Self::Sign => COSE_SIGN_TAG,
            Self::Sign1 => COSE_SIGN1_TAG,
        }
    }

    pub fn from_tag(tag: u64) -> Option<Self> {
        match tag {
            COSE_SIGN_TAG => Some(Self::Sign),
            COSE_SIGN1_TAG => Some(Self::Sign1),
            _ => None,
        }
    }

    /// The Sig_structure context string for this shape.
    pub const fn context(self) -> &'static str {
        match self {
            Self::Sign => SIG_STRUCTURE_CONTEXT_SIGNATURE,
            Self::Sign1 => SIG_STRUCTURE_CONTEXT_SIGNATURE1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParsedCoseSign1 {
    pub protected_headers: CoseHeaderMap,
    pub unprotected_headers: CoseHeaderMap,
    /// Embedded payload bytes; `None` represents detached payload (`null`).
    pub payload: Option<Vec<u8>>,
    pub signature: Vec<u8>,
}

/// One `COSE_Signature` record of a COSE_Sign signer list.
#[derive(Debug, Clone, Default)]
pub struct ParsedCoseSigner {
    pub protected_headers: CoseHeaderMap,
    pub unprotected_headers: CoseHeaderMap,
    pub signature: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct ParsedCoseSign {
    pub protected_headers: CoseHeaderMap,
    pub unprotected_headers: CoseHeaderMap,
    /// Embedded payload bytes; `None` represents detached payload (`null`).
    pub payload: Option<Vec<u8>>,
    /// Signer records in wire order.
    pub signers: Vec<ParsedCoseSigner>,
}

#[derive(Debug, Clone)]
pub enum ParsedCose {
    Sign(ParsedCoseSign),
    Sign1(ParsedCoseSign1),
}

impl ParsedCose {
    pub fn kind(&self) -> CoseKind {
        match self {
            Self::Sign(_) => CoseKind::Sign,
            Self::Sign1(_) => CoseKind::Sign1,
        }
    }

    pub fn protected_headers(&self) -> &CoseHeaderMap {
        match self {
            Self::Sign(m) => &m.protected_headers,
            Self::Sign1(m) => &m.protected_headers,
        }
    }

    pub fn unprotected_headers(&self) -> &CoseHeaderMap {
        match self {
            Self::Sign(m) => &m.unprotected_headers,
            Self::Sign1(m) => &m.unprotected_headers,
        }
    }

    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Self::Sign(m) => m.payload.as_deref(),
            Self::Sign1(m) => m.payload.as_deref(),
        }
    }
}
