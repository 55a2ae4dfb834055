// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use cosesign_abstractions::{CoseAlgorithm, CoseKind};

/// Options for producing an envelope.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SignOptions {
    /// Encode empty protected buckets as a zero-length bstr instead of `0xa0`.
    ///
    /// Applies to the body and to signer records. The verifier always uses the
    /// bytes it received, so it does not need this flag.
    pub compact_empty_protected: bool,
    /// Omit the leading CBOR tag (18 / 98).
    pub exclude_tag: bool,
    /// Write `nil` in the payload slot. The payload is still signed.
    pub detached: bool,
}

impl SignOptions {
    pub fn with_compact_empty_protected(mut self) -> Self {
        self.compact_empty_protected = true;
        self
    }

    pub fn without_tag(mut self) -> Self {
        self.exclude_tag = true;
        self
    }

    pub fn detached(mut self) -> Self {
        self.detached = true;
        self
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VerifyOptions {
    /// How to read untagged input.
    pub default_kind: CoseKind,
    /// Payload for envelopes whose payload slot is `nil`.
    ///
    /// When set it is used even if the envelope carries a payload.
    pub external_payload: Option<Vec<u8>>,
    /// If set, verification fails unless the COSE `alg` header equals this value.
    pub expected_alg: Option<CoseAlgorithm>,
    /// Only accept `alg` from the protected bucket of a COSE_Sign1.
    pub protected_alg_only: bool,
}

impl VerifyOptions {
    pub fn with_default_kind(mut self, kind: CoseKind) -> Self {
        self.default_kind = kind;
        self
    }

    pub fn with_external_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.external_payload = Some(payload.into());
        self
    }

    pub fn with_expected_alg(mut self, alg: CoseAlgorithm) -> Self {
        self.expected_alg = Some(alg);
        self
    }

    pub fn protected_alg_only(mut self) -> Self {
        self.protected_alg_only = true;
        self
    }
}
