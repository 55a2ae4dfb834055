// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! COSE_Sign / COSE_Sign1 signing and verification.
//!
//! This crate is the primary Rust entry point. Envelope creation ([`sign1`],
//! [`sign_multi`], [`create`]) and verification ([`verify`]) are exposed at the
//! crate root together with the lower-level engines they are built on.
//!
//! Supported algorithms: ES256, ES384, ES512 (ECDSA over P-256/P-384/P-521) and
//! PS256, PS384, PS512 (RSA-PSS).

// Internal implementation modules.
mod digest;
mod keys;

// Public API organization (lib.rs is a publisher).
mod api;
mod options;
pub mod resolution;
pub mod signing;
pub mod verification;

pub use options::{SignOptions, VerifyOptions};

pub use api::{
    create, create_async, sign1, sign1_async, sign_multi, sign_multi_async, verify,
    verify_async, CoseHeaders, Signers,
};
pub use resolution::find_signer;
pub use signing::sign_sig_structure;
pub use verification::verify_sig_structure;

pub use cosesign_abstractions::{
    CoseAlgorithm, CoseError, CoseKind, EcPrivateKey, EcPublicKey, HeaderLabel, HeaderValue,
    Headers, RsaPrivateKey, RsaPublicKey, Signer, SigningKey, VerificationKey, Verifier,
};
pub use cosesign_common::{build_sig_structure, parse_cose, SigStructure};
