// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use cosesign_abstractions::CoseHashAlgorithm;
use sha2::{Digest as _, Sha256, Sha384, Sha512};

/// One-shot digest of `data` with the algorithm's hash.
pub(crate) fn digest(hash: CoseHashAlgorithm, data: &[u8]) -> Vec<u8> {
    match hash {
        CoseHashAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
        CoseHashAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
        CoseHashAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
    }
}
