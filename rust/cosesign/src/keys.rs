// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Raw key component helpers shared by the signing and verification engines.

use cosesign_abstractions::{EcCurve, EcPublicKey};

/// Big-endian integer bytes as exactly `width` bytes.
///
/// Leading zeros are dropped or added as needed; `None` if the value does not fit.
pub(crate) fn fixed_width(bytes: &[u8], width: usize) -> Option<Vec<u8>> {
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let significant = &bytes[first..];
    if significant.len() > width {
        return None;
    }
    let mut out = vec![0u8; width - significant.len()];
    out.extend_from_slice(significant);
    Some(out)
}

/// SEC1 uncompressed point (`0x04 || x || y`) for an EC public key.
pub(crate) fn sec1_uncompressed(key: &EcPublicKey, curve: EcCurve) -> Option<Vec<u8>> {
    let size = curve.field_size();
    let x = fixed_width(&key.x, size)?;
    let y = fixed_width(&key.y, size)?;

    let mut out = Vec::with_capacity(1 + 2 * size);
    out.push(0x04);
    out.extend_from_slice(&x);
    out.extend_from_slice(&y);
    Some(out)
}
