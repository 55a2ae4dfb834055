// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Signer resolution for multi-signer envelopes.

use cosesign_abstractions::{CoseError, ParsedCoseSigner, Verifier};
use tracing::debug;

/// Find the signer record the verifier is meant to check.
///
/// Records are scanned in envelope order and the first whose protected `kid`
/// equals the verifier's `kid` byte for byte wins. A `kid` that only appears in
/// a record's unprotected bucket is not considered. A verifier without a `kid`
/// never matches.
pub fn find_signer<'a>(
    signers: &'a [ParsedCoseSigner],
    verifier: &Verifier,
) -> Result<&'a ParsedCoseSigner, CoseError> {
    let Some(kid) = verifier.kid.as_deref() else {
        debug!(signers = signers.len(), "verifier has no kid; cannot select a signer");
        return Err(CoseError::SignerNotFound);
    };

    signers
        .iter()
        .find(|s| s.protected_headers.kid() == Some(kid))
        .ok_or_else(|| {
            debug!(signers = signers.len(), "no signer record matches the verifier kid");
            CoseError::SignerNotFound
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosesign_abstractions::{
        CoseHeaderMap, EcPublicKey, HeaderKey, HeaderMap, HeaderValue, HEADER_KID,
    };

    fn signer(
        protected_kid: Option<HeaderValue>,
        unprotected_kid: Option<&[u8]>,
        sig: &[u8],
    ) -> ParsedCoseSigner {
        let mut protected = HeaderMap::new();
        if let Some(kid) = protected_kid {
            protected.insert(HeaderKey::Int(HEADER_KID), kid);
        }
        let mut unprotected = HeaderMap::new();
        if let Some(kid) = unprotected_kid {
            unprotected.insert(HeaderKey::Int(HEADER_KID), HeaderValue::Bytes(kid.to_vec()));
        }
        ParsedCoseSigner {
            // Encoded bytes are irrelevant for resolution.
            protected_headers: CoseHeaderMap::new_protected(Vec::new(), protected),
            unprotected_headers: CoseHeaderMap::new_unprotected(unprotected),
            signature: sig.to_vec(),
        }
    }

    fn verifier(kid: Option<&[u8]>) -> Verifier {
        let v = Verifier::new(EcPublicKey {
            x: vec![],
            y: vec![],
        });
        match kid {
            Some(k) => v.with_kid(k),
            None => v,
        }
    }

    #[test]
    fn first_match_wins() {
        let signers = vec![
            signer(Some(HeaderValue::Bytes(b"a".to_vec())), None, b"1"),
            signer(Some(HeaderValue::Bytes(b"b".to_vec())), None, b"2"),
            signer(Some(HeaderValue::Bytes(b"b".to_vec())), None, b"3"),
        ];
        let found = find_signer(&signers, &verifier(Some(b"b".as_slice()))).unwrap();
        assert_eq!(found.signature, b"2");
    }

    #[test]
    fn text_kid_matches_its_utf8_bytes() {
        let signers = vec![signer(Some(HeaderValue::Text("key-1".to_string())), None, b"1")];
        assert!(find_signer(&signers, &verifier(Some(b"key-1".as_slice()))).is_ok());
    }

    #[test]
    fn unprotected_kid_is_ignored() {
        let signers = vec![signer(None, Some(b"a".as_slice()), b"1")];
        let err = find_signer(&signers, &verifier(Some(b"a".as_slice()))).unwrap_err();
        assert!(matches!(err, CoseError::SignerNotFound));
    }

    #[test]
    fn verifier_without_kid_never_matches() {
        let signers = vec![signer(Some(HeaderValue::Bytes(Vec::new())), None, b"1")];
        let err = find_signer(&signers, &verifier(None)).unwrap_err();
        assert!(matches!(err, CoseError::SignerNotFound));
    }

    #[test]
    fn empty_list_has_no_signer() {
        assert!(find_signer(&[], &verifier(Some(b"a".as_slice()))).is_err());
    }
}
