// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use thiserror::Error;
use crypto::{Signature, Signer};

use crate::{
    detail::TxDetail,
    pem::{self, PemError, PEM_TAG},
};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TokenError {
    #[error("malformed token")]
    MalformedToken,

    #[error("signature does not verify")]
    BadSignature,

    #[error(transparent)]
    Pem(#[from] PemError),
}

/// `encode(key, detail) → token`: canonicalize `detail` (signature field
/// elided), sign with `key`, base58 the concatenation of the canonical bytes
/// and the signature.
pub fn encode<S: Signer>(key: &S, detail: &TxDetail) -> Result<String, S::Error> {
    let canonical = detail.canonical_bytes();
    let signature = key.sign(&canonical)?;
    let mut wire = canonical;
    wire.extend_from_slice(&signature.as_bytes());
    Ok(bs58::encode(wire).into_string())
}

/// `decode(token) → detail`: reverse of [`encode`], verifying the signature
/// against the `pushKeyID`-derived public key embedded in the detail itself.
pub fn decode(token: &str) -> Result<TxDetail, TokenError> {
    let wire = bs58::decode(token)
        .into_vec()
        .map_err(|_| TokenError::MalformedToken)?;

    let (detail, consumed) =
        TxDetail::from_canonical_bytes(&wire).ok_or(TokenError::MalformedToken)?;
    let sig_bytes = &wire[consumed..];
    let signature =
        Signature::try_from(sig_bytes).map_err(|_| TokenError::MalformedToken)?;

    detail
        .push_key_id
        .as_public_key()
        .verify(&signature, &wire[..consumed])
        .map_err(|_| TokenError::BadSignature)?;

    Ok(detail)
}

/// Verifies a PEM-wrapped signature block: rebuilds the `TxDetail` from the
/// headers, loads the push key by `pkID`, and re-runs the signature check
/// over `git_sig_payload ∥ canonical(TxDetail without signature)`.
pub fn verify_pem(input: &str, git_sig_payload: &[u8]) -> Result<TxDetail, TokenError> {
    let (headers, body) = pem::decode(PEM_TAG, input)?;
    let detail = TxDetail::from_pem_headers(&headers)?;
    let signature = Signature::try_from(body.as_slice()).map_err(|_| TokenError::MalformedToken)?;

    let mut payload = git_sig_payload.to_vec();
    payload.extend_from_slice(&detail.canonical_bytes());

    detail
        .push_key_id
        .as_public_key()
        .verify(&signature, &payload)
        .map_err(|_| TokenError::BadSignature)?;

    Ok(detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypto::SecretKey;

    fn sample() -> TxDetail {
        TxDetail {
            repo: "repo1".parse().unwrap(),
            namespace: Some("namespace".parse().unwrap()),
            reference: "refs/heads/master".parse().unwrap(),
            fee: "1.2".to_string(),
            value: "0".to_string(),
            nonce: 1,
            push_key_id: SecretKey::new().public().into(),
            merge_proposal_id: None,
        }
    }

    #[test]
    fn encode_decode_roundtrips_and_verifies() {
        let key = SecretKey::new();
        let mut detail = sample();
        detail.push_key_id = key.public().into();

        let token = encode(&key, &detail).unwrap();
        let decoded = decode(&token).unwrap();
        assert_eq!(decoded, detail);
    }

    #[test]
    fn decode_rejects_malformed_token() {
        assert!(matches!(decode("token"), Err(TokenError::MalformedToken)));
    }

    #[test]
    fn decode_rejects_tampered_signature() {
        let key = SecretKey::new();
        let mut detail = sample();
        detail.push_key_id = key.public().into();
        let token = encode(&key, &detail).unwrap();

        let mut wire = bs58::decode(&token).into_vec().unwrap();
        let last = wire.len() - 1;
        wire[last] ^= 0xff;
        let tampered = bs58::encode(wire).into_string();

        assert!(matches!(decode(&tampered), Err(TokenError::BadSignature)));
    }

    #[test]
    fn verify_pem_roundtrips() {
        let key = SecretKey::new();
        let mut detail = sample();
        detail.push_key_id = key.public().into();
        let git_sig_payload = b"tree abc\nparent def\nauthor a\n";

        let mut payload = git_sig_payload.to_vec();
        payload.extend_from_slice(&detail.canonical_bytes());
        let signature = key.sign(&payload).unwrap();

        let pem = pem::encode(PEM_TAG, &detail.to_pem_headers(), &signature.as_bytes());
        let verified = verify_pem(&pem, git_sig_payload).unwrap();
        assert_eq!(verified, detail);
    }
}
