// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use crypto::push_key::PushKeyId;
use git_ext::Qualified;
use identifier::{NamespaceName, RepoName};

/// The minimum fields a push must bind to, per the header-name order the
/// PEM form declares them in (`repo, namespace, fee, value, nonce, pkID,
/// reference, mergeID`).
///
/// `canonical_bytes` does *not* include a signature field: the signature is
/// produced over these bytes, never folded into them, matching "signature
/// covers the canonical bytes with the signature field elided".
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TxDetail {
    pub repo: RepoName,
    pub namespace: Option<NamespaceName>,
    pub reference: Qualified,
    pub fee: String,
    pub value: String,
    pub nonce: u64,
    pub push_key_id: PushKeyId,
    pub merge_proposal_id: Option<String>,
}

fn push_field(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    buf.extend_from_slice(bytes);
}

fn read_field(buf: &[u8]) -> Option<(&[u8], &[u8])> {
    if buf.len() < 4 {
        return None;
    }
    let (len_bytes, rest) = buf.split_at(4);
    let len = u32::from_be_bytes(len_bytes.try_into().ok()?) as usize;
    if rest.len() < len {
        return None;
    }
    Some(rest.split_at(len))
}

impl TxDetail {
    /// Deterministic binary form signed over: fields in **alphabetical**
    /// order of their field name (`fee, mergeID, namespace, nonce, pkID,
    /// reference, repo, value`), each preceded by a big-endian u32 length
    /// prefix. This is the order spec.md §6 fixes for canonical TxDetail
    /// bytes; it deliberately differs from the PEM headers' declaration
    /// order, which instead follows field prominence for readability.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        push_field(&mut buf, self.fee.as_bytes());
        push_field(
            &mut buf,
            self.merge_proposal_id.as_deref().unwrap_or("").as_bytes(),
        );
        push_field(
            &mut buf,
            self.namespace
                .as_ref()
                .map(|n| n.as_str())
                .unwrap_or("")
                .as_bytes(),
        );
        push_field(&mut buf, &self.nonce.to_be_bytes());
        push_field(&mut buf, self.push_key_id.to_string().as_bytes());
        push_field(&mut buf, self.reference.as_str().as_bytes());
        push_field(&mut buf, self.repo.as_str().as_bytes());
        push_field(&mut buf, self.value.as_bytes());
        buf
    }

    /// Inverse of [`TxDetail::canonical_bytes`]; returns the detail and the
    /// number of bytes consumed, so the caller can treat whatever remains as
    /// the trailing signature.
    pub(crate) fn from_canonical_bytes(buf: &[u8]) -> Option<(Self, usize)> {
        let start_len = buf.len();
        let mut rest = buf;

        let (fee, r) = read_field(rest)?;
        rest = r;
        let (merge_proposal_id, r) = read_field(rest)?;
        rest = r;
        let (namespace, r) = read_field(rest)?;
        rest = r;
        let (nonce, r) = read_field(rest)?;
        rest = r;
        let (push_key_id, r) = read_field(rest)?;
        rest = r;
        let (reference, r) = read_field(rest)?;
        rest = r;
        let (repo, r) = read_field(rest)?;
        rest = r;
        let (value, r) = read_field(rest)?;
        rest = r;

        let detail = TxDetail {
            repo: std::str::from_utf8(repo).ok()?.parse().ok()?,
            namespace: if namespace.is_empty() {
                None
            } else {
                Some(std::str::from_utf8(namespace).ok()?.parse().ok()?)
            },
            reference: std::str::from_utf8(reference).ok()?.parse().ok()?,
            fee: std::str::from_utf8(fee).ok()?.to_string(),
            value: std::str::from_utf8(value).ok()?.to_string(),
            nonce: u64::from_be_bytes(nonce.try_into().ok()?),
            push_key_id: std::str::from_utf8(push_key_id).ok()?.parse().ok()?,
            merge_proposal_id: if merge_proposal_id.is_empty() {
                None
            } else {
                Some(std::str::from_utf8(merge_proposal_id).ok()?.to_string())
            },
        };

        Some((detail, start_len - rest.len()))
    }

    /// The PEM headers form: keys exactly `repo, namespace, fee, value,
    /// nonce, pkID, reference, mergeID`, omitting empty ones.
    pub fn to_pem_headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![
            ("repo".to_string(), self.repo.to_string()),
            ("fee".to_string(), self.fee.clone()),
            ("nonce".to_string(), self.nonce.to_string()),
            ("pkID".to_string(), self.push_key_id.to_string()),
            ("reference".to_string(), self.reference.to_string()),
        ];
        if let Some(namespace) = &self.namespace {
            headers.push(("namespace".to_string(), namespace.to_string()));
        }
        if !self.value.is_empty() && self.value != "0" {
            headers.push(("value".to_string(), self.value.clone()));
        }
        if let Some(merge_id) = &self.merge_proposal_id {
            headers.push(("mergeID".to_string(), merge_id.clone()));
        }
        headers
    }

    /// Reconstructs a `TxDetail` from PEM headers. Unknown headers are
    /// ignored; missing `repo`, `fee`, `nonce` or `reference` is
    /// [`super::pem::PemError::InvalidHeader`], missing `pkID` is
    /// [`super::pem::PemError::MissingPushKeyId`].
    pub fn from_pem_headers(
        headers: &[(String, String)],
    ) -> Result<Self, crate::pem::PemError> {
        use crate::pem::PemError;

        let find = |key: &str| headers.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str());

        let repo = find("repo")
            .ok_or_else(|| PemError::InvalidHeader("repo".into()))?
            .parse()
            .map_err(|_| PemError::InvalidHeader("repo".into()))?;
        let fee = find("fee")
            .ok_or_else(|| PemError::InvalidHeader("fee".into()))?
            .to_string();
        let nonce = find("nonce")
            .ok_or_else(|| PemError::InvalidHeader("nonce".into()))?
            .parse::<u64>()
            .map_err(|_| PemError::InvalidHeader("nonce".into()))?;
        let reference = find("reference")
            .ok_or_else(|| PemError::InvalidHeader("reference".into()))?
            .parse()
            .map_err(|_| PemError::InvalidHeader("reference".into()))?;
        let push_key_id = find("pkID")
            .ok_or(PemError::MissingPushKeyId)?
            .parse()
            .map_err(|_| PemError::MissingPushKeyId)?;
        let namespace = find("namespace")
            .map(|s| s.parse())
            .transpose()
            .map_err(|_| PemError::InvalidHeader("namespace".into()))?;
        let value = find("value").unwrap_or("0").to_string();
        let merge_proposal_id = find("mergeID").map(|s| s.to_string());

        Ok(TxDetail {
            repo,
            namespace,
            reference,
            fee,
            value,
            nonce,
            push_key_id,
            merge_proposal_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TxDetail {
        TxDetail {
            repo: "repo1".parse().unwrap(),
            namespace: Some("namespace".parse().unwrap()),
            reference: "refs/heads/master".parse().unwrap(),
            fee: "1.2".to_string(),
            value: "0".to_string(),
            nonce: 1,
            push_key_id: crypto::SecretKey::new().public().into(),
            merge_proposal_id: None,
        }
    }

    #[test]
    fn canonical_bytes_roundtrip_through_fields() {
        let detail = sample();
        let bytes = detail.canonical_bytes();
        let (decoded, consumed) = TxDetail::from_canonical_bytes(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(decoded, detail);
    }

    #[test]
    fn pem_headers_roundtrip() {
        let detail = sample();
        let headers = detail.to_pem_headers();
        let decoded = TxDetail::from_pem_headers(&headers).unwrap();
        assert_eq!(decoded, detail);
    }

    #[test]
    fn pem_headers_omit_absent_namespace() {
        let mut detail = sample();
        detail.namespace = None;
        detail.merge_proposal_id = None;
        let headers = detail.to_pem_headers();
        assert!(headers.iter().all(|(k, _)| k != "namespace"));
    }

    #[test]
    fn unknown_headers_are_tolerated() {
        let detail = sample();
        let mut headers = detail.to_pem_headers();
        headers.push(("x-unknown".to_string(), "opaque".to_string()));
        let decoded = TxDetail::from_pem_headers(&headers).unwrap();
        assert_eq!(decoded, detail);
    }
}
