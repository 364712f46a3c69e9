// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

//! The PEM-wrapped push-token form: an OpenPGP-armor-style block (`-----BEGIN
//! PGP SIGNATURE-----`, header lines, blank line, base64 body,
//! `-----END PGP SIGNATURE-----`). The `pem` crate's `Pem { tag, contents }`
//! has no header support, so this is hand-rolled the way the armor format
//! itself is specified, reusing only `base64` for the body — already part of
//! the stack via `node-lib`'s pkt-line handling.

use thiserror::Error;

pub const PEM_TAG: &str = "PGP SIGNATURE";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PemError {
    #[error("missing `-----BEGIN {0}-----` marker")]
    MissingBegin(String),

    #[error("missing `-----END {0}-----` marker")]
    MissingEnd(String),

    #[error("malformed header line: {0:?}")]
    MalformedHeaderLine(String),

    #[error("malformed base64 body")]
    MalformedBody(#[from] base64::DecodeError),

    #[error("invalid or missing PEM header: {0}")]
    InvalidHeader(String),

    #[error("missing `pkID` header")]
    MissingPushKeyId,
}

pub fn encode(tag: &str, headers: &[(String, String)], body: &[u8]) -> String {
    let mut out = String::new();
    out.push_str(&format!("-----BEGIN {tag}-----\n"));
    for (key, value) in headers {
        out.push_str(&format!("{key}: {value}\n"));
    }
    out.push('\n');
    let encoded = base64::encode(body);
    for chunk in encoded.as_bytes().chunks(64) {
        out.push_str(std::str::from_utf8(chunk).expect("base64 output is ascii"));
        out.push('\n');
    }
    out.push_str(&format!("-----END {tag}-----\n"));
    out
}

pub fn decode(tag: &str, input: &str) -> Result<(Vec<(String, String)>, Vec<u8>), PemError> {
    let begin_marker = format!("-----BEGIN {tag}-----");
    let end_marker = format!("-----END {tag}-----");

    let begin_pos = input
        .find(&begin_marker)
        .ok_or_else(|| PemError::MissingBegin(tag.to_string()))?;
    let after_begin = &input[begin_pos + begin_marker.len()..];
    let end_pos = after_begin
        .find(&end_marker)
        .ok_or_else(|| PemError::MissingEnd(tag.to_string()))?;
    let body_section = &after_begin[..end_pos];

    let mut lines = body_section.lines();
    // the line immediately after BEGIN is either a header or, if blank, the
    // start of the base64 body with no headers at all.
    let mut headers = Vec::new();
    let mut base64_lines = Vec::new();
    let mut in_body = false;
    for line in &mut lines {
        if in_body {
            if !line.trim().is_empty() {
                base64_lines.push(line.trim());
            }
            continue;
        }
        if line.trim().is_empty() {
            in_body = true;
            continue;
        }
        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| PemError::MalformedHeaderLine(line.to_string()))?;
        headers.push((key.trim().to_string(), value.trim().to_string()));
    }

    let body = base64::decode(base64_lines.concat())?;
    Ok((headers, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_headers_and_body() {
        let headers = vec![
            ("repo".to_string(), "repo1".to_string()),
            ("nonce".to_string(), "1".to_string()),
        ];
        let body = b"some signature bytes";
        let pem = encode(PEM_TAG, &headers, body);
        assert!(pem.starts_with("-----BEGIN PGP SIGNATURE-----\n"));
        assert!(pem.trim_end().ends_with("-----END PGP SIGNATURE-----"));

        let (decoded_headers, decoded_body) = decode(PEM_TAG, &pem).unwrap();
        assert_eq!(decoded_headers, headers);
        assert_eq!(decoded_body, body);
    }

    #[test]
    fn missing_begin_marker_errors() {
        assert!(matches!(
            decode(PEM_TAG, "no markers here"),
            Err(PemError::MissingBegin(_))
        ));
    }
}
