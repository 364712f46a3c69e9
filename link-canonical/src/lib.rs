// Copyright © 2021-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

//! Deterministic binary encoding.
//!
//! Every value whose hash must agree across nodes — a push note, a pushed
//! reference, a repository, a repo proposal — implements [`Canonical`].
//! `canonical_form` is the only thing a signature or a content hash is ever
//! taken over; it must never include the signature or hash field itself, and
//! it must produce the same bytes on every node regardless of map insertion
//! order or struct field order (hence [`json::Map`] being backed by a
//! `BTreeMap`).

use std::fmt;

pub mod json;

pub use json::{Map as CjsonMap, ToCjson, Value as Cjson};

/// A value that can be turned into a deterministic byte string.
pub trait Canonical {
    type Error: std::error::Error;

    fn canonical_form(&self) -> Result<Vec<u8>, Self::Error>;
}

/// A UTF-8 string normalised to Unicode NFC, so that visually identical
/// values (e.g. in a fee or a ref name) always canonicalize to the same
/// bytes.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Cstring(String);

impl Cstring {
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Cstring {
    fn from(s: &str) -> Self {
        use unicode_normalization::UnicodeNormalization;
        Self(s.nfc().collect())
    }
}

impl From<String> for Cstring {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<Cstring> for String {
    fn from(Cstring(s): Cstring) -> Self {
        s
    }
}

impl fmt::Display for Cstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Cstring {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
