// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

//! Validated git reference names.
//!
//! A pushed reference always arrives as a free-form string (from the
//! client's ref-update request, or from a PEM header). Every other
//! subsystem — the authorization engine, the push pool, reference sync —
//! wants to deal in values that are already known to be well-formed git
//! refs, so we validate once at the boundary and pass [`Qualified`] around
//! from then on.

use std::{
    convert::TryFrom,
    ffi::CString,
    fmt::{self, Display},
    ops::Deref,
    str::{self, FromStr},
};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid utf8")]
    Utf8,

    #[error("not a valid git ref name or pattern")]
    RefFormat,

    #[error("input contains a nul byte")]
    Nul,

    #[error(transparent)]
    Git(#[from] git2::Error),
}

fn normalize_name(s: &str, flags: git2::ReferenceFormat) -> Result<String, Error> {
    if s == "@" {
        return Err(Error::RefFormat);
    }

    let nulsafe = CString::new(s)
        .map_err(|_| Error::Nul)?
        .into_string()
        .map_err(|_| Error::Utf8)?;

    git2::Reference::normalize_name(&nulsafe, flags).map_err(|e| match e.code() {
        git2::ErrorCode::InvalidSpec => Error::RefFormat,
        _ => Error::Git(e),
    })
}

/// An owned, validated git ref name (as per `git-check-ref-format
/// --normalize --allow-onelevel`), additionally required to be valid utf8.
///
/// Refspec patterns (e.g. `refs/heads/*`) are not [`RefLike`] — see
/// [`RefspecPattern`] for those.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Hash, serde::Serialize, serde::Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct RefLike(String);

impl RefLike {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn join<Other: Into<Self>>(&self, other: Other) -> Self {
        Self(format!("{}/{}", self.0, other.into().0))
    }
}

impl Deref for RefLike {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for RefLike {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for RefLike {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        normalize_name(
            s,
            git2::ReferenceFormat::ALLOW_ONELEVEL | git2::ReferenceFormat::REFSPEC_SHORTHAND,
        )
        .map(Self)
    }
}

impl TryFrom<String> for RefLike {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_from(s.as_str())
    }
}

impl FromStr for RefLike {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl From<RefLike> for String {
    fn from(RefLike(path): RefLike) -> Self {
        path
    }
}

impl Display for RefLike {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A [`RefLike`] **with** a `refs/` prefix.
///
/// Conversion from an unqualified [`RefLike`] assumes `refs/heads/`, which
/// matches how a bare branch name arrives from the git client.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Hash, serde::Serialize, serde::Deserialize)]
#[serde(into = "String", try_from = "RefLike")]
pub struct Qualified(String);

impl Qualified {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Does this reference live under `refs/heads/*`?
    pub fn is_branch(&self) -> bool {
        self.0.starts_with("refs/heads/")
    }

    /// Does this reference live under `refs/tags/*`?
    pub fn is_tag(&self) -> bool {
        self.0.starts_with("refs/tags/")
    }
}

impl Deref for Qualified {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for Qualified {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<RefLike> for Qualified {
    fn from(RefLike(path): RefLike) -> Self {
        if path.starts_with("refs/") {
            Self(path)
        } else {
            Self(format!("refs/heads/{}", path))
        }
    }
}

impl TryFrom<&str> for Qualified {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        RefLike::try_from(s).map(Self::from)
    }
}

impl TryFrom<String> for Qualified {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_from(s.as_str())
    }
}

impl FromStr for Qualified {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl From<Qualified> for RefLike {
    fn from(Qualified(path): Qualified) -> Self {
        Self(path)
    }
}

impl From<Qualified> for String {
    fn from(Qualified(path): Qualified) -> Self {
        path
    }
}

impl Display for Qualified {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A [`RefLike`] which may additionally contain a single `*` (a refspec
/// pattern), used by authorization policies to match a whole namespace of
/// references (e.g. `refs/heads/*`).
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Hash, serde::Serialize, serde::Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct RefspecPattern(String);

impl RefspecPattern {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Specificity used by the authorization engine to order policy matches:
    /// exact > prefix > wildcard.
    pub fn matches(&self, candidate: &Qualified) -> bool {
        match self.0.strip_suffix('*') {
            Some(prefix) => candidate.as_str().starts_with(prefix),
            None => self.0 == candidate.as_str(),
        }
    }
}

impl Deref for RefspecPattern {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<&str> for RefspecPattern {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        normalize_name(
            s,
            git2::ReferenceFormat::ALLOW_ONELEVEL
                | git2::ReferenceFormat::REFSPEC_SHORTHAND
                | git2::ReferenceFormat::REFSPEC_PATTERN,
        )
        .map(Self)
    }
}

impl TryFrom<String> for RefspecPattern {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_from(s.as_str())
    }
}

impl FromStr for RefspecPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl Display for RefspecPattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualifies_bare_branch_name() {
        let q = Qualified::try_from("master").unwrap();
        assert_eq!(q.as_str(), "refs/heads/master");
        assert!(q.is_branch());
    }

    #[test]
    fn rejects_empty_component() {
        assert!(RefLike::try_from("refs//heads").is_err());
    }

    #[test]
    fn pattern_specificity() {
        let exact = RefspecPattern::try_from("refs/heads/master").unwrap();
        let prefix = RefspecPattern::try_from("refs/heads/*").unwrap();
        let target = Qualified::try_from("refs/heads/master").unwrap();
        assert!(exact.matches(&target));
        assert!(prefix.matches(&target));
    }
}
