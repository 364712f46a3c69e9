// Copyright © 2021-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::{address::AddressParseError, name::NameError, NamespaceName, RepoName, UserAddress};

/// A parsed repository-resource URI.
///
/// Three forms, per the native-prefix / user-namespace scheme:
/// - `a/<address>/<repo>` — address-scoped: repo is owned by `address` directly.
/// - `r/<repo>` — raw, unscoped repo name.
/// - `ns/<name>/<repo>` — user-namespace scoped.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResourceUri {
    Address { address: UserAddress, repo: RepoName },
    Raw { repo: RepoName },
    Namespace { namespace: NamespaceName, repo: RepoName },
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UriParseError {
    #[error("empty URI")]
    Empty,

    #[error("unrecognized URI prefix: expected `a/`, `r/` or `ns/`")]
    UnknownPrefix,

    #[error("`a/` URI must have the form `a/<address>/<repo>`")]
    MissingAddressSegment,

    #[error("`ns/` URI must have the form `ns/<name>/<repo>`")]
    MissingNamespaceSegment,

    #[error("`r/` URI must have the form `r/<repo>`")]
    MissingRepoSegment,

    #[error(transparent)]
    Address(#[from] AddressParseError),

    #[error(transparent)]
    Name(#[from] NameError),
}

impl FromStr for ResourceUri {
    type Err = UriParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(UriParseError::Empty);
        }
        let mut segments = s.split('/');
        match segments.next() {
            Some("a") => {
                let address = segments
                    .next()
                    .ok_or(UriParseError::MissingAddressSegment)?;
                let repo = segments
                    .next()
                    .ok_or(UriParseError::MissingAddressSegment)?;
                if segments.next().is_some() {
                    return Err(UriParseError::MissingAddressSegment);
                }
                Ok(ResourceUri::Address {
                    address: address.parse()?,
                    repo: repo.parse()?,
                })
            }
            Some("r") => {
                let repo = segments.next().ok_or(UriParseError::MissingRepoSegment)?;
                if segments.next().is_some() {
                    return Err(UriParseError::MissingRepoSegment);
                }
                Ok(ResourceUri::Raw {
                    repo: repo.parse()?,
                })
            }
            Some("ns") => {
                let namespace = segments
                    .next()
                    .ok_or(UriParseError::MissingNamespaceSegment)?;
                let repo = segments
                    .next()
                    .ok_or(UriParseError::MissingNamespaceSegment)?;
                if segments.next().is_some() {
                    return Err(UriParseError::MissingNamespaceSegment);
                }
                Ok(ResourceUri::Namespace {
                    namespace: namespace.parse()?,
                    repo: repo.parse()?,
                })
            }
            _ => Err(UriParseError::UnknownPrefix),
        }
    }
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceUri::Address { address, repo } => write!(f, "a/{address}/{repo}"),
            ResourceUri::Raw { repo } => write!(f, "r/{repo}"),
            ResourceUri::Namespace { namespace, repo } => write!(f, "ns/{namespace}/{repo}"),
        }
    }
}
