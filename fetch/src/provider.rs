// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use std::time::Duration;

use git_ext::Oid;

/// Type-erased provider error; providers live behind peer streams this
/// crate knows nothing about, so their failure modes are opaque to it.
pub type ProviderError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The git object kind a [`Provider::send`] reply carries, needed to
/// reproduce git's own content hash over the returned bytes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl From<ObjectKind> for git2::ObjectType {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Blob => git2::ObjectType::Blob,
            ObjectKind::Tree => git2::ObjectType::Tree,
            ObjectKind::Commit => git2::ObjectType::Commit,
            ObjectKind::Tag => git2::ObjectType::Tag,
        }
    }
}

/// One peer able to serve objects over a want/send stream (spec.md §4.6).
/// The stream protocol itself (a libp2p-style peer connection) is a
/// collaborator this crate only talks to through this trait — consistent
/// with the design note on function-injected collaborators.
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    /// A stable identifier for concurrency bookkeeping (per-provider
    /// in-flight caps) and logging.
    fn id(&self) -> &str;

    /// An estimate of this provider's round-trip latency, used to prefer
    /// the fastest claimant in the send phase.
    fn latency(&self) -> Duration;

    /// Want phase: which of `hashes` does this provider claim to have?
    async fn want(&self, hashes: &[Oid]) -> Result<Vec<Oid>, ProviderError>;

    /// Send phase: fetch the object `hash`, along with the kind needed to
    /// verify its content hash.
    async fn send(&self, hash: Oid) -> Result<(ObjectKind, Vec<u8>), ProviderError>;
}

/// Verifies `bytes` hashes to `expected` under git's own object hashing
/// (type-and-size-prefixed), the same check `send` phase replies must pass
/// before being accepted.
pub fn verify_object(expected: Oid, kind: ObjectKind, bytes: &[u8]) -> Result<(), crate::Error> {
    let actual: Oid = git2::Oid::hash_object(kind.into(), bytes)
        .map(Oid::from)
        .unwrap_or_default();
    if actual == expected {
        Ok(())
    } else {
        Err(crate::Error::ObjectHashMismatch { expected, actual })
    }
}
