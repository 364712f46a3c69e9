// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

//! A thin capability surface over a git working copy, grounded on the
//! teacher's `git-ext`/`link-git` split: callers depend on the
//! [`RepoStore`] trait, never on `git2::Repository` directly, so the push
//! handler, authorization engine and refsync can be tested against an
//! in-memory double.

mod git;

use git_ext::Oid;

pub use git::GitRepoStore;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TreeEntry {
    pub name: String,
    pub oid: Oid,
    pub is_tree: bool,
}

/// The git object kind a [`RepoStore::write_object`] caller already knows,
/// mirroring `fetch::ObjectKind` without this crate depending on `fetch` —
/// refsync, which depends on both, converts between the two at its own
/// boundary.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
    Tag,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PackIndex {
    pub object_count: usize,
    pub bytes_received: u64,
    /// Object ids the packfile newly introduced to the store (absent
    /// before this call, present after) — what a [`crate::RepoStore`]
    /// caller threads into `push_note::PushedReference::objects`.
    pub objects: Vec<Oid>,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("reference not found: {0}")]
    RefNotFound(String),

    #[error("compare-and-swap failed: reference {name} was expected to be at {expected} but is at {actual}")]
    CompareAndSwapFailed { name: String, expected: Oid, actual: String },

    #[error(transparent)]
    Git(#[from] git2::Error),
}

/// Capability surface the rest of the push path depends on, instead of a
/// concrete `git2::Repository`.
pub trait RepoStore {
    /// The current target of `name`, or `None` if it does not exist.
    fn reference(&self, name: &str) -> Result<Option<Oid>, Error>;

    /// Atomically moves `name` from `old` to `new` (compare-and-swap).
    /// `old == Oid::ZERO` creates the reference; it must not already exist.
    fn update_reference(
        &self,
        name: &str,
        old: Oid,
        new: Oid,
        reflog_msg: &str,
    ) -> Result<(), Error>;

    /// Atomically removes `name`, provided its current target is still
    /// `old` (compare-and-swap delete).
    fn delete_reference(&self, name: &str, old: Oid) -> Result<(), Error>;

    /// Is `old` an ancestor of (or equal to) `new`?
    fn is_ancestor(&self, old: Oid, new: Oid) -> Result<bool, Error>;

    /// Does the object database already contain `oid`?
    fn contains(&self, oid: Oid) -> bool;

    /// Indexes a packfile streamed from `reader`, returning the objects it
    /// introduced.
    fn index_pack(&self, reader: &mut dyn std::io::Read) -> Result<PackIndex, Error>;

    /// Writes a single object directly to the object database, bypassing
    /// packfile framing. Used for objects that arrived individually over
    /// the object-transport protocol (§4.6) rather than as a packfile.
    fn write_object(&self, kind: ObjectKind, bytes: &[u8]) -> Result<Oid, Error>;

    /// Total on-disk size of the repository's object database, in bytes.
    fn disk_size(&self) -> Result<u64, Error>;

    /// Direct (non-recursive) entries of the tree at `oid`.
    fn tree_entries(&self, oid: Oid) -> Result<Vec<TreeEntry>, Error>;
}
