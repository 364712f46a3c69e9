// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use std::sync::Mutex;

use git_ext::Oid;
use tracing::instrument;

use crate::{Error, ObjectKind, PackIndex, RepoStore, TreeEntry};

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

/// [`RepoStore`] backed by a real `git2::Repository`. `git2::Repository`
/// isn't `Sync`, so access is serialized behind a mutex; the push handler
/// and refsync additionally serialize per-`(repo, reference)` above this
/// (§5's keyed lock map), so contention here is expected to be rare.
pub struct GitRepoStore {
    repo: Mutex<git2::Repository>,
}

impl GitRepoStore {
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, Error> {
        Ok(Self { repo: Mutex::new(git2::Repository::open(path)?) })
    }

    pub fn init_bare(path: impl AsRef<std::path::Path>) -> Result<Self, Error> {
        Ok(Self { repo: Mutex::new(git2::Repository::init_bare(path)?) })
    }
}

impl RepoStore for GitRepoStore {
    fn reference(&self, name: &str) -> Result<Option<Oid>, Error> {
        let repo = self.repo.lock().expect("repo mutex poisoned");
        match repo.find_reference(name) {
            Ok(r) => Ok(r.target().map(Oid::from)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self), fields(name, %old, %new))]
    fn update_reference(
        &self,
        name: &str,
        old: Oid,
        new: Oid,
        reflog_msg: &str,
    ) -> Result<(), Error> {
        let repo = self.repo.lock().expect("repo mutex poisoned");
        let current = match repo.find_reference(name) {
            Ok(r) => r.target().map(Oid::from),
            Err(e) if e.code() == git2::ErrorCode::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        match current {
            Some(actual) if actual != old => {
                return Err(Error::CompareAndSwapFailed {
                    name: name.to_string(),
                    expected: old,
                    actual: actual.to_string(),
                })
            }
            None if !old.is_zero() => {
                return Err(Error::CompareAndSwapFailed {
                    name: name.to_string(),
                    expected: old,
                    actual: Oid::default().to_string(),
                })
            }
            _ => {}
        }

        repo.reference(name, new.into(), true, reflog_msg)?;
        Ok(())
    }

    #[instrument(skip(self), fields(name, %old))]
    fn delete_reference(&self, name: &str, old: Oid) -> Result<(), Error> {
        let repo = self.repo.lock().expect("repo mutex poisoned");
        let mut reference = repo
            .find_reference(name)
            .map_err(|_| Error::RefNotFound(name.to_string()))?;
        let actual = reference.target().map(Oid::from).unwrap_or_default();
        if actual != old {
            return Err(Error::CompareAndSwapFailed {
                name: name.to_string(),
                expected: old,
                actual: actual.to_string(),
            });
        }
        reference.delete()?;
        Ok(())
    }

    fn is_ancestor(&self, old: Oid, new: Oid) -> Result<bool, Error> {
        if old.is_zero() {
            return Ok(true);
        }
        let repo = self.repo.lock().expect("repo mutex poisoned");
        Ok(repo.graph_descendant_of(new.into(), old.into())? || old == new)
    }

    fn contains(&self, oid: Oid) -> bool {
        let repo = self.repo.lock().expect("repo mutex poisoned");
        repo.find_object(oid.into(), None).is_ok()
    }

    fn index_pack(&self, reader: &mut dyn std::io::Read) -> Result<PackIndex, Error> {
        let repo = self.repo.lock().expect("repo mutex poisoned");
        let odb = repo.odb()?;

        let mut before = std::collections::HashSet::new();
        odb.foreach(|oid| {
            before.insert(*oid);
            true
        })?;

        let mut writer = odb.packwriter()?;
        let bytes_received = std::io::copy(reader, &mut writer).map_err(|e| {
            Error::Git(git2::Error::from_str(&format!("packfile io error: {e}")))
        })?;
        writer.commit()?;

        let mut objects = Vec::new();
        odb.foreach(|oid| {
            if !before.contains(oid) {
                objects.push(Oid::from(*oid));
            }
            true
        })?;

        Ok(PackIndex { object_count: objects.len(), bytes_received, objects })
    }

    fn write_object(&self, kind: ObjectKind, bytes: &[u8]) -> Result<Oid, Error> {
        let repo = self.repo.lock().expect("repo mutex poisoned");
        let odb = repo.odb()?;
        let oid = odb.write(kind.into(), bytes)?;
        Ok(oid.into())
    }

    fn disk_size(&self) -> Result<u64, Error> {
        let repo = self.repo.lock().expect("repo mutex poisoned");
        let odb = repo.odb()?;
        let mut total = 0u64;
        odb.foreach(|oid| {
            if let Ok(obj) = odb.read(*oid) {
                total += obj.data().len() as u64;
            }
            true
        })?;
        Ok(total)
    }

    fn tree_entries(&self, oid: Oid) -> Result<Vec<TreeEntry>, Error> {
        let repo = self.repo.lock().expect("repo mutex poisoned");
        let tree = repo.find_tree(oid.into())?;
        Ok(tree
            .iter()
            .map(|entry| TreeEntry {
                name: entry.name().unwrap_or_default().to_string(),
                oid: entry.id().into(),
                is_tree: entry.kind() == Some(git2::ObjectType::Tree),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_blob_oid(repo: &git2::Repository) -> git2::Oid {
        repo.blob(b"").unwrap()
    }

    #[test]
    fn create_via_zero_cas_then_fast_forward() {
        let dir = tempfile::tempdir().unwrap();
        let store = GitRepoStore::init_bare(dir.path()).unwrap();

        let sig = {
            let repo = store.repo.lock().unwrap();
            let blob = empty_blob_oid(&repo);
            let mut builder = repo.treebuilder(None).unwrap();
            builder.insert("file", blob, 0o100644).unwrap();
            let tree_oid = builder.write().unwrap();
            let tree = repo.find_tree(tree_oid).unwrap();
            let sig = git2::Signature::now("test", "test@example.com").unwrap();
            let commit_oid = repo
                .commit(None, &sig, &sig, "first", &tree, &[])
                .unwrap();
            commit_oid
        };

        store
            .update_reference("refs/heads/master", Oid::default(), sig.into(), "push")
            .unwrap();
        assert_eq!(store.reference("refs/heads/master").unwrap(), Some(sig.into()));

        let err = store
            .update_reference("refs/heads/master", Oid::default(), sig.into(), "push")
            .unwrap_err();
        assert!(matches!(err, Error::CompareAndSwapFailed { .. }));
    }

    #[test]
    fn missing_reference_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = GitRepoStore::init_bare(dir.path()).unwrap();
        assert_eq!(store.reference("refs/heads/nonexistent").unwrap(), None);
    }
}
