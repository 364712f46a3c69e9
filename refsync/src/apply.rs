// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use git_ext::Oid;
use identifier::RepoName;
use repo_store::RepoStore;

use crate::{task::WatcherTask, watermark::{Watermark, WatermarkStore}, Error};

/// Bridges the object-transport protocol (spec.md §4.6) to the local
/// store: a real implementation drives `fetch::Requester` against the
/// providers discovered for `repo`, verifying each object's hash along the
/// way (`fetch::verify_object`), and returns the kind+bytes pairs this
/// module writes straight to the odb via [`repo_store::RepoStore::write_object`].
/// Kept as its own trait (rather than refsync depending on `fetch::Requester`
/// directly) so tests can stub it without standing up providers.
#[async_trait::async_trait]
pub trait ObjectFetcher: Send + Sync {
    async fn fetch_missing(
        &self,
        repo: &RepoName,
        hashes: &[Oid],
    ) -> Result<Vec<(fetch::ObjectKind, Vec<u8>)>, fetch::Error>;
}

fn to_repo_store_kind(kind: fetch::ObjectKind) -> repo_store::ObjectKind {
    match kind {
        fetch::ObjectKind::Blob => repo_store::ObjectKind::Blob,
        fetch::ObjectKind::Tree => repo_store::ObjectKind::Tree,
        fetch::ObjectKind::Commit => repo_store::ObjectKind::Commit,
        fetch::ObjectKind::Tag => repo_store::ObjectKind::Tag,
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Applied {
    /// The local tip already matched `task.new_hash`; nothing to do.
    NoOp,
    Updated,
}

/// Runs the per-task algorithm of spec.md §4.5 "Algorithm per task":
/// 1. if the local tip already matches, no-op;
/// 2. apply a delete, or fetch any missing objects and index them;
/// 3. for non-create updates, require `old_hash` be an ancestor of `new_hash`;
/// 4. compare-and-swap the reference to `new_hash`;
/// 5. on success, record the applied-height watermark.
#[tracing::instrument(skip_all, fields(repo = %task.repo, reference = %task.reference))]
pub async fn apply_task<S, F, W>(
    repo_store: &S,
    fetcher: &F,
    watermarks: &W,
    task: &WatcherTask,
) -> Result<Applied, Error>
where
    S: RepoStore,
    F: ObjectFetcher,
    W: WatermarkStore,
{
    let current = repo_store.reference(task.reference.as_str())?;

    if current == Some(task.new_hash) {
        return Ok(Applied::NoOp);
    }

    if task.is_delete() {
        let old = current.unwrap_or_default();
        repo_store.delete_reference(task.reference.as_str(), old).map_err(non_fast_forward(task))?;
    } else {
        let missing: Vec<Oid> = task.objects.iter().copied().filter(|oid| !repo_store.contains(*oid)).collect();
        if !missing.is_empty() {
            let fetched = fetcher.fetch_missing(&task.repo, &missing).await?;
            for (kind, bytes) in fetched {
                repo_store.write_object(to_repo_store_kind(kind), &bytes)?;
            }
        }

        if !task.is_create() {
            let reachable = repo_store.is_ancestor(task.old_hash, task.new_hash)?;
            if !reachable {
                return Err(Error::AncestryMissing { reference: task.reference.to_string() });
            }
        }

        let expected_old = current.unwrap_or_default();
        repo_store
            .update_reference(task.reference.as_str(), expected_old, task.new_hash, "refsync: apply finalized push")
            .map_err(non_fast_forward(task))?;
    }

    watermarks.set(Watermark {
        repo: task.repo.clone(),
        reference: task.reference.clone(),
        applied_height: task.start_height,
        applied_nonce: task.nonce,
    });

    Ok(Applied::Updated)
}

fn non_fast_forward(task: &WatcherTask) -> impl Fn(repo_store::Error) -> Error + '_ {
    move |err| match err {
        repo_store::Error::CompareAndSwapFailed { .. } => Error::NonFastForward(task.reference.to_string()),
        other => Error::RepoStore(other),
    }
}
