// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

//! The server-side push handler: the seven-step pipeline a ref-update
//! request runs through between arriving over the git wire protocol and
//! landing in the push pool (spec.md §4.3).

use std::io::Read;

use crypto::BoxedSigner;
use git_ext::Qualified;
use identifier::{NamespaceName, RepoName};
use repo_store::RepoStore;
use rust_decimal::Decimal;

use crate::{
    capability::{GitReceiver, ProposalLookup},
    request::RefUpdateRequest,
    Error,
};

/// Size and shape limits applied at the GC/size gate (spec.md §4.3 step 5),
/// threaded in by the caller rather than read from the environment.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    pub max_delta_objects: usize,
    pub max_repo_size: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self { max_delta_objects: 100_000, max_repo_size: 50 * 1024 * 1024 * 1024 }
    }
}

/// Everything `handle_stream` produced for a push that made it all the way
/// through admission.
pub struct Outcome {
    pub note: push_note::PushNote,
    pub endorsement: push_note::PushEndorsement,
}

/// Runs one push through the full pipeline: parse and verify each
/// reference's transaction detail, authorize every update, ingest the
/// packfile, apply the GC/size gate, build and sign the resulting
/// [`push_note::PushNote`], and admit it to `pool`.
///
/// Failure at any step rejects every reference in the push — spec.md
/// §4.3's failure policy is all-or-nothing, never a partially accepted
/// push — and the underlying git receiver is told so via `git_receiver`.
#[allow(clippy::too_many_arguments)]
#[tracing::instrument(skip_all, fields(repo = %repo_name, refs = updates.len()))]
pub fn handle_stream<S: RepoStore>(
    repo_name: &RepoName,
    namespace: Option<&NamespaceName>,
    updates: &[RefUpdateRequest],
    pack_reader: &mut dyn Read,
    repo_store: &S,
    authz_repo: &authz::Repository,
    pusher: &authz::PushKey,
    pusher_account_nonce: u64,
    pusher_account_balance: Decimal,
    proposals: &dyn ProposalLookup,
    node_signer: &BoxedSigner,
    pool: &push_pool::Pool,
    config: &Config,
    git_receiver: &dyn GitReceiver,
    arrival_timestamp: u64,
) -> Result<Outcome, Error> {
    use crypto::Signer;

    let ref_names: Vec<Qualified> = updates.iter().map(|u| u.name.clone()).collect();

    // Steps 1-2: every reference must carry a verifiable transaction detail
    // whose signed reference name matches the update it rides on.
    let mut details = Vec::with_capacity(updates.len());
    for update in updates {
        let pem = match &update.pem {
            Some(pem) => pem,
            None => {
                git_receiver.reject(&ref_names, "missing tx detail");
                return Err(Error::MissingTxDetail(update.name.to_string()));
            }
        };

        let detail = match push_token::verify_pem(pem, &update.git_sig_payload) {
            Ok(detail) => detail,
            Err(e) => {
                git_receiver.reject(&ref_names, &e.to_string());
                return Err(e.into());
            }
        };

        if detail.reference != update.name {
            git_receiver.reject(&ref_names, "reference mismatch");
            return Err(Error::ReferenceMismatch {
                reference: update.name.to_string(),
                declared: update.name.to_string(),
                signed: detail.reference.to_string(),
            });
        }

        if update.old_hash.is_zero() && update.new_hash.is_zero() {
            git_receiver.reject(&ref_names, "both old and new hash are zero");
            return Err(Error::ZeroZero(update.name.to_string()));
        }

        details.push(detail);
    }

    // Step 3: authorization, fail-fast on the first denial.
    for (update, detail) in updates.iter().zip(&details) {
        let action = push_action(update, detail, repo_name, proposals);
        let fee: Decimal = detail.fee.parse().unwrap_or(Decimal::ZERO);

        if let Err(e) = authz::authorize(
            authz_repo,
            pusher,
            namespace,
            repo_name,
            &update.name,
            action,
            fee,
            pusher_account_balance,
        ) {
            git_receiver.reject(&ref_names, &e.to_string());
            return Err(e.into());
        }
    }

    // Step 4: packfile ingestion.
    let pack = repo_store.index_pack(pack_reader)?;

    // Step 5: GC/size gate. `index_pack` has already committed the objects
    // to the odb by this point — git2's packwriter offers no uncommit, so a
    // gate failure here leaves those objects written but unreferenced,
    // documented in DESIGN.md as a known limitation rather than a real
    // transactional rollback.
    if pack.object_count > config.max_delta_objects {
        git_receiver.reject(&ref_names, "too many delta objects");
        return Err(Error::TooManyDeltaObjects { got: pack.object_count, max: config.max_delta_objects });
    }
    let disk_size = repo_store.disk_size()?;
    if disk_size > config.max_repo_size {
        git_receiver.reject(&ref_names, "repository size quota exceeded");
        return Err(Error::RepoSizeExceeded { got: disk_size, max: config.max_repo_size });
    }

    // Step 6: construct and sign the push note. The packed object list is
    // duplicated across every reference in a multi-reference push rather
    // than partitioned per reference's object graph — a documented
    // simplification, see DESIGN.md.
    let references = updates
        .iter()
        .zip(&details)
        .map(|(update, detail)| {
            let nonce = authz_repo
                .references
                .get(update.name.as_str())
                .map(|r| r.nonce + 1)
                .unwrap_or(1);
            push_note::PushedReference {
                name: update.name.clone(),
                old_hash: update.old_hash,
                new_hash: update.new_hash,
                nonce,
                account_nonce: pusher_account_nonce,
                fee: detail.fee.clone(),
                objects: pack.objects.clone(),
                delete: update.new_hash.is_zero(),
            }
        })
        .collect();

    let mut note = push_note::PushNote {
        repo_name: repo_name.clone(),
        references,
        pusher_address: pusher.address,
        pusher_key_id: pusher.id(),
        pusher_account_nonce,
        size: pack.bytes_received,
        timestamp: arrival_timestamp,
        creator_pub_key: pusher.pub_key,
        creator_signature: None,
        remote_node_signature: None,
    };

    let note_id = note.id();
    let node_signature = node_signer.sign(note_id.as_bytes()).map_err(|_| Error::Signing)?;
    note.remote_node_signature = Some(node_signature.clone());

    // Step 7: admission to the pool.
    if let Err(e) = pool.add(note.clone(), arrival_timestamp) {
        git_receiver.reject(&ref_names, &e.to_string());
        return Err(e.into());
    }

    let endorsement = push_note::PushEndorsement::new(note_id, node_signature, node_signer.public_key());
    git_receiver.accept(&ref_names);

    Ok(Outcome { note, endorsement })
}

fn push_action(
    update: &RefUpdateRequest,
    detail: &push_token::TxDetail,
    repo_name: &RepoName,
    proposals: &dyn ProposalLookup,
) -> authz::PushAction {
    if let Some(proposal_id) = &detail.merge_proposal_id {
        return authz::PushAction::MergeWrite {
            proposal_accepted: proposals.is_accepted(repo_name, proposal_id),
        };
    }
    if update.old_hash.is_zero() {
        authz::PushAction::Create
    } else if update.new_hash.is_zero() {
        authz::PushAction::Delete
    } else {
        authz::PushAction::Update
    }
}
