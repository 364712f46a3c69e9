// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use git_ext::Qualified;
use identifier::NamespaceName;
use rust_decimal::Decimal;

use crate::{
    contributor::FeeMode,
    policy::{self, Effect, PolicyAction},
    push_key::PushKey,
    repository::Repository,
    Error,
};

/// The action a pushed reference update is attempting (spec.md §4.4).
///
/// `MergeWrite` carries whether the gating merge-request proposal has
/// already been evaluated as `Accepted` — proposal lookup and outcome
/// evaluation is `zango-governance`'s concern, not this crate's; by the
/// time a caller reaches `authorize`, it already knows the answer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PushAction {
    Create,
    Update,
    Delete,
    MergeWrite { proposal_accepted: bool },
}

impl PushAction {
    fn as_policy_action(self) -> PolicyAction {
        match self {
            PushAction::Create => PolicyAction::Create,
            PushAction::Update => PolicyAction::Update,
            PushAction::Delete => PolicyAction::Delete,
            PushAction::MergeWrite { .. } => PolicyAction::MergeWrite,
        }
    }
}

/// Evaluates an incoming reference update against owners, contributors,
/// policies, the fee gate and the scope gate, in that order (spec.md
/// §4.4). Returns `Ok(())` on authorization, the first denial otherwise.
#[tracing::instrument(skip(repo, pusher), fields(reference = %reference))]
pub fn authorize(
    repo: &Repository,
    pusher: &PushKey,
    namespace: Option<&NamespaceName>,
    repo_name: &identifier::RepoName,
    reference: &Qualified,
    action: PushAction,
    fee: Decimal,
    pusher_account_balance: Decimal,
) -> Result<(), Error> {
    if repo.is_owner(&pusher.address) {
        return match action {
            PushAction::Create | PushAction::Update | PushAction::Delete => Ok(()),
            PushAction::MergeWrite { proposal_accepted } => {
                if proposal_accepted {
                    Ok(())
                } else {
                    Err(Error::ProposalNotAccepted)
                }
            }
        };
    }

    let contributor = repo
        .contributor(&pusher.id())
        .ok_or(Error::NotAContributor)?;

    if let PushAction::MergeWrite { proposal_accepted: false } = action {
        return Err(Error::ProposalNotAccepted);
    }

    let policy_action = action.as_policy_action();
    let combined: Vec<_> = repo
        .config
        .policies
        .iter()
        .cloned()
        .chain(contributor.policies.iter().cloned())
        .collect();
    match policy::evaluate(&combined, reference, policy_action) {
        Some(Effect::Deny) => return Err(Error::PolicyDeny),
        Some(Effect::Allow) | None => {}
    }

    match contributor.fee_mode {
        FeeMode::PusherPays => {
            if pusher_account_balance < fee {
                return Err(Error::InsufficientBalance);
            }
        }
        FeeMode::RepoPays => {
            if repo.balance < fee {
                return Err(Error::InsufficientBalance);
            }
        }
        FeeMode::RepoPaysCapped => {
            if contributor.fee_used + fee > contributor.fee_cap {
                return Err(Error::FeeCapExceeded);
            }
            if repo.balance < fee {
                return Err(Error::InsufficientBalance);
            }
        }
    }

    if !pusher.in_scope(namespace, repo_name) {
        return Err(Error::OutOfScope);
    }

    Ok(())
}
