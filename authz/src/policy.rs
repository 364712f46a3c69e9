// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use git_ext::{Qualified, RefspecPattern};

/// The action half of a policy's `(object, action)` pair; mirrors
/// [`crate::PushAction`] but without the merge-write proposal payload,
/// since a policy only ever matches on the *kind* of action.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum PolicyAction {
    Create,
    Update,
    Delete,
    MergeWrite,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// A single `object × action → effect` authorization rule (spec.md §4.4
/// step 3). `object` is matched against the target reference with
/// [`RefspecPattern::matches`], whose doc comment already defines the
/// exact/prefix/wildcard specificity this module ranks by.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Policy {
    pub object: RefspecPattern,
    pub action: PolicyAction,
    pub effect: Effect,
}

/// 0 = exact match, 1 = prefix match, 2 = wildcard — lower sorts first.
fn specificity(pattern: &RefspecPattern) -> u8 {
    match pattern.as_str().strip_suffix('*') {
        None => 0,
        Some(prefix) if prefix.is_empty() => 2,
        Some(_) => 1,
    }
}

/// Evaluates `policies` against `reference`/`action`, returning the most
/// specific explicit match. Ties are broken by `deny` over `allow` (spec.md
/// §4.4 step 3).
pub fn evaluate(policies: &[Policy], reference: &Qualified, action: PolicyAction) -> Option<Effect> {
    policies
        .iter()
        .filter(|p| p.action == action && p.object.matches(reference))
        .min_by_key(|p| (specificity(&p.object), matches!(p.effect, Effect::Allow) as u8))
        .map(|p| p.effect)
}
