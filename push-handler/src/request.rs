// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use git_ext::{Oid, Qualified};

/// One reference update from the client's ref-update request, with the
/// inline PEM block (if any) carrying its signed [`push_token::TxDetail`]
/// and the git-signature payload that PEM was signed over (spec.md §4.3
/// step 1).
#[derive(Clone, Debug)]
pub struct RefUpdateRequest {
    pub name: Qualified,
    pub old_hash: Oid,
    pub new_hash: Oid,
    pub pem: Option<String>,
    pub git_sig_payload: Vec<u8>,
}
