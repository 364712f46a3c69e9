// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use crypto::{PublicKey, Signature};

use crate::note::NoteId;

/// A node's broadcast attestation that it validated and admitted a
/// [`crate::PushNote`] to its pool.
///
/// Endorsements are aggregated by the external consensus engine into the
/// BFT quorum that finalizes a note; this type only carries the one node's
/// contribution.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PushEndorsement {
    pub note_id: NoteId,
    pub node_signature: Signature,
    pub node_pub_key: PublicKey,
}

impl PushEndorsement {
    pub fn new(note_id: NoteId, node_signature: Signature, node_pub_key: PublicKey) -> Self {
        Self {
            note_id,
            node_signature,
            node_pub_key,
        }
    }

    /// Verifies the node's signature against the note id's bytes.
    pub fn verify(&self) -> Result<(), crypto::VerificationError> {
        self.node_pub_key.verify(&self.node_signature, self.note_id.as_bytes())
    }
}
