// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

#![warn(clippy::extra_unused_lifetimes)]

//! Signing keys shared by the whole push path.
//!
//! A push-key signature is the root of trust for everything downstream of
//! it: the push token (`zango-push-token`) binds a [`Signature`] to a
//! transaction detail, the push note carries both the pusher's and the
//! receiving node's signature, and the authorization engine looks up
//! contributors by [`PushKeyId`].

mod keys;
pub use keys::{IntoSecretKeyError, PublicKey, SecretKey, Signature, PUBLICKEYBYTES};

pub mod push_key;
pub use push_key::PushKeyId;

mod signer;
pub use signer::{BoxedSignError, BoxedSigner, Signer, SomeSigner};
