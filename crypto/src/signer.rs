// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use std::error::Error;

use crate::keys::{self, PublicKey, Signature};

/// Capability to produce signatures over arbitrary bytes, without exposing
/// the private key itself.
///
/// This is the seam the design notes call out: push-token signing, push
/// note endorsement and the git-sign hook all take `&dyn Signer` rather than
/// reaching for a process-global key.
pub trait Signer: Send + Sync + dyn_clone::DynClone + 'static {
    type Error: Error + Send + Sync + 'static;

    fn public_key(&self) -> PublicKey;

    fn sign(&self, data: &[u8]) -> Result<Signature, Self::Error>;
}

/// A boxed [`Error`] used as the associated error of [`BoxedSigner`].
pub struct BoxedSignError {
    error: Box<dyn Error + Send + Sync + 'static>,
}

impl BoxedSignError {
    pub fn from_std_error<T>(other: T) -> Self
    where
        T: Error + Send + Sync + 'static,
    {
        Self { error: Box::new(other) }
    }
}

impl std::fmt::Debug for BoxedSignError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.error)
    }
}

impl std::fmt::Display for BoxedSignError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for BoxedSignError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.error.source()
    }
}

/// A dynamically dispatched [`Signer`], so a node can hold "some signer or
/// other" (an in-memory key in tests, an ssh-agent-backed key in
/// production) behind one field.
pub struct BoxedSigner {
    signer: Box<dyn Signer<Error = BoxedSignError>>,
}

impl BoxedSigner {
    pub fn new<S>(signer: S) -> Self
    where
        S: Signer<Error = BoxedSignError>,
    {
        Self { signer: Box::new(signer) }
    }
}

impl Clone for BoxedSigner {
    fn clone(&self) -> Self {
        Self { signer: dyn_clone::clone_box(&*self.signer) }
    }
}

impl Signer for BoxedSigner {
    type Error = BoxedSignError;

    fn public_key(&self) -> PublicKey {
        self.signer.public_key()
    }

    fn sign(&self, data: &[u8]) -> Result<Signature, Self::Error> {
        self.signer.sign(data)
    }
}

impl Signer for keys::SecretKey {
    type Error = std::convert::Infallible;

    fn public_key(&self) -> PublicKey {
        self.public()
    }

    fn sign(&self, data: &[u8]) -> Result<Signature, Self::Error> {
        Ok(keys::SecretKey::sign(self, data))
    }
}

impl From<keys::SecretKey> for BoxedSigner {
    fn from(key: keys::SecretKey) -> Self {
        Self::from(SomeSigner { signer: key })
    }
}

/// Lifts any concrete [`Signer`] into one whose error has been erased, so it
/// can be wrapped in a [`BoxedSigner`].
#[derive(Clone)]
pub struct SomeSigner<S> {
    pub signer: S,
}

impl<S: Signer + Clone> Signer for SomeSigner<S> {
    type Error = BoxedSignError;

    fn public_key(&self) -> PublicKey {
        self.signer.public_key()
    }

    fn sign(&self, data: &[u8]) -> Result<Signature, Self::Error> {
        self.signer.sign(data).map_err(BoxedSignError::from_std_error)
    }
}

impl<S> From<SomeSigner<S>> for BoxedSigner
where
    S: Signer + Clone + Send + Sync + 'static,
{
    fn from(other: SomeSigner<S>) -> Self {
        BoxedSigner::new(other)
    }
}
