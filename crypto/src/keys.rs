// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use std::{convert::TryFrom, fmt, ops::Deref};

use ed25519_zebra as ed25519;
use thiserror::Error;
use zeroize::Zeroize;

pub const PUBLICKEYBYTES: usize = std::mem::size_of::<ed25519::VerificationKeyBytes>();

/// A push key's private half. Never implements `Debug` or `Display` outside
/// of tests -- only [`SecretKey::public`] is meant to leave the signing
/// boundary.
#[derive(Clone, Zeroize)]
#[cfg_attr(test, derive(Debug))]
#[zeroize(drop)]
pub struct SecretKey(ed25519::SigningKey);

#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct PublicKey(ed25519::VerificationKeyBytes);

#[derive(Clone, Eq, PartialEq)]
pub struct Signature(ed25519::Signature);

#[allow(clippy::new_without_default)]
impl SecretKey {
    pub fn new() -> Self {
        Self(ed25519::SigningKey::new(rand::thread_rng()))
    }

    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self(ed25519::SigningKey::from(seed))
    }

    pub fn public(&self) -> PublicKey {
        PublicKey(ed25519::VerificationKeyBytes::from(ed25519::VerificationKey::from(&self.0)))
    }

    pub fn sign(&self, data: &[u8]) -> Signature {
        Signature(self.0.sign(data))
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.public().fmt(f)
    }
}

impl AsRef<[u8]> for SecretKey {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IntoSecretKeyError {
    #[error("invalid secret key length")]
    InvalidSliceLength,
}

impl TryFrom<&[u8]> for SecretKey {
    type Error = IntoSecretKeyError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let sk = ed25519::SigningKey::try_from(bytes).map_err(|_| IntoSecretKeyError::InvalidSliceLength)?;
        Ok(Self(sk))
    }
}

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_ref()
    }

    pub fn verify(&self, sig: &Signature, data: &[u8]) -> Result<(), VerificationError> {
        let vk = ed25519::VerificationKey::try_from(self.0).map_err(|_| VerificationError::MalformedKey)?;
        vk.verify(&sig.0, data).map_err(|_| VerificationError::InvalidSignature)
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VerificationError {
    #[error("malformed public key")]
    MalformedKey,

    #[error("signature does not verify against the given data")]
    InvalidSignature,
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = IntoSecretKeyError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != PUBLICKEYBYTES {
            return Err(IntoSecretKeyError::InvalidSliceLength);
        }
        let mut buf = [0u8; PUBLICKEYBYTES];
        buf.copy_from_slice(bytes);
        Ok(Self(ed25519::VerificationKeyBytes::from(buf)))
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", multibase::encode(multibase::Base::Base58Btc, self.as_bytes()))
    }
}

impl serde::Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let (_, bytes) = multibase::decode(&s).map_err(serde::de::Error::custom)?;
        PublicKey::try_from(bytes.as_slice()).map_err(serde::de::Error::custom)
    }
}

impl Signature {
    pub fn as_bytes(&self) -> [u8; 64] {
        self.0.into()
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = IntoSecretKeyError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let sig = ed25519::Signature::try_from(bytes).map_err(|_| IntoSecretKeyError::InvalidSliceLength)?;
        Ok(Self(sig))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", multibase::encode(multibase::Base::Base58Btc, self.as_bytes()))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", multibase::encode(multibase::Base::Base58Btc, self.as_bytes()))
    }
}

impl serde::Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Signature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let (_, bytes) = multibase::decode(&s).map_err(serde::de::Error::custom)?;
        Signature::try_from(bytes.as_slice()).map_err(serde::de::Error::custom)
    }
}

impl Deref for Signature {
    type Target = ed25519::Signature;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify_roundtrip() {
        let sk = SecretKey::new();
        let sig = sk.sign(b"refs/heads/master");
        assert!(sk.public().verify(&sig, b"refs/heads/master").is_ok());
    }

    #[test]
    fn verify_rejects_tampered_data() {
        let sk = SecretKey::new();
        let sig = sk.sign(b"refs/heads/master");
        assert!(sk.public().verify(&sig, b"refs/heads/mistress").is_err());
    }
}
