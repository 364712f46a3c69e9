// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::{keys, PublicKey};

/// Identifies a push key across the whole network: it is what a
/// `pushKeyID` field in a transaction detail, or a `contributors` map key
/// in repository state, actually holds.
///
/// Canonical textual form is bech32, human-readable part `pk`, matching the
/// convention used for user addresses (`zango-identifier`) so both read the
/// same way at a glance.
#[derive(Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct PushKeyId(PublicKey);

const HRP: &str = "pk";

impl PushKeyId {
    pub fn as_public_key(&self) -> &PublicKey {
        &self.0
    }
}

impl From<PublicKey> for PushKeyId {
    fn from(pk: PublicKey) -> Self {
        Self(pk)
    }
}

impl From<keys::SecretKey> for PushKeyId {
    fn from(sk: keys::SecretKey) -> Self {
        Self(sk.public())
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error(transparent)]
    Bech32(#[from] bech32::Error),

    #[error("unexpected human-readable part: expected `{HRP}`, got `{0}`")]
    WrongHrp(String),

    #[error("malformed public key")]
    MalformedKey,
}

impl fmt::Display for PushKeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use bech32::ToBase32;
        let encoded = bech32::encode(HRP, self.0.as_bytes().to_base32(), bech32::Variant::Bech32)
            .expect("push key bytes are always a valid bech32 payload");
        f.write_str(&encoded)
    }
}

impl fmt::Debug for PushKeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PushKeyId({})", self)
    }
}

impl FromStr for PushKeyId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use bech32::FromBase32;
        let (hrp, data, _variant) = bech32::decode(s)?;
        if hrp != HRP {
            return Err(ParseError::WrongHrp(hrp));
        }
        let bytes = Vec::<u8>::from_base32(&data)?;
        PublicKey::try_from(bytes.as_slice())
            .map(Self)
            .map_err(|_| ParseError::MalformedKey)
    }
}

impl serde::Serialize for PushKeyId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for PushKeyId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
