// Copyright © 2021-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use std::{fmt, str::FromStr};

use thiserror::Error;
use crypto::PublicKey;

/// A bech32-encoded user account address, human-readable part `zg`.
///
/// `repo.owners` and `repo.proposals[_].fees` key by this type (spec.md
/// §3's invariant "every `proposal.fees` key is a valid bech32 user
/// address" is exactly what [`FromStr`] enforces).
#[derive(Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct UserAddress(PublicKey);

const HRP: &str = "zg";

impl UserAddress {
    pub fn as_public_key(&self) -> &PublicKey {
        &self.0
    }
}

impl From<PublicKey> for UserAddress {
    fn from(pk: PublicKey) -> Self {
        Self(pk)
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AddressParseError {
    #[error(transparent)]
    Bech32(#[from] bech32::Error),

    #[error("unexpected human-readable part: expected `{HRP}`, got `{0}`")]
    WrongHrp(String),

    #[error("malformed public key")]
    MalformedKey,
}

impl fmt::Display for UserAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use bech32::ToBase32;
        let encoded = bech32::encode(HRP, self.0.as_bytes().to_base32(), bech32::Variant::Bech32)
            .expect("public key bytes are always a valid bech32 payload");
        f.write_str(&encoded)
    }
}

impl fmt::Debug for UserAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserAddress({})", self)
    }
}

impl FromStr for UserAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use bech32::FromBase32;
        let (hrp, data, _variant) = bech32::decode(s)?;
        if hrp != HRP {
            return Err(AddressParseError::WrongHrp(hrp));
        }
        let bytes = Vec::<u8>::from_base32(&data)?;
        PublicKey::try_from(bytes.as_slice())
            .map(Self)
            .map_err(|_| AddressParseError::MalformedKey)
    }
}

impl serde::Serialize for UserAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for UserAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
