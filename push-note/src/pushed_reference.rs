// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use std::convert::Infallible;

use git_ext::{Oid, Qualified};
use link_canonical::{
    json::{Number, Value},
    Canonical, CjsonMap,
};

/// The per-reference component of a [`crate::PushNote`].
///
/// `nonce` is the per-reference monotonic counter (invariant: exactly `old +
/// 1` for every accepted update); `account_nonce` duplicates the pusher
/// account's nonce at push time; `objects` lists the git object hashes
/// newly required to realize `new_hash` from `old_hash`.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PushedReference {
    pub name: Qualified,
    pub old_hash: Oid,
    pub new_hash: Oid,
    pub nonce: u64,
    pub account_nonce: u64,
    pub fee: String,
    pub objects: Vec<Oid>,
    pub delete: bool,
}

impl PushedReference {
    /// `old_hash = 0` denotes a create; `new_hash = 0` denotes a delete.
    /// Both zero at once is never valid.
    pub fn is_create(&self) -> bool {
        self.old_hash.is_zero()
    }

    pub fn is_delete(&self) -> bool {
        self.delete || self.new_hash.is_zero()
    }
}

impl PushedReference {
    /// The Cjson value for this reference, nested as-is inside
    /// [`crate::PushNote::canonical_form`]'s `references` array.
    pub(crate) fn to_cjson(&self) -> Value {
        let mut map = CjsonMap::new();
        map.insert("name".into(), Value::String(self.name.as_str().into()));
        map.insert("oldHash".into(), Value::String(self.old_hash.to_string().into()));
        map.insert("newHash".into(), Value::String(self.new_hash.to_string().into()));
        map.insert("nonce".into(), Value::Number(Number::U64(self.nonce)));
        map.insert("accountNonce".into(), Value::Number(Number::U64(self.account_nonce)));
        map.insert("fee".into(), Value::String(self.fee.as_str().into()));
        map.insert(
            "objects".into(),
            Value::Array(
                self.objects
                    .iter()
                    .map(|oid| Value::String(oid.to_string().into()))
                    .collect(),
            ),
        );
        map.insert("delete".into(), Value::Bool(self.delete));
        Value::Object(map)
    }
}

impl Canonical for PushedReference {
    type Error = Infallible;

    fn canonical_form(&self) -> Result<Vec<u8>, Self::Error> {
        self.to_cjson().canonical_form()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PushedReference {
        PushedReference {
            name: "refs/heads/master".parse().unwrap(),
            old_hash: Oid::default(),
            new_hash: "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391".parse().unwrap(),
            nonce: 1,
            account_nonce: 1,
            fee: "1.2".to_string(),
            objects: vec!["e69de29bb2d1d6434b8b29ae775ad8c2e48c5391".parse().unwrap()],
            delete: false,
        }
    }

    #[test]
    fn create_is_detected_by_zero_old_hash() {
        assert!(sample().is_create());
    }

    #[test]
    fn canonical_form_is_order_independent_of_insertion() {
        let a = sample();
        let mut b = sample();
        b.fee = a.fee.clone();
        assert_eq!(a.canonical_form().unwrap(), b.canonical_form().unwrap());
    }

    #[test]
    fn delete_flag_or_zero_new_hash_both_mean_delete() {
        let mut r = sample();
        r.delete = true;
        assert!(r.is_delete());

        let mut r2 = sample();
        r2.new_hash = Oid::default();
        assert!(r2.is_delete());
    }
}
