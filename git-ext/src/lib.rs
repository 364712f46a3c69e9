// Copyright © 2021-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

//! Small git extension types shared by every subsystem that has to talk
//! about object hashes or reference names: the push note, the local repo
//! adapter, the authorization engine and reference sync all speak [`Oid`] and
//! [`RefLike`] rather than raw strings.

pub mod oid;
pub mod reference;

pub use oid::Oid;
pub use reference::name::{Qualified, RefLike, RefspecPattern};
