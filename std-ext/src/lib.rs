// Copyright © 2021-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

pub mod iter;
pub mod result;

pub type Void = std::convert::Infallible;

pub mod prelude {
    pub use super::iter::IteratorExt;
    pub use super::result::ResultExt;
    pub use super::Void;
}
