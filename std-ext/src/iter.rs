// Copyright © 2021-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

pub trait IteratorExt: Iterator {
    /// Splits an iterator of pairs into two containers, short-circuiting on
    /// the first `Err` encountered.
    fn try_unzip<A, B, E, FromA, FromB>(self) -> Result<(FromA, FromB), E>
    where
        Self: Sized + Iterator<Item = Result<(A, B), E>>,
        FromA: Default + Extend<A>,
        FromB: Default + Extend<B>,
    {
        let mut left = FromA::default();
        let mut right = FromB::default();
        for item in self {
            let (a, b) = item?;
            left.extend(std::iter::once(a));
            right.extend(std::iter::once(b));
        }
        Ok((left, right))
    }
}

impl<T: Iterator> IteratorExt for T {}
