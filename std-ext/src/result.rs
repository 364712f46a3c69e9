// Copyright © 2021-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

/// Small helpers which keep call sites free of `match` boilerplate for the
/// "log and carry on" pattern that shows up throughout the watcher and pool
/// code.
pub trait ResultExt<T, E> {
    /// Turns `Err` into `None`, invoking `f` with the error for its side
    /// effect (typically logging) first.
    fn ok_or_log(self, f: impl FnOnce(&E)) -> Option<T>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn ok_or_log(self, f: impl FnOnce(&E)) -> Option<T> {
        match self {
            Ok(t) => Some(t),
            Err(e) => {
                f(&e);
                None
            },
        }
    }
}
