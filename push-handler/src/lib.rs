// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

//! Orchestrates one client push from ref-update requests and a packfile to
//! an admitted [`push_note::PushNote`] (spec.md §4.3).

mod capability;
mod error;
mod handler;
mod request;

pub use capability::{GitReceiver, ProposalLookup};
pub use error::Error;
pub use handler::{handle_stream, Config, Outcome};
pub use request::RefUpdateRequest;
