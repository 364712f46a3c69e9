// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use std::env;

use tracing::subscriber::set_global_default as set_subscriber;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initializes the global `tracing` subscriber. `TRACING_FMT` selects the
/// output format (`pretty`, `compact`, `json`); unset or unrecognized
/// values fall back to the default full format (`node-lib::logging`'s
/// scheme, minus its `log`/`env_logger` bridge, which has no purpose here
/// since nothing in this crate stack emits through the `log` facade).
pub fn init() {
    let builder = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    match env::var("TRACING_FMT").ok().as_deref() {
        Some("pretty") => set_subscriber(builder.pretty().finish()),
        Some("compact") => set_subscriber(builder.compact().finish()),
        Some("json") => set_subscriber(builder.json().flatten_event(true).finish()),
        _ => set_subscriber(builder.finish()),
    }
    .expect("setting tracing subscriber failed")
}
