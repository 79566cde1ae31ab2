// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Logging setup for the demos.
//!
//! Filter priority:
//!
//! 1. `UNDERSTORY_LOG`: a bare level such as `debug` applies to the minimap
//!    crates only; anything with directive syntax is used as-is.
//! 2. `RUST_LOG`: used as-is.
//! 3. Default: `warn` globally, `info` for the minimap crates.

use std::env;

use tracing_subscriber::EnvFilter;

const CRATES: [&str; 3] = [
    "understory_minimap",
    "understory_minimap_raster",
    "understory_minimap_demos",
];

/// Installs a `fmt` subscriber filtered per the module docs.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_tracing() {
    let directives = filter_directives(
        env::var("UNDERSTORY_LOG").ok().as_deref(),
        env::var("RUST_LOG").ok().as_deref(),
    );
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_target(true)
        .try_init();
}

/// Resolves the filter directives from the two environment variables.
#[must_use]
pub fn filter_directives(understory_log: Option<&str>, rust_log: Option<&str>) -> String {
    if let Some(value) = understory_log {
        if value.contains(['=', ':', ',']) {
            return value.to_owned();
        }
        return per_crate(value);
    }
    if let Some(value) = rust_log {
        return value.to_owned();
    }
    per_crate("info")
}

fn per_crate(level: &str) -> String {
    let mut directives = String::from("warn");
    for name in CRATES {
        directives.push(',');
        directives.push_str(name);
        directives.push('=');
        directives.push_str(level);
    }
    directives
}
