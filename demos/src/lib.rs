// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared pieces for the minimap demos.
//!
//! Run:
//! - `cargo run -p understory_minimap_demos --example minimap_walkthrough`
//! - `UNDERSTORY_LOG=trace cargo run -p understory_minimap_demos --example minimap_walkthrough`

mod document;
mod log;

pub use document::{Document, DocumentHost};
pub use log::{filter_directives, init_tracing};
