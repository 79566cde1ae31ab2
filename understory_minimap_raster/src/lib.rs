// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_minimap_raster --heading-base-level=0

//! Understory Minimap Raster: software collaborators for `understory_minimap`.
//!
//! This crate supplies the two pieces of a minimap host that deal with
//! pixels, so that headless tools and tests can run the whole coordinator
//! without a windowing system:
//!
//! - [`PixmapTarget`]: a [`vello_cpu`] pixmap implementing
//!   [`RenderTarget`](understory_minimap::RenderTarget), with device pixel
//!   ratio handling and scaled rectangle blits.
//! - [`QueuedSnapshotProvider`]: a [`SnapshotProvider`](understory_minimap::SnapshotProvider)
//!   that captures from a [`SnapshotSource`], decodes the capture
//!   ([`decode`]), and skips requests that were superseded before it got to
//!   them.
//!
//! ```rust
//! use kurbo::Size;
//! use understory_minimap::{FreshnessToken, SnapshotProvider, SnapshotRequest};
//! use understory_minimap_raster::{CapturedContent, QueuedSnapshotProvider};
//!
//! let mut provider = QueuedSnapshotProvider::new(|_request: &SnapshotRequest| {
//!     Some(CapturedContent::Rgba8 { width: 1, height: 1, pixels: vec![255; 4] })
//! });
//! for token in 1..=2 {
//!     provider.request_snapshot(SnapshotRequest {
//!         token: FreshnessToken(token),
//!         source_size: Size::new(100.0, 400.0),
//!         target_size: Size::new(20.0, 80.0),
//!         device_pixel_ratio: 1.0,
//!     });
//! }
//!
//! // Only the newest request is produced.
//! assert_eq!(provider.run_pending(), Some(FreshnessToken(2)));
//! assert_eq!(provider.skipped(), 1);
//! ```
//!
//! ## Features
//!
//! - `png` (default): decode PNG-encoded captures through the `image` crate.

mod decode;
mod pixmap;
mod queue;

pub use decode::{CapturedContent, DecodeError, decode};
pub use pixmap::PixmapTarget;
pub use queue::{QueuedSnapshotProvider, SnapshotSource};
