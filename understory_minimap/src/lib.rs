// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_minimap --heading-base-level=0

//! Understory Minimap: headless coordination for document minimaps.
//!
//! A minimap is a thumbnail of a scrollable document with a draggable
//! indicator showing the visible window, as found in code editors. This crate
//! keeps three surfaces consistent: the scrollable content, the raster
//! snapshot shown in the minimap, and the indicator overlay. It is organized
//! in four layers:
//!
//! - [`geometry`]: pure mapping between content-space and minimap-space
//!   ([`MinimapMetrics`]).
//! - [`drag`]: exclusive, pointer-scoped indicator drag sessions
//!   ([`DragController`]).
//! - [`snapshot`]: the asynchronous snapshot contract and freshness tokens
//!   ([`SnapshotProvider`], [`SnapshotPipeline`]).
//! - [`MinimapCoordinator`]: owns the state, routes events, and performs every
//!   side effect on the host through the traits in [`surface`].
//!
//! It does **not** own any UI toolkit, event loop, or rasterizer. Callers are
//! expected to:
//! - Implement the [`surface`] traits for their scroll container, minimap
//!   element, pointer routing, and canvas.
//! - Forward notifications as [`MinimapEvent`]s to
//!   [`MinimapCoordinator::handle_event`] and honor the returned
//!   [`EventOutcome`].
//! - Supply a [`SnapshotProvider`] (see `understory_minimap_raster` for a
//!   software one) and drain it with [`MinimapCoordinator::poll_snapshots`].
//!
//! ## Geometry example
//!
//! ```rust
//! use understory_minimap::MinimapMetrics;
//!
//! // 10 000 units of content, 1 000 visible, drawn into a 500-unit minimap.
//! let metrics = MinimapMetrics::compute(10_000.0, 1_000.0, 500.0, 24.0);
//! assert!((metrics.indicator_height - 50.0).abs() < 1e-9);
//!
//! // Halfway down the document puts the indicator halfway down its travel.
//! let top = metrics.indicator_top_from_scroll(4_500.0);
//! assert!((top - 225.0).abs() < 1e-9);
//!
//! // Clicking near the top clamps to the start of the document.
//! assert_eq!(metrics.scroll_from_minimap_point(10.0), 0.0);
//! ```
//!
//! ## Design notes
//!
//! - Everything runs on one thread. Handlers run to completion; snapshot
//!   production is the only asynchronous step, and stale results are
//!   dropped by token rather than cancelled.
//! - Content-to-minimap and minimap-to-content are not exact inverses: the
//!   indicator height has a floor and both ends clamp.
//! - The drag path uses the minimap's client top captured when the drag
//!   starts. If the minimap moves on screen mid-drag, the mapping drifts
//!   until the next drag.
//!
//! ## Features
//!
//! - `std` (default): forward `std` to Kurbo, Peniko, and the logging and
//!   error crates.
//! - `libm`: build Kurbo and Peniko against `libm` for `no_std` targets.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod coordinator;
pub mod drag;
mod error;
pub mod geometry;
pub mod snapshot;
pub mod surface;

pub use config::{DEFAULT_MIN_INDICATOR_HEIGHT, MinimapConfig};
pub use coordinator::MinimapCoordinator;
pub use drag::{DragController, DragPhase, DragSession, PointerId};
pub use error::{CaptureError, RenderError};
pub use geometry::{IndicatorPlacement, MinimapMetrics};
pub use snapshot::{FreshnessToken, Snapshot, SnapshotPipeline, SnapshotProvider, SnapshotRequest};
pub use surface::{
    ContentSurface, EventKind, EventOutcome, EventSource, MinimapEvent, MinimapHost,
    MinimapSurface, PointerCapture, PointerEvent, PointerTarget, RenderTarget, Subscription,
    SurfaceKind,
};
