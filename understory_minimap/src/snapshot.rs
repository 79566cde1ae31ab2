// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Snapshot requests, freshness tokens, and the provider contract.
//!
//! A minimap is backed by a raster of the content that is produced
//! asynchronously. Every request carries a [`FreshnessToken`] issued by a
//! [`SnapshotPipeline`]; tokens only ever increase. When a production
//! completes, its snapshot is applied only if its token is still the latest
//! one issued. Superseded results are dropped quietly. There is no explicit
//! cancellation and no timeout: a production that never completes simply
//! leaves the previously applied raster in place.
//!
//! ```
//! use understory_minimap::snapshot::SnapshotPipeline;
//!
//! let mut pipeline = SnapshotPipeline::default();
//! let first = pipeline.issue();
//! let second = pipeline.issue();
//!
//! assert!(first < second);
//! assert!(!pipeline.is_current(first));
//! assert!(pipeline.is_current(second));
//! ```

use kurbo::Size;
use peniko::ImageData;

/// Monotonic tag attached to each snapshot request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FreshnessToken(pub u64);

/// Parameters of one snapshot production.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SnapshotRequest {
    /// Token the resulting [`Snapshot`] must carry.
    pub token: FreshnessToken,
    /// Logical size of the content region to capture, at least 1×1.
    pub source_size: Size,
    /// Logical size of the minimap the snapshot will be drawn into.
    pub target_size: Size,
    /// Device pixels per logical unit of the render target.
    pub device_pixel_ratio: f64,
}

impl SnapshotRequest {
    /// Device-pixel size of the target raster: `floor(logical * ratio)`, at least 1.
    #[must_use]
    pub fn target_device_size(&self) -> (u32, u32) {
        (
            device_pixels(self.target_size.width, self.device_pixel_ratio),
            device_pixels(self.target_size.height, self.device_pixel_ratio),
        )
    }
}

/// A completed production.
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// Token of the request this snapshot answers.
    pub token: FreshnessToken,
    /// Decoded raster of the content.
    pub image: ImageData,
    /// Logical size of the content region the raster was captured at.
    pub source_size: Size,
    /// Logical size of the minimap the raster should fill.
    pub target_size: Size,
    /// Device pixels per logical unit the target is configured with when applied.
    pub device_pixel_ratio: f64,
}

impl Snapshot {
    /// Builds the snapshot answering `request` from a decoded raster.
    #[must_use]
    pub fn for_request(request: &SnapshotRequest, image: ImageData) -> Self {
        Self {
            token: request.token,
            image,
            source_size: request.source_size,
            target_size: request.target_size,
            device_pixel_ratio: request.device_pixel_ratio,
        }
    }
}

/// Produces content snapshots asynchronously.
///
/// Implementations may complete requests in any order and may skip requests
/// that were superseded before production started. Completed snapshots are
/// handed back through [`SnapshotProvider::poll_ready`], which the owner calls
/// from its event loop; this is the only point where asynchronous work joins
/// the otherwise synchronous event handling.
pub trait SnapshotProvider {
    /// Starts producing a snapshot for `request`.
    fn request_snapshot(&mut self, request: SnapshotRequest);

    /// Returns the next completed snapshot, if any.
    fn poll_ready(&mut self) -> Option<Snapshot>;
}

/// Issues freshness tokens and decides which completed snapshots may be applied.
#[derive(Clone, Debug, Default)]
pub struct SnapshotPipeline {
    issued: u64,
    applied: Option<FreshnessToken>,
}

impl SnapshotPipeline {
    /// Issues a new token, superseding every earlier one.
    pub fn issue(&mut self) -> FreshnessToken {
        self.issued += 1;
        FreshnessToken(self.issued)
    }

    /// Latest issued token, if any.
    #[must_use]
    pub fn latest(&self) -> Option<FreshnessToken> {
        (self.issued > 0).then_some(FreshnessToken(self.issued))
    }

    /// Returns `true` if `token` is the latest issued token.
    #[must_use]
    pub fn is_current(&self, token: FreshnessToken) -> bool {
        self.latest() == Some(token)
    }

    /// Passes `snapshot` through if its token is current, drops it otherwise.
    #[must_use]
    pub fn accept(&self, snapshot: Snapshot) -> Option<Snapshot> {
        if self.is_current(snapshot.token) {
            Some(snapshot)
        } else {
            tracing::debug!(
                token = snapshot.token.0,
                latest = self.issued,
                "discarding superseded snapshot"
            );
            None
        }
    }

    /// Records that the snapshot tagged `token` reached the render target.
    pub fn mark_applied(&mut self, token: FreshnessToken) {
        self.applied = Some(token);
    }

    /// Token of the last snapshot that reached the render target.
    #[must_use]
    pub fn applied(&self) -> Option<FreshnessToken> {
        self.applied
    }
}

/// Converts a logical extent to device pixels: `floor(logical * ratio)`, at least 1.
///
/// Non-finite or non-positive products yield `1`.
#[must_use]
pub fn device_pixels(logical: f64, ratio: f64) -> u32 {
    let scaled = logical * ratio;
    if !scaled.is_finite() || scaled < 1.0 {
        return 1;
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "float-to-int casts saturate and truncation is the intended floor"
    )]
    let pixels = scaled as u32;
    pixels.max(1)
}
