// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A cooperative snapshot provider driven from the host's idle time.

use std::collections::VecDeque;
use std::fmt;

use understory_minimap::{FreshnessToken, Snapshot, SnapshotProvider, SnapshotRequest};

use crate::decode::{CapturedContent, decode};

/// Captures the current visual state of the content region.
///
/// Implemented for closures taking a `&SnapshotRequest`.
pub trait SnapshotSource {
    /// Captures the content at `request.source_size`.
    ///
    /// Returns `None` to decline, for example when the region has nothing to show.
    fn capture(&mut self, request: &SnapshotRequest) -> Option<CapturedContent>;
}

impl<F> SnapshotSource for F
where
    F: FnMut(&SnapshotRequest) -> Option<CapturedContent>,
{
    fn capture(&mut self, request: &SnapshotRequest) -> Option<CapturedContent> {
        self(request)
    }
}

/// Queues snapshot requests and produces them when the host asks.
///
/// Requests are only recorded by [`SnapshotProvider::request_snapshot`].
/// Production happens in [`QueuedSnapshotProvider::run_pending`], which the
/// host calls when it has time (an idle callback, the end of a frame). At
/// that point every queued request except the newest is skipped without
/// capturing, since its result would be discarded anyway. Completed
/// snapshots wait in a ready queue for [`SnapshotProvider::poll_ready`].
pub struct QueuedSnapshotProvider<S> {
    source: S,
    pending: VecDeque<SnapshotRequest>,
    ready: VecDeque<Snapshot>,
    skipped: u64,
}

impl<S> fmt::Debug for QueuedSnapshotProvider<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueuedSnapshotProvider")
            .field("pending", &self.pending.len())
            .field("ready", &self.ready.len())
            .field("skipped", &self.skipped)
            .finish_non_exhaustive()
    }
}

impl<S: SnapshotSource> QueuedSnapshotProvider<S> {
    /// Creates a provider capturing from `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            pending: VecDeque::new(),
            ready: VecDeque::new(),
            skipped: 0,
        }
    }

    /// Produces the newest queued request, skipping the rest.
    ///
    /// Returns the token of the snapshot that became ready, if any. Declined
    /// captures and captures that fail to decode produce nothing.
    pub fn run_pending(&mut self) -> Option<FreshnessToken> {
        let request = self.pending.pop_back()?;
        if !self.pending.is_empty() {
            let superseded = self.pending.len();
            tracing::trace!(superseded, newest = request.token.0, "skipping superseded requests");
            self.skipped += superseded as u64;
            self.pending.clear();
        }
        self.produce(&request)
    }

    fn produce(&mut self, request: &SnapshotRequest) -> Option<FreshnessToken> {
        let Some(content) = self.source.capture(request) else {
            tracing::debug!(token = request.token.0, "snapshot source declined");
            return None;
        };
        match decode(content) {
            Ok(image) => {
                self.ready.push_back(Snapshot::for_request(request, image));
                Some(request.token)
            }
            Err(err) => {
                tracing::warn!(%err, token = request.token.0, "dropping undecodable capture");
                None
            }
        }
    }

    /// Number of requests waiting to be produced.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of snapshots waiting to be polled.
    #[must_use]
    pub fn ready_len(&self) -> usize {
        self.ready.len()
    }

    /// Requests skipped because a newer one was queued behind them.
    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl<S: SnapshotSource> SnapshotProvider for QueuedSnapshotProvider<S> {
    fn request_snapshot(&mut self, request: SnapshotRequest) {
        self.pending.push_back(request);
    }

    fn poll_ready(&mut self) -> Option<Snapshot> {
        self.ready.pop_front()
    }
}
