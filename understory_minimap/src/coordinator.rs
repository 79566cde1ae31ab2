// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The minimap coordinator: owns the state and every side effect.

use kurbo::{Point, Rect, Size};
use smallvec::SmallVec;

use crate::config::MinimapConfig;
use crate::drag::DragController;
use crate::geometry::{IndicatorPlacement, MinimapMetrics};
use crate::snapshot::{
    FreshnessToken, Snapshot, SnapshotPipeline, SnapshotProvider, SnapshotRequest,
};
use crate::surface::{
    EventKind, EventOutcome, MinimapEvent, MinimapHost, PointerEvent, PointerTarget, Subscription,
    SurfaceKind,
};

/// Keeps a minimap, its viewport indicator, and a scrollable content region in sync.
///
/// The coordinator is the only component that mutates the host: it scrolls
/// the content, places the indicator, captures pointers, and draws snapshots.
/// Handlers run to completion; the only asynchronous join point is
/// [`MinimapCoordinator::deliver_snapshot`] (or [`MinimapCoordinator::poll_snapshots`]),
/// where superseded snapshots are dropped.
///
/// Listeners are attached by [`MinimapCoordinator::activate`] and detached by
/// [`MinimapCoordinator::teardown`], which also runs on drop. Events arriving
/// for a kind with no attached listener are ignored.
///
/// While an indicator drag is active, passive scroll notifications do not
/// resync the indicator: the drag path scrolls the content and resyncs
/// explicitly, and the scroll notification it triggers must not fight it.
#[derive(Debug)]
pub struct MinimapCoordinator<H: MinimapHost, P: SnapshotProvider> {
    host: H,
    provider: P,
    config: MinimapConfig,
    drag: DragController,
    snapshots: SnapshotPipeline,
    placement: IndicatorPlacement,
    subscriptions: SmallVec<[Subscription; 8]>,
}

impl<H: MinimapHost, P: SnapshotProvider> MinimapCoordinator<H, P> {
    /// Creates an inactive coordinator.
    #[must_use]
    pub fn new(host: H, provider: P, config: MinimapConfig) -> Self {
        Self {
            host,
            provider,
            config,
            drag: DragController::default(),
            snapshots: SnapshotPipeline::default(),
            placement: IndicatorPlacement::default(),
            subscriptions: SmallVec::new(),
        }
    }

    /// Attaches every listener, requests a first snapshot, and syncs the indicator.
    ///
    /// Does nothing if already active.
    pub fn activate(&mut self) {
        if self.is_active() {
            return;
        }
        for kind in EventKind::ALL {
            let subscription = self.host.subscribe(kind);
            self.subscriptions.push(subscription);
        }
        tracing::debug!(listeners = self.subscriptions.len(), "minimap activated");
        self.request_snapshot();
        self.sync();
    }

    /// Ends any drag session and detaches every listener.
    ///
    /// Safe to call any number of times; calls after the first are no-ops.
    pub fn teardown(&mut self) {
        let was_active = self.is_active();
        let session = self.drag.cancel();
        if let Some(session) = session {
            if let Err(err) = self.host.release_pointer(session.pointer) {
                tracing::debug!(%err, "pointer capture already released");
            }
        }
        if was_active || session.is_some() {
            self.host.set_indicator_dragging(false);
        }
        for subscription in self.subscriptions.drain(..) {
            self.host.unsubscribe(subscription);
        }
        if was_active {
            tracing::debug!("minimap torn down");
        }
    }

    /// Returns `true` between [`activate`](Self::activate) and [`teardown`](Self::teardown).
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Returns `true` if a listener for `kind` is attached.
    #[must_use]
    pub fn is_subscribed(&self, kind: EventKind) -> bool {
        self.subscriptions.iter().any(|s| s.kind == kind)
    }

    /// Routes `event` to its handler if a listener for its kind is attached.
    pub fn handle_event(&mut self, event: &MinimapEvent) -> EventOutcome {
        if !self.is_subscribed(event.kind()) {
            return EventOutcome::Ignored;
        }
        match event {
            MinimapEvent::ContentScrolled => self.on_content_scroll(),
            MinimapEvent::PointerDown(e) => self.on_pointer_down(e),
            MinimapEvent::PointerMove(e) => self.on_pointer_move(e),
            MinimapEvent::PointerUp(e) => self.on_pointer_up(e),
            MinimapEvent::PointerCancel(e) => self.on_pointer_cancel(e),
            MinimapEvent::Resized(surface) => self.on_resize(*surface),
        }
    }

    /// Content scrolled: resync the indicator unless a drag is in progress.
    pub fn on_content_scroll(&mut self) -> EventOutcome {
        if self.drag.is_dragging() {
            tracing::trace!("scroll sync suppressed during drag");
            return EventOutcome::Ignored;
        }
        self.sync();
        EventOutcome::Handled
    }

    /// Pointer went down: start a drag on the indicator, or jump elsewhere on the minimap.
    ///
    /// Ignored while another drag is active.
    pub fn on_pointer_down(&mut self, event: &PointerEvent) -> EventOutcome {
        if self.drag.is_dragging() {
            return EventOutcome::Ignored;
        }
        match event.target {
            PointerTarget::Indicator => self.begin_drag(event),
            PointerTarget::Minimap => {
                let bounds = self.host.minimap_bounds();
                self.scroll_to_minimap_y(event.position.y - bounds.y0);
                EventOutcome::Handled
            }
            PointerTarget::Outside => EventOutcome::Ignored,
        }
    }

    /// Pointer moved: follow it if it owns the drag session.
    pub fn on_pointer_move(&mut self, event: &PointerEvent) -> EventOutcome {
        match self.drag.minimap_y_for(event.pointer, event.position.y) {
            Some(minimap_y) => {
                self.scroll_to_minimap_y(minimap_y);
                EventOutcome::Consumed
            }
            None => EventOutcome::Ignored,
        }
    }

    /// Pointer lifted: end the drag if it owns the session.
    pub fn on_pointer_up(&mut self, event: &PointerEvent) -> EventOutcome {
        self.end_drag(event)
    }

    /// Pointer cancelled: end the drag if it owns the session.
    pub fn on_pointer_cancel(&mut self, event: &PointerEvent) -> EventOutcome {
        self.end_drag(event)
    }

    /// A surface changed size: request a fresh snapshot and resync the indicator.
    pub fn on_resize(&mut self, surface: SurfaceKind) -> EventOutcome {
        tracing::trace!(?surface, "surface resized");
        self.request_snapshot();
        self.sync();
        EventOutcome::Handled
    }

    /// Metrics for the current surface measurements.
    #[must_use]
    pub fn metrics(&self) -> MinimapMetrics {
        MinimapMetrics::compute(
            self.host.scroll_extent(),
            self.host.visible_extent(),
            self.host.minimap_bounds().height(),
            self.config.min_indicator_height(),
        )
    }

    /// Places the indicator for the current scroll offset.
    pub fn sync(&mut self) {
        let placement = self
            .metrics()
            .placement_for_scroll(self.host.scroll_offset());
        tracing::trace!(top = placement.top, height = placement.height, "indicator sync");
        self.host.set_indicator(placement);
        self.placement = placement;
    }

    /// Scrolls the content so the indicator centers on `minimap_y`, then resyncs.
    pub fn scroll_to_minimap_y(&mut self, minimap_y: f64) {
        let offset = self.metrics().scroll_from_minimap_point(minimap_y);
        tracing::trace!(minimap_y, offset, "scroll to minimap point");
        self.host.set_scroll_offset(offset);
        self.sync();
    }

    /// Asks the provider for a snapshot tagged with a fresh token.
    ///
    /// Skipped (returning `None`, issuing no token) when the minimap has no
    /// area or the render target has no drawable context. The render target
    /// itself is left alone until the snapshot is applied.
    pub fn request_snapshot(&mut self) -> Option<FreshnessToken> {
        let target_size = self.host.minimap_bounds().size();
        if !(target_size.width > 0.0 && target_size.height > 0.0) {
            tracing::trace!("zero-sized minimap, snapshot skipped");
            return None;
        }
        if !self.host.is_available() {
            tracing::debug!("render target unavailable, snapshot skipped");
            return None;
        }

        let device_pixel_ratio = self.config.device_pixel_ratio();
        let token = self.snapshots.issue();
        let source_size = Size::new(
            self.host.visible_width().max(1.0),
            self.host.scroll_extent().max(1.0),
        );
        tracing::debug!(
            token = token.0,
            source_width = source_size.width,
            source_height = source_size.height,
            "snapshot requested"
        );
        self.provider.request_snapshot(SnapshotRequest {
            token,
            source_size,
            target_size,
            device_pixel_ratio,
        });
        Some(token)
    }

    /// Draws `snapshot` if it answers the latest request.
    ///
    /// The render target is sized for the snapshot's target size and device
    /// pixel ratio, cleared, and drawn into. Returns `true` if the snapshot
    /// reached the render target. Superseded snapshots, snapshots arriving
    /// after teardown, and targets that cannot be configured all return
    /// `false` and leave the surface as it was.
    pub fn deliver_snapshot(&mut self, snapshot: Snapshot) -> bool {
        if !self.is_active() {
            return false;
        }
        let Some(snapshot) = self.snapshots.accept(snapshot) else {
            return false;
        };
        if let Err(err) = self.host.configure(snapshot.target_size, snapshot.device_pixel_ratio) {
            tracing::debug!(
                %err,
                token = snapshot.token.0,
                "render target unavailable, draw skipped"
            );
            return false;
        }
        let image = &snapshot.image;
        let src = Rect::new(0.0, 0.0, f64::from(image.width), f64::from(image.height));
        let dst = Rect::from_origin_size(Point::ORIGIN, snapshot.target_size);

        self.host.clear();
        match self.host.draw_image_rect(image, src, dst) {
            Ok(()) => {
                self.snapshots.mark_applied(snapshot.token);
                tracing::debug!(token = snapshot.token.0, "snapshot applied");
                true
            }
            Err(err) => {
                tracing::debug!(%err, token = snapshot.token.0, "snapshot draw skipped");
                false
            }
        }
    }

    /// Drains completed snapshots from the provider, returning how many were applied.
    pub fn poll_snapshots(&mut self) -> usize {
        let mut applied = 0;
        while let Some(snapshot) = self.provider.poll_ready() {
            if self.deliver_snapshot(snapshot) {
                applied += 1;
            }
        }
        applied
    }

    /// Last placement handed to the host.
    #[must_use]
    pub fn placement(&self) -> IndicatorPlacement {
        self.placement
    }

    /// Drag state.
    #[must_use]
    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Snapshot token bookkeeping.
    #[must_use]
    pub fn snapshots(&self) -> &SnapshotPipeline {
        &self.snapshots
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &MinimapConfig {
        &self.config
    }

    /// Replaces the configuration, resyncing the indicator if active.
    pub fn set_config(&mut self, config: MinimapConfig) {
        self.config = config;
        if self.is_active() {
            self.sync();
        }
    }

    /// The host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably. Scrolling it does not notify the coordinator.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The snapshot provider.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The snapshot provider, mutably.
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    fn begin_drag(&mut self, event: &PointerEvent) -> EventOutcome {
        let minimap_top = self.host.minimap_bounds().y0;
        let indicator_top = minimap_top + self.placement.top;
        if !self
            .drag
            .begin(event.pointer, event.position.y, indicator_top, minimap_top)
        {
            return EventOutcome::Ignored;
        }
        if let Err(err) = self.host.capture_pointer(event.pointer) {
            tracing::debug!(%err, "pointer capture failed, dragging uncaptured");
        }
        self.host.set_indicator_dragging(true);
        tracing::debug!(pointer = event.pointer.0, "indicator drag started");
        EventOutcome::Consumed
    }

    fn end_drag(&mut self, event: &PointerEvent) -> EventOutcome {
        let Some(session) = self.drag.end(event.pointer) else {
            return EventOutcome::Ignored;
        };
        if let Err(err) = self.host.release_pointer(session.pointer) {
            tracing::debug!(%err, "pointer capture already released");
        }
        self.host.set_indicator_dragging(false);
        tracing::debug!(pointer = session.pointer.0, "indicator drag ended");
        EventOutcome::Handled
    }
}

impl<H: MinimapHost, P: SnapshotProvider> Drop for MinimapCoordinator<H, P> {
    fn drop(&mut self) {
        self.teardown();
    }
}
