// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for `MinimapCoordinator` against an in-memory host.
//!
//! The host records every side effect so the tests can check scroll writes,
//! indicator placement, pointer capture, listener lifetimes, and draws.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use kurbo::{Point, Rect, Size};
use peniko::{Blob, ImageAlphaType, ImageData, ImageFormat};
use understory_minimap::{
    CaptureError, ContentSurface, EventKind, EventOutcome, EventSource, FreshnessToken,
    IndicatorPlacement, MinimapConfig, MinimapCoordinator, MinimapEvent, MinimapSurface,
    PointerCapture, PointerEvent, PointerId, PointerTarget, RenderError, RenderTarget, Snapshot,
    SnapshotProvider, SnapshotRequest, Subscription, SurfaceKind,
};

const MINIMAP_TOP: f64 = 100.0;

#[derive(Debug)]
struct Draw {
    image_size: (u32, u32),
    src: Rect,
    dst: Rect,
}

#[derive(Debug)]
struct FakeHost {
    scroll_offset: f64,
    scroll_extent: f64,
    visible_extent: f64,
    visible_width: f64,
    minimap_bounds: Rect,
    indicator: Option<IndicatorPlacement>,
    dragging: bool,
    captured: Option<PointerId>,
    capture_lost: bool,
    render_available: bool,
    configured: Option<(Size, f64)>,
    clears: usize,
    draws: Vec<Draw>,
    next_subscription: u64,
    listeners: Rc<RefCell<Vec<Subscription>>>,
}

impl FakeHost {
    /// 10 000 units of content with 1 000 visible, minimap 500 tall at y=100.
    fn tall_document() -> Self {
        Self {
            scroll_offset: 0.0,
            scroll_extent: 10_000.0,
            visible_extent: 1_000.0,
            visible_width: 640.0,
            minimap_bounds: Rect::new(800.0, MINIMAP_TOP, 900.0, MINIMAP_TOP + 500.0),
            indicator: None,
            dragging: false,
            captured: None,
            capture_lost: false,
            render_available: true,
            configured: None,
            clears: 0,
            draws: Vec::new(),
            next_subscription: 0,
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn max_scroll(&self) -> f64 {
        (self.scroll_extent - self.visible_extent).max(0.0)
    }
}

impl ContentSurface for FakeHost {
    fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    fn scroll_extent(&self) -> f64 {
        self.scroll_extent
    }

    fn visible_extent(&self) -> f64 {
        self.visible_extent
    }

    fn visible_width(&self) -> f64 {
        self.visible_width
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        self.scroll_offset = offset.clamp(0.0, self.max_scroll());
    }
}

impl MinimapSurface for FakeHost {
    fn minimap_bounds(&self) -> Rect {
        self.minimap_bounds
    }

    fn set_indicator(&mut self, placement: IndicatorPlacement) {
        self.indicator = Some(placement);
    }

    fn set_indicator_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }
}

impl PointerCapture for FakeHost {
    fn capture_pointer(&mut self, pointer: PointerId) -> Result<(), CaptureError> {
        self.captured = Some(pointer);
        Ok(())
    }

    fn release_pointer(&mut self, pointer: PointerId) -> Result<(), CaptureError> {
        if self.capture_lost || self.captured != Some(pointer) {
            return Err(CaptureError::NotCaptured(pointer));
        }
        self.captured = None;
        Ok(())
    }
}

impl RenderTarget for FakeHost {
    fn is_available(&self) -> bool {
        self.render_available
    }

    fn configure(&mut self, logical: Size, device_pixel_ratio: f64) -> Result<(), RenderError> {
        if !self.render_available {
            return Err(RenderError::ContextUnavailable);
        }
        self.configured = Some((logical, device_pixel_ratio));
        Ok(())
    }

    fn clear(&mut self) {
        self.clears += 1;
    }

    fn draw_image_rect(
        &mut self,
        image: &ImageData,
        src: Rect,
        dst: Rect,
    ) -> Result<(), RenderError> {
        self.draws.push(Draw {
            image_size: (image.width, image.height),
            src,
            dst,
        });
        Ok(())
    }
}

impl EventSource for FakeHost {
    fn subscribe(&mut self, kind: EventKind) -> Subscription {
        self.next_subscription += 1;
        let subscription = Subscription {
            id: self.next_subscription,
            kind,
        };
        self.listeners.borrow_mut().push(subscription);
        subscription
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        self.listeners.borrow_mut().retain(|s| *s != subscription);
    }
}

#[derive(Debug, Default)]
struct ManualProvider {
    requests: Vec<SnapshotRequest>,
    ready: VecDeque<Snapshot>,
}

impl ManualProvider {
    /// Completes the `index`th request with a raster whose width encodes its token.
    fn complete(&self, index: usize) -> Snapshot {
        let request = &self.requests[index];
        let width = u32::try_from(request.token.0).unwrap();
        Snapshot::for_request(request, image(width, 2))
    }
}

impl SnapshotProvider for ManualProvider {
    fn request_snapshot(&mut self, request: SnapshotRequest) {
        self.requests.push(request);
    }

    fn poll_ready(&mut self) -> Option<Snapshot> {
        self.ready.pop_front()
    }
}

type Coordinator = MinimapCoordinator<FakeHost, ManualProvider>;

fn image(width: u32, height: u32) -> ImageData {
    ImageData {
        data: Blob::from(vec![255_u8; (width * height * 4) as usize]),
        format: ImageFormat::Rgba8,
        alpha_type: ImageAlphaType::Alpha,
        width,
        height,
    }
}

fn coordinator(host: FakeHost) -> Coordinator {
    let mut c = MinimapCoordinator::new(host, ManualProvider::default(), MinimapConfig::default());
    c.activate();
    c
}

fn pointer(id: u64, client_y: f64, target: PointerTarget) -> PointerEvent {
    PointerEvent::new(PointerId(id), Point::new(850.0, client_y), target)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn scroll_to(c: &mut Coordinator, offset: f64) {
    c.host_mut().set_scroll_offset(offset);
    c.handle_event(&MinimapEvent::ContentScrolled);
}

#[test]
fn activate_attaches_listeners_and_renders_once() {
    let c = coordinator(FakeHost::tall_document());

    assert!(c.is_active());
    let listeners = c.host().listeners.borrow().clone();
    assert_eq!(listeners.len(), EventKind::ALL.len());
    for kind in EventKind::ALL {
        assert!(c.is_subscribed(kind));
    }

    assert_eq!(c.provider().requests.len(), 1);
    let request = c.provider().requests[0];
    assert_eq!(request.source_size, Size::new(640.0, 10_000.0));
    assert_eq!(request.target_size, Size::new(100.0, 500.0));
    // The target is only touched once a snapshot arrives.
    assert_eq!(c.host().configured, None);
    assert_eq!(c.host().clears, 0);

    let indicator = c.host().indicator.unwrap();
    assert_eq!(indicator.top, 0.0);
    assert!(approx(indicator.height, 50.0));
}

#[test]
fn activate_twice_is_a_no_op() {
    let mut c = coordinator(FakeHost::tall_document());
    c.activate();
    assert_eq!(c.host().listeners.borrow().len(), EventKind::ALL.len());
    assert_eq!(c.provider().requests.len(), 1);
}

#[test]
fn scrolling_moves_the_indicator() {
    let mut c = coordinator(FakeHost::tall_document());
    scroll_to(&mut c, 4_500.0);

    let indicator = c.host().indicator.unwrap();
    assert!(approx(indicator.top, 225.0));
    assert_eq!(c.placement(), indicator);
}

#[test]
fn content_that_fits_keeps_indicator_pinned() {
    let mut host = FakeHost::tall_document();
    host.scroll_extent = 500.0;
    host.visible_extent = 500.0;
    let mut c = coordinator(host);

    // A host may still report a stale offset; the indicator ignores it.
    c.host_mut().scroll_offset = 120.0;
    c.handle_event(&MinimapEvent::ContentScrolled);
    assert_eq!(c.host().indicator.unwrap().top, 0.0);
}

#[test]
fn clicking_the_minimap_jumps_to_the_point() {
    let mut c = coordinator(FakeHost::tall_document());

    let outcome = c.handle_event(&MinimapEvent::PointerDown(pointer(
        1,
        MINIMAP_TOP + 250.0,
        PointerTarget::Minimap,
    )));
    assert_eq!(outcome, EventOutcome::Handled);
    assert!(approx(c.host().scroll_offset, 4_500.0));
    assert!(approx(c.host().indicator.unwrap().top, 225.0));
    assert!(!c.drag().is_dragging());

    c.handle_event(&MinimapEvent::PointerDown(pointer(
        1,
        MINIMAP_TOP + 10.0,
        PointerTarget::Minimap,
    )));
    assert_eq!(c.host().scroll_offset, 0.0);
    assert_eq!(c.host().indicator.unwrap().top, 0.0);
}

#[test]
fn pointer_down_outside_is_ignored() {
    let mut c = coordinator(FakeHost::tall_document());
    let outcome = c.on_pointer_down(&pointer(1, 40.0, PointerTarget::Outside));
    assert_eq!(outcome, EventOutcome::Ignored);
    assert_eq!(c.host().scroll_offset, 0.0);
}

#[test]
fn dragging_the_indicator_scrolls_by_delta() {
    let mut c = coordinator(FakeHost::tall_document());
    scroll_to(&mut c, 4_500.0);

    // Grab the indicator 10 units below its top edge.
    let grab_y = MINIMAP_TOP + 225.0 + 10.0;
    let outcome = c.handle_event(&MinimapEvent::PointerDown(pointer(
        7,
        grab_y,
        PointerTarget::Indicator,
    )));
    assert_eq!(outcome, EventOutcome::Consumed);
    assert!(c.drag().owns(PointerId(7)));
    assert_eq!(c.host().captured, Some(PointerId(7)));
    assert!(c.host().dragging);
    // Grabbing alone does not scroll.
    assert!(approx(c.host().scroll_offset, 4_500.0));

    // Move down by 10: center lands at 245 → top 220 → ratio 220/450.
    let outcome = c.handle_event(&MinimapEvent::PointerMove(pointer(
        7,
        grab_y + 10.0,
        PointerTarget::Outside,
    )));
    assert_eq!(outcome, EventOutcome::Consumed);
    assert!(approx(c.host().scroll_offset, 220.0 / 450.0 * 9_000.0));
    assert!(approx(c.host().indicator.unwrap().top, 220.0));
}

#[test]
fn drag_only_honors_the_captured_pointer() {
    let mut c = coordinator(FakeHost::tall_document());
    c.on_pointer_down(&pointer(1, MINIMAP_TOP + 20.0, PointerTarget::Indicator));
    let before = c.host().scroll_offset;

    assert_eq!(
        c.handle_event(&MinimapEvent::PointerMove(pointer(
            2,
            MINIMAP_TOP + 300.0,
            PointerTarget::Minimap,
        ))),
        EventOutcome::Ignored
    );
    assert_eq!(c.host().scroll_offset, before);

    // A second pointer-down neither jumps nor steals the session.
    assert_eq!(
        c.handle_event(&MinimapEvent::PointerDown(pointer(
            2,
            MINIMAP_TOP + 300.0,
            PointerTarget::Minimap,
        ))),
        EventOutcome::Ignored
    );
    assert_eq!(
        c.handle_event(&MinimapEvent::PointerDown(pointer(
            2,
            MINIMAP_TOP + 30.0,
            PointerTarget::Indicator,
        ))),
        EventOutcome::Ignored
    );
    assert_eq!(c.host().scroll_offset, before);
    assert!(c.drag().owns(PointerId(1)));

    // Lifting the other pointer does not end the drag.
    assert_eq!(
        c.handle_event(&MinimapEvent::PointerUp(pointer(
            2,
            0.0,
            PointerTarget::Outside
        ))),
        EventOutcome::Ignored
    );
    assert!(c.drag().is_dragging());
}

#[test]
fn scroll_notifications_are_suppressed_while_dragging() {
    let mut c = coordinator(FakeHost::tall_document());
    c.on_pointer_down(&pointer(1, MINIMAP_TOP + 20.0, PointerTarget::Indicator));
    let placement = c.placement();

    c.host_mut().set_scroll_offset(6_000.0);
    let outcome = c.handle_event(&MinimapEvent::ContentScrolled);
    assert_eq!(outcome, EventOutcome::Ignored);
    assert_eq!(c.placement(), placement);

    c.on_pointer_up(&pointer(1, MINIMAP_TOP + 20.0, PointerTarget::Outside));
    assert_eq!(c.on_content_scroll(), EventOutcome::Handled);
    assert!(approx(c.placement().top, 300.0));
}

#[test]
fn drag_is_clamped_to_the_scroll_range() {
    let mut c = coordinator(FakeHost::tall_document());
    c.on_pointer_down(&pointer(3, MINIMAP_TOP + 5.0, PointerTarget::Indicator));

    c.on_pointer_move(&pointer(3, 10_000.0, PointerTarget::Outside));
    assert!(approx(c.host().scroll_offset, 9_000.0));
    assert!(approx(c.host().indicator.unwrap().top, 450.0));

    c.on_pointer_move(&pointer(3, -10_000.0, PointerTarget::Outside));
    assert_eq!(c.host().scroll_offset, 0.0);
    assert_eq!(c.host().indicator.unwrap().top, 0.0);
}

#[test]
fn pointer_up_and_cancel_end_the_drag() {
    let mut c = coordinator(FakeHost::tall_document());

    c.on_pointer_down(&pointer(4, MINIMAP_TOP + 5.0, PointerTarget::Indicator));
    let outcome = c.handle_event(&MinimapEvent::PointerUp(pointer(
        4,
        MINIMAP_TOP + 5.0,
        PointerTarget::Outside,
    )));
    assert_eq!(outcome, EventOutcome::Handled);
    assert!(!c.drag().is_dragging());
    assert!(!c.host().dragging);
    assert_eq!(c.host().captured, None);

    c.on_pointer_down(&pointer(5, MINIMAP_TOP + 5.0, PointerTarget::Indicator));
    // The platform already dropped the capture; ending still succeeds.
    c.host_mut().capture_lost = true;
    let outcome = c.handle_event(&MinimapEvent::PointerCancel(pointer(
        5,
        0.0,
        PointerTarget::Outside,
    )));
    assert_eq!(outcome, EventOutcome::Handled);
    assert!(!c.drag().is_dragging());
    assert!(!c.host().dragging);

    // Moves after the drag ended are ignored.
    assert_eq!(
        c.on_pointer_move(&pointer(5, 400.0, PointerTarget::Outside)),
        EventOutcome::Ignored
    );
}

#[test]
fn only_the_latest_snapshot_is_drawn() {
    let mut c = coordinator(FakeHost::tall_document());

    c.handle_event(&MinimapEvent::Resized(SurfaceKind::Content));
    c.handle_event(&MinimapEvent::Resized(SurfaceKind::Minimap));
    assert_eq!(c.provider().requests.len(), 3);

    let initial = c.provider().complete(0);
    let first = c.provider().complete(1);
    let second = c.provider().complete(2);
    assert_eq!(second.token, FreshnessToken(3));

    // Completion order does not matter: only the latest token lands.
    assert!(!c.deliver_snapshot(first));
    assert!(c.deliver_snapshot(second));
    assert!(!c.deliver_snapshot(initial));

    assert_eq!(c.host().draws.len(), 1);
    assert_eq!(c.host().draws[0].image_size, (3, 2));
    assert_eq!(c.snapshots().applied(), Some(FreshnessToken(3)));
}

#[test]
fn snapshots_fill_the_minimap_rect() {
    let mut host = FakeHost::tall_document();
    host.minimap_bounds = Rect::new(10.0, 20.0, 130.0, 420.0);
    let config = MinimapConfig::default().with_device_pixel_ratio(2.0);
    let mut c = MinimapCoordinator::new(host, ManualProvider::default(), config);
    c.activate();

    let request = c.provider().requests[0];
    assert_eq!(request.target_device_size(), (240, 800));

    let snapshot = c.provider().complete(0);
    c.provider_mut().ready.push_back(snapshot);
    assert_eq!(c.poll_snapshots(), 1);
    assert_eq!(c.host().configured, Some((Size::new(120.0, 400.0), 2.0)));

    let draw = &c.host().draws[0];
    assert_eq!(draw.src, Rect::new(0.0, 0.0, 1.0, 2.0));
    assert_eq!(draw.dst, Rect::new(0.0, 0.0, 120.0, 400.0));
    assert_eq!(c.host().clears, 1);
}

#[test]
fn pending_snapshots_leave_the_target_alone() {
    let mut c = coordinator(FakeHost::tall_document());
    let first = c.provider().complete(0);
    assert!(c.deliver_snapshot(first));
    assert_eq!(c.host().clears, 1);

    // A resize asks for a new snapshot but keeps the current raster up.
    c.host_mut().minimap_bounds = Rect::new(800.0, MINIMAP_TOP, 880.0, MINIMAP_TOP + 400.0);
    c.handle_event(&MinimapEvent::Resized(SurfaceKind::Minimap));
    c.handle_event(&MinimapEvent::Resized(SurfaceKind::Content));
    assert_eq!(c.provider().requests.len(), 3);
    assert_eq!(c.host().configured, Some((Size::new(100.0, 500.0), 1.0)));
    assert_eq!(c.host().clears, 1);
    assert_eq!(c.host().draws.len(), 1);

    let latest = c.provider().complete(2);
    assert!(c.deliver_snapshot(latest));
    assert_eq!(c.host().configured, Some((Size::new(80.0, 400.0), 1.0)));
    assert_eq!(c.host().clears, 2);
}

#[test]
fn context_lost_before_apply_skips_the_draw() {
    let mut c = coordinator(FakeHost::tall_document());
    let snapshot = c.provider().complete(0);
    c.host_mut().render_available = false;

    assert!(!c.deliver_snapshot(snapshot));
    assert_eq!(c.host().clears, 0);
    assert!(c.host().draws.is_empty());
    assert_eq!(c.snapshots().applied(), None);
}

#[test]
fn zero_sized_minimap_skips_snapshots() {
    let mut host = FakeHost::tall_document();
    host.minimap_bounds = Rect::new(0.0, 0.0, 0.0, 300.0);
    let mut c = coordinator(host);

    assert!(c.provider().requests.is_empty());
    assert_eq!(c.snapshots().latest(), None);
    // Geometry still syncs.
    assert!(c.host().indicator.is_some());

    c.host_mut().minimap_bounds = Rect::new(0.0, 0.0, 80.0, 300.0);
    c.handle_event(&MinimapEvent::Resized(SurfaceKind::Minimap));
    assert_eq!(c.provider().requests.len(), 1);
}

#[test]
fn unavailable_render_context_skips_the_pass() {
    let mut host = FakeHost::tall_document();
    host.render_available = false;
    let mut c = coordinator(host);
    assert!(c.provider().requests.is_empty());

    c.host_mut().render_available = true;
    assert_eq!(c.request_snapshot(), Some(FreshnessToken(1)));
}

#[test]
fn teardown_is_idempotent() {
    let mut c = coordinator(FakeHost::tall_document());

    c.teardown();
    assert!(!c.is_active());
    assert!(c.host().listeners.borrow().is_empty());

    c.teardown();
    assert!(!c.is_active());
    assert!(c.host().listeners.borrow().is_empty());

    // Detached listeners no longer react.
    c.host_mut().set_scroll_offset(4_500.0);
    assert_eq!(
        c.handle_event(&MinimapEvent::ContentScrolled),
        EventOutcome::Ignored
    );
    assert_eq!(c.host().indicator.unwrap().top, 0.0);
}

#[test]
fn teardown_releases_an_active_drag() {
    let mut c = coordinator(FakeHost::tall_document());
    c.on_pointer_down(&pointer(9, MINIMAP_TOP + 5.0, PointerTarget::Indicator));
    c.host_mut().capture_lost = true;

    c.teardown();
    assert!(!c.drag().is_dragging());
    assert!(!c.host().dragging);
    assert!(c.host().listeners.borrow().is_empty());
}

#[test]
fn snapshots_after_teardown_are_dropped() {
    let mut c = coordinator(FakeHost::tall_document());
    let snapshot = c.provider().complete(0);
    c.teardown();
    assert!(!c.deliver_snapshot(snapshot));
    assert!(c.host().draws.is_empty());
}

#[test]
fn dropping_the_coordinator_detaches_listeners() {
    let host = FakeHost::tall_document();
    let listeners = Rc::clone(&host.listeners);
    {
        let _c = coordinator(host);
        assert_eq!(listeners.borrow().len(), EventKind::ALL.len());
    }
    assert!(listeners.borrow().is_empty());
}

#[test]
fn raising_the_floor_resyncs_the_indicator() {
    let mut c = coordinator(FakeHost::tall_document());
    c.set_config(MinimapConfig::default().with_min_indicator_height(80.0));
    assert_eq!(c.host().indicator.unwrap().height, 80.0);
}
