// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimap walkthrough.
//!
//! Wire a simulated 400-line document to a minimap coordinator and exercise
//! scrolling, jump-to-point, an indicator drag, overlapping resizes, and
//! teardown. Everything is logged through `tracing`.
//!
//! Run:
//! - `cargo run -p understory_minimap_demos --example minimap_walkthrough`
//! - `UNDERSTORY_LOG=trace cargo run -p understory_minimap_demos --example minimap_walkthrough`

use kurbo::{Point, Rect, Size};
use understory_minimap::{
    ContentSurface, MinimapConfig, MinimapCoordinator, MinimapEvent, PointerEvent, PointerId,
    PointerTarget, SurfaceKind,
};
use understory_minimap_demos::{Document, DocumentHost, init_tracing};
use understory_minimap_raster::QueuedSnapshotProvider;

fn main() {
    init_tracing();

    let document = Document::sample(400, 20.0);
    let minimap = Rect::new(720.0, 0.0, 800.0, 400.0);
    let host = DocumentHost::new(&document, Size::new(700.0, 600.0), minimap);
    let provider = QueuedSnapshotProvider::new(document.source());
    let config = MinimapConfig::default().with_device_pixel_ratio(2.0);

    let mut coordinator = MinimapCoordinator::new(host, provider, config);
    coordinator.activate();
    let metrics = coordinator.metrics();
    tracing::info!(
        scale = metrics.scale,
        indicator_height = metrics.indicator_height,
        max_indicator_top = metrics.max_indicator_top,
        listeners = coordinator.host().listener_count(),
        "activated"
    );

    // The host runs snapshot production when idle, then hands results back.
    coordinator.provider_mut().run_pending();
    let applied = coordinator.poll_snapshots();
    let (width, height) = coordinator.host().pixmap().device_size();
    tracing::info!(applied, width, height, "first snapshot drawn");

    // The user scrolls the document.
    coordinator.host_mut().user_scroll(3_000.0);
    coordinator.handle_event(&MinimapEvent::ContentScrolled);
    tracing::info!(top = coordinator.host().indicator().top, "after scrolling to 3000");

    // Clicking the lower half of the minimap jumps there.
    let click = PointerEvent::new(
        PointerId(1),
        Point::new(760.0, minimap.y0 + 300.0),
        PointerTarget::Minimap,
    );
    coordinator.handle_event(&MinimapEvent::PointerDown(click));
    coordinator.handle_event(&MinimapEvent::PointerUp(click));
    tracing::info!(
        scroll = coordinator.host().scroll_offset(),
        top = coordinator.host().indicator().top,
        "after clicking the minimap"
    );

    // Grab the indicator by its middle and drag it up by 60 units.
    let grab_y = minimap.y0 + coordinator.placement().center();
    let pointer = PointerId(2);
    let outcome = coordinator.handle_event(&MinimapEvent::PointerDown(PointerEvent::new(
        pointer,
        Point::new(760.0, grab_y),
        PointerTarget::Indicator,
    )));
    tracing::info!(?outcome, dragging = coordinator.host().is_dragging(), "grabbed indicator");
    for step in 1..=3 {
        let y = grab_y - 20.0 * f64::from(step);
        coordinator.handle_event(&MinimapEvent::PointerMove(PointerEvent::new(
            pointer,
            Point::new(760.0, y),
            PointerTarget::Outside,
        )));
    }
    coordinator.handle_event(&MinimapEvent::PointerUp(PointerEvent::new(
        pointer,
        Point::new(760.0, grab_y - 60.0),
        PointerTarget::Outside,
    )));
    tracing::info!(
        scroll = coordinator.host().scroll_offset(),
        top = coordinator.host().indicator().top,
        "after dragging"
    );

    // Two layout passes land before the idle callback runs.
    coordinator
        .host_mut()
        .set_minimap_bounds(Rect::new(700.0, 0.0, 800.0, 500.0));
    coordinator.handle_event(&MinimapEvent::Resized(SurfaceKind::Minimap));
    coordinator.handle_event(&MinimapEvent::Resized(SurfaceKind::Content));
    let produced = coordinator.provider_mut().run_pending();
    let applied = coordinator.poll_snapshots();
    tracing::info!(
        ?produced,
        skipped = coordinator.provider().skipped(),
        applied,
        "after overlapping resizes"
    );

    coordinator.teardown();
    coordinator.teardown();
    tracing::info!(listeners = coordinator.host().listener_count(), "torn down");
}
