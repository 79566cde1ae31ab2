// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host collaborators and the events they deliver.
//!
//! The coordinator never talks to a UI toolkit directly. The host implements
//! the traits in this module for whatever backs its scroll container, minimap
//! element, pointer routing, and canvas, then forwards notifications as
//! [`MinimapEvent`]s. All coordinates handed over are viewport-relative
//! ("client") coordinates in logical units.

use kurbo::{Point, Rect, Size};
use peniko::ImageData;

use crate::drag::PointerId;
use crate::error::{CaptureError, RenderError};
use crate::geometry::IndicatorPlacement;

/// The scrollable content region.
pub trait ContentSurface {
    /// Current scroll offset along the vertical axis.
    fn scroll_offset(&self) -> f64;
    /// Total scrollable extent of the content.
    fn scroll_extent(&self) -> f64;
    /// Extent of the content's visible viewport.
    fn visible_extent(&self) -> f64;
    /// Width of the content's visible viewport, used as the snapshot width.
    fn visible_width(&self) -> f64;
    /// Scrolls the content. Implementations clamp to their valid range.
    fn set_scroll_offset(&mut self, offset: f64);
}

/// The miniature overview element and the indicator it hosts.
pub trait MinimapSurface {
    /// Rendered bounds of the minimap in client coordinates.
    fn minimap_bounds(&self) -> Rect;
    /// Places the viewport indicator, in minimap-space.
    fn set_indicator(&mut self, placement: IndicatorPlacement);
    /// Toggles the indicator's "dragging" visual state.
    fn set_indicator_dragging(&mut self, dragging: bool);
}

/// Exclusive pointer capture for the indicator.
pub trait PointerCapture {
    /// Routes all further events of `pointer` to the indicator.
    fn capture_pointer(&mut self, pointer: PointerId) -> Result<(), CaptureError>;
    /// Releases a capture taken with [`PointerCapture::capture_pointer`].
    fn release_pointer(&mut self, pointer: PointerId) -> Result<(), CaptureError>;
}

/// Raster surface the snapshot is drawn into.
///
/// The backing store is `logical × device_pixel_ratio` device pixels; all
/// rectangles passed to [`RenderTarget::draw_image_rect`] are logical.
///
/// The coordinator only configures the target right before drawing a
/// snapshot into it, so whatever was drawn last stays visible while a newer
/// snapshot is being produced.
pub trait RenderTarget {
    /// Returns `true` if a drawable context can currently be obtained.
    fn is_available(&self) -> bool {
        true
    }
    /// Sizes the backing raster. Fails if no drawable context is available.
    fn configure(&mut self, logical: Size, device_pixel_ratio: f64) -> Result<(), RenderError>;
    /// Clears the whole surface.
    fn clear(&mut self);
    /// Draws the `src` rectangle of `image` (image pixels) into `dst` (logical), scaling as needed.
    fn draw_image_rect(
        &mut self,
        image: &ImageData,
        src: Rect,
        dst: Rect,
    ) -> Result<(), RenderError>;
}

/// Kinds of notification the coordinator subscribes to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The content scrolled.
    ContentScroll,
    /// A pointer went down on the minimap outside the indicator.
    MinimapPointerDown,
    /// A pointer went down on the indicator.
    IndicatorPointerDown,
    /// A pointer moved anywhere.
    PointerMove,
    /// A pointer was lifted anywhere.
    PointerUp,
    /// The platform cancelled a pointer.
    PointerCancel,
    /// The content surface changed size.
    ContentResize,
    /// The minimap surface changed size.
    MinimapResize,
}

impl EventKind {
    /// Every kind, in subscription order.
    pub const ALL: [Self; 8] = [
        Self::ContentScroll,
        Self::MinimapPointerDown,
        Self::IndicatorPointerDown,
        Self::PointerMove,
        Self::PointerUp,
        Self::PointerCancel,
        Self::ContentResize,
        Self::MinimapResize,
    ];
}

/// Handle to an attached listener, returned by [`EventSource::subscribe`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Subscription {
    /// Host-assigned identifier.
    pub id: u64,
    /// Kind of notification the listener receives.
    pub kind: EventKind,
}

/// Attaches and detaches listeners.
pub trait EventSource {
    /// Attaches a listener for `kind`.
    fn subscribe(&mut self, kind: EventKind) -> Subscription;
    /// Detaches a listener. Unknown handles are ignored.
    fn unsubscribe(&mut self, subscription: Subscription);
}

/// Which surface a size-change notification refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// The scrollable content.
    Content,
    /// The minimap.
    Minimap,
}

/// Element a pointer-down landed on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerTarget {
    /// The viewport indicator.
    Indicator,
    /// The minimap, outside the indicator.
    Minimap,
    /// Anything else (moves and lifts outside the minimap).
    Outside,
}

/// A pointer notification in client coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Stable identifier of the pointer.
    pub pointer: PointerId,
    /// Position in client coordinates.
    pub position: Point,
    /// Element under the pointer when the event was dispatched.
    pub target: PointerTarget,
}

impl PointerEvent {
    /// Creates a pointer event.
    #[must_use]
    pub fn new(pointer: PointerId, position: Point, target: PointerTarget) -> Self {
        Self {
            pointer,
            position,
            target,
        }
    }
}

/// A notification forwarded by the host.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MinimapEvent {
    /// The content scrolled.
    ContentScrolled,
    /// A pointer went down.
    PointerDown(PointerEvent),
    /// A pointer moved.
    PointerMove(PointerEvent),
    /// A pointer was lifted.
    PointerUp(PointerEvent),
    /// The platform cancelled a pointer.
    PointerCancel(PointerEvent),
    /// A surface changed size.
    Resized(SurfaceKind),
}

impl MinimapEvent {
    /// Subscription kind that must be attached for this event to be handled.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::ContentScrolled => EventKind::ContentScroll,
            Self::PointerDown(event) => match event.target {
                PointerTarget::Indicator => EventKind::IndicatorPointerDown,
                PointerTarget::Minimap | PointerTarget::Outside => EventKind::MinimapPointerDown,
            },
            Self::PointerMove(_) => EventKind::PointerMove,
            Self::PointerUp(_) => EventKind::PointerUp,
            Self::PointerCancel(_) => EventKind::PointerCancel,
            Self::Resized(SurfaceKind::Content) => EventKind::ContentResize,
            Self::Resized(SurfaceKind::Minimap) => EventKind::MinimapResize,
        }
    }
}

/// What the host should do with an event after the coordinator saw it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum EventOutcome {
    /// The coordinator did not act on the event.
    #[default]
    Ignored,
    /// The coordinator acted; default behavior may proceed.
    Handled,
    /// The coordinator acted; suppress default behavior and stop propagation.
    Consumed,
}

impl EventOutcome {
    /// Returns `true` unless the event was ignored.
    #[must_use]
    pub fn is_handled(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Everything a [`MinimapCoordinator`](crate::MinimapCoordinator) needs from its host.
pub trait MinimapHost:
    ContentSurface + MinimapSurface + PointerCapture + RenderTarget + EventSource
{
}

impl<T> MinimapHost for T where
    T: ContentSurface + MinimapSurface + PointerCapture + RenderTarget + EventSource
{
}
