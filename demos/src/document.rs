// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A simulated text document and the host surfaces around it.

use std::io::Cursor;

use kurbo::{Rect, Size};
use peniko::ImageData;
use understory_minimap::{
    CaptureError, ContentSurface, EventKind, EventSource, IndicatorPlacement, MinimapSurface,
    PointerCapture, PointerId, RenderError, RenderTarget, SnapshotRequest, Subscription,
};
use understory_minimap_raster::{CapturedContent, PixmapTarget};

/// Logical units per source pixel in captured rasters.
const CAPTURE_DOWNSCALE: f64 = 4.0;
const CHAR_WIDTH: f64 = 8.0;
const INK: [u8; 4] = [60, 60, 70, 255];
const PAPER: [u8; 4] = [250, 250, 245, 255];

/// Line layout of a monospaced document.
#[derive(Clone, Debug)]
pub struct Document {
    line_lengths: Vec<usize>,
    line_height: f64,
}

impl Document {
    /// A document of `lines` lines with a repeating ragged-right pattern.
    #[must_use]
    pub fn sample(lines: usize, line_height: f64) -> Self {
        let line_lengths = (0..lines).map(|i| (i * 37 + 11) % 72).collect();
        Self {
            line_lengths,
            line_height,
        }
    }

    /// Total height of the laid-out document.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.line_lengths.len() as f64 * self.line_height
    }

    /// Renders the document at `size`, reduced by a fixed factor, as a PNG.
    ///
    /// Returns `None` if encoding fails.
    pub fn capture(&self, size: Size) -> Option<CapturedContent> {
        let width = pixels(size.width / CAPTURE_DOWNSCALE);
        let height = pixels(size.height / CAPTURE_DOWNSCALE);
        let mut raster = image::RgbaImage::from_pixel(width, height, image::Rgba(PAPER));

        let rows_per_line = self.line_height / CAPTURE_DOWNSCALE;
        for y in 0..height {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "row index divided by a positive line pitch"
            )]
            let line = (f64::from(y) / rows_per_line) as usize;
            // Leave a gap row between lines.
            if (f64::from(y) % rows_per_line) >= rows_per_line - 1.0 {
                continue;
            }
            let Some(&len) = self.line_lengths.get(line) else {
                break;
            };
            let ink = pixels(len as f64 * CHAR_WIDTH / CAPTURE_DOWNSCALE).min(width);
            for x in 0..ink {
                raster.put_pixel(x, y, image::Rgba(INK));
            }
        }

        let mut png = Cursor::new(Vec::new());
        if let Err(err) = raster.write_to(&mut png, image::ImageFormat::Png) {
            tracing::warn!(%err, "failed to encode document capture");
            return None;
        }
        Some(CapturedContent::Encoded(png.into_inner()))
    }

    /// A snapshot source capturing this document.
    pub fn source(self) -> impl FnMut(&SnapshotRequest) -> Option<CapturedContent> {
        move |request: &SnapshotRequest| self.capture(request.source_size)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "capture sizes are small and float-to-int casts saturate"
)]
fn pixels(logical: f64) -> u32 {
    (logical.ceil() as u32).max(1)
}

/// Host surfaces for a document view with a minimap docked to its right.
#[derive(Debug)]
pub struct DocumentHost {
    scroll_offset: f64,
    document_height: f64,
    viewport: Size,
    minimap_bounds: Rect,
    indicator: IndicatorPlacement,
    dragging: bool,
    captured: Option<PointerId>,
    pixmap: PixmapTarget,
    listeners: Vec<Subscription>,
    next_subscription: u64,
}

impl DocumentHost {
    /// A host showing `document` through a `viewport`, with the minimap at `minimap_bounds`.
    #[must_use]
    pub fn new(document: &Document, viewport: Size, minimap_bounds: Rect) -> Self {
        Self {
            scroll_offset: 0.0,
            document_height: document.height(),
            viewport,
            minimap_bounds,
            indicator: IndicatorPlacement::default(),
            dragging: false,
            captured: None,
            pixmap: PixmapTarget::new(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Scrolls as a user would, without going through the coordinator.
    pub fn user_scroll(&mut self, offset: f64) {
        self.set_scroll_offset(offset);
    }

    /// Moves or resizes the minimap, as a layout pass would.
    pub fn set_minimap_bounds(&mut self, bounds: Rect) {
        self.minimap_bounds = bounds;
    }

    /// Last indicator placement received.
    #[must_use]
    pub fn indicator(&self) -> IndicatorPlacement {
        self.indicator
    }

    /// Returns `true` while the indicator shows its dragging state.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Number of attached listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// The minimap's canvas.
    #[must_use]
    pub fn pixmap(&self) -> &PixmapTarget {
        &self.pixmap
    }
}

impl ContentSurface for DocumentHost {
    fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    fn scroll_extent(&self) -> f64 {
        self.document_height
    }

    fn visible_extent(&self) -> f64 {
        self.viewport.height
    }

    fn visible_width(&self) -> f64 {
        self.viewport.width
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        let max = (self.document_height - self.viewport.height).max(0.0);
        self.scroll_offset = offset.clamp(0.0, max);
    }
}

impl MinimapSurface for DocumentHost {
    fn minimap_bounds(&self) -> Rect {
        self.minimap_bounds
    }

    fn set_indicator(&mut self, placement: IndicatorPlacement) {
        self.indicator = placement;
    }

    fn set_indicator_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }
}

impl PointerCapture for DocumentHost {
    fn capture_pointer(&mut self, pointer: PointerId) -> Result<(), CaptureError> {
        self.captured = Some(pointer);
        Ok(())
    }

    fn release_pointer(&mut self, pointer: PointerId) -> Result<(), CaptureError> {
        match self.captured {
            Some(captured) if captured == pointer => {
                self.captured = None;
                Ok(())
            }
            Some(_) => Err(CaptureError::NotCaptured(pointer)),
            None => Err(CaptureError::InactivePointer(pointer)),
        }
    }
}

impl RenderTarget for DocumentHost {
    fn is_available(&self) -> bool {
        self.pixmap.is_available()
    }

    fn configure(&mut self, logical: Size, device_pixel_ratio: f64) -> Result<(), RenderError> {
        self.pixmap.configure(logical, device_pixel_ratio)
    }

    fn clear(&mut self) {
        self.pixmap.clear();
    }

    fn draw_image_rect(
        &mut self,
        image: &ImageData,
        src: Rect,
        dst: Rect,
    ) -> Result<(), RenderError> {
        self.pixmap.draw_image_rect(image, src, dst)
    }
}

impl EventSource for DocumentHost {
    fn subscribe(&mut self, kind: EventKind) -> Subscription {
        self.next_subscription += 1;
        let subscription = Subscription {
            id: self.next_subscription,
            kind,
        };
        self.listeners.push(subscription);
        subscription
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        self.listeners.retain(|s| s.id != subscription.id);
    }
}
