// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping between content-space and minimap-space.
//!
//! Everything here is pure: callers measure the content and minimap surfaces,
//! build a [`MinimapMetrics`], and ask it for indicator placements or scroll
//! offsets. The two directions are approximate inverses only. The indicator
//! height floor and the clamping at both ends mean that
//! `indicator_top_from_scroll(scroll_from_minimap_point(y))` does not recover
//! `y` near the edges, and that is expected.

use kurbo::Rect;

/// Scale factors and bounds derived from one measurement of the surfaces.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MinimapMetrics {
    /// Minimap-space units per content-space unit.
    pub scale: f64,
    /// Largest valid content scroll offset; `0.0` when the content fits.
    pub max_scroll_offset: f64,
    /// Height of the viewport indicator in minimap-space, floor applied.
    pub indicator_height: f64,
    /// Largest valid indicator top in minimap-space.
    pub max_indicator_top: f64,
    /// Height of the minimap surface the metrics were computed for.
    pub minimap_height: f64,
}

impl MinimapMetrics {
    /// Computes metrics for the given content and minimap extents.
    ///
    /// - `content_total_height` is the full scrollable extent of the content.
    /// - `content_visible_height` is the extent of the content's viewport.
    /// - `minimap_height` is the rendered height of the minimap surface.
    /// - `min_indicator_height` is the floor applied to the indicator height.
    ///
    /// Negative or non-finite inputs are treated as `0.0`. The scale divides
    /// by `max(content_total_height, 1.0)`, so empty content never produces
    /// an infinite or NaN scale.
    #[must_use]
    pub fn compute(
        content_total_height: f64,
        content_visible_height: f64,
        minimap_height: f64,
        min_indicator_height: f64,
    ) -> Self {
        let total = non_negative(content_total_height);
        let visible = non_negative(content_visible_height);
        let minimap_height = non_negative(minimap_height);
        let floor = non_negative(min_indicator_height);

        let scale = minimap_height / total.max(1.0);
        let max_scroll_offset = (total - visible).max(0.0);
        let indicator_height = floor.max(visible * scale);
        let max_indicator_top = (minimap_height - indicator_height).max(0.0);

        Self {
            scale,
            max_scroll_offset,
            indicator_height,
            max_indicator_top,
            minimap_height,
        }
    }

    /// Returns `true` if the content is taller than its viewport.
    #[must_use]
    pub fn is_scrollable(&self) -> bool {
        self.max_scroll_offset > 0.0
    }

    /// Maps a content scroll offset to the indicator top in minimap-space.
    ///
    /// The result always lies in `[0, max_indicator_top]`. When the content
    /// does not scroll the indicator is pinned to the top.
    #[must_use]
    pub fn indicator_top_from_scroll(&self, scroll_offset: f64) -> f64 {
        if !self.is_scrollable() {
            return 0.0;
        }
        (non_negative(scroll_offset) * self.scale)
            .max(0.0)
            .min(self.max_indicator_top)
    }

    /// Maps a minimap-space point to a content scroll offset.
    ///
    /// `point_y` is the desired center of the indicator. The implied indicator
    /// top is clamped into the minimap, converted to a ratio of the travel
    /// available to the indicator, and applied to `max_scroll_offset`. The
    /// result always lies in `[0, max_scroll_offset]`.
    #[must_use]
    pub fn scroll_from_minimap_point(&self, point_y: f64) -> f64 {
        let travel = self.minimap_height - self.indicator_height;
        if travel <= 0.0 || !point_y.is_finite() {
            return 0.0;
        }
        let desired_top = point_y - self.indicator_height / 2.0;
        let clamped_top = desired_top.min(travel).max(0.0);
        let ratio = clamped_top / travel;
        ratio * self.max_scroll_offset
    }

    /// Indicator placement for the given content scroll offset.
    #[must_use]
    pub fn placement_for_scroll(&self, scroll_offset: f64) -> IndicatorPlacement {
        IndicatorPlacement {
            top: self.indicator_top_from_scroll(scroll_offset),
            height: self.indicator_height,
        }
    }
}

/// Position and size of the viewport indicator inside the minimap.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct IndicatorPlacement {
    /// Top edge in minimap-space.
    pub top: f64,
    /// Height in minimap-space.
    pub height: f64,
}

impl IndicatorPlacement {
    /// Vertical center of the indicator in minimap-space.
    #[must_use]
    pub fn center(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Bottom edge in minimap-space.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Rectangle covering the indicator across a minimap of the given width.
    #[must_use]
    pub fn to_rect(&self, width: f64) -> Rect {
        Rect::new(0.0, self.top, non_negative(width), self.bottom())
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
