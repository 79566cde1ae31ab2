// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimap configuration.

/// Default floor for the indicator height, in minimap-space units.
pub const DEFAULT_MIN_INDICATOR_HEIGHT: f64 = 24.0;

/// Tunables shared by the geometry and rendering paths of a minimap.
///
/// Values are sanitized on read: a non-finite or negative indicator floor
/// reads as `0.0`, and a non-finite or non-positive device pixel ratio reads
/// as `1.0`.
///
/// ```
/// use understory_minimap::MinimapConfig;
///
/// let config = MinimapConfig::default()
///     .with_min_indicator_height(32.0)
///     .with_device_pixel_ratio(2.0);
/// assert_eq!(config.min_indicator_height(), 32.0);
/// assert_eq!(config.device_pixel_ratio(), 2.0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MinimapConfig {
    min_indicator_height: f64,
    device_pixel_ratio: f64,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            min_indicator_height: DEFAULT_MIN_INDICATOR_HEIGHT,
            device_pixel_ratio: 1.0,
        }
    }
}

impl MinimapConfig {
    /// Returns a copy with the given indicator height floor.
    #[must_use]
    pub fn with_min_indicator_height(mut self, height: f64) -> Self {
        self.min_indicator_height = height;
        self
    }

    /// Returns a copy with the given device pixel ratio.
    #[must_use]
    pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    /// Minimum indicator height in minimap-space units.
    #[must_use]
    pub fn min_indicator_height(&self) -> f64 {
        if self.min_indicator_height.is_finite() {
            self.min_indicator_height.max(0.0)
        } else {
            0.0
        }
    }

    /// Device pixels per logical unit used when sizing raster surfaces.
    #[must_use]
    pub fn device_pixel_ratio(&self) -> f64 {
        if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        }
    }
}
