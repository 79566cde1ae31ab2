// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A CPU pixmap implementing [`RenderTarget`] on top of `vello_cpu`.

use core::fmt;

use kurbo::{Affine, Rect, Size};
use peniko::{Blob, ImageAlphaType, ImageData, ImageFormat, ImageQuality, ImageSampler};
use understory_minimap::snapshot::device_pixels;
use understory_minimap::{RenderError, RenderTarget};
use vello_cpu::kurbo::{Affine as CpuAffine, Rect as CpuRect};
use vello_cpu::{Image as CpuImage, ImageSource, Pixmap, RenderContext, RenderMode, RenderSettings};

/// Software render target rasterized with a [`vello_cpu::RenderContext`].
///
/// [`RenderTarget::configure`] sizes the backing store to `floor(logical * ratio)`
/// device pixels on each axis (at least 1). Reconfiguring with the same size
/// and ratio keeps the current contents. Draw rectangles are logical; images
/// are sampled nearest-neighbor and composited source-over.
///
/// The rendered result is kept as straight-alpha RGBA8 for inspection.
pub struct PixmapTarget {
    logical: Size,
    device_pixel_ratio: f64,
    width: u16,
    height: u16,
    ctx: Option<RenderContext>,
    pixels: Vec<u8>,
    available: bool,
}

impl fmt::Debug for PixmapTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixmapTarget")
            .field("logical", &self.logical)
            .field("device_pixel_ratio", &self.device_pixel_ratio)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("available", &self.available)
            .finish_non_exhaustive()
    }
}

impl Default for PixmapTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl PixmapTarget {
    /// Creates an empty, available pixmap. Call [`RenderTarget::configure`] before drawing.
    #[must_use]
    pub fn new() -> Self {
        Self {
            logical: Size::ZERO,
            device_pixel_ratio: 1.0,
            width: 0,
            height: 0,
            ctx: None,
            pixels: Vec::new(),
            available: true,
        }
    }

    /// Simulates losing (or regaining) the drawing context.
    ///
    /// While unavailable, `configure` and `draw_image_rect` fail with
    /// [`RenderError::ContextUnavailable`] and leave the contents untouched.
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Logical size passed to the last successful `configure`.
    #[must_use]
    pub fn logical_size(&self) -> Size {
        self.logical
    }

    /// Device pixels per logical unit.
    #[must_use]
    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Size of the backing store in device pixels.
    #[must_use]
    pub fn device_size(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    /// Row-major straight-alpha RGBA8 bytes.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The pixel at device coordinates `(x, y)`, if in bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let (width, height) = self.device_size();
        if x >= width || y >= height {
            return None;
        }
        let i = (y as usize * width as usize + x as usize) * 4;
        let px = self.pixels.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Copies the contents out as an image.
    #[must_use]
    pub fn to_image_data(&self) -> ImageData {
        ImageData {
            data: Blob::from(self.pixels.clone()),
            format: ImageFormat::Rgba8,
            alpha_type: ImageAlphaType::Alpha,
            width: u32::from(self.width),
            height: u32::from(self.height),
        }
    }
}

impl RenderTarget for PixmapTarget {
    fn is_available(&self) -> bool {
        self.available
    }

    fn configure(&mut self, logical: Size, device_pixel_ratio: f64) -> Result<(), RenderError> {
        if !self.available {
            return Err(RenderError::ContextUnavailable);
        }
        if self.ctx.is_some()
            && self.logical == logical
            && self.device_pixel_ratio == device_pixel_ratio
        {
            return Ok(());
        }
        let width = u16::try_from(device_pixels(logical.width, device_pixel_ratio))
            .map_err(|_| RenderError::TargetTooLarge)?;
        let height = u16::try_from(device_pixels(logical.height, device_pixel_ratio))
            .map_err(|_| RenderError::TargetTooLarge)?;

        let settings = RenderSettings {
            render_mode: RenderMode::OptimizeSpeed,
            ..RenderSettings::default()
        };
        self.ctx = Some(RenderContext::new_with(width, height, settings));
        self.logical = logical;
        self.device_pixel_ratio = device_pixel_ratio;
        self.width = width;
        self.height = height;
        self.pixels = vec![0; usize::from(width) * usize::from(height) * 4];
        Ok(())
    }

    fn clear(&mut self) {
        if let Some(ctx) = self.ctx.as_mut() {
            ctx.reset();
        }
        self.pixels.fill(0);
    }

    fn draw_image_rect(
        &mut self,
        image: &ImageData,
        src: Rect,
        dst: Rect,
    ) -> Result<(), RenderError> {
        if !self.available {
            return Err(RenderError::ContextUnavailable);
        }
        let Some(ctx) = self.ctx.as_mut() else {
            return Err(RenderError::ContextUnavailable);
        };
        if !matches!(image.format, ImageFormat::Rgba8) {
            return Err(RenderError::UnsupportedFormat);
        }
        let expected = image.width as usize * image.height as usize * 4;
        if image.data.data().len() < expected {
            return Err(RenderError::UnsupportedFormat);
        }

        let bounds = Rect::new(0.0, 0.0, f64::from(image.width), f64::from(image.height));
        let src = src.intersect(bounds);
        if src.width() <= 0.0 || src.height() <= 0.0 || dst.width() <= 0.0 || dst.height() <= 0.0 {
            return Ok(());
        }

        // Maps `src` in image pixels onto `dst` in device pixels.
        let image_to_device = Affine::scale(self.device_pixel_ratio)
            * Affine::translate((dst.x0, dst.y0))
            * Affine::scale_non_uniform(dst.width() / src.width(), dst.height() / src.height())
            * Affine::translate((-src.x0, -src.y0));

        let paint = CpuImage {
            image: ImageSource::from_peniko_image_data(image),
            sampler: ImageSampler {
                quality: ImageQuality::Low,
                ..ImageSampler::default()
            },
        };
        ctx.set_transform(CpuAffine::new(image_to_device.as_coeffs()));
        ctx.set_paint(paint);
        ctx.fill_rect(&CpuRect::new(src.x0, src.y0, src.x1, src.y1));

        let mut pixmap = Pixmap::new(self.width, self.height);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        self.pixels.clear();
        for p in pixmap.take_unpremultiplied() {
            self.pixels.extend_from_slice(&[p.r, p.g, p.b, p.a]);
        }
        Ok(())
    }
}
