// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turning captured content into a raster the minimap can draw.

use peniko::{Blob, ImageAlphaType, ImageData, ImageFormat};

/// Content captured by a [`SnapshotSource`](crate::SnapshotSource).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CapturedContent {
    /// Already-rasterized, row-major, straight-alpha RGBA8 pixels.
    Rgba8 {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// `width * height * 4` bytes.
        pixels: Vec<u8>,
    },
    /// An encoded image (PNG with the default `png` feature).
    Encoded(Vec<u8>),
}

/// Reasons captured content could not become a raster.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The capture has no pixels.
    #[error("captured raster is empty ({width}x{height})")]
    Empty {
        /// Reported width.
        width: u32,
        /// Reported height.
        height: u32,
    },
    /// Raw pixels do not match the reported dimensions.
    #[error("expected {expected} bytes of RGBA8 data, got {actual}")]
    Length {
        /// Bytes implied by the dimensions.
        expected: u64,
        /// Bytes supplied.
        actual: usize,
    },
    /// The codec rejected the encoded bytes.
    #[error("failed to decode captured image")]
    Image(#[from] image::ImageError),
}

/// Decodes `content` into a straight-alpha RGBA8 [`ImageData`].
pub fn decode(content: CapturedContent) -> Result<ImageData, DecodeError> {
    let (width, height, pixels) = match content {
        CapturedContent::Rgba8 {
            width,
            height,
            pixels,
        } => {
            let expected = u64::from(width) * u64::from(height) * 4;
            if u64::try_from(pixels.len()).ok() != Some(expected) {
                return Err(DecodeError::Length {
                    expected,
                    actual: pixels.len(),
                });
            }
            (width, height, pixels)
        }
        CapturedContent::Encoded(bytes) => {
            let rgba = image::load_from_memory(&bytes)?.to_rgba8();
            let (width, height) = rgba.dimensions();
            (width, height, rgba.into_raw())
        }
    };
    if width == 0 || height == 0 {
        return Err(DecodeError::Empty { width, height });
    }
    Ok(ImageData {
        data: Blob::from(pixels),
        format: ImageFormat::Rgba8,
        alpha_type: ImageAlphaType::Alpha,
        width,
        height,
    })
}
