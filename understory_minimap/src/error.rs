// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by host collaborators.
//!
//! None of these are fatal to the coordinator. A failed capture release is
//! ignored, and an unavailable render context skips the draw for that pass.

use thiserror::Error;

use crate::drag::PointerId;

/// Failure to capture or release a pointer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// The platform does not (or no longer) hold a capture for the pointer.
    #[error("pointer {0:?} is not captured")]
    NotCaptured(PointerId),
    /// The pointer is unknown to the platform, e.g. already lifted.
    #[error("pointer {0:?} is not active")]
    InactivePointer(PointerId),
}

/// Failure to prepare or draw into the render target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The target cannot currently produce a drawable context.
    #[error("render context is unavailable")]
    ContextUnavailable,
    /// The image handed to the target has an unsupported pixel layout.
    #[error("unsupported image format")]
    UnsupportedFormat,
    /// The requested backing store exceeds what the target can allocate.
    #[error("render target size exceeds the backend limit")]
    TargetTooLarge,
}
