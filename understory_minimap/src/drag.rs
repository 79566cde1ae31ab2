// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Indicator drag sessions: exclusive, pointer-scoped, delta based.
//!
//! ## Usage
//!
//! 1) When a pointer goes down on the indicator, call [`DragController::begin`]
//!    with the pointer id, the pointer's client Y, and the client tops of the
//!    indicator and the minimap.
//! 2) On each move, call [`DragController::minimap_y_for`]; it returns the
//!    minimap-space point to feed into the jump computation, or `None` if the
//!    event belongs to another pointer.
//! 3) End the session with [`DragController::end`] on pointer up or cancel, or
//!    with [`DragController::cancel`] on teardown.
//!
//! Positions are derived from the total pointer delta since the grab rather
//! than from per-move increments, so rounding does not accumulate. The
//! minimap's client top is read once, at grab time.
//!
//! ## Minimal example
//!
//! ```
//! use understory_minimap::drag::{DragController, PointerId};
//!
//! let mut drag = DragController::default();
//! let pointer = PointerId(1);
//!
//! // Minimap at client y=100, indicator at minimap y=40, grabbed 10 units in.
//! assert!(drag.begin(pointer, 150.0, 140.0, 100.0));
//! assert!(drag.is_dragging());
//!
//! // Move down by 20: the grabbed point is now at minimap y=70.
//! assert_eq!(drag.minimap_y_for(pointer, 170.0), Some(70.0));
//!
//! // Other pointers are ignored.
//! assert_eq!(drag.minimap_y_for(PointerId(2), 170.0), None);
//!
//! assert!(drag.end(pointer).is_some());
//! assert!(!drag.is_dragging());
//! ```

/// Stable identifier of a pointer device, as delivered by the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

/// State of a [`DragController`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DragPhase {
    /// No session is active.
    #[default]
    Idle,
    /// A session owned by a captured pointer is active.
    Dragging,
}

/// Fields recorded when a pointer grabs the indicator.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragSession {
    /// Pointer that owns the session.
    pub pointer: PointerId,
    /// Client Y of the pointer at grab time.
    pub start_pointer_y: f64,
    /// Client top of the indicator at grab time.
    pub indicator_top_at_grab: f64,
    /// Client top of the minimap at grab time.
    pub minimap_top_at_grab: f64,
    /// Distance from the indicator's top edge to the pointer at grab time.
    pub grab_offset: f64,
}

impl DragSession {
    /// Minimap-space point for a pointer at `pointer_y` (client space).
    #[must_use]
    pub fn minimap_y(&self, pointer_y: f64) -> f64 {
        let delta_y = pointer_y - self.start_pointer_y;
        (self.indicator_top_at_grab - self.minimap_top_at_grab) + delta_y + self.grab_offset
    }
}

/// Tracks at most one indicator drag session.
#[derive(Clone, Debug, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    /// Starts a session for `pointer`.
    ///
    /// Returns `false` and leaves the current session untouched if one is
    /// already active; a second pointer cannot take over a drag.
    pub fn begin(
        &mut self,
        pointer: PointerId,
        pointer_y: f64,
        indicator_top: f64,
        minimap_top: f64,
    ) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.session = Some(DragSession {
            pointer,
            start_pointer_y: pointer_y,
            indicator_top_at_grab: indicator_top,
            minimap_top_at_grab: minimap_top,
            grab_offset: pointer_y - indicator_top,
        });
        true
    }

    /// Minimap-space point for a move of `pointer` to client `pointer_y`.
    ///
    /// Returns `None` when idle or when `pointer` does not own the session.
    #[must_use]
    pub fn minimap_y_for(&self, pointer: PointerId, pointer_y: f64) -> Option<f64> {
        self.session
            .filter(|session| session.pointer == pointer)
            .map(|session| session.minimap_y(pointer_y))
    }

    /// Ends the session if `pointer` owns it, returning the finished session.
    pub fn end(&mut self, pointer: PointerId) -> Option<DragSession> {
        if self.owns(pointer) {
            self.session.take()
        } else {
            None
        }
    }

    /// Ends any active session regardless of which pointer owns it.
    pub fn cancel(&mut self) -> Option<DragSession> {
        self.session.take()
    }

    /// Returns `true` if `pointer` owns the active session.
    #[must_use]
    pub fn owns(&self, pointer: PointerId) -> bool {
        self.session
            .is_some_and(|session| session.pointer == pointer)
    }

    /// Returns `true` while a session is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> DragPhase {
        if self.session.is_some() {
            DragPhase::Dragging
        } else {
            DragPhase::Idle
        }
    }

    /// The active session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }
}
