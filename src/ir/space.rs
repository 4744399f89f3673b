//! Coordinate space marker types.
//!
//! These are zero-sized types (ZSTs) used as type parameters to distinguish
//! between image space and world space at compile time.

use std::fmt;

/// Marker type for source coordinates (image/pixel space).
///
/// Source coordinates grow downward on the vertical axis, which is the
/// opposite of the convention the sidecar stores them in.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {}

/// Marker type for target coordinates (world space).
///
/// Target coordinates are expressed in the spatial reference carried by the
/// enclosing [`ControlPointSet`](super::ControlPointSet).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {}

impl fmt::Debug for Source {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
