//! Core data model for sidecar georeferencing.
//!
//! A sidecar parse produces a [`RawGeoreferenceBlock`]; the builder turns it
//! into a [`ControlPointSet`]. Both are plain values with no shared state.

use serde::Serialize;
use std::fmt;

use super::coord::Coord;
use super::space::{Source, Target};

/// Identifier of the coordinate system target points are expressed in.
///
/// The identifier is opaque to this crate: no projection math is performed,
/// it is only carried through to whatever consumes the control points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SpatialReference {
    /// The usable well-known ID (e.g. an EPSG code).
    pub wkid: u32,

    /// A superseded ID recorded next to the current one, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_wkid: Option<u32>,

    /// The well-known text definition, if the sidecar carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wkt: Option<String>,
}

impl SpatialReference {
    /// Creates a spatial reference from a bare well-known ID.
    pub fn from_wkid(wkid: u32) -> Self {
        Self {
            wkid,
            legacy_wkid: None,
            wkt: None,
        }
    }
}

/// The georeferencing region of a sidecar document, before pairing.
///
/// `source_values` and `target_values` are flat interleaved `x, y, x, y, ...`
/// sequences. They must have equal, even lengths.
#[derive(Clone, Debug, PartialEq)]
pub struct RawGeoreferenceBlock {
    pub spatial_reference: SpatialReference,
    pub source_values: Vec<f64>,
    pub target_values: Vec<f64>,
    /// Order of the polynomial transform the sidecar was fitted with.
    pub polynomial_order: Option<u32>,
}

impl RawGeoreferenceBlock {
    pub fn new(
        spatial_reference: SpatialReference,
        source_values: Vec<f64>,
        target_values: Vec<f64>,
    ) -> Self {
        Self {
            spatial_reference,
            source_values,
            target_values,
            polynomial_order: None,
        }
    }

    /// Checks the even-length and equal-length invariants.
    ///
    /// Returns a description of the first violation found.
    pub fn check_shape(&self) -> Result<(), String> {
        let source_len = self.source_values.len();
        let target_len = self.target_values.len();

        if source_len % 2 != 0 {
            return Err(format!(
                "source control point array has odd length {source_len}"
            ));
        }
        if target_len % 2 != 0 {
            return Err(format!(
                "target control point array has odd length {target_len}"
            ));
        }
        if source_len != target_len {
            return Err(format!(
                "source and target control point arrays differ in length ({source_len} vs {target_len})"
            ));
        }
        Ok(())
    }
}

/// One correspondence between image space and world space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ControlPoint {
    /// Position in the image, with the vertical axis already flipped.
    pub source_point: Coord<Source>,

    /// Position in the world, in the set's spatial reference.
    pub target_point: Coord<Target>,
}

impl ControlPoint {
    pub fn new(source_point: Coord<Source>, target_point: Coord<Target>) -> Self {
        Self {
            source_point,
            target_point,
        }
    }
}

/// An ordered, non-empty set of control points plus their spatial reference.
///
/// Only [`build_control_points`](crate::builder::build_control_points) creates
/// these, so holding one means the sidecar parsed cleanly and produced at
/// least one point. Index `i` corresponds to the `i`-th pair in the sidecar.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ControlPointSet {
    spatial_reference: SpatialReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    polynomial_order: Option<u32>,
    control_points: Vec<ControlPoint>,
}

impl ControlPointSet {
    pub(crate) fn new(
        spatial_reference: SpatialReference,
        polynomial_order: Option<u32>,
        control_points: Vec<ControlPoint>,
    ) -> Self {
        debug_assert!(!control_points.is_empty());
        Self {
            spatial_reference,
            polynomial_order,
            control_points,
        }
    }

    pub fn spatial_reference(&self) -> &SpatialReference {
        &self.spatial_reference
    }

    pub fn polynomial_order(&self) -> Option<u32> {
        self.polynomial_order
    }

    pub fn control_points(&self) -> &[ControlPoint] {
        &self.control_points
    }

    pub fn len(&self) -> usize {
        self.control_points.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.control_points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ControlPoint> {
        self.control_points.iter()
    }

    /// Consumes the set, returning its parts.
    pub fn into_parts(self) -> (SpatialReference, Vec<ControlPoint>) {
        (self.spatial_reference, self.control_points)
    }
}

impl fmt::Display for ControlPointSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Spatial reference: {}", self.spatial_reference.wkid)?;
        if let Some(legacy) = self.spatial_reference.legacy_wkid {
            write!(f, " (legacy {legacy})")?;
        }
        writeln!(f)?;
        if let Some(order) = self.polynomial_order {
            writeln!(f, "Polynomial order: {order}")?;
        }
        writeln!(f, "Control points: {}", self.control_points.len())?;

        for (index, point) in self.control_points.iter().enumerate() {
            writeln!(
                f,
                "  [{index}] source {} -> target {}",
                point.source_point, point.target_point
            )?;
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a ControlPointSet {
    type Item = &'a ControlPoint;
    type IntoIter = std::slice::Iter<'a, ControlPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
