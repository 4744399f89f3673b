//! Pairs raw sidecar arrays into control points.

use crate::error::AuxGcpError;
use crate::ir::{ControlPoint, ControlPointSet, Coord, RawGeoreferenceBlock};

/// Location reported for shape errors caught by the builder itself.
const BLOCK_LOCATION: &str = "<control point arrays>";

/// Builds the ordered control point set for a parsed sidecar block.
///
/// Element `2i` of each array is an x value and `2i + 1` the matching y.
/// Pair `i` of the source array always goes with pair `i` of the target
/// array. The sidecar stores image rows with the vertical axis pointing the
/// other way, so every source y is negated.
///
/// # Errors
/// - [`AuxGcpError::MalformedDocument`] if the arrays have odd or unequal
///   lengths.
/// - [`AuxGcpError::EmptyControlPointSet`] if there are no pairs at all.
pub fn build_control_points(block: &RawGeoreferenceBlock) -> Result<ControlPointSet, AuxGcpError> {
    block
        .check_shape()
        .map_err(|message| AuxGcpError::malformed(BLOCK_LOCATION, message))?;

    if block.source_values.is_empty() {
        return Err(AuxGcpError::EmptyControlPointSet);
    }

    let control_points: Vec<ControlPoint> = block
        .source_values
        .chunks_exact(2)
        .zip(block.target_values.chunks_exact(2))
        .map(|(source, target)| {
            ControlPoint::new(
                Coord::new(source[0], -source[1]),
                Coord::new(target[0], target[1]),
            )
        })
        .collect();

    tracing::debug!(
        count = control_points.len(),
        wkid = block.spatial_reference.wkid,
        "built control points"
    );

    Ok(ControlPointSet::new(
        block.spatial_reference.clone(),
        block.polynomial_order,
        control_points,
    ))
}
