//! Quality checks for control point sets.
//!
//! A set that came out of the builder is already structurally sound. This
//! module looks for things that make it a poor basis for a transform:
//! - Non-finite coordinates
//! - Repeated source or target positions
//! - Too few points for the recorded polynomial order
//! - Source points that all sit on one line

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use std::collections::HashMap;

use crate::ir::{ControlPointSet, Coord, Source};

/// Polynomial order assumed when the sidecar does not record one.
pub const DEFAULT_POLYNOMIAL_ORDER: u32 = 1;

/// Relative tolerance for the collinearity check.
const COLLINEAR_EPSILON: f64 = 1e-9;

/// Options for validation behavior.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    /// If true, treat warnings as errors.
    pub strict: bool,
}

/// Validates a control point set and returns a report of all issues found.
///
/// Validation never changes the set; callers decide what to do with the
/// report.
pub fn validate_control_points(set: &ControlPointSet, _opts: &ValidateOptions) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_finite(set, &mut report);
    validate_duplicates(set, &mut report);
    validate_point_count(set, &mut report);
    validate_collinearity(set, &mut report);

    report
}

/// Minimum number of points a polynomial transform of `order` needs.
pub fn required_points(order: u32) -> usize {
    let order = order as usize;
    (order + 1) * (order + 2) / 2
}

fn validate_finite(set: &ControlPointSet, report: &mut ValidationReport) {
    for (index, point) in set.iter().enumerate() {
        if !point.source_point.is_finite() {
            report.add(ValidationIssue::error(
                IssueCode::NonFiniteSourcePoint,
                format!("Source point {} is not finite", point.source_point),
                IssueContext::ControlPoint { index },
            ));
        }
        if !point.target_point.is_finite() {
            report.add(ValidationIssue::error(
                IssueCode::NonFiniteTargetPoint,
                format!("Target point {} is not finite", point.target_point),
                IssueContext::ControlPoint { index },
            ));
        }
    }
}

fn validate_duplicates(set: &ControlPointSet, report: &mut ValidationReport) {
    let mut seen_sources: HashMap<(u64, u64), usize> = HashMap::new();
    let mut seen_targets: HashMap<(u64, u64), usize> = HashMap::new();

    for (index, point) in set.iter().enumerate() {
        let source = (point.source_point.x(), point.source_point.y());
        if let Some(first) = seen_sources.get(&bits_key(source)) {
            report.add(ValidationIssue::warning(
                IssueCode::DuplicateSourcePoint,
                format!(
                    "Source point {} repeats control point {}",
                    point.source_point, first
                ),
                IssueContext::ControlPoint { index },
            ));
        } else {
            seen_sources.insert(bits_key(source), index);
        }

        let target = (point.target_point.x(), point.target_point.y());
        if let Some(first) = seen_targets.get(&bits_key(target)) {
            report.add(ValidationIssue::warning(
                IssueCode::DuplicateTargetPoint,
                format!(
                    "Target point {} repeats control point {}",
                    point.target_point, first
                ),
                IssueContext::ControlPoint { index },
            ));
        } else {
            seen_targets.insert(bits_key(target), index);
        }
    }
}

fn validate_point_count(set: &ControlPointSet, report: &mut ValidationReport) {
    let order = set.polynomial_order().unwrap_or(DEFAULT_POLYNOMIAL_ORDER);
    let required = required_points(order);

    if set.len() < required {
        report.add(ValidationIssue::warning(
            IssueCode::TooFewControlPoints,
            format!(
                "{} control point(s) but a polynomial of order {} needs at least {}",
                set.len(),
                order,
                required
            ),
            IssueContext::ControlPointSet,
        ));
    }
}

fn validate_collinearity(set: &ControlPointSet, report: &mut ValidationReport) {
    let sources: Vec<Coord<Source>> = set
        .iter()
        .map(|point| point.source_point)
        .filter(Coord::is_finite)
        .collect();

    if sources.len() < 3 {
        return;
    }

    if are_collinear(&sources) {
        report.add(ValidationIssue::warning(
            IssueCode::CollinearSourcePoints,
            "All source points lie on one line; the transform is underdetermined",
            IssueContext::ControlPointSet,
        ));
    }
}

/// Returns true if every point lies on the line through the first point and
/// the point farthest from it. Coincident points count as collinear.
fn are_collinear(points: &[Coord<Source>]) -> bool {
    let origin = points[0];
    let offset = |p: &Coord<Source>| (p.x() - origin.x(), p.y() - origin.y());
    let length = |(dx, dy): (f64, f64)| dx.hypot(dy);

    let Some(axis) = points
        .iter()
        .map(offset)
        .max_by(|a, b| length(*a).total_cmp(&length(*b)))
    else {
        return true;
    };
    let axis_length = length(axis);
    if axis_length == 0.0 {
        return true;
    }

    points.iter().map(offset).all(|d| {
        let cross = axis.0 * d.1 - axis.1 * d.0;
        cross.abs() <= COLLINEAR_EPSILON * axis_length * axis_length
    })
}

/// Hash key for exact coordinate equality, treating `-0.0` as `0.0`.
fn bits_key((x, y): (f64, f64)) -> (u64, u64) {
    ((x + 0.0).to_bits(), (y + 0.0).to_bits())
}
