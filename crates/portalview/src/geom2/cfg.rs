//! Tolerance defaults for the 2D kernel.
//!
//! Policy
//! - Fixed constants, shared by the kernel, the sweep and movement. Squared
//!   thresholds are used wherever a distance is compared, to avoid square roots.

/// Minimum coordinate delta for line construction and parallelism checks.
pub const MIN_DELTA: f64 = 1e-6;
/// `MIN_DELTA²`; two points closer than this are "too close".
pub const MIN_DELTA_SQUARED: f64 = 1e-12;
/// Slack for "point on the line is within the segment bounds".
///
/// Axis-aligned segments rarely match intersections exactly.
pub const CONTAINMENT_DELTA: f64 = 1e-7;
