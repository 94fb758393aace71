//! Exact-geometry kernel for the portal engine.
//!
//! Purpose
//! - Immutable value types (points, angles, radial vectors, lines, segments,
//!   polygons, rectangles, circles) plus the rigid/affine maps portals apply.
//! - Derived data (segment lines, polygon bounds) is computed eagerly at
//!   construction, so every value is plain data and safe to share across threads.
//!
//! Conventions
//! - Angles live in `[0, 2π)`; counter-clockwise is the positive sweep direction.
//! - Polygon edge `i` runs from `point[i]` to `point[(i + 1) mod n]`.
//! - Tolerances are the named constants in `cfg`.

mod angle;
pub mod cfg;
mod line;
mod polygon;
mod radial;
mod types;

pub use angle::{Angle, AngleRange};
pub use line::{Line, LineSegment};
pub use polygon::{Circle, Polygon, PolygonBuilder, Rectangle};
pub use radial::RadialVector;
pub use types::{Aff2, Point, Vector};

#[cfg(test)]
mod tests;
