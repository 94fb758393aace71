//! Coordinate types and the 2D affine map used for portal transforms.

use nalgebra::{Matrix2, Point2, Vector2};

use super::angle::Angle;

/// Immutable 2D coordinate.
pub type Point = Point2<f64>;
/// Cartesian displacement `(dx, dy)`.
pub type Vector = Vector2<f64>;

/// 2D affine map: `x ↦ M x + t`.
///
/// Portals only ever build rigid maps (rotation + translation), but composition
/// and inversion are written for the general case.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aff2 {
    pub m: Matrix2<f64>,
    pub t: Vector2<f64>,
}

impl Default for Aff2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Aff2 {
    #[inline]
    pub fn identity() -> Self {
        Self {
            m: Matrix2::identity(),
            t: Vector2::zeros(),
        }
    }

    #[inline]
    pub fn translation(t: Vector) -> Self {
        Self {
            m: Matrix2::identity(),
            t,
        }
    }

    /// Rotation by `angle` (counter-clockwise) about `center`.
    pub fn rotation_about(center: Point, angle: Angle) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        let m = Matrix2::new(c, -s, s, c);
        let center = center.coords;
        Self {
            m,
            t: center - m * center,
        }
    }

    #[inline]
    pub fn inverse(&self) -> Option<Self> {
        self.m.try_inverse().map(|minv| Self {
            m: minv,
            t: -minv * self.t,
        })
    }

    /// `self ∘ other`: apply `other` first, then `self`.
    #[inline]
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            m: self.m * other.m,
            t: self.m * other.t + self.t,
        }
    }

    #[inline]
    pub fn apply(&self, p: &Point) -> Point {
        Point::from(self.m * p.coords + self.t)
    }

    /// Linear part only; displacements ignore the translation.
    #[inline]
    pub fn apply_vector(&self, v: &Vector) -> Vector {
        self.m * v
    }
}
