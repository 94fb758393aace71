//! Polar displacements, the canonical form for raycasting.

use std::cmp::Ordering;

use super::angle::Angle;
use super::line::Line;
use super::types::{Point, Vector};
use crate::error::{Error, Result};

/// Direction plus magnitude; the magnitude is stored squared.
///
/// Sorting with `raycast_cmp` orders by angle, then far-first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialVector {
    angle: Angle,
    magnitude_squared: f64,
}

impl RadialVector {
    /// Displacement from `p1` to `p2`.
    pub fn between(p1: &Point, p2: &Point) -> Self {
        Self {
            angle: Angle::between(p1, p2),
            magnitude_squared: nalgebra::distance_squared(p1, p2),
        }
    }

    pub fn new(angle: Angle, magnitude: f64) -> Result<Self> {
        if !(magnitude > 0.0) || !magnitude.is_finite() {
            return Err(Error::geometry(format!("magnitude must be positive: {magnitude}")));
        }
        Ok(Self {
            angle,
            magnitude_squared: magnitude * magnitude,
        })
    }

    pub fn from_squared(angle: Angle, magnitude_squared: f64) -> Result<Self> {
        if !(magnitude_squared >= 0.0) || !magnitude_squared.is_finite() {
            return Err(Error::geometry(format!(
                "negative magnitude: {magnitude_squared}"
            )));
        }
        Ok(Self {
            angle,
            magnitude_squared,
        })
    }

    #[inline]
    pub fn unit(angle: Angle) -> Self {
        Self {
            angle,
            magnitude_squared: 1.0,
        }
    }

    /// Polar form of a Cartesian vector; the zero vector points along angle 0.
    pub fn from_vector(v: &Vector) -> Self {
        Self {
            angle: Angle::from_radians(v.y.atan2(v.x)),
            magnitude_squared: v.norm_squared(),
        }
    }

    #[inline]
    pub fn angle(&self) -> Angle {
        self.angle
    }

    #[inline]
    pub fn magnitude_squared(&self) -> f64 {
        self.magnitude_squared
    }

    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared.sqrt()
    }

    #[inline]
    pub fn dx(&self) -> f64 {
        self.angle.cos() * self.magnitude()
    }

    #[inline]
    pub fn dy(&self) -> f64 {
        self.angle.sin() * self.magnitude()
    }

    #[inline]
    pub fn to_vector(&self) -> Vector {
        Vector::new(self.dx(), self.dy())
    }

    pub fn with_angle(&self, angle: Angle) -> Self {
        Self {
            angle,
            magnitude_squared: self.magnitude_squared,
        }
    }

    pub fn rotate(&self, by: Angle) -> Self {
        self.with_angle(self.angle + by)
    }

    /// The full line through `origin` along this direction.
    pub fn line_from(&self, origin: &Point) -> Line {
        let dir = Vector::new(self.angle.cos(), self.angle.sin());
        Line::through_unchecked(origin, &(*origin + dir))
    }

    /// Sweep order: angle under `angle_cmp`, then descending magnitude.
    pub fn raycast_cmp<F>(a: &Self, b: &Self, angle_cmp: F) -> Ordering
    where
        F: Fn(Angle, Angle) -> Ordering,
    {
        angle_cmp(a.angle, b.angle).then_with(|| {
            b.magnitude_squared
                .partial_cmp(&a.magnitude_squared)
                .unwrap_or(Ordering::Equal)
        })
    }
}
