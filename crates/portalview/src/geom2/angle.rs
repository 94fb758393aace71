//! Directions normalized to `[0, 2π)` and acute counter-clockwise arcs.

use std::cmp::Ordering;
use std::f64::consts::{PI, TAU};

use super::types::Point;

/// A direction in `[0, 2π)`.
///
/// Arithmetic is mod 2π; counter-clockwise is positive.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Angle(f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    pub fn from_radians(radians: f64) -> Self {
        let r = radians.rem_euclid(TAU);
        // rem_euclid rounds tiny negatives up to exactly 2π.
        if r >= TAU {
            Angle(0.0)
        } else {
            Angle(r)
        }
    }

    /// Direction of the ray from `p1` towards `p2`.
    #[inline]
    pub fn between(p1: &Point, p2: &Point) -> Self {
        Self::from_radians((p2.y - p1.y).atan2(p2.x - p1.x))
    }

    #[inline]
    pub fn radians(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn cos(self) -> f64 {
        self.0.cos()
    }

    #[inline]
    pub fn sin(self) -> f64 {
        self.0.sin()
    }

    /// Unsigned angular distance in `[0, π]`.
    pub fn acute_diff(a1: Angle, a2: Angle) -> Angle {
        let mut diff = (a2.0 - a1.0).abs();
        if diff > PI {
            diff = TAU - diff;
        }
        Angle::from_radians(diff)
    }

    /// Counter-clockwise offset travelled from `a2` to reach `a1`.
    pub fn counter_clockwise_diff(a1: Angle, a2: Angle) -> Angle {
        if a1.0 > a2.0 {
            Angle::from_radians(a1.0 - a2.0)
        } else {
            Angle::from_radians(TAU - (a2.0 - a1.0))
        }
    }

    /// Midpoint of the counter-clockwise arc from `a1` to `a2`.
    pub fn counter_clockwise_midpoint(a1: Angle, a2: Angle) -> Angle {
        if a1.0 > a2.0 {
            Angle::from_radians((a1.0 + a2.0) / 2.0 + PI)
        } else {
            Angle::from_radians((a1.0 + a2.0) / 2.0)
        }
    }
}

impl std::ops::Add for Angle {
    type Output = Angle;
    #[inline]
    fn add(self, rhs: Angle) -> Angle {
        Angle::from_radians(self.0 + rhs.0)
    }
}

impl std::ops::Neg for Angle {
    type Output = Angle;
    #[inline]
    fn neg(self) -> Angle {
        Angle::from_radians(-self.0)
    }
}

impl std::fmt::Display for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6} rad", self.0)
    }
}

/// The acute counter-clockwise arc from `start` to `end`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngleRange {
    start: Angle,
    end: Angle,
}

impl AngleRange {
    /// Orders the pair so the counter-clockwise arc from start to end is at most π.
    pub fn acute_counter_clockwise(a1: Angle, a2: Angle) -> Self {
        if Angle::from_radians(a2.0 - a1.0).0 > PI {
            Self { start: a2, end: a1 }
        } else {
            Self { start: a1, end: a2 }
        }
    }

    #[inline]
    pub fn start(&self) -> Angle {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Angle {
        self.end
    }

    /// Counter-clockwise offset of `a` from `start`, in `[0, 2π)`.
    #[inline]
    pub fn offset(&self, a: Angle) -> f64 {
        Angle::counter_clockwise_diff(a, self.start).0
    }

    pub fn contains(&self, a: Angle) -> bool {
        self.offset(a) < self.offset(self.end)
    }

    /// Total order over angles by offset from `start`.
    pub fn compare(&self, a: Angle, b: Angle) -> Ordering {
        self.offset(a)
            .partial_cmp(&self.offset(b))
            .unwrap_or(Ordering::Equal)
    }
}
