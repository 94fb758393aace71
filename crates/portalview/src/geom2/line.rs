//! Implicit lines `a·x + b·y = c` and bounded segments.

use super::cfg::{CONTAINMENT_DELTA, MIN_DELTA, MIN_DELTA_SQUARED};
use super::types::Point;
use crate::error::{Error, Result};

/// Line `a·x + b·y = c`; `(a, b)` is not normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Line {
    #[inline]
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    #[inline]
    pub fn too_close(p1: &Point, p2: &Point) -> bool {
        nalgebra::distance_squared(p1, p2) < MIN_DELTA_SQUARED
    }

    /// Line through two points at least `MIN_DELTA` apart.
    pub fn from_points(p1: &Point, p2: &Point) -> Result<Self> {
        if Self::too_close(p1, p2) {
            return Err(Error::geometry(format!(
                "points too close: ({}, {}) ({}, {})",
                p1.x, p1.y, p2.x, p2.y
            )));
        }
        Ok(Self::through_unchecked(p1, p2))
    }

    /// Axis-aligned pairs get exact `x = k` / `y = k` forms; lines through the
    /// origin get `c = 0`; everything else uses the determinant form.
    pub(crate) fn through_unchecked(p1: &Point, p2: &Point) -> Self {
        // The origin form below is built from `p1`, so keep `p1` off the origin.
        let (p1, p2) = if p1.x.abs() < MIN_DELTA && p1.y.abs() <= MIN_DELTA {
            (p2, p1)
        } else {
            (p1, p2)
        };

        let dx = p1.x - p2.x;
        if dx.abs() < MIN_DELTA {
            return Self::new(1.0, 0.0, (p1.x + p2.x) / 2.0);
        }
        let dy = p1.y - p2.y;
        if dy.abs() < MIN_DELTA {
            return Self::new(0.0, 1.0, (p1.y + p2.y) / 2.0);
        }

        let det = p2.x * p1.y - p1.x * p2.y;
        if det.abs() < MIN_DELTA {
            return Self::new(p1.y, -p1.x, 0.0);
        }
        Self::new(dy, -dx, det)
    }

    /// Unique intersection point, or None for (near-)parallel lines.
    pub fn intersection(l1: &Line, l2: &Line) -> Option<Point> {
        if l1.b.abs() < MIN_DELTA && l2.b.abs() < MIN_DELTA {
            // Parallel-ish vertical lines.
            return None;
        }
        let det = l2.a * l1.b - l1.a * l2.b;
        if det.abs() < MIN_DELTA {
            return None;
        }
        Some(Point::new(
            (l1.b * l2.c - l2.b * l1.c) / det,
            (l2.a * l1.c - l1.a * l2.c) / det,
        ))
    }

    /// Squared perpendicular distance from `p` to the line.
    pub fn distance_squared(&self, p: &Point) -> f64 {
        let residual = self.a * p.x + self.b * p.y - self.c;
        residual * residual / (self.a * self.a + self.b * self.b)
    }
}

/// Bounded segment from `p1` to `p2`; its line is computed at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSegment {
    p1: Point,
    p2: Point,
    line: Line,
}

impl LineSegment {
    /// Fails with `InvalidGeometry` when the endpoints are too close.
    pub fn new(p1: Point, p2: Point) -> Result<Self> {
        let line = Line::from_points(&p1, &p2)?;
        Ok(Self { p1, p2, line })
    }

    #[inline]
    pub fn p1(&self) -> Point {
        self.p1
    }

    #[inline]
    pub fn p2(&self) -> Point {
        self.p2
    }

    #[inline]
    pub fn line(&self) -> &Line {
        &self.line
    }

    #[inline]
    pub fn length_squared(&self) -> f64 {
        nalgebra::distance_squared(&self.p1, &self.p2)
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    #[inline]
    pub fn midpoint(&self) -> Point {
        nalgebra::center(&self.p1, &self.p2)
    }

    pub fn reversed(&self) -> Self {
        Self {
            p1: self.p2,
            p2: self.p1,
            line: self.line,
        }
    }

    /// Assuming `p` lies on `line()`, whether it falls within the segment bounds.
    pub fn contains_line_point(&self, p: &Point) -> bool {
        let (x_lo, x_hi) = if self.p1.x < self.p2.x {
            (self.p1.x, self.p2.x)
        } else {
            (self.p2.x, self.p1.x)
        };
        if p.x + CONTAINMENT_DELTA < x_lo || p.x - CONTAINMENT_DELTA > x_hi {
            return false;
        }
        let (y_lo, y_hi) = if self.p1.y < self.p2.y {
            (self.p1.y, self.p2.y)
        } else {
            (self.p2.y, self.p1.y)
        };
        !(p.y + CONTAINMENT_DELTA < y_lo || p.y - CONTAINMENT_DELTA > y_hi)
    }

    pub fn intersection(s1: &LineSegment, s2: &LineSegment) -> Option<Point> {
        Line::intersection(&s1.line, &s2.line)
            .filter(|p| s1.contains_line_point(p))
            .filter(|p| s2.contains_line_point(p))
    }

    /// Squared distance from `p` to the closest point of the segment.
    pub fn distance_squared_to(&self, p: &Point) -> f64 {
        let d = self.p2 - self.p1;
        let len2 = d.norm_squared();
        let t = ((*p - self.p1).dot(&d) / len2).clamp(0.0, 1.0);
        let closest = self.p1 + d * t;
        nalgebra::distance_squared(&closest, p)
    }
}
