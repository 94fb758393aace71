//! Closed polygons, axis-aligned rectangles and circles.

use super::angle::Angle;
use super::line::LineSegment;
use super::radial::RadialVector;
use super::types::{Aff2, Point, Vector};
use crate::error::{Error, Result};

/// Closed polygon of at least three points.
///
/// Invariants:
/// - `points.len() >= 3`, all coordinates finite.
/// - Edge `i` runs from `point(i)` to `point((i + 1) % n)`.
/// - The bounding rectangle is computed once at construction.
///
/// Consecutive points may coincide (sweep output can repeat a point); use
/// `segment` to get a validated edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    points: Vec<Point>,
    bounds: Rectangle,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if points.len() < 3 {
            return Err(Error::geometry(format!(
                "polygons require at least 3 points, got {}",
                points.len()
            )));
        }
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(Error::geometry("polygon coordinates must be finite"));
        }
        let bounds = Rectangle::bounding(&points);
        Ok(Self { points, bounds })
    }

    pub fn builder() -> PolygonBuilder {
        PolygonBuilder::default()
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn point(&self, index: usize) -> Point {
        self.points[index]
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Endpoints of edge `index`.
    #[inline]
    pub fn edge(&self, index: usize) -> (Point, Point) {
        let n = self.points.len();
        (self.points[index], self.points[(index + 1) % n])
    }

    /// Edge `index` as a segment; fails if its endpoints coincide.
    pub fn segment(&self, index: usize) -> Result<LineSegment> {
        let (p1, p2) = self.edge(index);
        LineSegment::new(p1, p2)
    }

    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        (0..self.points.len()).map(move |i| self.edge(i))
    }

    /// Axis-aligned bounding rectangle.
    #[inline]
    pub fn bounding_rect(&self) -> &Rectangle {
        &self.bounds
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        self.transform(&Aff2::translation(Vector::new(dx, dy)))
    }

    pub fn transform(&self, tx: &Aff2) -> Self {
        let points: Vec<Point> = self.points.iter().map(|p| tx.apply(p)).collect();
        let bounds = Rectangle::bounding(&points);
        Self { points, bounds }
    }

    /// Shoelace area; positive for counter-clockwise winding.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        let mut twice = 0.0;
        for i in 0..n {
            let (a, b) = (self.points[i], self.points[(i + 1) % n]);
            twice += a.x * b.y - b.x * a.y;
        }
        twice / 2.0
    }

    /// Even-odd ray crossing test.
    pub fn contains(&self, p: &Point) -> bool {
        let n = self.points.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (pi, pj) = (self.points[i], self.points[j]);
            if (pi.y > p.y) != (pj.y > p.y) {
                let cross_x = (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x;
                if p.x < cross_x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

/// Incremental polygon construction with absolute points and relative steps.
#[derive(Clone, Debug, Default)]
pub struct PolygonBuilder {
    points: Vec<Point>,
}

impl PolygonBuilder {
    pub fn point(mut self, x: f64, y: f64) -> Self {
        self.points.push(Point::new(x, y));
        self
    }

    pub fn push(mut self, p: Point) -> Self {
        self.points.push(p);
        self
    }

    /// Step `(dx, dy)` from the last point (from the origin when empty).
    pub fn line(self, dx: f64, dy: f64) -> Self {
        let last = self.last_point().unwrap_or_else(Point::origin);
        self.push(last + Vector::new(dx, dy))
    }

    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn build(self) -> Result<Polygon> {
        Polygon::new(self.points)
    }
}

/// Axis-aligned rectangle given by center and extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rectangle {
    center: Point,
    width: f64,
    height: f64,
}

impl Rectangle {
    pub fn new(center: Point, width: f64, height: f64) -> Result<Self> {
        if !(width > 0.0) || !(height > 0.0) {
            return Err(Error::geometry(format!(
                "rectangle extents must be positive: {width} x {height}"
            )));
        }
        Ok(Self {
            center,
            width,
            height,
        })
    }

    /// Bounding box of a non-empty point set; extents may be zero.
    pub(crate) fn bounding(points: &[Point]) -> Self {
        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in points {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        Self {
            center: Point::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0),
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn x1(&self) -> f64 {
        self.center.x - self.width / 2.0
    }

    pub fn x2(&self) -> f64 {
        self.center.x + self.width / 2.0
    }

    pub fn y1(&self) -> f64 {
        self.center.y - self.height / 2.0
    }

    pub fn y2(&self) -> f64 {
        self.center.y + self.height / 2.0
    }

    /// Corners in the order (x1, y1), (x1, y2), (x2, y2), (x2, y1).
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x1(), self.y1()),
            Point::new(self.x1(), self.y2()),
            Point::new(self.x2(), self.y2()),
            Point::new(self.x2(), self.y1()),
        ]
    }

    pub fn as_polygon(&self) -> Polygon {
        let points = self.corners().to_vec();
        Polygon {
            points,
            bounds: *self,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    center: Point,
    radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Result<Self> {
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(Error::geometry(format!("radius must be positive: {radius}")));
        }
        Ok(Self { center, radius })
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Regular `resolution`-gon inscribed in the circle, starting at angle 0.
    pub fn as_polygon(&self, resolution: usize) -> Result<Polygon> {
        let mut builder = Polygon::builder();
        for i in 0..resolution {
            let theta = std::f64::consts::TAU * (i as f64) / (resolution as f64);
            let step = RadialVector::new(Angle::from_radians(theta), self.radius)?;
            builder = builder.push(self.center + step.to_vector());
        }
        builder.build()
    }
}
