//! Single-space radial sweep.
//!
//! Vertices are visited in angular order around the origin while one "active"
//! edge is tracked: the nearest boundary edge along the current direction.
//! Each vertex either lies on the active edge, hides behind it, marks the end
//! of it (re-cast just before the vertex), or opens a nearer edge (re-cast just
//! after the vertex). Through a portal, the sweep is restricted to the
//! window's angular range and ignores everything in front of the window.

use std::cmp::Ordering;
use std::f64::consts::FRAC_PI_2;

use crate::error::{Error, Result};
use crate::geom2::cfg::MIN_DELTA;
use crate::geom2::{Angle, AngleRange, Line, LineSegment, Point, RadialVector};
use crate::portal::{EdgeRef, LinkId, SpaceId, VertexRef, World};

/// Portal aperture a sub-trace looks through, ordered so that `segment.p1()` is
/// at `range.start()`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Window {
    pub segment: LineSegment,
    pub range: AngleRange,
}

impl Window {
    pub fn new(origin: &Point, segment: LineSegment) -> Self {
        let a1 = Angle::between(origin, &segment.p1());
        let a2 = Angle::between(origin, &segment.p2());
        let range = AngleRange::acute_counter_clockwise(a1, a2);
        let segment = if range.start() == a1 {
            segment
        } else {
            segment.reversed()
        };
        Self { segment, range }
    }
}

/// An emitted scope point with the portal links of the edges it lies on.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Mark {
    pub point: Point,
    pub links: Vec<LinkId>,
}

impl Mark {
    /// First link shared with `other`.
    pub fn shared_link(&self, other: &Mark) -> Option<LinkId> {
        self.links.iter().copied().find(|l| other.links.contains(l))
    }

    pub fn absorb(&mut self, other: Mark) {
        for l in other.links {
            if !self.links.contains(&l) {
                self.links.push(l);
            }
        }
    }
}

struct SweepEdge {
    segment: LineSegment,
    link: Option<LinkId>,
    ends: [VertexRef; 2],
}

struct SweepVertex {
    vector: RadialVector,
    point: Point,
    vertex: VertexRef,
    /// Flat indices of the two edges meeting here.
    edges: [usize; 2],
}

#[derive(Default)]
struct Nearest(Option<(usize, f64)>);

impl Nearest {
    fn offer(&mut self, edge: usize, dist: f64, floor: f64) {
        if dist > floor && self.0.map_or(true, |(_, d)| dist < d) {
            self.0 = Some((edge, dist));
        }
    }

    fn edge(self, angle: Angle) -> Result<usize> {
        self.0.map(|(i, _)| i).ok_or(Error::AmbiguousRaycast {
            angle: angle.radians(),
        })
    }
}

struct Sweep<'a> {
    origin: Point,
    window: Option<&'a Window>,
    edges: Vec<SweepEdge>,
    portal: Option<usize>,
    out: Vec<Mark>,
}

/// Runs the sweep of `space` from `origin`; returns the scope outline with its
/// link tags, in counter-clockwise order.
pub(crate) fn radial_sweep(
    world: &World,
    space: SpaceId,
    origin: Point,
    window: Option<&Window>,
    portal_edge: Option<EdgeRef>,
) -> Result<Vec<Mark>> {
    let mut edges = Vec::new();
    let mut vertices = Vec::new();
    let mut portal = None;
    for poly in world.space(space).polygon_refs() {
        let offset = edges.len();
        let n = poly.num_points();
        if let Some(pe) = portal_edge.filter(|pe| pe.polygon == poly.id()) {
            portal = Some(offset + pe.index);
        }
        for e in poly.edge_refs() {
            edges.push(SweepEdge {
                segment: *poly.segment(e.index),
                link: poly.portal(e.index),
                ends: poly.edge_vertices(e.index),
            });
        }
        for v in poly.vertex_refs() {
            let point = poly.point(v.index);
            vertices.push(SweepVertex {
                vector: RadialVector::between(&origin, &point),
                point,
                vertex: v,
                edges: [offset + (v.index + n - 1) % n, offset + v.index],
            });
        }
    }
    let mut sweep = Sweep {
        origin,
        window,
        edges,
        portal,
        out: Vec::new(),
    };

    if let Some(w) = window {
        let mut kept = Vec::with_capacity(vertices.len());
        for v in vertices {
            if sweep.behind_window(w, &v)? {
                kept.push(v);
            }
        }
        vertices = kept;
    }
    vertices.sort_by(|a, b| {
        RadialVector::raycast_cmp(&a.vector, &b.vector, |x, y| sweep.angle_cmp(x, y))
    });

    sweep.run(&vertices)?;
    Ok(sweep.out)
}

impl Sweep<'_> {
    fn angle_cmp(&self, a: Angle, b: Angle) -> Ordering {
        match self.window {
            Some(w) => w.range.compare(a, b),
            None => a
                .radians()
                .partial_cmp(&b.radians())
                .unwrap_or(Ordering::Equal),
        }
    }

    fn ray(&self, angle: Angle) -> Line {
        RadialVector::unit(angle).line_from(&self.origin)
    }

    /// Inside the window's range and strictly past the aperture.
    fn behind_window(&self, w: &Window, v: &SweepVertex) -> Result<bool> {
        let angle = v.vector.angle();
        if !w.range.contains(angle) {
            return Ok(false);
        }
        let hit = Line::intersection(&self.ray(angle), w.segment.line()).ok_or_else(|| {
            Error::geometry(format!("occlusion window parallel to ray at {angle}"))
        })?;
        let window_dist = nalgebra::distance_squared(&self.origin, &hit);
        Ok(v.vector.magnitude_squared() > window_dist + MIN_DELTA)
    }

    /// Where the ray along `angle` meets `segment`, if it does so in front of the origin.
    fn single_ray_cast(&self, angle: Angle, ray: &Line, segment: &LineSegment) -> Option<Point> {
        let hit = Line::intersection(ray, segment.line())?;
        if !segment.contains_line_point(&hit)
            || Angle::acute_diff(Angle::between(&self.origin, &hit), angle).radians() > FRAC_PI_2
        {
            return None;
        }
        Some(hit)
    }

    /// Squared distance below which hits are ignored: the window line, if any.
    fn cast_floor(&self, angle: Angle, ray: &Line) -> Result<f64> {
        match self.window {
            Some(w) => {
                let hit = Line::intersection(w.segment.line(), ray)
                    .ok_or(Error::AmbiguousRaycast {
                        angle: angle.radians(),
                    })?;
                Ok(nalgebra::distance_squared(&self.origin, &hit) - MIN_DELTA)
            }
            None => Ok(f64::NEG_INFINITY),
        }
    }

    fn hit_distance(&self, angle: Angle, ray: &Line, edge: usize) -> Option<f64> {
        self.single_ray_cast(angle, ray, &self.edges[edge].segment)
            .map(|hit| nalgebra::distance_squared(&self.origin, &hit))
    }

    /// Nearest edge among `candidates` along `angle`, beyond the window if any.
    /// Candidates the ray misses are dropped from the set.
    fn cast(&self, angle: Angle, candidates: &mut [bool]) -> Result<usize> {
        let ray = self.ray(angle);
        let floor = self.cast_floor(angle, &ray)?;
        let mut best = Nearest::default();
        for (i, keep) in candidates.iter_mut().enumerate() {
            if !*keep {
                continue;
            }
            match self.hit_distance(angle, &ray, i) {
                Some(dist) => best.offer(i, dist, floor),
                None => *keep = false,
            }
        }
        best.edge(angle)
    }

    /// Like `cast` over the given edges only, leaving the running candidate set alone.
    fn cast_among(&self, angle: Angle, edges: &[usize]) -> Result<usize> {
        let ray = self.ray(angle);
        let floor = self.cast_floor(angle, &ray)?;
        let mut best = Nearest::default();
        for &i in edges {
            if let Some(dist) = self.hit_distance(angle, &ray, i) {
                best.offer(i, dist, floor);
            }
        }
        best.edge(angle)
    }

    fn meet(&self, edge: usize, angle: Angle) -> Result<Point> {
        Line::intersection(self.edges[edge].segment.line(), &self.ray(angle)).ok_or(
            Error::AmbiguousRaycast {
                angle: angle.radians(),
            },
        )
    }

    fn edge_has_vertex(&self, edge: usize, vertex: VertexRef) -> bool {
        self.edges[edge].ends.contains(&vertex)
    }

    /// Edges of `v` that take part in the sweep (the entry portal never does).
    fn live_edges(&self, v: &SweepVertex) -> Vec<usize> {
        v.edges
            .iter()
            .copied()
            .filter(|&e| Some(e) != self.portal)
            .collect()
    }

    fn emit(&mut self, point: Point) {
        self.out.push(Mark {
            point,
            links: Vec::new(),
        });
    }

    fn emit_on_edge(&mut self, point: Point, edge: usize) {
        let links = self.edges[edge].link.into_iter().collect();
        self.out.push(Mark { point, links });
    }

    fn emit_vertex(&mut self, v: &SweepVertex) {
        let links = self
            .live_edges(v)
            .into_iter()
            .filter_map(|e| self.edges[e].link)
            .collect();
        self.out.push(Mark {
            point: v.point,
            links,
        });
    }

    fn run(&mut self, vertices: &[SweepVertex]) -> Result<()> {
        let n = vertices.len();
        let range = self.window.map(|w| w.range);
        if n == 0 && range.is_none() {
            return Err(Error::geometry("space has no vertices"));
        }

        let mut candidates: Vec<bool> = (0..self.edges.len())
            .map(|i| Some(i) != self.portal)
            .collect();

        let mid_start = match range {
            Some(r) => Angle::counter_clockwise_midpoint(
                r.start(),
                vertices.first().map_or(r.end(), |v| v.vector.angle()),
            ),
            None => Angle::counter_clockwise_midpoint(
                vertices[n - 1].vector.angle(),
                vertices[0].vector.angle(),
            ),
        };
        let mut active = self.cast(mid_start, &mut candidates)?;

        if let (Some(w), Some(r)) = (self.window, range) {
            self.emit(w.segment.p1());
            let start_hit = self.meet(active, r.start())?;
            self.emit_on_edge(start_hit, active);
        }

        // Without a window the sweep wraps around and revisits the first vertex.
        let steps = if range.is_some() { n } else { n + 1 };
        let mut prev = n.checked_sub(1);
        for i in 0..steps {
            let v = &vertices[i % n];
            let next = &vertices[(i + 1) % n];
            let initial = i == 0 && range.is_some();
            let terminal = i + 1 == n && range.is_some();
            let angle = v.vector.angle();

            let fresh = self.live_edges(v);
            for &e in &fresh {
                candidates[e] = true;
            }

            let next_angle = match range {
                Some(r) if terminal => r.end(),
                _ => next.vector.angle(),
            };

            if fresh.contains(&active) {
                self.emit_vertex(v);
            } else {
                let ray = v.vector.line_from(&self.origin);
                match self.single_ray_cast(angle, &ray, &self.edges[active].segment) {
                    None => {
                        // The active edge ended before this vertex.
                        let (prev_angle, prev_vertex) = match prev.filter(|_| !initial) {
                            Some(p) => (vertices[p].vector.angle(), Some(vertices[p].vertex)),
                            None => (range.map_or(angle, |r| r.start()), None),
                        };
                        let mid = Angle::counter_clockwise_midpoint(prev_angle, angle);
                        active = self.cast(mid, &mut candidates)?;
                        for &e in &fresh {
                            candidates[e] = true;
                        }

                        if prev_vertex.map_or(true, |pv| !self.edge_has_vertex(active, pv)) {
                            let drop_off = self.meet(active, prev_angle)?;
                            self.emit_on_edge(drop_off, active);
                        }

                        if self.edge_has_vertex(active, v.vertex) {
                            self.emit_vertex(v);
                        } else {
                            let active_line = self.edges[active].segment.line();
                            let pull_up = Line::intersection(active_line, &ray).ok_or(
                                Error::AmbiguousRaycast {
                                    angle: angle.radians(),
                                },
                            )?;
                            if nalgebra::distance_squared(&self.origin, &pull_up)
                                > v.vector.magnitude_squared()
                            {
                                self.emit_on_edge(pull_up, active);
                                let next_mid = Angle::counter_clockwise_midpoint(angle, next_angle);
                                active = self.cast_among(next_mid, &fresh)?;
                                self.emit_vertex(v);
                            }
                        }
                    }
                    Some(hit)
                        if nalgebra::distance_squared(&self.origin, &hit)
                            < v.vector.magnitude_squared() =>
                    {
                        // Hidden behind the active edge.
                    }
                    Some(hit) => {
                        // A nearer edge starts at this vertex.
                        self.emit_on_edge(hit, active);
                        self.emit_vertex(v);
                        let next_mid = Angle::counter_clockwise_midpoint(angle, next_angle);
                        active = self.cast_among(next_mid, &fresh)?;
                    }
                }
            }
            prev = Some(i % n);
        }

        if let (Some(w), Some(r)) = (self.window, range) {
            let last_angle = vertices.last().map_or(r.start(), |v| v.vector.angle());
            let mid_end = Angle::counter_clockwise_midpoint(last_angle, r.end());
            let prev_active = active;
            active = self.cast(mid_end, &mut candidates)?;
            if active != prev_active {
                if let Some(last) = self.out.last().map(|m| m.point) {
                    let pull_up = Line::from_points(&self.origin, &last)
                        .ok()
                        .and_then(|l| Line::intersection(&l, self.edges[active].segment.line()))
                        .ok_or(Error::AmbiguousRaycast {
                            angle: mid_end.radians(),
                        })?;
                    self.emit_on_edge(pull_up, active);
                }
            }
            let end_hit = self.meet(active, r.end())?;
            self.emit_on_edge(end_hit, active);
            self.emit(w.segment.p2());
        }
        Ok(())
    }
}
