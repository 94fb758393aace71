//! Enclosed spaces and the per-polygon vertex/edge identities.

use std::sync::Arc;

use super::types::{EdgeRef, LinkId, PolygonId, SpaceId, VertexRef};
use crate::error::Result;
use crate::geom2::{LineSegment, Point, Polygon};
use crate::render::Renderer;

/// A polygon registered in a space, with validated edge segments and the portal
/// slot of each edge.
#[derive(Clone, Debug)]
pub struct PolygonRef {
    id: PolygonId,
    polygon: Polygon,
    segments: Vec<LineSegment>,
    portals: Vec<Option<LinkId>>,
}

impl PolygonRef {
    /// Fails with `InvalidGeometry` if any edge is degenerate.
    pub(crate) fn new(id: PolygonId, polygon: Polygon) -> Result<Self> {
        let segments = (0..polygon.num_points())
            .map(|i| polygon.segment(i))
            .collect::<Result<Vec<_>>>()?;
        let portals = vec![None; segments.len()];
        Ok(Self {
            id,
            polygon,
            segments,
            portals,
        })
    }

    #[inline]
    pub fn id(&self) -> PolygonId {
        self.id
    }

    #[inline]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.segments.len()
    }

    pub fn point(&self, vertex: usize) -> Point {
        self.polygon.point(vertex)
    }

    pub fn segment(&self, edge: usize) -> &LineSegment {
        &self.segments[edge]
    }

    pub fn portal(&self, edge: usize) -> Option<LinkId> {
        self.portals[edge]
    }

    pub(crate) fn set_portal(&mut self, edge: usize, link: LinkId) {
        self.portals[edge] = Some(link);
    }

    /// The two edges meeting at `vertex`: the one it closes, then the one it opens.
    pub fn vertex_edges(&self, vertex: usize) -> [EdgeRef; 2] {
        let n = self.num_points();
        [
            self.id.edge((vertex + n - 1) % n),
            self.id.edge(vertex),
        ]
    }

    /// Endpoints of `edge` as vertex refs.
    pub fn edge_vertices(&self, edge: usize) -> [VertexRef; 2] {
        let n = self.num_points();
        [self.id.vertex(edge), self.id.vertex((edge + 1) % n)]
    }

    pub fn vertex_refs(&self) -> impl Iterator<Item = VertexRef> + '_ {
        (0..self.num_points()).map(move |i| self.id.vertex(i))
    }

    pub fn edge_refs(&self) -> impl Iterator<Item = EdgeRef> + '_ {
        (0..self.num_points()).map(move |i| self.id.edge(i))
    }

    /// Links attached to this polygon, in edge order.
    pub fn links(&self) -> impl Iterator<Item = LinkId> + '_ {
        self.portals.iter().flatten().copied()
    }
}

/// One enclosed region: an exterior boundary plus interior obstacles.
#[derive(Clone, Debug)]
pub struct Space {
    id: SpaceId,
    polygons: Vec<PolygonRef>,
    renderer: Arc<dyn Renderer>,
}

impl Space {
    pub(crate) fn new(id: SpaceId, exterior: Polygon, renderer: Arc<dyn Renderer>) -> Result<Self> {
        let exterior = PolygonRef::new(PolygonId { space: id, index: 0 }, exterior)?;
        Ok(Self {
            id,
            polygons: vec![exterior],
            renderer,
        })
    }

    pub(crate) fn push_obstacle(&mut self, polygon: Polygon) -> Result<PolygonId> {
        let id = PolygonId {
            space: self.id,
            index: self.polygons.len(),
        };
        self.polygons.push(PolygonRef::new(id, polygon)?);
        Ok(id)
    }

    #[inline]
    pub fn id(&self) -> SpaceId {
        self.id
    }

    pub fn exterior(&self) -> &PolygonRef {
        &self.polygons[0]
    }

    pub fn exterior_polygon(&self) -> &Polygon {
        self.polygons[0].polygon()
    }

    /// Exterior first, then obstacles in insertion order. Sweeps and portal
    /// lookups rely on this order being stable.
    pub fn polygon_refs(&self) -> &[PolygonRef] {
        &self.polygons
    }

    pub fn obstacles(&self) -> &[PolygonRef] {
        &self.polygons[1..]
    }

    pub fn polygon(&self, index: usize) -> Option<&PolygonRef> {
        self.polygons.get(index)
    }

    pub(crate) fn polygon_mut(&mut self, index: usize) -> Option<&mut PolygonRef> {
        self.polygons.get_mut(index)
    }

    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }

    pub fn num_vertices(&self) -> usize {
        self.polygons.iter().map(PolygonRef::num_points).sum()
    }

    /// Whether `p` lies inside the exterior boundary and outside every obstacle.
    pub fn contains(&self, p: &Point) -> bool {
        self.exterior_polygon().contains(p)
            && !self.obstacles().iter().any(|o| o.polygon().contains(p))
    }
}
