//! The world arena: construction surface and read-only queries.

use std::sync::Arc;

use tracing::debug;

use super::space::{PolygonRef, Space};
use super::types::{
    EdgeRef, LinkId, PolygonId, PortalLink, SpaceId, VertexRef, MIN_PORTAL_SIZE_SQUARED,
    PORTAL_SIZE_SLACK,
};
use crate::error::{Error, PortalFault, Result};
use crate::geom2::{LineSegment, Point, Polygon};
use crate::render::Renderer;

/// Owns every space and every portal link.
///
/// Mutated only while the level is being built; all queries take `&self`, so a
/// finished world can be shared across threads.
#[derive(Clone, Debug, Default)]
pub struct World {
    spaces: Vec<Space>,
    links: Vec<PortalLink>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_space(&mut self, exterior: Polygon, renderer: Arc<dyn Renderer>) -> Result<SpaceId> {
        let id = SpaceId(self.spaces.len());
        self.spaces.push(Space::new(id, exterior, renderer)?);
        debug!(space = id.0, "added space");
        Ok(id)
    }

    /// Adds an interior obstacle polygon to `space`.
    pub fn add_obstacle(&mut self, space: SpaceId, polygon: Polygon) -> Result<PolygonId> {
        let target = self
            .spaces
            .get_mut(space.0)
            .ok_or_else(|| Error::geometry(format!("unknown space {}", space.0)))?;
        target.push_obstacle(polygon)
    }

    /// Links `a` and `b` with a mutual pair; returns `(a → b, b → a)`.
    pub fn create_portal(&mut self, a: EdgeRef, b: EdgeRef) -> Result<(LinkId, LinkId)> {
        self.install_portal(a, b, false)
    }

    /// Like `create_portal`, but the destination edge is traversed backwards.
    pub fn create_flipped_portal(&mut self, a: EdgeRef, b: EdgeRef) -> Result<(LinkId, LinkId)> {
        self.install_portal(a, b, true)
    }

    fn install_portal(
        &mut self,
        a: EdgeRef,
        b: EdgeRef,
        flipped: bool,
    ) -> Result<(LinkId, LinkId)> {
        let (seg_a, seg_b) = (*self.edge_segment(a)?, *self.edge_segment(b)?);
        if seg_a.length_squared() < MIN_PORTAL_SIZE_SQUARED
            || seg_b.length_squared() < MIN_PORTAL_SIZE_SQUARED
        {
            return Err(Error::InvalidPortal(PortalFault::TooSmall));
        }
        if a == b {
            return Err(Error::InvalidPortal(PortalFault::SelfLink));
        }
        if (seg_a.length() - seg_b.length()).abs() >= PORTAL_SIZE_SLACK {
            return Err(Error::InvalidPortal(PortalFault::SizeMismatch));
        }
        if self.edge_link(a).is_some() || self.edge_link(b).is_some() {
            return Err(Error::InvalidPortal(PortalFault::AlreadyLinked));
        }

        let ab = LinkId(self.links.len());
        let ba = LinkId(self.links.len() + 1);
        let forward = PortalLink::new(ab, ba, (a, seg_a), (b, seg_b), flipped)?;
        let backward = PortalLink::new(ba, ab, (b, seg_b), (a, seg_a), flipped)?;
        self.links.push(forward);
        self.links.push(backward);
        self.polygon_mut(a.polygon)?.set_portal(a.index, ab);
        self.polygon_mut(b.polygon)?.set_portal(b.index, ba);
        debug!(
            src_space = a.space().0,
            src_edge = a.index,
            dst_space = b.space().0,
            dst_edge = b.index,
            flipped,
            "installed portal"
        );
        Ok((ab, ba))
    }

    #[inline]
    pub fn num_spaces(&self) -> usize {
        self.spaces.len()
    }

    /// Panics on an id that this world did not hand out.
    pub fn space(&self, id: SpaceId) -> &Space {
        &self.spaces[id.0]
    }

    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    pub fn polygon(&self, id: PolygonId) -> Option<&PolygonRef> {
        self.spaces.get(id.space.0)?.polygon(id.index)
    }

    fn polygon_mut(&mut self, id: PolygonId) -> Result<&mut PolygonRef> {
        self.spaces
            .get_mut(id.space.0)
            .and_then(|s| s.polygon_mut(id.index))
            .ok_or_else(|| Error::geometry(format!("unknown polygon {id:?}")))
    }

    /// Segment of `edge`, or `InvalidGeometry` for a ref this world does not know.
    pub fn edge_segment(&self, edge: EdgeRef) -> Result<&LineSegment> {
        self.polygon(edge.polygon)
            .filter(|p| edge.index < p.num_points())
            .map(|p| p.segment(edge.index))
            .ok_or_else(|| Error::geometry(format!("unknown edge {edge:?}")))
    }

    pub fn vertex_point(&self, vertex: VertexRef) -> Option<Point> {
        self.polygon(vertex.polygon)
            .filter(|p| vertex.index < p.num_points())
            .map(|p| p.point(vertex.index))
    }

    /// The link whose source is `edge`, if any.
    pub fn edge_link(&self, edge: EdgeRef) -> Option<LinkId> {
        self.polygon(edge.polygon)
            .filter(|p| edge.index < p.num_points())
            .and_then(|p| p.portal(edge.index))
    }

    pub fn link(&self, id: LinkId) -> &PortalLink {
        &self.links[id.0]
    }

    pub fn links(&self) -> &[PortalLink] {
        &self.links
    }

    /// Links whose source lies in `space`, in polygon order then edge order.
    pub fn portal_links(&self, space: SpaceId) -> impl Iterator<Item = &PortalLink> + '_ {
        self.space(space)
            .polygon_refs()
            .iter()
            .flat_map(|p| p.links())
            .map(move |id| self.link(id))
    }

    /// The portal in `space` whose source edge `movement` crosses nearest to its start.
    ///
    /// Ties keep the link met first in `portal_links` order.
    pub fn intersecting_portal_link(
        &self,
        space: SpaceId,
        movement: &LineSegment,
    ) -> Option<LinkId> {
        let start = movement.p1();
        let mut best: Option<(f64, LinkId)> = None;
        for link in self.portal_links(space) {
            let Some(hit) = LineSegment::intersection(movement, link.src_segment()) else {
                continue;
            };
            let dist = nalgebra::distance_squared(&start, &hit);
            if best.map_or(true, |(d, _)| dist < d) {
                best = Some((dist, link.id()));
            }
        }
        best.map(|(_, id)| id)
    }
}
