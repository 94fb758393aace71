//! Arena identifiers and the portal link record.

use crate::error::{Error, Result};
use crate::geom2::{Aff2, Angle, LineSegment};

/// Index of a space inside its `World`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpaceId(pub usize);

/// Index of a portal link inside its `World`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub usize);

/// A polygon of a space; index 0 is the exterior boundary, obstacles follow in
/// insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PolygonId {
    pub space: SpaceId,
    pub index: usize,
}

impl PolygonId {
    #[inline]
    pub fn is_exterior(&self) -> bool {
        self.index == 0
    }

    #[inline]
    pub fn edge(self, index: usize) -> EdgeRef {
        EdgeRef {
            polygon: self,
            index,
        }
    }

    #[inline]
    pub fn vertex(self, index: usize) -> VertexRef {
        VertexRef {
            polygon: self,
            index,
        }
    }
}

/// Edge `index` of a polygon: runs from vertex `index` to vertex `index + 1`.
///
/// Two edges with identical coordinates in different polygons are distinct refs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeRef {
    pub polygon: PolygonId,
    pub index: usize,
}

impl EdgeRef {
    #[inline]
    pub fn space(&self) -> SpaceId {
        self.polygon.space
    }
}

/// Vertex `index` of a polygon; it closes edge `index - 1` and opens edge `index`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexRef {
    pub polygon: PolygonId,
    pub index: usize,
}

/// Portals shorter than 30 units are rejected.
pub const MIN_PORTAL_SIZE_SQUARED: f64 = 30.0 * 30.0;
/// Largest allowed length difference between the two edges of a portal.
pub const PORTAL_SIZE_SLACK: f64 = 0.01;

/// One directed half of a portal pair: crossing `source` lands on `destination`.
///
/// Never mutated after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct PortalLink {
    id: LinkId,
    source: EdgeRef,
    destination: EdgeRef,
    reverse: LinkId,
    flipped: bool,
    rotation: Angle,
    transform: Aff2,
    inverse_transform: Aff2,
    src_segment: LineSegment,
    dst_segment: LineSegment,
}

impl PortalLink {
    /// Rotation is the angle from the source direction to the destination direction
    /// (reversed when `flipped`); the map rotates about the source midpoint and then
    /// carries that midpoint onto the destination midpoint.
    pub(crate) fn new(
        id: LinkId,
        reverse: LinkId,
        (source, src_segment): (EdgeRef, LineSegment),
        (destination, dst_segment): (EdgeRef, LineSegment),
        flipped: bool,
    ) -> Result<Self> {
        let a1 = Angle::between(&src_segment.p1(), &src_segment.p2());
        let a2 = if flipped {
            Angle::between(&dst_segment.p2(), &dst_segment.p1())
        } else {
            Angle::between(&dst_segment.p1(), &dst_segment.p2())
        };
        let rotation = Angle::from_radians(a2.radians() - a1.radians());

        let mid1 = src_segment.midpoint();
        let mid2 = dst_segment.midpoint();
        let transform =
            Aff2::translation(mid2 - mid1).compose(&Aff2::rotation_about(mid1, rotation));
        let inverse_transform = transform
            .inverse()
            .ok_or_else(|| Error::geometry("portal transform is singular"))?;

        Ok(Self {
            id,
            source,
            destination,
            reverse,
            flipped,
            rotation,
            transform,
            inverse_transform,
            src_segment,
            dst_segment,
        })
    }

    #[inline]
    pub fn id(&self) -> LinkId {
        self.id
    }

    #[inline]
    pub fn source(&self) -> EdgeRef {
        self.source
    }

    #[inline]
    pub fn destination(&self) -> EdgeRef {
        self.destination
    }

    /// The other half of the pair (destination back to source).
    #[inline]
    pub fn reverse(&self) -> LinkId {
        self.reverse
    }

    #[inline]
    pub fn flipped(&self) -> bool {
        self.flipped
    }

    #[inline]
    pub fn source_space(&self) -> SpaceId {
        self.source.space()
    }

    #[inline]
    pub fn dest_space(&self) -> SpaceId {
        self.destination.space()
    }

    #[inline]
    pub fn rotation(&self) -> Angle {
        self.rotation
    }

    /// Source-space coordinates to destination-space coordinates.
    #[inline]
    pub fn transform(&self) -> &Aff2 {
        &self.transform
    }

    #[inline]
    pub fn inverse_transform(&self) -> &Aff2 {
        &self.inverse_transform
    }

    #[inline]
    pub fn src_segment(&self) -> &LineSegment {
        &self.src_segment
    }

    #[inline]
    pub fn dst_segment(&self) -> &LineSegment {
        &self.dst_segment
    }
}
