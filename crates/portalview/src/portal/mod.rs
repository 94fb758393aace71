//! Portal graph: spaces, polygon/vertex/edge identities and portal links.
//!
//! Purpose
//! - Hold every enclosed space of a level in one arena (`World`) and hand out
//!   plain index ids, so portal pairs and vertex/edge back-references never form
//!   reference cycles.
//! - Validate portals once at construction: both edges at least 30 units long,
//!   lengths equal within 0.01, distinct edges, at most one portal per edge.
//!
//! Conventions
//! - Polygon 0 of a space is its exterior boundary; obstacles follow in insertion
//!   order.
//! - Edge `i` of a polygon runs from vertex `i` to vertex `(i + 1) % n`.
//! - A `PortalLink` maps source-space coordinates into destination-space
//!   coordinates; its `reverse` link maps back.

mod space;
mod types;
mod world;

pub use space::{PolygonRef, Space};
pub use types::{
    EdgeRef, LinkId, PolygonId, PortalLink, SpaceId, VertexRef, MIN_PORTAL_SIZE_SQUARED,
    PORTAL_SIZE_SLACK,
};
pub use world::World;
