//! Portal-aware 2D visibility.
//!
//! A `World` is an arena of enclosed polygonal spaces whose boundary edges may be
//! linked pairwise by portals. From a viewpoint, `trace::build_radial_trace`
//! computes the exact visibility polygon in the viewpoint's space and continues
//! through every visible portal, producing a tree of visibility polygons.
//!
//! Layers
//! - `geom2`: points, angles, lines, segments, polygons, affine maps (leaf layer).
//! - `portal`: the portal graph (spaces, polygon/vertex/edge refs, portal links).
//! - `trace`: the radial sweep and the recursive portal trace.
//! - `player`: the portal-crossing movement contract.
//! - `render`: the renderer capability and the trace traversal that drives it.
//! - `demo`: the hardcoded demo level.

pub mod demo;
pub mod error;
pub mod geom2;
pub mod player;
pub mod portal;
pub mod render;
pub mod trace;

pub use error::{Error, PortalFault, Result};

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::error::{Error, PortalFault, Result};
    pub use crate::geom2::{
        Aff2, Angle, AngleRange, Circle, Line, LineSegment, Point, Polygon, RadialVector,
        Rectangle, Vector,
    };
    pub use crate::player::{Intent, MotionCfg, Player, PlayerState, TickInput};
    pub use crate::portal::{EdgeRef, LinkId, PolygonId, PortalLink, SpaceId, VertexRef, World};
    pub use crate::render::{DisplayList, Renderer, Rgba, SolidColorRenderer, Surface};
    pub use crate::trace::{build_radial_trace, RayTrace, RecursiveRayTrace, TraceCfg};
}
