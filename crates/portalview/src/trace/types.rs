//! Trace configuration and the visibility tree.

use crate::geom2::{Aff2, Point, Polygon};
use crate::portal::{LinkId, SpaceId};

/// Trace configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceCfg {
    /// Portal apertures farther than this from the (transformed) viewpoint are
    /// not entered.
    pub max_distance: f64,
    /// Hard ceiling on portal hops; the distance cutoff alone does not bound
    /// near-degenerate portal loops.
    pub max_depth: usize,
}

impl Default for TraceCfg {
    fn default() -> Self {
        Self {
            max_distance: 800.0,
            max_depth: 64,
        }
    }
}

/// One node of a visibility tree.
///
/// `scope` and `origin` are in the coordinates of `space`; `to_view` maps them
/// back into the viewpoint frame of the root.
#[derive(Clone, Debug)]
pub struct RayTrace {
    pub(crate) space: SpaceId,
    pub(crate) origin: Point,
    pub(crate) scope: Polygon,
    pub(crate) depth: usize,
    pub(crate) to_view: Aff2,
    pub(crate) children: Vec<RecursiveRayTrace>,
}

/// A sub-trace entered through `link`.
#[derive(Clone, Debug)]
pub struct RecursiveRayTrace {
    pub(crate) link: LinkId,
    pub(crate) trace: RayTrace,
}

impl RecursiveRayTrace {
    #[inline]
    pub fn link(&self) -> LinkId {
        self.link
    }

    #[inline]
    pub fn trace(&self) -> &RayTrace {
        &self.trace
    }
}

impl RayTrace {
    #[inline]
    pub fn space(&self) -> SpaceId {
        self.space
    }

    /// Viewpoint, expressed in this node's space.
    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Visibility polygon.
    #[inline]
    pub fn scope(&self) -> &Polygon {
        &self.scope
    }

    /// Number of portal hops from the root.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn to_view(&self) -> &Aff2 {
        &self.to_view
    }

    pub fn children(&self) -> &[RecursiveRayTrace] {
        &self.children
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Deepest node depth in this subtree.
    pub fn max_depth(&self) -> usize {
        self.iter().map(RayTrace::depth).max().unwrap_or(self.depth)
    }

    /// Pre-order walk: a node, then each child subtree in order.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }
}

/// Pre-order iterator over a `RayTrace` tree.
pub struct Iter<'a> {
    stack: Vec<&'a RayTrace>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a RayTrace;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(RecursiveRayTrace::trace));
        Some(node)
    }
}

impl<'a> IntoIterator for &'a RayTrace {
    type Item = &'a RayTrace;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
