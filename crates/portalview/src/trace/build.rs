//! Recursive portal trace driven by an explicit worklist.

use std::collections::VecDeque;

use tracing::{debug, trace};

use super::sweep::{radial_sweep, Mark, Window};
use super::types::{RayTrace, RecursiveRayTrace, TraceCfg};
use crate::error::{Error, Result};
use crate::geom2::{Aff2, Line, LineSegment, Point, Polygon};
use crate::portal::{EdgeRef, LinkId, SpaceId, World};

/// A pending sweep: the root, or a sub-trace seen through a portal.
struct Job {
    space: SpaceId,
    origin: Point,
    window: Option<Window>,
    portal_edge: Option<EdgeRef>,
    depth: usize,
    to_view: Aff2,
    parent: Option<(usize, LinkId)>,
}

/// Computes the visibility tree of `origin` in `space`.
///
/// The root sweep's errors are returned. Sub-traces that fail are logged and
/// left out of the tree.
pub fn build_radial_trace(
    world: &World,
    space: SpaceId,
    origin: Point,
    cfg: &TraceCfg,
) -> Result<RayTrace> {
    if !(cfg.max_distance > 0.0) || !cfg.max_distance.is_finite() {
        return Err(Error::geometry(format!(
            "max_distance must be positive and finite: {}",
            cfg.max_distance
        )));
    }
    let max_distance_squared = cfg.max_distance * cfg.max_distance;

    let mut queue = VecDeque::new();
    queue.push_back(Job {
        space,
        origin,
        window: None,
        portal_edge: None,
        depth: 0,
        to_view: Aff2::identity(),
        parent: None,
    });

    // Completed nodes in breadth-first order; a child always follows its parent.
    let mut nodes: Vec<(RayTrace, Option<(usize, LinkId)>)> = Vec::new();
    while let Some(job) = queue.pop_front() {
        let marks = match trace_scope(world, &job) {
            Ok(marks) => marks,
            Err(err) if job.parent.is_none() => return Err(err),
            Err(err) => {
                debug!(space = job.space.0, depth = job.depth, %err, "dropped sub-trace");
                continue;
            }
        };
        let scope = match Polygon::new(marks.iter().map(|m| m.point).collect()) {
            Ok(scope) => scope,
            Err(err) if job.parent.is_none() => return Err(err),
            Err(err) => {
                debug!(space = job.space.0, depth = job.depth, %err, "dropped sub-trace");
                continue;
            }
        };
        trace!(
            space = job.space.0,
            depth = job.depth,
            points = scope.num_points(),
            "swept"
        );

        let index = nodes.len();
        for (a, b, link) in portal_hand_offs(&marks) {
            let segment = match LineSegment::new(a, b) {
                Ok(s) => s,
                Err(_) => continue,
            };
            if segment.distance_squared_to(&job.origin) > max_distance_squared {
                continue;
            }
            if job.depth >= cfg.max_depth {
                debug!(depth = job.depth, link = link.0, "depth ceiling reached");
                continue;
            }
            let portal = world.link(link);
            let tx = portal.transform();
            let child_origin = tx.apply(&job.origin);
            let window = match LineSegment::new(tx.apply(&a), tx.apply(&b)) {
                Ok(s) => Window::new(&child_origin, s),
                Err(err) => {
                    debug!(link = link.0, %err, "degenerate portal window");
                    continue;
                }
            };
            queue.push_back(Job {
                space: portal.dest_space(),
                origin: child_origin,
                window: Some(window),
                portal_edge: Some(portal.destination()),
                depth: job.depth + 1,
                to_view: job.to_view.compose(portal.inverse_transform()),
                parent: Some((index, link)),
            });
        }

        nodes.push((
            RayTrace {
                space: job.space,
                origin: job.origin,
                scope,
                depth: job.depth,
                to_view: job.to_view,
                children: Vec::new(),
            },
            job.parent,
        ));
    }

    assemble(nodes)
}

fn trace_scope(world: &World, job: &Job) -> Result<Vec<Mark>> {
    let marks = radial_sweep(
        world,
        job.space,
        job.origin,
        job.window.as_ref(),
        job.portal_edge,
    )?;
    Ok(dedup_marks(marks))
}

/// Collapses runs of coincident points (the wrap-around and hand-off points
/// repeat), merging their link tags.
fn dedup_marks(marks: Vec<Mark>) -> Vec<Mark> {
    let mut out: Vec<Mark> = Vec::with_capacity(marks.len());
    for m in marks {
        match out.last_mut() {
            Some(last) if Line::too_close(&last.point, &m.point) => last.absorb(m),
            _ => out.push(m),
        }
    }
    if out.len() > 1 && Line::too_close(&out[0].point, &out[out.len() - 1].point) {
        if let Some(last) = out.pop() {
            out[0].absorb(last);
        }
    }
    out
}

/// Consecutive scope points (including the closing pair) that lie on the same
/// portal, with that portal's link.
fn portal_hand_offs(marks: &[Mark]) -> Vec<(Point, Point, LinkId)> {
    let n = marks.len();
    (0..n)
        .filter_map(|i| {
            let (a, b) = (&marks[i], &marks[(i + 1) % n]);
            if n < 2 || Line::too_close(&a.point, &b.point) {
                return None;
            }
            a.shared_link(b).map(|link| (a.point, b.point, link))
        })
        .collect()
}

/// Folds the breadth-first node list into a tree, keeping child order.
fn assemble(nodes: Vec<(RayTrace, Option<(usize, LinkId)>)>) -> Result<RayTrace> {
    let mut slots: Vec<Option<RayTrace>> = Vec::with_capacity(nodes.len());
    let mut parents = Vec::with_capacity(nodes.len());
    for (node, parent) in nodes {
        slots.push(Some(node));
        parents.push(parent);
    }
    // Children are attached last-first, so each child list is reversed once
    // the node itself is complete.
    for i in (1..slots.len()).rev() {
        let (Some(mut child), Some((p, link))) = (slots[i].take(), parents[i]) else {
            continue;
        };
        child.children.reverse();
        if let Some(parent) = slots[p].as_mut() {
            parent.children.push(RecursiveRayTrace { link, trace: child });
        }
    }
    let mut root = slots
        .first_mut()
        .and_then(Option::take)
        .ok_or_else(|| Error::geometry("empty trace"))?;
    root.children.reverse();
    Ok(root)
}
