//! Renderer capability and the trace traversal that drives it.
//!
//! The library never paints pixels itself. A `Surface` is whatever the host
//! draws on (clip and transform stacks plus fills); a `Renderer` paints one
//! space's background into a region of it. `DisplayList` is an in-memory
//! surface that records fills in view coordinates.

use std::fmt;

use tracing::warn;

use crate::error::Result;
use crate::geom2::{Aff2, Circle, Point, Polygon, Rectangle, Vector};
use crate::player::PlayerState;
use crate::portal::World;
use crate::trace::{build_radial_trace, RayTrace, TraceCfg};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Drawing target with nested clip and transform stacks.
pub trait Surface {
    /// Intersects the current clip with `region` (current coordinates).
    fn push_clip(&mut self, region: &Polygon);
    fn pop_clip(&mut self);
    /// Pre-multiplies `tx` onto the current transform: later geometry is mapped
    /// by `tx` first.
    fn push_transform(&mut self, tx: &Aff2);
    fn pop_transform(&mut self);
    fn fill_rect(&mut self, rect: &Rectangle, color: Rgba);
    fn fill_circle(&mut self, circle: &Circle, color: Rgba);
}

/// Paints one space's background.
pub trait Renderer: fmt::Debug + Send + Sync {
    fn render(&self, surface: &mut dyn Surface, region: &Rectangle);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolidColorRenderer {
    pub color: Rgba,
}

impl SolidColorRenderer {
    pub fn new(color: Rgba) -> Self {
        Self { color }
    }
}

impl Renderer for SolidColorRenderer {
    fn render(&self, surface: &mut dyn Surface, region: &Rectangle) {
        surface.fill_rect(region, self.color);
    }
}

/// View settings for `render_view`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewCfg {
    pub width: f64,
    pub height: f64,
    pub marker_radius: f64,
    pub marker_color: Rgba,
    pub trace: TraceCfg,
}

impl Default for ViewCfg {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
            marker_radius: 10.0,
            marker_color: Rgba::rgb(255, 0, 0),
            trace: TraceCfg::default(),
        }
    }
}

/// Calls `visit` on every node, with the surface transformed into that node's
/// space.
pub fn walk_trace<F>(surface: &mut dyn Surface, trace: &RayTrace, mut visit: F)
where
    F: FnMut(&mut dyn Surface, &RayTrace),
{
    for node in trace {
        surface.push_transform(node.to_view());
        visit(&mut *surface, node);
        surface.pop_transform();
    }
}

/// Fills every scope of the tree with its space's background.
pub fn render_trace(surface: &mut dyn Surface, world: &World, trace: &RayTrace) {
    walk_trace(surface, trace, |s, node| {
        s.push_clip(node.scope());
        world
            .space(node.space())
            .renderer()
            .render(s, node.scope().bounding_rect());
        s.pop_clip();
    });
}

/// Screen transform: the player at the view center, camera direction up.
pub fn view_transform(state: &PlayerState, cfg: &ViewCfg) -> Aff2 {
    let center = Vector::new(cfg.width / 2.0, cfg.height / 2.0);
    Aff2::translation(center - state.position.coords)
        .compose(&Aff2::rotation_about(state.position, -state.camera))
}

/// Renders what the player sees: backgrounds, then the player marker wherever
/// the player's own space shows the player.
///
/// If the root trace fails, the player's space is drawn clipped to its exterior
/// boundary without any portal view, and `Ok(None)` is returned.
pub fn render_view(
    surface: &mut dyn Surface,
    world: &World,
    state: &PlayerState,
    cfg: &ViewCfg,
) -> Result<Option<RayTrace>> {
    surface.push_transform(&view_transform(state, cfg));
    let outcome = match build_radial_trace(world, state.space, state.position, &cfg.trace) {
        Ok(trace) => {
            render_trace(surface, world, &trace);
            let marker = Circle::new(state.position, cfg.marker_radius)?;
            walk_trace(surface, &trace, |s, node| {
                if node.space() == state.space && node.scope().contains(&state.position) {
                    s.fill_circle(&marker, cfg.marker_color);
                }
            });
            Some(trace)
        }
        Err(err) => {
            warn!(%err, "visibility trace failed; drawing without portals");
            let space = world.space(state.space);
            let region = Rectangle::new(state.position, cfg.width, cfg.height)?;
            surface.push_clip(space.exterior_polygon());
            space.renderer().render(surface, &region);
            surface.pop_clip();
            None
        }
    };
    surface.pop_transform();
    Ok(outcome)
}

/// One recorded fill, in view coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum DisplayOp {
    Rect {
        /// The rectangle's corners after the active transform.
        corners: [Point; 4],
        color: Rgba,
        /// Active clip regions, outermost first.
        clips: Vec<Polygon>,
    },
    Circle {
        center: Point,
        radius: f64,
        color: Rgba,
        clips: Vec<Polygon>,
    },
}

/// Recording surface.
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    transforms: Vec<Aff2>,
    clips: Vec<Polygon>,
    ops: Vec<DisplayOp>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DisplayOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DisplayOp> {
        self.ops
    }

    fn current(&self) -> Aff2 {
        self.transforms.last().copied().unwrap_or_default()
    }
}

impl Surface for DisplayList {
    fn push_clip(&mut self, region: &Polygon) {
        self.clips.push(region.transform(&self.current()));
    }

    fn pop_clip(&mut self) {
        self.clips.pop();
    }

    fn push_transform(&mut self, tx: &Aff2) {
        let next = self.current().compose(tx);
        self.transforms.push(next);
    }

    fn pop_transform(&mut self) {
        self.transforms.pop();
    }

    fn fill_rect(&mut self, rect: &Rectangle, color: Rgba) {
        let tx = self.current();
        self.ops.push(DisplayOp::Rect {
            corners: rect.corners().map(|p| tx.apply(&p)),
            color,
            clips: self.clips.clone(),
        });
    }

    fn fill_circle(&mut self, circle: &Circle, color: Rgba) {
        self.ops.push(DisplayOp::Circle {
            center: self.current().apply(&circle.center()),
            radius: circle.radius(),
            color,
            clips: self.clips.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom2::Angle;
    use std::f64::consts::FRAC_PI_2;
    use std::sync::Arc;

    const GREEN: Rgba = Rgba::rgb(0, 255, 0);
    const BLUE: Rgba = Rgba::rgb(0, 0, 255);

    fn square(center: Point, side: f64) -> Polygon {
        Rectangle::new(center, side, side).unwrap().as_polygon()
    }

    fn portal_pair() -> (World, PlayerState) {
        let mut world = World::new();
        let a = world
            .add_space(
                square(Point::origin(), 400.0),
                Arc::new(SolidColorRenderer::new(GREEN)),
            )
            .unwrap();
        let b = world
            .add_space(
                square(Point::new(5000.0, 0.0), 400.0),
                Arc::new(SolidColorRenderer::new(BLUE)),
            )
            .unwrap();
        let ext_a = world.space(a).exterior().id();
        let ext_b = world.space(b).exterior().id();
        world
            .create_flipped_portal(ext_a.edge(1), ext_b.edge(3))
            .unwrap();
        let state = PlayerState::new(a, Point::origin());
        (world, state)
    }

    fn colors(list: &DisplayList) -> Vec<Rgba> {
        list.ops()
            .iter()
            .map(|op| match op {
                DisplayOp::Rect { color, .. } | DisplayOp::Circle { color, .. } => *color,
            })
            .collect()
    }

    #[test]
    fn view_fills_each_scope_then_marker() {
        let (world, state) = portal_pair();
        let mut list = DisplayList::new();
        let trace = render_view(&mut list, &world, &state, &ViewCfg::default())
            .unwrap()
            .unwrap();
        assert_eq!(trace.node_count(), 2);
        assert_eq!(colors(&list), vec![GREEN, BLUE, Rgba::rgb(255, 0, 0)]);
        // The marker lands at the view center.
        let DisplayOp::Circle { center, clips, .. } = &list.ops()[2] else {
            panic!("expected marker");
        };
        assert!((center.x - 512.0).abs() < 1e-9 && (center.y - 384.0).abs() < 1e-9);
        assert!(clips.is_empty());
    }

    #[test]
    fn sub_trace_fill_is_clipped_in_view_coordinates() {
        let (world, state) = portal_pair();
        let mut list = DisplayList::new();
        let cfg = ViewCfg {
            width: 400.0,
            height: 400.0,
            ..ViewCfg::default()
        };
        render_view(&mut list, &world, &state, &cfg).unwrap();
        let DisplayOp::Rect { clips, .. } = &list.ops()[1] else {
            panic!("expected fill");
        };
        assert_eq!(clips.len(), 1);
        // Room B shows up just beyond room A's top edge (y = 200 maps to 400 on
        // screen): the clip sits between screen y 400 and 800.
        let bounds = clips[0].bounding_rect();
        assert!((bounds.y1() - 400.0).abs() < 1e-6, "{bounds:?}");
        assert!((bounds.y2() - 800.0).abs() < 1e-6, "{bounds:?}");
    }

    #[test]
    fn failed_trace_falls_back_to_flat_fill() {
        let (world, state) = portal_pair();
        let mut list = DisplayList::new();
        let cfg = ViewCfg {
            trace: TraceCfg {
                max_distance: -1.0,
                ..TraceCfg::default()
            },
            ..ViewCfg::default()
        };
        let out = render_view(&mut list, &world, &state, &cfg).unwrap();
        assert!(out.is_none());
        assert_eq!(colors(&list), vec![GREEN]);
        let DisplayOp::Rect { clips, .. } = &list.ops()[0] else {
            panic!("expected fill");
        };
        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].num_points(), 4);
    }

    #[test]
    fn display_list_composes_transforms() {
        let mut list = DisplayList::new();
        list.push_transform(&Aff2::translation(Vector::new(10.0, 0.0)));
        list.push_transform(&Aff2::rotation_about(
            Point::origin(),
            Angle::from_radians(FRAC_PI_2),
        ));
        list.fill_circle(&Circle::new(Point::new(1.0, 0.0), 1.0).unwrap(), BLUE);
        list.pop_transform();
        list.fill_circle(&Circle::new(Point::new(1.0, 0.0), 1.0).unwrap(), BLUE);
        let centers: Vec<Point> = list
            .ops()
            .iter()
            .filter_map(|op| match op {
                DisplayOp::Circle { center, .. } => Some(*center),
                _ => None,
            })
            .collect();
        assert!((centers[0] - Point::new(10.0, 1.0)).norm() < 1e-12);
        assert!((centers[1] - Point::new(11.0, 0.0)).norm() < 1e-12);
    }
}
