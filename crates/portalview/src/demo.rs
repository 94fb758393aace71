//! The hardcoded demo level.
//!
//! A 2000 x 2000 room holding four copies of the same cross-shaped pillar:
//! - the magic pillar, whose four notches open into a larger inner room;
//! - the shortcut pillar, whose opposite notches lead into each other;
//! - the rotating pillar, whose adjacent notches lead into each other;
//! - the infinite pillar, whose notches open into a small room that loops
//!   back onto itself.

use std::sync::Arc;

use crate::error::Result;
use crate::geom2::{Point, Polygon, Rectangle};
use crate::player::PlayerState;
use crate::portal::{SpaceId, World};
use crate::render::{Rgba, SolidColorRenderer};

pub const OUTSIDE_COLOR: Rgba = Rgba::rgb(0, 255, 0);
pub const INSIDE_PILLAR_COLOR: Rgba = Rgba::rgb(0, 0, 255);
pub const INFINITE_ROOM_COLOR: Rgba = Rgba::rgb(255, 200, 0);

/// Edges of the pillar outline that sit at the back of its four notches.
const NOTCH_EDGES: [usize; 4] = [2, 7, 12, 17];

/// A built level and where the player starts.
#[derive(Clone, Debug)]
pub struct Level {
    pub world: World,
    pub start: PlayerState,
    pub outside: SpaceId,
    pub inside_pillar: SpaceId,
    pub infinite_room: SpaceId,
}

fn solid(color: Rgba) -> Arc<SolidColorRenderer> {
    Arc::new(SolidColorRenderer::new(color))
}

/// Cross-shaped pillar outline with 100-wide notches, anchored at (250, 250).
pub fn pillar() -> Result<Polygon> {
    Polygon::builder()
        .point(250.0, 250.0)
        .line(100.0, 0.0)
        .line(0.0, 50.0)
        .line(100.0, 0.0)
        .line(0.0, -50.0)
        .line(100.0, 0.0)
        .line(0.0, 100.0)
        .line(-50.0, 0.0)
        .line(0.0, 100.0)
        .line(50.0, 0.0)
        .line(0.0, 100.0)
        .line(-100.0, 0.0)
        .line(0.0, -50.0)
        .line(-100.0, 0.0)
        .line(0.0, 50.0)
        .line(-100.0, 0.0)
        .line(0.0, -100.0)
        .line(50.0, 0.0)
        .line(0.0, -100.0)
        .line(-50.0, 0.0)
        .build()
}

/// The room behind the magic pillar's notches; its edges 2, 7, 12 and 17 are
/// the far sides of four 100-wide bays.
fn inner_room() -> Result<Polygon> {
    let corners = [
        (-500.0, -500.0),
        (-50.0, -500.0),
        (-50.0, -550.0),
        (50.0, -550.0),
        (50.0, -500.0),
        (500.0, -500.0),
        (500.0, -50.0),
        (550.0, -50.0),
        (550.0, 50.0),
        (500.0, 50.0),
        (500.0, 500.0),
        (50.0, 500.0),
        (50.0, 550.0),
        (-50.0, 550.0),
        (-50.0, 500.0),
        (-500.0, 500.0),
        (-500.0, 50.0),
        (-550.0, 50.0),
        (-550.0, -50.0),
        (-500.0, -50.0),
    ];
    corners
        .into_iter()
        .fold(Polygon::builder(), |b, (x, y)| b.point(x, y))
        .build()
}

/// Small room whose side bays lead into each other.
fn looping_room() -> Result<Polygon> {
    Polygon::builder()
        .point(0.0, 0.0)
        .line(50.0, 0.0)
        .line(100.0, 0.0)
        .line(50.0, 0.0)
        .line(0.0, 50.0)
        .line(25.0, 0.0)
        .line(0.0, 100.0)
        .line(-25.0, 0.0)
        .line(0.0, 50.0)
        .line(-50.0, 0.0)
        .line(-100.0, 0.0)
        .line(-50.0, 0.0)
        .line(0.0, -50.0)
        .line(-25.0, 0.0)
        .line(0.0, -100.0)
        .line(25.0, 0.0)
        .build()
}

/// Builds the demo level.
pub fn portal_level() -> Result<Level> {
    let mut world = World::new();
    let outside = world.add_space(
        Rectangle::new(Point::origin(), 2000.0, 2000.0)?.as_polygon(),
        solid(OUTSIDE_COLOR),
    )?;
    let pillar = pillar()?;

    let magic = world.add_obstacle(outside, pillar.clone())?;
    let inside_pillar = world.add_space(inner_room()?, solid(INSIDE_PILLAR_COLOR))?;
    let inner = world.space(inside_pillar).exterior().id();
    for i in NOTCH_EDGES {
        world.create_portal(magic.edge(i), inner.edge(i))?;
    }

    let shortcut = world.add_obstacle(outside, pillar.translate(-660.0, 0.0))?;
    world.create_flipped_portal(shortcut.edge(2), shortcut.edge(12))?;
    world.create_flipped_portal(shortcut.edge(7), shortcut.edge(17))?;

    let rotating = world.add_obstacle(outside, pillar.translate(0.0, -660.0))?;
    world.create_flipped_portal(rotating.edge(2), rotating.edge(7))?;
    world.create_flipped_portal(rotating.edge(12), rotating.edge(17))?;

    let infinite = world.add_obstacle(outside, pillar.translate(-660.0, -660.0))?;
    let infinite_room = world.add_space(looping_room()?, solid(INFINITE_ROOM_COLOR))?;
    let room = world.space(infinite_room).exterior().id();
    world.create_portal(infinite.edge(2), room.edge(1))?;
    world.create_portal(infinite.edge(12), room.edge(9))?;
    world.create_flipped_portal(room.edge(5), room.edge(13))?;

    Ok(Level {
        world,
        start: PlayerState::new(outside, Point::new(100.0, 100.0)),
        outside,
        inside_pillar,
        infinite_room,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom2::Vector;
    use crate::player::{MotionCfg, Player};
    use crate::trace::{build_radial_trace, TraceCfg};

    #[test]
    fn pillar_outline_closes() {
        let p = pillar().unwrap();
        assert_eq!(p.num_points(), 20);
        // The last step lands back on the anchor.
        let (a, b) = p.edge(19);
        assert_eq!(a, Point::new(250.0, 350.0));
        assert_eq!(b, Point::new(250.0, 250.0));
        let bounds = p.bounding_rect();
        assert_eq!((bounds.x1(), bounds.x2()), (250.0, 550.0));
        assert_eq!((bounds.y1(), bounds.y2()), (250.0, 550.0));
        assert_eq!(looping_room().unwrap().num_points(), 16);
    }

    #[test]
    fn level_wires_every_portal() {
        let level = portal_level().unwrap();
        let world = &level.world;
        assert_eq!(world.num_spaces(), 3);
        assert_eq!(world.space(level.outside).obstacles().len(), 4);
        // 4 + 2 + 2 + 3 portal pairs.
        assert_eq!(world.links().len(), 22);
        assert_eq!(world.portal_links(level.outside).count(), 4 + 4 + 4 + 2);
        assert_eq!(world.portal_links(level.inside_pillar).count(), 4);
        assert_eq!(world.portal_links(level.infinite_room).count(), 4);
        for link in world.links() {
            assert_eq!(world.link(link.reverse()).reverse(), link.id());
        }
        assert!(world.space(level.outside).contains(&level.start.position));
    }

    #[test]
    fn start_view_sees_into_the_pillars() {
        let level = portal_level().unwrap();
        let start = level.start;
        let trace =
            build_radial_trace(&level.world, start.space, start.position, &TraceCfg::default())
                .unwrap();
        assert!(trace.scope().contains(&start.position));
        assert!(!trace.children().is_empty());
        for node in &trace {
            let seen = node.to_view().apply(&node.origin());
            assert!((seen - start.position).norm() < 1e-6);
        }
    }

    #[test]
    fn walking_into_the_magic_pillar_enters_the_inner_room() {
        let level = portal_level().unwrap();
        // Straight up through the notch at the bottom of the magic pillar.
        let state = PlayerState::new(level.outside, Point::new(400.0, 200.0));
        let mut player = Player::new(state, MotionCfg::default());
        let crossed = player.move_by(&level.world, Vector::new(0.0, 200.0));
        assert!(crossed.is_some());
        let s = player.state();
        assert_eq!(s.space, level.inside_pillar);
        // 100 past the notch wall, i.e. 100 above the bottom bay wall of the inner room.
        assert!((s.position - Point::new(0.0, -450.0)).norm() < 1e-9, "{:?}", s.position);
        assert!(level.world.space(level.inside_pillar).contains(&s.position));
    }
}
