//! Player movement across portals.
//!
//! A tick moves the player along a straight displacement. If that displacement
//! crosses a portal, the end point is carried through the portal transform, the
//! player switches to the destination space and the camera turns by the
//! portal's rotation. At most one portal is crossed per tick.

use std::f64::consts::PI;

use tracing::debug;

use crate::geom2::cfg::MIN_DELTA_SQUARED;
use crate::geom2::{Angle, LineSegment, Point, RadialVector, Vector};
use crate::portal::{LinkId, SpaceId, World};

/// Where the player is and where it looks. Always replaced as a whole, so a
/// reader never sees a position from one space paired with another space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerState {
    pub space: SpaceId,
    pub position: Point,
    pub camera: Angle,
}

impl PlayerState {
    pub fn new(space: SpaceId, position: Point) -> Self {
        Self {
            space,
            position,
            camera: Angle::ZERO,
        }
    }
}

/// Movement tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionCfg {
    /// Distance per tick.
    pub movement_speed: f64,
    /// Camera turn per tick, radians.
    pub rotation_speed: f64,
    /// Push off the destination edge after landing exactly on it.
    pub nudge: f64,
}

impl Default for MotionCfg {
    fn default() -> Self {
        Self {
            movement_speed: 2.0,
            rotation_speed: PI / 60.0,
            nudge: 0.001,
        }
    }
}

/// Per-frame held controls. Screen convention: `down` is +y.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Intent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub camera_left: bool,
    pub camera_right: bool,
}

/// Aggregated input for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickInput {
    /// Displacement in world coordinates.
    pub movement: Vector,
    pub camera_delta: Angle,
}

impl Intent {
    /// Unit-speed direction sum, rotated into the camera frame.
    pub fn to_input(&self, camera: Angle, cfg: &MotionCfg) -> TickInput {
        let mut dir = Vector::zeros();
        if self.down {
            dir.y += 1.0;
        }
        if self.up {
            dir.y -= 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        let movement = match dir.try_normalize(f64::EPSILON) {
            Some(unit) => RadialVector::from_vector(&(unit * cfg.movement_speed))
                .rotate(camera)
                .to_vector(),
            None => Vector::zeros(),
        };

        let mut turn = 0.0;
        if self.camera_left {
            turn -= cfg.rotation_speed;
        }
        if self.camera_right {
            turn += cfg.rotation_speed;
        }
        TickInput {
            movement,
            camera_delta: Angle::from_radians(turn),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    state: PlayerState,
    cfg: MotionCfg,
}

impl Player {
    pub fn new(state: PlayerState, cfg: MotionCfg) -> Self {
        Self { state, cfg }
    }

    /// Snapshot of the current state.
    #[inline]
    pub fn state(&self) -> PlayerState {
        self.state
    }

    #[inline]
    pub fn cfg(&self) -> &MotionCfg {
        &self.cfg
    }

    /// Moves by `movement`; returns the link crossed, if any.
    pub fn move_by(&mut self, world: &World, movement: Vector) -> Option<LinkId> {
        let (next, crossed) = step(world, &self.state, movement, self.cfg.nudge);
        self.state = next;
        crossed
    }

    pub fn rotate_camera(&mut self, by: Angle) {
        self.state.camera = self.state.camera + by;
    }

    /// Moves, then turns the camera.
    pub fn tick(&mut self, world: &World, input: TickInput) -> Option<LinkId> {
        let crossed = self.move_by(world, input.movement);
        self.rotate_camera(input.camera_delta);
        crossed
    }

    pub fn apply_intent(&mut self, world: &World, intent: &Intent) -> Option<LinkId> {
        let input = intent.to_input(self.state.camera, &self.cfg);
        self.tick(world, input)
    }
}

/// Pure movement step: the state after moving by `movement`, and the link
/// crossed on the way.
pub fn step(
    world: &World,
    state: &PlayerState,
    movement: Vector,
    nudge: f64,
) -> (PlayerState, Option<LinkId>) {
    let target = state.position + movement;
    // Too short to form a segment: it cannot cross anything.
    let crossing = LineSegment::new(state.position, target)
        .ok()
        .and_then(|travel| world.intersecting_portal_link(state.space, &travel));

    let Some(id) = crossing else {
        return (
            PlayerState {
                position: target,
                ..*state
            },
            None,
        );
    };

    let link = world.link(id);
    let mut position = link.transform().apply(&target);
    if link.dst_segment().line().distance_squared(&position) < MIN_DELTA_SQUARED {
        let heading = RadialVector::from_vector(&movement).angle() + link.rotation();
        position += RadialVector::unit(heading).to_vector() * nudge;
    }
    debug!(
        link = id.0,
        from = state.space.0,
        to = link.dest_space().0,
        "crossed portal"
    );
    (
        PlayerState {
            space: link.dest_space(),
            position,
            camera: state.camera + link.rotation(),
        },
        Some(id),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom2::{Polygon, Rectangle};
    use crate::render::{Rgba, SolidColorRenderer};
    use std::f64::consts::FRAC_PI_2;
    use std::sync::Arc;

    fn room(world: &mut World, center: Point) -> SpaceId {
        let exterior: Polygon = Rectangle::new(center, 400.0, 400.0).unwrap().as_polygon();
        let renderer = Arc::new(SolidColorRenderer::new(Rgba::rgb(0, 0, 0)));
        world.add_space(exterior, renderer).unwrap()
    }

    fn player_at(space: SpaceId, position: Point) -> Player {
        Player::new(PlayerState::new(space, position), MotionCfg::default())
    }

    /// Room A's top edge leads into room B through B's left wall.
    fn turning_pair() -> (World, SpaceId, SpaceId, LinkId) {
        let mut world = World::new();
        let a = room(&mut world, Point::origin());
        let b = room(&mut world, Point::new(5000.0, 0.0));
        let ea = world.space(a).exterior().id();
        let eb = world.space(b).exterior().id();
        let (ab, _) = world.create_flipped_portal(ea.edge(1), eb.edge(0)).unwrap();
        (world, a, b, ab)
    }

    #[test]
    fn midpoint_crossing_lands_nudged_and_turns_camera() {
        let (world, a, b, ab) = turning_pair();
        let rotation = world.link(ab).rotation();
        assert!((rotation.radians() - 3.0 * FRAC_PI_2).abs() < 1e-12);

        let mut player = player_at(a, Point::new(0.0, 100.0));
        let crossed = player.move_by(&world, Vector::new(0.0, 100.0));
        assert_eq!(crossed, Some(ab));

        let s = player.state();
        assert_eq!(s.space, b);
        let mid = world.link(ab).dst_segment().midpoint();
        assert!((mid - Point::new(4800.0, 0.0)).norm() < 1e-9);
        let expected = Point::new(4800.001, 0.0);
        assert!((s.position - expected).norm() < 1e-9, "{:?}", s.position);
        assert!((s.camera.radians() - rotation.radians()).abs() < 1e-12);
    }

    #[test]
    fn crossing_off_the_edge_line_is_not_nudged() {
        let (world, a, b, ab) = turning_pair();
        let start = PlayerState::new(a, Point::new(50.0, 150.0));
        let (next, crossed) = step(&world, &start, Vector::new(0.0, 100.0), 0.001);
        assert_eq!(crossed, Some(ab));
        assert_eq!(next.space, b);
        // (50, 250) is 50 past the top edge and 50 right of its midpoint.
        let expected = Point::new(4850.0, -50.0);
        assert!((next.position - expected).norm() < 1e-9, "{:?}", next.position);
    }

    #[test]
    fn round_trip_returns_to_start_space() {
        let (world, a, _, _) = turning_pair();
        let mut player = player_at(a, Point::new(0.0, 190.0));
        player.move_by(&world, Vector::new(0.0, 20.0));
        let there = player.state();
        // Walking back along the rotated heading re-enters room A.
        player.move_by(&world, Vector::new(-20.0, 0.0));
        let s = player.state();
        assert_ne!(there.space, s.space);
        assert_eq!(s.space, a);
        assert!((s.position - Point::new(0.0, 190.0)).norm() < 1e-9, "{:?}", s.position);
        let camera = s.camera.radians();
        assert!(camera.abs() < 1e-9 || (camera - 2.0 * PI).abs() < 1e-9);
    }

    #[test]
    fn plain_move_without_portal() {
        let (world, a, _, _) = turning_pair();
        let mut player = player_at(a, Point::new(0.0, 0.0));
        assert_eq!(player.move_by(&world, Vector::new(10.0, -5.0)), None);
        assert_eq!(player.state().position, Point::new(10.0, -5.0));
        // Zero movement is a no-op.
        assert_eq!(player.move_by(&world, Vector::zeros()), None);
        assert_eq!(player.state().position, Point::new(10.0, -5.0));
    }

    #[test]
    fn intents_fold_into_tick_input() {
        let cfg = MotionCfg::default();
        let down = Intent {
            down: true,
            ..Intent::default()
        };
        let input = down.to_input(Angle::ZERO, &cfg);
        assert!((input.movement - Vector::new(0.0, 2.0)).norm() < 1e-12);
        assert_eq!(input.camera_delta, Angle::ZERO);

        let diagonal = Intent {
            down: true,
            right: true,
            camera_right: true,
            ..Intent::default()
        };
        let input = diagonal.to_input(Angle::ZERO, &cfg);
        assert!((input.movement.norm() - 2.0).abs() < 1e-12);
        assert!((input.movement.x - input.movement.y).abs() < 1e-12);
        assert!((input.camera_delta.radians() - PI / 60.0).abs() < 1e-12);

        // Opposite keys cancel; the camera frame rotates the rest.
        let turned = Intent {
            up: true,
            down: true,
            right: true,
            ..Intent::default()
        }
        .to_input(Angle::from_radians(FRAC_PI_2), &cfg);
        assert!((turned.movement - Vector::new(0.0, 2.0)).norm() < 1e-12);
        let idle = Intent::default().to_input(Angle::ZERO, &cfg);
        assert_eq!(idle.movement, Vector::zeros());
    }

    #[test]
    fn tick_moves_then_turns() {
        let (world, a, _, _) = turning_pair();
        let mut player = player_at(a, Point::origin());
        let intent = Intent {
            left: true,
            camera_left: true,
            ..Intent::default()
        };
        player.apply_intent(&world, &intent);
        let s = player.state();
        assert!((s.position - Point::new(-2.0, 0.0)).norm() < 1e-12);
        assert!((s.camera.radians() - (2.0 * PI - PI / 60.0)).abs() < 1e-12);
    }
}
