use super::*;
use crate::error::Error;
use proptest::prelude::*;
use std::cmp::Ordering;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

fn assert_point(p: Point, x: f64, y: f64) {
    assert!((p.x - x).abs() < 1e-4, "x: {} vs {}", p.x, x);
    assert!((p.y - y).abs() < 1e-4, "y: {} vs {}", p.y, y);
}

fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Line {
    Line::from_points(&Point::new(x1, y1), &Point::new(x2, y2)).unwrap()
}

#[test]
fn axis_lines_meet_at_origin() {
    let x_axis = line(0.0, 0.0, 10.0, 0.0);
    let y_axis = line(0.0, 0.0, 0.0, 10.0);
    assert_point(Line::intersection(&x_axis, &y_axis).unwrap(), 0.0, 0.0);
}

#[test]
fn diagonals_through_origin() {
    let up = line(0.0, 0.0, 1.0, 1.0);
    let down = line(0.0, 0.0, 1.0, -1.0);
    assert_point(Line::intersection(&up, &down).unwrap(), 0.0, 0.0);
}

#[test]
fn equilateral_apex() {
    let left = line(-1.0, 0.0, -0.5, 1.0);
    let right = line(1.0, 0.0, 0.5, 1.0);
    assert_point(Line::intersection(&left, &right).unwrap(), 0.0, 2.0);
}

#[test]
fn slanted_line_crosses_horizontal() {
    let five = line(0.0, 5.0, 10.0, 5.0);
    let up = line(1.0, 0.0, 2.0, 1.0);
    assert_point(Line::intersection(&five, &up).unwrap(), 6.0, 5.0);
}

#[test]
fn parallel_lines_have_no_intersection() {
    let a = line(0.0, 0.0, 10.0, 10.0);
    let b = line(0.0, 1.0, 10.0, 11.0);
    assert!(Line::intersection(&a, &b).is_none());
    let v1 = line(3.0, 0.0, 3.0, 10.0);
    let v2 = line(4.0, 0.0, 4.0, 10.0);
    assert!(Line::intersection(&v1, &v2).is_none());
}

#[test]
fn coincident_points_are_invalid_geometry() {
    let p = Point::new(5.0, 5.0);
    let q = Point::new(5.0, 5.0 + 1e-9);
    assert!(matches!(
        Line::from_points(&p, &q),
        Err(Error::InvalidGeometry(_))
    ));
    assert!(LineSegment::new(p, q).is_err());
}

#[test]
fn perpendicular_distance() {
    let l = line(0.0, 0.0, 10.0, 10.0);
    let d2 = l.distance_squared(&Point::new(0.0, 2.0));
    assert!((d2 - 2.0).abs() < 1e-9);
    let horizontal = line(-5.0, 3.0, 5.0, 3.0);
    assert!((horizontal.distance_squared(&Point::new(100.0, 7.0)) - 16.0).abs() < 1e-9);
}

#[test]
fn segment_intersection_respects_bounds() {
    let s1 = LineSegment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).unwrap();
    let s2 = LineSegment::new(Point::new(5.0, -5.0), Point::new(5.0, 5.0)).unwrap();
    let s3 = LineSegment::new(Point::new(15.0, -5.0), Point::new(15.0, 5.0)).unwrap();
    assert_point(LineSegment::intersection(&s1, &s2).unwrap(), 5.0, 0.0);
    assert!(LineSegment::intersection(&s1, &s3).is_none());
    // Touching at an endpoint counts.
    let s4 = LineSegment::new(Point::new(10.0, 0.0), Point::new(10.0, 8.0)).unwrap();
    assert!(LineSegment::intersection(&s1, &s4).is_some());
}

#[test]
fn axis_aligned_containment_has_slack() {
    let s = LineSegment::new(Point::new(0.0, 1.0), Point::new(0.0, 9.0)).unwrap();
    assert!(s.contains_line_point(&Point::new(5e-8, 4.0)));
    assert!(!s.contains_line_point(&Point::new(1e-6, 4.0)));
    assert!(!s.contains_line_point(&Point::new(0.0, 9.001)));
}

#[test]
fn segment_point_distance_clamps_to_endpoints() {
    let s = LineSegment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).unwrap();
    assert!((s.distance_squared_to(&Point::new(5.0, 3.0)) - 9.0).abs() < 1e-12);
    assert!((s.distance_squared_to(&Point::new(13.0, 4.0)) - 25.0).abs() < 1e-12);
    assert_point(s.midpoint(), 5.0, 0.0);
    assert_eq!(s.reversed().p1(), s.p2());
}

#[test]
fn angle_wraps_into_canonical_range() {
    assert!((Angle::from_radians(-FRAC_PI_2).radians() - 3.0 * FRAC_PI_2).abs() < 1e-12);
    assert_eq!(Angle::from_radians(TAU).radians(), 0.0);
    assert_eq!(Angle::from_radians(-1e-18).radians(), 0.0);
    let sum = Angle::from_radians(1.5 * PI) + Angle::from_radians(PI);
    assert!((sum.radians() - FRAC_PI_2).abs() < 1e-12);
}

#[test]
fn counter_clockwise_helpers() {
    let a = Angle::from_radians(0.5);
    let b = Angle::from_radians(6.0);
    // From b, travelling counter-clockwise past 0 to reach a.
    let diff = Angle::counter_clockwise_diff(a, b);
    assert!((diff.radians() - (0.5 + TAU - 6.0)).abs() < 1e-12);
    let mid = Angle::counter_clockwise_midpoint(b, a);
    let expected = Angle::from_radians(6.0 + (0.5 + TAU - 6.0) / 2.0);
    assert!((mid.radians() - expected.radians()).abs() < 1e-12);
    assert!((Angle::acute_diff(a, b).radians() - (0.5 + TAU - 6.0)).abs() < 1e-12);
}

#[test]
fn range_construction_swaps_reflex_arcs() {
    let r = AngleRange::acute_counter_clockwise(Angle::from_radians(2.0), Angle::from_radians(1.0));
    assert_eq!(r.start().radians(), 1.0);
    assert_eq!(r.end().radians(), 2.0);
    assert!(r.contains(Angle::from_radians(1.5)));
    assert!(r.contains(Angle::from_radians(1.0)));
    assert!(!r.contains(Angle::from_radians(2.0)));
    assert!(!r.contains(Angle::from_radians(4.0)));
}

#[test]
fn raycast_order_is_far_first_on_ties() {
    let near = RadialVector::new(Angle::from_radians(1.0), 2.0).unwrap();
    let far = RadialVector::new(Angle::from_radians(1.0), 5.0).unwrap();
    let later = RadialVector::new(Angle::from_radians(1.2), 1.0).unwrap();
    let mut v = vec![later, near, far];
    v.sort_by(|a, b| {
        RadialVector::raycast_cmp(a, b, |x, y| {
            x.radians()
                .partial_cmp(&y.radians())
                .unwrap_or(Ordering::Equal)
        })
    });
    assert_eq!(v, vec![far, near, later]);
}

#[test]
fn radial_vector_rejects_bad_magnitudes() {
    assert!(RadialVector::new(Angle::ZERO, 0.0).is_err());
    assert!(RadialVector::from_squared(Angle::ZERO, -1.0).is_err());
    let v = RadialVector::from_vector(&Vector::new(0.0, -3.0));
    assert!((v.angle().radians() - 3.0 * FRAC_PI_2).abs() < 1e-12);
    assert!((v.magnitude() - 3.0).abs() < 1e-12);
    let back = v.to_vector();
    assert!((back - Vector::new(0.0, -3.0)).norm() < 1e-12);
}

#[test]
fn polygon_requires_three_points() {
    let err = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
    assert!(matches!(err, Err(Error::InvalidGeometry(_))));
}

#[test]
fn builder_relative_steps_and_bounds() {
    let p = Polygon::builder()
        .point(10.0, 10.0)
        .line(20.0, 0.0)
        .line(0.0, 40.0)
        .line(-20.0, 0.0)
        .build()
        .unwrap();
    assert_eq!(p.num_points(), 4);
    assert_point(p.point(2), 30.0, 50.0);
    let r = p.bounding_rect();
    assert_point(r.center(), 20.0, 30.0);
    assert!((r.width() - 20.0).abs() < 1e-12 && (r.height() - 40.0).abs() < 1e-12);
    assert!((p.signed_area() - 800.0).abs() < 1e-9);
    let (a, b) = p.edge(3);
    assert_point(a, 10.0, 50.0);
    assert_point(b, 10.0, 10.0);
}

#[test]
fn polygon_containment_and_transform() {
    let square = Rectangle::new(Point::origin(), 10.0, 10.0)
        .unwrap()
        .as_polygon();
    assert!(square.contains(&Point::new(1.0, 1.0)));
    assert!(!square.contains(&Point::new(6.0, 0.0)));
    let moved = square.translate(100.0, 0.0);
    assert!(moved.contains(&Point::new(101.0, 1.0)));
    assert_point(moved.bounding_rect().center(), 100.0, 0.0);
}

#[test]
fn rectangle_and_circle_validation() {
    assert!(Rectangle::new(Point::origin(), 0.0, 1.0).is_err());
    assert!(Rectangle::new(Point::origin(), 1.0, -1.0).is_err());
    assert!(Circle::new(Point::origin(), 0.0).is_err());
    let c = Circle::new(Point::new(1.0, 1.0), 2.0).unwrap();
    let hexagon = c.as_polygon(6).unwrap();
    assert_eq!(hexagon.num_points(), 6);
    assert_point(hexagon.point(0), 3.0, 1.0);
    assert!(c.as_polygon(2).is_err());
}

#[test]
fn affine_rotation_about_center() {
    let tx = Aff2::rotation_about(Point::new(1.0, 0.0), Angle::from_radians(FRAC_PI_2));
    assert_point(tx.apply(&Point::new(2.0, 0.0)), 1.0, 1.0);
    let inv = tx.inverse().unwrap();
    assert_point(inv.apply(&Point::new(1.0, 1.0)), 2.0, 0.0);
    let composed = tx.compose(&inv);
    assert_point(composed.apply(&Point::new(7.0, -3.0)), 7.0, -3.0);
}

proptest! {
    #[test]
    fn intersection_lies_on_both_lines(
        x1 in -1000.0..1000.0f64, y1 in -1000.0..1000.0f64,
        t1 in 0.0..TAU, t2 in 0.0..TAU,
        x2 in -1000.0..1000.0f64, y2 in -1000.0..1000.0f64,
    ) {
        // Keep the pair comfortably away from parallel.
        prop_assume!((t1 - t2).sin().abs() > 0.1);
        let p1 = Point::new(x1, y1);
        let p2 = Point::new(x2, y2);
        let l1 = Line::from_points(&p1, &(p1 + Vector::new(t1.cos(), t1.sin()) * 50.0)).unwrap();
        let l2 = Line::from_points(&p2, &(p2 + Vector::new(t2.cos(), t2.sin()) * 50.0)).unwrap();
        let hit = Line::intersection(&l1, &l2);
        prop_assert!(hit.is_some());
        let hit = hit.unwrap();
        prop_assert!(l1.distance_squared(&hit) < 1e-6);
        prop_assert!(l2.distance_squared(&hit) < 1e-6);
    }

    #[test]
    fn angles_stay_canonical(a in -1e6..1e6f64, b in -1e6..1e6f64) {
        let (x, y) = (Angle::from_radians(a), Angle::from_radians(b));
        for v in [x, y, x + y, Angle::counter_clockwise_diff(x, y), Angle::acute_diff(x, y)] {
            prop_assert!(v.radians() >= 0.0 && v.radians() < TAU);
        }
    }

    #[test]
    fn acute_range_orders_and_contains(start in 0.0..TAU, width in 0.01..(PI - 0.01)) {
        let a1 = Angle::from_radians(start);
        let a2 = Angle::from_radians(start + width);
        let range = AngleRange::acute_counter_clockwise(a1, a2);
        prop_assert_eq!(range.compare(a1, a2), Ordering::Less);
        let mid = Angle::counter_clockwise_midpoint(a1, a2);
        prop_assert!(range.contains(mid));
        prop_assert!(!range.contains(mid + Angle::from_radians(PI)));
    }

    #[test]
    fn rigid_maps_invert(
        cx in -500.0..500.0f64, cy in -500.0..500.0f64, theta in 0.0..TAU,
        tx in -500.0..500.0f64, ty in -500.0..500.0f64,
        px in -1000.0..1000.0f64, py in -1000.0..1000.0f64,
    ) {
        let map = Aff2::translation(Vector::new(tx, ty))
            .compose(&Aff2::rotation_about(Point::new(cx, cy), Angle::from_radians(theta)));
        let inv = map.inverse().unwrap();
        let p = Point::new(px, py);
        let back = inv.apply(&map.apply(&p));
        prop_assert!(nalgebra::distance_squared(&back, &p) < 1e-12);
    }
}
