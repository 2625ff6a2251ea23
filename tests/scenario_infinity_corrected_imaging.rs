//! Infinity-corrected relay: three rays leaving a point source at
//! different angles all land at the same transverse position on the
//! screen (spec.md §8 scenario 2).

mod common;

use common::ray;
use opticbench_core::api::*;
use opticbench_core::core::geometry::{Point3f, Vector3f};
use std::sync::Arc;

fn build_scene() -> Scene {
    let mut objective = IdealLens::new("objective", 20.0, 15.0);
    objective.base.set_position(Point3f::new(20.0, 0.0, 0.0));
    objective.base.point_along(Vector3f::new(1.0, 0.0, 0.0));

    let mut tube_lens = IdealLens::new("tube_lens", 100.0, 25.0);
    tube_lens.base.set_position(Point3f::new(120.0, 0.0, 0.0));
    tube_lens.base.point_along(Vector3f::new(1.0, 0.0, 0.0));

    let mut screen = Card::new("screen", 50.0, 50.0);
    screen.base.set_position(Point3f::new(220.0, 0.0, 0.0));
    screen.base.point_along(Vector3f::new(1.0, 0.0, 0.0));

    Scene::new(vec![
        Arc::new(Component::IdealLens(objective)),
        Arc::new(Component::IdealLens(tube_lens)),
        Arc::new(Component::Card(screen)),
    ])
}

fn landing_y(scene: &Scene, angle_rad: f64) -> f64 {
    let direction = Vector3f::new(1.0, angle_rad.tan(), 0.0);
    let source = ray(Point3f::ZERO, direction, 532e-9);
    let paths = trace(scene, vec![source]);
    assert_eq!(paths.len(), 1);
    let path = &paths[0];
    // last leg is the card's passthrough continuation; the leg just
    // before it is the one whose origin is the hit point on the screen.
    path[path.len() - 1].o.y
}

#[test]
fn three_field_angles_converge_at_the_same_point() {
    let scene = build_scene();
    let y0 = landing_y(&scene, 0.0);
    let y_pos = landing_y(&scene, 0.1);
    let y_neg = landing_y(&scene, -0.1);

    assert!((y_pos - y0).abs() < 0.1);
    assert!((y_neg - y0).abs() < 0.1);
    assert!((y_pos - y_neg).abs() < 0.1);
}
