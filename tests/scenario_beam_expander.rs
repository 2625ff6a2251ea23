//! Two-lens afocal beam expander: a collimated 2-mm-radius beam
//! doubles in radius and exits collimated (spec.md §8 scenario 1).

mod common;

use common::ray;
use opticbench_core::api::*;
use opticbench_core::core::geometry::{Point3f, Vector3f};
use std::sync::Arc;

#[test]
fn beam_expander_doubles_radius_and_stays_collimated() {
    let mut lens1 = IdealLens::new("lens1", 50.0, 25.0);
    lens1.base.point_along(Vector3f::new(1.0, 0.0, 0.0));
    let mut lens2 = IdealLens::new("lens2", 100.0, 25.0);
    lens2.base.set_position(Point3f::new(150.0, 0.0, 0.0));
    lens2.base.point_along(Vector3f::new(1.0, 0.0, 0.0));

    let scene = Scene::new(vec![
        Arc::new(Component::IdealLens(lens1)),
        Arc::new(Component::IdealLens(lens2)),
    ]);

    let source = ray(Point3f::new(-50.0, 2.0, 0.0), Vector3f::new(1.0, 0.0, 0.0), 532e-9);
    let paths = trace(&scene, vec![source]);

    assert_eq!(paths.len(), 1);
    let path = &paths[0];
    // source leg to lens1, lens1-to-lens2 leg, and the escaping leg past lens2
    assert_eq!(path.len(), 3);
    let exit = &path[2];

    // collimated: direction still along +x, negligible transverse slope
    assert!(exit.d.x > 0.999);
    assert!(exit.d.y.abs() < 1e-3);

    // radius doubled (sign flip expected from the intermediate focus)
    assert!((exit.o.y.abs() - 4.0).abs() < 0.05);
}
