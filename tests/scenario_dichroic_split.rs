//! A longpass-505 dichroic at 45 degrees of incidence: a 488nm beam is
//! almost entirely reflected, a 532nm beam is almost entirely
//! transmitted (spec.md §8 scenario 4).

mod common;

use common::ray;
use opticbench_core::api::*;
use opticbench_core::core::geometry::{Point3f, Vector3f};
use opticbench_core::core::spectrum::SpectralProfile;
use std::sync::Arc;

fn build_scene() -> Scene {
    let profile = SpectralProfile::Longpass {
        cutoff_nm: 505.0,
        edge_steepness: 10.0,
    };
    let mut dichroic = DichroicMirror::new("dichroic", 15.0, profile);
    dichroic.base.point_along(Vector3f::new(1.0, 0.0, 1.0));
    Scene::new(vec![Arc::new(Component::DichroicMirror(dichroic))])
}

fn split_intensities(scene: &Scene, wavelength_m: f64) -> (f64, f64) {
    let source = ray(Point3f::new(-10.0, 0.0, 0.0), Vector3f::new(1.0, 0.0, 0.0), wavelength_m);
    let paths = trace(scene, vec![source]);
    assert_eq!(paths.len(), 2, "expect a transmitted and a reflected path");

    let mut transmitted = None;
    let mut reflected = None;
    for path in &paths {
        let leg = &path[1];
        if leg.d.x > 0.5 {
            transmitted = Some(leg.intensity);
        } else if leg.d.z < -0.5 {
            reflected = Some(leg.intensity);
        }
    }
    (
        transmitted.expect("a transmitted leg"),
        reflected.expect("a reflected leg"),
    )
}

#[test]
fn blue_laser_is_mostly_reflected() {
    let scene = build_scene();
    let (transmitted, reflected) = split_intensities(&scene, 488e-9);
    assert!(transmitted < 0.001, "488nm transmitted fraction too high: {}", transmitted);
    assert!(reflected > 0.99, "488nm reflected fraction too low: {}", reflected);
}

#[test]
fn green_laser_is_mostly_transmitted() {
    let scene = build_scene();
    let (transmitted, reflected) = split_intensities(&scene, 532e-9);
    assert!(transmitted > 0.99, "532nm transmitted fraction too low: {}", transmitted);
    assert!(reflected < 0.01, "532nm reflected fraction too high: {}", reflected);
}
