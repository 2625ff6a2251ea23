//! Lamp -> condenser -> fluorescent sample -> objective -> tube lens ->
//! camera: the rendered image is non-zero and darker through the
//! sample's shadow than just outside it (spec.md §8 scenario 5).

mod common;

use common::ray;
use opticbench_core::api::*;
use opticbench_core::components::sample::Fluorophore;
use opticbench_core::core::geometry::{Point3f, Vector3f};
use opticbench_core::core::spectrum::{Passband, SpectralProfile};
use std::sync::Arc;

#[test]
fn sample_casts_a_darker_shadow_than_its_surroundings() {
    let mut lamp = Lamp::default_broadband("lamp", 1.0);
    lamp.base.point_along(Vector3f::new(1.0, 0.0, 0.0));

    let mut condenser = IdealLens::new("condenser", 20.0, 30.0);
    condenser.base.set_position(Point3f::new(50.0, 0.0, 0.0));
    condenser.base.point_along(Vector3f::new(1.0, 0.0, 0.0));

    let fluorophore = Fluorophore {
        excitation: SpectralProfile::Bandpass {
            band: Passband {
                center_nm: 480.0,
                fwhm_nm: 60.0,
            },
            edge_steepness: 10.0,
        },
        emission: SpectralProfile::Bandpass {
            band: Passband {
                center_nm: 520.0,
                fwhm_nm: 40.0,
            },
            edge_steepness: 10.0,
        },
        quantum_efficiency: 0.3,
    };
    let mut sample = Sample::new("mickey", 2.0, 0.5, Some(fluorophore));
    sample.base.set_position(Point3f::new(100.0, 0.0, 0.0));

    // f=40 on both sides of the sample: an afocal 1:1 relay, same
    // family as the infinity-corrected imaging scenario, just with
    // equal objective/tube-lens focal lengths.
    let mut objective = IdealLens::new("objective", 40.0, 40.0);
    objective.base.set_position(Point3f::new(140.0, 0.0, 0.0));
    objective.base.point_along(Vector3f::new(1.0, 0.0, 0.0));

    let mut tube_lens = IdealLens::new("tube_lens", 40.0, 40.0);
    tube_lens.base.set_position(Point3f::new(200.0, 0.0, 0.0));
    tube_lens.base.point_along(Vector3f::new(1.0, 0.0, 0.0));

    let mut camera = Camera::new("camera", 20.0, 20.0, 9, 9, 16, 0.02);
    camera.base.set_position(Point3f::new(240.0, 0.0, 0.0));
    camera.base.point_along(Vector3f::new(1.0, 0.0, 0.0));

    let camera_index = 5;
    let scene = Scene::new(vec![
        Arc::new(Component::Lamp(lamp)),
        Arc::new(Component::IdealLens(condenser)),
        Arc::new(Component::Sample(sample)),
        Arc::new(Component::IdealLens(objective)),
        Arc::new(Component::IdealLens(tube_lens)),
        Arc::new(Component::Camera(camera)),
    ]);
    let camera_ref = match scene.components[camera_index].as_ref() {
        Component::Camera(c) => c,
        _ => panic!("expected the camera at the index we built it at"),
    };

    let lamp_ref = match scene.components[0].as_ref() {
        Component::Lamp(l) => l,
        _ => panic!("expected the lamp first"),
    };
    let sources: Vec<_> = lamp_ref
        .wavelengths_m
        .iter()
        .map(|&w| ray(Point3f::new(1.0, 0.0, 0.0), Vector3f::new(1.0, 0.0, 0.0), w))
        .collect();
    let paths = trace(&scene, sources);
    let beams = propagate(&paths, &scene);

    let settings = RenderSettings {
        samples_per_pixel: 16,
        parallel: false,
        base_seed: 42,
    };
    let output = render(&scene, &beams, camera_ref, camera_index, 16, &settings);

    assert_eq!(output.emission_image.len(), 9 * 9);

    // center pixel (px=4, py=4): local offset (0, 0), lands exactly on
    // the sample's axis, well inside its 2mm radius.
    let center = output.emission_image[4 * 9 + 4];
    // edge-of-field pixel (px=4, py=0): local offset (0, -8.89mm),
    // lands outside the sample entirely under the 1:1 relay.
    let outside = output.emission_image[0 * 9 + 4];

    assert!(center > 0.0, "expected a non-zero reading through the sample");
    assert!(outside > 0.0, "expected a non-zero reading outside the sample");
    assert!(
        center < outside,
        "sample shadow should read darker than its surroundings: center={}, outside={}",
        center,
        outside
    );
}
