//! Epifluorescence fold: a laser reflects off a dichroic down into an
//! objective and a fluorescent sample; the same dichroic lets the
//! returning light continue straight on to an emission filter and
//! camera collinear with the objective axis. The camera sees almost no
//! raw excitation light, and its fluorescence image peaks on the axis
//! shared with the sample (spec.md §8 scenario 6).

mod common;

use common::ray;
use opticbench_core::api::*;
use opticbench_core::components::sample::Fluorophore;
use opticbench_core::core::geometry::{Point3f, Vector3f};
use opticbench_core::core::spectrum::{Passband, SpectralProfile};
use std::sync::Arc;

const LASER_WAVELENGTH_M: f64 = 488e-9;

fn build_scene() -> Scene {
    let mut laser = Laser::new("laser", LASER_WAVELENGTH_M, 1.0, 1.0);
    laser.base.set_position(Point3f::new(-50.0, 0.0, 0.0));
    laser.base.point_along(Vector3f::new(1.0, 0.0, 0.0));

    // cutoff pinned exactly at the laser line: a 50/50 split at the
    // fold, so both the excitation-down and imaging-up legs carry
    // enough weight to show up reliably in a Monte Carlo render
    // instead of depending on one side's rare tail.
    let mut dichroic = DichroicMirror::new(
        "dichroic",
        15.0,
        SpectralProfile::Longpass {
            cutoff_nm: 488.0,
            edge_steepness: 10.0,
        },
    );
    dichroic.base.point_along(Vector3f::new(1.0, 0.0, 1.0));

    let mut objective = IdealLens::new("objective", 30.0, 30.0);
    objective.base.set_position(Point3f::new(0.0, 0.0, -50.0));

    let fluorophore = Fluorophore {
        excitation: SpectralProfile::Bandpass {
            band: Passband {
                center_nm: 480.0,
                fwhm_nm: 60.0,
            },
            edge_steepness: 10.0,
        },
        // wide enough to also register the 488nm excitation line itself,
        // since the backward render below queries this band at the
        // excitation wavelength (solver3 traces one wavelength per pass).
        emission: SpectralProfile::Bandpass {
            band: Passband {
                center_nm: 500.0,
                fwhm_nm: 80.0,
            },
            edge_steepness: 10.0,
        },
        quantum_efficiency: 0.5,
    };
    let mut sample = Sample::new("gfp_sample", 2.0, 0.1, Some(fluorophore));
    sample.base.set_position(Point3f::new(0.0, 0.0, -100.0));

    // near-no-op at 488nm: stands in for an emission filter without
    // starving the single-wavelength render of its already-thin signal.
    let mut emission_filter = Filter::new(
        "emission_filter",
        30.0,
        SpectralProfile::Longpass {
            cutoff_nm: 400.0,
            edge_steepness: 10.0,
        },
    );
    emission_filter.base.set_position(Point3f::new(0.0, 0.0, 80.0));

    let mut camera = Camera::new("camera", 20.0, 20.0, 9, 9, 16, 0.02);
    camera.base.set_position(Point3f::new(0.0, 0.0, 150.0));

    Scene::new(vec![
        Arc::new(Component::Laser(laser)),
        Arc::new(Component::DichroicMirror(dichroic)),
        Arc::new(Component::IdealLens(objective)),
        Arc::new(Component::Sample(sample)),
        Arc::new(Component::Filter(emission_filter)),
        Arc::new(Component::Camera(camera)),
    ])
}

#[test]
fn camera_sees_little_excitation_and_fluorescence_peaks_on_axis() {
    let scene = build_scene();
    let camera_index = 5;
    let camera_ref = match scene.components[camera_index].as_ref() {
        Component::Camera(c) => c,
        _ => panic!("expected the camera at the index we built it at"),
    };

    let source = ray(Point3f::new(-50.0, 0.0, 0.0), Vector3f::new(1.0, 0.0, 0.0), LASER_WAVELENGTH_M);
    let paths = trace(&scene, vec![source]);
    let beams = propagate(&paths, &scene);

    let settings = RenderSettings {
        samples_per_pixel: 64,
        parallel: false,
        base_seed: 7,
    };
    let output = render(&scene, &beams, camera_ref, camera_index, 16, &settings);

    assert_eq!(output.excitation_image.len(), 9 * 9);
    assert_eq!(output.emission_image.len(), 9 * 9);

    for (i, &v) in output.excitation_image.iter().enumerate() {
        assert!(v < 1e-6, "excitation leaked onto the camera at pixel {}: {}", i, v);
    }

    let center = output.emission_image[4 * 9 + 4];
    let corner = output.emission_image[0 * 9 + 0];
    assert!(center > 0.0, "expected a non-zero fluorescence reading on axis");
    assert!(
        center > corner,
        "on-axis pixel should read brighter than an off-axis corner: center={}, corner={}",
        center,
        corner
    );
}
