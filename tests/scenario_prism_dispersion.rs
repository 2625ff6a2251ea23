//! Equilateral prism under a seven-line white lamp spectrum: exit
//! deflection is monotonic in wavelength and spans more than a degree
//! end to end (spec.md §8 scenario 3).

mod common;

use opticbench_core::api::*;
use opticbench_core::core::geometry::{Point3f, Vector3f};
use std::sync::Arc;

#[test]
fn transmitted_deflection_is_monotonic_in_wavelength() {
    // equilateral: apex angle 60 degrees, base along Y.
    let apex_half_angle = std::f64::consts::PI / 6.0;
    let mut prism = Prism::new("prism", apex_half_angle, 20.0, 10.0, 1.5046, 0.00420);
    prism.base.set_position(Point3f::new(50.0, 0.0, 0.0));
    prism.base.point_along(Vector3f::new(1.0, 0.0, 0.0));

    let scene = Scene::new(vec![Arc::new(Component::Prism(prism))]);

    let lamp = Lamp::default_broadband("lamp", 1.0);
    let mut deflections: Vec<(f64, f64)> = Vec::new();
    for &wavelength_m in &lamp.wavelengths_m {
        // offset off-axis so the ray strikes one of the two slanted
        // faces cleanly instead of grazing the apex edge at y=0.
        let source = opticbench_core::core::geometry::Ray {
            o: Point3f::new(0.0, 6.0, 0.0),
            d: Vector3f::new(1.0, 0.0, 0.0),
            wavelength_m,
            intensity: 1.0,
            jones: opticbench_core::core::geometry::JonesVector::default(),
            opl_mm: 0.0,
            footprint_radius: 1.0,
            coherence: opticbench_core::core::geometry::Coherence::Incoherent,
            interaction_distance: None,
            entry_point: None,
            internal_polyline: Vec::new(),
            termination_point: None,
            exit_surface_tag: None,
            is_main_ray: true,
            source_id: "lamp".into(),
        };
        let paths = trace(&scene, vec![source]);
        if let Some(path) = paths.into_iter().find(|p| p.len() >= 2) {
            let exit_leg = &path[path.len() - 1];
            let angle = exit_leg.d.y.atan2(exit_leg.d.x);
            deflections.push((m_to_nm(wavelength_m), angle));
        }
    }

    deflections.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
    assert!(deflections.len() >= 2, "expected the prism to transmit at least two wavelengths");

    for pair in deflections.windows(2) {
        assert!(
            pair[1].1 <= pair[0].1 + 1e-9,
            "deflection should decrease monotonically as wavelength increases: {:?}",
            pair
        );
    }

    let spread_deg = (deflections.first().unwrap().1 - deflections.last().unwrap().1).to_degrees();
    assert!(spread_deg > 1.0, "extreme wavelengths should differ by more than 1 degree, got {}", spread_deg);
}
