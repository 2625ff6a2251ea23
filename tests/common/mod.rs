use opticbench_core::api::*;
use opticbench_core::core::geometry::{Coherence, JonesVector, Point3f, Ray, Vector3f};

/// Builds a bare collimated ray for feeding directly into a solver,
/// bypassing the source-ray factory for scenarios that just need a
/// handful of hand-placed probe rays.
pub fn ray(origin: Point3f, direction: Vector3f, wavelength_m: f64) -> Ray {
    Ray {
        o: origin,
        d: direction.normalize(),
        wavelength_m,
        intensity: 1.0,
        jones: JonesVector::default(),
        opl_mm: 0.0,
        footprint_radius: 2.0,
        coherence: Coherence::Coherent,
        interaction_distance: None,
        entry_point: None,
        internal_polyline: Vec::new(),
        termination_point: None,
        exit_surface_tag: None,
        is_main_ray: true,
        source_id: "test".into(),
    }
}
