//! Geometric ray tracer: recursively bounces each source ray through
//! the scene, branching on splitters/dichroics, until it's absorbed,
//! escapes, or the recursion depth cap is hit (spec.md §5).
//!
//! Never errors. A malformed source ray is logged and dropped; a
//! cavity that won't terminate is logged and capped at [`MAX_DEPTH`]
//! rather than raising anything.

use crate::core::geometry::Ray;
use crate::core::pbrt::{Float, ESCAPE_SEGMENT_MM, MAX_DEPTH};
use crate::core::scene::Scene;
use crate::core::scene_graph::OpticalElement;
use rayon::prelude::*;

/// Traces every source ray to completion and returns one polyline per
/// terminal branch: a path is a sequence of consecutive ray legs from
/// the source to wherever that branch ended (absorption, escape, or
/// the depth cap).
pub fn trace(scene: &Scene, sources: Vec<Ray>) -> Vec<Vec<Ray>> {
    sources
        .into_par_iter()
        .flat_map(|source| {
            let mut results = Vec::new();
            let mut prefix = Vec::new();
            trace_recursive(scene, source, 0, None, &mut prefix, &mut results);
            results
        })
        .collect()
}

fn trace_recursive(
    scene: &Scene,
    mut ray: Ray,
    depth: u32,
    skip_index: Option<usize>,
    prefix: &mut Vec<Ray>,
    results: &mut Vec<Vec<Ray>>,
) {
    if !ray.is_valid() {
        log::warn!("solver1: dropping invalid ray at depth {}", depth);
        return;
    }

    if depth >= MAX_DEPTH {
        log::warn!("solver1: ray tree hit MAX_DEPTH, terminating branch");
        ray.interaction_distance = None;
        ray.termination_point = Some(ray.o + ray.d * ESCAPE_SEGMENT_MM);
        prefix.push(ray);
        results.push(prefix.clone());
        return;
    }

    match scene.nearest_hit(&ray, skip_index) {
        None => {
            ray.interaction_distance = None;
            ray.termination_point = Some(ray.o + ray.d * ESCAPE_SEGMENT_MM);
            prefix.push(ray);
            results.push(prefix.clone());
        }
        Some((index, hit)) => {
            ray.interaction_distance = Some(hit.t);
            let result = scene.components[index].interact(&ray, &hit);
            prefix.push(ray.clone());

            if result.rays.is_empty() {
                if let Some(last) = prefix.last_mut() {
                    last.termination_point = Some(hit.point_world);
                }
                results.push(prefix.clone());
                return;
            }

            for mut child in result.rays {
                let mut branch_prefix = prefix.clone();
                if child.intensity <= 0.0 {
                    child.interaction_distance = None;
                    child.termination_point = Some(child.o);
                    branch_prefix.push(child);
                    results.push(branch_prefix);
                    continue;
                }
                trace_recursive(scene, child, depth + 1, Some(index), &mut branch_prefix, results);
            }
        }
    }
}

/// Total optical path length (mm) of a completed path, summing each
/// leg's recorded interaction distance (or its escape segment for the
/// final leg).
pub fn path_length_mm(path: &[Ray]) -> Float {
    path.iter()
        .map(|ray| ray.interaction_distance.unwrap_or(ESCAPE_SEGMENT_MM))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Component, Mirror};
    use crate::core::geometry::{Coherence, JonesVector};
    use crate::core::scene_graph::OpticalElement;
    use std::sync::Arc;

    fn straight_ray(o: crate::core::geometry::Point3f, d: crate::core::geometry::Vector3f) -> Ray {
        Ray {
            o,
            d,
            wavelength_m: 532e-9,
            intensity: 1.0,
            jones: JonesVector::default(),
            opl_mm: 0.0,
            footprint_radius: 1.0,
            coherence: Coherence::Coherent,
            interaction_distance: None,
            entry_point: None,
            internal_polyline: Vec::new(),
            termination_point: None,
            exit_surface_tag: None,
            is_main_ray: true,
            source_id: "src".into(),
        }
    }

    #[test]
    fn ray_with_no_components_escapes_to_infinity() {
        let scene = Scene::new(Vec::new());
        let ray = straight_ray(
            crate::core::geometry::Vector3f::ZERO,
            crate::core::geometry::Vector3f::UNIT_Z,
        );
        let paths = trace(&scene, vec![ray]);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].len(), 1);
        assert!(paths[0][0].interaction_distance.is_none());
    }

    #[test]
    fn ray_bounces_off_mirror_once() {
        let mut mirror = Mirror::new("m", crate::components::mirror::MirrorAperture::Circular { radius_mm: 25.4 });
        mirror.base_mut().point_along(crate::core::geometry::Vector3f::new(0.0, 0.0, -1.0));
        mirror.base_mut().set_position(crate::core::geometry::Vector3f::new(0.0, 0.0, 100.0));
        let scene = Scene::new(vec![Arc::new(Component::Mirror(mirror))]);
        let ray = straight_ray(
            crate::core::geometry::Vector3f::ZERO,
            crate::core::geometry::Vector3f::UNIT_Z,
        );
        let paths = trace(&scene, vec![ray]);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].len(), 2);
        // reflected off a mirror facing straight back, the ray should
        // reverse direction.
        assert!((paths[0][1].d.z - (-1.0)).abs() < 1e-6);
    }
}
