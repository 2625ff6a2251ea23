//! Ring-distributed ray generation: fills concentric rings around a
//! source's local optical axis breadth-first (each ring fully
//! populated before moving outward), staggering each ring's start
//! angle to avoid radial spokes lining up across rings, and applying
//! a Gaussian coherent weighting across the beam profile (spec.md
//! §4.8).

use crate::components::{Component, Laser, Lamp, Pmt};
use crate::core::geometry::{Coherence, JonesVector, Ray, Vector3f};
use crate::core::pbrt::{Float, EPSILON};
use crate::core::scene::Scene;
use crate::core::scene_graph::OpticalElement;
use std::f64::consts::PI;

/// Ring sizes snap to `24 + 12*k` so every ring is complete: the outer
/// ring carries 24 rays at full beam radius, each inner ring 12.
/// Rings fill breadth-first (outer ring first) until `total_rays`
/// ring samples are allocated; the innermost ring may be partial.
fn ring_plan(total_rays: u32) -> Vec<(u32, u32)> {
    let mut rings = Vec::new();
    let mut used = 0;
    let mut k = 0;
    while used < total_rays {
        let ring_size = 24 + 12 * k;
        let take = ring_size.min(total_rays - used);
        rings.push((k, take));
        used += take;
        k += 1;
    }
    rings
}

/// Base-2 van der Corput sequence: `vdc(1) = 1/2, vdc(2) = 1/4, vdc(3)
/// = 3/4, vdc(4) = 1/8, ...`. Used to place inner ring radii so they
/// subdivide the aperture breadth-first without duplicating a radius
/// already covered by an earlier, coarser ring.
fn van_der_corput(mut n: u32) -> Float {
    let mut result = 0.0;
    let mut denom = 1.0;
    while n > 0 {
        denom *= 2.0;
        result += (n & 1) as Float / denom;
        n >>= 1;
    }
    result
}

/// Ring radius fractions of the full aperture: ring 0 is the outer
/// ring at the full radius, every later ring follows the van der
/// Corput subdivision (`1/2, 1/4, 3/4, 1/8, 3/8, 5/8, 7/8, ...`).
fn ring_radius_fraction(ring_index: u32) -> Float {
    if ring_index == 0 {
        1.0
    } else {
        van_der_corput(ring_index)
    }
}

/// Samples ring positions `(radius_mm, theta_rad)` across a disc of
/// `max_radius_mm`, each ring rotated by `i*pi/7` to avoid projected
/// spoke overlap in 2D views.
fn ring_samples(total_rays: u32, max_radius_mm: Float) -> Vec<(Float, Float)> {
    let rings = ring_plan(total_rays);
    let mut samples = Vec::with_capacity(total_rays as usize);
    for (k, take) in rings {
        let radius_mm = max_radius_mm * ring_radius_fraction(k);
        let stagger = (k as Float) * PI / 7.0;
        for i in 0..take {
            let theta = stagger + 2.0 * PI * (i as Float) / (take.max(1) as Float);
            samples.push((radius_mm, theta));
        }
    }
    samples
}

/// Power falloff across the ring pattern for a coherent (laser)
/// source: a Gaussian profile in radius relative to the beam waist.
fn gaussian_weight(radius_mm: Float, beam_radius_mm: Float) -> Float {
    let w = beam_radius_mm.max(1e-6);
    (-2.0 * (radius_mm / w) * (radius_mm / w)).exp()
}

fn base_ray(origin_local: Vector3f, wavelength_m: Float, intensity: Float, coherence: Coherence, source_id: String) -> Ray {
    Ray {
        o: origin_local,
        d: Vector3f::UNIT_Z,
        wavelength_m,
        intensity,
        jones: JonesVector::default(),
        opl_mm: 0.0,
        footprint_radius: 1.0,
        coherence,
        interaction_distance: None,
        entry_point: None,
        internal_polyline: Vec::new(),
        termination_point: None,
        exit_surface_tag: None,
        is_main_ray: false,
        source_id,
    }
}

/// Generates the laser's axial main ray plus its ring pattern, each
/// ring ray coherent and Gaussian-weighted, all offset forward off
/// the housing face to avoid immediately re-hitting it.
pub fn rays_for_laser(laser: &Laser, rays_per_source: u32) -> Vec<Ray> {
    let samples = ring_samples(rays_per_source, laser.beam_radius_mm);
    let source_id = laser.base.id.to_string();
    let origin_offset = EPSILON * 4.0;
    let mut total_weight = 0.0;
    let weighted: Vec<(Float, Float, Float)> = samples
        .iter()
        .map(|(r, theta)| {
            let w = gaussian_weight(*r, laser.beam_radius_mm);
            total_weight += w;
            (*r, *theta, w)
        })
        .collect();
    let normalizer = if total_weight > 1e-12 { 1.0 / total_weight } else { 0.0 };

    let to_world = |mut ray: Ray| {
        ray.o = laser.base.local_to_world().transform_point(ray.o);
        ray.d = laser.base.local_to_world().transform_vector(ray.d).normalize();
        ray.footprint_radius = laser.beam_radius_mm;
        ray
    };

    let mut main_ray = base_ray(
        Vector3f::new(0.0, 0.0, origin_offset),
        laser.wavelength_m,
        laser.power,
        Coherence::Coherent,
        source_id.clone(),
    );
    main_ray.is_main_ray = true;
    let mut rays = vec![to_world(main_ray)];

    rays.extend(weighted.into_iter().map(|(radius_mm, theta, w)| {
        let local_origin = Vector3f::new(radius_mm * theta.cos(), radius_mm * theta.sin(), origin_offset);
        let ray = base_ray(
            local_origin,
            laser.wavelength_m,
            laser.power * w * normalizer,
            Coherence::Coherent,
            source_id.clone(),
        );
        to_world(ray)
    }));
    rays
}

/// Fans the lamp out once per sampled wavelength line: a main ray
/// plus a ring pattern, each line incoherent and weighted by that
/// line's additive opacity. Multi-band lamps halve the ring budget
/// per line so the total ray count stays proportional to one lamp's
/// worth rather than growing with the number of lines.
pub fn rays_for_lamp(lamp: &Lamp, rays_per_source: u32) -> Vec<Ray> {
    if lamp.wavelengths_m.is_empty() {
        return Vec::new();
    }
    let housing_radius = (lamp.base.local_aabb.max.x - lamp.base.local_aabb.min.x) / 2.0;
    let line_count = lamp.wavelengths_m.len() as u32;
    let per_line_budget = if line_count > 1 {
        (rays_per_source / line_count / 2).max(1)
    } else {
        (rays_per_source / line_count).max(1)
    };
    let samples = ring_samples(per_line_budget, housing_radius);
    let source_id = lamp.base.id.to_string();
    let origin_offset = EPSILON * 4.0;

    let to_world = |mut ray: Ray| {
        ray.o = lamp.base.local_to_world().transform_point(ray.o);
        ray.d = lamp.base.local_to_world().transform_vector(ray.d).normalize();
        ray.footprint_radius = housing_radius.max(0.1);
        ray
    };

    let mut rays = Vec::new();
    for (wavelength_m, opacity) in lamp.wavelengths_m.iter().zip(lamp.opacities.iter()) {
        let mut main_ray = base_ray(
            Vector3f::new(0.0, 0.0, origin_offset),
            *wavelength_m,
            lamp.power * opacity,
            Coherence::Incoherent,
            source_id.clone(),
        );
        main_ray.is_main_ray = true;
        rays.push(to_world(main_ray));

        for (radius_mm, theta) in &samples {
            let local_origin = Vector3f::new(radius_mm * theta.cos(), radius_mm * theta.sin(), origin_offset);
            let ray = base_ray(
                local_origin,
                *wavelength_m,
                lamp.power * opacity / samples.len().max(1) as Float,
                Coherence::Incoherent,
                source_id.clone(),
            );
            rays.push(to_world(ray));
        }
    }
    rays
}

/// A photomultiplier has no spatial extent to ring-sample: the
/// viewport gets exactly one preview ray along the detector's local
/// +Z.
pub fn preview_ray_for_pmt(pmt: &Pmt) -> Ray {
    let mut ray = base_ray(Vector3f::ZERO, 532e-9, 0.0, Coherence::Incoherent, pmt.base.id.to_string());
    ray.o = pmt.base.local_to_world().transform_point(Vector3f::ZERO);
    ray.d = pmt
        .base
        .local_to_world()
        .transform_vector(pmt.preview_ray_direction())
        .normalize();
    ray
}

/// Generates every source ray in the scene: ring patterns for each
/// `Laser`/`Lamp`, plus one preview ray per `Pmt`.
pub fn generate_all(scene: &Scene, rays_per_source: u32) -> Vec<Ray> {
    let mut rays = Vec::new();
    for component in &scene.components {
        match component.as_ref() {
            Component::Laser(laser) => rays.extend(rays_for_laser(laser, rays_per_source)),
            Component::Lamp(lamp) => rays.extend(rays_for_lamp(lamp, rays_per_source)),
            Component::Pmt(pmt) => rays.push(preview_ray_for_pmt(pmt)),
            _ => {}
        }
    }
    rays
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_plan_breadth_fills_first_ring_before_second() {
        let rings = ring_plan(30);
        assert_eq!(rings[0], (0, 24));
        assert_eq!(rings[1], (1, 6));
    }

    #[test]
    fn laser_rays_are_all_coherent_and_on_wavelength() {
        let laser = Laser::new("l", 532e-9, 2.0, 1.0);
        let rays = rays_for_laser(&laser, 24);
        assert_eq!(rays.len(), 25); // 24 ring rays plus the axial main ray
        assert!(rays.iter().all(|r| r.coherence == Coherence::Coherent));
        assert!(rays.iter().all(|r| (r.wavelength_m - 532e-9).abs() < 1e-15));
        assert_eq!(rays.iter().filter(|r| r.is_main_ray).count(), 1);
    }

    #[test]
    fn lamp_rays_fan_out_across_every_wavelength() {
        let lamp = Lamp::default_broadband("lamp", 1.0);
        let rays = rays_for_lamp(&lamp, 70);
        let distinct_wavelengths: std::collections::HashSet<_> =
            rays.iter().map(|r| (r.wavelength_m * 1e9) as i64).collect();
        assert_eq!(distinct_wavelengths.len(), 7);
    }
}
