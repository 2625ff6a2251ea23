//! Gaussian beam envelope propagator: carries a complex beam parameter
//! `q` (tangential and sagittal, independently) along a single Solver 1
//! path, applying free-space translation and each component's ABCD
//! matrix in turn (spec.md §6).
//!
//! Does not branch: it rides the `is_main_ray` skeleton leg Solver 1
//! already picked out, so splitters/dichroics never produce more than
//! one beam per source here. Apertures hard-truncate the beam, resetting
//! both q-parameters to a fresh waist, rather than attenuating it
//! continuously. Never errors: same drop/cap policy as Solver 1.

use crate::core::geometry::{Coherence, Ray};
use crate::core::pbrt::{Cplx, Float, DEFAULT_TERMINAL_SEGMENT_MM, ESCAPE_SEGMENT_MM};
use crate::core::scene::Scene;
use crate::core::scene_graph::{Abcd, OpticalElement};
use std::f64::consts::PI;

#[derive(Debug, Clone)]
pub struct GaussianBeamSegment {
    pub ray: Ray,
    pub q_tangential: Cplx,
    pub q_sagittal: Cplx,
}

fn initial_q(waist_radius_mm: Float, wavelength_m: Float) -> Cplx {
    let w0_m = (waist_radius_mm / 1000.0).max(1e-12);
    Cplx::new(0.0, PI * w0_m * w0_m / wavelength_m)
}

fn apply_abcd(q: Cplx, abcd: Abcd) -> Cplx {
    let num = Cplx::real(abcd.a) * q + Cplx::real(abcd.b);
    let den = Cplx::real(abcd.c) * q + Cplx::real(abcd.d);
    num.safe_div(den)
}

/// `1/q = 1/R - i*lambda/(pi*w^2)`; solves for `w` in mm. `Infinity`
/// at a perfectly collimated (planar) wavefront.
pub fn waist_radius_mm(q: Cplx, wavelength_m: Float) -> Float {
    let inv_q = Cplx::real(1.0).safe_div(q);
    let im = -inv_q.im;
    if im <= 1e-30 {
        return Float::INFINITY;
    }
    ((wavelength_m / (PI * im)).sqrt()) * 1000.0
}

/// Hard aperture truncation (spec.md §6): if the aperture's radius is
/// smaller than twice the larger of the two spot sizes, the beam is
/// clipped tightly enough that it's re-seeded as a fresh waist sized to
/// the aperture, rather than attenuated continuously.
fn clip_q(aperture_radius_mm: Option<Float>, q_t: Cplx, q_s: Cplx, wavelength_m: Float) -> (Cplx, Cplx) {
    let r_a = match aperture_radius_mm {
        Some(r) => r,
        None => return (q_t, q_s),
    };
    let w_t = waist_radius_mm(q_t, wavelength_m);
    let w_s = waist_radius_mm(q_s, wavelength_m);
    let w_max = w_t.max(w_s);
    if w_max.is_finite() && r_a < 2.0 * w_max {
        let q_clipped = initial_q(r_a, wavelength_m);
        (q_clipped, q_clipped)
    } else {
        (q_t, q_s)
    }
}

/// Propagates a Gaussian beam envelope along each `is_main_ray` skeleton
/// path Solver 1 produced (spec.md §6). Paths whose final leg isn't
/// flagged `is_main_ray` are not beams at all — they're the preview or
/// sampling rays `source_rays` generates alongside the one designated
/// main ray per source — and are skipped.
pub fn propagate(paths: &[Vec<Ray>], scene: &Scene) -> Vec<Vec<GaussianBeamSegment>> {
    paths
        .iter()
        .filter(|path| path.last().map_or(false, |ray| ray.is_main_ray))
        .map(|path| propagate_path(scene, path))
        .collect()
}

fn propagate_path(scene: &Scene, path: &[Ray]) -> Vec<GaussianBeamSegment> {
    let mut segments = Vec::with_capacity(path.len());
    let first = match path.first() {
        Some(ray) => ray,
        None => return segments,
    };
    let mut q_t = initial_q(first.footprint_radius, first.wavelength_m);
    let mut q_s = q_t;
    let mut skip_index: Option<usize> = None;

    for ray in path {
        if !ray.is_valid() {
            log::warn!("solver2: dropping invalid ray leg on main path");
            break;
        }

        match scene.nearest_hit(ray, skip_index) {
            None => {
                let translate = Abcd::translation(DEFAULT_TERMINAL_SEGMENT_MM);
                let mut escaped = ray.clone();
                escaped.interaction_distance = None;
                escaped.termination_point = Some(ray.o + ray.d * ESCAPE_SEGMENT_MM);
                segments.push(GaussianBeamSegment {
                    ray: escaped,
                    q_tangential: apply_abcd(q_t, translate),
                    q_sagittal: apply_abcd(q_s, translate),
                });
                break;
            }
            Some((index, hit)) => {
                let component = &scene.components[index];
                let translate = Abcd::translation(hit.t);
                let q_t1 = apply_abcd(q_t, translate);
                let q_s1 = apply_abcd(q_s, translate);
                let (q_t1, q_s1) = clip_q(component.aperture_radius(), q_t1, q_s1, ray.wavelength_m);

                let mut ray_at_hit = ray.clone();
                ray_at_hit.interaction_distance = Some(hit.t);
                segments.push(GaussianBeamSegment {
                    ray: ray_at_hit,
                    q_tangential: q_t1,
                    q_sagittal: q_s1,
                });

                let pair = component.abcd();
                q_t = apply_abcd(q_t1, pair.tangential);
                q_s = apply_abcd(q_s1, pair.sagittal);
                skip_index = Some(index);
            }
        }
    }

    segments
}

/// Gaussian transverse intensity profile at `radial_distance_mm` off
/// axis, using the geometric mean of the tangential/sagittal spot
/// sizes for an elliptical beam.
pub fn query_intensity(segment: &GaussianBeamSegment, radial_distance_mm: Float) -> Float {
    let w_t = waist_radius_mm(segment.q_tangential, segment.ray.wavelength_m);
    let w_s = waist_radius_mm(segment.q_sagittal, segment.ray.wavelength_m);
    let w_eff = (w_t * w_s).sqrt();
    if !w_eff.is_finite() || w_eff <= 0.0 {
        return 0.0;
    }
    segment.ray.intensity * (-2.0 * radial_distance_mm * radial_distance_mm / (w_eff * w_eff)).exp()
}

/// Combines several terminal beams at a common observation plane:
/// incoherent beams sum in intensity, coherent beams sum in complex
/// amplitude (phase from accumulated optical path length) before
/// squaring (spec.md §6).
pub fn query_intensity_multi_beam(beams: &[Vec<GaussianBeamSegment>], radial_distance_mm: Float) -> Float {
    let terminal: Vec<&GaussianBeamSegment> = beams.iter().filter_map(|b| b.last()).collect();
    if terminal.is_empty() {
        return 0.0;
    }
    let any_incoherent = terminal.iter().any(|s| s.ray.coherence == Coherence::Incoherent);
    if any_incoherent {
        return terminal.iter().map(|s| query_intensity(s, radial_distance_mm)).sum();
    }
    let mut total = Cplx::ZERO;
    for segment in terminal {
        let intensity = query_intensity(segment, radial_distance_mm);
        let amplitude = intensity.max(0.0).sqrt();
        let phase = 2.0 * PI * (segment.ray.opl_mm * 1e-3) / segment.ray.wavelength_m;
        total = total + Cplx::exp_i(phase) * amplitude;
    }
    total.norm_sqr()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{Coherence, JonesVector, Vector3f};
    use crate::solver1;
    use approx::assert_relative_eq;

    fn collimated_ray() -> Ray {
        Ray {
            o: Vector3f::ZERO,
            d: Vector3f::UNIT_Z,
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
    fn waist_radius_round_trips_through_q() {
        let q = initial_q(1.0, 532e-9);
        let w = waist_radius_mm(q, 532e-9);
        assert_relative_eq!(w, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn propagating_through_empty_scene_expands_the_beam() {
        let scene = Scene::new(Vec::new());
        let source_paths = solver1::trace(&scene, vec![collimated_ray()]);
        let beams = propagate(&source_paths, &scene);
        assert_eq!(beams.len(), 1);
        let last = beams[0].last().unwrap();
        let w0 = 1.0;
        let w_end = waist_radius_mm(last.q_tangential, 532e-9);
        assert!(w_end > w0);
    }

    #[test]
    fn non_main_paths_are_not_propagated() {
        let scene = Scene::new(Vec::new());
        let mut preview = collimated_ray();
        preview.is_main_ray = false;
        let source_paths = solver1::trace(&scene, vec![preview]);
        let beams = propagate(&source_paths, &scene);
        assert!(beams.is_empty(), "a path whose last leg isn't the main ray shouldn't produce a beam");
    }
}
