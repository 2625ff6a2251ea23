//! Backward Monte Carlo imager: shoots stochastic rays back from each
//! camera pixel (or the PMT) through the scene, accumulating
//! brightfield transmission and sample fluorescence by interrogating
//! Solver 2's beam field and by terminating backward paths on light
//! sources (spec.md §4.7).
//!
//! Reciprocal to Solver 1: the same `chk_intersection`/`interact`
//! machinery runs in reverse, so refraction and reflection need no
//! separate backward variant.

use crate::components::{Camera, Component, Pmt};
use crate::core::geometry::{Point3f, Ray, Vector3f};
use crate::core::pbrt::{Float, ESCAPE_SEGMENT_MM, MAX_DEPTH, THROUGHPUT_FLOOR};
use crate::core::scene::Scene;
use crate::core::scene_graph::OpticalElement;
use crate::core::units::m_to_nm;
use crate::solver2::{query_intensity, GaussianBeamSegment};
use rand::Rng;
use rayon::prelude::*;
use std::f64::consts::PI;

const GOLDEN_RATIO: Float = 0.6180339887498949;
const LASER_MATCH_TOLERANCE_NM: Float = 15.0;

pub struct RenderSettings {
    pub samples_per_pixel: u32,
    pub parallel: bool,
    pub base_seed: u64,
}

pub struct RenderOutput {
    pub emission_image: Vec<f32>,
    pub excitation_image: Vec<f32>,
    pub paths: Vec<Vec<Ray>>,
    pub res_x: usize,
    pub res_y: usize,
}

/// Radial distance (mm) of `point_world` off a beam segment's own
/// chief-ray line, projected into the plane transverse to its
/// direction; used as the argument to [`query_intensity`] when the
/// query point isn't exactly on-axis.
fn transverse_offset_mm(point_world: Point3f, segment: &GaussianBeamSegment) -> Float {
    let delta = point_world - segment.ray.o;
    // clamp to the forward half-line: a point behind where this
    // segment starts isn't on the beam at all, no matter how close it
    // sits to the line's backward extension.
    let along = delta.dot(segment.ray.d).max(0.0);
    let closest = segment.ray.o + segment.ray.d * along;
    (point_world - closest).length()
}

/// Forward excitation intensity at an arbitrary world point, combining
/// every beam whose terminal segment passes near it (spec.md §4.6's
/// coherent/incoherent summation rule, evaluated off-axis).
pub fn excitation_at_point(beams: &[Vec<GaussianBeamSegment>], point_world: Point3f) -> Float {
    let terminal: Vec<&GaussianBeamSegment> = beams.iter().filter_map(|b| b.last()).collect();
    if terminal.is_empty() {
        return 0.0;
    }
    terminal
        .iter()
        .map(|segment| query_intensity(segment, transverse_offset_mm(point_world, segment)))
        .sum()
}

fn active_wavelengths(beams: &[Vec<GaussianBeamSegment>]) -> Vec<Float> {
    let mut seen = Vec::new();
    for beam in beams {
        if let Some(segment) = beam.last() {
            if !seen.iter().any(|w: &Float| (*w - segment.ray.wavelength_m).abs() < 1e-12) {
                seen.push(segment.ray.wavelength_m);
            }
        }
    }
    seen
}

fn sample_cone_direction_local(rng: &mut impl Rng, sin_theta_max: Float) -> Vector3f {
    if sin_theta_max <= 0.0 {
        return Vector3f::new(0.0, 0.0, -1.0);
    }
    let u: Float = rng.gen();
    let phi: Float = rng.gen::<Float>() * 2.0 * PI;
    let sin_theta = sin_theta_max * u.sqrt();
    let cos_theta = (1.0 - sin_theta * sin_theta).max(0.0).sqrt();
    Vector3f::new(sin_theta * phi.cos(), sin_theta * phi.sin(), -cos_theta)
}

/// Recursively traces a backward ray through the scene, returning the
/// radiance it carries back to the sensor. Visualization metadata
/// (the in-scene path) is appended to `prefix` as the trace proceeds;
/// `prefix` reflects the path actually taken once the call returns.
fn trace_backward(
    scene: &Scene,
    beam_segments: &[Vec<GaussianBeamSegment>],
    rng: &mut impl Rng,
    mut ray: Ray,
    depth: u32,
    skip_index: Option<usize>,
    throughput: Float,
    prefix: &mut Vec<Ray>,
) -> Float {
    if depth >= MAX_DEPTH || throughput < THROUGHPUT_FLOOR || !ray.is_valid() {
        ray.termination_point = Some(ray.o + ray.d * ESCAPE_SEGMENT_MM);
        prefix.push(ray);
        return 0.0;
    }

    match scene.nearest_hit(&ray, skip_index) {
        None => {
            ray.termination_point = Some(ray.o + ray.d * ESCAPE_SEGMENT_MM);
            prefix.push(ray);
            0.0
        }
        Some((index, hit)) => {
            ray.interaction_distance = Some(hit.t);
            let component = &scene.components[index];
            let lambda_nm = m_to_nm(ray.wavelength_m);

            match component.as_ref() {
                Component::Laser(laser) => {
                    prefix.push(ray.clone());
                    if (m_to_nm(laser.wavelength_m) - lambda_nm).abs() <= LASER_MATCH_TOLERANCE_NM {
                        throughput * laser.power
                    } else {
                        0.0
                    }
                }
                Component::Lamp(lamp) => {
                    prefix.push(ray.clone());
                    let matched = lamp
                        .wavelengths_m
                        .iter()
                        .zip(lamp.opacities.iter())
                        .find(|(w, _)| (m_to_nm(**w) - lambda_nm).abs() <= LASER_MATCH_TOLERANCE_NM);
                    match matched {
                        Some((_, opacity)) => throughput * lamp.power * opacity,
                        None => 0.0,
                    }
                }
                Component::Sample(sample) => {
                    let chord = sample.compute_chord_length(&ray);
                    prefix.push(ray.clone());
                    let (length_mm, midpoint) = match chord {
                        Some(v) => v,
                        None => return 0.0,
                    };
                    let transmission = (-sample.absorption * length_mm).exp();
                    let far_point = ray.o + ray.d * sample.get_volume_intersection(&ray).map(|(_, far)| far).unwrap_or(length_mm);
                    let continued = ray.spawn_child(far_point, ray.d);
                    let background = trace_backward(
                        scene,
                        beam_segments,
                        rng,
                        continued,
                        depth + 1,
                        Some(index),
                        throughput * transmission,
                        prefix,
                    );
                    let fluorescence = match &sample.fluorophore {
                        Some(f) => {
                            let i_exc = excitation_at_point(beam_segments, midpoint);
                            let psi = f.emission.transmission(lambda_nm);
                            throughput * i_exc * f.quantum_efficiency * psi * length_mm
                        }
                        None => 0.0,
                    };
                    background + fluorescence
                }
                Component::SampleChamber(chamber) => {
                    let chord = chamber.compute_chord_length(&ray);
                    prefix.push(ray.clone());
                    let (length_mm, _midpoint) = match chord {
                        Some(v) => v,
                        None => return 0.0,
                    };
                    let transmission = (-chamber.absorption * length_mm).exp();
                    let far_point = ray.o
                        + ray.d * chamber.get_volume_intersection(&ray).map(|(_, far)| far).unwrap_or(length_mm);
                    let continued = ray.spawn_child(far_point, ray.d);
                    trace_backward(
                        scene,
                        beam_segments,
                        rng,
                        continued,
                        depth + 1,
                        Some(index),
                        throughput * transmission,
                        prefix,
                    )
                }
                Component::Camera(_) | Component::Pmt(_) if depth == 0 => {
                    // The sensor itself, at the first bounce: ignore per spec.md §4.7 step 3.
                    let advanced = ray.spawn_child(hit.point_world + ray.d * 1e-3, ray.d);
                    trace_backward(scene, beam_segments, rng, advanced, depth, Some(index), throughput, prefix)
                }
                _ => {
                    let result = component.interact(&ray, &hit);
                    prefix.push(ray.clone());
                    if result.rays.is_empty() {
                        return 0.0;
                    }
                    let total_intensity: Float = result.rays.iter().map(|r| r.intensity).sum();
                    if total_intensity <= 1e-12 {
                        return 0.0;
                    }
                    let chosen = if result.rays.len() == 1 {
                        &result.rays[0]
                    } else {
                        let mut pick: Float = rng.gen::<Float>() * total_intensity;
                        let mut selected = &result.rays[0];
                        for child in &result.rays {
                            if pick <= child.intensity {
                                selected = child;
                                break;
                            }
                            pick -= child.intensity;
                        }
                        selected
                    };
                    let child_ray = chosen.clone();
                    let next_throughput = throughput * (total_intensity / ray.intensity.max(1e-12));
                    trace_backward(
                        scene,
                        beam_segments,
                        rng,
                        child_ray,
                        depth + 1,
                        Some(index),
                        next_throughput,
                        prefix,
                    )
                }
            }
        }
    }
}

fn golden_ratio_subsample(paths: Vec<Vec<Ray>>, max_count: usize) -> Vec<Vec<Ray>> {
    if paths.len() <= max_count {
        return paths;
    }
    let mut seen = std::collections::BTreeSet::new();
    let mut acc = 0.0;
    let mut selected = Vec::with_capacity(max_count);
    while selected.len() < max_count && seen.len() < paths.len() {
        acc = (acc + GOLDEN_RATIO).fract();
        let idx = ((acc * paths.len() as Float) as usize).min(paths.len() - 1);
        if seen.insert(idx) {
            selected.push(paths[idx].clone());
        }
    }
    selected
}

fn pixel_rng(base_seed: u64, pixel_index: u64) -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    rand::rngs::SmallRng::seed_from_u64(base_seed.wrapping_mul(0x9E3779B97F4A7C15).wrapping_add(pixel_index))
}

struct PixelResult {
    emission: Float,
    excitation: Float,
    best_path: Option<Vec<Ray>>,
}

fn render_pixel(
    scene: &Scene,
    beam_segments: &[Vec<GaussianBeamSegment>],
    camera: &Camera,
    settings: &RenderSettings,
    wavelengths: &[Float],
    px: u32,
    py: u32,
    camera_index: usize,
    pixel_index: u64,
) -> PixelResult {
    let mut rng = pixel_rng(settings.base_seed, pixel_index);
    let local_point = camera.point_of_pixel(px, py);
    let world_point = camera.base.local_to_world().transform_point(local_point);

    let excitation = excitation_at_point(beam_segments, world_point);

    let mut radiance_sum = 0.0;
    let mut best_radiance = -1.0;
    let mut best_path = None;
    let sample_count = (settings.samples_per_pixel as usize) * wavelengths.len().max(1);
    let fallback = [532e-9];
    let active: &[Float] = if wavelengths.is_empty() { &fallback } else { wavelengths };

    for &wavelength_m in active {
        for _ in 0..settings.samples_per_pixel {
            let direction_local = sample_cone_direction_local(&mut rng, camera.sensor_na);
            let direction_world = camera.base.local_to_world().transform_vector(direction_local).normalize();
            let polarization_angle = rng.gen::<Float>() * PI;

            let ray = Ray {
                o: world_point,
                d: direction_world,
                wavelength_m,
                intensity: 1.0,
                jones: crate::core::jones::JonesVector::linear(polarization_angle),
                opl_mm: 0.0,
                footprint_radius: 0.0,
                coherence: crate::core::geometry::Coherence::Incoherent,
                interaction_distance: None,
                entry_point: None,
                internal_polyline: Vec::new(),
                termination_point: None,
                exit_surface_tag: None,
                is_main_ray: false,
                source_id: "solver3".into(),
            };

            let mut prefix = Vec::new();
            let radiance = trace_backward(
                scene,
                beam_segments,
                &mut rng,
                ray.clone(),
                0,
                Some(camera_index),
                1.0,
                &mut prefix,
            );
            radiance_sum += radiance;
            if radiance > best_radiance {
                best_radiance = radiance;
                best_path = Some(prefix);
            }
        }
    }

    PixelResult {
        emission: radiance_sum / sample_count.max(1) as Float,
        excitation,
        best_path,
    }
}

/// Renders a full camera frame: per-pixel emission/excitation images
/// plus a golden-ratio-subsampled set of visualization paths.
pub fn render(
    scene: &Scene,
    beam_segments: &[Vec<GaussianBeamSegment>],
    camera: &Camera,
    camera_index: usize,
    max_vis_paths: usize,
    settings: &RenderSettings,
) -> RenderOutput {
    let res_x = camera.resolution_x as usize;
    let res_y = camera.resolution_y as usize;
    let wavelengths = active_wavelengths(beam_segments);

    let pixel_indices: Vec<(u32, u32, u64)> = (0..res_y)
        .flat_map(|py| (0..res_x).map(move |px| (px as u32, py as u32, (py * res_x + px) as u64)))
        .collect();

    let results: Vec<PixelResult> = if settings.parallel {
        pixel_indices
            .par_iter()
            .map(|&(px, py, idx)| render_pixel(scene, beam_segments, camera, settings, &wavelengths, px, py, camera_index, idx))
            .collect()
    } else {
        pixel_indices
            .iter()
            .map(|&(px, py, idx)| render_pixel(scene, beam_segments, camera, settings, &wavelengths, px, py, camera_index, idx))
            .collect()
    };

    let mut emission_image = Vec::with_capacity(results.len());
    let mut excitation_image = Vec::with_capacity(results.len());
    let mut paths = Vec::new();
    for result in results {
        emission_image.push(result.emission as f32);
        excitation_image.push(result.excitation as f32);
        if let Some(path) = result.best_path {
            paths.push(path);
        }
    }

    RenderOutput {
        emission_image,
        excitation_image,
        paths: golden_ratio_subsample(paths, max_vis_paths),
        res_x,
        res_y,
    }
}

/// Single-pixel variant for a photomultiplier: no spatial grid, so
/// only the emission-peak wavelength is sampled per spec.md §4.7.
pub fn render_pmt_pixel(
    scene: &Scene,
    beam_segments: &[Vec<GaussianBeamSegment>],
    pmt: &Pmt,
    pmt_index: usize,
    settings: &RenderSettings,
    emission_peak_wavelength_m: Float,
) -> (Float, Option<Vec<Ray>>) {
    let mut rng = pixel_rng(settings.base_seed, 0);
    let world_point = pmt.base.local_to_world().transform_point(Vector3f::ZERO);

    let mut radiance_sum = 0.0;
    let mut best_radiance = -1.0;
    let mut best_path = None;

    for _ in 0..settings.samples_per_pixel {
        let direction_local = sample_cone_direction_local(&mut rng, 0.0);
        let direction_world = pmt.base.local_to_world().transform_vector(direction_local).normalize();
        let polarization_angle = rng.gen::<Float>() * PI;

        let ray = Ray {
            o: world_point,
            d: direction_world,
            wavelength_m: emission_peak_wavelength_m,
            intensity: 1.0,
            jones: crate::core::jones::JonesVector::linear(polarization_angle),
            opl_mm: 0.0,
            footprint_radius: 0.0,
            coherence: crate::core::geometry::Coherence::Incoherent,
            interaction_distance: None,
            entry_point: None,
            internal_polyline: Vec::new(),
            termination_point: None,
            exit_surface_tag: None,
            is_main_ray: false,
            source_id: "solver3".into(),
        };

        let mut prefix = Vec::new();
        let radiance = trace_backward(scene, beam_segments, &mut rng, ray, 0, Some(pmt_index), 1.0, &mut prefix);
        radiance_sum += radiance;
        if radiance > best_radiance {
            best_radiance = radiance;
            best_path = Some(prefix);
        }
    }

    (
        radiance_sum / settings.samples_per_pixel.max(1) as Float,
        best_path,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_ratio_subsample_keeps_everything_under_the_cap() {
        let paths: Vec<Vec<Ray>> = (0..5).map(|_| Vec::new()).collect();
        let kept = golden_ratio_subsample(paths, 10);
        assert_eq!(kept.len(), 5);
    }

    #[test]
    fn golden_ratio_subsample_caps_large_sets() {
        let paths: Vec<Vec<Ray>> = (0..50).map(|_| Vec::new()).collect();
        let kept = golden_ratio_subsample(paths, 10);
        assert_eq!(kept.len(), 10);
    }

    #[test]
    fn empty_scene_pixel_returns_zero_radiance() {
        let scene = Scene::new(Vec::new());
        let camera = Camera::new("cam", 10.0, 10.0, 4, 4, 4, 0.1);
        let settings = RenderSettings {
            samples_per_pixel: 4,
            parallel: false,
            base_seed: 7,
        };
        let output = render(&scene, &[], &camera, usize::MAX, 10, &settings);
        assert!(output.emission_image.iter().all(|&v| v == 0.0));
    }
}
