//! Volumetric specimen geometry. `Sample` and `SampleChamber` both
//! expose `get_volume_intersection`/`compute_chord_length`, the
//! non-standard queries Solver 3 uses to integrate fluorescence and
//! brightfield absorption along a ray's chord through the volume
//! (spec.md §4.4, §7). As [`OpticalElement`]s they're transparent:
//! `interact` always passes the ray straight through.

use crate::core::geometry::{intersect_sphere, Bounds3f, HitRecord, InteractionResult, Point3f, Ray, Vector3f};
use crate::core::pbrt::Float;
use crate::core::scene_graph::{AbcdPair, ComponentBase, LocalRay, OpticalElement};
use crate::core::spectrum::SpectralProfile;

/// Fluorescence behavior: excitation/emission spectral profiles and a
/// quantum efficiency scaling emitted photon yield relative to
/// absorbed excitation photons.
pub struct Fluorophore {
    pub excitation: SpectralProfile,
    pub emission: SpectralProfile,
    pub quantum_efficiency: Float,
}

pub struct Sample {
    pub base: ComponentBase,
    pub radius_mm: Float,
    pub absorption: Float,
    pub fluorophore: Option<Fluorophore>,
}

impl Sample {
    pub fn new(name: impl Into<String>, radius_mm: Float, absorption: Float, fluorophore: Option<Fluorophore>) -> Self {
        let housing = Bounds3f::new(
            Vector3f::new(-radius_mm, -radius_mm, -radius_mm),
            Vector3f::new(radius_mm, radius_mm, radius_mm),
        );
        Sample {
            base: ComponentBase::new(name, housing, absorption),
            radius_mm,
            absorption,
            fluorophore,
        }
    }

    /// Near/far parametric distances where `world_ray` crosses the
    /// sample's sphere, in the component's local frame but expressed
    /// in world-ray parametric units (since local_to_world here is a
    /// rigid transform, the t-values carry over unchanged).
    pub fn get_volume_intersection(&self, world_ray: &Ray) -> Option<(Float, Float)> {
        let w2l = self.base.world_to_local();
        let local_o = w2l.transform_point(world_ray.o);
        let local_d = w2l.transform_vector(world_ray.d).normalize();
        let mut roots = intersect_sphere(local_o, local_d, Vector3f::ZERO, self.radius_mm);
        roots.retain(|t| *t > 0.0);
        if roots.len() < 2 {
            return None;
        }
        Some((roots[0], roots[1]))
    }

    pub fn compute_chord_length(&self, world_ray: &Ray) -> Option<(Float, Point3f)> {
        let (t_near, t_far) = self.get_volume_intersection(world_ray)?;
        let length = t_far - t_near;
        let midpoint = world_ray.o + world_ray.d * ((t_near + t_far) * 0.5);
        Some((length, midpoint))
    }
}

impl OpticalElement for Sample {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn intersect(&self, local_ray: &LocalRay) -> Option<HitRecord> {
        let roots = intersect_sphere(local_ray.o, local_ray.d, Vector3f::ZERO, self.radius_mm);
        let t = roots.into_iter().find(|t| *t > 1e-9)?;
        let p = local_ray.o + local_ray.d * t;
        let normal = p.normalize();
        Some(HitRecord {
            t,
            point_world: p,
            normal_world: normal,
            point_local: p,
            normal_local: normal,
            direction_local: local_ray.d,
            surface_index: None,
        })
    }

    fn interact(&self, ray: &Ray, hit: &HitRecord) -> InteractionResult {
        let mut child = ray.spawn_child(hit.point_world, ray.d);
        child.opl_mm += hit.t;
        child.is_main_ray = ray.is_main_ray;
        InteractionResult::passthrough(child)
    }

    fn type_name(&self) -> &'static str {
        "Sample"
    }
}

/// A box-shaped chamber housing one or more samples; same volumetric
/// query surface as `Sample`, over a rectangular box instead of a
/// sphere.
pub struct SampleChamber {
    pub base: ComponentBase,
    pub half_extent_mm: Vector3f,
    pub absorption: Float,
}

impl SampleChamber {
    pub fn new(name: impl Into<String>, half_extent_mm: Vector3f, absorption: Float) -> Self {
        let housing = Bounds3f::new(-half_extent_mm, half_extent_mm);
        SampleChamber {
            base: ComponentBase::new(name, housing, absorption),
            half_extent_mm,
            absorption,
        }
    }

    pub fn get_volume_intersection(&self, world_ray: &Ray) -> Option<(Float, Float)> {
        let w2l = self.base.world_to_local();
        let local_o = w2l.transform_point(world_ray.o);
        let local_d = w2l.transform_vector(world_ray.d).normalize();
        let aabb = Bounds3f::new(-self.half_extent_mm, self.half_extent_mm);
        let (hit, t_min, t_max) = aabb.intersect_ray(local_o, local_d);
        if !hit || t_max <= 0.0 {
            return None;
        }
        Some((t_min.max(0.0), t_max))
    }

    pub fn compute_chord_length(&self, world_ray: &Ray) -> Option<(Float, Point3f)> {
        let (t_near, t_far) = self.get_volume_intersection(world_ray)?;
        let length = t_far - t_near;
        let midpoint = world_ray.o + world_ray.d * ((t_near + t_far) * 0.5);
        Some((length, midpoint))
    }
}

impl OpticalElement for SampleChamber {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn intersect(&self, local_ray: &LocalRay) -> Option<HitRecord> {
        let aabb = Bounds3f::new(-self.half_extent_mm, self.half_extent_mm);
        let (hit, t_min, _t_max) = aabb.intersect_ray(local_ray.o, local_ray.d);
        if !hit || t_min <= 1e-9 {
            return None;
        }
        let p = local_ray.o + local_ray.d * t_min;
        Some(HitRecord {
            t: t_min,
            point_world: p,
            normal_world: Vector3f::ZERO,
            point_local: p,
            normal_local: Vector3f::ZERO,
            direction_local: local_ray.d,
            surface_index: None,
        })
    }

    fn interact(&self, ray: &Ray, hit: &HitRecord) -> InteractionResult {
        let mut child = ray.spawn_child(hit.point_world, ray.d);
        child.opl_mm += hit.t;
        child.is_main_ray = ray.is_main_ray;
        InteractionResult::passthrough(child)
    }

    fn type_name(&self) -> &'static str {
        "SampleChamber"
    }
}
