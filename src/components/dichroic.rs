//! Same flat-plate split geometry as [`crate::components::beam_splitter::BeamSplitter`],
//! but the transmission fraction is looked up from a [`SpectralProfile`]
//! at the incident ray's wavelength rather than held constant (spec.md
//! §4.4).

use crate::core::geometry::{intersect_z_plane, reflect, Bounds3f, HitRecord, InteractionResult, Ray, Vector3f};
use crate::core::pbrt::Float;
use crate::core::scene_graph::{AbcdPair, ComponentBase, LocalRay, OpticalElement};
use crate::core::spectrum::SpectralProfile;
use crate::core::units::m_to_nm;

pub struct DichroicMirror {
    pub base: ComponentBase,
    pub aperture_radius_mm: Float,
    pub profile: SpectralProfile,
}

impl DichroicMirror {
    pub fn new(name: impl Into<String>, aperture_radius_mm: Float, profile: SpectralProfile) -> Self {
        let housing = Bounds3f::new(
            Vector3f::new(-aperture_radius_mm, -aperture_radius_mm, -0.5),
            Vector3f::new(aperture_radius_mm, aperture_radius_mm, 0.5),
        );
        DichroicMirror {
            base: ComponentBase::new(name, housing, 0.0),
            aperture_radius_mm,
            profile,
        }
    }
}

impl OpticalElement for DichroicMirror {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn intersect(&self, local_ray: &LocalRay) -> Option<HitRecord> {
        let (t, p) = intersect_z_plane(local_ray.o, local_ray.d)?;
        if p.x * p.x + p.y * p.y > self.aperture_radius_mm * self.aperture_radius_mm {
            return None;
        }
        let mut normal = Vector3f::new(0.0, 0.0, 1.0);
        if normal.dot(local_ray.d) > 0.0 {
            normal = -normal;
        }
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
        let transmission = self.profile.transmission(m_to_nm(ray.wavelength_m));

        let mut transmitted = ray.spawn_child(hit.point_world, ray.d);
        transmitted.opl_mm += hit.t;
        transmitted.intensity = ray.intensity * transmission;
        transmitted.is_main_ray = ray.is_main_ray;

        let reflected_dir = reflect(ray.d, hit.normal_world);
        let mut reflected = ray.spawn_child(hit.point_world, reflected_dir);
        reflected.opl_mm += hit.t;
        reflected.intensity = ray.intensity * (1.0 - transmission);
        reflected.jones = ray.jones.flip();

        InteractionResult::split(transmitted, reflected)
    }

    fn abcd(&self) -> AbcdPair {
        AbcdPair::identity()
    }

    fn aperture_radius(&self) -> Option<Float> {
        Some(self.aperture_radius_mm)
    }

    fn type_name(&self) -> &'static str {
        "DichroicMirror"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{Coherence, JonesVector, Point3f};
    use crate::core::units::nm_to_m;
    use approx::assert_relative_eq;

    #[test]
    fn transmitted_and_reflected_intensity_conserve_the_incident_ray() {
        let dichroic = DichroicMirror::new(
            "d",
            10.0,
            SpectralProfile::Longpass {
                cutoff_nm: 505.0,
                edge_steepness: 10.0,
            },
        );
        let local_ray = LocalRay {
            o: Point3f::new(0.0, 0.0, -10.0),
            d: Vector3f::new(0.0, 0.0, 1.0),
        };
        let hit = dichroic.intersect(&local_ray).expect("ray should hit the plate");
        let incident = Ray {
            o: Point3f::new(0.0, 0.0, -10.0),
            d: Vector3f::new(0.0, 0.0, 1.0),
            wavelength_m: nm_to_m(532.0),
            intensity: 1.0,
            jones: JonesVector::default(),
            opl_mm: 0.0,
            footprint_radius: 1.0,
            coherence: Coherence::Incoherent,
            interaction_distance: None,
            entry_point: None,
            internal_polyline: Vec::new(),
            termination_point: None,
            exit_surface_tag: None,
            is_main_ray: true,
            source_id: "test".into(),
        };
        let result = dichroic.interact(&incident, &hit);
        assert_eq!(result.rays.len(), 2, "dichroic always splits into two children");
        let total: Float = result.rays.iter().map(|r| r.intensity).sum();
        assert_relative_eq!(total, incident.intensity, epsilon = 1e-9);
    }
}
