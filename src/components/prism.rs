//! Triangular prism: cross-section in the local Y-Z plane (tangential
//! plane), extruded along X. Entry refracts into the glass, then the
//! ray walks face to face — reflecting on total internal reflection,
//! refracting out the first time it can — until it exits or the walk
//! exceeds [`MAX_STEPS`], at which point the ray is a sentinel trapped
//! path and is absorbed (spec.md §4.4, §9's "tangential plane is Y"
//! redesign flag).

use crate::core::geometry::{reflect, refract, Bounds3f, HitRecord, InteractionResult, Point3f, Ray, Vector3f};
use crate::core::pbrt::{Float, MAX_STEPS};
use crate::core::scene_graph::{Abcd, AbcdPair, ComponentBase, LocalRay, OpticalElement};

/// A cross-section face: the segment from `a` to `b` in the (Y, Z)
/// plane, extruded across `[-half_width, half_width]` in X.
#[derive(Debug, Copy, Clone)]
struct Face {
    a: Point2,
    b: Point2,
}

#[derive(Debug, Copy, Clone)]
struct Point2 {
    y: Float,
    z: Float,
}

impl Face {
    /// Outward normal in the Y-Z plane, assuming vertices are wound
    /// so that the interior lies to the normal's left.
    fn normal(&self) -> Vector3f {
        let edge = Vector3f::new(0.0, self.b.y - self.a.y, self.b.z - self.a.z);
        Vector3f::new(0.0, edge.z, -edge.y).normalize()
    }

    /// Ray-plane intersection in (Y, Z), ignoring X; `half_width`
    /// clips the extrusion and the result to the segment's span.
    fn intersect(&self, origin: Point3f, dir: Vector3f, half_width: Float) -> Option<(Float, Point3f)> {
        let n = self.normal();
        let denom = n.y * dir.y + n.z * dir.z;
        if denom.abs() < 1e-9 {
            return None;
        }
        let d = n.y * self.a.y + n.z * self.a.z;
        let t = (d - n.y * origin.y - n.z * origin.z) / denom;
        if t <= 1e-9 {
            return None;
        }
        let p = origin + dir * t;
        if p.x.abs() > half_width {
            return None;
        }
        let edge_len_sqr = (self.b.y - self.a.y).powi(2) + (self.b.z - self.a.z).powi(2);
        let along = ((p.y - self.a.y) * (self.b.y - self.a.y) + (p.z - self.a.z) * (self.b.z - self.a.z))
            / edge_len_sqr;
        if !(-1e-6..=1.0 + 1e-6).contains(&along) {
            return None;
        }
        Some((t, p))
    }
}

pub struct Prism {
    pub base: ComponentBase,
    faces: [Face; 3],
    pub half_width_mm: Float,
    /// Cauchy dispersion coefficients: `n(lambda) = cauchy_a + cauchy_b / lambda_um^2`.
    pub cauchy_a: Float,
    pub cauchy_b: Float,
}

impl Prism {
    /// `apex_half_angle_rad` is half the apex angle; `base_half_height_mm`
    /// is half the height of the base edge (opposite the apex), and
    /// `height_mm` is the apex-to-base distance along local +Z.
    /// `cauchy_a`/`cauchy_b` parameterize the glass's index of
    /// refraction as a function of wavelength; a typical crown glass is
    /// `(1.5046, 0.00420)` with wavelength in micrometers.
    pub fn new(
        name: impl Into<String>,
        apex_half_angle_rad: Float,
        height_mm: Float,
        half_width_mm: Float,
        cauchy_a: Float,
        cauchy_b: Float,
    ) -> Self {
        let base_half_height = height_mm * apex_half_angle_rad.tan();
        let apex = Point2 { y: 0.0, z: 0.0 };
        let base_left = Point2 { y: -base_half_height, z: height_mm };
        let base_right = Point2 { y: base_half_height, z: height_mm };
        let faces = [
            Face { a: apex, b: base_right },
            Face { a: base_right, b: base_left },
            Face { a: base_left, b: apex },
        ];
        let housing = Bounds3f::new(
            Vector3f::new(-half_width_mm, -base_half_height, 0.0),
            Vector3f::new(half_width_mm, base_half_height, height_mm),
        );
        Prism {
            base: ComponentBase::new(name, housing, 0.0),
            faces,
            half_width_mm,
            cauchy_a,
            cauchy_b,
        }
    }

    /// Index of refraction at `wavelength_m` via the two-term Cauchy
    /// equation (wavelength in micrometers).
    pub fn ior_at(&self, wavelength_m: Float) -> Float {
        let lambda_um = wavelength_m * 1e6;
        self.cauchy_a + self.cauchy_b / (lambda_um * lambda_um)
    }

    fn nearest_face(
        &self,
        origin: Point3f,
        dir: Vector3f,
        skip: Option<usize>,
    ) -> Option<(usize, Float, Point3f)> {
        let mut best: Option<(usize, Float, Point3f)> = None;
        for (index, face) in self.faces.iter().enumerate() {
            if Some(index) == skip {
                continue;
            }
            if let Some((t, p)) = face.intersect(origin, dir, self.half_width_mm) {
                if best.map_or(true, |(_, bt, _)| t < bt) {
                    best = Some((index, t, p));
                }
            }
        }
        best
    }
}

impl OpticalElement for Prism {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn intersect(&self, local_ray: &LocalRay) -> Option<HitRecord> {
        let (index, t, p) = self.nearest_face(local_ray.o, local_ray.d, None)?;
        let mut normal = self.faces[index].normal();
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
            surface_index: Some(index),
        })
    }

    fn interact(&self, ray: &Ray, hit: &HitRecord) -> InteractionResult {
        let ior = self.ior_at(ray.wavelength_m);
        let entry_face = hit.surface_index.unwrap_or(0);
        let mut direction = match refract(hit.direction_local, hit.normal_local, 1.0 / ior) {
            Some(d) => d,
            None => return InteractionResult::absorbed(),
        };
        let mut position = hit.point_local;
        let mut last_face = entry_face;
        let mut chord_length = 0.0;

        for _ in 0..MAX_STEPS {
            let (face_index, t, p) = match self.nearest_face(position, direction, Some(last_face)) {
                Some(hit) => hit,
                None => return InteractionResult::absorbed(),
            };
            chord_length += t;
            let mut face_normal = self.faces[face_index].normal();
            if face_normal.dot(direction) > 0.0 {
                face_normal = -face_normal;
            }
            match refract(direction, -face_normal, ior) {
                Some(exit_dir) => {
                    let transmission = (-self.base.absorption * chord_length).exp();
                    let entry_world = self.base.local_to_world().transform_point(hit.point_local);
                    let exit_world = self.base.local_to_world().transform_point(p);
                    let exit_dir_world = self.base.local_to_world().transform_vector(exit_dir).normalize();
                    let mut child = ray.spawn_child(exit_world, exit_dir_world);
                    child.opl_mm = ray.opl_mm + hit.t + chord_length * ior;
                    child.intensity = ray.intensity * transmission;
                    child.entry_point = Some(entry_world);
                    child.internal_polyline = vec![exit_world];
                    child.is_main_ray = ray.is_main_ray;
                    return InteractionResult::passthrough(child);
                }
                None => {
                    direction = reflect(direction, face_normal);
                    position = p;
                    last_face = face_index;
                }
            }
        }
        // walked MAX_STEPS bounces without escaping: a trapped ray.
        InteractionResult::absorbed()
    }

    fn abcd(&self) -> AbcdPair {
        // Thin-prism approximation: net effect on the tangential plane
        // is a flat-window index step at the sodium d-line; the
        // sagittal plane is untouched since the cross-section doesn't
        // extend there.
        let ior = self.ior_at(589.3e-9);
        let entry = Abcd::refraction(None, 1.0, ior);
        let exit = Abcd::refraction(None, ior, 1.0);
        AbcdPair {
            tangential: exit.product(entry),
            sagittal: Abcd::IDENTITY,
        }
    }

    fn type_name(&self) -> &'static str {
        "Prism"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ior_increases_toward_shorter_wavelengths() {
        let prism = Prism::new("p", 0.5235987756, 20.0, 5.0, 1.5046, 0.00420);
        let n_blue = prism.ior_at(450e-9);
        let n_red = prism.ior_at(650e-9);
        assert!(n_blue > n_red);
    }
}
