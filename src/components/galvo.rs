//! Scanning-mirror assemblies. All three reduce to flat-mirror
//! reflection off whichever facet is currently exposed; what differs
//! is how many scan-angle properties drive the facet orientation
//! (spec.md §4.4, §9).

use crate::core::geometry::{reflect, Bounds3f, HitRecord, InteractionResult, Point3f, Quaternion, Ray, Vector3f};
use crate::core::pbrt::Float;
use crate::core::scene_graph::{AbcdPair, ComponentBase, LocalRay, OpticalElement};

/// A flat mirror through the local origin with normal `normal`,
/// clipped to a circular aperture measured as Euclidean distance from
/// the origin (since the plane always passes through it).
fn tilted_mirror_hit(origin: Point3f, dir: Vector3f, normal: Vector3f, aperture_radius_mm: Float) -> Option<(Float, Point3f)> {
    let denom = normal.dot(dir);
    if denom.abs() < 1e-9 {
        return None;
    }
    let t = -normal.dot(origin) / denom;
    if t <= 1e-9 {
        return None;
    }
    let p = origin + dir * t;
    if p.length() > aperture_radius_mm {
        return None;
    }
    Some((t, p))
}

fn oriented_normal(axis: Vector3f, angle_rad: Float) -> Vector3f {
    Quaternion::from_axis_angle(axis, angle_rad).apply(Vector3f::UNIT_Z)
}

/// Single-axis scanning mirror: `scan_angle_rad` tilts the reflective
/// facet about `axis`.
pub struct Galvo {
    pub base: ComponentBase,
    pub axis: Vector3f,
    pub scan_angle_rad: Float,
    pub aperture_radius_mm: Float,
}

impl Galvo {
    pub fn new(name: impl Into<String>, axis: Vector3f, aperture_radius_mm: Float) -> Self {
        let housing = Bounds3f::new(
            Vector3f::new(-aperture_radius_mm, -aperture_radius_mm, -aperture_radius_mm),
            Vector3f::new(aperture_radius_mm, aperture_radius_mm, aperture_radius_mm),
        );
        Galvo {
            base: ComponentBase::new(name, housing, 0.0),
            axis: axis.normalize(),
            scan_angle_rad: 0.0,
            aperture_radius_mm,
        }
    }

    fn normal(&self) -> Vector3f {
        oriented_normal(self.axis, self.scan_angle_rad)
    }
}

impl OpticalElement for Galvo {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn intersect(&self, local_ray: &LocalRay) -> Option<HitRecord> {
        let mut normal = self.normal();
        let (t, p) = tilted_mirror_hit(local_ray.o, local_ray.d, normal, self.aperture_radius_mm)?;
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
        let direction = reflect(ray.d, hit.normal_world);
        let mut child = ray.spawn_child(hit.point_world, direction);
        child.opl_mm += hit.t;
        child.jones = ray.jones.flip();
        child.is_main_ray = ray.is_main_ray;
        InteractionResult::single(child)
    }

    fn abcd(&self) -> AbcdPair {
        AbcdPair::identity()
    }

    fn aperture_radius(&self) -> Option<Float> {
        Some(self.aperture_radius_mm)
    }

    fn type_name(&self) -> &'static str {
        "Galvo"
    }
}

/// Two mirrors in series, one scan angle per axis, separated by
/// `separation_mm` along local Z.
pub struct DualGalvo {
    pub base: ComponentBase,
    pub x_scan_angle_rad: Float,
    pub y_scan_angle_rad: Float,
    pub separation_mm: Float,
    pub aperture_radius_mm: Float,
}

impl DualGalvo {
    pub fn new(name: impl Into<String>, separation_mm: Float, aperture_radius_mm: Float) -> Self {
        let housing = Bounds3f::new(
            Vector3f::new(-aperture_radius_mm, -aperture_radius_mm, -aperture_radius_mm),
            Vector3f::new(aperture_radius_mm, aperture_radius_mm, separation_mm + aperture_radius_mm),
        );
        DualGalvo {
            base: ComponentBase::new(name, housing, 0.0),
            x_scan_angle_rad: 0.0,
            y_scan_angle_rad: 0.0,
            separation_mm,
            aperture_radius_mm,
        }
    }

    fn facet_normal(&self, is_first: bool) -> Vector3f {
        if is_first {
            oriented_normal(Vector3f::new(0.0, 1.0, 0.0), self.x_scan_angle_rad)
        } else {
            oriented_normal(Vector3f::new(1.0, 0.0, 0.0), self.y_scan_angle_rad)
        }
    }

    fn facet_origin(&self, is_first: bool) -> Point3f {
        if is_first {
            Vector3f::ZERO
        } else {
            Vector3f::new(0.0, 0.0, self.separation_mm)
        }
    }
}

impl OpticalElement for DualGalvo {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn intersect(&self, local_ray: &LocalRay) -> Option<HitRecord> {
        let first_origin = local_ray.o - self.facet_origin(true);
        let second_origin = local_ray.o - self.facet_origin(false);
        let first = tilted_mirror_hit(first_origin, local_ray.d, self.facet_normal(true), self.aperture_radius_mm);
        let second = tilted_mirror_hit(second_origin, local_ray.d, self.facet_normal(false), self.aperture_radius_mm);

        let (t, local_p, mut normal, index) = match (first, second) {
            (Some((t1, p1)), Some((t2, p2))) if t1 <= t2 => (t1, p1, self.facet_normal(true), 0),
            (Some((_, _)), Some((t2, p2))) => (t2, p2, self.facet_normal(false), 1),
            (Some((t1, p1)), None) => (t1, p1, self.facet_normal(true), 0),
            (None, Some((t2, p2))) => (t2, p2, self.facet_normal(false), 1),
            (None, None) => return None,
        };
        if normal.dot(local_ray.d) > 0.0 {
            normal = -normal;
        }
        let p = local_p + self.facet_origin(index == 0);
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
        let direction = reflect(ray.d, hit.normal_world);
        let mut child = ray.spawn_child(hit.point_world, direction);
        child.opl_mm += hit.t;
        child.jones = ray.jones.flip();
        child.is_main_ray = ray.is_main_ray;
        InteractionResult::single(child)
    }

    fn abcd(&self) -> AbcdPair {
        AbcdPair::identity()
    }

    fn aperture_radius(&self) -> Option<Float> {
        Some(self.aperture_radius_mm)
    }

    fn type_name(&self) -> &'static str {
        "DualGalvo"
    }
}

/// Rotating N-facet polygon mirror; `rotation_angle_rad` selects and
/// orients the currently-exposed facet.
pub struct PolygonScanner {
    pub base: ComponentBase,
    pub facet_count: u32,
    pub rotation_angle_rad: Float,
    pub aperture_radius_mm: Float,
}

impl PolygonScanner {
    pub fn new(name: impl Into<String>, facet_count: u32, aperture_radius_mm: Float) -> Self {
        let housing = Bounds3f::new(
            Vector3f::new(-aperture_radius_mm, -aperture_radius_mm, -aperture_radius_mm),
            Vector3f::new(aperture_radius_mm, aperture_radius_mm, aperture_radius_mm),
        );
        PolygonScanner {
            base: ComponentBase::new(name, housing, 0.0),
            facet_count: facet_count.max(1),
            rotation_angle_rad: 0.0,
            aperture_radius_mm,
        }
    }

    fn active_facet_angle(&self) -> Float {
        let facet_pitch = std::f64::consts::TAU / self.facet_count as Float;
        let facet_index = (self.rotation_angle_rad / facet_pitch).floor();
        self.rotation_angle_rad - facet_index * facet_pitch - facet_pitch / 2.0
    }

    fn normal(&self) -> Vector3f {
        oriented_normal(Vector3f::new(0.0, 1.0, 0.0), self.active_facet_angle())
    }
}

impl OpticalElement for PolygonScanner {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn intersect(&self, local_ray: &LocalRay) -> Option<HitRecord> {
        let mut normal = self.normal();
        let (t, p) = tilted_mirror_hit(local_ray.o, local_ray.d, normal, self.aperture_radius_mm)?;
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
        let direction = reflect(ray.d, hit.normal_world);
        let mut child = ray.spawn_child(hit.point_world, direction);
        child.opl_mm += hit.t;
        child.jones = ray.jones.flip();
        child.is_main_ray = ray.is_main_ray;
        InteractionResult::single(child)
    }

    fn abcd(&self) -> AbcdPair {
        AbcdPair::identity()
    }

    fn aperture_radius(&self) -> Option<Float> {
        Some(self.aperture_radius_mm)
    }

    fn type_name(&self) -> &'static str {
        "PolygonScanner"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn galvo_at_zero_scan_reflects_like_flat_mirror() {
        let galvo = Galvo::new("g", Vector3f::new(0.0, 1.0, 0.0), 10.0);
        let local_ray = LocalRay {
            o: Vector3f::new(0.0, 0.0, -5.0),
            d: Vector3f::UNIT_Z,
        };
        let hit = galvo.intersect(&local_ray).unwrap();
        assert!((hit.normal_local.z - (-1.0)).abs() < 1e-9);
    }
}
