//! Property animator: a clock-driven set of channels, each easing one
//! numeric property on one component, resolved once at construction to
//! a [`Property`] rather than re-parsed on every tick (spec.md §4.9,
//! §9's redesign of the dot-string dispatch).

use crate::components::Component;
use crate::core::error::CoreError;
use crate::core::geometry::{Quaternion, Vector3f};
use crate::core::pbrt::Float;
use crate::core::scene_graph::OpticalElement;
use std::f64::consts::PI;

/// Every scalar an [`AnimationChannel`] can drive. Resolved once from
/// the external dot-path string (`scanAngle`, `position.y`,
/// `rotation.z`, ...) at channel construction.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Property {
    PositionX,
    PositionY,
    PositionZ,
    RotationX,
    RotationY,
    RotationZ,
    ScanAngle,
    ScanAngleX,
    ScanAngleY,
    PolygonRotationAngle,
    FocalLengthMm,
    TransmissionFraction,
    FastAxisRad,
    RetardanceRad,
    PolarizerAxisRad,
    Power,
}

impl Property {
    /// Resolves a dot-addressable path string (as it would arrive from
    /// an external scene description) to a `Property`, or `None` if
    /// unrecognized.
    pub fn from_path(path: &str) -> Option<Property> {
        use Property::*;
        Some(match path {
            "position.x" => PositionX,
            "position.y" => PositionY,
            "position.z" => PositionZ,
            "rotation.x" => RotationX,
            "rotation.y" => RotationY,
            "rotation.z" => RotationZ,
            "scanAngle" => ScanAngle,
            "scanAngleX" => ScanAngleX,
            "scanAngleY" => ScanAngleY,
            "rotationAngle" => PolygonRotationAngle,
            "focalLengthMm" => FocalLengthMm,
            "transmissionFraction" => TransmissionFraction,
            "fastAxisRad" => FastAxisRad,
            "retardanceRad" => RetardanceRad,
            "polarizerAxisRad" => PolarizerAxisRad,
            "power" => Power,
            _ => return None,
        })
    }
}

/// Sets `property` on `component` to `value`, if that combination
/// exists; returns whether the assignment was applied. Covers exactly
/// the documented per-component scalars — an unmatched combination is
/// a silent no-op rather than a panic, since a channel authored
/// against a component that later changed type shouldn't crash a
/// render pass.
pub fn set_property(component: &mut Component, property: Property, value: Float) -> bool {
    use Property::*;
    match property {
        PositionX | PositionY | PositionZ => {
            let base = component.base_mut();
            let mut p = base.pose().position;
            match property {
                PositionX => p.x = value,
                PositionY => p.y = value,
                PositionZ => p.z = value,
                _ => unreachable!(),
            }
            base.set_position(p);
            true
        }
        RotationX | RotationY | RotationZ => {
            let axis = match property {
                RotationX => Vector3f::new(1.0, 0.0, 0.0),
                RotationY => Vector3f::new(0.0, 1.0, 0.0),
                RotationZ => Vector3f::new(0.0, 0.0, 1.0),
                _ => unreachable!(),
            };
            component.base_mut().set_rotation(Quaternion::from_axis_angle(axis, value));
            true
        }
        ScanAngle => match component {
            Component::Galvo(g) => {
                g.scan_angle_rad = value;
                true
            }
            _ => false,
        },
        ScanAngleX => match component {
            Component::DualGalvo(g) => {
                g.x_scan_angle_rad = value;
                true
            }
            _ => false,
        },
        ScanAngleY => match component {
            Component::DualGalvo(g) => {
                g.y_scan_angle_rad = value;
                true
            }
            _ => false,
        },
        PolygonRotationAngle => match component {
            Component::PolygonScanner(p) => {
                p.rotation_angle_rad = value;
                true
            }
            _ => false,
        },
        FocalLengthMm => match component {
            Component::IdealLens(l) => {
                l.focal_length_mm = value;
                true
            }
            _ => false,
        },
        TransmissionFraction => match component {
            Component::BeamSplitter(b) => {
                b.transmission = value;
                true
            }
            _ => false,
        },
        FastAxisRad => match component {
            Component::Waveplate(w) => {
                w.fast_axis_rad = value;
                true
            }
            _ => false,
        },
        RetardanceRad => match component {
            Component::Waveplate(w) => {
                w.retardance_rad = value;
                true
            }
            _ => false,
        },
        PolarizerAxisRad => match component {
            Component::Polarizer(p) => {
                p.axis_rad = value;
                true
            }
            _ => false,
        },
        Power => match component {
            Component::Laser(l) => {
                l.power = value;
                true
            }
            Component::Lamp(l) => {
                l.power = value;
                true
            }
            _ => false,
        },
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Easing {
    Linear,
    Sinusoidal,
    Discrete(u32),
}

/// Evaluates an easing curve at normalized time `t in [0,1)` across
/// `[from, to]`.
pub fn ease(easing: Easing, t: Float, from: Float, to: Float) -> Float {
    let range = to - from;
    match easing {
        Easing::Linear => from + range * t,
        Easing::Sinusoidal => (from + to) / 2.0 + (range / 2.0) * (2.0 * PI * t).sin(),
        Easing::Discrete(n) if n > 1 => from + (t * n as Float).floor() * range / (n as Float - 1.0),
        Easing::Discrete(_) => from,
    }
}

pub struct AnimationChannel {
    pub component_id: u64,
    pub property: Property,
    pub from: Float,
    pub to: Float,
    pub easing: Easing,
    pub period_ms: Float,
    pub repeat: bool,
    pub restore_value: Option<Float>,
}

impl AnimationChannel {
    pub fn new(
        component_id: u64,
        property_path: &str,
        from: Float,
        to: Float,
        easing: Easing,
        period_ms: Float,
        repeat: bool,
    ) -> Result<Self, CoreError> {
        let property = Property::from_path(property_path).ok_or_else(|| {
            CoreError::UnknownProperty(component_id.to_string(), property_path.to_string())
        })?;
        Ok(AnimationChannel {
            component_id,
            property,
            from,
            to,
            easing,
            period_ms,
            repeat,
            restore_value: None,
        })
    }

    /// Normalized time in `[0,1)` at `clock_ms`: repeat mode folds the
    /// clock modulo the period, non-repeat clamps at 1.
    fn normalized_time(&self, clock_ms: Float) -> Float {
        if self.period_ms <= 0.0 {
            return 0.0;
        }
        if self.repeat {
            (clock_ms / self.period_ms).rem_euclid(1.0)
        } else {
            (clock_ms / self.period_ms).min(1.0)
        }
    }

    fn value_at(&self, clock_ms: Float) -> Float {
        ease(self.easing, self.normalized_time(clock_ms), self.from, self.to)
    }
}

/// Holds an ordered list of channels and a monotonically advancing
/// clock; `tick` advances the clock and applies every channel in one
/// pass (spec.md §4.9).
pub struct Animator {
    pub channels: Vec<AnimationChannel>,
    pub clock_ms: Float,
    pub playing: bool,
}

impl Default for Animator {
    fn default() -> Self {
        Animator {
            channels: Vec::new(),
            clock_ms: 0.0,
            playing: false,
        }
    }
}

impl Animator {
    pub fn new() -> Self {
        Animator::default()
    }

    pub fn add_channel(&mut self, channel: AnimationChannel) {
        self.channels.push(channel);
    }

    /// Removes the channel at `index`. If `restore` and the channel
    /// recorded a pre-animation value, applies it back to `components`
    /// before dropping the channel.
    pub fn remove_channel(&mut self, index: usize, restore: bool, components: &mut [&mut Component]) {
        if index >= self.channels.len() {
            return;
        }
        let channel = self.channels.remove(index);
        if restore {
            if let Some(value) = channel.restore_value {
                if let Some(component) = components.iter_mut().find(|c| c.base().id == channel.component_id) {
                    set_property(component, channel.property, value);
                }
            }
        }
    }

    pub fn clear_all(&mut self) {
        self.channels.clear();
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn toggle(&mut self) {
        self.playing = !self.playing;
    }

    pub fn reset(&mut self) {
        self.clock_ms = 0.0;
    }

    /// Advances the clock by `dt_ms` (a no-op while paused) and
    /// evaluates every channel against `components`. Returns whether
    /// any property actually changed, so the caller knows whether to
    /// re-run the solvers.
    pub fn tick(&mut self, dt_ms: Float, components: &mut [&mut Component]) -> bool {
        if !self.playing {
            return false;
        }
        self.clock_ms += dt_ms;
        self.evaluate_at(self.clock_ms, components)
    }

    /// Evaluates every channel at an explicit clock value without
    /// advancing `self.clock_ms` (used for scrubbing a timeline).
    pub fn evaluate_at(&mut self, clock_ms: Float, components: &mut [&mut Component]) -> bool {
        let mut changed = false;
        for channel in &mut self.channels {
            if channel.restore_value.is_none() {
                if let Some(component) = components.iter().find(|c| c.base().id == channel.component_id) {
                    channel.restore_value = Some(property_value(component, channel.property));
                }
            }
            let value = channel.value_at(clock_ms);
            if let Some(component) = components.iter_mut().find(|c| c.base().id == channel.component_id) {
                changed |= set_property(component, channel.property, value);
            }
        }
        changed
    }
}

/// Reads the current value of `property` on `component`, used to seed
/// a channel's restore value the first time it's evaluated.
fn property_value(component: &Component, property: Property) -> Float {
    use Property::*;
    match property {
        PositionX => component.base().pose().position.x,
        PositionY => component.base().pose().position.y,
        PositionZ => component.base().pose().position.z,
        RotationX | RotationY | RotationZ => 0.0,
        ScanAngle => match component {
            Component::Galvo(g) => g.scan_angle_rad,
            _ => 0.0,
        },
        ScanAngleX => match component {
            Component::DualGalvo(g) => g.x_scan_angle_rad,
            _ => 0.0,
        },
        ScanAngleY => match component {
            Component::DualGalvo(g) => g.y_scan_angle_rad,
            _ => 0.0,
        },
        PolygonRotationAngle => match component {
            Component::PolygonScanner(p) => p.rotation_angle_rad,
            _ => 0.0,
        },
        FocalLengthMm => match component {
            Component::IdealLens(l) => l.focal_length_mm,
            _ => 0.0,
        },
        TransmissionFraction => match component {
            Component::BeamSplitter(b) => b.transmission,
            _ => 0.0,
        },
        FastAxisRad => match component {
            Component::Waveplate(w) => w.fast_axis_rad,
            _ => 0.0,
        },
        RetardanceRad => match component {
            Component::Waveplate(w) => w.retardance_rad,
            _ => 0.0,
        },
        PolarizerAxisRad => match component {
            Component::Polarizer(p) => p.axis_rad,
            _ => 0.0,
        },
        Power => match component {
            Component::Laser(l) => l.power,
            Component::Lamp(l) => l.power,
            _ => 0.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_easing_interpolates() {
        assert_eq!(ease(Easing::Linear, 0.5, 0.0, 10.0), 5.0);
    }

    #[test]
    fn sinusoidal_easing_starts_at_midpoint() {
        let v = ease(Easing::Sinusoidal, 0.0, 0.0, 10.0);
        assert!((v - 5.0).abs() < 1e-9);
    }

    #[test]
    fn discrete_easing_steps() {
        assert_eq!(ease(Easing::Discrete(4), 0.0, 0.0, 3.0), 0.0);
        assert_eq!(ease(Easing::Discrete(4), 0.99, 0.0, 3.0), 3.0);
    }

    #[test]
    fn unknown_property_path_errors() {
        let err = AnimationChannel::new(1, "not.a.real.path", 0.0, 1.0, Easing::Linear, 1000.0, true);
        assert!(err.is_err());
    }

    #[test]
    fn repeat_folds_clock_modulo_period() {
        let channel = AnimationChannel::new(1, "position.x", 0.0, 10.0, Easing::Linear, 1000.0, true).unwrap();
        assert!((channel.value_at(1500.0) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn non_repeat_clamps_at_one() {
        let channel = AnimationChannel::new(1, "position.x", 0.0, 10.0, Easing::Linear, 1000.0, false).unwrap();
        assert_eq!(channel.value_at(5000.0), 10.0);
    }
}
