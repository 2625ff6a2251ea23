//! Thin re-export surface for the external collaborator (viewport,
//! scene editing UI, serialization layer): the scene type, every
//! component constructor, the five solver entry points, the animator,
//! and the `TypeTag` registry table (spec.md §6).
//!
//! Nothing in this module contains logic of its own; it exists so a
//! caller can `use opticbench_core::api::*` instead of reaching into
//! every submodule individually.

pub use crate::animator::{AnimationChannel, Animator, Easing, Property};
pub use crate::components::{
    Aperture, BeamSplitter, Camera, Card, Component, CurvedMirror, CylindricalLens, DichroicMirror,
    DualGalvo, Filter, Galvo, IdealLens, Lamp, Laser, Mirror, Objective, Pmt, Polarizer,
    PolygonScanner, Prism, Sample, SampleChamber, SlitAperture, SphericalLens, TypeTag, Waveplate,
};
pub use crate::core::error::CoreError;
pub use crate::core::scene::Scene;
pub use crate::core::scene_graph::{ComponentBase, OpticalElement, Pose};
pub use crate::core::units::{m_to_nm, nm_to_m};

pub use crate::solver1::trace;
pub use crate::solver2::{propagate, query_intensity, query_intensity_multi_beam, GaussianBeamSegment};
pub use crate::solver3::{render, render_pmt_pixel, RenderOutput, RenderSettings};
pub use crate::source_rays::generate_all;
