//! The component library: a tagged union over every concrete optical
//! element (spec.md §9's redesign of the source's dynamic
//! type-name dispatch), each implementing the uniform `intersect`/
//! `interact` contract of spec.md §4.4 via [`OpticalElement`].

pub mod laser;
pub mod lamp;
pub mod mirror;
pub mod curved_mirror;
pub mod spherical_lens;
pub mod cylindrical_lens;
pub mod ideal_lens;
pub mod objective;
pub mod prism;
pub mod beam_splitter;
pub mod dichroic;
pub mod filter;
pub mod waveplate;
pub mod polarizer;
pub mod aperture;
pub mod slit_aperture;
pub mod galvo;
pub mod sample;
pub mod camera;
pub mod pmt;
pub mod card;

use crate::core::geometry::{HitRecord, InteractionResult, Ray};
use crate::core::scene_graph::{AbcdPair, ComponentBase, LocalRay, OpticalElement};
use crate::core::pbrt::Float;

pub use laser::Laser;
pub use lamp::Lamp;
pub use mirror::Mirror;
pub use curved_mirror::CurvedMirror;
pub use spherical_lens::SphericalLens;
pub use cylindrical_lens::CylindricalLens;
pub use ideal_lens::IdealLens;
pub use objective::Objective;
pub use prism::Prism;
pub use beam_splitter::BeamSplitter;
pub use dichroic::DichroicMirror;
pub use filter::Filter;
pub use waveplate::Waveplate;
pub use polarizer::Polarizer;
pub use aperture::Aperture;
pub use slit_aperture::SlitAperture;
pub use galvo::{DualGalvo, Galvo, PolygonScanner};
pub use sample::{Sample, SampleChamber};
pub use camera::Camera;
pub use pmt::Pmt;
pub use card::Card;

/// Stable integer tag for serialization round-tripping, paired with a
/// name table (spec.md §9).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Laser,
    Lamp,
    Mirror,
    CurvedMirror,
    SphericalLens,
    CylindricalLens,
    IdealLens,
    Objective,
    Prism,
    BeamSplitter,
    DichroicMirror,
    Filter,
    Waveplate,
    Polarizer,
    Aperture,
    SlitAperture,
    Galvo,
    DualGalvo,
    PolygonScanner,
    Sample,
    SampleChamber,
    Camera,
    Pmt,
    Card,
}

impl TypeTag {
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Laser => "Laser",
            TypeTag::Lamp => "Lamp",
            TypeTag::Mirror => "Mirror",
            TypeTag::CurvedMirror => "CurvedMirror",
            TypeTag::SphericalLens => "SphericalLens",
            TypeTag::CylindricalLens => "CylindricalLens",
            TypeTag::IdealLens => "IdealLens",
            TypeTag::Objective => "Objective",
            TypeTag::Prism => "Prism",
            TypeTag::BeamSplitter => "BeamSplitter",
            TypeTag::DichroicMirror => "DichroicMirror",
            TypeTag::Filter => "Filter",
            TypeTag::Waveplate => "Waveplate",
            TypeTag::Polarizer => "Polarizer",
            TypeTag::Aperture => "Aperture",
            TypeTag::SlitAperture => "SlitAperture",
            TypeTag::Galvo => "Galvo",
            TypeTag::DualGalvo => "DualGalvo",
            TypeTag::PolygonScanner => "PolygonScanner",
            TypeTag::Sample => "Sample",
            TypeTag::SampleChamber => "SampleChamber",
            TypeTag::Camera => "Camera",
            TypeTag::Pmt => "Pmt",
            TypeTag::Card => "Card",
        }
    }

    pub fn from_name(name: &str) -> Option<TypeTag> {
        use TypeTag::*;
        Some(match name {
            "Laser" => Laser,
            "Lamp" => Lamp,
            "Mirror" => Mirror,
            "CurvedMirror" => CurvedMirror,
            "SphericalLens" => SphericalLens,
            "CylindricalLens" => CylindricalLens,
            "IdealLens" => IdealLens,
            "Objective" => Objective,
            "Prism" => Prism,
            "BeamSplitter" => BeamSplitter,
            "DichroicMirror" => DichroicMirror,
            "Filter" => Filter,
            "Waveplate" => Waveplate,
            "Polarizer" => Polarizer,
            "Aperture" => Aperture,
            "SlitAperture" => SlitAperture,
            "Galvo" => Galvo,
            "DualGalvo" => DualGalvo,
            "PolygonScanner" => PolygonScanner,
            "Sample" => Sample,
            "SampleChamber" => SampleChamber,
            "Camera" => Camera,
            "Pmt" => Pmt,
            "Card" => Card,
            _ => return None,
        })
    }
}

/// The tagged union. Every variant forwards to its inner struct's
/// [`OpticalElement`] impl; this is the single place that does the
/// `match`, so adding a new component kind only touches this enum, its
/// own module, and [`TypeTag`].
pub enum Component {
    Laser(Laser),
    Lamp(Lamp),
    Mirror(Mirror),
    CurvedMirror(CurvedMirror),
    SphericalLens(SphericalLens),
    CylindricalLens(CylindricalLens),
    IdealLens(IdealLens),
    Objective(Objective),
    Prism(Prism),
    BeamSplitter(BeamSplitter),
    DichroicMirror(DichroicMirror),
    Filter(Filter),
    Waveplate(Waveplate),
    Polarizer(Polarizer),
    Aperture(Aperture),
    SlitAperture(SlitAperture),
    Galvo(Galvo),
    DualGalvo(DualGalvo),
    PolygonScanner(PolygonScanner),
    Sample(Sample),
    SampleChamber(SampleChamber),
    Camera(Camera),
    Pmt(Pmt),
    Card(Card),
}

macro_rules! dispatch {
    ($self:expr, $inner:ident => $body:expr) => {
        match $self {
            Component::Laser($inner) => $body,
            Component::Lamp($inner) => $body,
            Component::Mirror($inner) => $body,
            Component::CurvedMirror($inner) => $body,
            Component::SphericalLens($inner) => $body,
            Component::CylindricalLens($inner) => $body,
            Component::IdealLens($inner) => $body,
            Component::Objective($inner) => $body,
            Component::Prism($inner) => $body,
            Component::BeamSplitter($inner) => $body,
            Component::DichroicMirror($inner) => $body,
            Component::Filter($inner) => $body,
            Component::Waveplate($inner) => $body,
            Component::Polarizer($inner) => $body,
            Component::Aperture($inner) => $body,
            Component::SlitAperture($inner) => $body,
            Component::Galvo($inner) => $body,
            Component::DualGalvo($inner) => $body,
            Component::PolygonScanner($inner) => $body,
            Component::Sample($inner) => $body,
            Component::SampleChamber($inner) => $body,
            Component::Camera($inner) => $body,
            Component::Pmt($inner) => $body,
            Component::Card($inner) => $body,
        }
    };
}

impl OpticalElement for Component {
    fn base(&self) -> &ComponentBase {
        dispatch!(self, c => c.base())
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        dispatch!(self, c => c.base_mut())
    }

    fn intersect(&self, local_ray: &LocalRay) -> Option<HitRecord> {
        dispatch!(self, c => c.intersect(local_ray))
    }

    fn interact(&self, ray: &Ray, hit: &HitRecord) -> InteractionResult {
        dispatch!(self, c => c.interact(ray, hit))
    }

    fn abcd(&self) -> AbcdPair {
        dispatch!(self, c => c.abcd())
    }

    fn aperture_radius(&self) -> Option<Float> {
        dispatch!(self, c => c.aperture_radius())
    }

    fn aperture_radii(&self) -> Option<(Float, Float)> {
        dispatch!(self, c => c.aperture_radii())
    }

    fn type_name(&self) -> &'static str {
        dispatch!(self, c => c.type_name())
    }
}

impl Component {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Component::Laser(_) => TypeTag::Laser,
            Component::Lamp(_) => TypeTag::Lamp,
            Component::Mirror(_) => TypeTag::Mirror,
            Component::CurvedMirror(_) => TypeTag::CurvedMirror,
            Component::SphericalLens(_) => TypeTag::SphericalLens,
            Component::CylindricalLens(_) => TypeTag::CylindricalLens,
            Component::IdealLens(_) => TypeTag::IdealLens,
            Component::Objective(_) => TypeTag::Objective,
            Component::Prism(_) => TypeTag::Prism,
            Component::BeamSplitter(_) => TypeTag::BeamSplitter,
            Component::DichroicMirror(_) => TypeTag::DichroicMirror,
            Component::Filter(_) => TypeTag::Filter,
            Component::Waveplate(_) => TypeTag::Waveplate,
            Component::Polarizer(_) => TypeTag::Polarizer,
            Component::Aperture(_) => TypeTag::Aperture,
            Component::SlitAperture(_) => TypeTag::SlitAperture,
            Component::Galvo(_) => TypeTag::Galvo,
            Component::DualGalvo(_) => TypeTag::DualGalvo,
            Component::PolygonScanner(_) => TypeTag::PolygonScanner,
            Component::Sample(_) => TypeTag::Sample,
            Component::SampleChamber(_) => TypeTag::SampleChamber,
            Component::Camera(_) => TypeTag::Camera,
            Component::Pmt(_) => TypeTag::Pmt,
            Component::Card(_) => TypeTag::Card,
        }
    }
}
