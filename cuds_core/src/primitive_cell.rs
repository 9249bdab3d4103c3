//! Bravais lattice families and their canonical primitive cells.

use std::fmt;

use crate::types::Point3;

/// The 14 Bravais lattice families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BravaisLattice {
    /// Simple cubic.
    Cubic,
    /// Body-centered cubic.
    BodyCenteredCubic,
    /// Face-centered cubic.
    FaceCenteredCubic,
    /// Rhombohedral.
    Rhombohedral,
    /// Simple tetragonal.
    Tetragonal,
    /// Body-centered tetragonal.
    BodyCenteredTetragonal,
    /// Hexagonal.
    Hexagonal,
    /// Simple orthorhombic.
    Orthorhombic,
    /// Body-centered orthorhombic.
    BodyCenteredOrthorhombic,
    /// Face-centered orthorhombic.
    FaceCenteredOrthorhombic,
    /// Base-centered orthorhombic.
    BaseCenteredOrthorhombic,
    /// Simple monoclinic.
    Monoclinic,
    /// Base-centered monoclinic.
    BaseCenteredMonoclinic,
    /// Triclinic.
    Triclinic,
}

impl BravaisLattice {
    /// All families ordered from most specific to most general.
    pub const BY_SPECIFICITY: [BravaisLattice; 14] = [
        BravaisLattice::Cubic,
        BravaisLattice::BodyCenteredCubic,
        BravaisLattice::FaceCenteredCubic,
        BravaisLattice::Rhombohedral,
        BravaisLattice::Tetragonal,
        BravaisLattice::BodyCenteredTetragonal,
        BravaisLattice::Hexagonal,
        BravaisLattice::Orthorhombic,
        BravaisLattice::BodyCenteredOrthorhombic,
        BravaisLattice::FaceCenteredOrthorhombic,
        BravaisLattice::BaseCenteredOrthorhombic,
        BravaisLattice::Monoclinic,
        BravaisLattice::BaseCenteredMonoclinic,
        BravaisLattice::Triclinic,
    ];

    /// Families whose canonical primitive vectors are axis aligned, so that a
    /// lattice of this family can be stored as a regular grid.
    #[inline]
    pub const fn is_axis_aligned(self) -> bool {
        matches!(
            self,
            BravaisLattice::Cubic | BravaisLattice::Tetragonal | BravaisLattice::Orthorhombic
        )
    }

    /// Canonical upper-case name.
    pub const fn name(self) -> &'static str {
        match self {
            BravaisLattice::Cubic => "CUBIC",
            BravaisLattice::BodyCenteredCubic => "BODY_CENTERED_CUBIC",
            BravaisLattice::FaceCenteredCubic => "FACE_CENTERED_CUBIC",
            BravaisLattice::Rhombohedral => "RHOMBOHEDRAL",
            BravaisLattice::Tetragonal => "TETRAGONAL",
            BravaisLattice::BodyCenteredTetragonal => "BODY_CENTERED_TETRAGONAL",
            BravaisLattice::Hexagonal => "HEXAGONAL",
            BravaisLattice::Orthorhombic => "ORTHORHOMBIC",
            BravaisLattice::BodyCenteredOrthorhombic => "BODY_CENTERED_ORTHORHOMBIC",
            BravaisLattice::FaceCenteredOrthorhombic => "FACE_CENTERED_ORTHORHOMBIC",
            BravaisLattice::BaseCenteredOrthorhombic => "BASE_CENTERED_ORTHORHOMBIC",
            BravaisLattice::Monoclinic => "MONOCLINIC",
            BravaisLattice::BaseCenteredMonoclinic => "BASE_CENTERED_MONOCLINIC",
            BravaisLattice::Triclinic => "TRICLINIC",
        }
    }

    /// Parse a family from its canonical name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.to_ascii_uppercase();
        Self::BY_SPECIFICITY
            .iter()
            .copied()
            .find(|family| family.name() == upper)
    }
}

impl fmt::Display for BravaisLattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Three primitive vectors plus the family they describe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveCell {
    /// First primitive vector.
    pub p1: Point3,
    /// Second primitive vector.
    pub p2: Point3,
    /// Third primitive vector.
    pub p3: Point3,
    /// Bravais family.
    pub bravais_lattice: BravaisLattice,
}

impl PrimitiveCell {
    /// Create a primitive cell from explicit vectors.
    pub const fn new(p1: Point3, p2: Point3, p3: Point3, bravais_lattice: BravaisLattice) -> Self {
        Self {
            p1,
            p2,
            p3,
            bravais_lattice,
        }
    }

    /// The vectors as an array.
    #[inline]
    pub fn vectors(&self) -> [Point3; 3] {
        [self.p1, self.p2, self.p3]
    }

    /// Volume of the cell.
    #[inline]
    pub fn volume(&self) -> f64 {
        self.p1.dot(self.p2.cross(self.p3)).abs()
    }

    /// Simple cubic with edge `a`.
    pub fn cubic(a: f64) -> Self {
        Self::orthogonal(a, a, a, BravaisLattice::Cubic)
    }

    /// Body-centered cubic with conventional edge `a`.
    pub fn body_centered_cubic(a: f64) -> Self {
        Self::new(
            Point3::new(a, 0.0, 0.0),
            Point3::new(0.0, a, 0.0),
            Point3::new(a / 2.0, a / 2.0, a / 2.0),
            BravaisLattice::BodyCenteredCubic,
        )
    }

    /// Face-centered cubic with conventional edge `a`.
    pub fn face_centered_cubic(a: f64) -> Self {
        Self::new(
            Point3::new(0.0, a / 2.0, a / 2.0),
            Point3::new(a / 2.0, 0.0, a / 2.0),
            Point3::new(a / 2.0, a / 2.0, 0.0),
            BravaisLattice::FaceCenteredCubic,
        )
    }

    /// Rhombohedral with edge `a` and inter-axial angle `alpha` (radians).
    pub fn rhombohedral(a: f64, alpha: f64) -> Self {
        let (sin, cos) = alpha.sin_cos();
        let cos2 = cos * cos;
        Self::new(
            Point3::new(a, 0.0, 0.0),
            Point3::new(a * cos, a * sin, 0.0),
            Point3::new(
                a * cos,
                a * (cos - cos2) / sin,
                a * (1.0 - 3.0 * cos2 + 2.0 * cos2 * cos).sqrt() / sin,
            ),
            BravaisLattice::Rhombohedral,
        )
    }

    /// Simple tetragonal with edges `a`, `a`, `c`.
    pub fn tetragonal(a: f64, c: f64) -> Self {
        Self::orthogonal(a, a, c, BravaisLattice::Tetragonal)
    }

    /// Body-centered tetragonal with conventional edges `a`, `a`, `c`.
    pub fn body_centered_tetragonal(a: f64, c: f64) -> Self {
        Self::new(
            Point3::new(a, 0.0, 0.0),
            Point3::new(0.0, a, 0.0),
            Point3::new(a / 2.0, a / 2.0, c / 2.0),
            BravaisLattice::BodyCenteredTetragonal,
        )
    }

    /// Hexagonal with in-plane edge `a` and height `c`.
    pub fn hexagonal(a: f64, c: f64) -> Self {
        Self::new(
            Point3::new(a, 0.0, 0.0),
            Point3::new(a / 2.0, a * 3f64.sqrt() / 2.0, 0.0),
            Point3::new(0.0, 0.0, c),
            BravaisLattice::Hexagonal,
        )
    }

    /// Simple orthorhombic with edges `a`, `b`, `c`.
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Self {
        Self::orthogonal(a, b, c, BravaisLattice::Orthorhombic)
    }

    /// Body-centered orthorhombic with conventional edges `a`, `b`, `c`.
    pub fn body_centered_orthorhombic(a: f64, b: f64, c: f64) -> Self {
        Self::new(
            Point3::new(a, 0.0, 0.0),
            Point3::new(0.0, b, 0.0),
            Point3::new(a / 2.0, b / 2.0, c / 2.0),
            BravaisLattice::BodyCenteredOrthorhombic,
        )
    }

    /// Face-centered orthorhombic with conventional edges `a`, `b`, `c`.
    pub fn face_centered_orthorhombic(a: f64, b: f64, c: f64) -> Self {
        Self::new(
            Point3::new(0.0, b / 2.0, c / 2.0),
            Point3::new(a / 2.0, 0.0, c / 2.0),
            Point3::new(a / 2.0, b / 2.0, 0.0),
            BravaisLattice::FaceCenteredOrthorhombic,
        )
    }

    /// Base-centered orthorhombic with conventional edges `a`, `b`, `c`.
    pub fn base_centered_orthorhombic(a: f64, b: f64, c: f64) -> Self {
        Self::new(
            Point3::new(a, 0.0, 0.0),
            Point3::new(a / 2.0, b / 2.0, 0.0),
            Point3::new(0.0, 0.0, c),
            BravaisLattice::BaseCenteredOrthorhombic,
        )
    }

    /// Simple monoclinic with edges `a`, `b`, `c` and angle `beta` between
    /// the `a` and `c` axes (radians).
    pub fn monoclinic(a: f64, b: f64, c: f64, beta: f64) -> Self {
        let (sin, cos) = beta.sin_cos();
        Self::new(
            Point3::new(a, 0.0, 0.0),
            Point3::new(0.0, b, 0.0),
            Point3::new(c * cos, 0.0, c * sin),
            BravaisLattice::Monoclinic,
        )
    }

    /// Base-centered monoclinic with edges `a`, `b`, `c` and angle `beta`.
    pub fn base_centered_monoclinic(a: f64, b: f64, c: f64, beta: f64) -> Self {
        let (sin, cos) = beta.sin_cos();
        Self::new(
            Point3::new(a, 0.0, 0.0),
            Point3::new(a / 2.0, b / 2.0, 0.0),
            Point3::new(c * cos, 0.0, c * sin),
            BravaisLattice::BaseCenteredMonoclinic,
        )
    }

    /// Triclinic with edges `a`, `b`, `c` and angles `alpha` (b∠c),
    /// `beta` (a∠c), `gamma` (a∠b), all in radians.
    pub fn triclinic(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        let cos_a = alpha.cos();
        let cos_b = beta.cos();
        let (sin_g, cos_g) = gamma.sin_cos();
        let volume_term =
            1.0 - cos_a * cos_a - cos_b * cos_b - cos_g * cos_g + 2.0 * cos_a * cos_b * cos_g;
        Self::new(
            Point3::new(a, 0.0, 0.0),
            Point3::new(b * cos_g, b * sin_g, 0.0),
            Point3::new(
                c * cos_b,
                c * (cos_a - cos_b * cos_g) / sin_g,
                c * volume_term.sqrt() / sin_g,
            ),
            BravaisLattice::Triclinic,
        )
    }

    /// Axis aligned cell for the regular-grid families.
    fn orthogonal(a: f64, b: f64, c: f64, family: BravaisLattice) -> Self {
        Self::new(
            Point3::new(a, 0.0, 0.0),
            Point3::new(0.0, b, 0.0),
            Point3::new(0.0, 0.0, c),
            family,
        )
    }
}
