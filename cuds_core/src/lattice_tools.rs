//! Lattice classification and layout recovery.
//!
//! [`find_lattice_type`] decides which Bravais family a triple of primitive
//! vectors describes. For each family, most specific first, a canonical
//! primitive cell is built from parameters derived from the input lengths and
//! angles; the first canonical cell with the same lengths and pairwise angle
//! cosines (under some permutation of the vectors) wins. Lengths and cosines
//! are invariant under rotation, so classification is too.
//!
//! [`guess_lattice_layout`] recovers primitive vectors and grid size from a
//! dense list of lattice points stored with `x` varying fastest.

use crate::config::ClassifierConfig;
use crate::error::{CudsError, Result};
use crate::primitive_cell::{BravaisLattice, PrimitiveCell};
use crate::types::Point3;

const PERMUTATIONS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

/// Lengths and pairwise angle cosines of three vectors.
#[derive(Debug, Clone, Copy)]
struct CellMetrics {
    lengths: [f64; 3],
    cosines: [[f64; 3]; 3],
}

impl CellMetrics {
    fn of(vectors: [Point3; 3]) -> Self {
        let lengths = [vectors[0].length(), vectors[1].length(), vectors[2].length()];
        let mut cosines = [[1.0; 3]; 3];
        for i in 0..3 {
            for j in 0..3 {
                if i != j {
                    cosines[i][j] = vectors[i].cos_angle(vectors[j]).clamp(-1.0, 1.0);
                }
            }
        }
        Self { lengths, cosines }
    }

    /// True if some permutation of `other` has the same lengths and cosines.
    fn equivalent(&self, other: &CellMetrics, tolerance: f64) -> bool {
        PERMUTATIONS.iter().any(|perm| {
            let lengths_match = (0..3).all(|i| {
                let (a, b) = (self.lengths[i], other.lengths[perm[i]]);
                (a - b).abs() <= tolerance * a.max(b)
            });
            lengths_match
                && (0..3).all(|i| {
                    (0..3).all(|j| {
                        (self.cosines[i][j] - other.cosines[perm[i]][perm[j]]).abs() <= tolerance
                    })
                })
        })
    }

    /// Angle between vectors `i` and `j`.
    fn angle(&self, i: usize, j: usize) -> f64 {
        self.cosines[i][j].acos()
    }
}

/// Canonical cells of `family` whose parameters are derived from `m`.
fn candidates(family: BravaisLattice, m: &CellMetrics) -> Vec<PrimitiveCell> {
    let l = m.lengths;
    let mut out = Vec::new();
    match family {
        BravaisLattice::Cubic => {
            out.extend(l.iter().map(|&a| PrimitiveCell::cubic(a)));
        }
        BravaisLattice::BodyCenteredCubic => {
            for &a in &l {
                out.push(PrimitiveCell::body_centered_cubic(a));
                out.push(PrimitiveCell::body_centered_cubic(2.0 * a / 3f64.sqrt()));
            }
        }
        BravaisLattice::FaceCenteredCubic => {
            out.extend(
                l.iter()
                    .map(|&a| PrimitiveCell::face_centered_cubic(a * 2f64.sqrt())),
            );
        }
        BravaisLattice::Rhombohedral => {
            out.push(PrimitiveCell::rhombohedral(l[0], m.angle(0, 1)));
        }
        BravaisLattice::Tetragonal | BravaisLattice::Hexagonal => {
            for [i, j, _] in PERMUTATIONS {
                out.push(match family {
                    BravaisLattice::Tetragonal => PrimitiveCell::tetragonal(l[i], l[j]),
                    _ => PrimitiveCell::hexagonal(l[i], l[j]),
                });
            }
        }
        BravaisLattice::BodyCenteredTetragonal => {
            for [i, _, k] in PERMUTATIONS {
                let a = l[i];
                let c2 = 4.0 * (l[k] * l[k] - a * a / 2.0);
                if c2 > 0.0 {
                    out.push(PrimitiveCell::body_centered_tetragonal(a, c2.sqrt()));
                }
            }
        }
        BravaisLattice::Orthorhombic => {
            out.push(PrimitiveCell::orthorhombic(l[0], l[1], l[2]));
        }
        BravaisLattice::BodyCenteredOrthorhombic => {
            for [i, j, k] in PERMUTATIONS {
                let c2 = 4.0 * l[k] * l[k] - l[i] * l[i] - l[j] * l[j];
                if c2 > 0.0 {
                    out.push(PrimitiveCell::body_centered_orthorhombic(l[i], l[j], c2.sqrt()));
                }
            }
        }
        BravaisLattice::FaceCenteredOrthorhombic => {
            let sq = [4.0 * l[0] * l[0], 4.0 * l[1] * l[1], 4.0 * l[2] * l[2]];
            let a2 = (sq[1] + sq[2] - sq[0]) / 2.0;
            let b2 = (sq[0] + sq[2] - sq[1]) / 2.0;
            let c2 = (sq[0] + sq[1] - sq[2]) / 2.0;
            if a2 > 0.0 && b2 > 0.0 && c2 > 0.0 {
                out.push(PrimitiveCell::face_centered_orthorhombic(
                    a2.sqrt(),
                    b2.sqrt(),
                    c2.sqrt(),
                ));
            }
        }
        BravaisLattice::BaseCenteredOrthorhombic => {
            for [i, j, k] in PERMUTATIONS {
                let b2 = 4.0 * l[j] * l[j] - l[i] * l[i];
                if b2 > 0.0 {
                    out.push(PrimitiveCell::base_centered_orthorhombic(l[i], b2.sqrt(), l[k]));
                }
            }
        }
        BravaisLattice::Monoclinic => {
            for [i, j, k] in PERMUTATIONS {
                out.push(PrimitiveCell::monoclinic(l[i], l[j], l[k], m.angle(i, k)));
            }
        }
        BravaisLattice::BaseCenteredMonoclinic => {
            for [i, j, k] in PERMUTATIONS {
                let b2 = 4.0 * l[j] * l[j] - l[i] * l[i];
                if b2 > 0.0 {
                    out.push(PrimitiveCell::base_centered_monoclinic(
                        l[i],
                        b2.sqrt(),
                        l[k],
                        m.angle(i, k),
                    ));
                }
            }
        }
        BravaisLattice::Triclinic => {
            out.push(PrimitiveCell::triclinic(
                l[0],
                l[1],
                l[2],
                m.angle(1, 2),
                m.angle(0, 2),
                m.angle(0, 1),
            ));
        }
    }
    out
}

/// True if the primitive vectors can generate a lattice of `family`.
///
/// More general families also accept cells of their special cases; use
/// [`find_lattice_type`] for the most specific family.
pub fn is_lattice_of(
    family: BravaisLattice,
    vectors: [Point3; 3],
    config: &ClassifierConfig,
) -> bool {
    let metrics = CellMetrics::of(vectors);
    candidates(family, &metrics).iter().any(|cell| {
        let canonical = CellMetrics::of(cell.vectors());
        canonical.lengths.iter().all(|l| l.is_finite())
            && metrics.equivalent(&canonical, config.tolerance)
    })
}

/// Most specific Bravais family described by `p1`, `p2`, `p3`, using the
/// default single precision tolerance.
///
/// # Errors
/// Returns `NoMatchingFamily` when the vectors are degenerate (zero length,
/// coplanar, non-finite) or match no family.
pub fn find_lattice_type(p1: Point3, p2: Point3, p3: Point3) -> Result<BravaisLattice> {
    find_lattice_type_with(&ClassifierConfig::default(), p1, p2, p3)
}

/// [`find_lattice_type`] with an explicit tolerance.
pub fn find_lattice_type_with(
    config: &ClassifierConfig,
    p1: Point3,
    p2: Point3,
    p3: Point3,
) -> Result<BravaisLattice> {
    let vectors = [p1, p2, p3];
    if vectors.iter().any(|v| !v.is_finite() || v.length() == 0.0) {
        return Err(CudsError::NoMatchingFamily);
    }
    let scale = p1.length() * p2.length() * p3.length();
    if p1.dot(p2.cross(p3)).abs() <= config.tolerance * scale {
        return Err(CudsError::NoMatchingFamily);
    }

    BravaisLattice::BY_SPECIFICITY
        .iter()
        .copied()
        .find(|family| is_lattice_of(*family, vectors, config))
        .ok_or(CudsError::NoMatchingFamily)
}

/// Primitive vectors and grid size recovered from a dense point list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeLayout {
    /// `p[1] - p[0]`, `p[nx] - p[0]`, `p[nx * ny] - p[0]`.
    pub vectors: [Point3; 3],
    /// `[nx, ny, nz]`.
    pub size: [usize; 3],
}

/// Recover the primitive vectors of a dense lattice point list.
///
/// See [`guess_lattice_layout`].
pub fn guess_primitive_vectors(points: &[Point3]) -> Result<[Point3; 3]> {
    guess_lattice_layout(points, &ClassifierConfig::default()).map(|layout| layout.vectors)
}

/// Recover primitive vectors and size from lattice points stored with `x`
/// varying fastest, then `y`, then `z`.
///
/// `nx` is located at the first break in the constant step along a row, and
/// `nx * ny` at the first row start that leaves the plane spanned by the
/// first two vectors. Rows may be shifted within their plane (hexagonal
/// layouts), but every row must advance by `p1` and every plane by `p3`.
///
/// # Errors
/// Returns `Index` when the points do not follow that ordering.
pub fn guess_lattice_layout(points: &[Point3], config: &ClassifierConfig) -> Result<LatticeLayout> {
    let n = points.len();
    let violated = |index: usize| CudsError::Index { index, len: n };
    if n < 4 {
        return Err(violated(n));
    }

    let origin = points[0];
    let p1 = points[1] - origin;
    let scale = p1.length();
    if scale == 0.0 || !scale.is_finite() {
        return Err(violated(1));
    }
    let tol = config.tolerance * scale.max(1.0);
    let close = |a: Point3, b: Point3| (a - b).length() <= tol;

    let nx = (2..n)
        .find(|&i| !close(points[i] - points[i - 1], p1))
        .ok_or_else(|| violated(n))?;
    let p2 = points[nx] - origin;

    let normal = p1.cross(p2);
    if normal.length() <= tol * p2.length() {
        return Err(violated(nx));
    }
    let normal = normal / normal.length();

    let nxy = (nx..n)
        .step_by(nx)
        .find(|&m| (points[m] - origin).dot(normal).abs() > tol)
        .ok_or_else(|| violated(n))?;
    let p3 = points[nxy] - origin;

    if n % nxy != 0 {
        return Err(violated(n));
    }

    for (flat, point) in points.iter().enumerate() {
        let i = flat % nx;
        let row_start = flat - i;
        let plane_index = flat / nxy;
        let in_plane = flat % nxy;

        if !close(*point - points[row_start], p1 * i as f64) {
            return Err(violated(flat));
        }
        if plane_index == 0 {
            if (*point - origin).dot(normal).abs() > tol {
                return Err(violated(flat));
            }
        } else if !close(*point - points[in_plane], p3 * plane_index as f64) {
            return Err(violated(flat));
        }
    }

    Ok(LatticeLayout {
        vectors: [p1, p2, p3],
        size: [nx, nxy / nx, n / nxy],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(cell: PrimitiveCell) -> Result<BravaisLattice> {
        find_lattice_type(cell.p1, cell.p2, cell.p3)
    }

    #[test]
    fn test_canonical_cells() {
        let cases = [
            PrimitiveCell::cubic(1.0),
            PrimitiveCell::body_centered_cubic(1.0),
            PrimitiveCell::face_centered_cubic(1.0),
            PrimitiveCell::rhombohedral(1.0, 0.7),
            PrimitiveCell::tetragonal(1.0, 2.0),
            PrimitiveCell::body_centered_tetragonal(1.0, 2.3),
            PrimitiveCell::hexagonal(1.0, 2.0),
            PrimitiveCell::orthorhombic(1.0, 2.0, 3.0),
            PrimitiveCell::body_centered_orthorhombic(1.0, 2.0, 3.0),
            PrimitiveCell::face_centered_orthorhombic(1.0, 2.0, 3.0),
            PrimitiveCell::base_centered_orthorhombic(1.0, 2.0, 3.0),
            PrimitiveCell::monoclinic(1.0, 2.0, 3.0, 1.2),
            PrimitiveCell::base_centered_monoclinic(1.0, 2.0, 3.0, 1.2),
            PrimitiveCell::triclinic(1.0, 2.0, 3.0, 1.1, 1.3, 1.7),
        ];
        for cell in cases {
            assert_eq!(classify(cell), Ok(cell.bravais_lattice), "{:?}", cell);
        }
    }

    #[test]
    fn test_permuted_vectors() {
        let cell = PrimitiveCell::body_centered_tetragonal(1.0, 2.3);
        assert_eq!(
            find_lattice_type(cell.p3, cell.p1, cell.p2),
            Ok(BravaisLattice::BodyCenteredTetragonal)
        );
    }

    #[test]
    fn test_special_cases_resolve_to_specific_family() {
        // A rhombohedral cell with 90 degree angles is cubic.
        let cell = PrimitiveCell::rhombohedral(1.0, std::f64::consts::FRAC_PI_2);
        assert_eq!(classify(cell), Ok(BravaisLattice::Cubic));

        // A rhombohedral cell with 60 degree angles is face-centered cubic.
        let cell = PrimitiveCell::rhombohedral(1.0, std::f64::consts::FRAC_PI_3);
        assert_eq!(classify(cell), Ok(BravaisLattice::FaceCenteredCubic));

        // An orthorhombic cell with two equal edges is tetragonal.
        let cell = PrimitiveCell::orthorhombic(1.0, 2.0, 1.0);
        assert_eq!(classify(cell), Ok(BravaisLattice::Tetragonal));
    }

    #[test]
    fn test_degenerate_vectors() {
        let x = Point3::new(1.0, 0.0, 0.0);
        let y = Point3::new(0.0, 1.0, 0.0);
        assert_eq!(
            find_lattice_type(x, y, x + y),
            Err(CudsError::NoMatchingFamily)
        );
        assert_eq!(
            find_lattice_type(x, y, Point3::zero()),
            Err(CudsError::NoMatchingFamily)
        );
    }

    fn grid_points(vectors: [Point3; 3], size: [usize; 3], origin: Point3) -> Vec<Point3> {
        let mut points = Vec::new();
        for k in 0..size[2] {
            for j in 0..size[1] {
                for i in 0..size[0] {
                    points.push(
                        origin
                            + vectors[0] * i as f64
                            + vectors[1] * j as f64
                            + vectors[2] * k as f64,
                    );
                }
            }
        }
        points
    }

    #[test]
    fn test_guess_layout() {
        let cell = PrimitiveCell::body_centered_orthorhombic(0.1, 0.2, 0.3);
        let points = grid_points(cell.vectors(), [4, 3, 5], Point3::new(1.0, -2.0, 0.5));
        let layout = guess_lattice_layout(&points, &ClassifierConfig::default()).unwrap();
        assert_eq!(layout.size, [4, 3, 5]);
        for (guessed, expected) in layout.vectors.iter().zip(cell.vectors()) {
            assert!(guessed.approx_eq(expected, 1e-12));
        }
        assert_eq!(
            find_lattice_type(layout.vectors[0], layout.vectors[1], layout.vectors[2]),
            Ok(BravaisLattice::BodyCenteredOrthorhombic)
        );
    }

    #[test]
    fn test_guess_rejects_bad_ordering() {
        let cell = PrimitiveCell::cubic(1.0);
        let mut points = grid_points(cell.vectors(), [3, 3, 3], Point3::zero());
        points.swap(4, 20);
        let err = guess_primitive_vectors(&points).unwrap_err();
        assert!(matches!(err, CudsError::Index { .. }));

        // A single row carries no second vector.
        let row = grid_points(cell.vectors(), [5, 1, 1], Point3::zero());
        assert!(matches!(
            guess_primitive_vectors(&row),
            Err(CudsError::Index { .. })
        ));
    }
}
