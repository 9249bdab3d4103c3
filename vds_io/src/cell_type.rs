//! Cell type registry with visualization toolkit tags.

use std::fmt;

use crate::error::{Result, VdsError};

/// Topological family of a cell type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellFamily {
    /// Points.
    Vertex,
    /// Curves.
    Edge,
    /// Surfaces.
    Face,
    /// Solids.
    Volume,
}

/// Linear cell types, discriminants are the toolkit tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CellType {
    /// Single point.
    Vertex = 1,
    /// Point set.
    PolyVertex = 2,
    /// Two-point segment.
    Line = 3,
    /// Connected segments.
    PolyLine = 4,
    /// Three-point face.
    Triangle = 5,
    /// Strip of triangles.
    TriangleStrip = 6,
    /// Arbitrary planar face.
    Polygon = 7,
    /// Axis-aligned quad with grid point order.
    Pixel = 8,
    /// Four-point face.
    Quad = 9,
    /// Four-point solid.
    Tetra = 10,
    /// Axis-aligned hexahedron with grid point order.
    Voxel = 11,
    /// Eight-point solid.
    Hexahedron = 12,
    /// Six-point prism.
    Wedge = 13,
    /// Five-point pyramid.
    Pyramid = 14,
    /// Ten-point prism.
    PentagonalPrism = 15,
    /// Twelve-point prism.
    HexagonalPrism = 16,
}

impl CellType {
    /// Every registered type in tag order.
    pub const ALL: [CellType; 16] = [
        CellType::Vertex,
        CellType::PolyVertex,
        CellType::Line,
        CellType::PolyLine,
        CellType::Triangle,
        CellType::TriangleStrip,
        CellType::Polygon,
        CellType::Pixel,
        CellType::Quad,
        CellType::Tetra,
        CellType::Voxel,
        CellType::Hexahedron,
        CellType::Wedge,
        CellType::Pyramid,
        CellType::PentagonalPrism,
        CellType::HexagonalPrism,
    ];

    /// Toolkit tag.
    #[inline]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Type for a toolkit tag.
    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            1..=16 => Ok(Self::ALL[usize::from(tag) - 1]),
            _ => Err(VdsError::UnknownCellType { tag }),
        }
    }

    /// Topological family.
    pub const fn family(self) -> CellFamily {
        match self {
            CellType::Vertex | CellType::PolyVertex => CellFamily::Vertex,
            CellType::Line | CellType::PolyLine => CellFamily::Edge,
            CellType::Triangle
            | CellType::TriangleStrip
            | CellType::Polygon
            | CellType::Pixel
            | CellType::Quad => CellFamily::Face,
            CellType::Tetra
            | CellType::Voxel
            | CellType::Hexahedron
            | CellType::Wedge
            | CellType::Pyramid
            | CellType::PentagonalPrism
            | CellType::HexagonalPrism => CellFamily::Volume,
        }
    }

    /// Point count for fixed-size types, `None` for variable-size ones.
    pub const fn fixed_points(self) -> Option<usize> {
        match self {
            CellType::Vertex => Some(1),
            CellType::Line => Some(2),
            CellType::Triangle => Some(3),
            CellType::Pixel | CellType::Quad | CellType::Tetra => Some(4),
            CellType::Pyramid => Some(5),
            CellType::Wedge => Some(6),
            CellType::Voxel | CellType::Hexahedron => Some(8),
            CellType::PentagonalPrism => Some(10),
            CellType::HexagonalPrism => Some(12),
            CellType::PolyVertex
            | CellType::PolyLine
            | CellType::TriangleStrip
            | CellType::Polygon => None,
        }
    }

    /// Smallest valid point count.
    pub const fn min_points(self) -> usize {
        match self.fixed_points() {
            Some(n) => n,
            None => match self {
                CellType::TriangleStrip => 3,
                _ => 1,
            },
        }
    }

    /// True if `n` points form a valid cell of this type.
    pub const fn accepts(self, n: usize) -> bool {
        match self.fixed_points() {
            Some(fixed) => n == fixed,
            None => n >= self.min_points(),
        }
    }

    /// Type used when storing an element of `family` with `points` points.
    ///
    /// Edges of other than two points become polylines and faces of other than
    /// three or four points become polygons. Returns `None` for an element
    /// without points and for volumes of unsupported size.
    pub const fn for_element(family: CellFamily, points: usize) -> Option<CellType> {
        match family {
            CellFamily::Vertex => match points {
                0 => None,
                1 => Some(CellType::Vertex),
                _ => Some(CellType::PolyVertex),
            },
            CellFamily::Edge => match points {
                0 => None,
                2 => Some(CellType::Line),
                _ => Some(CellType::PolyLine),
            },
            CellFamily::Face => match points {
                0 => None,
                3 => Some(CellType::Triangle),
                4 => Some(CellType::Quad),
                _ => Some(CellType::Polygon),
            },
            CellFamily::Volume => match points {
                4 => Some(CellType::Tetra),
                5 => Some(CellType::Pyramid),
                6 => Some(CellType::Wedge),
                8 => Some(CellType::Hexahedron),
                10 => Some(CellType::PentagonalPrism),
                12 => Some(CellType::HexagonalPrism),
                _ => None,
            },
        }
    }

    /// Upper-case toolkit name without prefix.
    pub const fn name(self) -> &'static str {
        match self {
            CellType::Vertex => "VERTEX",
            CellType::PolyVertex => "POLY_VERTEX",
            CellType::Line => "LINE",
            CellType::PolyLine => "POLY_LINE",
            CellType::Triangle => "TRIANGLE",
            CellType::TriangleStrip => "TRIANGLE_STRIP",
            CellType::Polygon => "POLYGON",
            CellType::Pixel => "PIXEL",
            CellType::Quad => "QUAD",
            CellType::Tetra => "TETRA",
            CellType::Voxel => "VOXEL",
            CellType::Hexahedron => "HEXAHEDRON",
            CellType::Wedge => "WEDGE",
            CellType::Pyramid => "PYRAMID",
            CellType::PentagonalPrism => "PENTAGONAL_PRISM",
            CellType::HexagonalPrism => "HEXAGONAL_PRISM",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
