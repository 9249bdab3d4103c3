//! CUDS items: points/particles, connectivity elements and lattice nodes.

use std::fmt;

use uuid::Uuid;

use crate::types::{NodeIndex, Point3};
use crate::value::DataContainer;

/// Kinds of items a container can be asked to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CudsItem {
    /// Particle of a particles container.
    Particle,
    /// Bond of a particles container.
    Bond,
    /// Point of a mesh.
    Point,
    /// Edge of a mesh.
    Edge,
    /// Face of a mesh.
    Face,
    /// Cell of a mesh.
    Cell,
    /// Node of a lattice.
    Node,
}

impl fmt::Display for CudsItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CudsItem::Particle => "PARTICLE",
            CudsItem::Bond => "BOND",
            CudsItem::Point => "POINT",
            CudsItem::Edge => "EDGE",
            CudsItem::Face => "FACE",
            CudsItem::Cell => "CELL",
            CudsItem::Node => "NODE",
        };
        f.write_str(name)
    }
}

/// A located item with identity: a mesh point or a particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    /// Identifier; assigned by the container on insertion when `None`.
    pub uid: Option<Uuid>,
    /// Position.
    pub coordinates: Point3,
    /// Attribute row.
    pub data: DataContainer,
}

/// Particles share the shape of mesh points.
pub type Particle = Point;

impl Point {
    /// Create a point without identifier.
    pub fn new(coordinates: impl Into<Point3>, data: DataContainer) -> Self {
        Self {
            uid: None,
            coordinates: coordinates.into(),
            data,
        }
    }

    /// Builder-style identifier setter.
    pub fn with_uid(mut self, uid: Uuid) -> Self {
        self.uid = Some(uid);
        self
    }
}

/// Mesh element families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// One-dimensional element.
    Edge,
    /// Two-dimensional element.
    Face,
    /// Three-dimensional element.
    Cell,
}

impl ElementKind {
    /// All kinds in export order.
    pub const ALL: [ElementKind; 3] = [ElementKind::Edge, ElementKind::Face, ElementKind::Cell];

    /// The matching [`CudsItem`].
    pub const fn item(self) -> CudsItem {
        match self {
            ElementKind::Edge => CudsItem::Edge,
            ElementKind::Face => CudsItem::Face,
            ElementKind::Cell => CudsItem::Cell,
        }
    }
}

/// An ordered list of point (or particle) references with identity.
///
/// Used for mesh edges, faces and cells and for particle bonds.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Identifier; assigned by the container on insertion when `None`.
    pub uid: Option<Uuid>,
    /// Referenced point/particle identifiers, in order.
    pub points: Vec<Uuid>,
    /// Attribute row.
    pub data: DataContainer,
}

/// A bond between particles.
pub type Bond = Element;
/// A mesh edge.
pub type Edge = Element;
/// A mesh face.
pub type Face = Element;
/// A mesh cell.
pub type Cell = Element;

impl Element {
    /// Create an element without identifier.
    pub fn new(points: Vec<Uuid>, data: DataContainer) -> Self {
        Self {
            uid: None,
            points,
            data,
        }
    }

    /// Builder-style identifier setter.
    pub fn with_uid(mut self, uid: Uuid) -> Self {
        self.uid = Some(uid);
        self
    }
}

/// A lattice node: identity is the index.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeNode {
    /// Node index.
    pub index: NodeIndex,
    /// Attribute row.
    pub data: DataContainer,
}

impl LatticeNode {
    /// Create a node.
    pub fn new(index: NodeIndex, data: DataContainer) -> Self {
        Self { index, data }
    }
}
