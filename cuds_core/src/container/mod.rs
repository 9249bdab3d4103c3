//! Container interfaces and in-memory implementations.
//!
//! The traits are object safe so that engines and exporters can work over
//! `dyn` containers; bulk helpers are restricted to sized implementors.

mod lattice;
mod mesh;
mod particles;

pub use lattice::Lattice;
pub use mesh::Mesh;
pub use particles::Particles;

use uuid::Uuid;

use crate::cuds::{Bond, CudsItem, Element, ElementKind, LatticeNode, Particle, Point};
use crate::error::{CudsError, Result};
use crate::primitive_cell::PrimitiveCell;
use crate::types::{NodeIndex, Point3};
use crate::value::DataContainer;

/// Named container with a container-level data row.
pub trait Named {
    /// Container name.
    fn name(&self) -> &str;

    /// Rename the container.
    fn set_name(&mut self, name: String);

    /// Container-level data.
    fn data(&self) -> &DataContainer;

    /// Replace the container-level data.
    fn set_data(&mut self, data: DataContainer);
}

/// Particles and the bonds between them.
pub trait ParticlesContainer: Named {
    /// Add a particle, assigning a fresh identifier when it has none.
    ///
    /// # Errors
    /// `Value` if the identifier is already used.
    fn add_particle(&mut self, particle: Particle) -> Result<Uuid>;

    /// Overwrite a stored particle.
    ///
    /// # Errors
    /// `UnknownUid` if the particle is not stored.
    fn update_particle(&mut self, particle: &Particle) -> Result<()>;

    /// Particle by identifier.
    fn get_particle(&self, uid: Uuid) -> Result<Particle>;

    /// Remove a particle.
    ///
    /// # Errors
    /// `UnknownUid` if absent; `Value` if a bond still references it.
    fn remove_particle(&mut self, uid: Uuid) -> Result<()>;

    /// True if the particle is stored.
    fn has_particle(&self, uid: Uuid) -> bool;

    /// Iterate over all particles.
    fn iter_particles(&self) -> Box<dyn Iterator<Item = Particle> + '_>;

    /// Add a bond, assigning a fresh identifier when it has none.
    ///
    /// # Errors
    /// `Value` if the identifier is already used; `UnknownUid` if a
    /// referenced particle is not stored.
    fn add_bond(&mut self, bond: Bond) -> Result<Uuid>;

    /// Overwrite a stored bond.
    fn update_bond(&mut self, bond: &Bond) -> Result<()>;

    /// Bond by identifier.
    fn get_bond(&self, uid: Uuid) -> Result<Bond>;

    /// Remove a bond.
    fn remove_bond(&mut self, uid: Uuid) -> Result<()>;

    /// True if the bond is stored.
    fn has_bond(&self, uid: Uuid) -> bool;

    /// Iterate over all bonds.
    fn iter_bonds(&self) -> Box<dyn Iterator<Item = Bond> + '_>;

    /// Number of particles or bonds.
    ///
    /// # Errors
    /// `Value` for any other item kind.
    fn count_of(&self, item: CudsItem) -> Result<usize>;

    /// Add several particles, stopping at the first failure.
    fn add_particles(&mut self, particles: impl IntoIterator<Item = Particle>) -> Result<Vec<Uuid>>
    where
        Self: Sized,
    {
        particles.into_iter().map(|p| self.add_particle(p)).collect()
    }

    /// Add several bonds, stopping at the first failure.
    fn add_bonds(&mut self, bonds: impl IntoIterator<Item = Bond>) -> Result<Vec<Uuid>>
    where
        Self: Sized,
    {
        bonds.into_iter().map(|b| self.add_bond(b)).collect()
    }
}

/// Points plus edge, face and cell connectivity.
pub trait MeshContainer: Named {
    /// Add a point, assigning a fresh identifier when it has none.
    fn add_point(&mut self, point: Point) -> Result<Uuid>;

    /// Overwrite a stored point.
    fn update_point(&mut self, point: &Point) -> Result<()>;

    /// Point by identifier.
    fn get_point(&self, uid: Uuid) -> Result<Point>;

    /// True if the point is stored.
    fn has_point(&self, uid: Uuid) -> bool;

    /// Iterate over all points.
    fn iter_points(&self) -> Box<dyn Iterator<Item = Point> + '_>;

    /// Add an element of the given kind.
    ///
    /// # Errors
    /// `Value` on a duplicate identifier or an unsupported point count;
    /// `UnknownUid` if a referenced point is not stored.
    fn add_element(&mut self, kind: ElementKind, element: Element) -> Result<Uuid>;

    /// Overwrite a stored element of the given kind.
    fn update_element(&mut self, kind: ElementKind, element: &Element) -> Result<()>;

    /// Element of the given kind by identifier.
    fn get_element(&self, kind: ElementKind, uid: Uuid) -> Result<Element>;

    /// True if an element of the given kind has this identifier.
    fn has_element(&self, kind: ElementKind, uid: Uuid) -> bool;

    /// Iterate over elements of one kind.
    fn iter_elements(&self, kind: ElementKind) -> Box<dyn Iterator<Item = Element> + '_>;

    /// Number of points, edges, faces or cells.
    fn count_of(&self, item: CudsItem) -> Result<usize>;

    /// True if at least one element of the kind is stored.
    fn has_elements(&self, kind: ElementKind) -> bool {
        self.iter_elements(kind).next().is_some()
    }

    /// Add an edge.
    fn add_edge(&mut self, edge: Element) -> Result<Uuid> {
        self.add_element(ElementKind::Edge, edge)
    }

    /// Add a face.
    fn add_face(&mut self, face: Element) -> Result<Uuid> {
        self.add_element(ElementKind::Face, face)
    }

    /// Add a cell.
    fn add_cell(&mut self, cell: Element) -> Result<Uuid> {
        self.add_element(ElementKind::Cell, cell)
    }

    /// Edge by identifier.
    fn get_edge(&self, uid: Uuid) -> Result<Element> {
        self.get_element(ElementKind::Edge, uid)
    }

    /// Face by identifier.
    fn get_face(&self, uid: Uuid) -> Result<Element> {
        self.get_element(ElementKind::Face, uid)
    }

    /// Cell by identifier.
    fn get_cell(&self, uid: Uuid) -> Result<Element> {
        self.get_element(ElementKind::Cell, uid)
    }

    /// Overwrite a stored edge.
    fn update_edge(&mut self, edge: &Element) -> Result<()> {
        self.update_element(ElementKind::Edge, edge)
    }

    /// Overwrite a stored face.
    fn update_face(&mut self, face: &Element) -> Result<()> {
        self.update_element(ElementKind::Face, face)
    }

    /// Overwrite a stored cell.
    fn update_cell(&mut self, cell: &Element) -> Result<()> {
        self.update_element(ElementKind::Cell, cell)
    }

    /// True if any edge is stored.
    fn has_edges(&self) -> bool {
        self.has_elements(ElementKind::Edge)
    }

    /// True if any face is stored.
    fn has_faces(&self) -> bool {
        self.has_elements(ElementKind::Face)
    }

    /// True if any cell is stored.
    fn has_cells(&self) -> bool {
        self.has_elements(ElementKind::Cell)
    }

    /// Iterate over edges.
    fn iter_edges(&self) -> Box<dyn Iterator<Item = Element> + '_> {
        self.iter_elements(ElementKind::Edge)
    }

    /// Iterate over faces.
    fn iter_faces(&self) -> Box<dyn Iterator<Item = Element> + '_> {
        self.iter_elements(ElementKind::Face)
    }

    /// Iterate over cells.
    fn iter_cells(&self) -> Box<dyn Iterator<Item = Element> + '_> {
        self.iter_elements(ElementKind::Cell)
    }

    /// Add several points, stopping at the first failure.
    fn add_points(&mut self, points: impl IntoIterator<Item = Point>) -> Result<Vec<Uuid>>
    where
        Self: Sized,
    {
        points.into_iter().map(|p| self.add_point(p)).collect()
    }

    /// Add several elements of one kind, stopping at the first failure.
    fn add_elements(
        &mut self,
        kind: ElementKind,
        elements: impl IntoIterator<Item = Element>,
    ) -> Result<Vec<Uuid>>
    where
        Self: Sized,
    {
        elements
            .into_iter()
            .map(|e| self.add_element(kind, e))
            .collect()
    }
}

/// A regular grid of nodes described by a primitive cell.
pub trait LatticeContainer: Named {
    /// Primitive cell of the lattice.
    fn primitive_cell(&self) -> &PrimitiveCell;

    /// Number of nodes along each primitive direction.
    fn size(&self) -> [usize; 3];

    /// Coordinate of node `(0, 0, 0)`.
    fn origin(&self) -> Point3;

    /// Node at `index`.
    ///
    /// # Errors
    /// `NodeIndex` if the index is outside the lattice.
    fn get_node(&self, index: NodeIndex) -> Result<LatticeNode>;

    /// Overwrite the data of a node.
    fn update_node(&mut self, node: &LatticeNode) -> Result<()>;

    /// Coordinate of the node at `index`.
    fn get_coordinate(&self, index: NodeIndex) -> Result<Point3>;

    /// Iterate over all nodes, the first index varying fastest.
    fn iter_nodes(&self) -> Box<dyn Iterator<Item = LatticeNode> + '_>;

    /// Iterate over the given nodes.
    fn iter_nodes_at<'a>(
        &'a self,
        indices: &'a [NodeIndex],
    ) -> Box<dyn Iterator<Item = Result<LatticeNode>> + 'a> {
        Box::new(indices.iter().map(move |index| self.get_node(*index)))
    }

    /// Number of nodes.
    fn count_of(&self, item: CudsItem) -> Result<usize> {
        match item {
            CudsItem::Node => Ok(self.size().iter().product()),
            other => Err(unsupported_item(other)),
        }
    }
}

/// Error for `count_of` on an item kind the container does not hold.
pub(crate) fn unsupported_item(item: CudsItem) -> CudsError {
    CudsError::value_error(format!("item {item} is not supported by this container"))
}

/// Reject a zero extent along any axis.
///
/// # Errors
/// `Value` naming the offending size.
pub fn check_lattice_size(size: [usize; 3]) -> Result<()> {
    if size.contains(&0) {
        return Err(CudsError::value_error(format!(
            "lattice size {size:?} must be positive along every axis"
        )));
    }
    Ok(())
}
