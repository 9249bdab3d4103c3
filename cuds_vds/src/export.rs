//! Conversion of CUDS containers into datasets.
//!
//! Works on any container through the container traits. Rows are gathered
//! with expanding [`DataAccumulator`]s, so every representable key present on
//! at least one item becomes an array.

use std::collections::HashMap;

use cuds_core::{
    CudsError, ElementKind, LatticeContainer, MeshContainer, ParticlesContainer, Result,
};
use tracing::debug;
use uuid::Uuid;
use vds_io::{CellType, DataSet, Dataset, ImageData, PolyData, UnstructuredGrid};

use crate::accumulator::DataAccumulator;
use crate::lattice::axis_spacing;
use crate::mesh::family_of;

/// Borrowed container of any kind.
#[derive(Clone, Copy)]
pub enum CudsRef<'a> {
    /// Particles container.
    Particles(&'a dyn ParticlesContainer),
    /// Mesh container.
    Mesh(&'a dyn MeshContainer),
    /// Lattice container.
    Lattice(&'a dyn LatticeContainer),
}

impl std::fmt::Debug for CudsRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CudsRef::Particles(c) => f.debug_tuple("Particles").field(&c.name()).finish(),
            CudsRef::Mesh(c) => f.debug_tuple("Mesh").field(&c.name()).finish(),
            CudsRef::Lattice(c) => f.debug_tuple("Lattice").field(&c.name()).finish(),
        }
    }
}

/// Convert any container into the matching dataset shape.
pub fn cuds2vds(container: CudsRef<'_>) -> Result<Dataset> {
    match container {
        CudsRef::Particles(c) => particles2vds(c).map(Dataset::from),
        CudsRef::Mesh(c) => mesh2vds(c).map(Dataset::from),
        CudsRef::Lattice(c) => lattice2vds(c),
    }
}

fn index_of(indices: &HashMap<Uuid, usize>, uid: &Uuid) -> Result<usize> {
    indices
        .get(uid)
        .copied()
        .ok_or(CudsError::UnknownUid { uid: *uid })
}

/// Particles as points, bonds as poly lines.
///
/// # Errors
/// `UnknownUid` if a bond references a particle the container does not hold.
pub fn particles2vds(container: &dyn ParticlesContainer) -> Result<PolyData> {
    let mut poly = PolyData::new();
    let mut indices = HashMap::new();
    let mut point_rows = DataAccumulator::expanding();
    for (i, particle) in container.iter_particles().enumerate() {
        if let Some(uid) = particle.uid {
            indices.insert(uid, i);
        }
        poly.points_mut().push(particle.coordinates);
        point_rows.append(&particle.data);
    }

    let mut bond_rows = DataAccumulator::expanding();
    for bond in container.iter_bonds() {
        let ids = bond
            .points
            .iter()
            .map(|uid| index_of(&indices, uid))
            .collect::<Result<Vec<_>>>()?;
        poly.lines_mut().push_cell(&ids);
        bond_rows.append(&bond.data);
    }

    point_rows.load_onto(poly.point_data_mut())?;
    bond_rows.load_onto(poly.cell_data_mut())?;
    debug!(
        name = container.name(),
        points = poly.points().len(),
        lines = poly.lines().len(),
        "exported particles"
    );
    Ok(poly)
}

/// Points and elements as an unstructured grid, elements ordered edges,
/// faces, cells.
///
/// # Errors
/// `UnknownUid` for dangling point references; `Value` for an element whose
/// point count has no cell type.
pub fn mesh2vds(container: &dyn MeshContainer) -> Result<UnstructuredGrid> {
    let mut grid = UnstructuredGrid::new();
    let mut indices = HashMap::new();
    let mut point_rows = DataAccumulator::expanding();
    for (i, point) in container.iter_points().enumerate() {
        if let Some(uid) = point.uid {
            indices.insert(uid, i);
        }
        grid.points_mut().push(point.coordinates);
        point_rows.append(&point.data);
    }

    let mut element_rows = DataAccumulator::expanding();
    for kind in ElementKind::ALL {
        for element in container.iter_elements(kind) {
            let ids = element
                .points
                .iter()
                .map(|uid| index_of(&indices, uid))
                .collect::<Result<Vec<_>>>()?;
            let cell_type = CellType::for_element(family_of(kind), ids.len()).ok_or_else(|| {
                CudsError::value_error(format!(
                    "no {kind:?} cell type has {} points",
                    ids.len()
                ))
            })?;
            grid.insert_next_cell(cell_type, &ids)?;
            element_rows.append(&element.data);
        }
    }

    point_rows.load_onto(grid.point_data_mut())?;
    element_rows.load_onto(grid.cell_data_mut())?;
    debug!(
        name = container.name(),
        points = grid.points().len(),
        cells = grid.cell_types().len(),
        "exported mesh"
    );
    Ok(grid)
}

/// Spacing of an axis-aligned family whose vectors run along the axes.
fn image_spacing(container: &dyn LatticeContainer) -> Option<[f64; 3]> {
    let cell = container.primitive_cell();
    if !cell.bravais_lattice.is_axis_aligned() {
        return None;
    }
    axis_spacing(cell.vectors())
}

/// Lattice nodes as image data when the cell is axis aligned, otherwise as
/// poly data with one point per node in flat order.
pub fn lattice2vds(container: &dyn LatticeContainer) -> Result<Dataset> {
    let size = container.size();
    let mut dataset = match image_spacing(container) {
        Some(spacing) => Dataset::Image(
            ImageData::new(size, spacing, container.origin())
                .map_err(|e| CudsError::value_error(e.to_string()))?,
        ),
        None => {
            let points = container
                .iter_nodes()
                .map(|node| container.get_coordinate(node.index))
                .collect::<Result<Vec<_>>>()?;
            Dataset::Poly(PolyData::from_points(points))
        }
    };

    let mut node_rows = DataAccumulator::expanding();
    for node in container.iter_nodes() {
        node_rows.append(&node.data);
    }
    node_rows.load_onto(dataset.point_data_mut())?;
    debug!(
        name = container.name(),
        kind = ?dataset.kind(),
        nodes = node_rows.len(),
        "exported lattice"
    );
    Ok(dataset)
}
