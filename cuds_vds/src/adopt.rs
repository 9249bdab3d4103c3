//! Adoption of raw datasets as CUDS containers.

use cuds_core::{CudsError, Named, Result};
use tracing::debug;
use vds_io::{DataSet, Dataset, DatasetKind};

use crate::config::{AdoptConfig, AdoptKind};
use crate::error::is_type_error;
use crate::lattice::VdsLattice;
use crate::mesh::VdsMesh;
use crate::particles::VdsParticles;

/// Container produced by [`adapt2cuds`].
#[derive(Debug, Clone)]
pub enum Adapted {
    /// Particles over poly data.
    Particles(VdsParticles),
    /// Mesh over an unstructured grid.
    Mesh(VdsMesh),
    /// Lattice over image data or poly data.
    Lattice(VdsLattice),
}

impl Adapted {
    /// Container kind.
    pub fn kind(&self) -> AdoptKind {
        match self {
            Adapted::Particles(_) => AdoptKind::Particles,
            Adapted::Mesh(_) => AdoptKind::Mesh,
            Adapted::Lattice(_) => AdoptKind::Lattice,
        }
    }

    /// Container name.
    pub fn name(&self) -> &str {
        match self {
            Adapted::Particles(c) => c.name(),
            Adapted::Mesh(c) => c.name(),
            Adapted::Lattice(c) => c.name(),
        }
    }

    /// The particles container, if that is what was adopted.
    pub fn as_particles(&self) -> Option<&VdsParticles> {
        match self {
            Adapted::Particles(c) => Some(c),
            _ => None,
        }
    }

    /// The mesh container, if that is what was adopted.
    pub fn as_mesh(&self) -> Option<&VdsMesh> {
        match self {
            Adapted::Mesh(c) => Some(c),
            _ => None,
        }
    }

    /// The lattice container, if that is what was adopted.
    pub fn as_lattice(&self) -> Option<&VdsLattice> {
        match self {
            Adapted::Lattice(c) => Some(c),
            _ => None,
        }
    }

    /// Consume the container, returning its dataset.
    pub fn into_dataset(self) -> Dataset {
        match self {
            Adapted::Particles(c) => c.into_dataset().into(),
            Adapted::Mesh(c) => c.into_dataset().into(),
            Adapted::Lattice(c) => c.into_dataset(),
        }
    }
}

fn wrong_shape(kind: AdoptKind, shape: DatasetKind) -> CudsError {
    CudsError::type_error(format!("{shape:?} cannot be adopted as {kind:?}"))
}

fn adopt_as(dataset: Dataset, name: &str, kind: AdoptKind) -> Result<Adapted> {
    let shape = dataset.kind();
    match (kind, dataset) {
        (AdoptKind::Particles, Dataset::Poly(poly)) => {
            VdsParticles::from_dataset(name, poly).map(Adapted::Particles)
        }
        (AdoptKind::Mesh, Dataset::Unstructured(grid)) => {
            VdsMesh::from_dataset(name, grid).map(Adapted::Mesh)
        }
        (AdoptKind::Lattice, Dataset::Image(image)) => {
            VdsLattice::from_image(name, image).map(Adapted::Lattice)
        }
        (AdoptKind::Lattice, Dataset::Poly(poly)) => {
            VdsLattice::from_poly(name, poly).map(Adapted::Lattice)
        }
        _ => Err(wrong_shape(kind, shape)),
    }
}

/// Wrap a dataset in the container kind requested by `config`.
///
/// The dataset is copied and arrays listed in `config.rename_arrays` are
/// renamed on the copy; `dataset` itself is never modified. With
/// [`AdoptKind::Auto`] the kinds are tried in the order particles, mesh,
/// lattice and the first one that does not fail with a `Type` error wins.
///
/// # Errors
/// `Type` if no requested kind fits the dataset; `Value` for an invalid
/// configuration; any other error of the attempted adoption unchanged.
pub fn adapt2cuds(dataset: &Dataset, name: &str, config: &AdoptConfig) -> Result<Adapted> {
    config.validate().map_err(CudsError::value_error)?;
    let mut copy = dataset.clone();
    for (from, key) in &config.rename_arrays {
        let in_points = copy.point_data_mut().rename(from, key.name());
        let in_cells = copy.cell_data_mut().rename(from, key.name());
        if !(in_points || in_cells) {
            debug!(array = %from, "rename skipped, no such array");
        }
    }

    if config.kind != AdoptKind::Auto {
        return adopt_as(copy, name, config.kind);
    }

    let mut last = wrong_shape(AdoptKind::Auto, copy.kind());
    for kind in [AdoptKind::Particles, AdoptKind::Mesh, AdoptKind::Lattice] {
        match adopt_as(copy.clone(), name, kind) {
            Ok(adapted) => {
                debug!(name, ?kind, "adopted dataset");
                return Ok(adapted);
            }
            Err(error) if is_type_error(&error) => {
                debug!(name, ?kind, %error, "adoption rejected");
                last = error;
            }
            Err(error) => return Err(error),
        }
    }
    Err(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuds_core::{AttributeKey, AttributeValue, CudsItem, ErrorKind, MeshContainer};
    use vds_io::{CellArray, CellType, DataArray, ImageData, Point3, PolyData, UnstructuredGrid};

    fn tetra_hex_grid() -> UnstructuredGrid {
        let points = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [2.0, 0.0, 0.0],
            [3.0, 0.0, 0.0],
            [3.0, 1.0, 0.0],
            [2.0, 1.0, 0.0],
            [2.0, 0.0, 1.0],
            [3.0, 0.0, 1.0],
            [3.0, 1.0, 1.0],
            [2.0, 1.0, 1.0],
        ]
        .into_iter()
        .map(Point3::from)
        .collect();
        let cells = CellArray::from_cells([
            (0..4).collect::<Vec<usize>>(),
            (4..12).collect::<Vec<usize>>(),
        ]);
        let mut grid =
            UnstructuredGrid::from_parts(points, cells, vec![CellType::Tetra, CellType::Hexahedron])
                .unwrap();
        let scalars: Vec<f64> = (0..12).map(|i| i as f64 * 1.5).collect();
        grid.point_data_mut()
            .add(DataArray::from_f64("scalars", 1, scalars).unwrap());
        grid
    }

    #[test]
    fn test_auto_with_rename_adopts_mesh() {
        let dataset = Dataset::from(tetra_hex_grid());
        let config = AdoptConfig::default().rename("scalars", AttributeKey::Temperature);
        let adapted = adapt2cuds(&dataset, "grid", &config).unwrap();

        let mesh = adapted.as_mesh().unwrap();
        assert_eq!(adapted.kind(), AdoptKind::Mesh);
        assert_eq!(mesh.count_of(CudsItem::Cell).unwrap(), 2);
        let temperatures: Vec<_> = mesh
            .iter_points()
            .map(|p| p.data.get(AttributeKey::Temperature).cloned())
            .collect();
        let expected: Vec<_> = (0..12)
            .map(|i| Some(AttributeValue::Float(i as f64 * 1.5)))
            .collect();
        assert_eq!(temperatures, expected);

        assert!(dataset.point_data().contains("scalars"));
        assert!(!dataset.point_data().contains("TEMPERATURE"));
    }

    #[test]
    fn test_unknown_array_names_are_not_type_errors() {
        let dataset = Dataset::from(tetra_hex_grid());
        let err = adapt2cuds(&dataset, "grid", &AdoptConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDataset);
    }

    #[test]
    fn test_requested_kind_must_fit() {
        let image = ImageData::new([2, 2, 2], [1.0; 3], [0.0; 3]).unwrap();
        let dataset = Dataset::from(image);
        let err = adapt2cuds(&dataset, "img", &AdoptConfig::new(AdoptKind::Mesh)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);

        let adapted = adapt2cuds(&dataset, "img", &AdoptConfig::default()).unwrap();
        assert_eq!(adapted.kind(), AdoptKind::Lattice);
        assert_eq!(adapted.name(), "img");
    }

    #[test]
    fn test_auto_prefers_particles_for_poly_data() {
        let mut poly = PolyData::from_points(vec![Point3::zero(), Point3::new(1.0, 0.0, 0.0)]);
        poly.lines_mut().push_cell(&[0, 1]);
        let adapted =
            adapt2cuds(&Dataset::from(poly.clone()), "p", &AdoptConfig::default()).unwrap();
        assert_eq!(adapted.kind(), AdoptKind::Particles);

        poly.polys_mut().push_cell(&[0, 1, 0]);
        let err = adapt2cuds(&Dataset::from(poly), "p", &AdoptConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }
}
