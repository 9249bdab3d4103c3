//! Dataset shapes and the capability set shared by all of them.
//!
//! - [`ImageData`]: regular grid described by origin, spacing and dimensions
//! - [`PolyData`]: explicit points with vertex, line and polygon cells
//! - [`UnstructuredGrid`]: explicit points with typed heterogeneous cells
//!
//! [`Dataset`] is the tagged sum over the three; code that only needs points,
//! cells and attribute arrays works through the [`DataSet`] trait.

mod image;
mod poly;
mod unstructured;

pub use image::ImageData;
pub use poly::PolyData;
pub use unstructured::UnstructuredGrid;

use cuds_core::Point3;
use tracing::debug;

use crate::attributes::AttributeData;
use crate::cell_array::CellArray;
use crate::cell_type::CellType;
use crate::error::{Result, VdsError};

/// Capabilities common to every dataset shape.
pub trait DataSet {
    /// Number of points.
    fn number_of_points(&self) -> usize;

    /// Coordinates of point `id`.
    fn point(&self, id: usize) -> Option<Point3>;

    /// Number of cells.
    fn number_of_cells(&self) -> usize;

    /// Type and point ids of cell `id`.
    fn cell(&self, id: usize) -> Option<(CellType, Vec<usize>)>;

    /// Per-point arrays.
    fn point_data(&self) -> &AttributeData;

    /// Per-point arrays, mutably.
    fn point_data_mut(&mut self) -> &mut AttributeData;

    /// Per-cell arrays.
    fn cell_data(&self) -> &AttributeData;

    /// Per-cell arrays, mutably.
    fn cell_data_mut(&mut self) -> &mut AttributeData;

    /// Check structural consistency: attribute arrays sized to the point and
    /// cell counts, connectivity within range.
    fn validate(&self) -> Result<()> {
        self.point_data().check_tuples(self.number_of_points())?;
        self.cell_data().check_tuples(self.number_of_cells())
    }
}

/// Which dataset shape a [`Dataset`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    /// [`ImageData`].
    Image,
    /// [`PolyData`].
    Poly,
    /// [`UnstructuredGrid`].
    Unstructured,
}

/// Any dataset shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    /// Regular grid.
    Image(ImageData),
    /// Points with vertex, line and polygon cells.
    Poly(PolyData),
    /// Points with typed cells.
    Unstructured(UnstructuredGrid),
}

macro_rules! delegate {
    ($self:ident, $d:ident => $e:expr) => {
        match $self {
            Dataset::Image($d) => $e,
            Dataset::Poly($d) => $e,
            Dataset::Unstructured($d) => $e,
        }
    };
}

impl Dataset {
    /// Shape tag.
    pub fn kind(&self) -> DatasetKind {
        match self {
            Dataset::Image(_) => DatasetKind::Image,
            Dataset::Poly(_) => DatasetKind::Poly,
            Dataset::Unstructured(_) => DatasetKind::Unstructured,
        }
    }

    /// The image data, if this is one.
    pub fn as_image(&self) -> Option<&ImageData> {
        match self {
            Dataset::Image(d) => Some(d),
            _ => None,
        }
    }

    /// The poly data, if this is one.
    pub fn as_poly(&self) -> Option<&PolyData> {
        match self {
            Dataset::Poly(d) => Some(d),
            _ => None,
        }
    }

    /// The unstructured grid, if this is one.
    pub fn as_unstructured(&self) -> Option<&UnstructuredGrid> {
        match self {
            Dataset::Unstructured(d) => Some(d),
            _ => None,
        }
    }
}

impl DataSet for Dataset {
    fn number_of_points(&self) -> usize {
        delegate!(self, d => d.number_of_points())
    }

    fn point(&self, id: usize) -> Option<Point3> {
        delegate!(self, d => d.point(id))
    }

    fn number_of_cells(&self) -> usize {
        delegate!(self, d => d.number_of_cells())
    }

    fn cell(&self, id: usize) -> Option<(CellType, Vec<usize>)> {
        delegate!(self, d => d.cell(id))
    }

    fn point_data(&self) -> &AttributeData {
        delegate!(self, d => d.point_data())
    }

    fn point_data_mut(&mut self) -> &mut AttributeData {
        delegate!(self, d => d.point_data_mut())
    }

    fn cell_data(&self) -> &AttributeData {
        delegate!(self, d => d.cell_data())
    }

    fn cell_data_mut(&mut self) -> &mut AttributeData {
        delegate!(self, d => d.cell_data_mut())
    }

    fn validate(&self) -> Result<()> {
        let result = delegate!(self, d => d.validate());
        if let Err(err) = &result {
            debug!(kind = ?self.kind(), error = %err, "dataset validation failed");
        }
        result
    }
}

impl From<ImageData> for Dataset {
    fn from(d: ImageData) -> Self {
        Dataset::Image(d)
    }
}

impl From<PolyData> for Dataset {
    fn from(d: PolyData) -> Self {
        Dataset::Poly(d)
    }
}

impl From<UnstructuredGrid> for Dataset {
    fn from(d: UnstructuredGrid) -> Self {
        Dataset::Unstructured(d)
    }
}

/// Check every block of `cells` against the point count and its cell type.
///
/// `first` is the dataset-wide index of the first block, `type_of` the type
/// of each block given its index within `cells` and its point count.
pub(crate) fn check_connectivity(
    cells: &CellArray,
    first: usize,
    points: usize,
    type_of: impl Fn(usize, usize) -> Option<CellType>,
) -> Result<()> {
    for (i, ids) in cells.iter().enumerate() {
        let cell = first + i;
        if let Some(&point) = ids.iter().find(|&&p| p >= points) {
            return Err(VdsError::PointOutOfRange {
                cell,
                point,
                points,
            });
        }
        match type_of(i, ids.len()) {
            Some(ty) if ty.accepts(ids.len()) => {}
            Some(ty) => {
                return Err(VdsError::CellSize {
                    cell,
                    cell_type: ty.name(),
                    got: ids.len(),
                })
            }
            None => {
                return Err(VdsError::CellSize {
                    cell,
                    cell_type: "UNKNOWN",
                    got: ids.len(),
                })
            }
        }
    }
    Ok(())
}
