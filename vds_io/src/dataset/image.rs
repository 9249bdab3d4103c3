use cuds_core::{ravel_index, unravel_index, NodeIndex, Point3};

use super::DataSet;
use crate::attributes::AttributeData;
use crate::cell_type::CellType;
use crate::error::{Result, VdsError};

/// Regular grid: point `(i, j, k)` sits at `origin + (i, j, k) * spacing`.
///
/// Point ids run with `i` fastest. Cells are implicit: voxels for 3D grids,
/// pixels for 2D, lines for 1D and a single vertex for a lone point.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    origin: Point3,
    spacing: [f64; 3],
    dimensions: [usize; 3],
    point_data: AttributeData,
    cell_data: AttributeData,
}

impl ImageData {
    /// Create a grid with empty attribute data.
    ///
    /// # Errors
    /// `InvalidSpacing` unless every spacing is positive and finite.
    pub fn new(dimensions: [usize; 3], spacing: [f64; 3], origin: impl Into<Point3>) -> Result<Self> {
        if spacing.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(VdsError::InvalidSpacing { spacing });
        }
        Ok(Self {
            origin: origin.into(),
            spacing,
            dimensions,
            point_data: AttributeData::new(),
            cell_data: AttributeData::new(),
        })
    }

    /// Grid origin.
    #[inline]
    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Point spacing per axis.
    #[inline]
    pub fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    /// Points per axis.
    #[inline]
    pub fn dimensions(&self) -> [usize; 3] {
        self.dimensions
    }

    /// Point id of a structured index, `None` when out of bounds.
    #[inline]
    pub fn compute_point_id(&self, index: NodeIndex) -> Option<usize> {
        ravel_index(index, self.dimensions)
    }

    /// Structured index of a point id.
    #[inline]
    pub fn point_index(&self, id: usize) -> Option<NodeIndex> {
        unravel_index(id, self.dimensions)
    }

    /// Coordinates of a structured index (not bounds checked).
    pub fn coordinate(&self, index: NodeIndex) -> Point3 {
        let [i, j, k] = index;
        self.origin
            + Point3::new(
                i as f64 * self.spacing[0],
                j as f64 * self.spacing[1],
                k as f64 * self.spacing[2],
            )
    }

    fn active_axes(&self) -> Vec<usize> {
        (0..3).filter(|&a| self.dimensions[a] > 1).collect()
    }

    fn cell_dimensions(&self) -> [usize; 3] {
        let mut dims = [1; 3];
        for (axis, d) in self.dimensions.iter().enumerate() {
            if *d > 1 {
                dims[axis] = d - 1;
            }
        }
        dims
    }
}

impl DataSet for ImageData {
    fn number_of_points(&self) -> usize {
        self.dimensions.iter().product()
    }

    fn point(&self, id: usize) -> Option<Point3> {
        self.point_index(id).map(|index| self.coordinate(index))
    }

    fn number_of_cells(&self) -> usize {
        if self.number_of_points() == 0 {
            return 0;
        }
        self.cell_dimensions().iter().product()
    }

    fn cell(&self, id: usize) -> Option<(CellType, Vec<usize>)> {
        if id >= self.number_of_cells() {
            return None;
        }
        let base = unravel_index(id, self.cell_dimensions())?;
        let axes = self.active_axes();
        let cell_type = match axes.len() {
            0 => CellType::Vertex,
            1 => CellType::Line,
            2 => CellType::Pixel,
            _ => CellType::Voxel,
        };
        let ids = (0..1usize << axes.len())
            .map(|corner| {
                let mut index = base;
                for (bit, axis) in axes.iter().enumerate() {
                    index[*axis] += (corner >> bit) & 1;
                }
                self.compute_point_id(index)
            })
            .collect::<Option<Vec<_>>>()?;
        Some((cell_type, ids))
    }

    fn point_data(&self) -> &AttributeData {
        &self.point_data
    }

    fn point_data_mut(&mut self) -> &mut AttributeData {
        &mut self.point_data
    }

    fn cell_data(&self) -> &AttributeData {
        &self.cell_data
    }

    fn cell_data_mut(&mut self) -> &mut AttributeData {
        &mut self.cell_data
    }
}
