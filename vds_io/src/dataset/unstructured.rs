use cuds_core::Point3;

use super::{check_connectivity, DataSet};
use crate::attributes::AttributeData;
use crate::cell_array::CellArray;
use crate::cell_type::CellType;
use crate::error::{Result, VdsError};

/// Explicit points with one connectivity array and a type per cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnstructuredGrid {
    points: Vec<Point3>,
    cells: CellArray,
    cell_types: Vec<CellType>,
    point_data: AttributeData,
    cell_data: AttributeData,
}

impl UnstructuredGrid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a grid from points, cells and cell types.
    ///
    /// # Errors
    /// `CellTypeCount` if the type array and the cells disagree in length.
    pub fn from_parts(
        points: Vec<Point3>,
        cells: CellArray,
        cell_types: Vec<CellType>,
    ) -> Result<Self> {
        if cells.len() != cell_types.len() {
            return Err(VdsError::CellTypeCount {
                types: cell_types.len(),
                cells: cells.len(),
            });
        }
        Ok(Self {
            points,
            cells,
            cell_types,
            ..Self::default()
        })
    }

    /// Point coordinates.
    #[inline]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Point coordinates, mutably.
    #[inline]
    pub fn points_mut(&mut self) -> &mut Vec<Point3> {
        &mut self.points
    }

    /// Connectivity.
    #[inline]
    pub fn cells(&self) -> &CellArray {
        &self.cells
    }

    /// Type of every cell.
    #[inline]
    pub fn cell_types(&self) -> &[CellType] {
        &self.cell_types
    }

    /// Append a cell, returning its id.
    ///
    /// # Errors
    /// `CellSize` if the point count does not fit the type.
    pub fn insert_next_cell(&mut self, cell_type: CellType, ids: &[usize]) -> Result<usize> {
        if !cell_type.accepts(ids.len()) {
            return Err(VdsError::CellSize {
                cell: self.cell_types.len(),
                cell_type: cell_type.name(),
                got: ids.len(),
            });
        }
        self.cells.push_cell(ids);
        self.cell_types.push(cell_type);
        Ok(self.cell_types.len() - 1)
    }

    /// Connectivity, cell types and per-cell arrays, for views that edit them
    /// together.
    pub fn cells_mut(&mut self) -> (&mut CellArray, &mut Vec<CellType>, &mut AttributeData) {
        (&mut self.cells, &mut self.cell_types, &mut self.cell_data)
    }
}

impl DataSet for UnstructuredGrid {
    fn number_of_points(&self) -> usize {
        self.points.len()
    }

    fn point(&self, id: usize) -> Option<Point3> {
        self.points.get(id).copied()
    }

    fn number_of_cells(&self) -> usize {
        self.cell_types.len()
    }

    fn cell(&self, id: usize) -> Option<(CellType, Vec<usize>)> {
        let ty = *self.cell_types.get(id)?;
        let ids = self.cells.iter().nth(id)?;
        Some((ty, ids.to_vec()))
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

    fn validate(&self) -> Result<()> {
        if self.cells.len() != self.cell_types.len() {
            return Err(VdsError::CellTypeCount {
                types: self.cell_types.len(),
                cells: self.cells.len(),
            });
        }
        self.point_data.check_tuples(self.number_of_points())?;
        self.cell_data.check_tuples(self.number_of_cells())?;
        check_connectivity(&self.cells, 0, self.points.len(), |i, _| {
            self.cell_types.get(i).copied()
        })
    }
}
