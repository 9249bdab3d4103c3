use cuds_core::Point3;

use super::{check_connectivity, DataSet};
use crate::attributes::AttributeData;
use crate::cell_array::CellArray;
use crate::cell_type::{CellFamily, CellType};
use crate::error::Result;

/// Explicit points with three cell categories.
///
/// Each category owns its own connectivity array. Dataset-wide cell ids run
/// over vertices first, then lines, then polygons; per-cell arrays follow the
/// same order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolyData {
    points: Vec<Point3>,
    verts: CellArray,
    lines: CellArray,
    polys: CellArray,
    point_data: AttributeData,
    cell_data: AttributeData,
}

fn category_type(family: CellFamily, n: usize) -> Option<CellType> {
    CellType::for_element(family, n)
}

impl PolyData {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dataset holding only points.
    pub fn from_points(points: Vec<Point3>) -> Self {
        Self {
            points,
            ..Self::default()
        }
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

    /// Vertex cells.
    #[inline]
    pub fn verts(&self) -> &CellArray {
        &self.verts
    }

    /// Vertex cells, mutably.
    #[inline]
    pub fn verts_mut(&mut self) -> &mut CellArray {
        &mut self.verts
    }

    /// Line and polyline cells.
    #[inline]
    pub fn lines(&self) -> &CellArray {
        &self.lines
    }

    /// Line and polyline cells, mutably.
    #[inline]
    pub fn lines_mut(&mut self) -> &mut CellArray {
        &mut self.lines
    }

    /// Polygon cells.
    #[inline]
    pub fn polys(&self) -> &CellArray {
        &self.polys
    }

    /// Polygon cells, mutably.
    #[inline]
    pub fn polys_mut(&mut self) -> &mut CellArray {
        &mut self.polys
    }

    /// All cells merged into one connectivity array with a type per cell.
    pub fn connectivity(&self) -> (CellArray, Vec<CellType>) {
        let mut merged = CellArray::new();
        let mut types = Vec::with_capacity(self.number_of_cells());
        let categories = [
            (&self.verts, CellFamily::Vertex),
            (&self.lines, CellFamily::Edge),
            (&self.polys, CellFamily::Face),
        ];
        for (cells, family) in categories {
            for ids in cells {
                merged.push_cell(ids);
                types.push(category_type(family, ids.len()).unwrap_or(CellType::PolyVertex));
            }
        }
        (merged, types)
    }
}

impl DataSet for PolyData {
    fn number_of_points(&self) -> usize {
        self.points.len()
    }

    fn point(&self, id: usize) -> Option<Point3> {
        self.points.get(id).copied()
    }

    fn number_of_cells(&self) -> usize {
        self.verts.len() + self.lines.len() + self.polys.len()
    }

    fn cell(&self, id: usize) -> Option<(CellType, Vec<usize>)> {
        let mut local = id;
        let categories = [
            (&self.verts, CellFamily::Vertex),
            (&self.lines, CellFamily::Edge),
            (&self.polys, CellFamily::Face),
        ];
        for (cells, family) in categories {
            if local < cells.len() {
                let ids = cells.iter().nth(local)?;
                return Some((category_type(family, ids.len())?, ids.to_vec()));
            }
            local -= cells.len();
        }
        None
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
        self.point_data.check_tuples(self.number_of_points())?;
        self.cell_data.check_tuples(self.number_of_cells())?;
        let n = self.points.len();
        check_connectivity(&self.verts, 0, n, |_, len| {
            category_type(CellFamily::Vertex, len)
        })?;
        check_connectivity(&self.lines, self.verts.len(), n, |_, len| {
            category_type(CellFamily::Edge, len)
        })?;
        check_connectivity(&self.polys, self.verts.len() + self.lines.len(), n, |_, len| {
            category_type(CellFamily::Face, len)
        })
    }
}
