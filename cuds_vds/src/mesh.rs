//! Mesh container stored in an unstructured grid.
//!
//! Edges, faces and cells share the grid's single connectivity array and are
//! told apart by the family of their cell type. Element UIDs therefore form
//! one identity map over all cells.

use cuds_core::{
    CudsError, CudsItem, DataContainer, Element, ElementKind, MeshContainer, Named, Point, Result,
};
use tracing::{debug, warn};
use uuid::Uuid;
use vds_io::{AttributeData, CellFamily, CellType, DataSet, UnstructuredGrid};

use crate::attribute_table::{AttributeTable, TableState};
use crate::cell_collection::CellCollection;
use crate::error::{read_or_warn, require_uid};
use crate::identity::IdentityMap;

type Table<'a> = AttributeTable<&'a AttributeData, &'a TableState>;
type TableMut<'a> = AttributeTable<&'a mut AttributeData, &'a mut TableState>;

/// Cell family holding elements of `kind`.
pub const fn family_of(kind: ElementKind) -> CellFamily {
    match kind {
        ElementKind::Edge => CellFamily::Edge,
        ElementKind::Face => CellFamily::Face,
        ElementKind::Cell => CellFamily::Volume,
    }
}

/// Points, edges, faces and cells backed by an [`UnstructuredGrid`].
#[derive(Debug, Clone)]
pub struct VdsMesh {
    name: String,
    data: DataContainer,
    grid: UnstructuredGrid,
    point_state: TableState,
    element_state: TableState,
    points: IdentityMap,
    elements: IdentityMap,
}

impl VdsMesh {
    /// Create an empty mesh.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: DataContainer::new(),
            grid: UnstructuredGrid::new(),
            point_state: TableState::new(),
            element_state: TableState::new(),
            points: IdentityMap::new(),
            elements: IdentityMap::new(),
        }
    }

    /// Adopt an unstructured grid, giving every point and cell a fresh UID.
    ///
    /// # Errors
    /// `Type` if the grid holds vertex cells; `InvalidDataset` if its arrays
    /// or connectivity are malformed.
    pub fn from_dataset(name: impl Into<String>, grid: UnstructuredGrid) -> Result<Self> {
        let name = name.into();
        if let Some(ty) = grid
            .cell_types()
            .iter()
            .find(|ty| ty.family() == CellFamily::Vertex)
        {
            return Err(CudsError::type_error(format!(
                "{ty} cells have no mesh element counterpart"
            )));
        }
        grid.validate()?;
        let point_state = TableState::adopt(grid.point_data())?;
        let element_state = TableState::adopt(grid.cell_data())?;
        let points = IdentityMap::with_fresh_uids(grid.number_of_points());
        let elements = IdentityMap::with_fresh_uids(grid.number_of_cells());
        debug!(
            name = %name,
            points = points.len(),
            elements = elements.len(),
            "adopted unstructured grid as mesh"
        );
        Ok(Self {
            name,
            data: DataContainer::new(),
            grid,
            point_state: point_state.with_virtual_size(points.len()),
            element_state: element_state.with_virtual_size(elements.len()),
            points,
            elements,
        })
    }

    /// Copy any mesh container, keeping UIDs.
    ///
    /// Elements are added edges first, then faces, then cells.
    pub fn from_mesh(source: &dyn MeshContainer) -> Result<Self> {
        let mut target = Self::empty(source.name());
        target.data = source.data().clone();
        for point in source.iter_points() {
            target.add_point(point)?;
        }
        for kind in ElementKind::ALL {
            for element in source.iter_elements(kind) {
                target.add_element(kind, element)?;
            }
        }
        Ok(target)
    }

    /// Backing dataset.
    pub fn dataset(&self) -> &UnstructuredGrid {
        &self.grid
    }

    /// Consume the container, returning the dataset.
    pub fn into_dataset(self) -> UnstructuredGrid {
        self.grid
    }

    fn point_table(&self) -> Result<Table<'_>> {
        AttributeTable::new(self.grid.point_data(), &self.point_state)
    }

    fn point_table_mut(&mut self) -> Result<TableMut<'_>> {
        AttributeTable::new(self.grid.point_data_mut(), &mut self.point_state)
    }

    fn element_table(&self) -> Result<Table<'_>> {
        AttributeTable::new(self.grid.cell_data(), &self.element_state)
    }

    fn element_table_mut(&mut self) -> Result<TableMut<'_>> {
        AttributeTable::new(self.grid.cell_data_mut(), &mut self.element_state)
    }

    fn point_at(&self, index: usize) -> Result<Point> {
        Ok(Point {
            uid: Some(self.points.uid_at(index)?),
            coordinates: self.grid.points()[index],
            data: self.point_table()?.get(index)?,
        })
    }

    fn element_from(&self, index: usize, ids: &[usize], table: &Table<'_>) -> Result<Element> {
        let points = ids
            .iter()
            .map(|i| self.points.uid_at(*i))
            .collect::<Result<Vec<_>>>()?;
        Ok(Element {
            uid: Some(self.elements.uid_at(index)?),
            points,
            data: table.get(index)?,
        })
    }

    /// Index of element `uid` if it is stored as an element of `kind`.
    fn element_index(&self, kind: ElementKind, uid: &Uuid) -> Result<usize> {
        let index = self.elements.index_of(uid)?;
        match self.grid.cell_types().get(index) {
            Some(ty) if ty.family() == family_of(kind) => Ok(index),
            _ => Err(CudsError::UnknownUid { uid: *uid }),
        }
    }

    fn point_indices(&self, element: &Element) -> Result<Vec<usize>> {
        element
            .points
            .iter()
            .map(|uid| self.points.index_of(uid))
            .collect()
    }
}

fn cell_type_for(kind: ElementKind, points: usize) -> Result<CellType> {
    CellType::for_element(family_of(kind), points).ok_or_else(|| {
        CudsError::value_error(format!("no {kind:?} cell type has {points} points"))
    })
}

impl Named for VdsMesh {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn data(&self) -> &DataContainer {
        &self.data
    }

    fn set_data(&mut self, data: DataContainer) {
        self.data = data;
    }
}

impl MeshContainer for VdsMesh {
    fn add_point(&mut self, point: Point) -> Result<Uuid> {
        let uid = point.uid.unwrap_or_else(Uuid::new_v4);
        if self.points.contains(&uid) {
            return Err(CudsError::value_error(format!("point {uid} already exists")));
        }
        self.point_table_mut()?.push(&point.data)?;
        self.grid.points_mut().push(point.coordinates);
        self.points.push(uid)?;
        Ok(uid)
    }

    fn update_point(&mut self, point: &Point) -> Result<()> {
        let uid = require_uid(point.uid, "point")?;
        let index = self.points.index_of(&uid)?;
        self.point_table_mut()?.set(index, &point.data)?;
        self.grid.points_mut()[index] = point.coordinates;
        Ok(())
    }

    fn get_point(&self, uid: Uuid) -> Result<Point> {
        self.point_at(self.points.index_of(&uid)?)
    }

    fn has_point(&self, uid: Uuid) -> bool {
        self.points.contains(&uid)
    }

    fn iter_points(&self) -> Box<dyn Iterator<Item = Point> + '_> {
        Box::new(
            (0..self.points.len()).filter_map(move |i| read_or_warn(self.point_at(i), "mesh point")),
        )
    }

    fn add_element(&mut self, kind: ElementKind, element: Element) -> Result<Uuid> {
        let uid = element.uid.unwrap_or_else(Uuid::new_v4);
        if self.elements.contains(&uid) {
            return Err(CudsError::value_error(format!(
                "element {uid} already exists"
            )));
        }
        let ids = self.point_indices(&element)?;
        let cell_type = cell_type_for(kind, ids.len())?;
        self.element_table_mut()?.push(&element.data)?;
        self.grid.insert_next_cell(cell_type, &ids)?;
        self.elements.push(uid)?;
        Ok(uid)
    }

    fn update_element(&mut self, kind: ElementKind, element: &Element) -> Result<()> {
        let uid = require_uid(element.uid, "element")?;
        let index = self.element_index(kind, &uid)?;
        let ids = self.point_indices(element)?;
        let cell_type = cell_type_for(kind, ids.len())?;
        self.element_table_mut()?.set(index, &element.data)?;
        let (cells, types, _) = self.grid.cells_mut();
        CellCollection::new(cells).set(index, &ids)?;
        types[index] = cell_type;
        Ok(())
    }

    fn get_element(&self, kind: ElementKind, uid: Uuid) -> Result<Element> {
        let index = self.element_index(kind, &uid)?;
        let ids = CellCollection::new(self.grid.cells()).get(index)?;
        self.element_from(index, &ids, &self.element_table()?)
    }

    fn has_element(&self, kind: ElementKind, uid: Uuid) -> bool {
        self.element_index(kind, &uid).is_ok()
    }

    fn iter_elements(&self, kind: ElementKind) -> Box<dyn Iterator<Item = Element> + '_> {
        let family = family_of(kind);
        let table = match self.element_table() {
            Ok(table) => table,
            Err(error) => {
                warn!(%error, ?kind, "element table unreadable, no elements listed");
                return Box::new(std::iter::empty());
            }
        };
        Box::new(
            self.grid
                .cells()
                .iter()
                .zip(self.grid.cell_types())
                .enumerate()
                .filter(move |(_, (_, ty))| ty.family() == family)
                .filter_map(move |(i, (ids, _))| {
                    read_or_warn(self.element_from(i, ids, &table), "mesh element")
                }),
        )
    }

    fn has_elements(&self, kind: ElementKind) -> bool {
        let family = family_of(kind);
        self.grid.cell_types().iter().any(|ty| ty.family() == family)
    }

    fn count_of(&self, item: CudsItem) -> Result<usize> {
        let kind = match item {
            CudsItem::Point => return Ok(self.points.len()),
            CudsItem::Edge => ElementKind::Edge,
            CudsItem::Face => ElementKind::Face,
            CudsItem::Cell => ElementKind::Cell,
            other => {
                return Err(CudsError::value_error(format!(
                    "item {other} is not supported by a mesh container"
                )))
            }
        };
        let family = family_of(kind);
        Ok(self
            .grid
            .cell_types()
            .iter()
            .filter(|ty| ty.family() == family)
            .count())
    }
}
