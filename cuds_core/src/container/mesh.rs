use indexmap::IndexMap;
use uuid::Uuid;

use super::{unsupported_item, MeshContainer, Named};
use crate::cuds::{CudsItem, Element, ElementKind, Point};
use crate::error::{CudsError, Result};
use crate::value::DataContainer;

/// In-memory mesh.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    name: String,
    data: DataContainer,
    points: IndexMap<Uuid, Point>,
    edges: IndexMap<Uuid, Element>,
    faces: IndexMap<Uuid, Element>,
    cells: IndexMap<Uuid, Element>,
}

impl Mesh {
    /// Create an empty mesh.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn store(&self, kind: ElementKind) -> &IndexMap<Uuid, Element> {
        match kind {
            ElementKind::Edge => &self.edges,
            ElementKind::Face => &self.faces,
            ElementKind::Cell => &self.cells,
        }
    }

    fn store_mut(&mut self, kind: ElementKind) -> &mut IndexMap<Uuid, Element> {
        match kind {
            ElementKind::Edge => &mut self.edges,
            ElementKind::Face => &mut self.faces,
            ElementKind::Cell => &mut self.cells,
        }
    }

    /// Element identifiers are unique across all three kinds.
    fn element_exists(&self, uid: &Uuid) -> bool {
        ElementKind::ALL
            .iter()
            .any(|kind| self.store(*kind).contains_key(uid))
    }

    fn check_points(&self, element: &Element) -> Result<()> {
        match element.points.iter().find(|p| !self.points.contains_key(*p)) {
            Some(missing) => Err(CudsError::UnknownUid { uid: *missing }),
            None => Ok(()),
        }
    }
}

impl Named for Mesh {
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

impl MeshContainer for Mesh {
    fn add_point(&mut self, mut point: Point) -> Result<Uuid> {
        let uid = *point.uid.get_or_insert_with(Uuid::new_v4);
        if self.points.contains_key(&uid) {
            return Err(CudsError::value_error(format!("point {uid} already exists")));
        }
        self.points.insert(uid, point);
        Ok(uid)
    }

    fn update_point(&mut self, point: &Point) -> Result<()> {
        let uid = point
            .uid
            .ok_or_else(|| CudsError::value_error("point has no uid"))?;
        let slot = self
            .points
            .get_mut(&uid)
            .ok_or(CudsError::UnknownUid { uid })?;
        *slot = point.clone();
        Ok(())
    }

    fn get_point(&self, uid: Uuid) -> Result<Point> {
        self.points
            .get(&uid)
            .cloned()
            .ok_or(CudsError::UnknownUid { uid })
    }

    fn has_point(&self, uid: Uuid) -> bool {
        self.points.contains_key(&uid)
    }

    fn iter_points(&self) -> Box<dyn Iterator<Item = Point> + '_> {
        Box::new(self.points.values().cloned())
    }

    fn add_element(&mut self, kind: ElementKind, mut element: Element) -> Result<Uuid> {
        self.check_points(&element)?;
        let uid = *element.uid.get_or_insert_with(Uuid::new_v4);
        if self.element_exists(&uid) {
            return Err(CudsError::value_error(format!(
                "element {uid} already exists"
            )));
        }
        self.store_mut(kind).insert(uid, element);
        Ok(uid)
    }

    fn update_element(&mut self, kind: ElementKind, element: &Element) -> Result<()> {
        let uid = element
            .uid
            .ok_or_else(|| CudsError::value_error("element has no uid"))?;
        if !self.store(kind).contains_key(&uid) {
            return Err(CudsError::UnknownUid { uid });
        }
        self.check_points(element)?;
        self.store_mut(kind).insert(uid, element.clone());
        Ok(())
    }

    fn get_element(&self, kind: ElementKind, uid: Uuid) -> Result<Element> {
        self.store(kind)
            .get(&uid)
            .cloned()
            .ok_or(CudsError::UnknownUid { uid })
    }

    fn has_element(&self, kind: ElementKind, uid: Uuid) -> bool {
        self.store(kind).contains_key(&uid)
    }

    fn iter_elements(&self, kind: ElementKind) -> Box<dyn Iterator<Item = Element> + '_> {
        Box::new(self.store(kind).values().cloned())
    }

    fn count_of(&self, item: CudsItem) -> Result<usize> {
        match item {
            CudsItem::Point => Ok(self.points.len()),
            CudsItem::Edge => Ok(self.edges.len()),
            CudsItem::Face => Ok(self.faces.len()),
            CudsItem::Cell => Ok(self.cells.len()),
            other => Err(unsupported_item(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn tetra_mesh() -> (Mesh, Vec<Uuid>) {
        let mut mesh = Mesh::new("tetra");
        let coords = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ];
        let ids = mesh
            .add_points(coords.iter().map(|c| Point::new(*c, DataContainer::new())))
            .unwrap();
        (mesh, ids)
    }

    #[test]
    fn test_elements_by_kind() {
        let (mut mesh, ids) = tetra_mesh();
        let cell = mesh
            .add_cell(Element::new(ids.clone(), DataContainer::new()))
            .unwrap();
        mesh.add_face(Element::new(ids[..3].to_vec(), DataContainer::new()))
            .unwrap();

        assert!(mesh.has_element(ElementKind::Cell, cell));
        assert!(!mesh.has_element(ElementKind::Face, cell));
        assert!(!mesh.has_elements(ElementKind::Edge));
        assert_eq!(mesh.count_of(CudsItem::Point).unwrap(), 4);
        assert_eq!(mesh.count_of(CudsItem::Face).unwrap(), 1);
        assert_eq!(mesh.get_cell(cell).unwrap().points, ids);
    }

    #[test]
    fn test_element_errors() {
        let (mut mesh, ids) = tetra_mesh();
        let err = mesh
            .add_edge(Element::new(vec![ids[0], Uuid::new_v4()], DataContainer::new()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownUid);

        let edge = mesh
            .add_edge(Element::new(ids[..2].to_vec(), DataContainer::new()))
            .unwrap();
        let dup = Element::new(ids[1..3].to_vec(), DataContainer::new()).with_uid(edge);
        let err = mesh.add_face(dup).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(
            mesh.count_of(CudsItem::Bond).unwrap_err().kind(),
            ErrorKind::Value
        );
    }
}
