use super::{check_lattice_size, LatticeContainer, Named};
use crate::cuds::LatticeNode;
use crate::error::{CudsError, Result};
use crate::primitive_cell::PrimitiveCell;
use crate::types::{ravel_index, unravel_index, NodeIndex, Point3};
use crate::value::DataContainer;

/// In-memory lattice.
///
/// Node rows are stored densely in flat order (first index fastest).
#[derive(Debug, Clone)]
pub struct Lattice {
    name: String,
    data: DataContainer,
    primitive_cell: PrimitiveCell,
    size: [usize; 3],
    origin: Point3,
    nodes: Vec<DataContainer>,
}

impl Lattice {
    /// Create a lattice with empty node rows.
    ///
    /// # Errors
    /// `Value` if any extent is zero.
    pub fn new(
        name: impl Into<String>,
        primitive_cell: PrimitiveCell,
        size: [usize; 3],
        origin: impl Into<Point3>,
    ) -> Result<Self> {
        check_lattice_size(size)?;
        let count = size.iter().product();
        Ok(Self {
            name: name.into(),
            data: DataContainer::new(),
            primitive_cell,
            size,
            origin: origin.into(),
            nodes: vec![DataContainer::new(); count],
        })
    }

    fn flat(&self, index: NodeIndex) -> Result<usize> {
        ravel_index(index, self.size).ok_or(CudsError::NodeIndex {
            index,
            size: self.size,
        })
    }
}

impl Named for Lattice {
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

impl LatticeContainer for Lattice {
    fn primitive_cell(&self) -> &PrimitiveCell {
        &self.primitive_cell
    }

    fn size(&self) -> [usize; 3] {
        self.size
    }

    fn origin(&self) -> Point3 {
        self.origin
    }

    fn get_node(&self, index: NodeIndex) -> Result<LatticeNode> {
        let flat = self.flat(index)?;
        Ok(LatticeNode::new(index, self.nodes[flat].clone()))
    }

    fn update_node(&mut self, node: &LatticeNode) -> Result<()> {
        let flat = self.flat(node.index)?;
        self.nodes[flat] = node.data.clone();
        Ok(())
    }

    fn get_coordinate(&self, index: NodeIndex) -> Result<Point3> {
        self.flat(index)?;
        let [p1, p2, p3] = self.primitive_cell.vectors();
        let [i, j, k] = index;
        Ok(self.origin + p1 * i as f64 + p2 * j as f64 + p3 * k as f64)
    }

    fn iter_nodes(&self) -> Box<dyn Iterator<Item = LatticeNode> + '_> {
        Box::new(self.nodes.iter().enumerate().filter_map(move |(flat, data)| {
            unravel_index(flat, self.size).map(|index| LatticeNode::new(index, data.clone()))
        }))
    }
}
