//! Lattice container stored in image data or poly data.
//!
//! Families whose primitive vectors run along the coordinate axes (cubic,
//! tetragonal, orthorhombic) map onto an [`ImageData`]. Every other family
//! stores one explicit point per node in a [`PolyData`], in flat order with
//! the first index fastest, so that a node index always ravels to its point
//! id. Node rows live in the dataset's point data.

use cuds_core::container::check_lattice_size;
use cuds_core::{
    find_lattice_type, guess_lattice_layout, is_lattice_of, ravel_index, unravel_index,
    BravaisLattice, ClassifierConfig, CudsError, DataContainer, LatticeContainer, LatticeNode,
    Named, NodeIndex, Point3, PrimitiveCell, Result,
};
use tracing::debug;
use vds_io::{AttributeData, DataSet, Dataset, ImageData, PolyData};

use crate::attribute_table::{AttributeTable, TableState};
use crate::error::read_or_warn;

/// Base vectors passed to [`VdsLattice::empty`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BaseVectors {
    /// Per-axis spacing `[a, b, c]`.
    ///
    /// Accepted for the axis-aligned families and for hexagonal lattices,
    /// where `a` is the in-plane edge and `c` the layer spacing. Hexagonal
    /// nodes sit at `i * p1 + j * p2 + k * p3` of
    /// [`PrimitiveCell::hexagonal`], so each row starts `a / 2` further
    /// along `x` than the one below it.
    Spacing([f64; 3]),
    /// Explicit primitive vectors.
    Primitive([Point3; 3]),
}

/// Lattice nodes backed by image data or poly data.
#[derive(Debug, Clone)]
pub struct VdsLattice {
    name: String,
    data: DataContainer,
    primitive_cell: PrimitiveCell,
    size: [usize; 3],
    origin: Point3,
    dataset: Dataset,
    node_state: TableState,
}

fn node_count(size: [usize; 3]) -> usize {
    size.iter().product()
}

/// Point coordinates in flat node order.
fn generate_points<F>(size: [usize; 3], position: F) -> Vec<Point3>
where
    F: Fn(NodeIndex) -> Point3 + Sync + Send,
{
    let [nx, ny, _] = size;
    let node = move |flat: usize| [flat % nx, (flat / nx) % ny, flat / (nx * ny)];

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        (0..node_count(size))
            .into_par_iter()
            .map(|flat| position(node(flat)))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..node_count(size)).map(|flat| position(node(flat))).collect()
    }
}

/// Poly data holding `origin + i * p1 + j * p2 + k * p3` for every node.
fn explicit_points(vectors: [Point3; 3], size: [usize; 3], origin: Point3) -> Dataset {
    let [p1, p2, p3] = vectors;
    let points = generate_points(size, move |[i, j, k]| {
        origin + p1 * i as f64 + p2 * j as f64 + p3 * k as f64
    });
    Dataset::Poly(PolyData::from_points(points))
}

fn check_spacing(spacing: [f64; 3]) -> Result<()> {
    if spacing.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
        return Err(CudsError::value_error(format!(
            "lattice spacing {spacing:?} must be positive and finite"
        )));
    }
    Ok(())
}

fn image(size: [usize; 3], spacing: [f64; 3], origin: Point3) -> Result<Dataset> {
    let image = ImageData::new(size, spacing, origin)
        .map_err(|e| CudsError::value_error(e.to_string()))?;
    Ok(Dataset::Image(image))
}

/// Dataset and primitive cell for a spacing-based lattice.
fn spacing_layout(
    family: BravaisLattice,
    spacing: [f64; 3],
    size: [usize; 3],
    origin: Point3,
) -> Result<(PrimitiveCell, Dataset)> {
    check_spacing(spacing)?;
    let [a, b, c] = spacing;
    let mismatch = || {
        CudsError::value_error(format!(
            "spacing {spacing:?} does not describe a {family} lattice"
        ))
    };
    match family {
        BravaisLattice::Cubic if a == b && b == c => {
            Ok((PrimitiveCell::cubic(a), image(size, spacing, origin)?))
        }
        BravaisLattice::Tetragonal if a == b => {
            Ok((PrimitiveCell::tetragonal(a, c), image(size, spacing, origin)?))
        }
        BravaisLattice::Orthorhombic => Ok((
            PrimitiveCell::orthorhombic(a, b, c),
            image(size, spacing, origin)?,
        )),
        BravaisLattice::Hexagonal if a == b => {
            let cell = PrimitiveCell::hexagonal(a, c);
            let points = explicit_points(cell.vectors(), size, origin);
            Ok((cell, points))
        }
        BravaisLattice::Cubic | BravaisLattice::Tetragonal | BravaisLattice::Hexagonal => {
            Err(mismatch())
        }
        other => Err(CudsError::value_error(format!(
            "{other} lattices need primitive vectors, not a spacing"
        ))),
    }
}

/// Per-axis spacing of vectors that run along the coordinate axes.
pub(crate) fn axis_spacing(vectors: [Point3; 3]) -> Option<[f64; 3]> {
    let mut spacing = [0.0; 3];
    for (axis, v) in vectors.iter().enumerate() {
        let c: [f64; 3] = (*v).into();
        let off_axis = (0..3).filter(|&i| i != axis).any(|i| c[i] != 0.0);
        if off_axis || c[axis] <= 0.0 {
            return None;
        }
        spacing[axis] = c[axis];
    }
    Some(spacing)
}

/// Dataset and primitive cell for explicit primitive vectors.
fn primitive_layout(
    family: BravaisLattice,
    vectors: [Point3; 3],
    size: [usize; 3],
    origin: Point3,
) -> Result<(PrimitiveCell, Dataset)> {
    if !is_lattice_of(family, vectors, &ClassifierConfig::default()) {
        return Err(CudsError::value_error(format!(
            "primitive vectors do not describe a {family} lattice"
        )));
    }
    let [p1, p2, p3] = vectors;
    let cell = PrimitiveCell::new(p1, p2, p3, family);
    if family.is_axis_aligned() {
        let spacing = axis_spacing(vectors).ok_or_else(|| {
            CudsError::value_error(format!(
                "{family} lattices need primitive vectors along the coordinate axes"
            ))
        })?;
        return Ok((cell, image(size, spacing, origin)?));
    }
    Ok((cell, explicit_points(vectors, size, origin)))
}

impl VdsLattice {
    /// Create a lattice with empty node rows.
    ///
    /// # Errors
    /// `Value` if any extent is zero, the spacing is not positive, or the
    /// base vectors do not describe `family` (see [`BaseVectors`]).
    pub fn empty(
        name: impl Into<String>,
        family: BravaisLattice,
        base: BaseVectors,
        size: [usize; 3],
        origin: impl Into<Point3>,
    ) -> Result<Self> {
        let name = name.into();
        let origin = origin.into();
        check_lattice_size(size)?;
        let (primitive_cell, dataset) = match base {
            BaseVectors::Spacing(spacing) => spacing_layout(family, spacing, size, origin)?,
            BaseVectors::Primitive(vectors) => primitive_layout(family, vectors, size, origin)?,
        };
        debug!(
            name = %name,
            family = %family,
            kind = ?dataset.kind(),
            nodes = node_count(size),
            "created lattice"
        );
        Ok(Self {
            name,
            data: DataContainer::new(),
            primitive_cell,
            size,
            origin,
            dataset,
            node_state: TableState::new().with_virtual_size(node_count(size)),
        })
    }

    /// Adopt image data, classifying the family from its spacing.
    ///
    /// # Errors
    /// `Value` for a grid with a zero extent; `InvalidDataset` for malformed
    /// point arrays.
    pub fn from_image(name: impl Into<String>, image: ImageData) -> Result<Self> {
        let name = name.into();
        let size = image.dimensions();
        check_lattice_size(size)?;
        image.validate()?;
        let [a, b, c] = image.spacing();
        let vectors = [
            Point3::new(a, 0.0, 0.0),
            Point3::new(0.0, b, 0.0),
            Point3::new(0.0, 0.0, c),
        ];
        let family = find_lattice_type(vectors[0], vectors[1], vectors[2])?;
        let node_state = TableState::adopt(image.point_data())?;
        debug!(name = %name, family = %family, "adopted image data as lattice");
        Ok(Self {
            name,
            data: DataContainer::new(),
            primitive_cell: PrimitiveCell::new(vectors[0], vectors[1], vectors[2], family),
            size,
            origin: image.origin(),
            dataset: Dataset::Image(image),
            node_state: node_state.with_virtual_size(node_count(size)),
        })
    }

    /// Adopt poly data whose points form a dense lattice in flat order.
    ///
    /// # Errors
    /// `Type` if the dataset has cells; `Index` if the points do not follow
    /// lattice order; `NoMatchingFamily` if the recovered vectors match no
    /// family.
    pub fn from_poly(name: impl Into<String>, poly: PolyData) -> Result<Self> {
        let name = name.into();
        if !(poly.verts().is_empty() && poly.lines().is_empty() && poly.polys().is_empty()) {
            return Err(CudsError::type_error(
                "poly data with cells is not a lattice",
            ));
        }
        poly.validate()?;
        let config = ClassifierConfig::default();
        let layout = guess_lattice_layout(poly.points(), &config)?;
        let [p1, p2, p3] = layout.vectors;
        let family = find_lattice_type(p1, p2, p3)?;
        let node_state = TableState::adopt(poly.point_data())?;
        debug!(name = %name, family = %family, size = ?layout.size, "adopted poly data as lattice");
        Ok(Self {
            name,
            data: DataContainer::new(),
            primitive_cell: PrimitiveCell::new(p1, p2, p3, family),
            size: layout.size,
            origin: poly.points()[0],
            dataset: Dataset::Poly(poly),
            node_state: node_state.with_virtual_size(node_count(layout.size)),
        })
    }

    /// Copy any lattice container.
    ///
    /// The copy is built from the source's primitive vectors, so node
    /// coordinates follow `origin + i * p1 + j * p2 + k * p3`.
    pub fn from_lattice(source: &dyn LatticeContainer) -> Result<Self> {
        let cell = source.primitive_cell();
        let mut target = Self::empty(
            source.name(),
            cell.bravais_lattice,
            BaseVectors::Primitive(cell.vectors()),
            source.size(),
            source.origin(),
        )?;
        target.data = source.data().clone();
        for node in source.iter_nodes() {
            target.update_node(&node)?;
        }
        Ok(target)
    }

    /// Backing dataset.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Consume the container, returning the dataset.
    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }

    fn point_id(&self, index: NodeIndex) -> Result<usize> {
        let id = match &self.dataset {
            Dataset::Image(image) => image.compute_point_id(index),
            _ => ravel_index(index, self.size),
        };
        id.ok_or(CudsError::NodeIndex {
            index,
            size: self.size,
        })
    }

    fn table(&self) -> Result<AttributeTable<&AttributeData, &TableState>> {
        AttributeTable::new(self.dataset.point_data(), &self.node_state)
    }
}

impl Named for VdsLattice {
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

impl LatticeContainer for VdsLattice {
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
        let id = self.point_id(index)?;
        Ok(LatticeNode::new(index, self.table()?.get(id)?))
    }

    fn update_node(&mut self, node: &LatticeNode) -> Result<()> {
        let id = self.point_id(node.index)?;
        AttributeTable::new(self.dataset.point_data_mut(), &mut self.node_state)?
            .set(id, &node.data)
    }

    fn get_coordinate(&self, index: NodeIndex) -> Result<Point3> {
        let id = self.point_id(index)?;
        self.dataset.point(id).ok_or(CudsError::NodeIndex {
            index,
            size: self.size,
        })
    }

    fn iter_nodes(&self) -> Box<dyn Iterator<Item = LatticeNode> + '_> {
        let size = self.size;
        Box::new(
            (0..node_count(size))
                .filter_map(move |flat| unravel_index(flat, size))
                .filter_map(move |index| read_or_warn(self.get_node(index), "lattice node")),
        )
    }
}
