//! End-to-end scenarios through the public API.

use cuds_core::prelude::*;
use cuds_vds::{
    adapt2cuds, cuds2vds, AdoptConfig, AdoptKind, AttributeTable, BaseVectors, CudsRef,
    TableState, VdsLattice, VdsMesh, VdsParticles,
};
use vds_io::{
    ArrayValues, AttributeData, CellArray, CellType, DataArray, DataSet, Dataset, DatasetKind,
    UnstructuredGrid,
};

const TOL: f64 = 1e-12;

fn block_points() -> Vec<[f64; 3]> {
    vec![
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
}

fn floats(array: &DataArray) -> &[f64] {
    match array.values() {
        ArrayValues::Float(v) => v,
        ArrayValues::Int(_) => panic!("expected a float array"),
    }
}

#[test]
fn cubic_lattice_on_image_data() {
    let mut lattice = VdsLattice::empty(
        "cubic",
        BravaisLattice::Cubic,
        BaseVectors::Spacing([0.1, 0.1, 0.1]),
        [5, 10, 12],
        [0.0, 0.0, 0.0],
    )
    .unwrap();
    assert_eq!(lattice.dataset().kind(), DatasetKind::Image);

    let nodes: Vec<LatticeNode> = lattice.iter_nodes().collect();
    for mut node in nodes {
        let t: f64 = node.index.iter().map(|i| (i + 1) as f64).product();
        node.data.insert(AttributeKey::Temperature, t).unwrap();
        lattice.update_node(&node).unwrap();
    }

    let coordinate = lattice.get_coordinate([2, 3, 4]).unwrap();
    assert!(coordinate.approx_eq(Point3::new(0.2, 0.3, 0.4), TOL));
    assert_eq!(
        lattice.get_node([2, 3, 4]).unwrap().data.get(AttributeKey::Temperature),
        Some(&AttributeValue::Float(60.0))
    );

    let order: Vec<NodeIndex> = lattice.iter_nodes().map(|n| n.index).collect();
    assert_eq!(order.len(), 600);
    let expected: Vec<NodeIndex> = (0..12)
        .flat_map(|k| (0..10).flat_map(move |j| (0..5).map(move |i| [i, j, k])))
        .collect();
    assert_eq!(order, expected);
}

#[test]
fn hexagonal_lattice_on_poly_data() {
    let lattice = VdsLattice::empty(
        "hex",
        BravaisLattice::Hexagonal,
        BaseVectors::Spacing([0.1, 0.1, 0.1]),
        [5, 4, 1],
        [0.0, 0.0, 0.0],
    )
    .unwrap();
    let dataset = lattice.dataset();
    assert_eq!(dataset.kind(), DatasetKind::Poly);
    assert_eq!(dataset.number_of_points(), 20);
    let expected = Point3::new(0.5 * 0.1, 0.1 * 3f64.sqrt() / 2.0, 0.0);
    assert!(dataset.point(5).unwrap().approx_eq(expected, TOL));
}

#[test]
fn mesh_cell_type_dispatch() {
    let mut mesh = VdsMesh::empty("blocks");
    let ids = mesh
        .add_points(
            block_points()
                .into_iter()
                .map(|c| Point::new(c, DataContainer::new())),
        )
        .unwrap();
    let tetra = mesh
        .add_cell(Element::new(ids[..4].to_vec(), DataContainer::new()))
        .unwrap();
    let hexa = mesh
        .add_cell(Element::new(ids[4..].to_vec(), DataContainer::new()))
        .unwrap();

    assert_eq!(
        mesh.dataset().cell_types(),
        &[CellType::Tetra, CellType::Hexahedron]
    );
    let cells: Vec<Element> = mesh.iter_cells().collect();
    assert!(mesh.has_cells() && !mesh.has_faces());
    assert_eq!(cells.len(), 2);
    assert_eq!(cells[0].uid, Some(tetra));
    assert_eq!(cells[1].uid, Some(hexa));
    assert_eq!(cells[1].points, ids[4..].to_vec());
}

#[test]
fn attribute_insert_at_tail() {
    let mut data = AttributeData::new();
    let mut state = TableState::new();
    let mut table = AttributeTable::new(&mut data, &mut state).unwrap();
    for (t, r) in [(1.0, 4.0), (2.0, 2.0), (3.0, 1.0)] {
        let row = DataContainer::new()
            .with(AttributeKey::Temperature, t)
            .unwrap()
            .with(AttributeKey::Radius, r)
            .unwrap();
        table.push(&row).unwrap();
    }
    let row = DataContainer::new()
        .with(AttributeKey::Velocity, [0.0, 0.0, 0.34])
        .unwrap()
        .with(AttributeKey::Mass, 0.3)
        .unwrap();
    table.insert(3, &row).unwrap();
    assert_eq!(table.len(), 4);

    let t = floats(table.column(AttributeKey::Temperature).unwrap());
    assert_eq!(&t[..3], &[1.0, 2.0, 3.0]);
    assert!(t[3].is_nan());
    let r = floats(table.column(AttributeKey::Radius).unwrap());
    assert_eq!(&r[..3], &[4.0, 2.0, 1.0]);
    assert!(r[3].is_nan());

    for i in 0..3 {
        assert!(!table.get(i).unwrap().contains_key(AttributeKey::Velocity));
    }
    assert_eq!(
        table.get(3).unwrap().get(AttributeKey::Velocity),
        Some(&AttributeValue::Float3([0.0, 0.0, 0.34]))
    );
}

#[test]
fn heuristic_adoption_with_rename() {
    let points = block_points().into_iter().map(Point3::from).collect();
    let cells = CellArray::from_cells([
        (0..4).collect::<Vec<usize>>(),
        (4..12).collect::<Vec<usize>>(),
    ]);
    let mut grid =
        UnstructuredGrid::from_parts(points, cells, vec![CellType::Tetra, CellType::Hexahedron])
            .unwrap();
    let scalars: Vec<f64> = (0..12).map(|i| 0.25 * i as f64).collect();
    grid.point_data_mut()
        .add(DataArray::from_f64("scalars", 1, scalars.clone()).unwrap());
    let dataset = Dataset::from(grid);

    let config = AdoptConfig::new(AdoptKind::Auto).rename("scalars", AttributeKey::Temperature);
    let adapted = adapt2cuds(&dataset, "blocks", &config).unwrap();
    assert_eq!(adapted.kind(), AdoptKind::Mesh);

    let mesh = adapted.as_mesh().unwrap();
    let temperatures: Vec<AttributeValue> = mesh
        .iter_points()
        .map(|p| p.data.get(AttributeKey::Temperature).cloned().unwrap())
        .collect();
    let expected: Vec<AttributeValue> = scalars.iter().copied().map(AttributeValue::Float).collect();
    assert_eq!(temperatures, expected);

    assert!(dataset.point_data().contains("scalars"));
    assert!(!dataset.point_data().contains("TEMPERATURE"));
}

#[test]
fn particles_survive_export_and_adoption() {
    let mut particles = VdsParticles::empty("argon");
    let uids = particles
        .add_particles((0..4).map(|i| {
            Particle::new(
                [i as f64, 0.0, 0.0],
                DataContainer::new()
                    .with(AttributeKey::Mass, 39.9)
                    .unwrap()
                    .with(AttributeKey::Label, i as i64)
                    .unwrap(),
            )
        }))
        .unwrap();
    particles
        .add_bond(Bond::new(vec![uids[0], uids[1]], DataContainer::new()))
        .unwrap();
    particles.remove_particle(uids[3]).unwrap();

    let dataset = cuds2vds(CudsRef::Particles(&particles)).unwrap();
    assert_eq!(dataset.number_of_points(), 3);
    assert_eq!(dataset.number_of_cells(), 1);

    let adapted = adapt2cuds(&dataset, "again", &AdoptConfig::default()).unwrap();
    let again = adapted.as_particles().unwrap();
    assert_eq!(again.count_of(CudsItem::Particle).unwrap(), 3);
    assert_eq!(again.count_of(CudsItem::Bond).unwrap(), 1);
    let rows: Vec<Particle> = again.iter_particles().collect();
    assert_eq!(rows[2].data.get(AttributeKey::Label), Some(&AttributeValue::Int(2)));
    assert_eq!(rows[2].coordinates, Point3::new(2.0, 0.0, 0.0));
}
