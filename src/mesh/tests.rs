use super::*;

fn unit_cube() -> Mesh {
    let v = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(1.0, 0.0, 1.0),
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(0.0, 1.0, 1.0),
    ];
    #[rustfmt::skip]
    let idx: Vec<u32> = vec![
        0, 1, 2, 0, 2, 3, // bottom
        4, 6, 5, 4, 7, 6, // top
        0, 4, 5, 0, 5, 1, // front
        1, 5, 6, 1, 6, 2, // right
        2, 6, 7, 2, 7, 3, // back
        3, 7, 4, 3, 4, 0, // left
    ];
    Mesh::new(v, idx)
}

#[test]
fn bounds_and_centroid_of_unit_cube() {
    let m = unit_cube();
    let (lo, hi) = m.bounds().unwrap();
    assert_eq!(lo, Point3::new(0.0, 0.0, 0.0));
    assert_eq!(hi, Point3::new(1.0, 1.0, 1.0));
    let c = m.centroid();
    assert!((c.x - 0.5).abs() < 1e-6);
    assert!((c.y - 0.5).abs() < 1e-6);
    assert!((c.z - 0.5).abs() < 1e-6);
}

#[test]
fn validate_keeps_a_well_formed_cube() {
    let m = unit_cube().validate().unwrap();
    assert_eq!(m.triangle_count(), 12);
    assert_eq!(m.vertices.len(), 8);
}

#[test]
fn validate_drops_degenerate_faces() {
    let mut m = unit_cube();
    m.indices.extend_from_slice(&[0, 0, 1]); // degenerate: repeated index
    let m = m.validate().unwrap();
    assert_eq!(m.triangle_count(), 12);
}

#[test]
fn validate_rejects_empty_geometry() {
    let m = Mesh::new(vec![Point3::new(0.0, 0.0, 0.0)], vec![]);
    let err = m.validate().unwrap_err();
    assert!(matches!(err, DesolidifyError::EmptyGeometry(_)));
}

#[test]
fn remove_unreferenced_vertices_compacts_indices() {
    let mut m = unit_cube();
    m.vertices.push(Point3::new(9.0, 9.0, 9.0)); // never referenced
    m.remove_unreferenced_vertices();
    assert_eq!(m.vertices.len(), 8);
}

#[test]
fn concatenate_rebases_indices() {
    let a = unit_cube();
    let mut b = unit_cube();
    for v in &mut b.vertices {
        v.x += 5.0;
    }
    let merged = Mesh::concatenate(&[a.clone(), b]);
    assert_eq!(merged.vertices.len(), 16);
    assert_eq!(merged.triangle_count(), 24);
    // second cube's first index should point past the first cube's vertices
    assert_eq!(merged.indices[36], 8);
}

#[test]
fn stl_round_trip_preserves_triangle_count() {
    let m = unit_cube().validate().unwrap();
    let mut buf: Vec<u8> = Vec::new();
    m.write_stl(&mut std::io::Cursor::new(&mut buf)).unwrap();
    let loaded = Mesh::load_stl(&mut std::io::Cursor::new(&buf)).unwrap();
    assert_eq!(loaded.triangle_count(), m.triangle_count());
    let (lo, hi) = loaded.bounds().unwrap();
    assert_eq!(lo, Point3::new(0.0, 0.0, 0.0));
    assert_eq!(hi, Point3::new(1.0, 1.0, 1.0));
}
