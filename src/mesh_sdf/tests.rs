use super::*;
use crate::mesh::Mesh;
use nalgebra::Point3 as P3;

fn unit_cube_mesh() -> Mesh {
    let v = vec![
        P3::new(0.0, 0.0, 0.0),
        P3::new(1.0, 0.0, 0.0),
        P3::new(1.0, 1.0, 0.0),
        P3::new(0.0, 1.0, 0.0),
        P3::new(0.0, 0.0, 1.0),
        P3::new(1.0, 0.0, 1.0),
        P3::new(1.0, 1.0, 1.0),
        P3::new(0.0, 1.0, 1.0),
    ];
    #[rustfmt::skip]
    let idx: Vec<u32> = vec![
        0, 1, 2, 0, 2, 3,
        4, 6, 5, 4, 7, 6,
        0, 4, 5, 0, 5, 1,
        1, 5, 6, 1, 6, 2,
        2, 6, 7, 2, 7, 3,
        3, 7, 4, 3, 4, 0,
    ];
    Mesh::new(v, idx)
}

#[cfg(feature = "parry3d-backend")]
#[test]
fn interior_point_is_negative_exterior_is_positive() {
    let mesh = unit_cube_mesh();
    let prepared = PreparedMesh::build(&mesh).unwrap();
    let backend = Parry3dBackend;
    let points = vec![Point3::new(0.5, 0.5, 0.5), Point3::new(10.0, 10.0, 10.0)];
    let mut out = Vec::new();
    backend
        .batch_signed_distance(&prepared, &points, &mut out)
        .unwrap();
    assert!(out[0] < 0.0);
    assert!(out[1] > 0.0);
}

#[cfg(not(feature = "parry3d-backend"))]
#[test]
fn missing_backend_reports_missing_dependency() {
    let mesh = unit_cube_mesh();
    let err = PreparedMesh::build(&mesh).unwrap_err();
    assert!(matches!(err, DesolidifyError::MissingDependency(_)));
}

#[cfg(feature = "parry3d-backend")]
#[test]
fn chunked_sampling_matches_single_batch() {
    let mesh = unit_cube_mesh();
    let prepared = PreparedMesh::build(&mesh).unwrap();
    let backend = Parry3dBackend;
    let points: Vec<_> = (0..50)
        .map(|i| Point3::new(i as f64 * 0.1, 0.2, 0.3))
        .collect();

    let mut whole = Vec::new();
    backend
        .batch_signed_distance(&prepared, &points, &mut whole)
        .unwrap();

    let mut chunked = Vec::new();
    sample_chunked(&backend, &prepared, &points, 7, &mut chunked).unwrap();

    assert_eq!(whole, chunked);
}
