// SPDX-License-Identifier: AGPL-3.0-or-later
//! Mesh-to-point signed-distance queries: the engine's one dependency on an
//! external computational-geometry backend, and the chunked sampling loop
//! that bounds how much memory a single batch can consume.

#[cfg(test)]
mod tests;

use crate::DesolidifyError;
use crate::mesh::Mesh;
use nalgebra::Point3;

/// Computes signed distance from a mesh surface to a batch of points,
/// negative inside the mesh. Implementations may assume `mesh` is closed
/// and consistently wound; an open mesh's inside/outside sign is undefined.
pub trait MeshDistanceBackend {
    fn batch_signed_distance(
        &self,
        mesh: &PreparedMesh,
        points: &[Point3<f64>],
        out: &mut Vec<f64>,
    ) -> Result<(), DesolidifyError>;
}

/// A mesh pre-processed once per run into whatever form the linked backend
/// needs to answer repeated queries efficiently.
pub struct PreparedMesh {
    #[cfg(feature = "parry3d-backend")]
    trimesh: parry3d::shape::TriMesh,
    #[cfg(not(feature = "parry3d-backend"))]
    _no_backend: (),
}

impl PreparedMesh {
    #[cfg(feature = "parry3d-backend")]
    pub fn build(mesh: &Mesh) -> Result<PreparedMesh, DesolidifyError> {
        let vertices = mesh.vertices.clone();
        let indices: Vec<[u32; 3]> = mesh
            .indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        let trimesh = parry3d::shape::TriMesh::new(vertices, indices).map_err(|e| {
            DesolidifyError::Internal(format!("failed to build mesh distance backend: {e}"))
        })?;
        Ok(PreparedMesh { trimesh })
    }

    #[cfg(not(feature = "parry3d-backend"))]
    pub fn build(_mesh: &Mesh) -> Result<PreparedMesh, DesolidifyError> {
        Err(DesolidifyError::MissingDependency(
            "no mesh-distance backend is linked; enable the `parry3d-backend` feature"
                .to_string(),
        ))
    }
}

/// The default backend, built on `parry3d`'s closest-point projection.
#[derive(Debug, Default, Clone, Copy)]
pub struct Parry3dBackend;

impl MeshDistanceBackend for Parry3dBackend {
    #[cfg(feature = "parry3d-backend")]
    fn batch_signed_distance(
        &self,
        mesh: &PreparedMesh,
        points: &[Point3<f64>],
        out: &mut Vec<f64>,
    ) -> Result<(), DesolidifyError> {
        out.try_reserve(points.len())?;
        for p in points {
            let p32 = nalgebra::Point3::new(p.x as f32, p.y as f32, p.z as f32);
            let proj = mesh.trimesh.project_local_point(&p32, true);
            let dist = f64::from((p32 - proj.point).norm());
            out.push(if proj.is_inside { -dist } else { dist });
        }
        Ok(())
    }

    #[cfg(not(feature = "parry3d-backend"))]
    fn batch_signed_distance(
        &self,
        _mesh: &PreparedMesh,
        _points: &[Point3<f64>],
        _out: &mut Vec<f64>,
    ) -> Result<(), DesolidifyError> {
        Err(DesolidifyError::MissingDependency(
            "no mesh-distance backend is linked; enable the `parry3d-backend` feature"
                .to_string(),
        ))
    }
}

/// Samples `points` in chunks of at most `chunk_len`, appending each
/// chunk's signed distances to `out`. Uses `Vec::try_reserve` at both the
/// outer and per-chunk allocation so an over-large `chunk_len` surfaces as
/// [`DesolidifyError::OutOfMemory`] instead of aborting the process.
pub fn sample_chunked<B: MeshDistanceBackend>(
    backend: &B,
    mesh: &PreparedMesh,
    points: &[Point3<f64>],
    chunk_len: usize,
    out: &mut Vec<f64>,
) -> Result<(), DesolidifyError> {
    out.try_reserve(points.len())?;
    for chunk in points.chunks(chunk_len.max(1)) {
        let mut part = Vec::new();
        part.try_reserve(chunk.len())?;
        backend.batch_signed_distance(mesh, chunk, &mut part)?;
        out.extend_from_slice(&part);
    }
    Ok(())
}
