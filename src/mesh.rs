// SPDX-License-Identifier: AGPL-3.0-or-later
//! Mesh container, STL I/O, and the light validation pass the loader runs
//! before handing a mesh to the perforation engine.

#[cfg(test)]
mod tests;

use crate::DesolidifyError;
use nalgebra::{Point3, Vector3};
use std::io::{Read, Seek, Write};

/// A triangle mesh: vertex positions and index triples into them.
///
/// Kept deliberately minimal — the engine only needs vertex positions and
/// connectivity, not materials, UVs, or per-vertex normals. A mesh must be
/// "manifold enough" for the configured [`crate::mesh_sdf::MeshDistanceBackend`]
/// to return a meaningful inside/outside test; this type does not itself
/// enforce manifoldness beyond removing unreferenced vertices and degenerate
/// faces.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Point3<f32>>,
    /// Flattened triangle indices, three per face.
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(vertices: Vec<Point3<f32>>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangle(&self, i: usize) -> [Point3<f32>; 3] {
        let base = i * 3;
        [
            self.vertices[self.indices[base] as usize],
            self.vertices[self.indices[base + 1] as usize],
            self.vertices[self.indices[base + 2] as usize],
        ]
    }

    /// Axis-aligned bounding box `(min, max)`. Returns `None` for an empty
    /// mesh.
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let mut it = self.vertices.iter();
        let first = *it.next()?;
        let (mut lo, mut hi) = (first, first);
        for v in it {
            lo = lo.inf(v);
            hi = hi.sup(v);
        }
        Some((lo, hi))
    }

    /// Arithmetic mean of the vertex positions (not a volumetric centroid,
    /// matching `trimesh`'s cheap `.centroid` used by the reference
    /// implementation for lattice anchoring).
    pub fn centroid(&self) -> Point3<f32> {
        let sum = self
            .vertices
            .iter()
            .fold(Vector3::zeros(), |acc, v| acc + v.coords);
        let n = self.vertices.len().max(1) as f32;
        Point3::from(sum / n)
    }

    /// Concatenates several (sub-)meshes into one, re-basing vertex indices
    /// — the loader's answer to a container holding multiple geometries.
    pub fn concatenate(meshes: &[Mesh]) -> Mesh {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        for m in meshes {
            let offset = vertices.len() as u32;
            vertices.extend_from_slice(&m.vertices);
            indices.extend(m.indices.iter().map(|i| i + offset));
        }
        Mesh { vertices, indices }
    }

    /// Drops vertices with no referencing face and remaps indices.
    pub fn remove_unreferenced_vertices(&mut self) {
        let mut used = vec![false; self.vertices.len()];
        for &i in &self.indices {
            used[i as usize] = true;
        }
        let mut remap = vec![0u32; self.vertices.len()];
        let mut kept = Vec::with_capacity(self.vertices.len());
        for (old, &is_used) in used.iter().enumerate() {
            if is_used {
                remap[old] = kept.len() as u32;
                kept.push(self.vertices[old]);
            }
        }
        for i in &mut self.indices {
            *i = remap[*i as usize];
        }
        self.vertices = kept;
    }

    /// Drops degenerate (zero-area / repeated-index) triangles.
    pub fn drop_degenerate_faces(&mut self) {
        let mut kept = Vec::with_capacity(self.indices.len());
        for face in self.indices.chunks_exact(3) {
            let (a, b, c) = (face[0], face[1], face[2]);
            if a == b || b == c || c == a {
                continue;
            }
            let (pa, pb, pc) = (
                self.vertices[a as usize],
                self.vertices[b as usize],
                self.vertices[c as usize],
            );
            let area2 = (pb - pa).cross(&(pc - pa)).norm_squared();
            if area2 > f32::EPSILON {
                kept.extend_from_slice(face);
            }
        }
        self.indices = kept;
    }

    /// The loader's post-load validation pass: drop degenerate faces, remove
    /// now-unreferenced vertices, and fail with [`DesolidifyError::EmptyGeometry`]
    /// if nothing is left.
    pub fn validate(mut self) -> Result<Mesh, DesolidifyError> {
        self.drop_degenerate_faces();
        self.remove_unreferenced_vertices();
        if self.triangle_count() == 0 {
            return Err(DesolidifyError::EmptyGeometry(
                "mesh contains no triangles after validation".to_string(),
            ));
        }
        Ok(self)
    }

    /// Loads a single STL document (binary or ASCII, auto-detected by the
    /// `stl_io` reader) from any seekable byte source.
    pub fn load_stl<R: Read + Seek>(reader: &mut R) -> Result<Mesh, DesolidifyError> {
        let indexed = stl_io::read_stl(reader)
            .map_err(|e| DesolidifyError::Internal(format!("STL read failed: {e}")))?;
        let vertices = indexed
            .vertices
            .iter()
            .map(|v| Point3::new(v[0], v[1], v[2]))
            .collect();
        let indices = indexed
            .faces
            .iter()
            .flat_map(|f| f.vertices.map(|i| i as u32))
            .collect();
        Mesh::new(vertices, indices).validate()
    }

    /// Loads an STL file from a filesystem path.
    pub fn load_stl_file(path: &std::path::Path) -> Result<Mesh, DesolidifyError> {
        let mut file = std::fs::File::open(path)
            .map_err(|e| DesolidifyError::Internal(format!("cannot open {path:?}: {e}")))?;
        Mesh::load_stl(&mut file)
    }

    /// Writes this mesh as binary STL. Per-face normals are recomputed from
    /// winding order, since the mesh type does not retain input normals.
    pub fn write_stl<W: Write>(&self, writer: &mut W) -> Result<(), DesolidifyError> {
        let triangles = (0..self.triangle_count()).map(|i| {
            let [a, b, c] = self.triangle(i);
            let n = (b - a).cross(&(c - a)).normalize();
            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x, n.y, n.z]),
                vertices: [
                    stl_io::Vertex::new([a.x, a.y, a.z]),
                    stl_io::Vertex::new([b.x, b.y, b.z]),
                    stl_io::Vertex::new([c.x, c.y, c.z]),
                ],
            }
        });
        stl_io::write_stl(writer, triangles)
            .map_err(|e| DesolidifyError::Internal(format!("STL write failed: {e}")))
    }
}
