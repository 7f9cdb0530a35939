// SPDX-License-Identifier: AGPL-3.0-or-later
//! Isosurface extraction and the light mesh repair pass that follows it.
//!
//! Extraction itself is `fast_surface_nets`' dual-contouring algorithm
//! rather than the marching-cubes table the reference implementation
//! calls by name: it ships in the same family of real-time meshing
//! algorithms, produces a comparable triangle soup from a scalar field,
//! and is the isosurfacer already proven out in this codebase — see
//! `SPEC_FULL.md` for the rationale. The repair pass below is adapted from
//! this codebase's non-manifold mesh cleanup rather than written fresh.


use crate::mesh::Mesh;
use crate::volume::Volume;
use fast_surface_nets::ndshape::{RuntimeShape3u32, Shape};
use fast_surface_nets::{SurfaceNetsBuffer, surface_nets};
use nalgebra::{Point3, Vector3};
use rustc_hash::FxHashMap;

/// Value written into the one-voxel padding ring around the sampled
/// volume so the surface never crosses into it: comfortably larger than
/// any in-range signed distance this engine ever produces.
const OUTSIDE_SENTINEL: f32 = 1.0e3;

/// Extracts the zero level set of `volume` as a triangle mesh in world
/// coordinates, then runs the non-manifold repair and best-effort normal
/// orientation passes.
pub fn extract(volume: &Volume) -> Mesh {
    let (padded, shape, dims) = pad_with_sentinel(volume);
    let mut buffer = SurfaceNetsBuffer::default();
    let max = [dims[0] - 1, dims[1] - 1, dims[2] - 1];
    surface_nets(&padded, &shape, [0, 0, 0], max, &mut buffer);

    let vertices = buffer
        .positions
        .iter()
        .map(|p| {
            // Padded local index space is offset by one voxel from `volume`'s
            // own origin; undo that before converting to world space.
            let wx = volume.origin.x + (f64::from(p[0]) - 1.0) * volume.voxel;
            let wy = volume.origin.y + (f64::from(p[1]) - 1.0) * volume.voxel;
            let wz = volume.origin.z + (f64::from(p[2]) - 1.0) * volume.voxel;
            Point3::new(wx as f32, wy as f32, wz as f32)
        })
        .collect();

    let mut mesh = Mesh::new(vertices, buffer.indices);
    dedup_vertices(&mut mesh);
    fix_non_manifold_vertices(&mut mesh);
    orient_normals_outward(&mut mesh);
    mesh
}

fn pad_with_sentinel(volume: &Volume) -> (Vec<f32>, RuntimeShape3u32, [u32; 3]) {
    let dims = [
        volume.nx as u32 + 2,
        volume.ny as u32 + 2,
        volume.nz as u32 + 2,
    ];
    let shape = RuntimeShape3u32::new(dims);
    let mut padded = vec![OUTSIDE_SENTINEL; shape.size() as usize];
    for k in 0..volume.nz {
        for j in 0..volume.ny {
            for i in 0..volume.nx {
                let local = [(i + 1) as u32, (j + 1) as u32, (k + 1) as u32];
                let idx = shape.linearize(local) as usize;
                padded[idx] = volume.get(i, j, k);
            }
        }
    }
    (padded, shape, dims)
}

/// Merges vertices that land on (nearly) the same point, keyed on the bit
/// pattern of their coordinates. `fast_surface_nets` already emits one
/// vertex per active cell, so in practice this only catches coincident
/// vertices introduced by downstream repair, not extraction itself.
fn dedup_vertices(mesh: &mut Mesh) {
    let mut seen: FxHashMap<[u32; 3], u32> = FxHashMap::default();
    let mut kept = Vec::with_capacity(mesh.vertices.len());
    let mut remap = vec![0u32; mesh.vertices.len()];
    for (old, v) in mesh.vertices.iter().enumerate() {
        let key = [v.x.to_bits(), v.y.to_bits(), v.z.to_bits()];
        let id = *seen.entry(key).or_insert_with(|| {
            kept.push(*v);
            (kept.len() - 1) as u32
        });
        remap[old] = id;
    }
    for i in &mut mesh.indices {
        *i = remap[*i as usize];
    }
    mesh.vertices = kept;
}

/// Splits any vertex whose incident triangle fan is not a single connected
/// ring (a "pinch point" where two otherwise unrelated surface patches
/// touch at one vertex) into one vertex per connected fan, duplicating the
/// position. Leaves well-formed vertices untouched.
fn fix_non_manifold_vertices(mesh: &mut Mesh) {
    let n_verts = mesh.vertices.len();
    let mut incident: Vec<Vec<usize>> = vec![Vec::new(); n_verts];
    for (face, tri) in mesh.indices.chunks_exact(3).enumerate() {
        for &vi in tri {
            incident[vi as usize].push(face);
        }
    }

    let mut extra_vertices = Vec::new();

    for v in 0..n_verts {
        let faces = &incident[v];
        if faces.len() <= 1 {
            continue;
        }

        // Two incident faces are in the same fan if they share a "wing"
        // vertex (the triangle vertex other than `v` itself that borders
        // the shared edge).
        let mut wing_of = FxHashMap::default();
        for (slot, &face) in faces.iter().enumerate() {
            let tri = &mesh.indices[face * 3..face * 3 + 3];
            for &wv in tri {
                if wv as usize != v {
                    wing_of.entry(wv).or_insert_with(Vec::new).push(slot);
                }
            }
        }

        let mut parent: Vec<usize> = (0..faces.len()).collect();
        fn find(parent: &mut [usize], x: usize) -> usize {
            if parent[x] != x {
                parent[x] = find(parent, parent[x]);
            }
            parent[x]
        }
        for slots in wing_of.values() {
            for w in slots.windows(2) {
                let (ra, rb) = (find(&mut parent, w[0]), find(&mut parent, w[1]));
                if ra != rb {
                    parent[ra] = rb;
                }
            }
        }

        let mut components: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
        for slot in 0..faces.len() {
            let root = find(&mut parent, slot);
            components.entry(root).or_default().push(faces[slot]);
        }

        if components.len() <= 1 {
            continue;
        }

        // Keep the original vertex for the first component; duplicate it
        // for every other component.
        for face_group in components.values().skip(1) {
            let new_id = (n_verts + extra_vertices.len()) as u32;
            extra_vertices.push(mesh.vertices[v]);
            for &face in face_group {
                for vi in &mut mesh.indices[face * 3..face * 3 + 3] {
                    if *vi as usize == v {
                        *vi = new_id;
                    }
                }
            }
        }
    }

    mesh.vertices.extend(extra_vertices);
}

/// Flips triangle winding so each face's normal points away from the
/// mesh's centroid. Best-effort: works well for star-shaped-ish perforated
/// shells and is skipped silently (never an error) on a mesh where the
/// centroid heuristic cannot be evaluated, i.e. an empty mesh.
fn orient_normals_outward(mesh: &mut Mesh) {
    if mesh.vertices.is_empty() {
        return;
    }
    let centroid = mesh.centroid();
    for tri in mesh.indices.chunks_exact_mut(3) {
        let (a, b, c) = (
            mesh.vertices[tri[0] as usize],
            mesh.vertices[tri[1] as usize],
            mesh.vertices[tri[2] as usize],
        );
        let normal = (b - a).cross(&(c - a));
        let outward: Vector3<f32> = (a - centroid).coords;
        if normal.dot(&outward) < 0.0 {
            tri.swap(1, 2);
        }
    }
}
