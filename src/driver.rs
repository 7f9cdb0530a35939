// SPDX-License-Identifier: AGPL-3.0-or-later
//! The engine's single entry point: grid construction, the per-z-slice
//! sampling loop, and the memory-pressure retry/backoff wrapper around it.


use crate::DesolidifyError;
use crate::compose::{self, GateContext};
use crate::mesh::Mesh;
use crate::mesh_sdf::{self, MeshDistanceBackend, PreparedMesh};
use crate::progress::{ControlFlow, ProgressSink};
use crate::settings::Settings;
use crate::volume::Volume;
use nalgebra::Point3;

/// Minimum points per signed-distance batch the retry loop will shrink to,
/// mirroring the reference implementation's floor.
const MIN_CHUNK_PTS: u32 = 250_000;
/// Retry never grows the voxel step past this multiple of the originally
/// requested value.
const MAX_VOXEL_GROWTH: f64 = 1.8;

/// Perforates `mesh` per `settings`, reporting progress and honoring
/// cancellation through `progress`, and querying mesh containment through
/// `backend`.
///
/// On [`DesolidifyError::OutOfMemory`] the run is retried with a shrunk
/// sampling chunk and a coarsened voxel step, up to `settings.mem_tries`
/// attempts, sleeping `settings.mem_delay` seconds between attempts to let
/// memory pressure subside. Any other error is returned immediately.
pub fn perforate<B: MeshDistanceBackend>(
    mesh: &Mesh,
    settings: &Settings,
    backend: &B,
    progress: &mut dyn ProgressSink,
) -> Result<Mesh, DesolidifyError> {
    run(mesh, settings, backend, progress, |secs| {
        std::thread::sleep(std::time::Duration::from_secs_f64(secs));
    })
}

fn run<B: MeshDistanceBackend>(
    mesh: &Mesh,
    settings: &Settings,
    backend: &B,
    progress: &mut dyn ProgressSink,
    sleep: impl Fn(f64),
) -> Result<Mesh, DesolidifyError> {
    let (lo, hi) = mesh
        .bounds()
        .ok_or_else(|| DesolidifyError::EmptyGeometry("mesh has no vertices".to_string()))?;
    let prepared = PreparedMesh::build(mesh)?;

    let original_voxel = settings.voxel;
    let mut voxel = settings.voxel;
    let mut chunk_pts = settings.chunk_pts;
    let max_tries = settings.mem_tries.max(1);

    let mut last_err: Option<DesolidifyError> = None;
    for attempt in 0..max_tries {
        match try_once(
            mesh, &prepared, settings, backend, voxel, chunk_pts, lo, hi, progress,
        ) {
            Ok(result) => return Ok(result),
            Err(DesolidifyError::OutOfMemory(msg)) => {
                log::warn!(
                    "perforate attempt {attempt} ran out of memory ({msg}); chunk_pts={chunk_pts} voxel={voxel}"
                );
                last_err = Some(DesolidifyError::OutOfMemory(msg));
                if !settings.mem_retry || attempt + 1 >= max_tries {
                    break;
                }
                chunk_pts = ((chunk_pts as f64 * 0.65) as u32).max(MIN_CHUNK_PTS);
                voxel = (voxel * 1.10).min(original_voxel * MAX_VOXEL_GROWTH);
                sleep(settings.mem_delay);
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or_else(|| DesolidifyError::Internal("no attempt was made".to_string())))
}

#[allow(clippy::too_many_arguments)]
fn try_once<B: MeshDistanceBackend>(
    mesh: &Mesh,
    prepared: &PreparedMesh,
    settings: &Settings,
    backend: &B,
    voxel: f64,
    chunk_pts: u32,
    lo: Point3<f32>,
    hi: Point3<f32>,
    progress: &mut dyn ProgressSink,
) -> Result<Mesh, DesolidifyError> {
    let pad = settings.padding;
    let xmin = f64::from(lo.x) - pad;
    let xmax = f64::from(hi.x) + pad;
    let ymin = f64::from(lo.y) - pad;
    let ymax = f64::from(hi.y) + pad;
    let zmin = settings.zmin.unwrap_or(f64::from(lo.z) - pad);
    let zmax = settings.zmax.unwrap_or(f64::from(hi.z) + pad);

    if !(zmax > zmin) {
        return Err(DesolidifyError::InvalidParameter(format!(
            "zmax ({zmax}) must be greater than zmin ({zmin})"
        )));
    }

    let nx = ((xmax - xmin) / voxel).ceil() as usize + 1;
    let ny = ((ymax - ymin) / voxel).ceil() as usize + 1;
    let nz = ((zmax - zmin) / voxel).ceil() as usize + 1;

    if nx < 2 || ny < 2 || nz < 2 {
        return Err(DesolidifyError::GridTooSmall(format!(
            "sampling grid is {nx}x{ny}x{nz}, need at least 2 samples on every axis"
        )));
    }

    let centroid = mesh.centroid();
    let lattice = crate::lattice::build(
        (lo, hi),
        centroid,
        settings.orientations,
        settings.spacing,
        settings.stagger,
        settings.grid_align,
    );

    let gate_ctx = GateContext {
        z_min: zmin,
        z_max: zmax,
        mesh_z_min: f64::from(lo.z),
        shell_band: settings.shell_band,
        keep_top: settings.keep_top,
        keep_bottom: settings.keep_bottom,
        open_bottom: settings.open_bottom,
    };

    let mut volume = Volume::try_new(nx, ny, nz, voxel, Point3::new(xmin, ymin, zmin))?;
    let slice_plan: Vec<(usize, usize)> = volume.slice_indices(0).collect();

    for k in 0..nz {
        let z = zmin + k as f64 * voxel;

        let mut points = Vec::new();
        points.try_reserve(slice_plan.len())?;
        for &(i, j) in &slice_plan {
            points.push(volume.world_point(i, j, k));
        }

        let mut mesh_sdf_vals = Vec::new();
        mesh_sdf::sample_chunked(
            backend,
            prepared,
            &points,
            chunk_pts as usize,
            &mut mesh_sdf_vals,
        )?;

        for (idx, &(i, j)) in slice_plan.iter().enumerate() {
            let p = points[idx];
            let mesh_d = mesh_sdf_vals[idx];
            let hole_d = crate::hole_sdf::sdf(p, &lattice, settings.radius);
            let sample = compose::compose(z, mesh_d, hole_d, &gate_ctx);
            volume.set(i, j, k, sample);
        }

        let frac = (k + 1) as f64 / nz as f64;
        if progress.on_progress(frac) == ControlFlow::Abort {
            return Err(DesolidifyError::Cancelled);
        }
    }

    crate::isosurface::extract(&volume).validate()
}
