// SPDX-License-Identifier: AGPL-3.0-or-later
//! The sampled scalar volume: a row-major `f32` grid over the padded mesh
//! bounds, indexed `[k][j][i]` (z outermost, x innermost) to match the
//! per-z-slice fill order the driver uses.

use nalgebra::Point3;

/// A dense `nx * ny * nz` grid of `f32` samples plus the affine mapping
/// from grid index to world-space coordinates.
#[derive(Debug, Clone)]
pub struct Volume {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    pub voxel: f64,
    /// World coordinates of sample `(0, 0, 0)`.
    pub origin: Point3<f64>,
    /// Row-major samples: `data[(k * ny + j) * nx + i]`.
    pub data: Vec<f32>,
}

impl Volume {
    /// Allocates a zero-filled volume, surfacing allocator exhaustion as a
    /// typed error instead of aborting the process.
    pub fn try_new(
        nx: usize,
        ny: usize,
        nz: usize,
        voxel: f64,
        origin: Point3<f64>,
    ) -> Result<Volume, std::collections::TryReserveError> {
        let len = nx * ny * nz;
        let mut data = Vec::new();
        data.try_reserve_exact(len)?;
        data.resize(len, 0.0f32);
        Ok(Volume {
            nx,
            ny,
            nz,
            voxel,
            origin,
            data,
        })
    }

    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        (k * self.ny + j) * self.nx + i
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> f32 {
        self.data[self.index(i, j, k)]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, k: usize, v: f32) {
        let idx = self.index(i, j, k);
        self.data[idx] = v;
    }

    /// World-space coordinates of grid index `(i, j, k)`.
    pub fn world_point(&self, i: usize, j: usize, k: usize) -> Point3<f64> {
        Point3::new(
            self.origin.x + i as f64 * self.voxel,
            self.origin.y + j as f64 * self.voxel,
            self.origin.z + k as f64 * self.voxel,
        )
    }

    /// Every sample index in a single z-slice, for chunked slice-at-a-time
    /// filling.
    pub fn slice_indices(&self, _k: usize) -> impl Iterator<Item = (usize, usize)> {
        let nx = self.nx;
        (0..self.ny).flat_map(move |j| (0..nx).map(move |i| (i, j)))
    }

    pub fn slice_len(&self) -> usize {
        self.nx * self.ny
    }
}
