// SPDX-License-Identifier: AGPL-3.0-or-later
//! Lattice center generation: the 2-D grids (and radial spoke directions)
//! that anchor each active hole family.


use crate::settings::{GridAlign, Orientations};
use nalgebra::Point3;

/// Nudge applied to lattice-plane coordinates only, never to the voxel
/// grid. Without it a hole center exactly on a bounding-box edge can flip
/// a boundary sample in or out of the grid depending on float rounding.
pub const LATTICE_EPSILON: f64 = 1e-6;

/// One 2-D grid of hole centers lying in the plane perpendicular to an
/// axis-aligned cylinder family's axis.
#[derive(Debug, Clone, Default)]
pub struct PlaneGrid {
    pub centers: Vec<(f64, f64)>,
}

/// Radial cylinder axes: one per staggered XY lattice center, each lying in
/// the XY plane and pointing away from the mesh centroid through that
/// center. `centers[i]` pairs with `directions[i]`.
#[derive(Debug, Clone, Default)]
pub struct RadialLattice {
    /// `(x, y)` of the lattice center each direction passes through.
    pub centers: Vec<(f64, f64)>,
    /// Unit `(dx, dy)` direction for the matching center, pointing away
    /// from the centroid.
    pub directions: Vec<(f64, f64)>,
}

/// The full set of generated lattices: one plane grid per axis-aligned
/// family that is active, plus the radial spokes if that family is active.
/// An inactive family is left at its empty default.
#[derive(Debug, Clone, Default)]
pub struct Lattice {
    pub z: PlaneGrid,
    pub x: PlaneGrid,
    pub y: PlaneGrid,
    pub radial: RadialLattice,
}

/// The first grid line at or after `min` for the given alignment. `Min`
/// forces a line exactly on `min`; `Centroid` offsets by half a spacing
/// and wraps the anchor's distance from `min` into `[0, spacing)`, so the
/// grid straddles the anchor instead of running a line through it.
fn aligned_start(min: f64, anchor_v: f64, spacing: f64, align: GridAlign) -> f64 {
    match align {
        GridAlign::Min => min,
        GridAlign::Centroid => min + spacing / 2.0 + (anchor_v - min).rem_euclid(spacing),
    }
}

/// Generates 1-D grid coordinates covering `[min, max]`.
fn grid_1d(min: f64, max: f64, spacing: f64, anchor_v: f64, align: GridAlign) -> Vec<f64> {
    if spacing <= 0.0 || max < min {
        return Vec::new();
    }
    let start = aligned_start(min, anchor_v, spacing, align);
    let mut out = Vec::new();
    let mut v = start;
    while v <= max + LATTICE_EPSILON {
        if v >= min - LATTICE_EPSILON {
            out.push(v);
        }
        v += spacing;
    }
    out
}

/// Builds a 2-D grid of hole centers in a plane with coordinates `(u, v)`,
/// staggering every other row by half a spacing when `stagger` is set.
#[allow(clippy::too_many_arguments)]
fn plane_grid(
    u_min: f64,
    u_max: f64,
    u_anchor: f64,
    v_min: f64,
    v_max: f64,
    v_anchor: f64,
    spacing: f64,
    stagger: bool,
    align: GridAlign,
) -> PlaneGrid {
    let vs = grid_1d(v_min, v_max, spacing, v_anchor, align);
    let mut centers = Vec::new();
    for (row, &v) in vs.iter().enumerate() {
        let offset = if stagger && row % 2 == 1 {
            spacing / 2.0
        } else {
            0.0
        };
        let us = grid_1d(u_min - offset, u_max - offset, spacing, u_anchor, align);
        for u in us {
            centers.push((u + offset, v));
        }
    }
    PlaneGrid { centers }
}

/// Generates every active family's lattice from the mesh's bounds/centroid
/// and the coerced settings.
pub fn build(
    bounds: (Point3<f32>, Point3<f32>),
    centroid: Point3<f32>,
    orientations: Orientations,
    spacing: f64,
    stagger: bool,
    align: GridAlign,
) -> Lattice {
    let (lo, hi) = bounds;
    let (xmin, ymin, zmin) = (lo.x as f64, lo.y as f64, lo.z as f64);
    let (xmax, ymax, zmax) = (hi.x as f64, hi.y as f64, hi.z as f64);
    let (cx, cy, cz) = (centroid.x as f64, centroid.y as f64, centroid.z as f64);

    let mut lattice = Lattice::default();

    if orientations.z {
        lattice.z = plane_grid(xmin, xmax, cx, ymin, ymax, cy, spacing, stagger, align);
    }
    if orientations.x {
        lattice.x = plane_grid(ymin, ymax, cy, zmin, zmax, cz, spacing, stagger, align);
    }
    if orientations.y {
        lattice.y = plane_grid(xmin, xmax, cx, zmin, zmax, cz, spacing, stagger, align);
    }
    if orientations.radial {
        // Radial axes radiate from the centroid through the same
        // staggered XY lattice the Z family's hole centers sit on; the
        // direction to each center is the cylinder axis.
        let xy = plane_grid(xmin, xmax, cx, ymin, ymax, cy, spacing, stagger, align);
        let mut centers = Vec::with_capacity(xy.centers.len());
        let mut directions = Vec::with_capacity(xy.centers.len());
        for (gx, gy) in xy.centers {
            let dx = gx - cx;
            let dy = gy - cy;
            let norm = (dx * dx + dy * dy).sqrt();
            // A lattice center coinciding with the centroid has no well
            // defined radial direction; fall back to the convention used
            // elsewhere for a zero-footprint mesh, a spoke along +X.
            let dir = if norm > LATTICE_EPSILON {
                (dx / norm, dy / norm)
            } else {
                (1.0, 0.0)
            };
            centers.push((gx, gy));
            directions.push(dir);
        }
        lattice.radial = RadialLattice {
            centers,
            directions,
        };
    }

    lattice
}
