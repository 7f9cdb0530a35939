// SPDX-License-Identifier: AGPL-3.0-or-later
//! Typed perforation parameters, range table, and the coercion/clamp pass
//! that turns a loose `key -> value` map into a feasible [`Settings`].

#[cfg(test)]
mod tests;

use crate::DesolidifyError;
use std::collections::HashMap;
use std::str::FromStr;

/// The loose parameter map accepted at the (out-of-scope) HTTP/job boundary.
/// Mirrors a flattened JSON payload: every value arrives as a string.
pub type ParamMap = HashMap<String, String>;

/// Which side of the lattice a hole family's axis lines up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Orientations {
    pub x: bool,
    pub y: bool,
    pub z: bool,
    pub radial: bool,
}

impl Orientations {
    pub fn any(&self) -> bool {
        self.x || self.y || self.z || self.radial
    }
}

impl FromStr for Orientations {
    type Err = ();

    /// Families are derived by substring search, matching the reference
    /// implementation's `"xyz".lower()` membership test: `"xy"`, `"xz"`,
    /// `"radial"`, `"xyz"` etc. are all valid spellings, not just the eight
    /// enum choices advertised in the schema.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Ok(Orientations {
            x: lower.contains('x'),
            y: lower.contains('y'),
            z: lower.contains('z'),
            radial: lower.contains("radial"),
        })
    }
}

impl std::fmt::Display for Orientations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = String::new();
        if self.x {
            s.push('x');
        }
        if self.y {
            s.push('y');
        }
        if self.z {
            s.push('z');
        }
        if self.radial {
            s.push_str("radial");
        }
        write!(f, "{s}")
    }
}

/// Where the lattice is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridAlign {
    Min,
    #[default]
    Centroid,
}

impl FromStr for GridAlign {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.to_lowercase().starts_with("cent") {
            Ok(GridAlign::Centroid)
        } else if s.eq_ignore_ascii_case("min") {
            Ok(GridAlign::Min)
        } else {
            Err(())
        }
    }
}

/// A closed numeric range used both to clamp a field and to validate the
/// post-clamp invariant in tests.
#[derive(Debug, Clone, Copy)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn clamp(&self, v: f64) -> f64 {
        v.clamp(self.min, self.max)
    }
}

/// Authoritative parameter ranges, mirroring the reference schema table.
pub mod ranges {
    use super::Range;

    pub const SPACING: Range = Range::new(8.0, 30.0);
    pub const RADIUS: Range = Range::new(1.2, 5.0);
    pub const VOXEL: Range = Range::new(0.2, 1.2);
    pub const SHELL_BAND: Range = Range::new(0.8, 2.0);
    pub const KEEP_TOP: Range = Range::new(-1.0, 4.0);
    pub const KEEP_BOTTOM: Range = Range::new(-1.0, 4.0);
    pub const OPEN_BOTTOM: Range = Range::new(0.0, 6.0);
    pub const DENSITY: Range = Range::new(0.02, 0.35);
    pub const FAST: Range = Range::new(0.0, 2.0);
    pub const CHUNK: Range = Range::new(100_000.0, 2_500_000.0);
    pub const MEM_DELAY: Range = Range::new(5.0, 60.0);
    pub const MEM_TRIES: Range = Range::new(1.0, 10.0);
    pub const PADDING: Range = Range::new(0.0, 10.0);
}

/// Documented defaults, one per field, used whenever a key is missing or
/// fails to coerce.
pub mod defaults {
    pub const SPACING: f64 = 12.0;
    pub const RADIUS: f64 = 2.5;
    pub const VOXEL: f64 = 0.3;
    pub const ORIENTATIONS: &str = "radial";
    pub const STAGGER: bool = true;
    pub const SHELL_BAND: f64 = 1.2;
    pub const KEEP_TOP: f64 = 1.0;
    pub const KEEP_BOTTOM: f64 = 0.5;
    pub const OPEN_BOTTOM: f64 = 1.5;
    pub const GRID_ALIGN: &str = "centroid";
    pub const FAST_FACTOR: i32 = 1;
    pub const CHUNK_PTS: u32 = 1_500_000;
    pub const MEM_RETRY: bool = true;
    pub const MEM_DELAY: f64 = 12.0;
    pub const MEM_TRIES: u32 = 6;
    pub const PADDING: f64 = 2.0;
}

/// A fully coerced, clamped, and feasibility-checked set of perforation
/// parameters. Constructing one always goes through [`Settings::from_params`]
/// followed by [`Settings::clamp`] (or just [`Settings::from_params_clamped`],
/// which does both); there is no public constructor that skips the clamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Center-to-center hole spacing, mm.
    pub spacing: f64,
    /// Hole radius, mm.
    pub radius: f64,
    /// SDF sampling step, mm.
    pub voxel: f64,
    pub orientations: Orientations,
    pub stagger: bool,
    pub grid_align: GridAlign,
    /// Target open area `pi*r^2/s^2`; accepted and clamped but not otherwise
    /// consulted by the algorithm (see `SPEC_FULL.md` §3).
    pub density: Option<f64>,

    /// Thickness from the shell within which holes are allowed, mm.
    pub shell_band: f64,
    /// Keep-out at the rim, mm. `-1.0` disables the gate.
    pub keep_top: f64,
    /// Keep-out near the base, mm. `-1.0` disables the gate.
    pub keep_bottom: f64,
    /// Disables shell-band gating for this many mm near the model's base.
    pub open_bottom: f64,
    pub zmin: Option<f64>,
    pub zmax: Option<f64>,
    /// Margin added around the mesh bounds before gridding, mm.
    pub padding: f64,

    /// Max points per signed-distance batch.
    pub chunk_pts: u32,
    pub mem_retry: bool,
    /// Seconds to sleep before an OOM retry.
    pub mem_delay: f64,
    /// Total attempts under memory pressure.
    pub mem_tries: u32,

    /// Preview accelerator: 0 = off, 1-2 lift the voxel floor.
    pub fast_factor: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings::from_params_clamped(&ParamMap::new())
            .expect("defaults always coerce successfully")
    }
}

impl Settings {
    /// Build a `Settings` from a loose string map, applying documented
    /// defaults for missing keys and falling back to defaults for
    /// non-numeric values. Does **not** clamp; call [`Settings::clamp`]
    /// (or use [`Settings::from_params_clamped`]) before using the result.
    pub fn from_params(params: &ParamMap) -> Result<Settings, DesolidifyError> {
        let fast_factor = parse_int_or_default(params, "fast", defaults::FAST_FACTOR);
        let mut voxel = parse_f64_or_default(params, "voxel", defaults::VOXEL);
        if fast_factor > 0 {
            voxel = voxel.max(0.6 + 0.3 * fast_factor as f64);
        }

        Ok(Settings {
            spacing: parse_f64_or_default(params, "spacing", defaults::SPACING),
            radius: parse_f64_or_default(params, "radius", defaults::RADIUS),
            voxel,
            orientations: parse_enum_or_default(params, "orientations", defaults::ORIENTATIONS),
            stagger: parse_bool_or_default(params, "stagger", defaults::STAGGER),
            grid_align: parse_enum_or_default(params, "grid_align", defaults::GRID_ALIGN),
            density: parse_optional_f64(params, "density"),
            shell_band: parse_f64_or_default(params, "shell_band", defaults::SHELL_BAND),
            keep_top: parse_f64_or_default(params, "keep_top", defaults::KEEP_TOP),
            keep_bottom: parse_f64_or_default(params, "keep_bottom", defaults::KEEP_BOTTOM),
            open_bottom: parse_f64_or_default(params, "open_bottom", defaults::OPEN_BOTTOM),
            zmin: parse_optional_f64(params, "zmin"),
            zmax: parse_optional_f64(params, "zmax"),
            padding: parse_f64_or_default(params, "padding", defaults::PADDING),
            chunk_pts: parse_int_or_default(params, "chunk", defaults::CHUNK_PTS as i64) as u32,
            mem_retry: !parse_bool_or_default(params, "mem_retry_off", false),
            mem_delay: parse_f64_or_default(params, "mem_delay", defaults::MEM_DELAY),
            mem_tries: parse_int_or_default(params, "mem_tries", defaults::MEM_TRIES as i64) as u32,
            fast_factor,
        })
    }

    /// `from_params` followed by `clamp`, the usual entry point.
    pub fn from_params_clamped(params: &ParamMap) -> Result<Settings, DesolidifyError> {
        Ok(Self::from_params(params)?.clamp())
    }

    /// Clamp every ranged field, then enforce the web-thickness feasibility
    /// invariant and re-clamp `spacing`. Idempotent: `clamp(clamp(x)) ==
    /// clamp(x)`.
    #[must_use]
    pub fn clamp(mut self) -> Self {
        self.spacing = ranges::SPACING.clamp(self.spacing);
        self.radius = ranges::RADIUS.clamp(self.radius);
        self.voxel = ranges::VOXEL.clamp(self.voxel);
        self.shell_band = ranges::SHELL_BAND.clamp(self.shell_band);
        self.keep_top = ranges::KEEP_TOP.clamp(self.keep_top);
        self.keep_bottom = ranges::KEEP_BOTTOM.clamp(self.keep_bottom);
        self.open_bottom = ranges::OPEN_BOTTOM.clamp(self.open_bottom);
        self.padding = ranges::PADDING.clamp(self.padding);
        self.density = self.density.map(|d| ranges::DENSITY.clamp(d));
        self.chunk_pts = ranges::CHUNK.clamp(self.chunk_pts as f64).round() as u32;
        self.mem_delay = ranges::MEM_DELAY.clamp(self.mem_delay);
        self.mem_tries = ranges::MEM_TRIES.clamp(self.mem_tries as f64).round() as u32;

        // Web-thickness feasibility: spacing >= 2*radius + shell_band.
        let min_spacing = self.spacing.max(2.0 * self.radius + self.shell_band);
        self.spacing = ranges::SPACING.clamp(min_spacing);
        self
    }

    /// Merge a named preset's entries under the documented defaults, then
    /// apply `overrides` on top, mirroring the reference implementation's
    /// `defaults -> preset -> explicit overrides` precedence.
    pub fn from_preset(
        preset: &ParamMap,
        overrides: &ParamMap,
    ) -> Result<Settings, DesolidifyError> {
        let mut merged = preset.clone();
        for (k, v) in overrides {
            let _ = merged.insert(k.clone(), v.clone());
        }
        Self::from_params_clamped(&merged)
    }
}

fn parse_f64_or_default(params: &ParamMap, key: &str, default: f64) -> f64 {
    params
        .get(key)
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(default)
}

fn parse_optional_f64(params: &ParamMap, key: &str) -> Option<f64> {
    params.get(key).and_then(|v| v.parse::<f64>().ok())
}

fn parse_int_or_default(params: &ParamMap, key: &str, default: i64) -> i64 {
    params
        .get(key)
        .and_then(|v| v.parse::<f64>().ok())
        .map(|v| v.trunc() as i64)
        .unwrap_or(default)
}

fn parse_bool_or_default(params: &ParamMap, key: &str, default: bool) -> bool {
    match params.get(key) {
        None => default,
        Some(v) => {
            let lower = v.to_lowercase();
            match lower.as_str() {
                "true" | "1" | "yes" | "on" => true,
                "false" | "0" | "no" | "off" => false,
                _ => default,
            }
        }
    }
}

fn parse_enum_or_default<T: FromStr + Default>(params: &ParamMap, key: &str, default: &str) -> T {
    params
        .get(key)
        .map(|s| s.as_str())
        .unwrap_or(default)
        .parse()
        .unwrap_or_else(|_| default.parse().unwrap_or_default())
}
