//! Axis-aligned sampling grid derived from the simulation bounds.

use glam::{UVec3, Vec3};

use crate::sim::error::SimError;

/// Per-axis structure of the flow field grid. Computed once per
/// initialization and treated as immutable until the next reconfigure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridTopology {
    pub cell_size: f32,
    pub bounds_extent: Vec3,
    pub counts: UVec3,
    pub total_points: u32,
}

impl GridTopology {
    /// Derives the per-axis cell counts by flooring `extent / cell_size`.
    /// A grid that floors to zero along any axis is rejected before any
    /// allocation can happen.
    pub fn compute(cell_size: f32, bounds_extent: Vec3) -> Result<Self, SimError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(SimError::Configuration(format!(
                "cell size must be finite and positive, got {cell_size}"
            )));
        }
        if !bounds_extent.is_finite() || bounds_extent.min_element() <= 0.0 {
            return Err(SimError::Configuration(format!(
                "bounds extent must be finite and positive on every axis, got {bounds_extent}"
            )));
        }

        let counts = (bounds_extent / cell_size).floor().as_uvec3();
        let total_points = counts
            .x
            .checked_mul(counts.y)
            .and_then(|xy| xy.checked_mul(counts.z))
            .ok_or_else(|| {
                SimError::Configuration(format!(
                    "grid of {} x {} x {} cells overflows the point count",
                    counts.x, counts.y, counts.z
                ))
            })?;
        if total_points == 0 {
            return Err(SimError::Configuration(format!(
                "degenerate grid: extent {bounds_extent} with cell size {cell_size} \
                 floors to zero cells on at least one axis"
            )));
        }

        Ok(Self {
            cell_size,
            bounds_extent,
            counts,
            total_points,
        })
    }

    /// Flat storage index for a grid coordinate, x-major then y then z.
    /// The device kernels index the sample array with the same formula.
    #[inline]
    pub fn flat_index(&self, coords: UVec3) -> u32 {
        (coords.x * self.counts.y + coords.y) * self.counts.z + coords.z
    }

    /// Inverse of [`flat_index`](Self::flat_index).
    #[inline]
    pub fn coords_of(&self, index: u32) -> UVec3 {
        let z = index % self.counts.z;
        let y = (index / self.counts.z) % self.counts.y;
        let x = index / (self.counts.z * self.counts.y);
        UVec3::new(x, y, z)
    }

    /// World-space position of a sample point: cells are stratified over
    /// the bounds and each sample sits half a cell in from its cell origin.
    pub fn sample_position(&self, coords: UVec3, bounds_center: Vec3) -> Vec3 {
        let origin = bounds_center - self.bounds_extent / 2.0;
        let stride = self.bounds_extent / self.counts.as_vec3();
        origin + stride * coords.as_vec3() + Vec3::splat(self.cell_size / 2.0)
    }

    /// All grid coordinates in flat-index order.
    pub fn iter_coords(&self) -> impl Iterator<Item = UVec3> {
        let counts = self.counts;
        (0..counts.x).flat_map(move |x| {
            (0..counts.y)
                .flat_map(move |y| (0..counts.z).map(move |z| UVec3::new(x, y, z)))
        })
    }
}
