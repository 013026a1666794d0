//! Dispatch geometry: how many thread groups each kernel needs, and the
//! per-frame constants both kernels read.

use glam::{UVec3, Vec3};

use crate::sim::topology::GridTopology;
use crate::{FlowFieldConfig, SimMode, ThreadGroupWidth};

/// Thread groups covering `elements` invocations at the given width,
/// rounded up so a partial group still runs. Out-of-range lanes are
/// clipped inside the kernels.
#[inline]
pub fn group_count(elements: u32, width: ThreadGroupWidth) -> u32 {
    let w = width.width();
    (elements + w - 1) / w
}

/// The two device passes, in the order they must be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimPass {
    Field,
    Particles,
}

/// Group counts and element counts for one simulation frame. Fixed at
/// initialization; only the constants change per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchPlan {
    pub mode: SimMode,
    pub field_len: u32,
    pub particle_len: u32,
    pub field_groups: u32,
    pub particle_groups: u32,
}

impl DispatchPlan {
    pub fn new(mode: SimMode, field_len: u32, particle_len: u32, width: ThreadGroupWidth) -> Self {
        Self {
            mode,
            field_len,
            particle_len,
            field_groups: group_count(field_len, width),
            particle_groups: group_count(particle_len, width),
        }
    }

    /// Passes enabled by the mode, field strictly before particles.
    pub fn passes(&self) -> impl Iterator<Item = SimPass> {
        let mode = self.mode;
        [SimPass::Field, SimPass::Particles]
            .into_iter()
            .filter(move |pass| match pass {
                SimPass::Field => mode.field_active(),
                SimPass::Particles => mode.particles_active(),
            })
    }

    pub fn groups_for(&self, pass: SimPass) -> u32 {
        match pass {
            SimPass::Field => self.field_groups,
            SimPass::Particles => self.particle_groups,
        }
    }
}

/// Everything the kernels read per frame. Assembled fresh each frame from
/// the live configuration, never cached across frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameConstants {
    pub bounds_extent: Vec3,
    pub bounds_position: Vec3,
    pub counts: UVec3,
    pub rotation_speed: f32,
    pub delta_time: f32,
    pub jitter: f32,
}

impl FrameConstants {
    pub fn assemble(config: &FlowFieldConfig, topology: &GridTopology, delta_time: f32) -> Self {
        Self {
            bounds_extent: config.bounds_extent,
            bounds_position: config.bounds_position,
            counts: topology.counts,
            rotation_speed: config.rotation_speed,
            delta_time,
            jitter: config.jitter,
        }
    }
}
