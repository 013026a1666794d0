use bevy::prelude::*;

use crate::sim::error::SimError;

pub mod sim {
    pub mod dispatch;
    pub mod error;
    pub mod lifecycle;
    pub mod sample;
    pub mod topology;
}

pub mod gpu {
    pub mod bindings;
    pub mod buffers;
    pub mod draw_buffers;
    pub mod draw_pass;
    pub mod draw_pipeline;
    pub mod ffi;
    pub mod pipeline;
}

pub use gpu::buffers::FlowFieldPlugin;

/// Thread group widths the device kernels can be dispatched at.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ThreadGroupWidth {
    T1 = 1,
    T4 = 4,
    T8 = 8,
    T16 = 16,
    T32 = 32,
    T64 = 64,
    T128 = 128,
    T256 = 256,
    T512 = 512,
    T1024 = 1024,
}

impl ThreadGroupWidth {
    pub const fn width(self) -> u32 {
        self as u32
    }
}

/// Supported particle populations. Enumerated so a zero-sized population
/// cannot be configured at all.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParticleCount {
    P1k = 1_024,
    P4k = 4_096,
    P16k = 16_384,
    P65k = 65_536,
    P262k = 262_144,
}

impl ParticleCount {
    pub const fn count(self) -> u32 {
        self as u32
    }
}

/// Which kernels run each frame. Buffers for both populations exist in
/// every mode; a disabled population is simply never dispatched or drawn.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SimMode {
    FieldOnly,
    ParticlesOnly,
    Both,
}

impl SimMode {
    pub fn field_active(self) -> bool {
        matches!(self, SimMode::FieldOnly | SimMode::Both)
    }

    pub fn particles_active(self) -> bool {
        matches!(self, SimMode::ParticlesOnly | SimMode::Both)
    }
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct FlowFieldConfig {
    pub bounds_extent: Vec3,
    pub bounds_position: Vec3,
    pub cell_size: f32,
    pub particle_count: ParticleCount,
    pub thread_group_width: ThreadGroupWidth,
    pub rotation_speed: f32, // radians per second
    pub jitter: f32,
    pub mode: SimMode,
    pub seed: u64,
}

impl Default for FlowFieldConfig {
    fn default() -> Self {
        Self {
            bounds_extent: Vec3::splat(10.0),
            bounds_position: Vec3::ZERO,
            cell_size: 0.5,
            particle_count: ParticleCount::P16k,
            thread_group_width: ThreadGroupWidth::T256,
            rotation_speed: 0.6,
            jitter: 0.15,
            mode: SimMode::Both,
            seed: 2016,
        }
    }
}

impl FlowFieldConfig {
    /// Scalar sanity checks. Grid shape is validated separately when the
    /// topology is computed.
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.rotation_speed.is_finite() || !self.jitter.is_finite() {
            return Err(SimError::Configuration(format!(
                "rotation speed and jitter must be finite, got {} and {}",
                self.rotation_speed, self.jitter
            )));
        }
        if !self.bounds_position.is_finite() {
            return Err(SimError::Configuration(format!(
                "bounds position must be finite, got {}",
                self.bounds_position
            )));
        }
        Ok(())
    }
}

/// Wire-frame of the simulation bounds. Add alongside the plugin when the
/// volume should be visible.
pub fn draw_bounds_gizmo(mut gizmos: Gizmos, config: Res<FlowFieldConfig>) {
    gizmos.cuboid(
        Transform::from_translation(config.bounds_position).with_scale(config.bounds_extent),
        Color::srgb(0.65, 0.65, 0.7),
    );
}
