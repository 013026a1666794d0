use bytemuck::{Pod, Zeroable};

use crate::sim::dispatch::FrameConstants;
use crate::sim::sample::{FieldSample, Particle, ELEM_BYTES};

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuFieldSample {
    // not using glam, WGSL side is packed scalars to keep the 28-byte stride
    pub position: [f32; 3],
    pub direction: [f32; 3],
    pub intensity: f32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuParticle {
    pub position: [f32; 3],
    pub direction: [f32; 3],
    pub speed: f32,
}

/// Uniform block read by both kernels, rebuilt every frame.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SimConstants {
    pub bounds_extent: [f32; 3],
    pub bounds_position: [f32; 3],
    pub counts: [u32; 3],
    pub rotation_speed: f32,
    pub delta_time: f32,
    pub jitter: f32,
}

impl From<FieldSample> for GpuFieldSample {
    fn from(sample: FieldSample) -> Self {
        Self {
            position: sample.position.to_array(),
            direction: sample.direction.to_array(),
            intensity: sample.intensity,
        }
    }
}

impl From<Particle> for GpuParticle {
    fn from(particle: Particle) -> Self {
        Self {
            position: particle.position.to_array(),
            direction: particle.direction.to_array(),
            speed: particle.speed,
        }
    }
}

impl From<FrameConstants> for SimConstants {
    fn from(frame: FrameConstants) -> Self {
        Self {
            bounds_extent: frame.bounds_extent.to_array(),
            bounds_position: frame.bounds_position.to_array(),
            counts: frame.counts.to_array(),
            rotation_speed: frame.rotation_speed,
            delta_time: frame.delta_time,
            jitter: frame.jitter,
        }
    }
}

const _: () = assert!(std::mem::size_of::<GpuFieldSample>() as u64 == ELEM_BYTES);
const _: () = assert!(std::mem::size_of::<GpuParticle>() as u64 == ELEM_BYTES);
const _: () = assert!(std::mem::size_of::<SimConstants>() == 48);
