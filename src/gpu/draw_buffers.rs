use bevy::prelude::*;
use bevy::render::render_resource::{
    BindGroup, BindGroupEntry, BindGroupLayout, BindGroupLayoutEntry, BindingType, Buffer,
    BufferBindingType, BufferInitDescriptor, BufferUsages, ShaderStages,
};
use bevy::render::renderer::{RenderDevice, RenderQueue};
use bevy::render::Extract;

use crate::gpu::bindings;
use crate::gpu::buffers::ExtractedSimBuffers;

// ---------------- Types ----------------

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawParams {
    pub clip_from_world: [[f32; 4]; 4],
    pub field_color: [f32; 4],
    pub particle_color: [f32; 4],
    pub population: u32, // 0 = field samples, 1 = particles
    pub _pad: [u32; 3],
}

const FIELD_COLOR: [f32; 4] = [0.25, 0.55, 0.9, 0.35];
const PARTICLE_COLOR: [f32; 4] = [1.0, 0.72, 0.25, 0.85];

/// One params UBO per population; same layout, different flag and tint.
#[derive(Resource)]
pub struct DrawParamsBuffers {
    pub field: Buffer,
    pub particles: Buffer,
}

#[derive(Resource, Clone)]
pub struct DrawBindGroupLayout(pub BindGroupLayout);

#[derive(Resource)]
pub struct DrawBindGroups {
    pub field: BindGroup,
    pub particles: BindGroup,
}

#[derive(Resource, Clone)]
pub struct ExtractedDrawParams {
    pub field: Buffer,
    pub particles: Buffer,
}

fn draw_params(clip_from_world: Mat4, population: u32) -> DrawParams {
    DrawParams {
        clip_from_world: clip_from_world.to_cols_array_2d(),
        field_color: FIELD_COLOR,
        particle_color: PARTICLE_COLOR,
        population,
        _pad: [0; 3],
    }
}

// ---------------- Systems (App world) ----------------

pub fn init_draw_params(mut commands: Commands, rd: Res<RenderDevice>) {
    let make = |population: u32, label: &'static str| {
        rd.create_buffer_with_data(&BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(&draw_params(Mat4::IDENTITY, population)),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        })
    };
    commands.insert_resource(DrawParamsBuffers {
        field: make(0, "field_draw_params"),
        particles: make(1, "particle_draw_params"),
    });
}

/// Refreshes both UBOs with the camera of the frame. Until a camera
/// exists the identity matrix from init stays in place.
pub fn update_draw_params(
    rq: Res<RenderQueue>,
    dp: Res<DrawParamsBuffers>,
    camera: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
) {
    let Ok((camera, transform)) = camera.single() else {
        return;
    };
    let clip_from_world = camera.clip_from_view() * transform.compute_matrix().inverse();

    rq.write_buffer(
        &dp.field,
        0,
        bytemuck::bytes_of(&draw_params(clip_from_world, 0)),
    );
    rq.write_buffer(
        &dp.particles,
        0,
        bytemuck::bytes_of(&draw_params(clip_from_world, 1)),
    );
}

pub fn init_draw_bind_group_layout(mut commands: Commands, rd: Res<RenderDevice>) {
    let bgl = rd.create_bind_group_layout(
        Some("draw_bind_group_layout"),
        &[
            BindGroupLayoutEntry {
                binding: bindings::SLOT_DRAW_POINTS.binding,
                visibility: ShaderStages::VERTEX,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            BindGroupLayoutEntry {
                binding: bindings::SLOT_DRAW_PARAMS.binding,
                visibility: ShaderStages::VERTEX | ShaderStages::FRAGMENT,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
    );
    commands.insert_resource(DrawBindGroupLayout(bgl));
}

// ---------------- Systems (Render world) ----------------

pub fn extract_draw_params(mut commands: Commands, dp: Extract<Option<Res<DrawParamsBuffers>>>) {
    if let Some(dp) = dp.as_ref() {
        commands.insert_resource(ExtractedDrawParams {
            field: dp.field.clone(),
            particles: dp.particles.clone(),
        });
    }
}

pub fn extract_draw_bind_group_layout(
    mut commands: Commands,
    layout: Extract<Res<DrawBindGroupLayout>>,
) {
    commands.insert_resource(DrawBindGroupLayout(layout.0.clone()));
}

/// One bind group per population: its storage buffer plus its params UBO.
pub fn prepare_draw_bind_groups(
    mut commands: Commands,
    rd: Res<RenderDevice>,
    layout: Option<Res<DrawBindGroupLayout>>,
    buffers: Option<Res<ExtractedSimBuffers>>,
    dp: Option<Res<ExtractedDrawParams>>,
) {
    let (Some(layout), Some(buffers), Some(dp)) = (layout, buffers, dp) else {
        commands.remove_resource::<DrawBindGroups>();
        return;
    };

    let make = |points: &Buffer, params: &Buffer, label: &'static str| {
        rd.create_bind_group(
            Some(label),
            &layout.0,
            &[
                BindGroupEntry {
                    binding: bindings::SLOT_DRAW_POINTS.binding,
                    resource: points.as_entire_binding(),
                },
                BindGroupEntry {
                    binding: bindings::SLOT_DRAW_PARAMS.binding,
                    resource: params.as_entire_binding(),
                },
            ],
        )
    };
    commands.insert_resource(DrawBindGroups {
        field: make(&buffers.field, &dp.field, "field_draw_bind_group"),
        particles: make(&buffers.particles, &dp.particles, "particle_draw_bind_group"),
    });
}
