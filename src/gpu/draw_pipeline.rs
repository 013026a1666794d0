use bevy::asset::AssetServer;
use bevy::prelude::*;
use bevy::render::render_resource::{
    BlendState, CachedPipelineState, CachedRenderPipelineId, ColorTargetState, ColorWrites,
    FragmentState, MultisampleState, PipelineCache, PrimitiveState, PrimitiveTopology,
    RenderPipelineDescriptor, Shader, TextureFormat, VertexState,
};

use crate::gpu::bindings;
use crate::gpu::draw_buffers::DrawBindGroupLayout;

#[derive(Resource)]
pub struct DrawPipeline(pub CachedRenderPipelineId);

/// Point-list pipeline over the population buffers. No vertex buffers:
/// the vertex stage pulls each point straight out of storage.
pub fn prepare_draw_pipeline(
    mut commands: Commands,
    cache: Res<PipelineCache>,
    bgl: Option<Res<DrawBindGroupLayout>>,
    assets: Res<AssetServer>,
    mut cached: Local<Option<CachedRenderPipelineId>>,
) {
    let Some(bgl) = bgl else {
        return;
    };

    if cached.is_none() {
        let shader: Handle<Shader> = assets.load(bindings::DRAW_SHADER_PATH);
        let desc = RenderPipelineDescriptor {
            label: Some("points_draw_pipeline".into()),
            layout: vec![bgl.0.clone()],
            vertex: VertexState {
                shader: shader.clone(),
                entry_point: bindings::DRAW_VERTEX.into(),
                shader_defs: vec![],
                buffers: vec![],
            },
            fragment: Some(FragmentState {
                shader,
                entry_point: bindings::DRAW_FRAGMENT.into(),
                shader_defs: vec![],
                targets: vec![Some(ColorTargetState {
                    format: TextureFormat::Rgba8UnormSrgb,
                    blend: Some(BlendState::ALPHA_BLENDING),
                    write_mask: ColorWrites::ALL,
                })],
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::PointList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: MultisampleState {
                count: 4, // matches the main pass target
                ..Default::default()
            },
            push_constant_ranges: vec![],
            zero_initialize_workgroup_memory: false,
        };

        *cached = Some(cache.queue_render_pipeline(desc));
        return; // waits for compilation
    }

    if let Some(id) = *cached {
        match cache.get_render_pipeline_state(id) {
            CachedPipelineState::Ok(_) => {
                commands.insert_resource(DrawPipeline(id));
            }
            CachedPipelineState::Err(err) => {
                error!("points draw pipeline failed to compile: {err:?}");
            }
            _ => {} // still queued or compiling
        }
    }
}
