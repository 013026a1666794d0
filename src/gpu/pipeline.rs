use std::borrow::Cow;

use bevy::prelude::*;
use bevy::render::graph::CameraDriverLabel;
use bevy::render::render_graph::{
    Node, NodeRunError, RenderGraph, RenderGraphContext, RenderLabel,
};
use bevy::render::render_resource::{
    CachedComputePipelineId, ComputePassDescriptor, ComputePipeline, ComputePipelineDescriptor,
    PipelineCache, PushConstantRange, ShaderDefVal,
};
use bevy::render::renderer::RenderContext;

use crate::gpu::bindings;
use crate::gpu::buffers::{ExtractedDispatch, SimBindGroup, SimBindGroupLayout};
use crate::sim::dispatch::SimPass;

#[derive(Resource)]
pub struct FieldPipeline(pub ComputePipeline);

#[derive(Resource)]
pub struct ParticlePipeline(pub ComputePipeline);

#[derive(Debug, Hash, PartialEq, Eq, Clone, RenderLabel)]
pub struct FieldPassLabel;

#[derive(Debug, Hash, PartialEq, Eq, Clone, RenderLabel)]
pub struct ParticlePassLabel;

#[derive(Default)]
struct FieldNode;

#[derive(Default)]
struct ParticleNode;

impl Node for FieldNode {
    fn run(
        &self,
        _graph: &mut RenderGraphContext,
        render_context: &mut RenderContext,
        world: &World,
    ) -> Result<(), NodeRunError> {
        let Some(pipeline) = world.get_resource::<FieldPipeline>() else {
            return Ok(());
        };
        run_sim_pass(render_context, world, &pipeline.0, SimPass::Field)
    }
}

impl Node for ParticleNode {
    fn run(
        &self,
        _graph: &mut RenderGraphContext,
        render_context: &mut RenderContext,
        world: &World,
    ) -> Result<(), NodeRunError> {
        let Some(pipeline) = world.get_resource::<ParticlePipeline>() else {
            return Ok(());
        };
        run_sim_pass(render_context, world, &pipeline.0, SimPass::Particles)
    }
}

/// Encodes one compute pass if its population is active this frame. A
/// missing bind group or plan means the frame is silently skipped.
fn run_sim_pass(
    render_context: &mut RenderContext,
    world: &World,
    pipeline: &ComputePipeline,
    sim_pass: SimPass,
) -> Result<(), NodeRunError> {
    let Some(bind_group) = world.get_resource::<SimBindGroup>() else {
        return Ok(());
    };
    let Some(dispatch) = world.get_resource::<ExtractedDispatch>() else {
        return Ok(());
    };
    if !dispatch.plan.passes().any(|pass| pass == sim_pass) {
        return Ok(());
    }
    let groups = dispatch.plan.groups_for(sim_pass);
    if groups == 0 {
        return Ok(());
    }

    let mut pass = render_context
        .command_encoder()
        .begin_compute_pass(&ComputePassDescriptor::default());

    pass.set_pipeline(pipeline);
    pass.set_bind_group(0, &bind_group.0, &[]);
    pass.dispatch_workgroups(groups, 1, 1);

    Ok(())
}

/// Queues both kernels out of the same shader module, then swaps the
/// compiled pipelines in once the cache has them.
pub fn prepare_sim_pipelines(
    mut commands: Commands,
    pipeline_cache: Res<PipelineCache>,
    layout: Res<SimBindGroupLayout>,
    mut pipeline_ids: Local<Option<(CachedComputePipelineId, CachedComputePipelineId)>>,
    assets: Res<AssetServer>,
) {
    if pipeline_ids.is_none() {
        let shader: Handle<Shader> = assets.load(bindings::SIM_SHADER_PATH);
        let field_desc = ComputePipelineDescriptor {
            label: Some("field_update_pipeline".into()),
            layout: vec![layout.0.clone()],
            push_constant_ranges: Vec::<PushConstantRange>::new(),
            shader: shader.clone(),
            shader_defs: Vec::<ShaderDefVal>::new(),
            entry_point: Cow::from(bindings::FIELD_UPDATE),
            zero_initialize_workgroup_memory: false,
        };
        let particle_desc = ComputePipelineDescriptor {
            label: Some("particle_update_pipeline".into()),
            layout: vec![layout.0.clone()],
            push_constant_ranges: Vec::<PushConstantRange>::new(),
            shader,
            shader_defs: Vec::<ShaderDefVal>::new(),
            entry_point: Cow::from(bindings::PARTICLE_UPDATE),
            zero_initialize_workgroup_memory: false,
        };
        *pipeline_ids = Some((
            pipeline_cache.queue_compute_pipeline(field_desc),
            pipeline_cache.queue_compute_pipeline(particle_desc),
        ));
        return; // waits for compilation
    }

    if let Some((field_id, particle_id)) = *pipeline_ids {
        if let Some(pipeline) = pipeline_cache.get_compute_pipeline(field_id) {
            commands.insert_resource(FieldPipeline(pipeline.clone()));
        }
        if let Some(pipeline) = pipeline_cache.get_compute_pipeline(particle_id) {
            commands.insert_resource(ParticlePipeline(pipeline.clone()));
        }
    }
}

/// Field strictly before particles, both before the cameras run, so the
/// draw pass always sees this frame's steering.
pub fn add_sim_nodes_to_graph(render_app: &mut bevy::app::SubApp) {
    let mut graph = render_app.world_mut().resource_mut::<RenderGraph>();
    graph.add_node(FieldPassLabel, FieldNode::default());
    graph.add_node(ParticlePassLabel, ParticleNode::default());
    graph.add_node_edge(FieldPassLabel, ParticlePassLabel);
    graph.add_node_edge(ParticlePassLabel, CameraDriverLabel);
}
