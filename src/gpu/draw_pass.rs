use bevy::core_pipeline::core_3d::graph::{Core3d, Node3d};
use bevy::prelude::*;
use bevy::render::render_graph::{
    NodeRunError, RenderGraphApp, RenderGraphContext, RenderLabel, ViewNode, ViewNodeRunner,
};
use bevy::render::render_resource::{PipelineCache, RenderPassDescriptor};
use bevy::render::renderer::RenderContext;
use bevy::render::view::ViewTarget;

use crate::gpu::buffers::{ExtractedDispatch, ExtractedSimBuffers};
use crate::gpu::draw_buffers::DrawBindGroups;
use crate::gpu::draw_pipeline::DrawPipeline;

#[derive(Debug, Hash, PartialEq, Eq, Clone, RenderLabel)]
pub struct PointsDrawPassLabel;

#[derive(Default)]
pub struct PointsDrawNode;

impl ViewNode for PointsDrawNode {
    // runs per view; the camera's ViewTarget is the attachment
    type ViewQuery = (&'static ViewTarget,);

    fn run(
        &self,
        _graph: &mut RenderGraphContext,
        rcx: &mut RenderContext,
        (view_target,): <Self::ViewQuery as bevy::ecs::query::QueryData>::Item<'_>,
        world: &World,
    ) -> Result<(), NodeRunError> {
        let Some(dp) = world.get_resource::<DrawPipeline>() else {
            return Ok(());
        };
        let cache = world.resource::<PipelineCache>();
        let Some(pipeline) = cache.get_render_pipeline(dp.0) else {
            return Ok(());
        };
        let Some(bind_groups) = world.get_resource::<DrawBindGroups>() else {
            return Ok(());
        };
        let Some(buffers) = world.get_resource::<ExtractedSimBuffers>() else {
            return Ok(());
        };
        let Some(dispatch) = world.get_resource::<ExtractedDispatch>() else {
            return Ok(());
        };
        let mode = dispatch.plan.mode;

        let mut pass = rcx.begin_tracked_render_pass(RenderPassDescriptor {
            label: Some("points_draw_pass"),
            color_attachments: &[Some(view_target.get_color_attachment())],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_render_pipeline(pipeline);

        // one vertex per element, straight out of the storage buffers
        if mode.field_active() && buffers.field_len > 0 {
            pass.set_bind_group(0, &bind_groups.field, &[]);
            pass.draw(0..buffers.field_len, 0..1);
        }
        if mode.particles_active() && buffers.particle_len > 0 {
            pass.set_bind_group(0, &bind_groups.particles, &[]);
            pass.draw(0..buffers.particle_len, 0..1);
        }
        Ok(())
    }
}

pub fn add_draw_node_to_graph(render_app: &mut bevy::app::SubApp) {
    render_app
        .add_render_graph_node::<ViewNodeRunner<PointsDrawNode>>(Core3d, PointsDrawPassLabel)
        .add_render_graph_edges(
            Core3d,
            (
                Node3d::MainTransparentPass,
                PointsDrawPassLabel,
                Node3d::EndMainPass,
            ),
        );
}
