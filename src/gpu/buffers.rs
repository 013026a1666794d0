use bevy::prelude::*;
use bevy::render::render_resource::{
    BindGroup, BindGroupEntry, BindGroupLayout, BindGroupLayoutEntry, BindingType, Buffer,
    BufferBindingType, BufferInitDescriptor, BufferUsages, ShaderStages,
};
use bevy::render::renderer::{RenderDevice, RenderQueue};
use bevy::render::{Extract, ExtractSchedule, Render, RenderApp, RenderSet};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::gpu::bindings;
use crate::gpu::draw_buffers::{
    extract_draw_bind_group_layout, extract_draw_params, init_draw_bind_group_layout,
    init_draw_params, prepare_draw_bind_groups, update_draw_params,
};
use crate::gpu::draw_pass::add_draw_node_to_graph;
use crate::gpu::draw_pipeline::prepare_draw_pipeline;
use crate::gpu::ffi::{GpuFieldSample, GpuParticle, SimConstants};
use crate::gpu::pipeline::{add_sim_nodes_to_graph, prepare_sim_pipelines};
use crate::sim::dispatch::{DispatchPlan, FrameConstants};
use crate::sim::error::SimError;
use crate::sim::lifecycle::{DeviceBudget, FlowFieldState};
use crate::sim::sample::{seed_field, seed_particles};
use crate::FlowFieldConfig;

// ==================== resources ======================================

/* one bind group layout covers both kernels: the constants UBO plus the two
population SSBOs, laid out exactly as the bindings table says. */
#[derive(Resource, Clone)]
pub struct SimBindGroupLayout(pub BindGroupLayout);

#[derive(Resource, Clone)]
pub struct SimBindGroup(pub BindGroup);

/// Main-world owner of the simulation lifecycle. The state machine itself
/// lives in `sim::lifecycle`; this is just its handle-typed instance.
#[derive(Resource)]
pub struct SimState(pub FlowFieldState<Buffer>);

#[derive(Resource)]
pub struct SimConstantsBuffer {
    pub buffer: Buffer,
}

// Rendering world copy. Only present while the simulation is live, so the
// render nodes never see a torn-down buffer.
#[derive(Resource, Clone)]
pub struct ExtractedSimBuffers {
    pub field: Buffer,
    pub field_len: u32,
    pub particles: Buffer,
    pub particle_len: u32,
    pub constants: Buffer,
}

#[derive(Resource, Clone, Copy)]
pub struct ExtractedDispatch {
    pub plan: DispatchPlan,
}

// =====================================================================

// ========================== systems ==================================

// Startup systems that have to run only once

fn init_simulation(
    mut commands: Commands,
    render_device: Res<RenderDevice>,
    config: Res<FlowFieldConfig>,
) {
    let mut state = FlowFieldState::new();
    match build_simulation(&render_device, &config, &mut state) {
        Ok(constants_buffer) => {
            commands.insert_resource(SimConstantsBuffer {
                buffer: constants_buffer,
            });
        }
        Err(err) => error!("flow field initialization failed: {err}"),
    }
    commands.insert_resource(SimState(state));
}

fn init_sim_bind_group_layout(mut commands: Commands, render_device: Res<RenderDevice>) {
    let layout = render_device.create_bind_group_layout(
        Some("sim_bind_group_layout"),
        &[
            BindGroupLayoutEntry {
                binding: bindings::SLOT_SIM_CONSTANTS.binding,
                visibility: ShaderStages::COMPUTE,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            BindGroupLayoutEntry {
                binding: bindings::SLOT_FIELD_POINTS.binding,
                visibility: ShaderStages::COMPUTE,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Storage { read_only: false },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            BindGroupLayoutEntry {
                binding: bindings::SLOT_PARTICLES.binding,
                visibility: ShaderStages::COMPUTE,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Storage { read_only: false },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
    );
    commands.insert_resource(SimBindGroupLayout(layout));
}

// Update systems that have to run per frame

/// Advances the lifecycle one frame and refreshes the constants UBO from
/// the live configuration. When the simulation is not live the frame is
/// skipped without touching the device.
fn advance_frame(
    time: Res<Time>,
    config: Res<FlowFieldConfig>,
    mut state: ResMut<SimState>,
    constants: Option<Res<SimConstantsBuffer>>,
    render_queue: Res<RenderQueue>,
) {
    let Some(constants) = constants else {
        return;
    };
    if state.0.begin_frame().is_none() {
        debug!("flow field frame skipped, simulation not live");
        return;
    }
    let Some(topology) = state.0.topology() else {
        return;
    };

    let frame = FrameConstants::assemble(&config, topology, time.delta_secs());
    render_queue.write_buffer(
        &constants.buffer,
        0,
        bytemuck::bytes_of(&SimConstants::from(frame)),
    );
}

/// Tears the old device state down and rebuilds it whenever the
/// configuration resource is mutated.
fn apply_reconfiguration(
    mut commands: Commands,
    render_device: Res<RenderDevice>,
    config: Res<FlowFieldConfig>,
    state: Option<ResMut<SimState>>,
    constants: Option<Res<SimConstantsBuffer>>,
) {
    if !config.is_changed() || config.is_added() {
        return;
    }
    let Some(mut state) = state else {
        return;
    };

    info!("flow field configuration changed, rebuilding device state");
    let (field, particles) = state.0.teardown();
    release_buffers(field, particles);
    if let Some(constants) = constants {
        constants.buffer.destroy();
        commands.remove_resource::<SimConstantsBuffer>();
    }

    match build_simulation(&render_device, &config, &mut state.0) {
        Ok(constants_buffer) => {
            commands.insert_resource(SimConstantsBuffer {
                buffer: constants_buffer,
            });
        }
        Err(err) => error!("flow field reinitialization failed: {err}"),
    }
}

fn teardown_on_exit(
    mut commands: Commands,
    mut exit_events: EventReader<AppExit>,
    state: Option<ResMut<SimState>>,
    constants: Option<Res<SimConstantsBuffer>>,
) {
    if exit_events.is_empty() {
        return;
    }
    exit_events.clear();
    let Some(mut state) = state else {
        return;
    };

    let (field, particles) = state.0.teardown();
    release_buffers(field, particles);
    if let Some(constants) = constants {
        constants.buffer.destroy();
        commands.remove_resource::<SimConstantsBuffer>();
    }
    info!(
        "flow field torn down: {} buffers allocated, {} released",
        state.0.allocations(),
        state.0.releases()
    );
}

// Extract systems that send from App to Render

fn extract_sim_buffers(
    mut commands: Commands,
    state: Extract<Option<Res<SimState>>>,
    constants: Extract<Option<Res<SimConstantsBuffer>>>,
) {
    if let (Some(state), Some(constants)) = (state.as_ref(), constants.as_ref()) {
        if let (Some(field), Some(particles), Some(plan)) = (
            state.0.field.handle(),
            state.0.particles.handle(),
            state.0.plan(),
        ) {
            commands.insert_resource(ExtractedSimBuffers {
                field: field.clone(),
                field_len: state.0.field.len(),
                particles: particles.clone(),
                particle_len: state.0.particles.len(),
                constants: constants.buffer.clone(),
            });
            commands.insert_resource(ExtractedDispatch { plan: *plan });
            return;
        }
    }
    // nothing live this frame; a stale copy must not outlive a teardown
    commands.remove_resource::<ExtractedSimBuffers>();
    commands.remove_resource::<ExtractedDispatch>();
}

fn extract_sim_bind_group_layout(
    mut commands: Commands,
    layout: Extract<Res<SimBindGroupLayout>>,
) {
    commands.insert_resource(SimBindGroupLayout(layout.0.clone()));
}

// Prepare systems in Render

fn prepare_sim_bind_group(
    mut commands: Commands,
    render_device: Res<RenderDevice>,
    layout: Option<Res<SimBindGroupLayout>>,
    extracted: Option<Res<ExtractedSimBuffers>>,
) {
    let (Some(layout), Some(extracted)) = (layout, extracted) else {
        commands.remove_resource::<SimBindGroup>();
        return;
    };
    let bind_group = render_device.create_bind_group(
        Some("sim_bind_group"),
        &layout.0,
        &[
            BindGroupEntry {
                binding: bindings::SLOT_SIM_CONSTANTS.binding,
                resource: extracted.constants.as_entire_binding(),
            },
            BindGroupEntry {
                binding: bindings::SLOT_FIELD_POINTS.binding,
                resource: extracted.field.as_entire_binding(),
            },
            BindGroupEntry {
                binding: bindings::SLOT_PARTICLES.binding,
                resource: extracted.particles.as_entire_binding(),
            },
        ],
    );
    commands.insert_resource(SimBindGroup(bind_group));
}

// Implementations

/// Plans, seeds and allocates the whole device state for one configuration.
/// Returns the constants UBO; the population buffers are committed into the
/// state machine. On any error the state is left exactly as it was, with
/// nothing allocated.
fn build_simulation(
    render_device: &RenderDevice,
    config: &FlowFieldConfig,
    state: &mut FlowFieldState<Buffer>,
) -> Result<Buffer, SimError> {
    let budget = DeviceBudget {
        max_buffer_bytes: storage_budget(render_device),
    };
    let plan = state.begin_init(config, &bindings::SIM_PROGRAM, budget)?;

    // one seeded stream for both populations, so a seed pins the whole run
    let mut rng = StdRng::seed_from_u64(config.seed);
    let field_samples: Vec<GpuFieldSample> =
        seed_field(&plan.topology, config.bounds_position, &mut rng)
            .into_iter()
            .map(GpuFieldSample::from)
            .collect();
    let particles: Vec<GpuParticle> =
        seed_particles(plan.dispatch.particle_len, config.bounds_extent, &mut rng)
            .into_iter()
            .map(GpuParticle::from)
            .collect();

    let field_buffer = render_device.create_buffer_with_data(&BufferInitDescriptor {
        label: Some(bindings::SLOT_FIELD_POINTS.name),
        contents: bytemuck::cast_slice(&field_samples),
        usage: BufferUsages::STORAGE | BufferUsages::COPY_DST | BufferUsages::COPY_SRC,
    });
    let particle_buffer = render_device.create_buffer_with_data(&BufferInitDescriptor {
        label: Some(bindings::SLOT_PARTICLES.name),
        contents: bytemuck::cast_slice(&particles),
        usage: BufferUsages::STORAGE | BufferUsages::COPY_DST | BufferUsages::COPY_SRC,
    });
    let constants = SimConstants::from(FrameConstants::assemble(config, &plan.topology, 0.0));
    let constants_buffer = render_device.create_buffer_with_data(&BufferInitDescriptor {
        label: Some(bindings::SLOT_SIM_CONSTANTS.name),
        contents: bytemuck::bytes_of(&constants),
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
    });

    let storage_bytes = plan.field_bytes + plan.particle_bytes;
    state.commit_init(plan, field_buffer, particle_buffer);
    info!(
        "flow field initialized: {} samples, {} particles, {} bytes of storage",
        state.field.len(),
        state.particles.len(),
        storage_bytes
    );
    Ok(constants_buffer)
}

/// Largest storage buffer the device will accept as a single binding.
fn storage_budget(render_device: &RenderDevice) -> u64 {
    let limits = render_device.limits();
    limits
        .max_buffer_size
        .min(limits.max_storage_buffer_binding_size as u64)
}

fn release_buffers(field: Option<Buffer>, particles: Option<Buffer>) {
    for buffer in [field, particles].into_iter().flatten() {
        buffer.destroy();
    }
}

// =====================================================================

// Plugin

pub struct FlowFieldPlugin;

impl Plugin for FlowFieldPlugin {
    fn build(&self, app: &mut App) {
        // App
        app.init_resource::<FlowFieldConfig>()
            .add_systems(
                Startup,
                (
                    init_simulation,
                    init_sim_bind_group_layout,
                    init_draw_params,
                    init_draw_bind_group_layout,
                ),
            )
            .add_systems(
                Update,
                (
                    (apply_reconfiguration, advance_frame).chain(),
                    update_draw_params,
                    teardown_on_exit,
                ),
            );

        // Render
        let render_app = app.sub_app_mut(RenderApp);
        render_app
            .add_systems(
                ExtractSchedule,
                (
                    extract_sim_buffers,
                    extract_sim_bind_group_layout,
                    extract_draw_params,
                    extract_draw_bind_group_layout,
                ),
            )
            .add_systems(
                Render,
                (
                    prepare_sim_bind_group.in_set(RenderSet::Prepare),
                    prepare_sim_pipelines.in_set(RenderSet::Prepare),
                    prepare_draw_bind_groups.in_set(RenderSet::Prepare),
                    prepare_draw_pipeline.in_set(RenderSet::Prepare),
                ),
            );

        add_sim_nodes_to_graph(render_app);
        add_draw_node_to_graph(render_app);
    }
}
