//! Simulation lifecycle, kept free of any GPU types. The state machine is
//! generic over the buffer handle so it can be driven in plain unit tests;
//! the render adapter instantiates it with a device buffer.

use crate::gpu::bindings::{self, ProgramSpec};
use crate::sim::dispatch::DispatchPlan;
use crate::sim::error::SimError;
use crate::sim::sample::ELEM_BYTES;
use crate::sim::topology::GridTopology;
use crate::FlowFieldConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimPhase {
    Uninitialized,
    Initialized,
    Running,
    TornDown,
}

/// Owner of one device buffer handle. Releasing takes the handle out, so
/// a second release has nothing to free.
#[derive(Debug)]
pub struct GpuSlot<H> {
    handle: Option<H>,
    len: u32,
}

impl<H> GpuSlot<H> {
    pub const fn empty() -> Self {
        Self {
            handle: None,
            len: 0,
        }
    }

    pub fn bind(&mut self, handle: H, len: u32) {
        self.handle = Some(handle);
        self.len = len;
    }

    pub fn release(&mut self) -> Option<H> {
        self.len = 0;
        self.handle.take()
    }

    pub fn handle(&self) -> Option<&H> {
        self.handle.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.handle.is_some()
    }

    /// Element count while bound, zero otherwise.
    pub fn len(&self) -> u32 {
        self.len
    }
}

/// What the device may allocate. The render adapter fills this from the
/// adapter limits; tests pass whatever budget the scenario needs.
#[derive(Debug, Clone, Copy)]
pub struct DeviceBudget {
    pub max_buffer_bytes: u64,
}

/// Validated output of [`FlowFieldState::begin_init`]. Holding one is
/// proof that the configuration, topology, kernel contract and budget all
/// checked out; committing it consumes it.
#[derive(Debug)]
pub struct InitPlan {
    pub topology: GridTopology,
    pub dispatch: DispatchPlan,
    pub field_bytes: u64,
    pub particle_bytes: u64,
}

#[derive(Debug)]
pub struct FlowFieldState<H> {
    phase: SimPhase,
    topology: Option<GridTopology>,
    plan: Option<DispatchPlan>,
    pub field: GpuSlot<H>,
    pub particles: GpuSlot<H>,
    allocations: u32,
    releases: u32,
}

impl<H> Default for FlowFieldState<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> FlowFieldState<H> {
    pub fn new() -> Self {
        Self {
            phase: SimPhase::Uninitialized,
            topology: None,
            plan: None,
            field: GpuSlot::empty(),
            particles: GpuSlot::empty(),
            allocations: 0,
            releases: 0,
        }
    }

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    pub fn topology(&self) -> Option<&GridTopology> {
        self.topology.as_ref()
    }

    pub fn plan(&self) -> Option<&DispatchPlan> {
        self.plan.as_ref()
    }

    /// Buffers allocated over the lifetime of this state.
    pub fn allocations(&self) -> u32 {
        self.allocations
    }

    /// Buffers released over the lifetime of this state. Matches
    /// [`allocations`](Self::allocations) once torn down.
    pub fn releases(&self) -> u32 {
        self.releases
    }

    /// Validates the configuration against the kernel contract and the
    /// device budget and plans the allocations. Nothing is mutated here:
    /// an error leaves the state exactly as it was, with no buffers bound.
    pub fn begin_init(
        &mut self,
        config: &FlowFieldConfig,
        program: &ProgramSpec,
        budget: DeviceBudget,
    ) -> Result<InitPlan, SimError> {
        match self.phase {
            SimPhase::Uninitialized | SimPhase::TornDown => {}
            SimPhase::Initialized | SimPhase::Running => {
                return Err(SimError::Configuration(
                    "already initialized; tear down before reinitializing".into(),
                ));
            }
        }
        config.validate()?;
        let topology = GridTopology::compute(config.cell_size, config.bounds_extent)?;

        // Resolve both kernels up front so a stale program fails the whole
        // init rather than a single frame later on.
        let width = config.thread_group_width.width();
        for entry_point in [bindings::FIELD_UPDATE, bindings::PARTICLE_UPDATE] {
            let kernel = program.kernel(entry_point)?;
            if kernel.workgroup_width != width {
                return Err(SimError::KernelResolution(format!(
                    "kernel `{}` is compiled for workgroup width {}, configuration requests {}",
                    kernel.entry_point, kernel.workgroup_width, width
                )));
            }
        }
        program.require_slots(&[
            bindings::SLOT_SIM_CONSTANTS.name,
            bindings::SLOT_FIELD_POINTS.name,
            bindings::SLOT_PARTICLES.name,
        ])?;

        let field_len = topology.total_points;
        let particle_len = config.particle_count.count();
        let field_bytes = field_len as u64 * ELEM_BYTES;
        let particle_bytes = particle_len as u64 * ELEM_BYTES;
        for (label, bytes) in [("flow field", field_bytes), ("particle", particle_bytes)] {
            if bytes > budget.max_buffer_bytes {
                return Err(SimError::Resource {
                    label,
                    bytes,
                    budget: budget.max_buffer_bytes,
                });
            }
        }

        Ok(InitPlan {
            topology,
            dispatch: DispatchPlan::new(config.mode, field_len, particle_len, config.thread_group_width),
            field_bytes,
            particle_bytes,
        })
    }

    /// Binds the freshly allocated buffers and enters `Initialized`.
    pub fn commit_init(&mut self, plan: InitPlan, field: H, particles: H) {
        debug_assert!(
            !self.field.is_bound() && !self.particles.is_bound(),
            "committing over live buffers leaks them"
        );
        self.field.bind(field, plan.dispatch.field_len);
        self.particles.bind(particles, plan.dispatch.particle_len);
        self.topology = Some(plan.topology);
        self.plan = Some(plan.dispatch);
        self.allocations += 2;
        self.phase = SimPhase::Initialized;
    }

    /// Hands out the dispatch plan for one frame, or `None` when the
    /// simulation is not live. A skipped frame is not an error.
    pub fn begin_frame(&mut self) -> Option<&DispatchPlan> {
        match self.phase {
            SimPhase::Initialized | SimPhase::Running => {
                self.phase = SimPhase::Running;
                self.plan.as_ref()
            }
            SimPhase::Uninitialized | SimPhase::TornDown => None,
        }
    }

    /// Releases both slots and enters `TornDown`. Reachable from every
    /// phase and idempotent: slots already empty simply return `None`.
    /// The caller owns the returned handles and frees the device memory.
    pub fn teardown(&mut self) -> (Option<H>, Option<H>) {
        let field = self.field.release();
        let particles = self.particles.release();
        self.releases += field.is_some() as u32 + particles.is_some() as u32;
        self.topology = None;
        self.plan = None;
        self.phase = SimPhase::TornDown;
        (field, particles)
    }
}
