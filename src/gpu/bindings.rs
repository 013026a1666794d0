//! Canonical host/device contract: kernel entry points, workgroup widths
//! and bind slots, in one place. The WGSL sources, the bind group layouts
//! and the pipeline descriptors all follow this table, and the contract
//! tests pin the shader text to it.

use crate::sim::error::SimError;

pub const SIM_SHADER_PATH: &str = "shaders/flow_field.wgsl";
pub const DRAW_SHADER_PATH: &str = "shaders/points_draw.wgsl";

pub const FIELD_UPDATE: &str = "field_update";
pub const PARTICLE_UPDATE: &str = "particle_update";
pub const DRAW_VERTEX: &str = "vs_main";
pub const DRAW_FRAGMENT: &str = "fs_main";

/// Workgroup width both compute kernels are written for.
pub const KERNEL_WORKGROUP_WIDTH: u32 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindSlot {
    pub name: &'static str,
    pub group: u32,
    pub binding: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelSpec {
    pub entry_point: &'static str,
    pub workgroup_width: u32,
}

/// Static description of one shader module: where it lives, which compute
/// entry points it exports and which slots it binds.
#[derive(Debug, Clone, Copy)]
pub struct ProgramSpec {
    pub path: &'static str,
    pub kernels: &'static [KernelSpec],
    pub slots: &'static [BindSlot],
}

impl ProgramSpec {
    pub fn kernel(&self, entry_point: &str) -> Result<&KernelSpec, SimError> {
        self.kernels
            .iter()
            .find(|kernel| kernel.entry_point == entry_point)
            .ok_or_else(|| {
                SimError::KernelResolution(format!(
                    "program `{}` has no kernel entry point `{entry_point}`",
                    self.path
                ))
            })
    }

    pub fn slot(&self, name: &str) -> Result<&BindSlot, SimError> {
        self.slots
            .iter()
            .find(|slot| slot.name == name)
            .ok_or_else(|| {
                SimError::KernelResolution(format!(
                    "program `{}` has no bind slot `{name}`",
                    self.path
                ))
            })
    }

    pub fn require_slots(&self, names: &[&str]) -> Result<(), SimError> {
        for name in names {
            self.slot(name)?;
        }
        Ok(())
    }
}

pub const SLOT_SIM_CONSTANTS: BindSlot = BindSlot {
    name: "sim_constants",
    group: 0,
    binding: 0,
};
pub const SLOT_FIELD_POINTS: BindSlot = BindSlot {
    name: "flow_field_points",
    group: 0,
    binding: 1,
};
pub const SLOT_PARTICLES: BindSlot = BindSlot {
    name: "particles",
    group: 0,
    binding: 2,
};

pub const SLOT_DRAW_POINTS: BindSlot = BindSlot {
    name: "draw_points",
    group: 0,
    binding: 0,
};
pub const SLOT_DRAW_PARAMS: BindSlot = BindSlot {
    name: "draw_params",
    group: 0,
    binding: 1,
};

pub const SIM_PROGRAM: ProgramSpec = ProgramSpec {
    path: SIM_SHADER_PATH,
    kernels: &[
        KernelSpec {
            entry_point: FIELD_UPDATE,
            workgroup_width: KERNEL_WORKGROUP_WIDTH,
        },
        KernelSpec {
            entry_point: PARTICLE_UPDATE,
            workgroup_width: KERNEL_WORKGROUP_WIDTH,
        },
    ],
    slots: &[SLOT_SIM_CONSTANTS, SLOT_FIELD_POINTS, SLOT_PARTICLES],
};

pub const DRAW_PROGRAM: ProgramSpec = ProgramSpec {
    path: DRAW_SHADER_PATH,
    kernels: &[],
    slots: &[SLOT_DRAW_POINTS, SLOT_DRAW_PARAMS],
};
