use bevy_flow_field::gpu::bindings::{self, KERNEL_WORKGROUP_WIDTH};
use bevy_flow_field::gpu::draw_buffers::DrawParams;
use bevy_flow_field::gpu::ffi::{GpuFieldSample, GpuParticle, SimConstants};
use bevy_flow_field::sim::error::SimError;
use bevy_flow_field::ThreadGroupWidth;

const SIM_WGSL: &str = include_str!("../assets/shaders/flow_field.wgsl");
const DRAW_WGSL: &str = include_str!("../assets/shaders/points_draw.wgsl");

#[test]
fn kernel_entry_points_exist_in_source() {
    for kernel in bindings::SIM_PROGRAM.kernels {
        let marker = format!("fn {}(", kernel.entry_point);
        assert!(SIM_WGSL.contains(&marker), "missing kernel {}", kernel.entry_point);
    }
    assert!(DRAW_WGSL.contains(&format!("fn {}(", bindings::DRAW_VERTEX)));
    assert!(DRAW_WGSL.contains(&format!("fn {}(", bindings::DRAW_FRAGMENT)));
}

#[test]
fn workgroup_width_matches_table() {
    let marker = format!("@workgroup_size({KERNEL_WORKGROUP_WIDTH})");
    assert_eq!(
        SIM_WGSL.matches(&marker).count(),
        bindings::SIM_PROGRAM.kernels.len()
    );
    for kernel in bindings::SIM_PROGRAM.kernels {
        assert_eq!(kernel.workgroup_width, KERNEL_WORKGROUP_WIDTH);
    }
    // the declared width is one of the dispatchable widths
    assert_eq!(ThreadGroupWidth::T256.width(), KERNEL_WORKGROUP_WIDTH);
}

#[test]
fn bind_slots_match_source() {
    for slot in bindings::SIM_PROGRAM.slots {
        let marker = format!("@group({}) @binding({})", slot.group, slot.binding);
        let line = SIM_WGSL
            .lines()
            .find(|line| line.contains(&marker))
            .unwrap_or_else(|| panic!("binding {} missing from kernel source", slot.binding));
        assert!(line.contains(slot.name), "slot {} moved off its binding", slot.name);
    }
    for slot in bindings::DRAW_PROGRAM.slots {
        let marker = format!("@group({}) @binding({})", slot.group, slot.binding);
        let line = DRAW_WGSL
            .lines()
            .find(|line| line.contains(&marker))
            .unwrap_or_else(|| panic!("binding {} missing from draw source", slot.binding));
        assert!(line.contains(slot.name), "slot {} moved off its binding", slot.name);
    }
}

#[test]
fn element_layouts_are_tightly_packed() {
    assert_eq!(std::mem::size_of::<GpuFieldSample>(), 28); // 3 + 3 + 1 floats
    assert_eq!(std::mem::size_of::<GpuParticle>(), 28);
    assert_eq!(std::mem::size_of::<SimConstants>(), 48);
    assert_eq!(std::mem::size_of::<DrawParams>(), 112);
}

#[test]
fn flat_index_formula_is_mirrored_in_wgsl() {
    assert!(SIM_WGSL
        .contains("(cell.x * sim_constants.count_y + cell.y) * sim_constants.count_z + cell.z"));
}

#[test]
fn unknown_entry_point_does_not_resolve() {
    let err = bindings::SIM_PROGRAM.kernel("density_update").unwrap_err();
    assert!(matches!(err, SimError::KernelResolution(_)));
    assert!(bindings::SIM_PROGRAM.kernel(bindings::FIELD_UPDATE).is_ok());
    assert!(bindings::SIM_PROGRAM.kernel(bindings::PARTICLE_UPDATE).is_ok());
}

#[test]
fn unknown_slot_does_not_resolve() {
    assert!(bindings::SIM_PROGRAM.slot("velocity_grid").is_err());
    assert!(bindings::SIM_PROGRAM
        .require_slots(&["sim_constants", "flow_field_points", "particles"])
        .is_ok());
    assert!(bindings::DRAW_PROGRAM
        .require_slots(&["draw_points", "draw_params"])
        .is_ok());
}
