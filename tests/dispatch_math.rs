use bevy_flow_field::sim::dispatch::{group_count, DispatchPlan, SimPass};
use bevy_flow_field::{SimMode, ThreadGroupWidth};

#[test]
fn groups_round_up() {
    assert_eq!(group_count(1024, ThreadGroupWidth::T256), 4);
    assert_eq!(group_count(1025, ThreadGroupWidth::T256), 5); // partial group still runs
    assert_eq!(group_count(64, ThreadGroupWidth::T256), 1);
    assert_eq!(group_count(1, ThreadGroupWidth::T1024), 1);
    assert_eq!(group_count(7, ThreadGroupWidth::T1), 7);
}

#[test]
fn width_enum_is_the_supported_set() {
    let widths: Vec<u32> = [
        ThreadGroupWidth::T1,
        ThreadGroupWidth::T4,
        ThreadGroupWidth::T8,
        ThreadGroupWidth::T16,
        ThreadGroupWidth::T32,
        ThreadGroupWidth::T64,
        ThreadGroupWidth::T128,
        ThreadGroupWidth::T256,
        ThreadGroupWidth::T512,
        ThreadGroupWidth::T1024,
    ]
    .iter()
    .map(|w| w.width())
    .collect();
    assert_eq!(widths, vec![1, 4, 8, 16, 32, 64, 128, 256, 512, 1024]);
}

#[test]
fn passes_run_field_first() {
    let plan = DispatchPlan::new(SimMode::Both, 64, 1024, ThreadGroupWidth::T256);
    let order: Vec<SimPass> = plan.passes().collect();
    assert_eq!(order, vec![SimPass::Field, SimPass::Particles]);
}

#[test]
fn mode_filters_passes() {
    let field_only = DispatchPlan::new(SimMode::FieldOnly, 64, 1024, ThreadGroupWidth::T256);
    assert_eq!(field_only.passes().collect::<Vec<_>>(), vec![SimPass::Field]);

    let particles_only = DispatchPlan::new(SimMode::ParticlesOnly, 64, 1024, ThreadGroupWidth::T256);
    assert_eq!(
        particles_only.passes().collect::<Vec<_>>(),
        vec![SimPass::Particles]
    );
}

#[test]
fn plan_carries_groups_per_pass() {
    let plan = DispatchPlan::new(SimMode::Both, 64, 262_144, ThreadGroupWidth::T256);
    assert_eq!(plan.groups_for(SimPass::Field), 1);
    assert_eq!(plan.groups_for(SimPass::Particles), 1024);
    assert_eq!(plan.field_len, 64);
    assert_eq!(plan.particle_len, 262_144);
}
