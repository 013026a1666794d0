use bevy_flow_field::sim::error::SimError;
use bevy_flow_field::sim::topology::GridTopology;
use glam::{UVec3, Vec3};

#[test]
fn floor_counts() {
    let topo = GridTopology::compute(2.5, Vec3::new(10.0, 10.0, 10.0)).unwrap();
    assert_eq!(topo.counts, UVec3::new(4, 4, 4)); // 10 / 2.5 per axis
    assert_eq!(topo.total_points, 64);
}

#[test]
fn fractional_extent_floors_down() {
    let topo = GridTopology::compute(1.0, Vec3::new(3.9, 4.0, 5.1)).unwrap();
    assert_eq!(topo.counts, UVec3::new(3, 4, 5));
    assert_eq!(topo.total_points, 60);
}

#[test]
fn degenerate_axis_rejected() {
    let err = GridTopology::compute(2.0, Vec3::new(1.0, 10.0, 10.0)).unwrap_err();
    assert!(matches!(err, SimError::Configuration(_)));
}

#[test]
fn bad_cell_size_rejected() {
    assert!(GridTopology::compute(0.0, Vec3::splat(10.0)).is_err());
    assert!(GridTopology::compute(-1.0, Vec3::splat(10.0)).is_err());
    assert!(GridTopology::compute(f32::NAN, Vec3::splat(10.0)).is_err());
    assert!(GridTopology::compute(f32::INFINITY, Vec3::splat(10.0)).is_err());
}

#[test]
fn flat_index_covers_grid_once() {
    let topo = GridTopology::compute(1.0, Vec3::new(3.0, 4.0, 5.0)).unwrap();
    let mut seen = vec![false; topo.total_points as usize];
    for coords in topo.iter_coords() {
        let idx = topo.flat_index(coords) as usize;
        assert!(!seen[idx], "index {idx} hit twice");
        seen[idx] = true;
        assert_eq!(topo.coords_of(idx as u32), coords);
    }
    assert!(seen.iter().all(|&hit| hit));
}

#[test]
fn iter_is_flat_index_order() {
    let topo = GridTopology::compute(1.0, Vec3::new(2.0, 3.0, 4.0)).unwrap();
    let order: Vec<u32> = topo.iter_coords().map(|c| topo.flat_index(c)).collect();
    let expected: Vec<u32> = (0..topo.total_points).collect();
    assert_eq!(order, expected);
}

#[test]
fn sample_positions_are_stratified() {
    let topo = GridTopology::compute(2.5, Vec3::splat(10.0)).unwrap();
    let first = topo.sample_position(UVec3::ZERO, Vec3::ZERO);
    assert_eq!(first, Vec3::splat(-3.75)); // -5 + 0 * 2.5 + 1.25
    let last = topo.sample_position(UVec3::new(3, 3, 3), Vec3::ZERO);
    assert_eq!(last, Vec3::splat(3.75)); // -5 + 3 * 2.5 + 1.25
}

#[test]
fn sample_positions_follow_the_center() {
    let topo = GridTopology::compute(2.5, Vec3::splat(10.0)).unwrap();
    let center = Vec3::new(100.0, -20.0, 0.5);
    let moved = topo.sample_position(UVec3::ZERO, center);
    assert_eq!(moved, center + Vec3::splat(-3.75));
}
