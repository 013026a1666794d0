//! Host-side element types and the seeding routines that populate them.
//! Seeding runs once per initialization; after upload the device owns the
//! data and the host never reads it back.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::Rng;

use crate::sim::topology::GridTopology;

/// Packed device layout is 3 + 3 + 1 floats for both element kinds.
pub const ELEM_FLOATS: usize = 7;
pub const ELEM_BYTES: u64 = (ELEM_FLOATS * std::mem::size_of::<f32>()) as u64;

/// One steering sample of the volumetric flow field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSample {
    pub position: Vec3,
    pub direction: Vec3,
    pub intensity: f32,
}

/// One advected particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub direction: Vec3,
    pub speed: f32,
}

/// Uniform point inside the unit sphere, by rejection.
pub fn random_in_sphere(rng: &mut StdRng) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
}

/// One sample per grid point, in flat-index order. Positions are the
/// stratified world-space grid positions; directions and intensities are
/// drawn from `rng`, so a fixed seed reproduces the field exactly.
pub fn seed_field(topology: &GridTopology, bounds_center: Vec3, rng: &mut StdRng) -> Vec<FieldSample> {
    let mut samples = Vec::with_capacity(topology.total_points as usize);
    for coords in topology.iter_coords() {
        samples.push(FieldSample {
            position: topology.sample_position(coords, bounds_center),
            direction: random_in_sphere(rng),
            intensity: rng.gen_range(0.0..=1.0),
        });
    }
    samples
}

/// Particles start uniformly inside the bounds volume centered on the
/// origin, each axis scaled independently by its half extent.
pub fn seed_particles(count: u32, bounds_extent: Vec3, rng: &mut StdRng) -> Vec<Particle> {
    let half = bounds_extent / 2.0;
    (0..count)
        .map(|_| Particle {
            position: Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            ) * half,
            direction: random_in_sphere(rng),
            speed: rng.gen_range(0.0..=1.0),
        })
        .collect()
}
