// Headless inspection of one seeded run. Prints what the device would be
// uploaded, without creating a window or a GPU context.

use bevy_flow_field::sim::sample::{seed_field, seed_particles};
use bevy_flow_field::sim::topology::GridTopology;
use bevy_flow_field::FlowFieldConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() {
    let config = FlowFieldConfig::default();
    let topo = match GridTopology::compute(config.cell_size, config.bounds_extent) {
        Ok(topo) => topo,
        Err(err) => {
            eprintln!("configuration rejected: {err}");
            return;
        }
    };

    println!(
        "grid: {} x {} x {} cells of {} -> {} samples",
        topo.counts.x, topo.counts.y, topo.counts.z, topo.cell_size, topo.total_points
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let samples = seed_field(&topo, config.bounds_position, &mut rng);
    let particles = seed_particles(
        config.particle_count.count(),
        config.bounds_extent,
        &mut rng,
    );

    let (mut min_i, mut max_i, mut sum_i) = (f32::MAX, f32::MIN, 0.0f64);
    for sample in &samples {
        min_i = min_i.min(sample.intensity);
        max_i = max_i.max(sample.intensity);
        sum_i += sample.intensity as f64;
    }
    println!(
        "field intensity: min {:.4}, max {:.4}, mean {:.4}",
        min_i,
        max_i,
        sum_i / samples.len() as f64
    );
    println!(
        "first sample: position {:?}, direction {:?}",
        samples[0].position, samples[0].direction
    );

    let mut bbox_min = particles[0].position;
    let mut bbox_max = particles[0].position;
    for particle in &particles {
        bbox_min = bbox_min.min(particle.position);
        bbox_max = bbox_max.max(particle.position);
    }
    println!(
        "{} particles seeded, bbox {:?} .. {:?}",
        particles.len(),
        bbox_min,
        bbox_max
    );
    println!(
        "seed {} reproduces this exact population",
        config.seed
    );
}
