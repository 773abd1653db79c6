//! Integration test: a full emit → integrate → reap cycle over many steps.
//!
//! Drives a container with the reference steppers and checks that the
//! particle population, block count, and memory stay consistent as blocks
//! are allocated, drained, and released.

use spume_core::Vec3;
use spume_store::ParticlesContainer;
use spume_test_utils::{
    init_tracing, simulate, standard_container, Emitter, Integrator, Reaper, Stepper, AGE,
    POSITION,
};

fn run(container: &mut ParticlesContainer, steps: u32) -> (Emitter, Reaper) {
    let mut emitter = Emitter::new(10, Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
    let mut integrator = Integrator::new(Vec3::new(0.0, 0.0, -9.81));
    let mut reaper = Reaper::new(1.0);
    {
        let mut steppers: [&mut dyn Stepper; 3] = [&mut integrator, &mut reaper, &mut emitter];
        simulate(container, &mut steppers, 0.0, 0.1, steps).unwrap();
    }
    (emitter, reaper)
}

#[test]
fn population_matches_births_minus_deaths() {
    init_tracing();
    let mut c = standard_container(16);
    let (emitter, reaper) = run(&mut c, 50);
    assert_eq!(emitter.emitted, 500);
    assert!(reaper.killed > 0);
    assert_eq!(c.particle_count(), emitter.emitted - reaper.killed);
}

#[test]
fn population_reaches_steady_state() {
    let mut c = standard_container(16);
    run(&mut c, 30);
    let early = c.metrics();
    run(&mut c, 200);
    let late = c.metrics();
    // Lifetime 1.0 at 10 particles per 0.1 step bounds the population.
    assert!(early.live_blocks > 0);
    assert!(late.active_particles <= 110);
    assert!(late.memory_bytes <= 3 * early.memory_bytes);
}

#[test]
fn no_live_particle_outlives_lifetime() {
    let mut c = standard_container(8);
    run(&mut c, 40);
    for (_, block) in c.active_blocks() {
        let n = block.active_amount() as usize;
        let ages = &block.float_buffer(AGE).unwrap()[..n];
        assert!(ages.iter().all(|&age| age <= 1.0 + 1e-4));
    }
}

#[test]
fn gravity_pulls_particles_down() {
    let mut c = standard_container(32);
    run(&mut c, 8);
    let mut lowest = f32::INFINITY;
    for (_, block) in c.active_blocks() {
        let n = block.active_amount() as usize;
        for p in &block.vec3_buffer(POSITION).unwrap()[..n] {
            lowest = lowest.min(p.z);
        }
    }
    assert!(lowest < 0.5);
}

#[test]
fn compress_after_reaping_packs_blocks() {
    let mut c = standard_container(16);
    run(&mut c, 25);
    let before = c.particle_count();
    c.compress();
    let m = c.metrics();
    assert_eq!(m.active_particles, before);
    assert_eq!(m.live_blocks as u64, before.div_ceil(16));
}

#[test]
fn identical_runs_are_identical() {
    let mut a = standard_container(16);
    let mut b = standard_container(16);
    run(&mut a, 60);
    run(&mut b, 60);

    let dump = |c: &ParticlesContainer| -> Vec<(u32, Vec<Vec3>)> {
        c.active_blocks()
            .map(|(h, blk)| {
                let n = blk.active_amount() as usize;
                (h.id().0, blk.vec3_buffer(POSITION).unwrap()[..n].to_vec())
            })
            .collect()
    };
    assert_eq!(dump(&a), dump(&b));
}
