//! Test utilities for Spume development.
//!
//! Provides reference steppers that drive a
//! [`ParticlesContainer`](spume_store::ParticlesContainer) the way a real
//! simulation would (spawn, integrate, kill), a standard attribute set,
//! and a tracing initialiser for tests.

pub mod fixtures;

pub use fixtures::{
    simulate, standard_container, Emitter, Integrator, Reaper, Stepper, AGE, MASS, POSITION,
    VELOCITY,
};

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
