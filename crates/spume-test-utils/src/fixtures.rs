//! Reusable stepper fixtures.
//!
//! Three reference steppers covering the particle lifecycle:
//!
//! - [`Emitter`] — spawns a fixed number of particles per step, filling
//!   partially used blocks before allocating new ones.
//! - [`Integrator`] — advances position by velocity and ages particles.
//! - [`Reaper`] — removes particles past their lifetime and releases
//!   emptied blocks.

use spume_core::{StoreError, TimeSpan, Vec3};
use spume_store::{BlockHandle, ParticlesContainer};

/// Scalar attribute: particle mass.
pub const MASS: &str = "mass";
/// Scalar attribute: time since spawn.
pub const AGE: &str = "age";
/// Vector attribute: particle position.
pub const POSITION: &str = "position";
/// Vector attribute: particle velocity.
pub const VELOCITY: &str = "velocity";

/// Container with the standard attribute set (`mass`, `age`, `position`,
/// `velocity`).
pub fn standard_container(block_size: u32) -> ParticlesContainer {
    ParticlesContainer::new(block_size, [MASS, AGE], [POSITION, VELOCITY])
        .expect("standard attribute set is valid")
}

/// One stage of a simulation step.
pub trait Stepper {
    /// Human-readable name for diagnostics.
    fn name(&self) -> &str;

    /// Advance the particles in `container` over `span`.
    fn step(
        &mut self,
        container: &mut ParticlesContainer,
        span: TimeSpan,
    ) -> Result<(), StoreError>;
}

/// Run `steppers` in order for `steps` consecutive spans of length `dt`.
///
/// Returns the span following the last one executed.
pub fn simulate(
    container: &mut ParticlesContainer,
    steppers: &mut [&mut dyn Stepper],
    start: f32,
    dt: f32,
    steps: u32,
) -> Result<TimeSpan, StoreError> {
    let mut span = TimeSpan::new(start, dt);
    for _ in 0..steps {
        for stepper in steppers.iter_mut() {
            tracing::trace!(stepper = stepper.name(), %span, "running stepper");
            stepper.step(container, span)?;
        }
        span = TimeSpan::new(span.end(), dt);
    }
    Ok(span)
}

/// Spawns `rate` particles per step at `origin` with `velocity`.
///
/// Births are spread evenly across the step, so a particle born at
/// `span.interpolate(k / rate)` starts with the age and position it would
/// have at `span.end()`. Run it after the [`Integrator`] so new particles
/// are not advanced twice in their birth step.
pub struct Emitter {
    pub rate: u32,
    pub origin: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
    pub emitted: u64,
}

impl Emitter {
    pub fn new(rate: u32, origin: Vec3, velocity: Vec3) -> Self {
        Self {
            rate,
            origin,
            velocity,
            mass: 1.0,
            emitted: 0,
        }
    }
}

impl Stepper for Emitter {
    fn name(&self) -> &str {
        "emitter"
    }

    fn step(
        &mut self,
        container: &mut ParticlesContainer,
        span: TimeSpan,
    ) -> Result<(), StoreError> {
        let mass = container.float_buffer_index(MASS)?;
        let age = container.float_buffer_index(AGE)?;
        let position = container.vec3_buffer_index(POSITION)?;
        let velocity = container.vec3_buffer_index(VELOCITY)?;

        let mut open: Vec<BlockHandle> = container
            .active_blocks()
            .filter(|(_, block)| !block.is_full())
            .map(|(handle, _)| handle)
            .collect();
        open.reverse();

        let mut spawned = 0u32;
        while spawned < self.rate {
            let handle = match open.pop() {
                Some(handle) => handle,
                None => container.new_block()?,
            };
            let block = container.block_mut(handle)?;
            while spawned < self.rate && !block.is_full() {
                let i = block.next_inactive_index() as usize;
                let birth = span.interpolate(spawned as f32 / self.rate as f32);
                let initial_age = span.end() - birth;
                block.float_buffer_at_mut(mass)[i] = self.mass;
                block.float_buffer_at_mut(age)[i] = initial_age;
                block.vec3_buffer_at_mut(position)[i] = self.origin + self.velocity * initial_age;
                block.vec3_buffer_at_mut(velocity)[i] = self.velocity;
                *block.active_amount_mut() += 1;
                spawned += 1;
            }
        }
        self.emitted += u64::from(spawned);
        Ok(())
    }
}

/// Moves particles by their velocity under constant acceleration and ages them.
pub struct Integrator {
    pub gravity: Vec3,
}

impl Integrator {
    pub fn new(gravity: Vec3) -> Self {
        Self { gravity }
    }
}

impl Stepper for Integrator {
    fn name(&self) -> &str {
        "integrator"
    }

    fn step(
        &mut self,
        container: &mut ParticlesContainer,
        span: TimeSpan,
    ) -> Result<(), StoreError> {
        let age_slot = container.float_buffer_index(AGE)?.index();
        let position_slot = container.vec3_buffer_index(POSITION)?.index();
        let velocity_slot = container.vec3_buffer_index(VELOCITY)?.index();
        let dt = span.duration();

        for (_, block) in container.active_blocks_mut() {
            let n = block.active_amount() as usize;

            if let Some(ages) = block.float_buffers_mut().nth(age_slot) {
                for age in &mut ages[..n] {
                    *age += dt;
                }
            }

            let mut positions = None;
            let mut velocities = None;
            for (slot, buffer) in block.vec3_buffers_mut().enumerate() {
                if slot == position_slot {
                    positions = Some(buffer);
                } else if slot == velocity_slot {
                    velocities = Some(buffer);
                }
            }
            if let (Some(positions), Some(velocities)) = (positions, velocities) {
                for (p, v) in positions[..n].iter_mut().zip(&mut velocities[..n]) {
                    *v += self.gravity * dt;
                    *p += *v * dt;
                }
            }
        }
        Ok(())
    }
}

/// Kills particles whose age exceeds `lifetime`, then releases empty blocks.
pub struct Reaper {
    pub lifetime: f32,
    pub killed: u64,
}

impl Reaper {
    pub fn new(lifetime: f32) -> Self {
        Self {
            lifetime,
            killed: 0,
        }
    }
}

impl Stepper for Reaper {
    fn name(&self) -> &str {
        "reaper"
    }

    fn step(
        &mut self,
        container: &mut ParticlesContainer,
        _span: TimeSpan,
    ) -> Result<(), StoreError> {
        let age = container.float_buffer_index(AGE)?;
        for (_, block) in container.active_blocks_mut() {
            let mut i = 0;
            while i < block.active_amount() {
                if block.float_buffer_at(age)[i as usize] > self.lifetime {
                    block.swap_remove(i);
                    self.killed += 1;
                } else {
                    i += 1;
                }
            }
        }
        let released = container.release_empty_blocks();
        tracing::debug!(killed = self.killed, released, "reaped particles");
        Ok(())
    }
}
