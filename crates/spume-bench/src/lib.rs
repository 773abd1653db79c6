//! Benchmark profiles for the Spume particle store.
//!
//! - [`reference_profile`]: 100 blocks of 1000 particles, standard attributes
//! - [`fragmented_profile`]: same capacity, every block a quarter full

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use spume_core::{StoreError, Vec3};
use spume_store::{ContainerConfig, ParticlesContainer};

/// Block size used by the benchmark profiles.
pub const BLOCK_SIZE: u32 = ContainerConfig::DEFAULT_BLOCK_SIZE;

/// Number of blocks in each profile.
pub const BLOCK_COUNT: usize = 100;

fn profile_container() -> Result<ParticlesContainer, StoreError> {
    let config = ContainerConfig::builder(BLOCK_SIZE)
        .float_attribute("mass")
        .float_attribute("age")
        .vec3_attribute("position")
        .vec3_attribute("velocity")
        .build()?;
    ParticlesContainer::from_config(config)
}

/// Fill `fraction` of every block's capacity with deterministic particles.
fn populate(container: &mut ParticlesContainer, fraction: f32) -> Result<(), StoreError> {
    let per_block = (BLOCK_SIZE as f32 * fraction) as u32;
    for b in 0..BLOCK_COUNT {
        let handle = container.new_block()?;
        let block = container.block_mut(handle)?;
        for i in 0..per_block as usize {
            let t = (b * BLOCK_SIZE as usize + i) as f32;
            block.float_buffer_mut("mass")?[i] = 1.0;
            block.vec3_buffer_mut("position")?[i] = Vec3::new(t, 0.0, 0.0);
            block.vec3_buffer_mut("velocity")?[i] = Vec3::new(0.0, 1.0, 0.0);
        }
        block.set_active_amount(per_block);
    }
    Ok(())
}

/// 100K particles packed into full blocks.
pub fn reference_profile() -> Result<ParticlesContainer, StoreError> {
    let mut container = profile_container()?;
    populate(&mut container, 1.0)?;
    Ok(container)
}

/// 25K particles spread over 100 blocks, for compaction benchmarks.
pub fn fragmented_profile() -> Result<ParticlesContainer, StoreError> {
    let mut container = profile_container()?;
    populate(&mut container, 0.25)?;
    Ok(container)
}
