//! Occupancy and memory metrics for a particle container.

/// Snapshot of a container's occupancy, memory, and cumulative counters.
///
/// Produced by [`ParticlesContainer::metrics`](crate::ParticlesContainer::metrics).
/// Gauges reflect the moment of the call; `total_*` and `slot_reuses` count
/// from container construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreMetrics {
    /// Number of live blocks.
    pub live_blocks: usize,
    /// Particle capacity of one block.
    pub block_size: u32,
    /// Particle capacity across all live blocks.
    pub capacity: u64,
    /// Active particles across all live blocks.
    pub active_particles: u64,
    /// Attribute storage held by live blocks, in bytes.
    pub memory_bytes: usize,
    /// Cumulative number of `new_block()` calls that succeeded.
    pub total_allocations: u64,
    /// Cumulative number of blocks released.
    pub total_releases: u64,
    /// Cumulative number of allocations that reused a released slot.
    pub slot_reuses: u64,
    /// Slots withdrawn from reuse because their generation counter is
    /// exhausted.
    pub retired_slots: u64,
}

impl StoreMetrics {
    /// Fraction of live capacity holding active particles, in `[0, 1]`.
    ///
    /// Returns 0.0 when there are no live blocks.
    pub fn fill_ratio(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.active_particles as f64 / self.capacity as f64
        }
    }
}
