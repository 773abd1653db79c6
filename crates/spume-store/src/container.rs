//! The particle container: attribute schema plus a slab of blocks.
//!
//! [`ParticlesContainer`] owns every block it allocates. Blocks live in a
//! slot vector; a released slot goes on a free list and its generation is
//! bumped, so handles to the released block are rejected from then on.
//!
//! # Ownership policy
//!
//! Handle misuse fails fast instead of being undefined:
//! - a handle issued by another container → [`StoreError::ForeignBlock`]
//! - a handle whose block was released → [`StoreError::StaleBlock`]
//!
//! Neither error mutates the container.

use std::sync::Arc;

use smallvec::SmallVec;
use spume_core::{AttributeKind, AttributeSlot, BlockId, ContainerId, StoreError};

use crate::block::ParticlesBlock;
use crate::config::{ContainerConfig, DuplicatePolicy};
use crate::handle::BlockHandle;
use crate::layout::BlockLayout;
use crate::metrics::StoreMetrics;
use crate::schema::AttributeSchema;

/// One slot of the block slab.
struct BlockSlot {
    /// Bumped on every release. A slot released at `u32::MAX` is retired.
    generation: u32,
    block: Option<ParticlesBlock>,
}

/// Owner of a particle population split into fixed-size blocks.
pub struct ParticlesContainer {
    layout: Arc<BlockLayout>,
    slots: Vec<BlockSlot>,
    /// Indices of empty slots available for reuse.
    free_list: Vec<u32>,
    live_blocks: u32,
    max_blocks: Option<u32>,
    total_allocations: u64,
    total_releases: u64,
    slot_reuses: u64,
    retired_slots: u64,
}

impl ParticlesContainer {
    /// Create a container with the given block size and attribute names.
    ///
    /// Duplicate names are dropped, first occurrence wins. Use
    /// [`from_config`](Self::from_config) for the strict policy or a block
    /// limit.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidConfig`] if `block_size` is zero or a name is empty.
    pub fn new<F, V>(block_size: u32, float_names: F, vec3_names: V) -> Result<Self, StoreError>
    where
        F: IntoIterator,
        F::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        let config = ContainerConfig {
            block_size,
            float_attributes: float_names.into_iter().map(Into::into).collect(),
            vec3_attributes: vec3_names.into_iter().map(Into::into).collect(),
            duplicate_policy: DuplicatePolicy::FirstWins,
            max_blocks: None,
        };
        Self::from_config(config)
    }

    /// Create a container from a validated configuration.
    pub fn from_config(config: ContainerConfig) -> Result<Self, StoreError> {
        config.validate()?;
        let schema = AttributeSchema::new(
            config.float_attributes,
            config.vec3_attributes,
            config.duplicate_policy,
        )?;
        let id = ContainerId::next();
        tracing::info!(
            container = %id,
            block_size = config.block_size,
            floats = schema.float_attribute_amount(),
            vec3s = schema.vec3_attribute_amount(),
            "created particle container"
        );
        Ok(Self {
            layout: Arc::new(BlockLayout::new(id, config.block_size, schema)),
            slots: Vec::new(),
            free_list: Vec::new(),
            live_blocks: 0,
            max_blocks: config.max_blocks,
            total_allocations: 0,
            total_releases: 0,
            slot_reuses: 0,
            retired_slots: 0,
        })
    }

    /// Unique ID of this container.
    pub fn id(&self) -> ContainerId {
        self.layout.container()
    }

    /// Particle capacity of every block.
    pub fn block_size(&self) -> u32 {
        self.layout.block_size()
    }

    /// The attribute schema.
    pub fn schema(&self) -> &AttributeSchema {
        self.layout.schema()
    }

    /// The layout shared with every block of this container.
    pub fn layout(&self) -> &BlockLayout {
        &self.layout
    }

    /// Number of scalar attributes.
    pub fn float_attribute_amount(&self) -> usize {
        self.schema().float_attribute_amount()
    }

    /// Number of vector attributes.
    pub fn vec3_attribute_amount(&self) -> usize {
        self.schema().vec3_attribute_amount()
    }

    /// Buffer slot of the scalar attribute `name`.
    pub fn float_buffer_index(&self, name: &str) -> Result<AttributeSlot, StoreError> {
        self.schema().index_of(AttributeKind::Float, name)
    }

    /// Buffer slot of the vector attribute `name`.
    pub fn vec3_buffer_index(&self, name: &str) -> Result<AttributeSlot, StoreError> {
        self.schema().index_of(AttributeKind::Vec3, name)
    }

    /// Number of live blocks.
    pub fn block_count(&self) -> usize {
        self.live_blocks as usize
    }

    /// Live blocks with their handles.
    ///
    /// Iteration follows [`BlockId`] order. That order depends on the
    /// history of allocations and releases, not on when a block was
    /// created, so it carries no meaning beyond being reproducible.
    pub fn active_blocks(&self) -> impl Iterator<Item = (BlockHandle, &ParticlesBlock)> {
        let container = self.id();
        self.slots.iter().enumerate().filter_map(move |(i, slot)| {
            slot.block.as_ref().map(|block| {
                (
                    BlockHandle::new(container, BlockId(i as u32), slot.generation),
                    block,
                )
            })
        })
    }

    /// Live blocks, mutably.
    ///
    /// The yielded references are disjoint, so callers may hand them to
    /// separate worker threads.
    pub fn active_blocks_mut(
        &mut self,
    ) -> impl Iterator<Item = (BlockHandle, &mut ParticlesBlock)> {
        let container = self.id();
        self.slots.iter_mut().enumerate().filter_map(move |(i, slot)| {
            let generation = slot.generation;
            slot.block.as_mut().map(|block| {
                (
                    BlockHandle::new(container, BlockId(i as u32), generation),
                    block,
                )
            })
        })
    }

    /// Handles of all live blocks, sorted by [`BlockId`].
    pub fn block_handles(&self) -> Vec<BlockHandle> {
        self.active_blocks().map(|(handle, _)| handle).collect()
    }

    /// Allocate a new, empty block and return its handle.
    ///
    /// Storage for every registered attribute is allocated up front. A
    /// previously released slot is reused if one is available.
    ///
    /// # Errors
    ///
    /// [`StoreError::CapacityExceeded`] if the configured block limit is
    /// reached.
    pub fn new_block(&mut self) -> Result<BlockHandle, StoreError> {
        if let Some(max_blocks) = self.max_blocks {
            if self.live_blocks >= max_blocks {
                return Err(StoreError::CapacityExceeded { max_blocks });
            }
        }

        let index = match self.free_list.pop() {
            Some(index) => {
                self.slot_reuses += 1;
                index
            }
            None => {
                let index = u32::try_from(self.slots.len()).map_err(|_| {
                    StoreError::CapacityExceeded {
                        max_blocks: u32::MAX,
                    }
                })?;
                self.slots.push(BlockSlot {
                    generation: 0,
                    block: None,
                });
                index
            }
        };

        let id = BlockId(index);
        let slot = &mut self.slots[index as usize];
        slot.block = Some(ParticlesBlock::new(Arc::clone(&self.layout), id));
        let handle = BlockHandle::new(self.layout.container(), id, slot.generation);

        self.live_blocks += 1;
        self.total_allocations += 1;
        tracing::debug!(
            container = %handle.container,
            block = %id,
            generation = handle.generation,
            "allocated block"
        );
        Ok(handle)
    }

    /// Resolve `handle` to its slot index, rejecting foreign and stale handles.
    fn resolve(&self, handle: BlockHandle) -> Result<usize, StoreError> {
        if handle.container != self.id() {
            return Err(StoreError::ForeignBlock {
                handle_container: handle.container,
                container: self.id(),
            });
        }
        let index = handle.id.index();
        match self.slots.get(index) {
            Some(slot) if slot.generation == handle.generation && slot.block.is_some() => Ok(index),
            Some(slot) => Err(StoreError::StaleBlock {
                id: handle.id,
                handle_generation: handle.generation,
                current_generation: slot.generation,
            }),
            None => Err(StoreError::StaleBlock {
                id: handle.id,
                handle_generation: handle.generation,
                current_generation: 0,
            }),
        }
    }

    /// Whether `handle` refers to a live block of this container.
    pub fn contains(&self, handle: BlockHandle) -> bool {
        self.resolve(handle).is_ok()
    }

    /// Borrow the block behind `handle`.
    pub fn block(&self, handle: BlockHandle) -> Result<&ParticlesBlock, StoreError> {
        let index = self.resolve(handle)?;
        self.slots[index]
            .block
            .as_ref()
            .ok_or(StoreError::StaleBlock {
                id: handle.id,
                handle_generation: handle.generation,
                current_generation: self.slots[index].generation,
            })
    }

    /// Mutably borrow the block behind `handle`.
    pub fn block_mut(&mut self, handle: BlockHandle) -> Result<&mut ParticlesBlock, StoreError> {
        let index = self.resolve(handle)?;
        let slot = &mut self.slots[index];
        let generation = slot.generation;
        slot.block.as_mut().ok_or(StoreError::StaleBlock {
            id: handle.id,
            handle_generation: handle.generation,
            current_generation: generation,
        })
    }

    /// Release the block behind `handle`, freeing its storage.
    ///
    /// The handle, and every copy of it, is invalid afterwards.
    ///
    /// # Errors
    ///
    /// [`StoreError::ForeignBlock`] if another container issued `handle`;
    /// [`StoreError::StaleBlock`] if the block was already released.
    pub fn release_block(&mut self, handle: BlockHandle) -> Result<(), StoreError> {
        let index = self.resolve(handle)?;
        let slot = &mut self.slots[index];
        let released = slot.block.take();
        match slot.generation.checked_add(1) {
            Some(next) => {
                slot.generation = next;
                self.free_list.push(handle.id.0);
            }
            None => {
                // Reissuing the slot would wrap its generation and revive old handles.
                self.retired_slots += 1;
                tracing::debug!(
                    container = %handle.container,
                    block = %handle.id,
                    "retired block slot"
                );
            }
        }
        self.live_blocks -= 1;
        self.total_releases += 1;
        tracing::debug!(
            container = %handle.container,
            block = %handle.id,
            particles = released.as_ref().map_or(0, |b| b.active_amount()),
            "released block"
        );
        Ok(())
    }

    /// Release every block with no active particles.
    ///
    /// Returns how many blocks were released.
    pub fn release_empty_blocks(&mut self) -> usize {
        let empty: SmallVec<[BlockHandle; 8]> = self
            .active_blocks()
            .filter(|(_, block)| block.is_empty())
            .map(|(handle, _)| handle)
            .collect();
        for &handle in &empty {
            let released = self.release_block(handle);
            debug_assert!(released.is_ok(), "live handle rejected: {released:?}");
        }
        empty.len()
    }

    /// Release every block.
    pub fn clear(&mut self) {
        for handle in self.block_handles() {
            let released = self.release_block(handle);
            debug_assert!(released.is_ok(), "live handle rejected: {released:?}");
        }
    }

    /// Total active particles across all live blocks.
    pub fn particle_count(&self) -> u64 {
        self.active_blocks()
            .map(|(_, block)| u64::from(block.active_amount()))
            .sum()
    }

    /// Current occupancy, memory, and cumulative allocation counters.
    pub fn metrics(&self) -> StoreMetrics {
        let live_blocks = self.block_count();
        StoreMetrics {
            live_blocks,
            block_size: self.block_size(),
            capacity: live_blocks as u64 * u64::from(self.block_size()),
            active_particles: self.particle_count(),
            memory_bytes: live_blocks * self.layout.block_bytes(),
            total_allocations: self.total_allocations,
            total_releases: self.total_releases,
            slot_reuses: self.slot_reuses,
            retired_slots: self.retired_slots,
        }
    }

    #[cfg(test)]
    pub(crate) fn set_slot_generation(&mut self, index: usize, generation: u32) {
        self.slots[index].generation = generation;
    }

    /// Mutable access to two distinct slots' blocks.
    pub(crate) fn two_blocks_mut(
        &mut self,
        a: usize,
        b: usize,
    ) -> Option<(&mut ParticlesBlock, &mut ParticlesBlock)> {
        if a == b {
            return None;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.slots.split_at_mut(hi);
        let lo_block = head.get_mut(lo)?.block.as_mut()?;
        let hi_block = tail.first_mut()?.block.as_mut()?;
        if a < b {
            Some((lo_block, hi_block))
        } else {
            Some((hi_block, lo_block))
        }
    }
}

impl std::fmt::Debug for ParticlesContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticlesContainer")
            .field("id", &self.id())
            .field("block_size", &self.block_size())
            .field("schema", self.schema())
            .field("live_blocks", &self.live_blocks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spume_core::Vec3;

    fn make_container() -> ParticlesContainer {
        ParticlesContainer::new(4, ["mass"], ["position"]).unwrap()
    }

    #[test]
    fn construction_reports_schema() {
        let c = ParticlesContainer::new(16, ["mass", "age"], ["position"]).unwrap();
        assert_eq!(c.block_size(), 16);
        assert_eq!(c.float_attribute_amount(), 2);
        assert_eq!(c.vec3_attribute_amount(), 1);
        assert_eq!(c.float_buffer_index("age").unwrap(), AttributeSlot(1));
        assert_eq!(c.block_count(), 0);
    }

    #[test]
    fn zero_block_size_fails() {
        let result = ParticlesContainer::new(0, ["mass"], Vec::<String>::new());
        assert!(matches!(result, Err(StoreError::InvalidConfig { .. })));
    }

    #[test]
    fn unknown_attribute_lookup_fails() {
        let c = make_container();
        assert_eq!(
            c.float_buffer_index("charge").unwrap_err(),
            StoreError::UnknownAttribute {
                kind: AttributeKind::Float,
                name: "charge".into(),
            }
        );
        assert!(c.vec3_buffer_index("mass").is_err());
    }

    #[test]
    fn duplicates_first_wins_by_default() {
        let c = ParticlesContainer::new(4, ["a", "b", "a"], ["p"]).unwrap();
        assert_eq!(c.float_attribute_amount(), 2);
        assert_eq!(c.float_buffer_index("b").unwrap(), AttributeSlot(1));
    }

    #[test]
    fn reject_policy_via_config() {
        let config = ContainerConfig::builder(4)
            .float_attribute("a")
            .float_attribute("a")
            .duplicate_policy(DuplicatePolicy::Reject)
            .build()
            .unwrap();
        assert!(matches!(
            ParticlesContainer::from_config(config),
            Err(StoreError::DuplicateAttribute { .. })
        ));
    }

    #[test]
    fn new_block_starts_empty() {
        let mut c = make_container();
        let h = c.new_block().unwrap();
        let block = c.block(h).unwrap();
        assert_eq!(block.active_amount(), 0);
        assert_eq!(block.size(), c.block_size());
        assert!(!block.is_full());
        assert_eq!(block.container_id(), c.id());
        assert_eq!(c.block_count(), 1);
        assert!(c.contains(h));
    }

    #[test]
    fn write_and_read_back() {
        let mut c = make_container();
        let h = c.new_block().unwrap();
        {
            let block = c.block_mut(h).unwrap();
            block.float_buffer_mut("mass").unwrap()[0] = 2.5;
            block.vec3_buffer_mut("position").unwrap()[0] = Vec3::new(1.0, 2.0, 3.0);
            block.set_active_amount(1);
        }
        let block = c.block(h).unwrap();
        assert_eq!(block.float_buffer("mass").unwrap()[0], 2.5);
        assert_eq!(
            block.vec3_buffer("position").unwrap()[0],
            Vec3::new(1.0, 2.0, 3.0)
        );
        assert_eq!(c.vec3_buffer_index("position").unwrap(), AttributeSlot(0));
        assert_eq!(c.particle_count(), 1);
    }

    #[test]
    fn release_removes_from_active_set() {
        let mut c = make_container();
        let a = c.new_block().unwrap();
        let b = c.new_block().unwrap();
        c.release_block(a).unwrap();
        let live: Vec<_> = c.block_handles();
        assert_eq!(live, vec![b]);
        assert!(!c.contains(a));
        assert!(matches!(c.block(a), Err(StoreError::StaleBlock { .. })));
    }

    #[test]
    fn double_release_is_stale() {
        let mut c = make_container();
        let h = c.new_block().unwrap();
        c.release_block(h).unwrap();
        assert_eq!(
            c.release_block(h).unwrap_err(),
            StoreError::StaleBlock {
                id: h.id(),
                handle_generation: 0,
                current_generation: 1,
            }
        );
        assert_eq!(c.block_count(), 0);
    }

    #[test]
    fn foreign_release_leaves_both_containers_intact() {
        let mut a = make_container();
        let mut b = make_container();
        let ha = a.new_block().unwrap();
        let hb = b.new_block().unwrap();
        assert_eq!(ha.id(), hb.id());

        let err = a.release_block(hb).unwrap_err();
        assert_eq!(
            err,
            StoreError::ForeignBlock {
                handle_container: b.id(),
                container: a.id(),
            }
        );
        assert!(a.contains(ha));
        assert!(b.contains(hb));
        assert_eq!(a.block_count(), 1);
        assert_eq!(b.block_count(), 1);
    }

    #[test]
    fn released_slot_is_reused_with_new_generation() {
        let mut c = make_container();
        let old = c.new_block().unwrap();
        c.release_block(old).unwrap();
        let new = c.new_block().unwrap();
        assert_eq!(new.id(), old.id());
        assert_eq!(new.generation(), old.generation() + 1);
        assert!(matches!(c.block(old), Err(StoreError::StaleBlock { .. })));
        assert!(c.block(new).is_ok());
        assert_eq!(c.metrics().slot_reuses, 1);
    }

    #[test]
    fn slot_at_generation_limit_is_retired() {
        let mut c = make_container();
        let first = c.new_block().unwrap();
        c.set_slot_generation(0, u32::MAX - 1);
        assert!(matches!(c.block(first), Err(StoreError::StaleBlock { .. })));

        let h = c.block_handles()[0];
        assert_eq!(h.generation(), u32::MAX - 1);
        c.release_block(h).unwrap();

        let last = c.new_block().unwrap();
        assert_eq!(last.id(), BlockId(0));
        assert_eq!(last.generation(), u32::MAX);
        c.release_block(last).unwrap();
        assert_eq!(c.metrics().retired_slots, 1);

        let fresh = c.new_block().unwrap();
        assert_eq!(fresh.id(), BlockId(1));
        assert_eq!(fresh.generation(), 0);
        for old in [first, h, last] {
            assert!(!c.contains(old));
            assert!(matches!(
                c.release_block(old),
                Err(StoreError::StaleBlock { .. })
            ));
        }
        assert_eq!(c.block_handles(), vec![fresh]);
    }

    #[test]
    fn block_limit_enforced() {
        let config = ContainerConfig::builder(2)
            .float_attribute("mass")
            .max_blocks(1)
            .build()
            .unwrap();
        let mut c = ParticlesContainer::from_config(config).unwrap();
        let h = c.new_block().unwrap();
        assert_eq!(
            c.new_block().unwrap_err(),
            StoreError::CapacityExceeded { max_blocks: 1 }
        );
        c.release_block(h).unwrap();
        assert!(c.new_block().is_ok());
    }

    #[test]
    fn release_empty_blocks_keeps_populated() {
        let mut c = make_container();
        let full = c.new_block().unwrap();
        let _empty1 = c.new_block().unwrap();
        let _empty2 = c.new_block().unwrap();
        c.block_mut(full).unwrap().set_active_amount(3);
        assert_eq!(c.release_empty_blocks(), 2);
        assert_eq!(c.block_handles(), vec![full]);
        assert_eq!(c.release_empty_blocks(), 0);
    }

    #[test]
    fn clear_releases_everything() {
        let mut c = make_container();
        let h = c.new_block().unwrap();
        let _ = c.new_block().unwrap();
        c.clear();
        assert_eq!(c.block_count(), 0);
        assert!(!c.contains(h));
        assert_eq!(c.active_blocks().count(), 0);
    }

    #[test]
    fn active_blocks_mut_allows_bulk_update() {
        let mut c = make_container();
        let _ = c.new_block().unwrap();
        let _ = c.new_block().unwrap();
        for (_, block) in c.active_blocks_mut() {
            block.float_buffer_mut("mass").unwrap().fill(1.0);
            block.set_active_amount(4);
        }
        assert_eq!(c.particle_count(), 8);
        assert!(c.active_blocks().all(|(_, b)| b.is_full()));
    }

    #[test]
    fn metrics_track_memory_and_counters() {
        let mut c = make_container();
        let h = c.new_block().unwrap();
        let _ = c.new_block().unwrap();
        c.release_block(h).unwrap();
        let m = c.metrics();
        assert_eq!(m.live_blocks, 1);
        assert_eq!(m.capacity, 4);
        assert_eq!(m.memory_bytes, 4 * 4 + 4 * 12);
        assert_eq!(m.total_allocations, 2);
        assert_eq!(m.total_releases, 1);
    }

    #[test]
    fn two_blocks_mut_rejects_same_index() {
        let mut c = make_container();
        let _ = c.new_block().unwrap();
        let _ = c.new_block().unwrap();
        assert!(c.two_blocks_mut(0, 0).is_none());
        let (a, b) = c.two_blocks_mut(1, 0).unwrap();
        assert_eq!(a.id(), BlockId(1));
        assert_eq!(b.id(), BlockId(0));
    }
}
