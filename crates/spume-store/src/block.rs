//! Fixed-capacity particle blocks.
//!
//! A [`ParticlesBlock`] stores up to `block_size` particles in
//! structure-of-arrays form: every scalar attribute gets a run of
//! `block_size` `f32`s and every vector attribute a run of `block_size`
//! [`Vec3`]s. All scalar runs share one contiguous allocation, as do all
//! vector runs, sliced by [`AttributeSlot`].
//!
//! ```text
//! floats: [ mass[0..N) | age[0..N) | ... ]
//! vec3s:  [ position[0..N) | velocity[0..N) | ... ]
//!           ^ active [0..active_amount), free [active_amount..N)
//! ```
//!
//! Indices below `active_amount` hold live particles; the rest is free
//! capacity whose contents are unspecified.

use std::fmt;
use std::ops::Range;
use std::slice::{ChunksExact, ChunksExactMut};
use std::sync::Arc;

use spume_core::{AttributeKind, AttributeSlot, BlockId, ContainerId, StoreError, Vec3};

use crate::layout::BlockLayout;

/// Storage for one block of particles.
///
/// Blocks are created and destroyed only by their
/// [`ParticlesContainer`](crate::ParticlesContainer); callers reach them
/// through a [`BlockHandle`](crate::BlockHandle).
pub struct ParticlesBlock {
    layout: Arc<BlockLayout>,
    id: BlockId,
    floats: Vec<f32>,
    vec3s: Vec<Vec3>,
    active_amount: u32,
}

impl ParticlesBlock {
    /// Allocate a zero-initialised block with no active particles.
    pub(crate) fn new(layout: Arc<BlockLayout>, id: BlockId) -> Self {
        let size = layout.block_size() as usize;
        let schema = layout.schema();
        let floats = vec![0.0; size * schema.float_attribute_amount()];
        let vec3s = vec![Vec3::ZERO; size * schema.vec3_attribute_amount()];
        Self {
            layout,
            id,
            floats,
            vec3s,
            active_amount: 0,
        }
    }

    /// Slot of this block within its container.
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// The container that owns this block.
    pub fn container_id(&self) -> ContainerId {
        self.layout.container()
    }

    /// The layout shared with the owning container.
    pub fn layout(&self) -> &BlockLayout {
        &self.layout
    }

    /// Number of live particles, stored at indices `[0, active_amount)`.
    pub fn active_amount(&self) -> u32 {
        self.active_amount
    }

    /// Mutable access to the live-particle count.
    ///
    /// The block does not re-validate the count; keeping it within
    /// `[0, size()]` is the caller's job.
    pub fn active_amount_mut(&mut self) -> &mut u32 {
        &mut self.active_amount
    }

    /// Set the live-particle count.
    ///
    /// Debug builds assert `amount <= size()`.
    pub fn set_active_amount(&mut self, amount: u32) {
        debug_assert!(
            amount <= self.size(),
            "active_amount {amount} exceeds block size {}",
            self.size()
        );
        self.active_amount = amount;
    }

    /// Capacity of this block, read from the container's layout.
    pub fn size(&self) -> u32 {
        self.layout.block_size()
    }

    /// Whether every slot holds a live particle.
    pub fn is_full(&self) -> bool {
        self.active_amount == self.size()
    }

    /// Whether the block holds no live particles.
    pub fn is_empty(&self) -> bool {
        self.active_amount == 0
    }

    /// Free slots left: `size() - active_amount()`.
    pub fn remaining_capacity(&self) -> u32 {
        self.size().saturating_sub(self.active_amount)
    }

    /// Index a newly spawned particle should be written to.
    ///
    /// Always equal to [`active_amount`](Self::active_amount). Check
    /// [`is_full`](Self::is_full) first.
    pub fn next_inactive_index(&self) -> u32 {
        self.active_amount
    }

    /// Mark every particle inactive. Buffer contents are left as they are.
    pub fn clear(&mut self) {
        self.active_amount = 0;
    }

    fn span(&self, slot: AttributeSlot) -> Range<usize> {
        let size = self.size() as usize;
        let start = slot.index() * size;
        start..start + size
    }

    /// Scalar buffer for `slot`, `size()` elements long.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not a registered scalar slot.
    pub fn float_buffer_at(&self, slot: AttributeSlot) -> &[f32] {
        let range = self.span(slot);
        &self.floats[range]
    }

    /// Mutable scalar buffer for `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not a registered scalar slot.
    pub fn float_buffer_at_mut(&mut self, slot: AttributeSlot) -> &mut [f32] {
        let range = self.span(slot);
        &mut self.floats[range]
    }

    /// Vector buffer for `slot`, `size()` elements long.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not a registered vector slot.
    pub fn vec3_buffer_at(&self, slot: AttributeSlot) -> &[Vec3] {
        let range = self.span(slot);
        &self.vec3s[range]
    }

    /// Mutable vector buffer for `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not a registered vector slot.
    pub fn vec3_buffer_at_mut(&mut self, slot: AttributeSlot) -> &mut [Vec3] {
        let range = self.span(slot);
        &mut self.vec3s[range]
    }

    /// Scalar buffer for the attribute called `name`.
    ///
    /// The slice covers the whole block; entries `[0, active_amount)` are live.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownAttribute`] if `name` is not a registered scalar.
    pub fn float_buffer(&self, name: &str) -> Result<&[f32], StoreError> {
        let slot = self.layout.schema().float_index(name)?;
        Ok(self.float_buffer_at(slot))
    }

    /// Mutable scalar buffer for the attribute called `name`.
    pub fn float_buffer_mut(&mut self, name: &str) -> Result<&mut [f32], StoreError> {
        let slot = self.layout.schema().float_index(name)?;
        Ok(self.float_buffer_at_mut(slot))
    }

    /// Vector buffer for the attribute called `name`.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownAttribute`] if `name` is not a registered vector.
    pub fn vec3_buffer(&self, name: &str) -> Result<&[Vec3], StoreError> {
        let slot = self.layout.schema().vec3_index(name)?;
        Ok(self.vec3_buffer_at(slot))
    }

    /// Mutable vector buffer for the attribute called `name`.
    pub fn vec3_buffer_mut(&mut self, name: &str) -> Result<&mut [Vec3], StoreError> {
        let slot = self.layout.schema().vec3_index(name)?;
        Ok(self.vec3_buffer_at_mut(slot))
    }

    /// All scalar buffers, in slot order.
    pub fn float_buffers(&self) -> ChunksExact<'_, f32> {
        self.floats.chunks_exact(self.size() as usize)
    }

    /// All scalar buffers, mutably, in slot order.
    pub fn float_buffers_mut(&mut self) -> ChunksExactMut<'_, f32> {
        let size = self.size() as usize;
        self.floats.chunks_exact_mut(size)
    }

    /// All vector buffers, in slot order.
    pub fn vec3_buffers(&self) -> ChunksExact<'_, Vec3> {
        self.vec3s.chunks_exact(self.size() as usize)
    }

    /// All vector buffers, mutably, in slot order.
    pub fn vec3_buffers_mut(&mut self) -> ChunksExactMut<'_, Vec3> {
        let size = self.size() as usize;
        self.vec3s.chunks_exact_mut(size)
    }

    /// Remove the particle at `index` by moving the last live particle into
    /// its place, across every attribute.
    ///
    /// Particle order is not preserved.
    ///
    /// # Panics
    ///
    /// Panics if `index >= active_amount()`.
    pub fn swap_remove(&mut self, index: u32) {
        assert!(
            index < self.active_amount,
            "swap_remove index {index} out of active range {}",
            self.active_amount
        );
        let last = (self.active_amount - 1) as usize;
        let index = index as usize;
        let size = self.size() as usize;
        for buffer in self.floats.chunks_exact_mut(size) {
            buffer[index] = buffer[last];
        }
        for buffer in self.vec3s.chunks_exact_mut(size) {
            buffer[index] = buffer[last];
        }
        self.active_amount -= 1;
    }

    /// Move up to `count` particles from the tail of this block into the
    /// free capacity of `dst`.
    ///
    /// Returns how many particles were moved: the minimum of `count`, this
    /// block's active amount, and `dst`'s remaining capacity. Both blocks
    /// must come from the same container.
    pub fn move_particles_to(&mut self, dst: &mut ParticlesBlock, count: u32) -> u32 {
        debug_assert!(
            Arc::ptr_eq(&self.layout, &dst.layout),
            "blocks from different containers"
        );
        let moved = count.min(self.active_amount).min(dst.remaining_capacity());
        if moved == 0 {
            return 0;
        }
        let size = self.size() as usize;
        let src_range = (self.active_amount - moved) as usize..self.active_amount as usize;
        let dst_start = dst.active_amount as usize;
        let dst_range = dst_start..dst_start + moved as usize;

        for (src, out) in self
            .floats
            .chunks_exact(size)
            .zip(dst.floats.chunks_exact_mut(size))
        {
            out[dst_range.clone()].copy_from_slice(&src[src_range.clone()]);
        }
        for (src, out) in self
            .vec3s
            .chunks_exact(size)
            .zip(dst.vec3s.chunks_exact_mut(size))
        {
            out[dst_range.clone()].copy_from_slice(&src[src_range.clone()]);
        }

        self.active_amount -= moved;
        dst.active_amount += moved;
        moved
    }

    /// Bytes of attribute storage held by this block.
    pub fn memory_bytes(&self) -> usize {
        self.floats.len() * AttributeKind::Float.element_bytes()
            + self.vec3s.len() * AttributeKind::Vec3.element_bytes()
    }
}

impl fmt::Debug for ParticlesBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParticlesBlock")
            .field("container", &self.container_id())
            .field("id", &self.id)
            .field("active_amount", &self.active_amount)
            .field("size", &self.size())
            .finish()
    }
}
