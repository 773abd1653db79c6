//! Bulk compaction of a container's blocks.
//!
//! After particles die, a population tends to spread thinly over many
//! blocks. [`ParticlesContainer::compress`] moves particles out of the
//! emptiest blocks into the free capacity of the fullest ones and releases
//! whatever is left empty. Afterwards at most one block is partially
//! filled.

use crate::container::ParticlesContainer;

/// Outcome of a [`ParticlesContainer::compress`] pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompressStats {
    /// Particles copied between blocks.
    pub moved: u64,
    /// Blocks released because they ended up empty.
    pub released: usize,
}

impl ParticlesContainer {
    /// Pack particles into as few blocks as possible.
    ///
    /// Attribute values of every particle are preserved; their block and
    /// index are not.
    pub fn compress(&mut self) -> CompressStats {
        // Fullest first; ties broken by slot for reproducible results.
        let mut order: Vec<(u32, usize)> = self
            .active_blocks()
            .map(|(handle, block)| (block.active_amount(), handle.id().index()))
            .collect();
        order.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        let mut moved = 0u64;
        if order.len() > 1 {
            let mut dst = 0;
            let mut src = order.len() - 1;
            while dst < src {
                let Some((dst_block, src_block)) = self.two_blocks_mut(order[dst].1, order[src].1)
                else {
                    break;
                };
                if dst_block.is_full() {
                    dst += 1;
                    continue;
                }
                if src_block.is_empty() {
                    src -= 1;
                    continue;
                }
                let n = src_block.move_particles_to(dst_block, u32::MAX);
                tracing::trace!(
                    from = %src_block.id(),
                    to = %dst_block.id(),
                    particles = n,
                    "moved particles"
                );
                moved += u64::from(n);
            }
        }

        let released = self.release_empty_blocks();
        if moved > 0 || released > 0 {
            tracing::debug!(container = %self.id(), moved, released, "compressed blocks");
        }
        CompressStats { moved, released }
    }
}
