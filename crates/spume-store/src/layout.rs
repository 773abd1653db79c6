//! Block layout shared between a container and the blocks it issues.

use spume_core::{AttributeKind, ContainerId};

use crate::schema::AttributeSchema;

/// Fixed per-container layout: block capacity plus attribute schema.
///
/// One `Arc<BlockLayout>` is created per container and cloned into every
/// block it allocates. Blocks read their capacity and resolve attribute
/// names through it, so a block's `size()` can never drift from the
/// container's `block_size()`.
#[derive(Debug)]
pub struct BlockLayout {
    container: ContainerId,
    block_size: u32,
    schema: AttributeSchema,
}

impl BlockLayout {
    pub(crate) fn new(container: ContainerId, block_size: u32, schema: AttributeSchema) -> Self {
        Self {
            container,
            block_size,
            schema,
        }
    }

    /// The container this layout belongs to.
    pub fn container(&self) -> ContainerId {
        self.container
    }

    /// Particle capacity of every block.
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// The attribute schema.
    pub fn schema(&self) -> &AttributeSchema {
        &self.schema
    }

    /// Bytes of attribute storage in one block.
    pub fn block_bytes(&self) -> usize {
        let per_particle: usize = [AttributeKind::Float, AttributeKind::Vec3]
            .into_iter()
            .map(|kind| self.schema.len(kind) * kind.element_bytes())
            .sum();
        self.block_size as usize * per_particle
    }
}
