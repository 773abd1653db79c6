//! Block handles.
//!
//! A [`BlockHandle`] names one particular block: the container that issued
//! it, the slot it lives in, and the slot's generation at allocation time.
//! Releasing a block bumps its slot's generation, so every outstanding
//! handle to it goes stale in O(1) without pointer comparisons.

use std::fmt;

use spume_core::{BlockId, ContainerId};

/// Non-owning, generation-checked reference to a block.
///
/// Handles are `Copy` and cheap to store. They never keep a block alive;
/// resolving a handle after its block was released fails with
/// [`StoreError::StaleBlock`](spume_core::StoreError::StaleBlock).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct BlockHandle {
    pub(crate) container: ContainerId,
    pub(crate) id: BlockId,
    pub(crate) generation: u32,
}

impl BlockHandle {
    pub(crate) fn new(container: ContainerId, id: BlockId, generation: u32) -> Self {
        Self {
            container,
            id,
            generation,
        }
    }

    /// The container that issued this handle.
    pub fn container(&self) -> ContainerId {
        self.container
    }

    /// The block slot.
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// The slot generation when the block was allocated.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for BlockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BlockHandle(container={}, id={}, gen={})",
            self.container, self.id, self.generation
        )
    }
}
