//! Strongly-typed identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`ContainerId`] allocation.
static CONTAINER_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a particle container.
///
/// Allocated from a monotonic atomic counter via [`ContainerId::next`].
/// Two containers never share an ID within a process, even if one is
/// dropped and another is created at the same address. Block handles
/// carry the ID of the container that issued them, which is how a
/// container recognises handles that belong to someone else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(u64);

impl ContainerId {
    /// Allocate a fresh, unique container ID. Thread-safe.
    pub fn next() -> Self {
        Self(CONTAINER_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a block slot within its container.
///
/// Slots are reused after release; pair with a generation (see
/// `BlockHandle` in `spume-store`) to identify one particular block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl BlockId {
    /// The slot index as `usize`.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for BlockId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Stable buffer slot assigned to a named attribute at container construction.
///
/// `AttributeSlot(n)` is the n-th distinct name registered for its kind.
/// Slots never change for the lifetime of the container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeSlot(pub u32);

impl AttributeSlot {
    /// The slot index as `usize`.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AttributeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AttributeSlot {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_ids_are_unique() {
        let a = ContainerId::next();
        let b = ContainerId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }

    #[test]
    fn slot_index_conversion() {
        assert_eq!(AttributeSlot::from(7).index(), 7);
        assert_eq!(BlockId(3).index(), 3);
        assert_eq!(BlockId(3).to_string(), "3");
    }
}
