//! Error types for the Spume particle store.
//!
//! Schema errors (unknown or duplicate attribute names, bad configuration)
//! and ownership errors (foreign or stale block handles) surface
//! immediately to the caller. There is no retry policy in the store.

use std::error::Error;
use std::fmt;

use crate::attribute::AttributeKind;
use crate::id::{BlockId, ContainerId};

/// Errors from container construction, schema lookups, and block ownership.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// A name lookup was given a name never registered for that kind.
    UnknownAttribute {
        /// Which registry was searched.
        kind: AttributeKind,
        /// The unrecognised name.
        name: String,
    },
    /// A name appeared twice in one registry under the `Reject` policy.
    DuplicateAttribute {
        /// Which registry contained the duplicate.
        kind: AttributeKind,
        /// The duplicated name.
        name: String,
    },
    /// A block handle issued by a different container.
    ForeignBlock {
        /// The container that issued the handle.
        handle_container: ContainerId,
        /// The container the handle was presented to.
        container: ContainerId,
    },
    /// A block handle whose block has already been released.
    StaleBlock {
        /// Slot the handle points at.
        id: BlockId,
        /// Generation encoded in the handle.
        handle_generation: u32,
        /// Current generation of the slot.
        current_generation: u32,
    },
    /// The container's configured block limit has been reached.
    CapacityExceeded {
        /// The configured maximum number of live blocks.
        max_blocks: u32,
    },
    /// Container configuration failed validation.
    InvalidConfig {
        /// Description of the validation failure.
        reason: String,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAttribute { kind, name } => {
                write!(f, "unknown {kind} attribute '{name}'")
            }
            Self::DuplicateAttribute { kind, name } => {
                write!(f, "duplicate {kind} attribute '{name}'")
            }
            Self::ForeignBlock {
                handle_container,
                container,
            } => {
                write!(
                    f,
                    "block handle from container {handle_container} used with container {container}"
                )
            }
            Self::StaleBlock {
                id,
                handle_generation,
                current_generation,
            } => {
                write!(
                    f,
                    "stale block handle: slot {id}, generation {handle_generation}, current {current_generation}"
                )
            }
            Self::CapacityExceeded { max_blocks } => {
                write!(f, "block limit of {max_blocks} reached")
            }
            Self::InvalidConfig { reason } => write!(f, "invalid container config: {reason}"),
        }
    }
}

impl Error for StoreError {}
