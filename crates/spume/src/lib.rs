//! Spume: fixed-block particle attribute storage for time-stepped simulations.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Spume sub-crates. For most users, adding `spume` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use spume::prelude::*;
//!
//! let mut particles = ParticlesContainer::new(4, ["mass"], ["position"]).unwrap();
//! let handle = particles.new_block().unwrap();
//!
//! let block = particles.block_mut(handle).unwrap();
//! let i = block.next_inactive_index() as usize;
//! block.float_buffer_mut("mass").unwrap()[i] = 1.0;
//! block.vec3_buffer_mut("position").unwrap()[i] = Vec3::new(0.0, 2.0, 0.0);
//! *block.active_amount_mut() += 1;
//!
//! // One step: fall under gravity for the span's duration.
//! let span = TimeSpan::new(0.0, 0.5);
//! for (_, block) in particles.active_blocks_mut() {
//!     let n = block.active_amount() as usize;
//!     for p in &mut block.vec3_buffer_mut("position").unwrap()[..n] {
//!         p.y -= 1.0 * span.duration();
//!     }
//! }
//!
//! let block = particles.block(handle).unwrap();
//! assert_eq!(block.vec3_buffer("position").unwrap()[0].y, 1.5);
//!
//! particles.release_block(handle).unwrap();
//! assert!(particles.release_block(handle).is_err());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `spume-core` | `TimeSpan`, IDs, attribute kinds, `StoreError` |
//! | [`store`] | `spume-store` | Container, blocks, handles, schema, config, metrics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core value types and errors (`spume-core`).
pub use spume_core as types;

/// Particle container, blocks, and configuration (`spume-store`).
pub use spume_store as store;

/// Common imports for typical Spume usage.
///
/// ```rust
/// use spume::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use spume_core::{AttributeKind, AttributeSlot, BlockId, StoreError, TimeSpan, Vec3};

    // Store
    pub use spume_store::{
        BlockHandle, ContainerConfig, DuplicatePolicy, ParticlesBlock, ParticlesContainer,
        StoreMetrics,
    };
}
