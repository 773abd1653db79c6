//! Fixed-block particle storage for Spume simulations.
//!
//! A [`ParticlesContainer`] holds a particle population split into blocks
//! of a fixed capacity. Each [`ParticlesBlock`] lays its particles out
//! structure-of-arrays, one buffer per registered attribute, so a stepper
//! can sweep a single attribute across a whole block in a tight loop.
//!
//! # Architecture
//!
//! ```text
//! ParticlesContainer
//! ├── Arc<BlockLayout> (block_size + AttributeSchema, shared with blocks)
//! ├── BlockSlot[] (generation + Option<ParticlesBlock>)
//! │   └── ParticlesBlock
//! │       ├── floats: Vec<f32>  (float_count × block_size)
//! │       └── vec3s:  Vec<Vec3> (vec3_count × block_size)
//! └── free_list (released slots, reused with a bumped generation)
//! ```
//!
//! Callers hold [`BlockHandle`]s, never references that outlive a call.
//! The container is single-owner: every mutation takes `&mut self`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod block;
pub mod compact;
pub mod config;
pub mod container;
pub mod handle;
pub mod layout;
pub mod metrics;
pub mod schema;

pub use block::ParticlesBlock;
pub use compact::CompressStats;
pub use config::{ContainerConfig, ContainerConfigBuilder, DuplicatePolicy};
pub use container::ParticlesContainer;
pub use handle::BlockHandle;
pub use layout::BlockLayout;
pub use metrics::StoreMetrics;
pub use schema::AttributeSchema;
