//! Core types for the Spume particle store.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! value types shared by the store and by the steppers that drive it:
//! the per-step [`TimeSpan`], strongly-typed identifiers, attribute kinds,
//! and the [`StoreError`] taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod attribute;
pub mod error;
pub mod id;
pub mod time;

pub use attribute::{AttributeKind, Vec3};
pub use error::StoreError;
pub use id::{AttributeSlot, BlockId, ContainerId};
pub use time::TimeSpan;
