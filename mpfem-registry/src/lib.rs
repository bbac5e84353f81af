//! Hierarchical registry of named items.
//!
//! The registry is a tree of [`RegistryItem`]s. Every item has a name and either holds a single
//! typed value, holds named children, or is empty. Items are addressed by dotted paths relative
//! to the root of a [`Registry`], e.g. `"applications.structural.elements.truss"`.
//!
//! The tree is safe to read and modify from many threads at once: each item guards its own
//! children, so assembly loops running on a thread pool can register and look up entries under
//! different keys without serializing on a global lock.

mod error;
mod item;
mod json;
mod registry;
mod value;

#[cfg(feature = "serde-serialize")]
mod serialize;

pub mod path;

pub use error::{RegistryError, StateViolation};
pub use item::RegistryItem;
pub use registry::{Registry, ROOT_NAME};
pub use value::{RegistryValue, RegistryValueItem};

/// Indentation unit used when rendering items through `Display`.
pub const DEFAULT_INDENTATION: &str = "    ";
