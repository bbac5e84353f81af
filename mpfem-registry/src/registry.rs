use std::fmt;
use std::sync::{Arc, OnceLock};

use log::{debug, trace};

use crate::error::{RegistryError, StateViolation};
use crate::item::RegistryItem;
use crate::path::{join_path, split_leaf, split_path};
use crate::value::RegistryValue;

/// Name of the root item of every registry.
pub const ROOT_NAME: &str = "Registry";

static GLOBAL_REGISTRY: OnceLock<Registry> = OnceLock::new();

/// A tree of [`RegistryItem`]s addressed by dotted paths.
///
/// Intermediate items along a path are created on demand when adding, so
/// `add_item("solvers.linear.cg")` creates `solvers` and `solvers.linear` as plain items if
/// they do not exist yet. Only the terminal item is of the requested kind.
///
/// Most code uses the process-wide instance returned by [`Registry::global`]. Separate instances
/// can be created with [`Registry::new`].
///
/// # Examples
///
/// ```rust
/// use mpfem_registry::Registry;
///
/// let registry = Registry::new();
/// registry.add_value_item("solvers.linear.tolerance", 1e-8).unwrap();
///
/// assert!(registry.has_item("solvers.linear"));
/// assert_eq!(registry.get_value::<f64>("solvers.linear.tolerance").unwrap(), 1e-8);
///
/// registry.remove_item("solvers.linear").unwrap();
/// assert!(!registry.has_item("solvers.linear.tolerance"));
/// assert!(registry.has_item("solvers"));
/// ```
pub struct Registry {
    root: Arc<RegistryItem>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            root: Arc::new(RegistryItem::new(ROOT_NAME)),
        }
    }

    /// The process-wide registry.
    ///
    /// The registry is created by the first caller. Concurrent first callers block until it has
    /// been created, and all of them observe the same instance. It is never destroyed.
    pub fn global() -> &'static Registry {
        GLOBAL_REGISTRY.get_or_init(|| {
            debug!("Initializing global registry");
            Registry::new()
        })
    }

    pub fn root_item(&self) -> &Arc<RegistryItem> {
        &self.root
    }

    fn find(&self, segments: &[&str]) -> Option<Arc<RegistryItem>> {
        let mut current = Arc::clone(&self.root);
        for segment in segments {
            current = current.find_item(segment)?;
        }
        Some(current)
    }

    pub fn has_item(&self, path: &str) -> bool {
        self.find(&split_path(path)).is_some()
    }

    /// Returns the item at `path`. The empty path refers to the root item.
    pub fn get_item(&self, path: &str) -> Result<Arc<RegistryItem>, RegistryError> {
        self.find(&split_path(path))
            .ok_or_else(|| RegistryError::not_found(path))
    }

    /// Adds an empty item at `path`.
    pub fn add_item(&self, path: &str) -> Result<Arc<RegistryItem>, RegistryError> {
        self.add_item_with(path, |name| RegistryItem::new(name))
    }

    /// Adds an item holding `value` at `path`.
    pub fn add_value_item<T: RegistryValue>(&self, path: &str, value: T) -> Result<Arc<RegistryItem>, RegistryError> {
        self.add_item_with(path, |name| RegistryItem::with_value(name, value))
    }

    /// Adds the item created by `factory` at `path`.
    ///
    /// The factory is called with the terminal segment of `path` and must return an item with
    /// that name. It is called before any intermediate item is created.
    pub fn add_item_with<F>(&self, path: &str, factory: F) -> Result<Arc<RegistryItem>, RegistryError>
    where
        F: FnOnce(&str) -> RegistryItem,
    {
        let (parent_segments, leaf) = split_leaf(path).ok_or_else(|| RegistryError::conflict(path))?;

        let item = factory(leaf);
        if item.name() != leaf {
            let violation = StateViolation::NameMismatch {
                expected: leaf.to_string(),
                found: item.name().to_string(),
            };
            return Err(RegistryError::invalid_state(path, violation));
        }

        // If any intermediate item is created here, every item below it is new as well, so no
        // later step can fail and leave the created items behind.
        let mut parent = Arc::clone(&self.root);
        for (depth, segment) in parent_segments.iter().enumerate() {
            let (child, created) = parent
                .get_or_add_item(segment)
                .map_err(|err| err.with_path(join_path(parent_segments[..=depth].iter().copied())))?;
            if created {
                let created_path = join_path(parent_segments[..=depth].iter().copied());
                trace!("Created intermediate registry item \"{created_path}\"");
            }
            parent = child;
        }

        let item = parent.insert_item(item).map_err(|err| err.with_path(path))?;
        debug!("Added registry item \"{path}\"");
        Ok(item)
    }

    /// Detaches the item at `path` from its parent and returns it.
    pub fn remove_item(&self, path: &str) -> Result<Arc<RegistryItem>, RegistryError> {
        let (parent_segments, leaf) = split_leaf(path)
            .ok_or_else(|| RegistryError::invalid_state(path, StateViolation::RootRemoval))?;
        let parent = self
            .find(&parent_segments)
            .ok_or_else(|| RegistryError::not_found(path))?;
        let removed = parent.remove_item(leaf).map_err(|err| err.with_path(path))?;
        debug!("Removed registry item \"{path}\"");
        Ok(removed)
    }

    /// Whether an item holding a value exists at `path`.
    pub fn has_value(&self, path: &str) -> bool {
        self.find(&split_path(path))
            .map(|item| item.has_value())
            .unwrap_or(false)
    }

    /// Returns a copy of the value stored at `path`.
    pub fn get_value<T>(&self, path: &str) -> Result<T, RegistryError>
    where
        T: RegistryValue + Clone,
    {
        self.get_item(path)?
            .get_value()
            .map_err(|err| err.with_path(path))
    }

    /// Stores a value in the existing item at `path`. See [`RegistryItem::set_value`].
    pub fn set_value<T: RegistryValue>(&self, path: &str, value: T) -> Result<(), RegistryError> {
        self.get_item(path)?
            .set_value(value)
            .map_err(|err| err.with_path(path))
    }

    /// Renders the whole registry, starting from the root item.
    pub fn to_json(&self, indentation: &str) -> String {
        self.root.to_json(indentation)
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Registry")
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("root", &self.root).finish()
    }
}
