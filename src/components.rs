//! Named component prototypes.
//!
//! Elements, conditions and constitutive laws are registered under a name so that models can
//! refer to them by name at runtime, e.g. `"Element2D3N"`. A [`Components`] handle stores such
//! prototypes below `components.<category>` in a registry.

use crate::registry::path::PATH_SEPARATOR;
use crate::registry::{Registry, RegistryError, RegistryValue};
use log::warn;
use std::any::type_name;
use std::error::Error;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Registry path below which all component categories are stored.
pub const COMPONENTS_PATH: &str = "components";

/// Registry value wrapping a shared component prototype.
struct ComponentEntry<T: ?Sized>(Arc<T>);

impl<T: ?Sized> Clone for ComponentEntry<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> RegistryValue for ComponentEntry<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn to_value_string(&self) -> String {
        type_name::<T>().to_string()
    }
}

#[derive(Debug)]
pub enum ComponentError {
    /// No component with the given name exists in the category.
    NotRegistered {
        name: String,
        category: String,
        registered: Vec<String>,
    },
    /// The name contains the path separator and cannot address a single entry.
    InvalidName { name: String },
    /// The underlying registry rejected the operation.
    Registry(RegistryError),
}

impl fmt::Display for ComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRegistered {
                name,
                category,
                registered,
            } => {
                writeln!(f, "The component \"{name}\" is not registered!")?;
                writeln!(f, "Maybe you need to import the application where it is defined?")?;
                write!(
                    f,
                    "The following components of this type ({category}) are registered: {}",
                    registered.join(", ")
                )
            }
            Self::InvalidName { name } => write!(
                f,
                "Invalid component name \"{name}\": names must not contain '{PATH_SEPARATOR}'"
            ),
            Self::Registry(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ComponentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotRegistered { .. } | Self::InvalidName { .. } => None,
            Self::Registry(err) => Some(err),
        }
    }
}

impl From<RegistryError> for ComponentError {
    fn from(err: RegistryError) -> Self {
        Self::Registry(err)
    }
}

/// A category of named components of type `T`.
///
/// `T` is typically a trait object, so that prototypes of different concrete types can be
/// registered in the same category.
///
/// # Examples
///
/// ```rust
/// use mpfem::components::Components;
/// use mpfem::registry::Registry;
/// use std::sync::Arc;
///
/// trait Element: Send + Sync {
///     fn num_nodes(&self) -> usize;
/// }
///
/// struct Triangle;
///
/// impl Element for Triangle {
///     fn num_nodes(&self) -> usize {
///         3
///     }
/// }
///
/// let registry = Registry::new();
/// let elements = Components::<dyn Element>::in_registry(&registry, "elements");
/// elements.add("Element2D3N", Arc::new(Triangle)).unwrap();
///
/// assert_eq!(elements.get("Element2D3N").unwrap().num_nodes(), 3);
/// assert!(registry.has_item("components.elements.Element2D3N"));
/// ```
pub struct Components<'r, T: ?Sized> {
    registry: &'r Registry,
    category: String,
    base_path: String,
    marker: PhantomData<fn() -> Arc<T>>,
}

impl<T> Components<'static, T>
where
    T: ?Sized + Send + Sync + 'static,
{
    /// Components of the given category in the global registry.
    pub fn new(category: impl Into<String>) -> Self {
        Self::in_registry(Registry::global(), category)
    }
}

impl<'r, T> Components<'r, T>
where
    T: ?Sized + Send + Sync + 'static,
{
    pub fn in_registry(registry: &'r Registry, category: impl Into<String>) -> Self {
        let category = category.into();
        let base_path = format!("{COMPONENTS_PATH}{PATH_SEPARATOR}{category}");
        Self {
            registry,
            category,
            base_path,
            marker: PhantomData,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    fn component_path(&self, name: &str) -> Result<String, ComponentError> {
        if name.contains(PATH_SEPARATOR) {
            return Err(ComponentError::InvalidName { name: name.to_string() });
        }
        Ok(format!("{}{PATH_SEPARATOR}{name}", self.base_path))
    }

    fn not_registered(&self, name: &str) -> ComponentError {
        ComponentError::NotRegistered {
            name: name.to_string(),
            category: self.category.clone(),
            registered: self.names(),
        }
    }

    /// Registers `component` under `name`, replacing any component previously registered
    /// under the same name.
    pub fn add(&self, name: &str, component: Arc<T>) -> Result<(), ComponentError> {
        let path = self.component_path(name)?;
        let entry = ComponentEntry(component);
        match self.registry.add_value_item(&path, entry.clone()) {
            Ok(_) => Ok(()),
            Err(RegistryError::Conflict { .. }) => {
                warn!("Replacing component \"{name}\" of category \"{}\"", self.category);
                self.registry.set_value(&path, entry)?;
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.component_path(name)
            .map(|path| self.registry.has_value(&path))
            .unwrap_or(false)
    }

    pub fn get(&self, name: &str) -> Result<Arc<T>, ComponentError> {
        match self.registry.get_value::<ComponentEntry<T>>(&self.component_path(name)?) {
            Ok(ComponentEntry(component)) => Ok(component),
            Err(RegistryError::NotFound { .. }) => Err(self.not_registered(name)),
            Err(err) => Err(err.into()),
        }
    }

    pub fn remove(&self, name: &str) -> Result<(), ComponentError> {
        match self.registry.remove_item(&self.component_path(name)?) {
            Ok(_) => Ok(()),
            Err(RegistryError::NotFound { .. }) => Err(self.not_registered(name)),
            Err(err) => Err(err.into()),
        }
    }

    /// Names of all registered components, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.registry
            .get_item(&self.base_path)
            .map(|item| item.item_names())
            .unwrap_or_default()
    }
}
