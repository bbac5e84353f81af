use crate::registry::path::PATH_SEPARATOR;
use crate::registry::Registry;
use eyre::WrapErr;
use log::{info, warn};

/// Registry path below which imported applications are recorded.
pub const APPLICATIONS_PATH: &str = "applications";

/// A collection of components (elements, conditions, materials, ...) that is made available
/// to the framework by importing it into a [`Kernel`].
pub trait Application: Send + Sync {
    fn name(&self) -> &str;

    /// Registers the application's components and settings.
    fn register(&self, registry: &Registry) -> eyre::Result<()>;
}

/// Entry point that imports applications into a registry.
#[derive(Debug, Copy, Clone)]
pub struct Kernel<'r> {
    registry: &'r Registry,
}

impl Default for Kernel<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel<'static> {
    /// A kernel operating on the global registry.
    pub fn new() -> Self {
        Self::with_registry(Registry::global())
    }
}

impl<'r> Kernel<'r> {
    pub fn with_registry(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    fn application_path(name: &str) -> String {
        format!("{APPLICATIONS_PATH}{PATH_SEPARATOR}{name}")
    }

    /// Imports an application.
    ///
    /// Each application can only be imported once. If registration fails, the application is
    /// not recorded as imported; components it registered before failing are kept.
    pub fn import_application(&self, application: &dyn Application) -> eyre::Result<()> {
        let name = application.name();
        let path = Self::application_path(name);
        self.registry
            .add_item(&path)
            .wrap_err_with(|| format!("Failed to import application \"{name}\""))?;

        if let Err(err) = application.register(self.registry) {
            if let Err(cleanup_err) = self.registry.remove_item(&path) {
                warn!("Failed to remove record of application \"{name}\": {cleanup_err}");
            }
            return Err(err.wrap_err(format!("Failed to register application \"{name}\"")));
        }

        info!("Imported application \"{name}\"");
        Ok(())
    }

    pub fn is_imported(&self, name: &str) -> bool {
        self.registry.has_item(&Self::application_path(name))
    }

    /// Names of the imported applications, in import order.
    pub fn imported_applications(&self) -> Vec<String> {
        self.registry
            .get_item(APPLICATIONS_PATH)
            .map(|item| item.item_names())
            .unwrap_or_default()
    }
}
