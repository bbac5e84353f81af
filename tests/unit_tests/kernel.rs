use eyre::eyre;
use mpfem::components::Components;
use mpfem::kernel::{Application, Kernel};
use mpfem::registry::{Registry, RegistryError};
use std::sync::Arc;

trait Element: Send + Sync {
    fn num_nodes(&self) -> usize;
}

struct Truss;

impl Element for Truss {
    fn num_nodes(&self) -> usize {
        2
    }
}

struct StructuralApplication;

impl Application for StructuralApplication {
    fn name(&self) -> &str {
        "StructuralMechanicsApplication"
    }

    fn register(&self, registry: &Registry) -> eyre::Result<()> {
        Components::<dyn Element>::in_registry(registry, "elements").add("TrussElement3D2N", Arc::new(Truss))?;
        registry.add_value_item("applications.StructuralMechanicsApplication.version", "9.4")?;
        Ok(())
    }
}

struct FailingApplication;

impl Application for FailingApplication {
    fn name(&self) -> &str {
        "FailingApplication"
    }

    fn register(&self, _registry: &Registry) -> eyre::Result<()> {
        Err(eyre!("missing dependency"))
    }
}

#[test]
fn import_registers_components() {
    let registry = Registry::new();
    let kernel = Kernel::with_registry(&registry);
    assert!(!kernel.is_imported("StructuralMechanicsApplication"));

    kernel.import_application(&StructuralApplication).unwrap();
    assert!(kernel.is_imported("StructuralMechanicsApplication"));
    assert_eq!(kernel.imported_applications(), vec!["StructuralMechanicsApplication"]);

    let elements = Components::<dyn Element>::in_registry(kernel.registry(), "elements");
    assert_eq!(elements.get("TrussElement3D2N").unwrap().num_nodes(), 2);
    assert_eq!(
        registry.get_value::<&str>("applications.StructuralMechanicsApplication.version").unwrap(),
        "9.4"
    );
}

#[test]
fn applications_are_imported_once() {
    let registry = Registry::new();
    let kernel = Kernel::with_registry(&registry);
    kernel.import_application(&StructuralApplication).unwrap();

    let err = kernel.import_application(&StructuralApplication).unwrap_err();
    let registry_err = err.downcast_ref::<RegistryError>().unwrap();
    assert!(registry_err.is_conflict());
    assert_eq!(kernel.imported_applications().len(), 1);
}

#[test]
fn failed_registration_is_not_recorded() {
    let registry = Registry::new();
    let kernel = Kernel::with_registry(&registry);

    let err = kernel.import_application(&FailingApplication).unwrap_err();
    assert_eq!(err.to_string(), "Failed to register application \"FailingApplication\"");
    assert_eq!(err.root_cause().to_string(), "missing dependency");
    assert!(!kernel.is_imported("FailingApplication"));
}

struct SelfRemovingApplication;

impl Application for SelfRemovingApplication {
    fn name(&self) -> &str {
        "SelfRemovingApplication"
    }

    fn register(&self, registry: &Registry) -> eyre::Result<()> {
        registry.remove_item("applications.SelfRemovingApplication")?;
        Err(eyre!("registration aborted"))
    }
}

#[test]
fn registration_error_survives_failed_cleanup() {
    let registry = Registry::new();
    let kernel = Kernel::with_registry(&registry);

    let err = kernel.import_application(&SelfRemovingApplication).unwrap_err();
    assert_eq!(err.to_string(), "Failed to register application \"SelfRemovingApplication\"");
    assert_eq!(err.root_cause().to_string(), "registration aborted");
    assert!(!kernel.is_imported("SelfRemovingApplication"));
}
