//! Per-instance service locator.
//!
//! Maps a service name to one shared singleton (localization, renderer
//! factory, formatters). Each widget instance owns its own locator; there
//! is no process-wide registry, so multiple widget instances on one screen
//! never leak services into each other.
//!
//! Services are registered once at widget construction and read many times
//! afterwards. The map is only mutated again during teardown.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{CoreError, Result};
use crate::logging::targets;

/// Name-keyed registry of shared singletons for one widget instance.
#[derive(Default)]
pub struct ServiceLocator {
    services: RwLock<HashMap<String, Arc<dyn Any + Send + Sync>>>,
}

impl ServiceLocator {
    /// Create an empty locator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `service` under `name`.
    ///
    /// Fails with [`CoreError::DuplicateService`] if the name is already
    /// bound for this instance; a double-register is a construction-order
    /// bug, never silently tolerated.
    pub fn register<T: Any + Send + Sync>(&self, name: &str, service: Arc<T>) -> Result<()> {
        let mut services = self.services.write();
        if services.contains_key(name) {
            return Err(CoreError::duplicate_service(name));
        }
        tracing::trace!(target: targets::LOCATOR, name, "service registered");
        services.insert(name.to_owned(), service);
        Ok(())
    }

    /// Look up the service bound under `name`.
    ///
    /// Fails with [`CoreError::ServiceNotFound`] if unbound and with
    /// [`CoreError::ServiceTypeMismatch`] if the bound instance is not a
    /// `T`. A miss is fatal to the caller, never defaulted.
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
        let services = self.services.read();
        let service = services
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::service_not_found(name))?;
        service
            .downcast::<T>()
            .map_err(|_| CoreError::service_type_mismatch(name))
    }

    /// Whether a service is bound under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.services.read().contains_key(name)
    }

    /// Drop every binding. Teardown only.
    pub fn clear(&self) {
        self.services.write().clear();
    }
}

static_assertions::assert_impl_all!(ServiceLocator: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    struct Localization;
    struct Formatter;

    #[test]
    fn test_register_and_get() {
        let locator = ServiceLocator::new();
        locator
            .register("localization", Arc::new(Localization))
            .unwrap();

        let service = locator.get::<Localization>("localization").unwrap();
        let again = locator.get::<Localization>("localization").unwrap();
        assert!(Arc::ptr_eq(&service, &again));
    }

    #[test]
    fn test_duplicate_register_fails() {
        let locator = ServiceLocator::new();
        locator
            .register("localization", Arc::new(Localization))
            .unwrap();
        let err = locator
            .register("localization", Arc::new(Localization))
            .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateService { .. }));
    }

    #[test]
    fn test_missing_service_fails() {
        let locator = ServiceLocator::new();
        let err = locator.get::<Localization>("localization").err().unwrap();
        assert!(matches!(err, CoreError::ServiceNotFound { .. }));
    }

    #[test]
    fn test_type_mismatch_fails() {
        let locator = ServiceLocator::new();
        locator
            .register("localization", Arc::new(Localization))
            .unwrap();
        let err = locator.get::<Formatter>("localization").err().unwrap();
        assert!(matches!(err, CoreError::ServiceTypeMismatch { .. }));
    }

    #[test]
    fn test_clear_unbinds_everything() {
        let locator = ServiceLocator::new();
        locator
            .register("localization", Arc::new(Localization))
            .unwrap();
        locator.clear();
        assert!(!locator.contains("localization"));
    }
}
