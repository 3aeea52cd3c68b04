//! ServiceProvider - a small handler container keyed by handler type.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::BoxError;
use crate::ports::{HandlerProvider, ProviderError};
use crate::typed::{HandlerInstance, TypeKey};

type Factory = Box<dyn Fn() -> Result<HandlerInstance, BoxError> + Send + Sync>;

enum Registration {
    /// One instance shared by every dispatch.
    Singleton(HandlerInstance),
    /// A fresh instance per dispatch.
    Scoped(Factory),
}

/// Collects handler registrations, then freezes into a [`ServiceProvider`].
///
/// # Example
/// ```ignore
/// let provider = ServiceCollection::new()
///     .add_singleton(PingHandler)
///     .add_scoped(|| Ok::<_, BoxError>(EchoHandler::connect()?))
///     .build();
/// ```
///
/// Registering the same handler type twice keeps the later registration.
#[derive(Default)]
pub struct ServiceCollection {
    registrations: HashMap<TypeKey, Registration>,
}

impl ServiceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_singleton<H>(self, handler: H) -> Self
    where
        H: Send + Sync + 'static,
    {
        self.insert(TypeKey::of::<H>(), Registration::Singleton(Arc::new(handler)))
    }

    /// `factory` runs once for every dispatch that needs `H`.
    pub fn add_scoped<H, F, E>(self, factory: F) -> Self
    where
        H: Send + Sync + 'static,
        F: Fn() -> Result<H, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        let factory: Factory = Box::new(move || -> Result<HandlerInstance, BoxError> {
            factory()
                .map(|handler| Arc::new(handler) as HandlerInstance)
                .map_err(Into::into)
        });
        self.insert(TypeKey::of::<H>(), Registration::Scoped(factory))
    }

    /// Per-dispatch instances built with `H::default()`.
    pub fn add_scoped_default<H>(self) -> Self
    where
        H: Default + Send + Sync + 'static,
    {
        self.add_scoped(|| Ok::<_, BoxError>(H::default()))
    }

    pub fn build(self) -> ServiceProvider {
        debug!(handlers = self.registrations.len(), "service provider built");
        ServiceProvider {
            registrations: self.registrations,
        }
    }

    fn insert(mut self, handler: TypeKey, registration: Registration) -> Self {
        if self.registrations.insert(handler, registration).is_some() {
            debug!(%handler, "replaced handler registration");
        }
        self
    }
}

/// Frozen handler container.
pub struct ServiceProvider {
    registrations: HashMap<TypeKey, Registration>,
}

impl ServiceProvider {
    pub fn contains(&self, handler: TypeKey) -> bool {
        self.registrations.contains_key(&handler)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl HandlerProvider for ServiceProvider {
    fn get_instance(&self, handler: TypeKey) -> Result<HandlerInstance, BoxError> {
        match self.registrations.get(&handler) {
            Some(Registration::Singleton(instance)) => Ok(Arc::clone(instance)),
            Some(Registration::Scoped(factory)) => {
                factory().map_err(|source| ProviderError::Factory { handler, source }.into())
            }
            None => Err(ProviderError::NotRegistered { handler }.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Debug, Default)]
    struct Counter {
        id: usize,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("database unavailable")]
    struct Unavailable;

    #[test]
    fn singleton_is_shared() {
        let provider = ServiceCollection::new().add_singleton(Counter { id: 7 }).build();

        let a = provider.get_instance(TypeKey::of::<Counter>()).unwrap();
        let b = provider.get_instance(TypeKey::of::<Counter>()).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.downcast::<Counter>().unwrap().id, 7);
    }

    #[test]
    fn scoped_builds_a_new_instance_each_time() {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&built);
        let provider = ServiceCollection::new()
            .add_scoped(move || {
                let id = counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, BoxError>(Counter { id })
            })
            .build();

        let a = provider.get_instance(TypeKey::of::<Counter>()).unwrap();
        let b = provider.get_instance(TypeKey::of::<Counter>()).unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(built.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unknown_handler_is_not_registered() {
        let provider = ServiceCollection::new().build();

        let err = provider.get_instance(TypeKey::of::<Counter>()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ProviderError>(),
            Some(ProviderError::NotRegistered { handler }) if *handler == TypeKey::of::<Counter>()
        ));
    }

    #[test]
    fn factory_failure_is_chained() {
        let provider = ServiceCollection::new()
            .add_scoped(|| Err::<Counter, _>(Unavailable))
            .build();

        let err = provider.get_instance(TypeKey::of::<Counter>()).unwrap_err();
        let provider_err = err.downcast_ref::<ProviderError>().unwrap();
        assert!(matches!(provider_err, ProviderError::Factory { .. }));

        let source = std::error::Error::source(provider_err).unwrap();
        assert!(source.downcast_ref::<Unavailable>().is_some());
    }

    #[test]
    fn later_registration_wins() {
        let provider = ServiceCollection::new()
            .add_singleton(Counter { id: 1 })
            .add_singleton(Counter { id: 2 })
            .build();

        assert_eq!(provider.len(), 1);
        let instance = provider.get_instance(TypeKey::of::<Counter>()).unwrap();
        assert_eq!(instance.downcast::<Counter>().unwrap().id, 2);
    }

    #[test]
    fn default_factory() {
        let provider = ServiceCollection::new().add_scoped_default::<Counter>().build();

        assert!(provider.contains(TypeKey::of::<Counter>()));
        let instance = provider.get_instance(TypeKey::of::<Counter>()).unwrap();
        assert_eq!(instance.downcast::<Counter>().unwrap().id, 0);
    }
}
