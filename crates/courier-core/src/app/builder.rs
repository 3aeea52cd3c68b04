//! MediatorBuilder - composition root for the dispatcher.
//!
//! Everything that can be wrong with the routing table is reported by
//! `build`, before the first request is dispatched.

use std::sync::Arc;

use super::dispatcher::Dispatcher;
use crate::error::RegistrationError;
use crate::ports::HandlerProvider;
use crate::typed::{Handler, HandlerBinding, HandlerRegistry, Request, TypeKey, discovered_bindings};

/// Collects candidate bindings and expectations, then builds.
///
/// # Example
/// ```ignore
/// let dispatcher = MediatorBuilder::new()
///     .discover()
///     .bind::<Ping, PingHandler>()
///     .expect::<Ping>()
///     .build(provider)?;
/// ```
///
/// # Fail-fast
/// - two handlers for one request type → `DuplicateHandler`
/// - a request type passed to `expect` with no binding → `MissingHandlers`
#[derive(Debug, Default)]
pub struct MediatorBuilder {
    candidates: Vec<HandlerBinding>,
    expected: Vec<TypeKey>,
}

impl MediatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `H` as the handler for `R`.
    pub fn bind<R, H>(mut self) -> Self
    where
        R: Request,
        H: Handler<R>,
    {
        self.candidates.push(HandlerBinding::of::<R, H>());
        self
    }

    /// Add candidates from any discovery source.
    pub fn bindings<I>(mut self, bindings: I) -> Self
    where
        I: IntoIterator<Item = HandlerBinding>,
    {
        self.candidates.extend(bindings);
        self
    }

    /// Add every binding registered with `register_handler!`.
    pub fn discover(self) -> Self {
        self.bindings(discovered_bindings())
    }

    /// Require `R` to have a handler once built.
    pub fn expect<R: Request>(mut self) -> Self {
        self.expected.push(TypeKey::of::<R>());
        self
    }

    pub fn build_registry(self) -> Result<HandlerRegistry, RegistrationError> {
        let registry = HandlerRegistry::build(self.candidates)?;

        let mut missing: Vec<TypeKey> = self
            .expected
            .into_iter()
            .filter(|request| registry.get(*request).is_none())
            .collect();
        if !missing.is_empty() {
            missing.sort_by_key(|request| request.name());
            missing.dedup();
            return Err(RegistrationError::MissingHandlers(missing));
        }
        Ok(registry)
    }

    pub fn build<P>(self, provider: P) -> Result<Dispatcher, RegistrationError>
    where
        P: HandlerProvider + 'static,
    {
        self.build_shared(Arc::new(provider))
    }

    /// Like [`build`](Self::build) for a provider that is already shared.
    pub fn build_shared(
        self,
        provider: Arc<dyn HandlerProvider>,
    ) -> Result<Dispatcher, RegistrationError> {
        let registry = self.build_registry()?;
        Ok(Dispatcher::new(Arc::new(registry), provider))
    }
}
