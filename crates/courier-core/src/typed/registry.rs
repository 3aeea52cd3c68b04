//! HandlerRegistry - request type to handler binding.
//!
//! Built once from a sequence of candidate bindings, read-only afterwards.
//! Lookups take `&self` and never lock.

use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::binding::{BindingInfo, HandlerBinding, TypeKey};
use super::request::Request;
use crate::error::{DispatchError, RegistrationError};

/// Immutable routing table.
///
/// # Example
/// ```ignore
/// let registry = HandlerRegistry::build([
///     HandlerBinding::of::<Ping, PingHandler>(),
///     HandlerBinding::of::<Echo, EchoHandler>(),
/// ])?;
///
/// let binding = registry.resolve_for::<Ping>()?;
/// ```
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    bindings: HashMap<TypeKey, HandlerBinding>,
}

impl HandlerRegistry {
    /// Empty registry. Every resolve fails with `NoHandler`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reduce candidate bindings to one binding per request type.
    ///
    /// Candidate order never changes the outcome: ambiguities are reported for
    /// the request type with the smallest name, listing its handlers sorted by
    /// name. A binding repeated verbatim is accepted once.
    pub fn build<I>(candidates: I) -> Result<Self, RegistrationError>
    where
        I: IntoIterator<Item = HandlerBinding>,
    {
        let mut grouped: HashMap<TypeKey, Vec<HandlerBinding>> = HashMap::new();
        let mut seen = 0usize;
        for candidate in candidates {
            seen += 1;
            let group = grouped.entry(candidate.request()).or_default();
            if !group.iter().any(|b| b.handler() == candidate.handler()) {
                group.push(candidate);
                continue;
            }
            if let Some(existing) = group
                .iter()
                .find(|b| b.handler() == candidate.handler() && b.response() != candidate.response())
            {
                return Err(RegistrationError::TypeMismatch {
                    request: candidate.request(),
                    expected: existing.response(),
                    declared: candidate.response(),
                });
            }
        }

        // Sorted by name so the reported conflict does not depend on hash order.
        let ordered: BTreeMap<(&'static str, TypeId), Vec<HandlerBinding>> = grouped
            .into_values()
            .filter_map(|group| {
                let request = group.first()?.request();
                Some(((request.name(), request.id()), group))
            })
            .collect();

        let mut bindings = HashMap::with_capacity(ordered.len());
        for (_, group) in ordered {
            match group.as_slice() {
                [binding] => {
                    bindings.insert(binding.request(), *binding);
                }
                [first, ..] => {
                    let mut handlers: Vec<TypeKey> = group.iter().map(|b| b.handler()).collect();
                    handlers.sort_by_key(|h| h.name());
                    return Err(RegistrationError::DuplicateHandler {
                        request: first.request(),
                        handlers,
                    });
                }
                [] => {}
            }
        }

        debug!(candidates = seen, bindings = bindings.len(), "handler registry built");
        Ok(Self { bindings })
    }

    /// Binding for `request`, checked against the response the caller expects.
    pub fn resolve(
        &self,
        request: TypeKey,
        expected_response: TypeKey,
    ) -> Result<&HandlerBinding, DispatchError> {
        let binding = self
            .bindings
            .get(&request)
            .ok_or(DispatchError::NoHandler { request })?;

        if binding.response() != expected_response {
            return Err(DispatchError::TypeMismatch {
                request,
                expected: expected_response,
                bound: binding.response(),
            });
        }
        Ok(binding)
    }

    pub fn resolve_for<R: Request>(&self) -> Result<&HandlerBinding, DispatchError> {
        self.resolve(TypeKey::of::<R>(), TypeKey::of::<R::Response>())
    }

    pub fn get(&self, request: TypeKey) -> Option<&HandlerBinding> {
        self.bindings.get(&request)
    }

    pub fn contains<R: Request>(&self) -> bool {
        self.bindings.contains_key(&TypeKey::of::<R>())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Snapshot of every binding, sorted by request type name.
    pub fn describe(&self) -> Vec<BindingInfo> {
        let mut infos: Vec<BindingInfo> = self.bindings.values().map(BindingInfo::from).collect();
        infos.sort_by_key(|info| info.request.name());
        infos
    }
}
