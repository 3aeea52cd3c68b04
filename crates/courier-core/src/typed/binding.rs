//! TypeKey and HandlerBinding - the routing table's entries.
//!
//! A binding is an "interface table" row: the three type identities plus a
//! monomorphized invoker that knows how to turn an erased handler instance and
//! an erased request back into the concrete `Handler<R>` call.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

use futures::future::BoxFuture;
use serde::{Serialize, Serializer};

use super::handler::{Handler, HandlerInstance, invoke};
use super::request::Request;
use crate::cancel::CancellationSignal;
use crate::error::DispatchError;

/// Runtime identity of a Rust type.
///
/// Equality and hashing use the [`TypeId`] only; the name is kept for
/// error messages and diagnostics.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Serialize for TypeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

/// Erased call into one `Handler<R>` implementation.
pub(crate) type InvokeFn = fn(
    HandlerInstance,
    Box<dyn Any + Send>,
    CancellationSignal,
) -> BoxFuture<'static, Result<Box<dyn Any + Send>, DispatchError>>;

/// `(request, response, handler)` plus the call shim for that triple.
///
/// The only public constructor is [`HandlerBinding::of`], so the response type
/// always comes from `R::Response` and the invoker always matches the handler.
#[derive(Clone, Copy)]
pub struct HandlerBinding {
    request: TypeKey,
    response: TypeKey,
    handler: TypeKey,
    invoke: InvokeFn,
}

impl HandlerBinding {
    /// Binding for handler `H` serving request `R`.
    pub fn of<R, H>() -> Self
    where
        R: Request,
        H: Handler<R>,
    {
        Self {
            request: TypeKey::of::<R>(),
            response: TypeKey::of::<R::Response>(),
            handler: TypeKey::of::<H>(),
            invoke: invoke::<R, H>,
        }
    }

    pub fn request(&self) -> TypeKey {
        self.request
    }

    pub fn response(&self) -> TypeKey {
        self.response
    }

    pub fn handler(&self) -> TypeKey {
        self.handler
    }

    pub(crate) fn call(
        &self,
        instance: HandlerInstance,
        request: Box<dyn Any + Send>,
        cancel: CancellationSignal,
    ) -> BoxFuture<'static, Result<Box<dyn Any + Send>, DispatchError>> {
        (self.invoke)(instance, request, cancel)
    }

    /// Rebinds the declared response. Lets tests build the inconsistent
    /// bindings `of` refuses to produce.
    #[cfg(test)]
    pub(crate) fn with_response<S: 'static>(mut self) -> Self {
        self.response = TypeKey::of::<S>();
        self
    }
}

impl fmt::Debug for HandlerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerBinding")
            .field("request", &self.request)
            .field("response", &self.response)
            .field("handler", &self.handler)
            .finish()
    }
}

/// Serializable description of one binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingInfo {
    pub request: TypeKey,
    pub response: TypeKey,
    pub handler: TypeKey,
}

impl From<&HandlerBinding> for BindingInfo {
    fn from(binding: &HandlerBinding) -> Self {
        Self {
            request: binding.request,
            response: binding.response,
            handler: binding.handler,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typed::handler::fixtures::{EchoHandler, PingHandler};
    use crate::typed::request::fixtures::{Echo, Ping, Pong};

    #[test]
    fn type_key_compares_by_type_id() {
        assert_eq!(TypeKey::of::<Ping>(), TypeKey::of::<Ping>());
        assert_ne!(TypeKey::of::<Ping>(), TypeKey::of::<Pong>());
        assert!(TypeKey::of::<Ping>().name().ends_with("Ping"));
    }

    #[test]
    fn binding_takes_response_from_the_request() {
        let binding = HandlerBinding::of::<Ping, PingHandler>();

        assert_eq!(binding.request(), TypeKey::of::<Ping>());
        assert_eq!(binding.response(), TypeKey::of::<Pong>());
        assert_eq!(binding.handler(), TypeKey::of::<PingHandler>());
    }

    #[test]
    fn binding_info_serializes_type_names() {
        let info = BindingInfo::from(&HandlerBinding::of::<Echo, EchoHandler>());
        let json = serde_json::to_value(&info).unwrap();

        assert!(json["response"].as_str().unwrap().ends_with("String"));
        assert!(json["request"].as_str().unwrap().ends_with("Echo"));
        assert!(json["handler"].as_str().unwrap().ends_with("EchoHandler"));
    }
}
