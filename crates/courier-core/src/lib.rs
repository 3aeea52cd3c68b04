//! courier-core
//!
//! In-process request/response dispatch: a caller hands over a typed request
//! and gets back the response produced by the one handler bound to it.
//!
//! # Modules
//! - **typed**: `Request` and `Handler<R>` traits, `HandlerBinding`, `HandlerRegistry`, link-time discovery
//! - **app**: `MediatorBuilder` (composition root) and `Dispatcher`
//! - **ports**: `HandlerProvider`, the handler construction capability
//! - **impls**: `ServiceProvider`, a built-in `HandlerProvider`
//! - **cancel**: `CancellationSignal`, forwarded to handlers untouched
//! - **error**: `RegistrationError` (startup) and `DispatchError` (per request)

pub mod app;
pub mod cancel;
pub mod error;
pub mod impls;
pub mod ports;
pub mod typed;

pub use self::app::{Dispatcher, MediatorBuilder};
pub use self::cancel::{CancellationSignal, Cancelled};
pub use self::error::{BoxError, DispatchError, RegistrationError};
pub use self::impls::{ServiceCollection, ServiceProvider};
pub use self::ports::{HandlerProvider, ProviderError};
pub use self::typed::{
    BindingInfo, Handler, HandlerBinding, HandlerInstance, HandlerRegistry, Request, TypeKey,
};

#[doc(hidden)]
pub use linkme;

// Handlers implement `Handler` with `#[async_trait]`.
pub use async_trait::async_trait;
