//! Typed - request/handler API
//!
//! # Two layers
//! - **Typed surface**: `Request` trait, `Handler<R>` trait, checked at compile time
//! - **Erased core**: `HandlerBinding` rows keyed by `TypeKey`, checked once at build time

pub mod binding;
pub mod discovery;
pub mod handler;
pub mod registry;
pub mod request;

pub use self::binding::{BindingInfo, HandlerBinding, TypeKey};
pub use self::discovery::{HANDLER_BINDINGS, discovered_bindings};
pub use self::handler::{Handler, HandlerInstance};
pub use self::registry::HandlerRegistry;
pub use self::request::Request;
