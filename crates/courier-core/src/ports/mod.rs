//! Ports - capabilities the dispatcher consumes but does not own.
//!
//! - **HandlerProvider**: turns a handler type into a ready-to-call instance
//!
//! Binding discovery needs no trait here: any `IntoIterator<Item = HandlerBinding>`
//! is a discovery source (see `typed::discovery` for the link-time one).

pub mod provider;

pub use self::provider::{HandlerProvider, ProviderError};
