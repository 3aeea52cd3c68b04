//! App - wiring the registry and a provider into something callers use.
//!
//! - **MediatorBuilder**: composition root, fail-fast validation
//! - **Dispatcher**: the per-request entry point

pub mod builder;
pub mod dispatcher;

pub use self::builder::MediatorBuilder;
pub use self::dispatcher::Dispatcher;
