//! Impls - ready-made port implementations.
//!
//! - **ServiceProvider**: in-process handler container with singleton and per-dispatch lifetimes

pub mod service_provider;

pub use self::service_provider::{ServiceCollection, ServiceProvider};
