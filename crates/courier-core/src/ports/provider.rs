//! HandlerProvider port - handler construction is somebody else's job.

use crate::error::BoxError;
use crate::typed::{HandlerInstance, TypeKey};

/// Produces handler instances on demand.
///
/// Called once per dispatch. Whether the instance is fresh or shared is the
/// provider's decision; the dispatcher drops its reference when the call ends.
///
/// Plain closures are providers too:
/// ```ignore
/// let provider = |handler: TypeKey| -> Result<HandlerInstance, BoxError> {
///     if handler == TypeKey::of::<PingHandler>() {
///         Ok(Arc::new(PingHandler))
///     } else {
///         Err(ProviderError::NotRegistered { handler }.into())
///     }
/// };
/// ```
pub trait HandlerProvider: Send + Sync {
    fn get_instance(&self, handler: TypeKey) -> Result<HandlerInstance, BoxError>;
}

impl<F> HandlerProvider for F
where
    F: Fn(TypeKey) -> Result<HandlerInstance, BoxError> + Send + Sync,
{
    fn get_instance(&self, handler: TypeKey) -> Result<HandlerInstance, BoxError> {
        self(handler)
    }
}

/// Failures of the built-in provider, and of instance type checks.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("handler {handler} is not registered with the provider")]
    NotRegistered { handler: TypeKey },

    #[error("factory for handler {handler} failed")]
    Factory {
        handler: TypeKey,
        #[source]
        source: BoxError,
    },

    #[error("provider returned an instance that is not a {handler}")]
    WrongInstanceType { handler: TypeKey },
}
