//! Handler trait - produces the response for exactly one request type.
//!
//! - Generic trait (`Handler<R>`) implemented by user code
//! - Type erasure through the invoker stored in each `HandlerBinding`

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use super::binding::TypeKey;
use super::request::Request;
use crate::cancel::CancellationSignal;
use crate::error::{BoxError, DispatchError};
use crate::ports::ProviderError;

/// An erased handler instance as handed out by a
/// [`HandlerProvider`](crate::ports::HandlerProvider).
pub type HandlerInstance = Arc<dyn Any + Send + Sync>;

/// Handler consumes a request and produces its response.
///
/// # Example
/// ```ignore
/// struct PingHandler;
///
/// #[async_trait]
/// impl Handler<Ping> for PingHandler {
///     type Error = std::convert::Infallible;
///
///     async fn handle(&self, ping: Ping, _cancel: CancellationSignal) -> Result<Pong, Self::Error> {
///         Ok(Pong { seq: ping.seq })
///     }
/// }
/// ```
///
/// One type may implement `Handler` for several request types; each
/// implementation becomes its own binding.
#[async_trait]
pub trait Handler<R: Request>: Send + Sync + 'static {
    type Error: Into<BoxError> + Send;

    async fn handle(&self, request: R, cancel: CancellationSignal)
    -> Result<R::Response, Self::Error>;
}

/// Monomorphized call shim stored in a [`HandlerBinding`](super::HandlerBinding).
pub(crate) fn invoke<R, H>(
    instance: HandlerInstance,
    request: Box<dyn Any + Send>,
    cancel: CancellationSignal,
) -> BoxFuture<'static, Result<Box<dyn Any + Send>, DispatchError>>
where
    R: Request,
    H: Handler<R>,
{
    Box::pin(async move {
        let handler = instance
            .downcast::<H>()
            .map_err(|_| DispatchError::HandlerConstruction {
                handler: TypeKey::of::<H>(),
                source: Box::new(ProviderError::WrongInstanceType {
                    handler: TypeKey::of::<H>(),
                }),
            })?;

        // The dispatcher boxes exactly the type it resolved, so this only
        // fails if a binding is called with a foreign request.
        let request = request
            .downcast::<R>()
            .map_err(|_| DispatchError::TypeMismatch {
                request: TypeKey::of::<R>(),
                expected: TypeKey::of::<R::Response>(),
                bound: TypeKey::of::<R::Response>(),
            })?;

        let response = handler
            .handle(*request, cancel)
            .await
            .map_err(|err| DispatchError::HandlerExecution(err.into()))?;

        Ok(Box::new(response) as Box<dyn Any + Send>)
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::convert::Infallible;

    use async_trait::async_trait;

    use super::Handler;
    use crate::cancel::CancellationSignal;
    use crate::typed::request::fixtures::{Echo, Ping, Pong};

    pub struct PingHandler;

    #[async_trait]
    impl Handler<Ping> for PingHandler {
        type Error = Infallible;

        async fn handle(&self, ping: Ping, _cancel: CancellationSignal) -> Result<Pong, Infallible> {
            Ok(Pong { seq: ping.seq })
        }
    }

    pub struct EchoHandler;

    #[async_trait]
    impl Handler<Echo> for EchoHandler {
        type Error = Infallible;

        async fn handle(&self, echo: Echo, _cancel: CancellationSignal) -> Result<String, Infallible> {
            Ok(echo.0)
        }
    }

    /// Competes with `PingHandler` for `Ping`.
    pub struct OtherPingHandler;

    #[async_trait]
    impl Handler<Ping> for OtherPingHandler {
        type Error = Infallible;

        async fn handle(&self, ping: Ping, _cancel: CancellationSignal) -> Result<Pong, Infallible> {
            Ok(Pong { seq: ping.seq + 1000 })
        }
    }
}
