use std::sync::Arc;

use tracing::trace;

use crate::cancel::CancellationSignal;
use crate::error::DispatchError;
use crate::ports::HandlerProvider;
use crate::typed::{HandlerRegistry, Request, TypeKey};

/// Dispatcher routes a request to its one bound handler.
///
/// Stateless between calls: the registry is read-only and handler instances
/// come from the provider for each call. Cheap to clone and safe to share
/// across tasks.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
    provider: Arc<dyn HandlerProvider>,
}

impl Dispatcher {
    pub fn new(registry: Arc<HandlerRegistry>, provider: Arc<dyn HandlerProvider>) -> Self {
        Self { registry, provider }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Dispatch one request.
    ///
    /// `cancel` is handed to the handler as-is. The dispatcher never acts on
    /// it, imposes no timeout and does not retry.
    pub async fn dispatch<R: Request>(
        &self,
        request: R,
        cancel: &CancellationSignal,
    ) -> Result<R::Response, DispatchError> {
        let request_type = TypeKey::of::<R>();
        let expected = TypeKey::of::<R::Response>();
        let binding = self.registry.resolve(request_type, expected)?;
        let handler = binding.handler();

        trace!(request = %request_type, %handler, "dispatching");

        let instance = self
            .provider
            .get_instance(handler)
            .map_err(|source| DispatchError::HandlerConstruction { handler, source })?;

        let response = binding
            .call(instance, Box::new(request), cancel.clone())
            .await?;

        response
            .downcast::<R::Response>()
            .map(|response| *response)
            .map_err(|_| DispatchError::TypeMismatch {
                request: request_type,
                expected,
                bound: binding.response(),
            })
    }

    /// [`dispatch`](Self::dispatch) without a cancellation source.
    pub async fn send<R: Request>(&self, request: R) -> Result<R::Response, DispatchError> {
        self.dispatch(request, &CancellationSignal::never()).await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
