use thiserror::Error;

use crate::typed::TypeKey;

/// Type-erased error used at the provider and handler seams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while building a [`HandlerRegistry`](crate::typed::HandlerRegistry).
///
/// All of these are configuration mistakes found at startup.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("request type {request} is claimed by more than one handler: {}", join(.handlers))]
    DuplicateHandler {
        request: TypeKey,
        /// Every competing handler, sorted by type name.
        handlers: Vec<TypeKey>,
    },

    #[error("request type {request} declares response {expected} but a binding declares {declared}")]
    TypeMismatch {
        request: TypeKey,
        expected: TypeKey,
        declared: TypeKey,
    },

    #[error("no handler registered for expected request types: {}", join(.0))]
    MissingHandlers(Vec<TypeKey>),
}

/// Errors returned from [`Dispatcher::dispatch`](crate::app::Dispatcher::dispatch).
///
/// Each variant names a different stage, so callers can tell "nobody is
/// registered" apart from "the handler could not be built" and from "the
/// handler itself failed".
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no handler registered for request type {request}")]
    NoHandler { request: TypeKey },

    #[error("request type {request} expects response {expected} but its handler is bound to {bound}")]
    TypeMismatch {
        request: TypeKey,
        expected: TypeKey,
        bound: TypeKey,
    },

    #[error("failed to construct handler {handler}")]
    HandlerConstruction {
        handler: TypeKey,
        #[source]
        source: BoxError,
    },

    /// The handler's own failure, untouched.
    #[error(transparent)]
    HandlerExecution(BoxError),
}

impl DispatchError {
    /// Borrow the handler's failure as its concrete type.
    ///
    /// Returns `None` for every other variant, or if the handler failed with a
    /// different error type.
    pub fn handler_error<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            DispatchError::HandlerExecution(err) => err.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Take the handler's failure back out, if this is one.
    pub fn into_handler_error(self) -> Result<BoxError, Self> {
        match self {
            DispatchError::HandlerExecution(err) => Ok(err),
            other => Err(other),
        }
    }
}

fn join(keys: &[TypeKey]) -> String {
    keys.iter()
        .map(TypeKey::name)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[derive(Debug, Error, PartialEq)]
    #[error("boom: {0}")]
    struct Boom(u32);

    struct HandlerA;
    struct HandlerB;
    struct Foo;

    #[test]
    fn duplicate_message_names_every_handler() {
        let err = RegistrationError::DuplicateHandler {
            request: TypeKey::of::<Foo>(),
            handlers: vec![TypeKey::of::<HandlerA>(), TypeKey::of::<HandlerB>()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Foo"));
        assert!(msg.contains("HandlerA"));
        assert!(msg.contains("HandlerB"));
    }

    #[test]
    fn execution_error_is_transparent() {
        let err = DispatchError::HandlerExecution(Box::new(Boom(7)));

        assert_eq!(err.to_string(), "boom: 7");
        assert_eq!(err.handler_error::<Boom>(), Some(&Boom(7)));
        assert!(err.handler_error::<std::fmt::Error>().is_none());
    }

    #[test]
    fn construction_error_keeps_its_source() {
        let err = DispatchError::HandlerConstruction {
            handler: TypeKey::of::<HandlerA>(),
            source: Box::new(Boom(1)),
        };

        let source = err.source().expect("source is chained");
        assert_eq!(source.to_string(), "boom: 1");
        assert!(err.handler_error::<Boom>().is_none());
    }

    #[test]
    fn into_handler_error_only_unwraps_execution_failures() {
        let err = DispatchError::HandlerExecution(Box::new(Boom(3)));
        let inner = err.into_handler_error().unwrap();
        assert_eq!(inner.downcast_ref::<Boom>(), Some(&Boom(3)));

        let err = DispatchError::NoHandler {
            request: TypeKey::of::<Foo>(),
        };
        assert!(matches!(
            err.into_handler_error(),
            Err(DispatchError::NoHandler { .. })
        ));
    }
}
