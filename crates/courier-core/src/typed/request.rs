//! Request trait - a value paired with the response type it expects.

/// A request carries its response type in the type system.
///
/// # Example
/// ```ignore
/// struct Ping;
///
/// impl Request for Ping {
///     type Response = Pong;
/// }
/// ```
///
/// # Trait Bounds
/// - `Send`: the request is moved into the handler's future
/// - `'static`: it is type-erased to `Box<dyn Any + Send>` on the way through the dispatcher
pub trait Request: Send + 'static {
    type Response: Send + 'static;
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::Request;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Ping {
        pub seq: u32,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Pong {
        pub seq: u32,
    }

    impl Request for Ping {
        type Response = Pong;
    }

    #[derive(Debug, Clone)]
    pub struct Echo(pub String);

    impl Request for Echo {
        type Response = String;
    }

    /// Never bound anywhere.
    #[derive(Debug)]
    pub struct Orphan;

    impl Request for Orphan {
        type Response = ();
    }
}
