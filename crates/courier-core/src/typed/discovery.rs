//! Link-time binding discovery.
//!
//! Every `register_handler!` invocation in any crate linked into the final
//! binary contributes one constructor to [`HANDLER_BINDINGS`]. The registry
//! reads them through [`discovered_bindings`], so adding a handler never
//! requires editing the composition root.

use linkme::distributed_slice;

use super::binding::HandlerBinding;

/// Constructors for all link-time registered bindings.
///
/// `TypeId::of` is not const, so entries are functions rather than values.
#[distributed_slice]
pub static HANDLER_BINDINGS: [fn() -> HandlerBinding];

/// Lazy, finite sequence of discovered bindings. Order is unspecified.
pub fn discovered_bindings() -> impl Iterator<Item = HandlerBinding> {
    HANDLER_BINDINGS.iter().map(|make| make())
}

/// Registers `$handler` as the handler for `$request` at link time.
///
/// ```ignore
/// courier_core::register_handler!(Ping => PingHandler);
/// ```
#[macro_export]
macro_rules! register_handler {
    ($request:ty => $handler:ty) => {
        const _: () = {
            #[$crate::linkme::distributed_slice($crate::typed::discovery::HANDLER_BINDINGS)]
            #[linkme(crate = $crate::linkme)]
            static BINDING: fn() -> $crate::typed::HandlerBinding =
                $crate::typed::HandlerBinding::of::<$request, $handler>;
        };
    };
}
