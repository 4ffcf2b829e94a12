use proc_macro::TokenStream;

mod controller;

/// Attribute macro declaring a controller's root-scope routing config.
///
/// Accepts repeatable `prefix = "..."` entries and `before = [...]` /
/// `after = [...]` middleware lists. Every list element must convert into a
/// `MiddlewareArg` (plain `&'static str` values work out of the box).
/// Declarations apply in source order, top to bottom.
///
/// Verbs cannot be declared here: they belong to methods, and attempting to
/// set them on the controller itself is a compile error.
///
/// # Example
/// ```ignore
/// use rudder::controller;
///
/// #[controller(prefix = "/todos", before = ["bodyParser"])]
/// pub struct TodoController;
/// ```
#[proc_macro_attribute]
pub fn controller(attr: TokenStream, item: TokenStream) -> TokenStream {
    controller::controller_attribute(attr, item)
}

/// Attribute macro declaring method routes in an impl block.
///
/// Recognized method attributes, applied in source order, top to bottom:
/// `#[route("/path")]` (repeatable), `#[before(middleware)]`,
/// `#[after(middleware)]`, `#[verbs(GET, POST, ...)]`, and the per-verb
/// shorthands `#[get]`, `#[post]`, `#[put]`, `#[patch]`, `#[delete]`,
/// `#[head]`, `#[options]`, `#[connect]`, `#[all]`: bare for the verb
/// alone, or with a path (`#[get("/{id}")]`) as shorthand for route + verb.
///
/// The type must also carry `#[controller]`. Besides building the routing
/// state, the expansion registers the declaring source file for discovery,
/// exposing the type as a named export.
///
/// # Example
/// ```ignore
/// use rudder::{controller, routes};
///
/// #[controller(prefix = "/todos")]
/// pub struct TodoController;
///
/// #[routes]
/// impl TodoController {
///     #[get("/")]
///     fn find(&self) {}
///
///     #[route("/{id}")]
///     #[verbs(GET, HEAD)]
///     fn get(&self) {}
/// }
/// ```
#[proc_macro_attribute]
pub fn routes(attr: TokenStream, item: TokenStream) -> TokenStream {
    controller::routes_attribute(attr, item)
}
