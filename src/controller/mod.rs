//! Controller targets and the fluent declaration builder.
//!
//! A target is the invocable an external router should construct or call: a
//! controller type (attribute-macro flavor) or an arbitrary runtime value
//! such as a factory function (builder flavor). The builder accumulates
//! routing state immutably; each chain call yields a new builder and only the
//! latest reference matters.

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::middleware::{Middleware, MiddlewareArg};
use crate::resolve::ExportValue;
use crate::state::{ConfigScope, RouterConfigState};
use crate::verb::HttpVerb;

/// Root-scope declarations of a controller type. Generated by
/// `#[controller]`.
pub trait ControllerRoot {
    fn root_state() -> RouterConfigState;
}

/// Full routing state of a controller type. Generated by `#[routes]`, which
/// layers the method declarations on top of [`ControllerRoot::root_state`].
pub trait RoutedController: ControllerRoot {
    fn routing_state() -> RouterConfigState;
}

/// Identity key for a target, usable in side tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKey {
    /// A controller type.
    Type(TypeId),
    /// A runtime value, keyed by its allocation.
    Instance(usize),
}

#[derive(Clone)]
enum TargetKind {
    Type(TypeId),
    Value(Arc<dyn Any + Send + Sync>),
}

/// Handle to the invocable a consuming router should instantiate or call.
///
/// Cloning shares identity: a clone compares equal to the original under
/// [`ControllerTarget::same_target`], while two independently constructed
/// handles over equal-looking values do not.
#[derive(Clone)]
pub struct ControllerTarget {
    name: Cow<'static, str>,
    kind: TargetKind,
}

impl ControllerTarget {
    /// Target for a controller type.
    pub fn of<T: 'static>() -> Self {
        Self {
            name: Cow::Borrowed(std::any::type_name::<T>()),
            kind: TargetKind::Type(TypeId::of::<T>()),
        }
    }

    /// Target wrapping a runtime value, typically a factory function.
    pub fn new<T: Any + Send + Sync>(name: impl Into<Cow<'static, str>>, value: T) -> Self {
        Self {
            name: name.into(),
            kind: TargetKind::Value(Arc::new(value)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> TargetKey {
        match &self.kind {
            TargetKind::Type(type_id) => TargetKey::Type(*type_id),
            TargetKind::Value(value) => {
                TargetKey::Instance(Arc::as_ptr(value) as *const () as usize)
            }
        }
    }

    /// True when this handle refers to the controller type `T`.
    pub fn is<T: 'static>(&self) -> bool {
        match &self.kind {
            TargetKind::Type(type_id) => *type_id == TypeId::of::<T>(),
            TargetKind::Value(value) => value.downcast_ref::<T>().is_some(),
        }
    }

    /// The wrapped runtime value, if this target carries one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match &self.kind {
            TargetKind::Type(_) => None,
            TargetKind::Value(value) => value.downcast_ref(),
        }
    }

    pub fn same_target(&self, other: &ControllerTarget) -> bool {
        self.key() == other.key()
    }
}

impl fmt::Debug for ControllerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            TargetKind::Type(_) => "type",
            TargetKind::Value(_) => "value",
        };
        write!(f, "ControllerTarget({kind} {})", self.name)
    }
}

/// Method-scoped middleware attached in the same verb call.
#[derive(Debug, Clone, Default)]
pub struct MethodOpts {
    pub(crate) before: Vec<Middleware>,
    pub(crate) after: Vec<Middleware>,
}

impl MethodOpts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before(mut self, middleware: impl Into<MiddlewareArg>) -> Self {
        let middleware: MiddlewareArg = middleware.into();
        self.before.extend(middleware.into_vec());
        self
    }

    pub fn after(mut self, middleware: impl Into<MiddlewareArg>) -> Self {
        let middleware: MiddlewareArg = middleware.into();
        self.after.extend(middleware.into_vec());
        self
    }
}

/// Configures routing state for a class or function to be invoked by a
/// router.
///
/// # Example
/// ```
/// use rudder::{ControllerTarget, HttpVerb, MethodOpts, create_controller};
///
/// struct TodoApi;
///
/// let controller = create_controller(ControllerTarget::of::<TodoApi>())
///     .prefix("/todos")
///     .before("bodyParser")
///     .get("/", "find")
///     .get("/{id}", "get")
///     .verbs_with(
///         &[HttpVerb::Post],
///         "/{id}",
///         "create",
///         MethodOpts::new().before("authenticate"),
///     );
/// assert_eq!(controller.state().root.paths, vec!["/todos"]);
/// ```
pub fn create_controller(target: ControllerTarget) -> ControllerBuilder {
    ControllerBuilder::from_state(target, RouterConfigState::new())
}

/// Fluent declaration front-end over the route config store.
#[derive(Debug, Clone)]
pub struct ControllerBuilder {
    target: ControllerTarget,
    state: RouterConfigState,
}

impl ControllerBuilder {
    /// Creates a builder that continues building on existing state.
    pub fn from_state(target: ControllerTarget, state: RouterConfigState) -> Self {
        Self { target, state }
    }

    /// The original class or function, so callers can resolve back to the
    /// invocable without going through the declaration API.
    pub fn target(&self) -> &ControllerTarget {
        &self.target
    }

    pub fn state(&self) -> &RouterConfigState {
        &self.state
    }

    /// Adds a root path. Repeated calls accumulate prefixes.
    pub fn prefix(self, path: impl Into<String>) -> Self {
        let state = self.state.with_path(&ConfigScope::Root, path);
        Self { state, ..self }
    }

    /// Adds middleware that runs before every method.
    pub fn before(self, middleware: impl Into<MiddlewareArg>) -> Self {
        let state = self.state.with_before(&ConfigScope::Root, middleware);
        Self { state, ..self }
    }

    /// Adds middleware that runs after every method.
    pub fn after(self, middleware: impl Into<MiddlewareArg>) -> Self {
        let state = self.state.with_after(&ConfigScope::Root, middleware);
        Self { state, ..self }
    }

    /// Registers `path` on the named method for the given verbs.
    pub fn verbs(
        self,
        verbs: &[HttpVerb],
        path: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        self.verbs_with(verbs, path, method, MethodOpts::new())
    }

    /// Same as [`ControllerBuilder::verbs`], attaching method-scoped
    /// middleware in the same call.
    pub fn verbs_with(
        self,
        verbs: &[HttpVerb],
        path: impl Into<String>,
        method: impl Into<String>,
        opts: MethodOpts,
    ) -> Self {
        let method = method.into();
        let scope = ConfigScope::method(method.clone());
        let mut state = self
            .state
            .with_path(&scope, path)
            .with_verbs(method, verbs);
        if !opts.before.is_empty() {
            state = state.with_before(&scope, opts.before);
        }
        if !opts.after.is_empty() {
            state = state.with_after(&scope, opts.after);
        }
        Self { state, ..self }
    }

    pub fn get(self, path: impl Into<String>, method: impl Into<String>) -> Self {
        self.verbs(&[HttpVerb::Get], path, method)
    }

    pub fn head(self, path: impl Into<String>, method: impl Into<String>) -> Self {
        self.verbs(&[HttpVerb::Head], path, method)
    }

    pub fn post(self, path: impl Into<String>, method: impl Into<String>) -> Self {
        self.verbs(&[HttpVerb::Post], path, method)
    }

    pub fn put(self, path: impl Into<String>, method: impl Into<String>) -> Self {
        self.verbs(&[HttpVerb::Put], path, method)
    }

    pub fn patch(self, path: impl Into<String>, method: impl Into<String>) -> Self {
        self.verbs(&[HttpVerb::Patch], path, method)
    }

    pub fn delete(self, path: impl Into<String>, method: impl Into<String>) -> Self {
        self.verbs(&[HttpVerb::Delete], path, method)
    }

    pub fn options(self, path: impl Into<String>, method: impl Into<String>) -> Self {
        self.verbs(&[HttpVerb::Options], path, method)
    }

    pub fn connect(self, path: impl Into<String>, method: impl Into<String>) -> Self {
        self.verbs(&[HttpVerb::Connect], path, method)
    }

    pub fn all(self, path: impl Into<String>, method: impl Into<String>) -> Self {
        self.verbs(&[HttpVerb::All], path, method)
    }

    pub fn into_export(self) -> ExportValue {
        ExportValue::Builder(self)
    }
}
