use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque middleware value carried through route configs.
///
/// The crate never invokes middleware; it only accumulates the values so an
/// external router can wrap the method call with them. Values are type-erased
/// and cheap to clone; clones share the same underlying allocation, so
/// [`Middleware::same`] can tell registrations of the same value apart from
/// registrations of equal-looking but distinct values.
#[derive(Clone)]
pub struct Middleware {
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

impl Middleware {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            value: Arc::new(value),
        }
    }

    /// Type name of the wrapped value, for diagnostics only.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }

    /// Identity comparison: true when both handles share one allocation.
    pub fn same(&self, other: &Middleware) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Middleware({})", self.type_name)
    }
}

impl From<&'static str> for Middleware {
    fn from(value: &'static str) -> Self {
        Middleware::new(value)
    }
}

impl From<String> for Middleware {
    fn from(value: String) -> Self {
        Middleware::new(value)
    }
}

/// One middleware value or a sequence of them.
///
/// Every `before`/`after` declaration accepts this, so a single call can
/// append one value or a whole list, exactly as written.
#[derive(Debug, Clone)]
pub enum MiddlewareArg {
    One(Middleware),
    Many(Vec<Middleware>),
}

impl MiddlewareArg {
    pub(crate) fn into_vec(self) -> Vec<Middleware> {
        match self {
            MiddlewareArg::One(middleware) => vec![middleware],
            MiddlewareArg::Many(middleware) => middleware,
        }
    }
}

impl From<Middleware> for MiddlewareArg {
    fn from(value: Middleware) -> Self {
        MiddlewareArg::One(value)
    }
}

impl From<Vec<Middleware>> for MiddlewareArg {
    fn from(value: Vec<Middleware>) -> Self {
        MiddlewareArg::Many(value)
    }
}

impl From<&'static str> for MiddlewareArg {
    fn from(value: &'static str) -> Self {
        MiddlewareArg::One(Middleware::new(value))
    }
}

impl From<Vec<&'static str>> for MiddlewareArg {
    fn from(value: Vec<&'static str>) -> Self {
        MiddlewareArg::Many(value.into_iter().map(Middleware::new).collect())
    }
}

impl From<String> for MiddlewareArg {
    fn from(value: String) -> Self {
        MiddlewareArg::One(Middleware::new(value))
    }
}
