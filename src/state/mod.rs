//! Route config store: the data structures both declaration flavors write
//! into, and the update protocol they share.
//!
//! Updates are immutable: every operation returns a new state and leaves the
//! input untouched. Declarations happen once at load time, so the extra
//! allocation is irrelevant, and roll-up reads never race a writer.

use indexmap::IndexMap;

use crate::error::{Result, RudderError};
use crate::middleware::{Middleware, MiddlewareArg};
use crate::verb::HttpVerb;

mod registry;
mod rollup;

pub use registry::{StateRegistry, get_state, set_state};
pub use rollup::roll_up_state;

/// Scope a route update applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigScope {
    /// Class-level (controller-level) config, applied to every method.
    Root,
    /// Config for one named method.
    Method(String),
}

impl ConfigScope {
    pub fn method(name: impl Into<String>) -> Self {
        ConfigScope::Method(name.into())
    }
}

/// A single declaration-time update.
///
/// Both the attribute macros and the fluent builder reduce to an ordered
/// sequence of these, so the resulting arrays always reflect call order and
/// never a language evaluation-order artifact.
#[derive(Debug, Clone)]
pub enum RouteUpdate {
    Path(String),
    Before(MiddlewareArg),
    After(MiddlewareArg),
    Verbs(Vec<HttpVerb>),
}

/// Routing facts accumulated for one declaration scope.
#[derive(Debug, Clone, Default)]
pub struct RouteConfig {
    /// Paths to register, first-seen order, deduplicated.
    pub paths: Vec<String>,
    /// Middleware to run before the method. Never deduplicated.
    pub before_middleware: Vec<Middleware>,
    /// Middleware to run after the method. Never deduplicated.
    pub after_middleware: Vec<Middleware>,
    /// HTTP verbs to register, first-seen order, deduplicated.
    pub verbs: Vec<HttpVerb>,
}

impl RouteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.paths.push(path.into());
        self.paths = uniq(self.paths);
        self
    }

    pub fn with_before(mut self, middleware: impl Into<MiddlewareArg>) -> Self {
        let middleware: MiddlewareArg = middleware.into();
        self.before_middleware.extend(middleware.into_vec());
        self
    }

    pub fn with_after(mut self, middleware: impl Into<MiddlewareArg>) -> Self {
        let middleware: MiddlewareArg = middleware.into();
        self.after_middleware.extend(middleware.into_vec());
        self
    }

    pub fn with_verbs(mut self, verbs: &[HttpVerb]) -> Self {
        self.verbs.extend_from_slice(verbs);
        self.verbs = uniq(self.verbs);
        self
    }
}

/// Accumulated routing state for one target: the root config plus one config
/// per declared method, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RouterConfigState {
    pub root: RouteConfig,
    pub methods: IndexMap<String, RouteConfig>,
}

impl RouterConfigState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config for a scope, if it has been declared.
    pub fn config(&self, scope: &ConfigScope) -> Option<&RouteConfig> {
        match scope {
            ConfigScope::Root => Some(&self.root),
            ConfigScope::Method(name) => self.methods.get(name),
        }
    }

    pub fn method(&self, name: &str) -> Option<&RouteConfig> {
        self.methods.get(name)
    }

    /// Applies one update, returning the new state.
    ///
    /// This is the common protocol behind both declaration flavors. Verb
    /// updates at root scope are rejected: verbs are meaningless on the
    /// controller itself.
    pub fn apply(&self, scope: &ConfigScope, update: RouteUpdate) -> Result<Self> {
        if matches!(scope, ConfigScope::Root) && matches!(update, RouteUpdate::Verbs(_)) {
            return Err(RudderError::invariant(
                "verbs can only be assigned to controller methods, not to the controller itself",
            ));
        }

        let mut next = self.clone();
        apply_to(next.config_mut(scope), update);
        Ok(next)
    }

    pub fn with_path(&self, scope: &ConfigScope, path: impl Into<String>) -> Self {
        let mut next = self.clone();
        apply_to(next.config_mut(scope), RouteUpdate::Path(path.into()));
        next
    }

    pub fn with_before(&self, scope: &ConfigScope, middleware: impl Into<MiddlewareArg>) -> Self {
        let mut next = self.clone();
        apply_to(next.config_mut(scope), RouteUpdate::Before(middleware.into()));
        next
    }

    pub fn with_after(&self, scope: &ConfigScope, middleware: impl Into<MiddlewareArg>) -> Self {
        let mut next = self.clone();
        apply_to(next.config_mut(scope), RouteUpdate::After(middleware.into()));
        next
    }

    /// Assigns verbs to a method. Taking the method name instead of a scope
    /// keeps the root-verb invariant out of reach at compile time.
    pub fn with_verbs(&self, method: impl Into<String>, verbs: &[HttpVerb]) -> Self {
        let mut next = self.clone();
        apply_to(
            next.config_mut(&ConfigScope::Method(method.into())),
            RouteUpdate::Verbs(verbs.to_vec()),
        );
        next
    }

    /// Root config for root scope, else the method config, created and
    /// committed in declaration order on first touch.
    fn config_mut(&mut self, scope: &ConfigScope) -> &mut RouteConfig {
        match scope {
            ConfigScope::Root => &mut self.root,
            ConfigScope::Method(name) => self
                .methods
                .entry(name.clone())
                .or_insert_with(RouteConfig::new),
        }
    }
}

fn apply_to(config: &mut RouteConfig, update: RouteUpdate) {
    let current = std::mem::take(config);
    *config = match update {
        RouteUpdate::Path(path) => current.with_path(path),
        RouteUpdate::Before(middleware) => current.with_before(middleware),
        RouteUpdate::After(middleware) => current.with_after(middleware),
        RouteUpdate::Verbs(verbs) => current.with_verbs(&verbs),
    };
}

/// Unique items, first-seen order.
fn uniq<T: PartialEq>(src: Vec<T>) -> Vec<T> {
    let mut result: Vec<T> = Vec::with_capacity(src.len());
    for item in src {
        if !result.contains(&item) {
            result.push(item);
        }
    }
    result
}
