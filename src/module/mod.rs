//! Module exports and the path-keyed module registry behind discovery.
//!
//! Rust cannot load source files at runtime, so modules announce their
//! exports at link time instead: the `#[routes]` macro submits a registration
//! for the declaring file automatically, and builder-style modules use
//! [`register_module!`]. Discovery then resolves globbed file paths against
//! these registrations. Loading is cached by path, so a module's loader runs
//! at most once per registry.

use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use indexmap::IndexMap;

use crate::error::{Result, RudderError};
use crate::resolve::ExportValue;

/// Exports of one module: an optional whole-module export plus named exports
/// in declaration order.
///
/// The whole-module export models the "the module *is* the controller"
/// convention; when it resolves, discovery short-circuits and named exports
/// are ignored for that module.
#[derive(Debug, Clone, Default)]
pub struct ModuleExports {
    module_export: Option<ExportValue>,
    named: IndexMap<String, ExportValue>,
}

impl ModuleExports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Module whose entire export is one value.
    pub fn module(value: impl Into<ExportValue>) -> Self {
        Self {
            module_export: Some(value.into()),
            named: IndexMap::new(),
        }
    }

    pub fn with_module_export(mut self, value: impl Into<ExportValue>) -> Self {
        self.module_export = Some(value.into());
        self
    }

    /// Adds the conventional `default` export.
    pub fn with_default(self, value: impl Into<ExportValue>) -> Self {
        self.with_named("default", value)
    }

    pub fn with_named(mut self, name: impl Into<String>, value: impl Into<ExportValue>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }

    pub fn module_export(&self) -> Option<&ExportValue> {
        self.module_export.as_ref()
    }

    pub fn named(&self) -> &IndexMap<String, ExportValue> {
        &self.named
    }

    pub fn default_export(&self) -> Option<&ExportValue> {
        self.named.get("default")
    }

    pub fn is_empty(&self) -> bool {
        self.module_export.is_none() && self.named.is_empty()
    }

    /// Folds another registration's exports into this one. The first
    /// whole-module export wins; named exports accumulate in order.
    fn merge(&mut self, other: ModuleExports) {
        if self.module_export.is_none() {
            self.module_export = other.module_export;
        }
        self.named.extend(other.named);
    }
}

/// One module's contribution, collected at link time.
///
/// `exports` must be a plain function (or non-capturing closure): it runs on
/// first load, which is when builder chains and decorator state come into
/// existence, i.e. the moment the module "executes".
pub struct ModuleRegistration {
    pub path: &'static str,
    pub line: u32,
    pub exports: fn() -> Result<ModuleExports>,
}

inventory::collect!(ModuleRegistration);

/// Registers the current file's exports for discovery.
///
/// # Example
/// ```ignore
/// rudder::register_module!(|| {
///     Ok(rudder::ModuleExports::module(
///         rudder::create_controller(target()).prefix("/todos").get("/", "find"),
///     ))
/// });
/// ```
#[macro_export]
macro_rules! register_module {
    ($loader:expr) => {
        $crate::register_module!(::core::file!(), $loader);
    };
    ($path:expr, $loader:expr) => {
        $crate::inventory::submit! {
            $crate::ModuleRegistration {
                path: $path,
                line: ::core::line!(),
                exports: $loader,
            }
        }
    };
}

type BoxedLoader = Box<dyn Fn() -> Result<ModuleExports> + Send + Sync>;

/// Path-keyed module registry backing discovery.
///
/// The global registry is seeded lazily from link-time registrations; fresh
/// instances can be built and populated by hand for tests.
pub struct ModuleRegistry {
    loaders: DashMap<String, Vec<Arc<BoxedLoader>>>,
    cache: DashMap<String, Arc<ModuleExports>>,
}

static GLOBAL: LazyLock<ModuleRegistry> = LazyLock::new(|| {
    let registry = ModuleRegistry::new();
    let mut registrations: Vec<&ModuleRegistration> = Vec::new();
    for registration in inventory::iter::<ModuleRegistration> {
        registrations.push(registration);
    }
    // Link-section order is unspecified; source position is the canonical
    // declaration order.
    registrations.sort_by_key(|registration| (registration.path, registration.line));
    for registration in registrations {
        let loader = registration.exports;
        registry.register(registration.path, move || loader());
    }
    tracing::debug!(
        modules = registry.loaders.len(),
        "seeded module registry from link-time registrations"
    );
    registry
});

impl ModuleRegistry {
    pub fn new() -> Self {
        Self {
            loaders: DashMap::new(),
            cache: DashMap::new(),
        }
    }

    /// The process-wide registry, including every `register_module!` and
    /// `#[routes]` submission linked into the binary.
    pub fn global() -> &'static ModuleRegistry {
        &GLOBAL
    }

    /// Registers a loader for a module path. Several loaders may share one
    /// path; their exports merge in registration order.
    pub fn register(
        &self,
        path: impl Into<String>,
        loader: impl Fn() -> Result<ModuleExports> + Send + Sync + 'static,
    ) {
        let path = normalize_path(&path.into());
        self.loaders
            .entry(path)
            .or_default()
            .push(Arc::new(Box::new(loader)));
    }

    pub fn contains(&self, path: &str) -> bool {
        self.resolve_key(path).is_some()
    }

    /// Loads the module registered for `path`. Blocking, cached by path: the
    /// loaders run on first access only.
    pub fn load(&self, path: &str) -> Result<Arc<ModuleExports>> {
        let key = self
            .resolve_key(path)
            .ok_or_else(|| RudderError::ModuleNotRegistered {
                path: path.to_string(),
            })?;

        if let Some(cached) = self.cache.get(&key) {
            tracing::trace!(path, "module cache hit");
            return Ok(cached.clone());
        }

        // Clone the loader list out so no shard lock is held while loaders
        // run; a loader may touch the registry itself.
        let loaders = self
            .loaders
            .get(&key)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();
        let mut exports = ModuleExports::new();
        for loader in loaders {
            exports.merge(loader()?);
        }
        tracing::debug!(
            path,
            named = exports.named.len(),
            module_export = exports.module_export.is_some(),
            "loaded module"
        );

        let exports = Arc::new(exports);
        self.cache.insert(key, exports.clone());
        Ok(exports)
    }

    /// Maps a filesystem path to a registered module key: exact match first,
    /// then a component-aligned suffix match so absolute paths find modules
    /// registered under workspace-relative `file!()` paths.
    fn resolve_key(&self, path: &str) -> Option<String> {
        let normalized = normalize_path(path);
        if self.loaders.contains_key(&normalized) {
            return Some(normalized);
        }

        let mut candidates: Vec<String> = self
            .loaders
            .iter()
            .map(|entry| entry.key().clone())
            .filter(|key| suffix_matches(&normalized, key))
            .collect();
        candidates.sort_by_key(|key| std::cmp::Reverse(key.len()));
        if candidates.len() > 1 {
            tracing::warn!(
                path,
                candidates = candidates.len(),
                "ambiguous module path; using the longest registered match"
            );
        }
        candidates.into_iter().next()
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let path = path.strip_prefix("./").unwrap_or(&path);
    if let Ok(cwd) = std::env::current_dir() {
        let mut cwd = cwd.to_string_lossy().replace('\\', "/");
        cwd.push('/');
        if let Some(relative) = path.strip_prefix(&cwd) {
            return relative.to_string();
        }
    }
    path.to_string()
}

fn suffix_matches(full: &str, key: &str) -> bool {
    full == key || full.ends_with(&format!("/{key}"))
}
