//! Controller discovery: glob the filesystem, load each matched module, and
//! extract every controller-bearing export.
//!
//! Synchronous discovery loads modules one by one through the module
//! registry. Asynchronous discovery fires every load concurrently through a
//! [`ModuleImport`] and reassembles results in the original file order, so
//! callers always see file-major, export-minor ordering regardless of which
//! load finishes first. A load failure aborts the whole batch; there are no
//! partial results.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::controller::ControllerTarget;
use crate::error::{Result, RudderError};
use crate::module::{ModuleExports, ModuleRegistry};
use crate::resolve::{ExportValue, StateAndTarget, get_state_and_target};

/// Options accepted by the discovery entry points.
#[derive(Clone, Default)]
pub struct FindControllersOptions {
    /// Resolve matched paths to absolute paths before loading.
    pub absolute: bool,
    /// Dynamic-import loading. Only valid with [`find_controllers_async`];
    /// the synchronous entry point rejects it instead of silently returning
    /// nothing.
    pub es_modules: bool,
    /// Override of the dynamic-import function, for test substitution.
    pub import: Option<Arc<dyn ModuleImport>>,
}

impl fmt::Debug for FindControllersOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FindControllersOptions")
            .field("absolute", &self.absolute)
            .field("es_modules", &self.es_modules)
            .field("import", &self.import.is_some())
            .finish()
    }
}

/// Dynamic module import used by asynchronous discovery.
#[async_trait]
pub trait ModuleImport: Send + Sync {
    async fn import(&self, path: &str) -> Result<Arc<ModuleExports>>;
}

/// Default importer: reads the module registry.
struct RegistryImport<'a> {
    registry: &'a ModuleRegistry,
}

#[async_trait]
impl ModuleImport for RegistryImport<'_> {
    async fn import(&self, path: &str) -> Result<Arc<ModuleExports>> {
        self.registry.load(path)
    }
}

pub type FindControllersResult = Vec<StateAndTarget>;

/// Finds controllers in modules matching the glob pattern.
///
/// Blocking and sequential per file: each matched path is loaded (cached by
/// path) and its exports are resolved. A module that fails to load fails the
/// whole call; an export with no routing state is silently skipped.
pub fn find_controllers(
    pattern: &str,
    opts: &FindControllersOptions,
) -> Result<FindControllersResult> {
    find_controllers_with(ModuleRegistry::global(), pattern, opts)
}

/// Same as [`find_controllers`], against an explicit module registry.
pub fn find_controllers_with(
    registry: &ModuleRegistry,
    pattern: &str,
    opts: &FindControllersOptions,
) -> Result<FindControllersResult> {
    if opts.es_modules {
        return Err(RudderError::unsupported_mode(
            "es_modules loading is asynchronous; use find_controllers_async",
        ));
    }

    let paths = expand_pattern(pattern, opts)?;
    let mut result = Vec::new();
    for path in &paths {
        let exports = registry.load(path)?;
        result.extend(extract_state_and_targets(&exports));
    }
    tracing::debug!(
        pattern,
        files = paths.len(),
        controllers = result.len(),
        "discovery complete"
    );
    Ok(result)
}

/// Finds controllers with all module loads issued concurrently.
///
/// Loads are fired for every matched file, awaited together, and flattened in
/// the original file order, not in completion order. The first load failure
/// fails the whole batch.
pub async fn find_controllers_async(
    pattern: &str,
    opts: &FindControllersOptions,
) -> Result<FindControllersResult> {
    find_controllers_async_with(ModuleRegistry::global(), pattern, opts).await
}

/// Same as [`find_controllers_async`], against an explicit module registry.
pub async fn find_controllers_async_with(
    registry: &ModuleRegistry,
    pattern: &str,
    opts: &FindControllersOptions,
) -> Result<FindControllersResult> {
    let paths = expand_pattern(pattern, opts)?;

    let default_import = RegistryImport { registry };
    let importer: &dyn ModuleImport = match &opts.import {
        Some(importer) => importer.as_ref(),
        None => &default_import,
    };

    let modules =
        futures::future::try_join_all(paths.iter().map(|path| importer.import(path))).await?;

    let result: Vec<StateAndTarget> = modules
        .iter()
        .flat_map(|exports| extract_state_and_targets(exports))
        .collect();
    tracing::debug!(
        pattern,
        files = paths.len(),
        controllers = result.len(),
        "async discovery complete"
    );
    Ok(result)
}

/// Finds the invocable targets of modules matching the glob pattern, without
/// requiring routing state: the whole-module export when present, else the
/// `default` export. Modules exporting neither contribute nothing.
pub fn find_classes(pattern: &str, opts: &FindControllersOptions) -> Result<Vec<ControllerTarget>> {
    find_classes_with(ModuleRegistry::global(), pattern, opts)
}

/// Same as [`find_classes`], against an explicit module registry.
pub fn find_classes_with(
    registry: &ModuleRegistry,
    pattern: &str,
    opts: &FindControllersOptions,
) -> Result<Vec<ControllerTarget>> {
    let paths = expand_pattern(pattern, opts)?;
    let mut result = Vec::new();
    for path in &paths {
        let exports = registry.load(path)?;
        let value = exports.module_export().or_else(|| exports.default_export());
        if let Some(value) = value {
            result.push(export_target(value));
        }
    }
    Ok(result)
}

/// Expands the glob pattern into matched file paths, preserving the glob
/// library's traversal order.
fn expand_pattern(pattern: &str, opts: &FindControllersOptions) -> Result<Vec<String>> {
    let walk = glob::glob(pattern).map_err(|source| RudderError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in walk {
        let path: PathBuf = entry?;
        let path = if opts.absolute && path.is_relative() {
            std::env::current_dir()?.join(path)
        } else {
            path
        };
        paths.push(path.to_string_lossy().into_owned());
    }
    tracing::trace!(pattern, files = paths.len(), "expanded glob pattern");
    Ok(paths)
}

/// Resolves one module's exports: the whole-module export short-circuits;
/// otherwise every named export is tried in declaration order.
fn extract_state_and_targets(exports: &ModuleExports) -> Vec<StateAndTarget> {
    if let Some(value) = exports.module_export() {
        if let Some(state_and_target) = get_state_and_target(value) {
            return vec![state_and_target];
        }
    }

    exports
        .named()
        .values()
        .filter_map(get_state_and_target)
        .collect()
}

fn export_target(value: &ExportValue) -> ControllerTarget {
    match value {
        ExportValue::Builder(builder) => builder.target().clone(),
        ExportValue::Value(target) => target.clone(),
    }
}
