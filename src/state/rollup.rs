//! State roll-up: merges the root config into every method config to produce
//! the final, registrable routing table.

use indexmap::IndexMap;

use super::{RouteConfig, RouterConfigState};

/// Rolls up state so paths are joined and middleware lands in the correct
/// order.
///
/// For each declared method:
/// - `paths` is the root-major cartesian concatenation of root and method
///   paths; a missing side passes the other through unchanged, so a method
///   with no explicit path inherits the root path(s) verbatim.
/// - before-middleware runs root first, then method; after-middleware runs
///   method first, then root, so the root wraps the method on both sides.
/// - verbs come from the method config alone.
///
/// Pure read: the input state is never mutated, and every call produces a
/// fresh mapping in method declaration order.
pub fn roll_up_state(state: &RouterConfigState) -> IndexMap<String, RouteConfig> {
    let mut result = IndexMap::with_capacity(state.methods.len());
    for (name, method) in &state.methods {
        tracing::trace!(method = %name, "rolling up method config");
        let mut before_middleware = state.root.before_middleware.clone();
        before_middleware.extend(method.before_middleware.iter().cloned());

        let mut after_middleware = method.after_middleware.clone();
        after_middleware.extend(state.root.after_middleware.iter().cloned());

        result.insert(
            name.clone(),
            RouteConfig {
                paths: concat_paths(&state.root.paths, &method.paths),
                before_middleware,
                after_middleware,
                verbs: method.verbs.clone(),
            },
        );
    }
    result
}

/// Concatenates root and method paths so there is one entry per combination,
/// in root-major order.
fn concat_paths(root_paths: &[String], method_paths: &[String]) -> Vec<String> {
    if root_paths.is_empty() {
        return method_paths.to_vec();
    }
    if method_paths.is_empty() {
        return root_paths.to_vec();
    }

    let mut result = Vec::with_capacity(root_paths.len() * method_paths.len());
    for root_path in root_paths {
        for method_path in method_paths {
            result.push(format!("{root_path}{method_path}"));
        }
    }
    result
}
