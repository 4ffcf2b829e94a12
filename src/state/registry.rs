//! Explicit side table associating routing state with target identity.
//!
//! The association is out-of-band so targets stay ordinary types and values,
//! but it is an ordinary registry rather than a hidden field: ownership is
//! visible, and tests can construct private registries instead of sharing the
//! process-wide one. Entries live for the lifetime of the registry; the
//! global registry never evicts, matching the load-once lifecycle of
//! declarations.

use std::sync::LazyLock;

use dashmap::DashMap;

use crate::controller::{ControllerTarget, TargetKey};
use crate::error::Result;
use crate::state::{ConfigScope, RouteUpdate, RouterConfigState};

static GLOBAL: LazyLock<StateRegistry> = LazyLock::new(StateRegistry::new);

pub struct StateRegistry {
    entries: DashMap<TargetKey, StateEntry>,
}

struct StateEntry {
    // Keeps the target's allocation alive so pointer-derived keys stay unique.
    #[allow(dead_code)]
    target: ControllerTarget,
    state: RouterConfigState,
}

impl StateRegistry {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// The process-wide registry backing [`get_state`] and [`set_state`].
    pub fn global() -> &'static StateRegistry {
        &GLOBAL
    }

    /// State associated with the target, if any. Never errors: an absent
    /// entry just means the target is not a controller.
    pub fn get(&self, target: &ControllerTarget) -> Option<RouterConfigState> {
        self.entries
            .get(&target.key())
            .map(|entry| entry.state.clone())
    }

    pub fn set(&self, target: &ControllerTarget, state: RouterConfigState) {
        self.entries.insert(
            target.key(),
            StateEntry {
                target: target.clone(),
                state,
            },
        );
    }

    /// Get-or-init then apply: the programmatic declaration door. State is
    /// created lazily the first time a target is touched.
    ///
    /// Declaration-time writes are single-threaded at load time; the entry
    /// lock below only guards against torn reads from concurrent roll-ups.
    pub fn update(
        &self,
        target: &ControllerTarget,
        scope: &ConfigScope,
        update: RouteUpdate,
    ) -> Result<RouterConfigState> {
        let mut entry = self
            .entries
            .entry(target.key())
            .or_insert_with(|| StateEntry {
                target: target.clone(),
                state: RouterConfigState::new(),
            });
        let next = entry.state.apply(scope, update)?;
        entry.state = next.clone();
        Ok(next)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// State associated with the target in the process-wide registry.
pub fn get_state(target: &ControllerTarget) -> Option<RouterConfigState> {
    StateRegistry::global().get(target)
}

/// Associates state with the target in the process-wide registry.
pub fn set_state(target: &ControllerTarget, state: RouterConfigState) {
    StateRegistry::global().set(target, state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verb::HttpVerb;

    struct Accounts;

    #[test]
    fn get_returns_none_for_unknown_targets() {
        let registry = StateRegistry::new();
        assert!(registry.get(&ControllerTarget::of::<Accounts>()).is_none());
    }

    #[test]
    fn set_then_get_round_trips_by_type_identity() {
        let registry = StateRegistry::new();
        let target = ControllerTarget::of::<Accounts>();
        let state = RouterConfigState::new().with_path(&ConfigScope::Root, "/accounts");
        registry.set(&target, state);

        // A fresh handle to the same type sees the same state.
        let found = registry.get(&ControllerTarget::of::<Accounts>()).unwrap();
        assert_eq!(found.root.paths, vec!["/accounts"]);
    }

    #[test]
    fn update_creates_state_on_first_touch() {
        let registry = StateRegistry::new();
        let target = ControllerTarget::new("factory", || Accounts);
        let state = registry
            .update(
                &target,
                &ConfigScope::method("find"),
                RouteUpdate::Verbs(vec![HttpVerb::Get]),
            )
            .unwrap();
        assert_eq!(state.method("find").unwrap().verbs, vec![HttpVerb::Get]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn update_surfaces_protocol_invariants() {
        let registry = StateRegistry::new();
        let target = ControllerTarget::of::<Accounts>();
        let err = registry
            .update(
                &target,
                &ConfigScope::Root,
                RouteUpdate::Verbs(vec![HttpVerb::Get]),
            )
            .unwrap_err();
        assert!(err.to_string().contains("verbs"));
    }
}
