//! Target resolution: given an arbitrary export value, determine whether it
//! carries routing state and extract the real invocable behind it.
//!
//! The export shapes form a closed set. A builder carries its state and the
//! wrapped target directly; any other value is checked against the state
//! registry by identity. Both declaration flavors therefore resolve
//! identically, which is what lets discovery treat them uniformly.

use crate::controller::{ControllerBuilder, ControllerTarget, RoutedController};
use crate::state::{RouterConfigState, StateRegistry, set_state};

/// A discovered controller: the invocable target together with its routing
/// state.
#[derive(Debug, Clone)]
pub struct StateAndTarget {
    pub target: ControllerTarget,
    pub state: RouterConfigState,
}

/// Shapes a module export can take.
#[derive(Debug, Clone)]
pub enum ExportValue {
    /// A fluent-builder wrapper carrying state and the wrapped target.
    Builder(ControllerBuilder),
    /// Any other exported value. Routing state, if any, lives in the state
    /// registry.
    Value(ControllerTarget),
}

impl ExportValue {
    /// Export for an attribute-macro controller type. Associates the type's
    /// routing state in the process-wide registry, mirroring how decorators
    /// attach state when the declaring module loads.
    pub fn decorated<T: RoutedController + 'static>() -> Self {
        let target = ControllerTarget::of::<T>();
        set_state(&target, T::routing_state());
        ExportValue::Value(target)
    }

    /// Export for a plain value that may or may not carry routing state.
    pub fn plain<T: std::any::Any + Send + Sync>(
        name: impl Into<std::borrow::Cow<'static, str>>,
        value: T,
    ) -> Self {
        ExportValue::Value(ControllerTarget::new(name, value))
    }
}

impl From<ControllerBuilder> for ExportValue {
    fn from(builder: ControllerBuilder) -> Self {
        ExportValue::Builder(builder)
    }
}

impl From<ControllerTarget> for ExportValue {
    fn from(target: ControllerTarget) -> Self {
        ExportValue::Value(target)
    }
}

/// Resolves an export against the process-wide state registry.
///
/// Returns `None` when the value carries no routing state; that is not an
/// error, it just means the export is not a controller.
pub fn get_state_and_target(value: &ExportValue) -> Option<StateAndTarget> {
    get_state_and_target_in(StateRegistry::global(), value)
}

/// Same as [`get_state_and_target`], against an explicit registry.
pub fn get_state_and_target_in(
    registry: &StateRegistry,
    value: &ExportValue,
) -> Option<StateAndTarget> {
    match value {
        ExportValue::Builder(builder) => Some(StateAndTarget {
            target: builder.target().clone(),
            state: builder.state().clone(),
        }),
        ExportValue::Value(target) => registry.get(target).map(|state| StateAndTarget {
            target: target.clone(),
            state,
        }),
    }
}
