//! # Rudder
//!
//! Routing metadata accumulation and controller discovery for Rust web
//! frameworks.
//!
//! Rudder lets a type (or a plain factory function) declare HTTP routing
//! information (paths, verbs, before/after middleware) either with attribute
//! macros or with a fluent builder, then hands the accumulated configuration
//! to whatever router you use. It computes *what* should be registered; it
//! never dispatches requests, runs middleware, or opens sockets.
//!
//! ## Features
//!
//! - **Two declaration flavors**: `#[controller]`/`#[routes]` attribute
//!   macros, or the `create_controller` fluent builder; both write through
//!   one update protocol and are discovered identically
//! - **State roll-up**: root (controller-level) config merges into every
//!   method config to produce a flattened, ordered, deduplicated routing
//!   table
//! - **Controller discovery**: glob source files, load each registered
//!   module, and extract every controller-bearing export, synchronously or
//!   with concurrent dynamic loading
//! - **Explicit registries**: routing state and module exports live in
//!   injectable side tables, not hidden fields
//!
//! ## Quick Start
//!
//! ```
//! use rudder::{ControllerTarget, create_controller, roll_up_state};
//!
//! struct TodoApi;
//!
//! let controller = create_controller(ControllerTarget::of::<TodoApi>())
//!     .prefix("/todos")
//!     .before("bodyParser")
//!     .get("/", "find")
//!     .get("/{id}", "get")
//!     .post("/", "create");
//!
//! let table = roll_up_state(controller.state());
//! assert_eq!(table["find"].paths, vec!["/todos/"]);
//! assert_eq!(table["get"].paths, vec!["/todos/{id}"]);
//! ```
//!
//! The same declarations as attributes:
//!
//! ```ignore
//! use rudder::{controller, routes};
//!
//! #[controller(prefix = "/todos", before = ["bodyParser"])]
//! pub struct TodoController;
//!
//! #[routes]
//! impl TodoController {
//!     #[get("/")]
//!     fn find(&self) {}
//!
//!     #[route("/{id}")]
//!     #[get]
//!     fn get(&self) {}
//! }
//! ```
//!
//! Declaring a controller also registers its source file, so a router can
//! pick everything up by glob:
//!
//! ```ignore
//! use rudder::{FindControllersOptions, find_controllers, roll_up_state};
//!
//! for found in find_controllers("src/controllers/*.rs", &FindControllersOptions::default())? {
//!     for (method, config) in roll_up_state(&found.state) {
//!         // register config.paths × config.verbs for `method` on found.target
//!     }
//! }
//! ```

pub mod controller;
pub mod discovery;
pub mod error;
pub mod middleware;
pub mod module;
pub mod resolve;
pub mod state;
pub mod verb;

// Re-export core types
pub use controller::{
    ControllerBuilder, ControllerRoot, ControllerTarget, MethodOpts, RoutedController, TargetKey,
    create_controller,
};
pub use discovery::{
    FindControllersOptions, FindControllersResult, ModuleImport, find_classes, find_classes_with,
    find_controllers, find_controllers_async, find_controllers_async_with, find_controllers_with,
};
pub use error::{Result, RudderError};
pub use middleware::{Middleware, MiddlewareArg};
pub use module::{ModuleExports, ModuleRegistration, ModuleRegistry};
pub use resolve::{ExportValue, StateAndTarget, get_state_and_target, get_state_and_target_in};
pub use state::{
    ConfigScope, RouteConfig, RouteUpdate, RouterConfigState, StateRegistry, get_state,
    roll_up_state, set_state,
};
pub use verb::HttpVerb;

// Re-export macros
pub use rudder_macro::{controller, routes};

// Re-export commonly used items from dependencies
pub use async_trait::async_trait;

// Re-exported for macro-generated code; not part of the public API surface.
pub use inventory;

/// Prelude module for convenient imports
///
/// ```
/// use rudder::prelude::*;
/// ```
pub mod prelude {
    pub use crate::controller::{
        ControllerBuilder, ControllerRoot, ControllerTarget, MethodOpts, RoutedController,
        create_controller,
    };
    pub use crate::discovery::{
        FindControllersOptions, FindControllersResult, ModuleImport, find_classes,
        find_controllers, find_controllers_async,
    };
    pub use crate::error::{Result, RudderError};
    pub use crate::middleware::{Middleware, MiddlewareArg};
    pub use crate::module::{ModuleExports, ModuleRegistry};
    pub use crate::resolve::{ExportValue, StateAndTarget, get_state_and_target};
    pub use crate::state::{
        ConfigScope, RouteConfig, RouteUpdate, RouterConfigState, StateRegistry, get_state,
        roll_up_state, set_state,
    };
    pub use crate::verb::HttpVerb;
    pub use crate::{controller, register_module, routes};
}
