//! On-disk fixture modules for discovery tests. Each file registers its own
//! exports; this file registers itself as an empty module so globbing the
//! whole directory stays loadable.
#![allow(dead_code)]

pub mod decorated;
pub mod default_export;
pub mod module_export;
pub mod named_exports;
pub mod plain;

rudder::register_module!(|| Ok(rudder::ModuleExports::new()));
