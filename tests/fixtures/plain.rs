//! A module with exports but no controllers; discovery must skip it without
//! erroring.

use rudder::{ExportValue, ModuleExports, register_module};

pub struct Helper;

register_module!(|| {
    Ok(ModuleExports::new().with_named("Helper", ExportValue::plain("Helper", Helper)))
});
