//! Two controllers as named exports; discovery must keep declaration order.

use rudder::{ControllerTarget, ModuleExports, create_controller, register_module};

pub struct UserApi;

pub struct AdminApi;

register_module!(|| {
    Ok(ModuleExports::new()
        .with_named(
            "UserApi",
            create_controller(ControllerTarget::of::<UserApi>())
                .prefix("/users")
                .get("/", "find"),
        )
        .with_named(
            "AdminApi",
            create_controller(ControllerTarget::of::<AdminApi>())
                .prefix("/admin")
                .get("/", "find"),
        ))
});
