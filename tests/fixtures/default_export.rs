//! A controller under the conventional `default` export, next to a named
//! export that carries no routing state and must be ignored.

use rudder::{
    ControllerTarget, ExportValue, ModuleExports, create_controller, register_module,
};

pub struct InvoiceApi;

pub struct NotAController;

register_module!(|| {
    Ok(ModuleExports::new()
        .with_default(
            create_controller(ControllerTarget::of::<InvoiceApi>())
                .prefix("/invoices")
                .get("/", "find"),
        )
        .with_named(
            "NotAController",
            ExportValue::plain("NotAController", NotAController),
        ))
});
