//! The whole module is one controller. The extra exports exist to prove that
//! a resolving whole-module export short-circuits everything else.

use rudder::{
    ControllerTarget, ExportValue, ModuleExports, create_controller, register_module,
};

pub struct ShipmentApi;

pub fn shipment_api() -> ShipmentApi {
    ShipmentApi
}

register_module!(|| {
    Ok(ModuleExports::module(
        create_controller(ControllerTarget::new(
            "shipment_api",
            shipment_api as fn() -> ShipmentApi,
        ))
        .prefix("/shipments")
        .get("/", "list")
        .post("/", "create"),
    )
    .with_default(ExportValue::plain("ignored_default", 0u8))
    .with_named("Ignored", ExportValue::plain("ignored_named", 1u8)))
});
