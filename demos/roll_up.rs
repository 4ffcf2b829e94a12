//! Declares controllers with both flavors, discovers them by glob, and
//! prints the rolled-up routing table a router would register.
//!
//! Run with `cargo run --example roll_up`.
#![allow(dead_code)]

use anyhow::Result;
use rudder::{
    ControllerTarget, FindControllersOptions, ModuleExports, controller, create_controller,
    find_controllers, register_module, roll_up_state, routes,
};

#[controller(prefix = "/todos", before = ["bodyParser"])]
struct TodoController;

#[routes]
impl TodoController {
    #[get("/")]
    fn find(&self) {}

    #[route("/{id}")]
    #[get]
    fn get(&self) {}

    #[post("/")]
    fn create(&self) {}
}

struct HealthApi;

register_module!(|| {
    Ok(ModuleExports::new().with_default(
        create_controller(ControllerTarget::of::<HealthApi>())
            .prefix("/health")
            .get("/", "check"),
    ))
});

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let found = find_controllers("demos/*.rs", &FindControllersOptions::default())?;
    for item in found {
        println!("{}", item.target.name());
        for (method, config) in roll_up_state(&item.state) {
            let verbs: Vec<String> = config.verbs.iter().map(|verb| verb.to_string()).collect();
            println!("  {method} [{}] {:?}", verbs.join(", "), config.paths);
        }
    }
    Ok(())
}
