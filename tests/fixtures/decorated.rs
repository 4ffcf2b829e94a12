//! Attribute-macro controller; `#[routes]` registers this file by itself.

use rudder::{controller, routes};

#[controller(prefix = "/reports", before = ["auth"])]
pub struct ReportController;

#[routes]
impl ReportController {
    #[get("/")]
    pub fn list(&self) {}

    #[route("/{id}")]
    #[verbs(GET, HEAD)]
    pub fn fetch(&self) {}
}
