//! End-to-end discovery over the on-disk fixture modules in
//! `tests/fixtures/`. Runs from the package root, so the relative glob
//! patterns match the same paths the fixtures registered themselves under.

mod fixtures;

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use rudder::{
    ControllerTarget, FindControllersOptions, ModuleExports, ModuleImport, ModuleRegistry,
    RudderError, async_trait, create_controller, find_classes, find_controllers,
    find_controllers_async, find_controllers_with, get_state, roll_up_state,
};

use fixtures::decorated::ReportController;
use fixtures::default_export::InvoiceApi;
use fixtures::module_export::{ShipmentApi, shipment_api};

const FIXTURE_PATTERN: &str = "tests/fixtures/*.rs";

/// Root prefixes of the discovered controllers, in discovery order.
fn prefixes(found: &[rudder::StateAndTarget]) -> Vec<String> {
    found
        .iter()
        .map(|item| item.state.root.paths[0].clone())
        .collect()
}

#[test]
fn finds_every_controller_bearing_export_in_file_order() {
    let found = find_controllers(FIXTURE_PATTERN, &FindControllersOptions::default()).unwrap();

    assert_eq!(found.len(), 5);
    assert_eq!(
        prefixes(&found),
        ["/reports", "/invoices", "/shipments", "/users", "/admin"]
    );
}

#[test]
fn resolves_the_wrapped_target_not_the_builder() {
    let found = find_controllers(FIXTURE_PATTERN, &FindControllersOptions::default()).unwrap();

    let shipments = found
        .iter()
        .find(|item| item.state.root.paths[0] == "/shipments")
        .unwrap();
    let factory = shipments
        .target
        .downcast_ref::<fn() -> ShipmentApi>()
        .copied()
        .unwrap();
    assert_eq!(factory, shipment_api as fn() -> ShipmentApi);

    let invoices = found
        .iter()
        .find(|item| item.state.root.paths[0] == "/invoices")
        .unwrap();
    assert!(invoices.target.is::<InvoiceApi>());
}

#[test]
fn whole_module_exports_short_circuit_their_named_exports() {
    let found = find_controllers(FIXTURE_PATTERN, &FindControllersOptions::default()).unwrap();

    // module_export.rs carries a module export plus two decoys; exactly one
    // result may come out of it.
    let from_module = found
        .iter()
        .filter(|item| item.state.root.paths.first().map(String::as_str) == Some("/shipments"))
        .count();
    assert_eq!(from_module, 1);
}

#[test]
fn decorated_controllers_discover_like_builder_controllers() {
    let found = find_controllers(FIXTURE_PATTERN, &FindControllersOptions::default()).unwrap();

    let reports = found
        .iter()
        .find(|item| item.state.root.paths[0] == "/reports")
        .unwrap();
    assert!(reports.target.is::<ReportController>());

    // Discovery loaded the module, so the state is also in the side table.
    let state = get_state(&ControllerTarget::of::<ReportController>()).unwrap();
    let table = roll_up_state(&state);
    let keys: Vec<&String> = table.keys().collect();
    assert_eq!(keys, ["list", "fetch"]);
    assert_eq!(table["list"].paths, vec!["/reports/"]);
    assert_eq!(
        table["list"]
            .before_middleware
            .iter()
            .map(|m| *m.downcast_ref::<&str>().unwrap())
            .collect::<Vec<_>>(),
        vec!["auth"]
    );
    assert_eq!(table["fetch"].paths, vec!["/reports/{id}"]);
    assert_eq!(
        table["fetch"].verbs,
        vec![rudder::HttpVerb::Get, rudder::HttpVerb::Head]
    );
}

#[test]
fn absolute_paths_resolve_to_the_same_modules() {
    let opts = FindControllersOptions {
        absolute: true,
        ..Default::default()
    };
    let found = find_controllers(FIXTURE_PATTERN, &opts).unwrap();
    assert_eq!(
        prefixes(&found),
        ["/reports", "/invoices", "/shipments", "/users", "/admin"]
    );
}

#[test]
fn empty_match_is_not_an_error() {
    let found =
        find_controllers("tests/fixtures/no_such_*.rs", &FindControllersOptions::default())
            .unwrap();
    assert!(found.is_empty());
}

#[test]
fn unregistered_matched_files_fail_the_whole_batch() {
    let dir = tempfile::tempdir().unwrap();
    let registry = ModuleRegistry::new();

    let known = dir.path().join("known.rs");
    std::fs::File::create(&known)
        .and_then(|mut file| writeln!(file, "// registered"))
        .unwrap();
    let stray = dir.path().join("stray.rs");
    std::fs::File::create(&stray)
        .and_then(|mut file| writeln!(file, "// not registered"))
        .unwrap();

    registry.register(known.to_string_lossy().into_owned(), || {
        struct Known;
        Ok(ModuleExports::module(
            create_controller(ControllerTarget::of::<Known>()).prefix("/known"),
        ))
    });

    let pattern = format!("{}/*.rs", dir.path().display());
    let err = find_controllers_with(&registry, &pattern, &FindControllersOptions::default())
        .unwrap_err();
    assert!(matches!(err, RudderError::ModuleNotRegistered { .. }));
    assert!(err.to_string().contains("stray.rs"));
}

#[test]
fn runtime_registered_modules_discover_like_linked_ones() {
    let dir = tempfile::tempdir().unwrap();
    let registry = ModuleRegistry::new();

    let known = dir.path().join("known.rs");
    std::fs::File::create(&known)
        .and_then(|mut file| writeln!(file, "// registered"))
        .unwrap();
    registry.register(known.to_string_lossy().into_owned(), || {
        struct Known;
        Ok(ModuleExports::module(
            create_controller(ControllerTarget::of::<Known>()).prefix("/known"),
        ))
    });

    let pattern = format!("{}/*.rs", dir.path().display());
    let found =
        find_controllers_with(&registry, &pattern, &FindControllersOptions::default()).unwrap();
    assert_eq!(prefixes(&found), ["/known"]);
}

#[test]
fn find_classes_returns_module_and_default_targets_only() {
    let targets = find_classes(FIXTURE_PATTERN, &FindControllersOptions::default()).unwrap();

    assert_eq!(targets.len(), 2);
    assert!(targets[0].is::<InvoiceApi>());
    assert!(targets[1].downcast_ref::<fn() -> ShipmentApi>().is_some());
}

#[tokio::test]
async fn async_discovery_matches_sync_discovery() {
    let opts = FindControllersOptions {
        es_modules: true,
        ..Default::default()
    };
    let found = find_controllers_async(FIXTURE_PATTERN, &opts).await.unwrap();
    assert_eq!(
        prefixes(&found),
        ["/reports", "/invoices", "/shipments", "/users", "/admin"]
    );
}

/// Importer whose loads finish in reverse file order.
struct InvertedDelayImport;

#[async_trait]
impl ModuleImport for InvertedDelayImport {
    async fn import(&self, path: &str) -> rudder::Result<Arc<ModuleExports>> {
        let delay = if path.ends_with("decorated.rs") {
            50
        } else if path.ends_with("default_export.rs") {
            40
        } else if path.ends_with("mod.rs") {
            30
        } else if path.ends_with("module_export.rs") {
            20
        } else if path.ends_with("named_exports.rs") {
            10
        } else {
            0
        };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        ModuleRegistry::global().load(path)
    }
}

#[tokio::test]
async fn async_results_keep_file_order_regardless_of_completion_order() {
    let opts = FindControllersOptions {
        es_modules: true,
        import: Some(Arc::new(InvertedDelayImport)),
        ..Default::default()
    };
    let found = find_controllers_async(FIXTURE_PATTERN, &opts).await.unwrap();
    assert_eq!(
        prefixes(&found),
        ["/reports", "/invoices", "/shipments", "/users", "/admin"]
    );
}
