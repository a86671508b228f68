//! Network data files through validation

use autoplan_core::{
    load_network, save_network, validate_network, NetworkData, PlanError, Severity,
    ValidatedNetwork,
};
use std::fs;
use tempfile::tempdir;

#[test]
fn saved_baseline_reloads_and_validates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("quarter.yaml");
    save_network(&path, &NetworkData::quarterly_baseline()).unwrap();

    let data = load_network(&path).unwrap();
    let network = ValidatedNetwork::new(&data).unwrap();
    assert_eq!(network.registry().parts_plants().len(), 3);
    assert_eq!(network.diagnostics().summary(), "No issues");
}

#[test]
fn hand_written_toml_with_stray_region() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("quarter.toml");
    fs::write(
        &path,
        r#"
[[transport_costs]]
parts_plant = "s1"
assembly_plant = "p1"
component = "chassis"
unit_cost = 10.0

[[parts_capacity]]
parts_plant = "s1"
component = "chassis"
quantity = 100

[[shipping_costs]]
assembly_plant = "p1"
dealer_region = "north"
model = "basic"
unit_cost = 5.0

[[assembly_costs]]
assembly_plant = "p1"
model = "basic"
unit_cost = 50.0

[[demand]]
dealer_region = "north"
model = "basic"
quantity = 10

[[demand]]
dealer_region = "south"
model = "basic"
quantity = 10

[[component_requirements]]
model = "basic"
component = "chassis"
count = 1

[[paint_capacity]]
assembly_plant = "p1"
vehicles = 100

[[labor_hours]]
assembly_plant = "p1"
hours = 500.0

[[labor_requirements]]
model = "basic"
hours = 2.0
"#,
    )
    .unwrap();

    let data = load_network(&path).unwrap();
    let diag = validate_network(&data);
    assert_eq!(diag.count(Severity::Error), 1);
    let issue = diag.of_severity(Severity::Error).next().unwrap();
    assert_eq!(issue.entity.as_deref(), Some("south"));

    match ValidatedNetwork::new(&data) {
        Err(PlanError::DataInconsistency { issues }) => assert_eq!(issues.len(), 1),
        other => panic!("expected DataInconsistency, got {other:?}"),
    }
}
