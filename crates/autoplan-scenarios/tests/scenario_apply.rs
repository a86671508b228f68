use autoplan_algo::{GoodLpAdapter, PlanModel};
use autoplan_core::{EntityKind, NetworkData, PlanError, SolveStatus, ValidatedNetwork};
use autoplan_scenarios::{
    apply_data_overrides, apply_scenario_constraints, load_scenario_from_path, validate,
    ScenarioSpec,
};
use std::fs;
use tempfile::tempdir;

fn parse(yaml: &str) -> ScenarioSpec {
    let spec: ScenarioSpec = serde_yaml::from_str(yaml).unwrap();
    validate(&spec).unwrap();
    spec
}

#[test]
fn overrides_replace_rows_and_scale_demand() {
    let spec = parse(
        r#"
scenario_id: growth
demand:
  - dealer_region: dealer_region1
    model: basic
    quantity: 2000
demand_scale: 1.1
"#,
    );
    let data = apply_data_overrides(&NetworkData::quarterly_baseline(), &spec);
    let quantity = |region: &str, model: &str| {
        data.demand
            .iter()
            .find(|r| r.dealer_region.as_str() == region && r.model.as_str() == model)
            .map(|r| r.quantity)
            .unwrap()
    };
    assert_eq!(quantity("dealer_region1", "basic"), 2200);
    assert_eq!(quantity("dealer_region2", "basic"), 1760);
    assert_eq!(quantity("dealer_region3", "luxury"), 880);
    assert_eq!(data.demand.len(), 6);
}

#[test]
fn declared_constraint_forces_routing() {
    let spec = parse(
        r#"
scenario_id: luxury-at-plant2
add_constraints:
  - name: luxury_from_plant2
    op: ">="
    rhs: 1800
    terms:
      - selector:
          variable: vehicle_shipment
          assembly_plant: assembly_plant2
          model: luxury
"#,
    );
    let network = ValidatedNetwork::new(&NetworkData::quarterly_baseline()).unwrap();
    let mut model = PlanModel::build(&network).unwrap();
    let edits = apply_scenario_constraints(&mut model, &spec).unwrap();
    assert_eq!(edits.added, 1);

    let added = model.milp().constraint("luxury_from_plant2").unwrap();
    assert_eq!(added.lhs.len(), 3);

    let plan = model.solve(&GoodLpAdapter::default()).unwrap();
    let from_plant2: u64 = plan
        .vehicle_shipments
        .iter()
        .filter(|s| s.lane.assembly_plant.as_str() == "assembly_plant2" && s.lane.model.as_str() == "luxury")
        .map(|s| s.quantity)
        .sum();
    assert!(from_plant2 >= 1800);
}

#[test]
fn unknown_entity_in_selector_is_rejected() {
    let spec = parse(
        r#"
scenario_id: typo
add_constraints:
  - name: bad
    op: "<="
    rhs: 10
    terms:
      - coefficient: 2
        selector:
          variable: component_shipment
          parts_plant: parts_plant9
"#,
    );
    let network = ValidatedNetwork::new(&NetworkData::quarterly_baseline()).unwrap();
    let mut model = PlanModel::build(&network).unwrap();
    let before = model.milp().constraints().len();
    let err = apply_scenario_constraints(&mut model, &spec).unwrap_err();
    match err.downcast_ref::<PlanError>() {
        Some(PlanError::UnknownEntity { kind, id }) => {
            assert_eq!(*kind, EntityKind::PartsPlant);
            assert_eq!(id, "parts_plant9");
        }
        other => panic!("expected UnknownEntity, got {other:?}"),
    }
    assert_eq!(model.milp().constraints().len(), before);
}

#[test]
fn removing_core_paint_rows_relaxes_a_tight_scenario() {
    let tight = parse(
        r#"
scenario_id: paint-outage
paint_capacity:
  - assembly_plant: assembly_plant1
    vehicles: 1000
  - assembly_plant: assembly_plant2
    vehicles: 1000
"#,
    );
    let data = apply_data_overrides(&NetworkData::quarterly_baseline(), &tight);
    let network = ValidatedNetwork::new(&data).unwrap();
    let model = PlanModel::build(&network).unwrap();
    let err = model.solve(&GoodLpAdapter::default()).unwrap_err();
    assert_eq!(err.status(), Some(SolveStatus::Infeasible));

    let mut relaxed = tight.clone();
    relaxed.remove_constraints = vec![
        "paint_assembly_plant1".to_string(),
        "paint_assembly_plant2".to_string(),
    ];
    let mut model = PlanModel::build(&network).unwrap();
    let edits = apply_scenario_constraints(&mut model, &relaxed).unwrap();
    assert_eq!(edits.removed.len(), 2);
    assert!(model.solve(&GoodLpAdapter::default()).is_ok());
}

#[test]
fn removing_unknown_constraint_fails() {
    let spec = parse(
        r#"
scenario_id: stale
remove_constraints: [paint_assembly_plant9]
"#,
    );
    let network = ValidatedNetwork::new(&NetworkData::quarterly_baseline()).unwrap();
    let mut model = PlanModel::build(&network).unwrap();
    let err = apply_scenario_constraints(&mut model, &spec).unwrap_err();
    assert!(format!("{err:#}").contains("no constraint named 'paint_assembly_plant9'"));
}

#[test]
fn failed_removal_leaves_model_untouched() {
    let spec = parse(
        r#"
scenario_id: partly-stale
add_constraints:
  - name: plant1_basic_cap
    op: "<="
    rhs: 2000
    terms:
      - selector:
          variable: vehicle_shipment
          assembly_plant: assembly_plant1
          model: basic
remove_constraints: [paint_assembly_plant1, paint_assembly_plant9]
"#,
    );
    let network = ValidatedNetwork::new(&NetworkData::quarterly_baseline()).unwrap();
    let mut model = PlanModel::build(&network).unwrap();
    let before: Vec<String> = model.constraint_names().map(str::to_string).collect();

    assert!(apply_scenario_constraints(&mut model, &spec).is_err());

    let after: Vec<String> = model.constraint_names().map(str::to_string).collect();
    assert_eq!(after, before);
    assert!(model.milp().constraint("plant1_basic_cap").is_none());
    assert!(model.milp().constraint("paint_assembly_plant1").is_some());
}

#[test]
fn loads_json_scenario_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scenario.json");
    fs::write(
        &path,
        r#"{"scenario_id": "json-case", "labor_requirement": [{"model": "luxury", "hours": 30.0}]}"#,
    )
    .unwrap();
    let spec = load_scenario_from_path(&path).unwrap();
    assert_eq!(spec.scenario_id, "json-case");
    assert_eq!(spec.labor_requirement[0].hours, 30.0);
}
