use autoplan_algo::{solve_quarter, PlanSolverConfig, UtilizationReport};
use autoplan_core::{NetworkData, ValidatedNetwork};

fn single_plant_network() -> NetworkData {
    NetworkData::builder()
        .transport("s1", "p1", "chassis", 10.0)
        .transport("s1", "p1", "engine", 5.0)
        .capacity("s1", "chassis", 400)
        .capacity("s1", "engine", 0)
        .shipping("p1", "d1", "basic", 5.0)
        .shipping("p1", "d1", "luxury", 8.0)
        .assembly("p1", "basic", 50.0)
        .assembly("p1", "luxury", 90.0)
        .demand("d1", "basic", 100)
        .demand("d1", "luxury", 50)
        .requirement("basic", "chassis", 1)
        .requirement("luxury", "chassis", 2)
        .requirement("basic", "engine", 0)
        .requirement("luxury", "engine", 0)
        .paint("p1", 200)
        .labor_hours("p1", 1000.0)
        .labor_requirement("basic", 2.0)
        .labor_requirement("luxury", 4.0)
        .build()
}

#[test]
fn report_aggregates_plant_utilization() {
    let network = ValidatedNetwork::new(&single_plant_network()).unwrap();
    let plan = solve_quarter(&network, &[], &PlanSolverConfig::default()).unwrap();
    let report = UtilizationReport::new(&network, &plan);

    let p1 = report.assembly_plant(&"p1".into()).unwrap();
    assert_eq!(p1.produced[&"basic".into()], 100);
    assert_eq!(p1.produced[&"luxury".into()], 50);
    assert_eq!(p1.total_vehicles, 150);
    assert_eq!(p1.paint_utilization_pct, Some(75.0));
    assert_eq!(p1.labor_hours_used, 400.0);
    assert_eq!(p1.labor_utilization_pct, Some(40.0));

    let chassis = report.parts_plant(&"s1".into(), &"chassis".into()).unwrap();
    assert_eq!(chassis.used, 200);
    assert_eq!(chassis.utilization_pct, Some(50.0));

    // Zero capacity leaves utilization undefined
    let engine = report.parts_plant(&"s1".into(), &"engine".into()).unwrap();
    assert_eq!(engine.used, 0);
    assert_eq!(engine.utilization_pct, None);
}

#[test]
fn report_summary_and_json() {
    let network = ValidatedNetwork::new(&single_plant_network()).unwrap();
    let plan = solve_quarter(&network, &[], &PlanSolverConfig::default()).unwrap();
    let report = UtilizationReport::new(&network, &plan);

    // 200*10 + 100*55 + 50*98
    assert_eq!(report.costs.total, 12_400.0);
    let summary = report.summary();
    assert!(summary.contains("Total Cost: $12400.00"));
    assert!(summary.contains("Paint: 150/200 (75.0%)"));
    assert!(summary.contains("s1 engine: 0/0 (n/a)"));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["assembly"][0]["assembly_plant"], "p1");
    assert!(json["parts"][1]["utilization_pct"].is_null());
}
