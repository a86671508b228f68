use anyhow::Result;
use autoplan_algo::PlanModel;
use autoplan_cli::InputArgs;
use autoplan_core::ValidatedNetwork;
use autoplan_scenarios::apply_scenario_constraints;
use std::io::{self, Write};
use tabwriter::TabWriter;

use crate::commands::util::load_input;

pub fn handle(input: &InputArgs, list_constraints: bool) -> Result<()> {
    let loaded = load_input(input)?;
    let network = ValidatedNetwork::new(&loaded.data)?;
    let mut model = PlanModel::build(&network)?;
    if let Some(spec) = &loaded.scenario {
        apply_scenario_constraints(&mut model, spec)?;
    }

    let registry = network.registry();
    let vars = model.variables();
    println!("Entities:");
    println!("  Parts plants    : {}", registry.parts_plants().len());
    println!("  Assembly plants : {}", registry.assembly_plants().len());
    println!("  Dealer regions  : {}", registry.dealer_regions().len());
    println!("  Components      : {}", registry.components().len());
    println!("  Models          : {}", registry.models().len());
    println!("Variables:");
    println!("  Component shipments : {}", vars.component_shipments().count());
    println!("  Vehicle shipments   : {}", vars.vehicle_shipments().count());

    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "FAMILY\tCONSTRAINTS")?;
    for count in model.family_counts() {
        writeln!(writer, "{}\t{}", count.family, count.constraints)?;
    }
    writer.flush()?;

    if list_constraints {
        for constraint in model.milp().constraints() {
            println!("{}", constraint);
        }
    }
    Ok(())
}
