use anyhow::{bail, Result};
use autoplan_algo::PlanModel;
use autoplan_cli::InputArgs;
use autoplan_core::{validate_network, ValidatedNetwork};
use autoplan_scenarios::apply_scenario_constraints;
use std::io::{self, Write};
use tabwriter::TabWriter;

use crate::commands::util::load_input;

pub fn handle(input: &InputArgs) -> Result<()> {
    let loaded = load_input(input)?;
    let diag = validate_network(&loaded.data);

    if !diag.issues.is_empty() {
        let mut writer = TabWriter::new(io::stdout());
        writeln!(writer, "SEVERITY\tCATEGORY\tENTITY\tMESSAGE")?;
        for issue in &diag.issues {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}",
                issue.severity,
                issue.category,
                issue.entity.as_deref().unwrap_or("-"),
                issue.message
            )?;
        }
        writer.flush()?;
    }
    println!("Network data: {}", diag.summary());

    if diag.has_errors() {
        bail!("network data is inconsistent ({})", diag.summary());
    }

    // Scenario constraints can only be checked against a built model
    if let Some(spec) = &loaded.scenario {
        let network = ValidatedNetwork::new(&loaded.data)?;
        let mut model = PlanModel::build(&network)?;
        let edits = apply_scenario_constraints(&mut model, spec)?;
        println!(
            "Scenario '{}': {} constraint(s) added, {} removed",
            spec.scenario_id,
            edits.added,
            edits.removed.len()
        );
    }
    Ok(())
}
