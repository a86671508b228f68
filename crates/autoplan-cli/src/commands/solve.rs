//! `autoplan solve`

use anyhow::{Context, Result};
use autoplan_algo::{
    GoodLpAdapter, MilpSolverKind, PlanModel, PlanSolverConfig, ProductionPlan, UtilizationReport,
};
use autoplan_cli::{InputArgs, OutputFormat};
use autoplan_core::{PlanError, ValidatedNetwork};
use autoplan_scenarios::apply_scenario_constraints;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tabwriter::TabWriter;
use tracing::info;
use uuid::Uuid;

use crate::commands::util::{load_input, load_solver_config};

pub struct SolveArgs<'a> {
    pub input: &'a InputArgs,
    pub config: Option<&'a Path>,
    pub solver: Option<&'a str>,
    pub time_limit: Option<f64>,
    pub mip_gap: Option<f64>,
    pub format: OutputFormat,
    pub out: Option<&'a Path>,
}

/// JSON document written by `--out` and `--format json`
#[derive(Debug, Serialize)]
struct SolveOutput<'a> {
    run_id: String,
    generated_at: DateTime<Utc>,
    scenario_id: Option<&'a str>,
    solver: &'a PlanSolverConfig,
    plan: &'a ProductionPlan,
    report: &'a UtilizationReport,
}

pub fn handle(args: SolveArgs<'_>) -> Result<()> {
    let mut config = load_solver_config(args.config)?;
    if let Some(label) = args.solver {
        config.solver = label.parse::<MilpSolverKind>()?;
    }
    if args.time_limit.is_some() {
        config.time_limit_seconds = args.time_limit;
    }
    if args.mip_gap.is_some() {
        config.mip_gap = args.mip_gap;
    }
    let adapter = GoodLpAdapter::new(config.clone())?;

    let loaded = load_input(args.input)?;
    let network = ValidatedNetwork::new(&loaded.data).context("validating network data")?;
    let mut model = PlanModel::build(&network)?;
    if let Some(spec) = &loaded.scenario {
        apply_scenario_constraints(&mut model, spec)?;
    }

    let plan = match model.solve(&adapter) {
        Ok(plan) => plan,
        Err(err) => {
            if let Some(status) = err.status() {
                println!("Status: {}", status);
            }
            return Err(solve_error(err));
        }
    };
    let report = UtilizationReport::new(&network, &plan);

    let output = SolveOutput {
        run_id: Uuid::new_v4().to_string(),
        generated_at: Utc::now(),
        scenario_id: loaded.scenario.as_ref().map(|s| s.scenario_id.as_str()),
        solver: &config,
        plan: &plan,
        report: &report,
    };
    let json = serde_json::to_string_pretty(&output).context("serializing plan")?;

    if let Some(out) = args.out {
        if let Some(parent) = out.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating '{}'", parent.display()))?;
            }
        }
        fs::write(out, &json).with_context(|| format!("writing '{}'", out.display()))?;
        info!(path = %out.display(), run_id = %output.run_id, "plan written");
    }

    match args.format {
        OutputFormat::Json => println!("{json}"),
        OutputFormat::Plain => {
            println!("Status: {}", plan.status);
            print!("{}", report.summary());
            print_shipments(&plan)?;
            println!("\nSolve time: {:.1} ms ({})", plan.solve_time_ms, plan.backend);
            if let Some(out) = args.out {
                println!("Results written to {}", out.display());
            }
        }
    }
    Ok(())
}

fn print_shipments(plan: &ProductionPlan) -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "\nASSEMBLY PLANT\tDEALER REGION\tMODEL\tVEHICLES")?;
    for shipment in plan.vehicle_shipments.iter().filter(|s| s.quantity > 0) {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            shipment.lane.assembly_plant,
            shipment.lane.dealer_region,
            shipment.lane.model,
            shipment.quantity
        )?;
    }
    writeln!(writer, "\nPARTS PLANT\tASSEMBLY PLANT\tCOMPONENT\tUNITS")?;
    for shipment in plan.component_shipments.iter().filter(|s| s.quantity > 0) {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            shipment.lane.parts_plant,
            shipment.lane.assembly_plant,
            shipment.lane.component,
            shipment.quantity
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn solve_error(err: PlanError) -> anyhow::Error {
    anyhow::Error::new(err).context("solving quarterly plan")
}
