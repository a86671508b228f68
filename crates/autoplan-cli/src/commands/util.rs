use anyhow::{Context, Result};
use autoplan_algo::PlanSolverConfig;
use autoplan_cli::InputArgs;
use autoplan_core::{load_network, NetworkData};
use autoplan_scenarios::{apply_data_overrides, load_scenario_from_path, validate, ScenarioSpec};
use std::fs;
use std::path::Path;
use tracing::info;

/// Network data with scenario overrides already applied
pub struct LoadedInput {
    pub data: NetworkData,
    pub scenario: Option<ScenarioSpec>,
}

pub fn load_input(input: &InputArgs) -> Result<LoadedInput> {
    let base = match &input.network {
        Some(path) => load_network(path)
            .with_context(|| format!("loading network data '{}'", path.display()))?,
        None => {
            info!("no --network given, using the built-in reference quarter");
            NetworkData::quarterly_baseline()
        }
    };

    let scenario = match &input.scenario {
        Some(path) => {
            let spec = load_scenario_from_path(path)?;
            validate(&spec).with_context(|| format!("validating scenario '{}'", path.display()))?;
            Some(spec)
        }
        None => None,
    };

    let data = match &scenario {
        Some(spec) => apply_data_overrides(&base, spec),
        None => base,
    };
    Ok(LoadedInput { data, scenario })
}

pub fn load_solver_config(path: Option<&Path>) -> Result<PlanSolverConfig> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading solver config '{}'", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("parsing solver config '{}'", path.display()))
        }
        None => Ok(PlanSolverConfig::default()),
    }
}
