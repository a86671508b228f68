use anyhow::{anyhow, Context, Result};
use autoplan_algo::ComparisonOp;
use autoplan_core::{
    AssemblyCost, AssemblyPlantId, ComponentType, DealerRegionId, Demand, LaborHours,
    LaborRequirement, PaintCapacity, PartsCapacity, PartsPlantId, ShippingCost, TransportCost,
    VehicleModel,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// One what-if scenario: table overrides plus constraint edits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub scenario_id: String,
    pub description: Option<String>,
    #[serde(default)]
    pub capacity: Vec<PartsCapacity>,
    #[serde(default)]
    pub demand: Vec<Demand>,
    #[serde(default)]
    pub paint_capacity: Vec<PaintCapacity>,
    #[serde(default)]
    pub labor_hours: Vec<LaborHours>,
    #[serde(default)]
    pub labor_requirement: Vec<LaborRequirement>,
    #[serde(default)]
    pub transport_cost: Vec<TransportCost>,
    #[serde(default)]
    pub shipping_cost: Vec<ShippingCost>,
    #[serde(default)]
    pub assembly_cost: Vec<AssemblyCost>,
    /// Multiplies every demand after overrides, rounded up
    pub demand_scale: Option<f64>,
    #[serde(default)]
    pub add_constraints: Vec<DeclaredConstraint>,
    /// Removed after `add_constraints`, so core and added rows both qualify
    #[serde(default)]
    pub remove_constraints: Vec<String>,
}

impl ScenarioSpec {
    pub fn override_count(&self) -> usize {
        self.capacity.len()
            + self.demand.len()
            + self.paint_capacity.len()
            + self.labor_hours.len()
            + self.labor_requirement.len()
            + self.transport_cost.len()
            + self.shipping_cost.len()
            + self.assembly_cost.len()
    }
}

/// `Σ coefficient · selected variables  op  rhs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredConstraint {
    pub name: String,
    pub terms: Vec<DeclaredTerm>,
    pub op: ComparisonOp,
    pub rhs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredTerm {
    #[serde(default = "default_coefficient")]
    pub coefficient: f64,
    pub selector: VariableSelector,
}

fn default_coefficient() -> f64 {
    1.0
}

/// Picks variables of one family; omitted fields match anything
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variable", rename_all = "snake_case")]
pub enum VariableSelector {
    ComponentShipment {
        #[serde(default)]
        parts_plant: Option<PartsPlantId>,
        #[serde(default)]
        assembly_plant: Option<AssemblyPlantId>,
        #[serde(default)]
        component: Option<ComponentType>,
    },
    VehicleShipment {
        #[serde(default)]
        assembly_plant: Option<AssemblyPlantId>,
        #[serde(default)]
        dealer_region: Option<DealerRegionId>,
        #[serde(default)]
        model: Option<VehicleModel>,
    },
}

pub fn load_scenario_from_path(path: &Path) -> Result<ScenarioSpec> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading scenario '{}'", path.display()))?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            serde_yaml::from_str(&data).context("parsing scenario yaml")
        }
        Some(ext) if ext.eq_ignore_ascii_case("json") => {
            serde_json::from_str(&data).context("parsing scenario json")
        }
        _ => serde_yaml::from_str(&data)
            .or_else(|_| serde_json::from_str(&data))
            .context("parsing scenario"),
    }
}

pub fn validate(spec: &ScenarioSpec) -> Result<()> {
    if spec.scenario_id.trim().is_empty() {
        return Err(anyhow!("scenario_id cannot be empty"));
    }
    if let Some(scale) = spec.demand_scale {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(anyhow!(
                "scenario '{}': demand_scale must be positive, got {}",
                spec.scenario_id,
                scale
            ));
        }
    }
    let mut seen = HashSet::new();
    for constraint in &spec.add_constraints {
        if constraint.name.trim().is_empty() {
            return Err(anyhow!(
                "scenario '{}': constraint name cannot be empty",
                spec.scenario_id
            ));
        }
        if !seen.insert(constraint.name.as_str()) {
            return Err(anyhow!(
                "scenario '{}': duplicate constraint '{}'",
                spec.scenario_id,
                constraint.name
            ));
        }
        if !constraint.rhs.is_finite()
            || constraint.terms.iter().any(|t| !t.coefficient.is_finite())
        {
            return Err(anyhow!(
                "scenario '{}': constraint '{}' has a non-finite number",
                spec.scenario_id,
                constraint.name
            ));
        }
    }
    if let Some(name) = spec.remove_constraints.iter().find(|n| n.trim().is_empty()) {
        return Err(anyhow!(
            "scenario '{}': empty name in remove_constraints ('{}')",
            spec.scenario_id,
            name
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
scenario_id: tight-paint
description: Plant 1 paint shop under maintenance
paint_capacity:
  - assembly_plant: assembly_plant1
    vehicles: 2000
demand_scale: 1.1
add_constraints:
  - name: luxury_from_plant2
    op: ">="
    rhs: 500
    terms:
      - selector:
          variable: vehicle_shipment
          assembly_plant: assembly_plant2
          model: luxury
remove_constraints:
  - labor_assembly_plant2
"#;

    #[test]
    fn parses_yaml_scenario() {
        let spec: ScenarioSpec = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(spec.scenario_id, "tight-paint");
        assert_eq!(spec.override_count(), 1);
        assert_eq!(spec.demand_scale, Some(1.1));
        let term = &spec.add_constraints[0].terms[0];
        assert_eq!(term.coefficient, 1.0);
        assert!(matches!(
            &term.selector,
            VariableSelector::VehicleShipment { dealer_region: None, model: Some(m), .. }
                if m.as_str() == "luxury"
        ));
        assert_eq!(spec.add_constraints[0].op, ComparisonOp::Ge);
        validate(&spec).unwrap();
    }

    #[test]
    fn rejects_duplicate_constraint_names() {
        let mut spec: ScenarioSpec = serde_yaml::from_str(SAMPLE).unwrap();
        spec.add_constraints.push(spec.add_constraints[0].clone());
        let err = validate(&spec).unwrap_err();
        assert!(err.to_string().contains("duplicate constraint"));
    }

    #[test]
    fn rejects_non_positive_scale_and_empty_id() {
        let mut spec: ScenarioSpec = serde_yaml::from_str(SAMPLE).unwrap();
        spec.demand_scale = Some(0.0);
        assert!(validate(&spec).is_err());

        let spec = ScenarioSpec::default();
        assert!(validate(&spec).is_err());
    }
}
