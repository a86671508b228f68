use anyhow::{Context, Result};
use autoplan_algo::{
    ConstraintExtension, LinearConstraint, LinearExpr, PlanModel, PlanVariables, VarId,
};
use autoplan_core::{NetworkData, PlanResult};
use tracing::{debug, info};

use crate::spec::{DeclaredConstraint, ScenarioSpec, VariableSelector};

/// Return a copy of `data` with the scenario's table overrides applied.
///
/// Each override row replaces the row with the same key or is appended.
/// `demand_scale` runs last and rounds scaled demand up.
pub fn apply_data_overrides(data: &NetworkData, spec: &ScenarioSpec) -> NetworkData {
    let mut out = data.clone();
    for row in &spec.capacity {
        out.upsert_capacity(row.clone());
    }
    for row in &spec.demand {
        out.upsert_demand(row.clone());
    }
    for row in &spec.paint_capacity {
        out.upsert_paint_capacity(row.clone());
    }
    for row in &spec.labor_hours {
        out.upsert_labor_hours(row.clone());
    }
    for row in &spec.labor_requirement {
        out.upsert_labor_requirement(row.clone());
    }
    for row in &spec.transport_cost {
        out.upsert_transport_cost(row.clone());
    }
    for row in &spec.shipping_cost {
        out.upsert_shipping_cost(row.clone());
    }
    for row in &spec.assembly_cost {
        out.upsert_assembly_cost(row.clone());
    }
    if let Some(scale) = spec.demand_scale {
        for row in &mut out.demand {
            // Tolerance keeps 1000 * 1.1 at 1100
            row.quantity = (row.quantity as f64 * scale - 1e-9).ceil() as u64;
        }
    }
    info!(
        scenario = %spec.scenario_id,
        overrides = spec.override_count(),
        demand_scale = spec.demand_scale.unwrap_or(1.0),
        "scenario data overrides applied"
    );
    out
}

/// Declared scenario constraints as a [`ConstraintExtension`]
pub struct DeclaredConstraints<'a> {
    scenario_id: &'a str,
    constraints: &'a [DeclaredConstraint],
}

impl<'a> DeclaredConstraints<'a> {
    pub fn new(spec: &'a ScenarioSpec) -> Self {
        Self {
            scenario_id: &spec.scenario_id,
            constraints: &spec.add_constraints,
        }
    }
}

impl ConstraintExtension for DeclaredConstraints<'_> {
    fn name(&self) -> &str {
        self.scenario_id
    }

    fn constraints(&self, vars: &PlanVariables) -> PlanResult<Vec<LinearConstraint>> {
        self.constraints
            .iter()
            .map(|declared| {
                let mut lhs = LinearExpr::new();
                for term in &declared.terms {
                    let matched = select(vars, &term.selector)?;
                    if matched.is_empty() {
                        debug!(constraint = %declared.name, "selector matches no variable");
                    }
                    for var in matched {
                        lhs.add_term(var, term.coefficient);
                    }
                }
                Ok(LinearConstraint::new(
                    declared.name.clone(),
                    lhs,
                    declared.op,
                    declared.rhs,
                ))
            })
            .collect()
    }
}

/// Variables matching a selector, after checking its entities exist
fn select(vars: &PlanVariables, selector: &VariableSelector) -> PlanResult<Vec<VarId>> {
    let registry = vars.registry();
    match selector {
        VariableSelector::ComponentShipment {
            parts_plant,
            assembly_plant,
            component,
        } => {
            if let Some(id) = parts_plant {
                registry.require_parts_plant(id)?;
            }
            if let Some(id) = assembly_plant {
                registry.require_assembly_plant(id)?;
            }
            if let Some(id) = component {
                registry.require_component(id)?;
            }
            Ok(vars
                .component_shipments()
                .filter(|(lane, _)| {
                    parts_plant.as_ref().map_or(true, |s| s == &lane.parts_plant)
                        && assembly_plant.as_ref().map_or(true, |p| p == &lane.assembly_plant)
                        && component.as_ref().map_or(true, |c| c == &lane.component)
                })
                .map(|(_, var)| var)
                .collect())
        }
        VariableSelector::VehicleShipment {
            assembly_plant,
            dealer_region,
            model,
        } => {
            if let Some(id) = assembly_plant {
                registry.require_assembly_plant(id)?;
            }
            if let Some(id) = dealer_region {
                registry.require_dealer_region(id)?;
            }
            if let Some(id) = model {
                registry.require_model(id)?;
            }
            Ok(vars
                .vehicle_shipments()
                .filter(|(lane, _)| {
                    assembly_plant.as_ref().map_or(true, |p| p == &lane.assembly_plant)
                        && dealer_region.as_ref().map_or(true, |d| d == &lane.dealer_region)
                        && model.as_ref().map_or(true, |m| m == &lane.model)
                })
                .map(|(_, var)| var)
                .collect())
        }
    }
}

/// What a scenario changed in a built model
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioEdits {
    pub added: usize,
    pub removed: Vec<String>,
}

/// Add the scenario's declared constraints, then remove the named ones.
///
/// Edits are staged on a copy; on error `model` is left as it was.
pub fn apply_scenario_constraints(
    model: &mut PlanModel<'_>,
    spec: &ScenarioSpec,
) -> Result<ScenarioEdits> {
    let mut staged = model.clone();
    let added = staged
        .apply_extension(&DeclaredConstraints::new(spec))
        .with_context(|| format!("adding constraints of scenario '{}'", spec.scenario_id))?;
    let mut removed = Vec::with_capacity(spec.remove_constraints.len());
    for name in &spec.remove_constraints {
        staged
            .remove_constraint(name)
            .with_context(|| format!("scenario '{}'", spec.scenario_id))?;
        removed.push(name.clone());
    }
    *model = staged;
    info!(
        scenario = %spec.scenario_id,
        added,
        removed = removed.len(),
        "scenario constraints applied"
    );
    Ok(ScenarioEdits { added, removed })
}
