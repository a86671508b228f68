//! The planning model and its solved plan
//!
//! [`PlanModel`] owns the MILP built from a validated network and exposes
//! the extension hook (add, apply, remove by name). [`PlanModel::solve`]
//! returns a [`ProductionPlan`] only when the solver proves optimality and
//! the values it returns satisfy every constraint. Every other outcome is an
//! error carrying the active constraint families.

use crate::builder::{build_core_model, ComponentLane, PlanVariables, VehicleLane};
use crate::extension::ConstraintExtension;
use crate::model::{LinearConstraint, MilpModel, FEASIBILITY_TOLERANCE};
use crate::solver::{GoodLpAdapter, PlanSolverConfig, SolveOutcome, SolverAdapter};
use autoplan_core::{
    AssemblyPlantId, ComponentType, DealerRegionId, FamilyCount, PartsPlantId, PlanError,
    PlanResult, SolveStatus, ValidatedNetwork, VehicleModel,
};
use serde::Serialize;
use tracing::{debug, info, warn};
use web_time::Instant;

/// A built, solvable planning model
#[derive(Debug, Clone)]
pub struct PlanModel<'n> {
    network: &'n ValidatedNetwork,
    milp: MilpModel,
    variables: PlanVariables,
}

impl<'n> PlanModel<'n> {
    /// Build variables, objective and the five core constraint families
    pub fn build(network: &'n ValidatedNetwork) -> PlanResult<Self> {
        let (milp, variables) = build_core_model(network)?;
        info!(
            variables = milp.num_variables(),
            constraints = milp.constraints().len(),
            "planning model built"
        );
        Ok(Self {
            network,
            milp,
            variables,
        })
    }

    pub fn network(&self) -> &ValidatedNetwork {
        self.network
    }

    pub fn variables(&self) -> &PlanVariables {
        &self.variables
    }

    pub fn milp(&self) -> &MilpModel {
        &self.milp
    }

    /// Inject a named constraint; duplicate names are rejected
    pub fn add_constraint(&mut self, constraint: LinearConstraint) -> PlanResult<()> {
        debug!(constraint = %constraint.name, "adding constraint");
        self.milp.add_constraint(constraint)
    }

    /// Apply an extension, all or nothing. Returns how many constraints it added.
    pub fn apply_extension(&mut self, extension: &dyn ConstraintExtension) -> PlanResult<usize> {
        let constraints = extension.constraints(&self.variables)?;
        let mut staged = self.milp.clone();
        for constraint in constraints.iter().cloned() {
            staged.add_constraint(constraint)?;
        }
        self.milp = staged;
        info!(
            extension = extension.name(),
            added = constraints.len(),
            "extension applied"
        );
        Ok(constraints.len())
    }

    /// Remove a core or injected constraint by name
    pub fn remove_constraint(&mut self, name: &str) -> PlanResult<LinearConstraint> {
        let removed = self.milp.remove_constraint(name)?;
        debug!(constraint = name, "constraint removed");
        Ok(removed)
    }

    pub fn constraint_names(&self) -> impl Iterator<Item = &str> {
        self.milp.constraints().iter().map(|c| c.name.as_str())
    }

    pub fn family_counts(&self) -> Vec<FamilyCount> {
        self.milp.family_counts()
    }

    /// Hand the model to a solver and interpret the outcome
    pub fn solve(&self, adapter: &dyn SolverAdapter) -> PlanResult<ProductionPlan> {
        let start = Instant::now();
        let outcome = adapter.solve(&self.milp)?;
        let elapsed = start.elapsed();

        let values = match outcome {
            SolveOutcome {
                status: SolveStatus::Optimal,
                values: Some(values),
                ..
            } => values,
            SolveOutcome {
                status: SolveStatus::Optimal,
                values: None,
                ..
            } => {
                return Err(PlanError::Solver(format!(
                    "{} reported optimal without variable values",
                    adapter.name()
                )))
            }
            SolveOutcome {
                status, message, ..
            } => return Err(self.outcome_error(status, message)),
        };

        if values.len() != self.milp.num_variables() {
            return Err(PlanError::Solver(format!(
                "{} returned {} values for {} variables",
                adapter.name(),
                values.len(),
                self.milp.num_variables()
            )));
        }
        let violated = self.milp.violated_constraints(&values, FEASIBILITY_TOLERANCE);
        if !violated.is_empty() {
            warn!(constraints = ?violated, "solved values violate constraints");
            return Err(PlanError::Solver(format!(
                "{} returned values violating {:?}",
                adapter.name(),
                violated
            )));
        }

        let plan = ProductionPlan::from_values(
            self.network,
            &self.variables,
            &values,
            adapter.name(),
            elapsed.as_secs_f64() * 1000.0,
        );
        info!(
            objective = plan.objective_value,
            solve_time_ms = plan.solve_time_ms,
            backend = adapter.name(),
            "plan solved"
        );
        Ok(plan)
    }

    fn outcome_error(&self, status: SolveStatus, message: String) -> PlanError {
        let active_families = self.family_counts();
        warn!(%status, %message, "solver did not return an optimal plan");
        match status {
            SolveStatus::Infeasible => PlanError::InfeasibleModel { active_families },
            SolveStatus::Unbounded => PlanError::UnboundedModel { active_families },
            SolveStatus::NotSolved | SolveStatus::Optimal => PlanError::SolverInconclusive {
                reason: message,
                active_families,
            },
        }
    }
}

/// Build, extend and solve one quarter with the good_lp adapter
pub fn solve_quarter(
    network: &ValidatedNetwork,
    extensions: &[&dyn ConstraintExtension],
    config: &PlanSolverConfig,
) -> PlanResult<ProductionPlan> {
    let mut model = PlanModel::build(network)?;
    for extension in extensions {
        model.apply_extension(*extension)?;
    }
    let adapter = GoodLpAdapter::new(config.clone())?;
    model.solve(&adapter)
}

/// Cost split of the objective
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CostBreakdown {
    pub transport: f64,
    pub assembly: f64,
    pub shipping: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentShipment {
    #[serde(flatten)]
    pub lane: ComponentLane,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleShipment {
    #[serde(flatten)]
    pub lane: VehicleLane,
    pub quantity: u64,
}

/// An optimal plan. Only [`PlanModel::solve`] creates one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionPlan {
    pub status: SolveStatus,
    pub objective_value: f64,
    pub costs: CostBreakdown,
    pub component_shipments: Vec<ComponentShipment>,
    pub vehicle_shipments: Vec<VehicleShipment>,
    pub solve_time_ms: f64,
    pub backend: String,
}

impl ProductionPlan {
    fn from_values(
        network: &ValidatedNetwork,
        vars: &PlanVariables,
        values: &[f64],
        backend: &str,
        solve_time_ms: f64,
    ) -> Self {
        let quantity = |index: usize| values[index].round().max(0.0) as u64;
        let mut costs = CostBreakdown::default();

        let component_shipments: Vec<ComponentShipment> = vars
            .component_shipments()
            .map(|(lane, var)| {
                let q = quantity(var.index());
                let unit = network
                    .transport_cost(&lane.parts_plant, &lane.assembly_plant, &lane.component)
                    .unwrap_or(0.0);
                costs.transport += unit * q as f64;
                ComponentShipment {
                    lane: lane.clone(),
                    quantity: q,
                }
            })
            .collect();

        let vehicle_shipments: Vec<VehicleShipment> = vars
            .vehicle_shipments()
            .map(|(lane, var)| {
                let q = quantity(var.index());
                costs.assembly += network.assembly_cost(&lane.assembly_plant, &lane.model) * q as f64;
                let unit = network
                    .shipping_cost(&lane.assembly_plant, &lane.dealer_region, &lane.model)
                    .unwrap_or(0.0);
                costs.shipping += unit * q as f64;
                VehicleShipment {
                    lane: lane.clone(),
                    quantity: q,
                }
            })
            .collect();

        costs.total = costs.transport + costs.assembly + costs.shipping;

        Self {
            status: SolveStatus::Optimal,
            objective_value: costs.total,
            costs,
            component_shipments,
            vehicle_shipments,
            solve_time_ms,
            backend: backend.to_string(),
        }
    }

    pub fn component_quantity(
        &self,
        parts_plant: &PartsPlantId,
        assembly_plant: &AssemblyPlantId,
        component: &ComponentType,
    ) -> u64 {
        self.component_shipments
            .iter()
            .find(|s| {
                &s.lane.parts_plant == parts_plant
                    && &s.lane.assembly_plant == assembly_plant
                    && &s.lane.component == component
            })
            .map(|s| s.quantity)
            .unwrap_or(0)
    }

    pub fn vehicle_quantity(
        &self,
        assembly_plant: &AssemblyPlantId,
        dealer_region: &DealerRegionId,
        model: &VehicleModel,
    ) -> u64 {
        self.vehicle_shipments
            .iter()
            .find(|s| {
                &s.lane.assembly_plant == assembly_plant
                    && &s.lane.dealer_region == dealer_region
                    && &s.lane.model == model
            })
            .map(|s| s.quantity)
            .unwrap_or(0)
    }

    /// Vehicles of a model delivered into a region from all plants
    pub fn delivered(&self, dealer_region: &DealerRegionId, model: &VehicleModel) -> u64 {
        self.vehicle_shipments
            .iter()
            .filter(|s| &s.lane.dealer_region == dealer_region && &s.lane.model == model)
            .map(|s| s.quantity)
            .sum()
    }

    /// Vehicles leaving an assembly plant, all models and regions
    pub fn vehicles_from(&self, assembly_plant: &AssemblyPlantId) -> u64 {
        self.vehicle_shipments
            .iter()
            .filter(|s| &s.lane.assembly_plant == assembly_plant)
            .map(|s| s.quantity)
            .sum()
    }

    /// Units of a component leaving a parts plant
    pub fn components_from(&self, parts_plant: &PartsPlantId, component: &ComponentType) -> u64 {
        self.component_shipments
            .iter()
            .filter(|s| &s.lane.parts_plant == parts_plant && &s.lane.component == component)
            .map(|s| s.quantity)
            .sum()
    }

    /// Units of a component arriving at an assembly plant
    pub fn components_into(
        &self,
        assembly_plant: &AssemblyPlantId,
        component: &ComponentType,
    ) -> u64 {
        self.component_shipments
            .iter()
            .filter(|s| &s.lane.assembly_plant == assembly_plant && &s.lane.component == component)
            .map(|s| s.quantity)
            .sum()
    }
}
