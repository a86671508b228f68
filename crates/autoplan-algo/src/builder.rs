//! Core model construction
//!
//! Turns a [`ValidatedNetwork`] into a [`MilpModel`]: one integer variable
//! per cost-table lane, the three-part cost objective and the five core
//! constraint families. Each family emits exactly one constraint per element
//! of its index set, even when the left-hand side ends up with no variables.

use crate::model::{ComparisonOp, LinearConstraint, LinearExpr, MilpModel, VarId, VariableDef};
use autoplan_core::{
    AssemblyPlantId, ComponentType, ConstraintFamily, DealerRegionId, EntityRegistry,
    PartsPlantId, PlanResult, ValidatedNetwork, VehicleModel,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Key of a `componentShipment` variable
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ComponentLane {
    pub parts_plant: PartsPlantId,
    pub assembly_plant: AssemblyPlantId,
    pub component: ComponentType,
}

impl ComponentLane {
    pub fn new(
        parts_plant: impl Into<PartsPlantId>,
        assembly_plant: impl Into<AssemblyPlantId>,
        component: impl Into<ComponentType>,
    ) -> Self {
        Self {
            parts_plant: parts_plant.into(),
            assembly_plant: assembly_plant.into(),
            component: component.into(),
        }
    }
}

impl fmt::Display for ComponentLane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x[{},{},{}]",
            self.parts_plant, self.assembly_plant, self.component
        )
    }
}

/// Key of a `vehicleShipment` variable
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct VehicleLane {
    pub assembly_plant: AssemblyPlantId,
    pub dealer_region: DealerRegionId,
    pub model: VehicleModel,
}

impl VehicleLane {
    pub fn new(
        assembly_plant: impl Into<AssemblyPlantId>,
        dealer_region: impl Into<DealerRegionId>,
        model: impl Into<VehicleModel>,
    ) -> Self {
        Self {
            assembly_plant: assembly_plant.into(),
            dealer_region: dealer_region.into(),
            model: model.into(),
        }
    }
}

impl fmt::Display for VehicleLane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "y[{},{},{}]",
            self.assembly_plant, self.dealer_region, self.model
        )
    }
}

/// Typed lookup from lanes to model variables.
///
/// This is the only view of the model that constraint extensions get.
#[derive(Debug, Clone)]
pub struct PlanVariables {
    component: BTreeMap<ComponentLane, VarId>,
    vehicle: BTreeMap<VehicleLane, VarId>,
    registry: EntityRegistry,
}

impl PlanVariables {
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Variable for a component lane; `None` when no transport lane exists
    pub fn component_shipment(
        &self,
        parts_plant: &PartsPlantId,
        assembly_plant: &AssemblyPlantId,
        component: &ComponentType,
    ) -> Option<VarId> {
        self.component
            .get(&ComponentLane {
                parts_plant: parts_plant.clone(),
                assembly_plant: assembly_plant.clone(),
                component: component.clone(),
            })
            .copied()
    }

    /// Variable for a vehicle lane; `None` when no shipping lane exists
    pub fn vehicle_shipment(
        &self,
        assembly_plant: &AssemblyPlantId,
        dealer_region: &DealerRegionId,
        model: &VehicleModel,
    ) -> Option<VarId> {
        self.vehicle
            .get(&VehicleLane {
                assembly_plant: assembly_plant.clone(),
                dealer_region: dealer_region.clone(),
                model: model.clone(),
            })
            .copied()
    }

    pub fn component_shipments(&self) -> impl Iterator<Item = (&ComponentLane, VarId)> {
        self.component.iter().map(|(lane, var)| (lane, *var))
    }

    pub fn vehicle_shipments(&self) -> impl Iterator<Item = (&VehicleLane, VarId)> {
        self.vehicle.iter().map(|(lane, var)| (lane, *var))
    }

    pub fn len(&self) -> usize {
        self.component.len() + self.vehicle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Σ_s componentShipment[s, p, c]
    pub fn inbound_components(
        &self,
        assembly_plant: &AssemblyPlantId,
        component: &ComponentType,
    ) -> LinearExpr {
        self.component
            .iter()
            .filter(|(lane, _)| &lane.assembly_plant == assembly_plant && &lane.component == component)
            .map(|(_, var)| (*var, 1.0))
            .collect()
    }

    /// Σ_p componentShipment[s, p, c]
    pub fn outbound_components(
        &self,
        parts_plant: &PartsPlantId,
        component: &ComponentType,
    ) -> LinearExpr {
        self.component
            .iter()
            .filter(|(lane, _)| &lane.parts_plant == parts_plant && &lane.component == component)
            .map(|(_, var)| (*var, 1.0))
            .collect()
    }

    /// Σ_p vehicleShipment[p, d, m]
    pub fn vehicles_into(&self, dealer_region: &DealerRegionId, model: &VehicleModel) -> LinearExpr {
        self.vehicle
            .iter()
            .filter(|(lane, _)| &lane.dealer_region == dealer_region && &lane.model == model)
            .map(|(_, var)| (*var, 1.0))
            .collect()
    }

    /// Vehicle lanes leaving an assembly plant
    pub fn vehicles_from<'a>(
        &'a self,
        assembly_plant: &'a AssemblyPlantId,
    ) -> impl Iterator<Item = (&'a VehicleLane, VarId)> + 'a {
        self.vehicle
            .iter()
            .filter(move |(lane, _)| &lane.assembly_plant == assembly_plant)
            .map(|(lane, var)| (lane, *var))
    }
}

/// Build variables, objective and core constraints for a validated network
pub fn build_core_model(network: &ValidatedNetwork) -> PlanResult<(MilpModel, PlanVariables)> {
    let registry = network.registry();
    let mut milp = MilpModel::new();
    let mut objective = LinearExpr::new();

    let mut component = BTreeMap::new();
    for (s, p, c, unit_cost) in network.transport_lanes() {
        let lane = ComponentLane {
            parts_plant: s.clone(),
            assembly_plant: p.clone(),
            component: c.clone(),
        };
        let var = milp.add_variable(VariableDef::non_negative_integer(lane.to_string()));
        objective.add_term(var, unit_cost);
        component.insert(lane, var);
    }

    let mut vehicle = BTreeMap::new();
    for (p, d, m, unit_cost) in network.shipping_lanes() {
        let lane = VehicleLane {
            assembly_plant: p.clone(),
            dealer_region: d.clone(),
            model: m.clone(),
        };
        let var = milp.add_variable(VariableDef::non_negative_integer(lane.to_string()));
        // Assembly is charged once per vehicle shipped
        objective.add_term(var, network.assembly_cost(p, m) + unit_cost);
        vehicle.insert(lane, var);
    }
    milp.set_objective(objective)?;

    let vars = PlanVariables {
        component,
        vehicle,
        registry: registry.clone(),
    };

    // Component flow balance: inbound == consumed, no inventory
    for p in registry.assembly_plants() {
        for c in registry.components() {
            let consumed: LinearExpr = vars
                .vehicles_from(p)
                .map(|(lane, var)| (var, f64::from(network.requirement(&lane.model, c))))
                .collect();
            let lhs = vars.inbound_components(p, c) - consumed;
            milp.add_constraint(
                LinearConstraint::new(format!("flow_{}_{}", p, c), lhs, ComparisonOp::Eq, 0.0)
                    .in_family(ConstraintFamily::ComponentFlow),
            )?;
        }
    }

    for s in registry.parts_plants() {
        for c in registry.components() {
            milp.add_constraint(
                LinearConstraint::new(
                    format!("capacity_{}_{}", s, c),
                    vars.outbound_components(s, c),
                    ComparisonOp::Le,
                    network.capacity(s, c) as f64,
                )
                .in_family(ConstraintFamily::PartsCapacity),
            )?;
        }
    }

    for d in registry.dealer_regions() {
        for m in registry.models() {
            milp.add_constraint(
                LinearConstraint::new(
                    format!("demand_{}_{}", d, m),
                    vars.vehicles_into(d, m),
                    ComparisonOp::Ge,
                    network.demand(d, m) as f64,
                )
                .in_family(ConstraintFamily::Demand),
            )?;
        }
    }

    for p in registry.assembly_plants() {
        let painted: LinearExpr = vars.vehicles_from(p).map(|(_, var)| (var, 1.0)).collect();
        milp.add_constraint(
            LinearConstraint::new(
                format!("paint_{}", p),
                painted,
                ComparisonOp::Le,
                network.paint_capacity(p) as f64,
            )
            .in_family(ConstraintFamily::PaintCapacity),
        )?;

        let hours: LinearExpr = vars
            .vehicles_from(p)
            .map(|(lane, var)| (var, network.labor_requirement(&lane.model)))
            .collect();
        milp.add_constraint(
            LinearConstraint::new(
                format!("labor_{}", p),
                hours,
                ComparisonOp::Le,
                network.labor_hours(p),
            )
            .in_family(ConstraintFamily::Labor),
        )?;
    }

    debug!(
        variables = milp.num_variables(),
        constraints = milp.constraints().len(),
        "core planning model built"
    );

    Ok((milp, vars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoplan_core::NetworkData;

    fn small_network() -> ValidatedNetwork {
        let data = NetworkData::builder()
            .transport("s1", "p1", "chassis", 10.0)
            .transport("s2", "p1", "chassis", 20.0)
            .capacity("s1", "chassis", 100)
            .capacity("s2", "chassis", 1000)
            .shipping("p1", "d1", "basic", 5.0)
            .assembly("p1", "basic", 50.0)
            .demand("d1", "basic", 100)
            .requirement("basic", "chassis", 1)
            .paint("p1", 1000)
            .labor_hours("p1", 10_000.0)
            .labor_requirement("basic", 1.0)
            .build();
        ValidatedNetwork::new(&data).unwrap()
    }

    #[test]
    fn one_variable_per_lane() {
        let network = small_network();
        let (milp, vars) = build_core_model(&network).unwrap();
        assert_eq!(milp.num_variables(), 3);
        assert_eq!(vars.len(), 3);
        assert!(vars
            .component_shipment(&"s1".into(), &"p1".into(), &"chassis".into())
            .is_some());
        assert!(vars
            .vehicle_shipment(&"p1".into(), &"d9".into(), &"basic".into())
            .is_none());
    }

    #[test]
    fn vehicle_objective_combines_assembly_and_shipping() {
        let network = small_network();
        let (milp, vars) = build_core_model(&network).unwrap();
        let y = vars
            .vehicle_shipment(&"p1".into(), &"d1".into(), &"basic".into())
            .unwrap();
        assert_eq!(milp.objective().coefficient(y), 55.0);
    }

    #[test]
    fn flow_balance_subtracts_requirement() {
        let network = small_network();
        let (milp, vars) = build_core_model(&network).unwrap();
        let flow = milp.constraint("flow_p1_chassis").unwrap();
        let y = vars
            .vehicle_shipment(&"p1".into(), &"d1".into(), &"basic".into())
            .unwrap();
        assert_eq!(flow.op, ComparisonOp::Eq);
        assert_eq!(flow.lhs.coefficient(y), -1.0);
        assert_eq!(flow.lhs.len(), 3);
    }

    #[test]
    fn core_constraint_names() {
        let network = small_network();
        let (milp, _) = build_core_model(&network).unwrap();
        let names: Vec<_> = milp.constraints().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "flow_p1_chassis",
                "capacity_s1_chassis",
                "capacity_s2_chassis",
                "demand_d1_basic",
                "paint_p1",
                "labor_p1",
            ]
        );
    }
}
