//! Utilization report over an optimal plan
//!
//! Pure aggregation: nothing here touches the model or the solver. Building
//! a report needs a [`ProductionPlan`], which only exists for optimal solves.

use crate::plan::{CostBreakdown, ProductionPlan};
use autoplan_core::{AssemblyPlantId, ComponentType, PartsPlantId, ValidatedNetwork, VehicleModel};
use serde::Serialize;
use std::collections::BTreeMap;

/// Production and resource use at one assembly plant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssemblyUtilization {
    pub assembly_plant: AssemblyPlantId,
    /// Vehicles produced per model (every model listed, zero included)
    pub produced: BTreeMap<VehicleModel, u64>,
    pub total_vehicles: u64,
    pub paint_capacity: u64,
    /// `None` when paint capacity is zero
    pub paint_utilization_pct: Option<f64>,
    pub labor_hours_used: f64,
    pub labor_hours_available: f64,
    pub labor_utilization_pct: Option<f64>,
}

/// Supply use of one component at one parts plant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartsUtilization {
    pub parts_plant: PartsPlantId,
    pub component: ComponentType,
    pub used: u64,
    pub capacity: u64,
    /// `None` when capacity is zero
    pub utilization_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilizationReport {
    pub objective_value: f64,
    pub costs: CostBreakdown,
    pub assembly: Vec<AssemblyUtilization>,
    pub parts: Vec<PartsUtilization>,
}

fn percent(used: f64, available: f64) -> Option<f64> {
    if available > 0.0 {
        Some(used / available * 100.0)
    } else {
        None
    }
}

impl UtilizationReport {
    pub fn new(network: &ValidatedNetwork, plan: &ProductionPlan) -> Self {
        let registry = network.registry();

        let assembly = registry
            .assembly_plants()
            .iter()
            .map(|plant| {
                let mut produced: BTreeMap<VehicleModel, u64> =
                    registry.models().iter().map(|m| (m.clone(), 0)).collect();
                let mut labor_hours_used = 0.0;
                for shipment in plan
                    .vehicle_shipments
                    .iter()
                    .filter(|s| &s.lane.assembly_plant == plant)
                {
                    *produced.entry(shipment.lane.model.clone()).or_insert(0) += shipment.quantity;
                    labor_hours_used +=
                        shipment.quantity as f64 * network.labor_requirement(&shipment.lane.model);
                }
                let total_vehicles: u64 = produced.values().sum();
                let paint_capacity = network.paint_capacity(plant);
                let labor_hours_available = network.labor_hours(plant);
                AssemblyUtilization {
                    assembly_plant: plant.clone(),
                    produced,
                    total_vehicles,
                    paint_capacity,
                    paint_utilization_pct: percent(total_vehicles as f64, paint_capacity as f64),
                    labor_hours_used,
                    labor_hours_available,
                    labor_utilization_pct: percent(labor_hours_used, labor_hours_available),
                }
            })
            .collect();

        let mut parts = Vec::new();
        for plant in registry.parts_plants() {
            for component in registry.components() {
                let used = plan.components_from(plant, component);
                let capacity = network.capacity(plant, component);
                parts.push(PartsUtilization {
                    parts_plant: plant.clone(),
                    component: component.clone(),
                    used,
                    capacity,
                    utilization_pct: percent(used as f64, capacity as f64),
                });
            }
        }

        Self {
            objective_value: plan.objective_value,
            costs: plan.costs,
            assembly,
            parts,
        }
    }

    pub fn assembly_plant(&self, id: &AssemblyPlantId) -> Option<&AssemblyUtilization> {
        self.assembly.iter().find(|a| &a.assembly_plant == id)
    }

    pub fn parts_plant(
        &self,
        plant: &PartsPlantId,
        component: &ComponentType,
    ) -> Option<&PartsUtilization> {
        self.parts
            .iter()
            .find(|p| &p.parts_plant == plant && &p.component == component)
    }

    /// Format a human-readable summary
    pub fn summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Quarterly Plan Summary\n{}\n", "=".repeat(40)));
        s.push_str(&format!("Total Cost: ${:.2}\n", self.costs.total));
        s.push_str(&format!("  Transport: ${:.2}\n", self.costs.transport));
        s.push_str(&format!("  Assembly: ${:.2}\n", self.costs.assembly));
        s.push_str(&format!("  Shipping: ${:.2}\n", self.costs.shipping));

        s.push_str("\nAssembly Plants:\n");
        for plant in &self.assembly {
            s.push_str(&format!("  {}:\n", plant.assembly_plant));
            for (model, count) in &plant.produced {
                s.push_str(&format!("    {}: {}\n", model, count));
            }
            s.push_str(&format!(
                "    Paint: {}/{} ({})\n",
                plant.total_vehicles,
                plant.paint_capacity,
                format_pct(plant.paint_utilization_pct)
            ));
            s.push_str(&format!(
                "    Labor: {:.0}/{:.0} h ({})\n",
                plant.labor_hours_used,
                plant.labor_hours_available,
                format_pct(plant.labor_utilization_pct)
            ));
        }

        s.push_str("\nParts Plants:\n");
        for row in &self.parts {
            s.push_str(&format!(
                "  {} {}: {}/{} ({})\n",
                row.parts_plant,
                row.component,
                row.used,
                row.capacity,
                format_pct(row.utilization_pct)
            ));
        }
        s
    }
}

/// `"87.5%"`, or `"n/a"` for undefined utilization
pub fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_undefined_for_zero_capacity() {
        assert_eq!(percent(0.0, 0.0), None);
        assert_eq!(percent(5.0, 20.0), Some(25.0));
        assert_eq!(format_pct(None), "n/a");
        assert_eq!(format_pct(Some(87.46)), "87.5%");
    }
}
