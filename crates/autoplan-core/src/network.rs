//! Network data tables
//!
//! Each table is a list of rows. Rows are plain structs so the whole
//! [`NetworkData`] serializes to JSON, YAML or TOML without tuple keys.

use crate::{AssemblyPlantId, ComponentType, DealerRegionId, PartsPlantId, VehicleModel};
use serde::{Deserialize, Serialize};

/// Maximum units of a component a parts plant can supply per quarter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartsCapacity {
    pub parts_plant: PartsPlantId,
    pub component: ComponentType,
    pub quantity: u64,
}

/// Cost to move one component unit from a parts plant to an assembly plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportCost {
    pub parts_plant: PartsPlantId,
    pub assembly_plant: AssemblyPlantId,
    pub component: ComponentType,
    pub unit_cost: f64,
}

/// Cost to assemble one vehicle of a model at an assembly plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyCost {
    pub assembly_plant: AssemblyPlantId,
    pub model: VehicleModel,
    pub unit_cost: f64,
}

/// Cost to ship one finished vehicle from an assembly plant to a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingCost {
    pub assembly_plant: AssemblyPlantId,
    pub dealer_region: DealerRegionId,
    pub model: VehicleModel,
    pub unit_cost: f64,
}

/// Minimum vehicles of a model a dealer region needs this quarter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demand {
    pub dealer_region: DealerRegionId,
    pub model: VehicleModel,
    pub quantity: u64,
}

/// Component units consumed by one vehicle of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRequirement {
    pub model: VehicleModel,
    pub component: ComponentType,
    pub count: u32,
}

/// Vehicles (any model) an assembly plant's paint shop can handle per quarter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintCapacity {
    pub assembly_plant: AssemblyPlantId,
    pub vehicles: u64,
}

/// Labor hours available at an assembly plant per quarter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborHours {
    pub assembly_plant: AssemblyPlantId,
    pub hours: f64,
}

/// Labor hours needed to assemble one vehicle of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborRequirement {
    pub model: VehicleModel,
    pub hours: f64,
}

/// All static facts for one planning quarter.
///
/// Loaded once and never mutated during a solve. Scenario overrides work on
/// a clone through the `upsert_*` methods, which replace the row with the
/// same key or append a new one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkData {
    #[serde(default)]
    pub parts_capacity: Vec<PartsCapacity>,
    #[serde(default)]
    pub transport_costs: Vec<TransportCost>,
    #[serde(default)]
    pub assembly_costs: Vec<AssemblyCost>,
    #[serde(default)]
    pub shipping_costs: Vec<ShippingCost>,
    #[serde(default)]
    pub demand: Vec<Demand>,
    #[serde(default)]
    pub component_requirements: Vec<ComponentRequirement>,
    #[serde(default)]
    pub paint_capacity: Vec<PaintCapacity>,
    #[serde(default)]
    pub labor_hours: Vec<LaborHours>,
    #[serde(default)]
    pub labor_requirements: Vec<LaborRequirement>,
}

impl NetworkData {
    /// Create empty network data
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fluent builder
    pub fn builder() -> NetworkDataBuilder {
        NetworkDataBuilder::default()
    }

    /// Total number of rows across all tables
    pub fn row_count(&self) -> usize {
        self.parts_capacity.len()
            + self.transport_costs.len()
            + self.assembly_costs.len()
            + self.shipping_costs.len()
            + self.demand.len()
            + self.component_requirements.len()
            + self.paint_capacity.len()
            + self.labor_hours.len()
            + self.labor_requirements.len()
    }

    pub fn upsert_capacity(&mut self, row: PartsCapacity) {
        match self
            .parts_capacity
            .iter_mut()
            .find(|r| r.parts_plant == row.parts_plant && r.component == row.component)
        {
            Some(existing) => *existing = row,
            None => self.parts_capacity.push(row),
        }
    }

    pub fn upsert_transport_cost(&mut self, row: TransportCost) {
        match self.transport_costs.iter_mut().find(|r| {
            r.parts_plant == row.parts_plant
                && r.assembly_plant == row.assembly_plant
                && r.component == row.component
        }) {
            Some(existing) => *existing = row,
            None => self.transport_costs.push(row),
        }
    }

    pub fn upsert_assembly_cost(&mut self, row: AssemblyCost) {
        match self
            .assembly_costs
            .iter_mut()
            .find(|r| r.assembly_plant == row.assembly_plant && r.model == row.model)
        {
            Some(existing) => *existing = row,
            None => self.assembly_costs.push(row),
        }
    }

    pub fn upsert_shipping_cost(&mut self, row: ShippingCost) {
        match self.shipping_costs.iter_mut().find(|r| {
            r.assembly_plant == row.assembly_plant
                && r.dealer_region == row.dealer_region
                && r.model == row.model
        }) {
            Some(existing) => *existing = row,
            None => self.shipping_costs.push(row),
        }
    }

    pub fn upsert_demand(&mut self, row: Demand) {
        match self
            .demand
            .iter_mut()
            .find(|r| r.dealer_region == row.dealer_region && r.model == row.model)
        {
            Some(existing) => *existing = row,
            None => self.demand.push(row),
        }
    }

    pub fn upsert_requirement(&mut self, row: ComponentRequirement) {
        match self
            .component_requirements
            .iter_mut()
            .find(|r| r.model == row.model && r.component == row.component)
        {
            Some(existing) => *existing = row,
            None => self.component_requirements.push(row),
        }
    }

    pub fn upsert_paint_capacity(&mut self, row: PaintCapacity) {
        match self
            .paint_capacity
            .iter_mut()
            .find(|r| r.assembly_plant == row.assembly_plant)
        {
            Some(existing) => *existing = row,
            None => self.paint_capacity.push(row),
        }
    }

    pub fn upsert_labor_hours(&mut self, row: LaborHours) {
        match self
            .labor_hours
            .iter_mut()
            .find(|r| r.assembly_plant == row.assembly_plant)
        {
            Some(existing) => *existing = row,
            None => self.labor_hours.push(row),
        }
    }

    pub fn upsert_labor_requirement(&mut self, row: LaborRequirement) {
        match self
            .labor_requirements
            .iter_mut()
            .find(|r| r.model == row.model)
        {
            Some(existing) => *existing = row,
            None => self.labor_requirements.push(row),
        }
    }
}

/// Builder for constructing [`NetworkData`] row by row.
///
/// Later calls for the same key overwrite earlier ones.
#[derive(Debug, Default)]
pub struct NetworkDataBuilder {
    data: NetworkData,
}

impl NetworkDataBuilder {
    /// Add a parts plant capacity
    pub fn capacity(
        mut self,
        parts_plant: impl Into<PartsPlantId>,
        component: impl Into<ComponentType>,
        quantity: u64,
    ) -> Self {
        self.data.upsert_capacity(PartsCapacity {
            parts_plant: parts_plant.into(),
            component: component.into(),
            quantity,
        });
        self
    }

    /// Add a component transport lane with its unit cost
    pub fn transport(
        mut self,
        parts_plant: impl Into<PartsPlantId>,
        assembly_plant: impl Into<AssemblyPlantId>,
        component: impl Into<ComponentType>,
        unit_cost: f64,
    ) -> Self {
        self.data.upsert_transport_cost(TransportCost {
            parts_plant: parts_plant.into(),
            assembly_plant: assembly_plant.into(),
            component: component.into(),
            unit_cost,
        });
        self
    }

    /// Add an assembly cost
    pub fn assembly(
        mut self,
        assembly_plant: impl Into<AssemblyPlantId>,
        model: impl Into<VehicleModel>,
        unit_cost: f64,
    ) -> Self {
        self.data.upsert_assembly_cost(AssemblyCost {
            assembly_plant: assembly_plant.into(),
            model: model.into(),
            unit_cost,
        });
        self
    }

    /// Add a vehicle shipping lane with its unit cost
    pub fn shipping(
        mut self,
        assembly_plant: impl Into<AssemblyPlantId>,
        dealer_region: impl Into<DealerRegionId>,
        model: impl Into<VehicleModel>,
        unit_cost: f64,
    ) -> Self {
        self.data.upsert_shipping_cost(ShippingCost {
            assembly_plant: assembly_plant.into(),
            dealer_region: dealer_region.into(),
            model: model.into(),
            unit_cost,
        });
        self
    }

    /// Add a regional demand
    pub fn demand(
        mut self,
        dealer_region: impl Into<DealerRegionId>,
        model: impl Into<VehicleModel>,
        quantity: u64,
    ) -> Self {
        self.data.upsert_demand(Demand {
            dealer_region: dealer_region.into(),
            model: model.into(),
            quantity,
        });
        self
    }

    /// Add a bill-of-materials entry
    pub fn requirement(
        mut self,
        model: impl Into<VehicleModel>,
        component: impl Into<ComponentType>,
        count: u32,
    ) -> Self {
        self.data.upsert_requirement(ComponentRequirement {
            model: model.into(),
            component: component.into(),
            count,
        });
        self
    }

    /// Set a plant's paint shop capacity
    pub fn paint(mut self, assembly_plant: impl Into<AssemblyPlantId>, vehicles: u64) -> Self {
        self.data.upsert_paint_capacity(PaintCapacity {
            assembly_plant: assembly_plant.into(),
            vehicles,
        });
        self
    }

    /// Set a plant's available labor hours
    pub fn labor_hours(mut self, assembly_plant: impl Into<AssemblyPlantId>, hours: f64) -> Self {
        self.data.upsert_labor_hours(LaborHours {
            assembly_plant: assembly_plant.into(),
            hours,
        });
        self
    }

    /// Set the labor hours per vehicle of a model
    pub fn labor_requirement(mut self, model: impl Into<VehicleModel>, hours: f64) -> Self {
        self.data.upsert_labor_requirement(LaborRequirement {
            model: model.into(),
            hours,
        });
        self
    }

    pub fn build(self) -> NetworkData {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overwrites_rows_with_same_key() {
        let data = NetworkData::builder()
            .capacity("s1", "chassis", 100)
            .capacity("s1", "chassis", 250)
            .capacity("s1", "engine", 80)
            .build();

        assert_eq!(data.parts_capacity.len(), 2);
        assert_eq!(data.parts_capacity[0].quantity, 250);
    }

    #[test]
    fn upsert_appends_unknown_keys() {
        let mut data = NetworkData::new();
        data.upsert_demand(Demand {
            dealer_region: DealerRegionId::new("d1"),
            model: VehicleModel::new("basic"),
            quantity: 10,
        });
        data.upsert_demand(Demand {
            dealer_region: DealerRegionId::new("d1"),
            model: VehicleModel::new("luxury"),
            quantity: 5,
        });
        assert_eq!(data.demand.len(), 2);
        assert_eq!(data.row_count(), 2);
    }

    #[test]
    fn missing_tables_deserialize_as_empty() {
        let data: NetworkData = serde_json::from_str(r#"{"demand": []}"#).unwrap();
        assert!(data.transport_costs.is_empty());
        assert!(data.labor_requirements.is_empty());
    }
}
