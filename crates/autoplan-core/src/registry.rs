//! Entity registry and validation pass
//!
//! The planning model only knows entities that appear in a cost table:
//! parts plants, assembly plants and components come from transport lanes,
//! assembly plants, dealer regions and vehicle models from shipping lanes.
//! [`EntityRegistry`] makes that derivation explicit. [`ValidatedNetwork`]
//! then checks every other table against it and indexes all tables for the
//! model builder.
//!
//! ## Rules
//!
//! Errors (the model would silently drop or misread data):
//! - an entity in a capacity/demand/requirement/paint/labor/assembly table
//!   that appears in no cost table
//! - a lookup a decision variable depends on is missing (capacity of a
//!   supplying plant, assembly cost of a shipped model, paint and labor of a
//!   shipping plant, labor per model, requirement per model and component)
//! - duplicate rows, non-finite costs, negative or non-finite hours
//!
//! Warnings (the model is still well defined):
//! - a shipped (region, model) pair without demand row (treated as zero)
//! - positive demand without any shipping lane into the region
//! - an assembly plant with lanes on only one side

use crate::diagnostics::{Diagnostics, Severity};
use crate::error::{PlanError, PlanResult};
use crate::{
    AssemblyPlantId, ComponentType, DealerRegionId, NetworkData, PartsPlantId, VehicleModel,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, warn};

/// Kind of entity known to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    PartsPlant,
    AssemblyPlant,
    DealerRegion,
    Component,
    Model,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::PartsPlant => "parts plant",
            EntityKind::AssemblyPlant => "assembly plant",
            EntityKind::DealerRegion => "dealer region",
            EntityKind::Component => "component",
            EntityKind::Model => "vehicle model",
        };
        f.write_str(label)
    }
}

/// Entities reachable through at least one cost table, in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntityRegistry {
    parts_plants: BTreeSet<PartsPlantId>,
    assembly_plants: BTreeSet<AssemblyPlantId>,
    dealer_regions: BTreeSet<DealerRegionId>,
    components: BTreeSet<ComponentType>,
    models: BTreeSet<VehicleModel>,
}

impl EntityRegistry {
    /// Derive the registry from transport and shipping lanes
    pub fn from_cost_tables(data: &NetworkData) -> Self {
        let mut registry = Self::default();
        for lane in &data.transport_costs {
            registry.parts_plants.insert(lane.parts_plant.clone());
            registry.assembly_plants.insert(lane.assembly_plant.clone());
            registry.components.insert(lane.component.clone());
        }
        for lane in &data.shipping_costs {
            registry.assembly_plants.insert(lane.assembly_plant.clone());
            registry.dealer_regions.insert(lane.dealer_region.clone());
            registry.models.insert(lane.model.clone());
        }
        registry
    }

    pub fn parts_plants(&self) -> &BTreeSet<PartsPlantId> {
        &self.parts_plants
    }

    pub fn assembly_plants(&self) -> &BTreeSet<AssemblyPlantId> {
        &self.assembly_plants
    }

    pub fn dealer_regions(&self) -> &BTreeSet<DealerRegionId> {
        &self.dealer_regions
    }

    pub fn components(&self) -> &BTreeSet<ComponentType> {
        &self.components
    }

    pub fn models(&self) -> &BTreeSet<VehicleModel> {
        &self.models
    }

    pub fn require_parts_plant(&self, id: &PartsPlantId) -> PlanResult<()> {
        require(&self.parts_plants, id, EntityKind::PartsPlant)
    }

    pub fn require_assembly_plant(&self, id: &AssemblyPlantId) -> PlanResult<()> {
        require(&self.assembly_plants, id, EntityKind::AssemblyPlant)
    }

    pub fn require_dealer_region(&self, id: &DealerRegionId) -> PlanResult<()> {
        require(&self.dealer_regions, id, EntityKind::DealerRegion)
    }

    pub fn require_component(&self, id: &ComponentType) -> PlanResult<()> {
        require(&self.components, id, EntityKind::Component)
    }

    pub fn require_model(&self, id: &VehicleModel) -> PlanResult<()> {
        require(&self.models, id, EntityKind::Model)
    }
}

fn require<T: Ord + fmt::Display>(set: &BTreeSet<T>, id: &T, kind: EntityKind) -> PlanResult<()> {
    if set.contains(id) {
        Ok(())
    } else {
        Err(PlanError::UnknownEntity {
            kind,
            id: id.to_string(),
        })
    }
}

type TransportKey = (PartsPlantId, AssemblyPlantId, ComponentType);
type ShippingKey = (AssemblyPlantId, DealerRegionId, VehicleModel);

/// Network data that passed validation, indexed for model construction.
///
/// Lookups for keys that validation allows to be absent (e.g. demand of an
/// unlisted region/model pair) return zero.
#[derive(Debug, Clone)]
pub struct ValidatedNetwork {
    registry: EntityRegistry,
    transport: BTreeMap<TransportKey, f64>,
    shipping: BTreeMap<ShippingKey, f64>,
    assembly: BTreeMap<(AssemblyPlantId, VehicleModel), f64>,
    capacity: BTreeMap<(PartsPlantId, ComponentType), u64>,
    demand: BTreeMap<(DealerRegionId, VehicleModel), u64>,
    requirements: BTreeMap<(VehicleModel, ComponentType), u32>,
    paint: BTreeMap<AssemblyPlantId, u64>,
    labor_hours: BTreeMap<AssemblyPlantId, f64>,
    labor_requirements: BTreeMap<VehicleModel, f64>,
    diagnostics: Diagnostics,
}

impl ValidatedNetwork {
    /// Validate and index network data.
    ///
    /// Returns [`PlanError::DataInconsistency`] listing every error issue if
    /// any rule is violated. Warnings are logged and kept in
    /// [`ValidatedNetwork::diagnostics`].
    pub fn new(data: &NetworkData) -> PlanResult<Self> {
        let network = analyze(data);
        if network.diagnostics.has_errors() {
            return Err(PlanError::DataInconsistency {
                issues: network.diagnostics.of_severity(Severity::Error).cloned().collect(),
            });
        }
        for issue in network.diagnostics.of_severity(Severity::Warning) {
            warn!("{}", issue);
        }
        debug!(
            parts_plants = network.registry.parts_plants.len(),
            assembly_plants = network.registry.assembly_plants.len(),
            dealer_regions = network.registry.dealer_regions.len(),
            components = network.registry.components.len(),
            models = network.registry.models.len(),
            "network validated"
        );
        Ok(network)
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Transport lanes with their unit cost, in key order
    pub fn transport_lanes(
        &self,
    ) -> impl Iterator<Item = (&PartsPlantId, &AssemblyPlantId, &ComponentType, f64)> {
        self.transport
            .iter()
            .map(|((s, p, c), cost)| (s, p, c, *cost))
    }

    /// Shipping lanes with their unit cost, in key order
    pub fn shipping_lanes(
        &self,
    ) -> impl Iterator<Item = (&AssemblyPlantId, &DealerRegionId, &VehicleModel, f64)> {
        self.shipping
            .iter()
            .map(|((p, d, m), cost)| (p, d, m, *cost))
    }

    pub fn transport_cost(
        &self,
        parts_plant: &PartsPlantId,
        assembly_plant: &AssemblyPlantId,
        component: &ComponentType,
    ) -> Option<f64> {
        self.transport
            .get(&(parts_plant.clone(), assembly_plant.clone(), component.clone()))
            .copied()
    }

    pub fn shipping_cost(
        &self,
        assembly_plant: &AssemblyPlantId,
        dealer_region: &DealerRegionId,
        model: &VehicleModel,
    ) -> Option<f64> {
        self.shipping
            .get(&(assembly_plant.clone(), dealer_region.clone(), model.clone()))
            .copied()
    }

    pub fn assembly_cost(&self, assembly_plant: &AssemblyPlantId, model: &VehicleModel) -> f64 {
        self.assembly
            .get(&(assembly_plant.clone(), model.clone()))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn capacity(&self, parts_plant: &PartsPlantId, component: &ComponentType) -> u64 {
        self.capacity
            .get(&(parts_plant.clone(), component.clone()))
            .copied()
            .unwrap_or(0)
    }

    pub fn demand(&self, dealer_region: &DealerRegionId, model: &VehicleModel) -> u64 {
        self.demand
            .get(&(dealer_region.clone(), model.clone()))
            .copied()
            .unwrap_or(0)
    }

    pub fn requirement(&self, model: &VehicleModel, component: &ComponentType) -> u32 {
        self.requirements
            .get(&(model.clone(), component.clone()))
            .copied()
            .unwrap_or(0)
    }

    pub fn paint_capacity(&self, assembly_plant: &AssemblyPlantId) -> u64 {
        self.paint.get(assembly_plant).copied().unwrap_or(0)
    }

    pub fn labor_hours(&self, assembly_plant: &AssemblyPlantId) -> f64 {
        self.labor_hours.get(assembly_plant).copied().unwrap_or(0.0)
    }

    pub fn labor_requirement(&self, model: &VehicleModel) -> f64 {
        self.labor_requirements.get(model).copied().unwrap_or(0.0)
    }
}

/// Run the validation pass without failing, for reporting.
pub fn validate_network(data: &NetworkData) -> Diagnostics {
    analyze(data).diagnostics
}

fn analyze(data: &NetworkData) -> ValidatedNetwork {
    let mut diag = Diagnostics::new();
    let registry = EntityRegistry::from_cost_tables(data);

    if data.transport_costs.is_empty() {
        diag.error("empty", "No transport lanes declared");
    }
    if data.shipping_costs.is_empty() {
        diag.error("empty", "No shipping lanes declared");
    }

    let mut transport = BTreeMap::new();
    for row in &data.transport_costs {
        let entity = format!("{}/{}/{}", row.parts_plant, row.assembly_plant, row.component);
        check_cost(&mut diag, row.unit_cost, "transport", &entity);
        let key = (
            row.parts_plant.clone(),
            row.assembly_plant.clone(),
            row.component.clone(),
        );
        if transport.insert(key, row.unit_cost).is_some() {
            duplicate(&mut diag, "transport_costs", &entity);
        }
    }

    let mut shipping = BTreeMap::new();
    for row in &data.shipping_costs {
        let entity = format!("{}/{}/{}", row.assembly_plant, row.dealer_region, row.model);
        check_cost(&mut diag, row.unit_cost, "shipping", &entity);
        let key = (
            row.assembly_plant.clone(),
            row.dealer_region.clone(),
            row.model.clone(),
        );
        if shipping.insert(key, row.unit_cost).is_some() {
            duplicate(&mut diag, "shipping_costs", &entity);
        }
    }

    let mut assembly = BTreeMap::new();
    for row in &data.assembly_costs {
        let entity = format!("{}/{}", row.assembly_plant, row.model);
        check_ref(
            &mut diag,
            registry.assembly_plants(),
            &row.assembly_plant,
            EntityKind::AssemblyPlant,
            "assembly_costs",
        );
        check_ref(&mut diag, registry.models(), &row.model, EntityKind::Model, "assembly_costs");
        check_cost(&mut diag, row.unit_cost, "assembly", &entity);
        if assembly
            .insert((row.assembly_plant.clone(), row.model.clone()), row.unit_cost)
            .is_some()
        {
            duplicate(&mut diag, "assembly_costs", &entity);
        }
    }

    let mut capacity = BTreeMap::new();
    for row in &data.parts_capacity {
        check_ref(
            &mut diag,
            registry.parts_plants(),
            &row.parts_plant,
            EntityKind::PartsPlant,
            "parts_capacity",
        );
        check_ref(
            &mut diag,
            registry.components(),
            &row.component,
            EntityKind::Component,
            "parts_capacity",
        );
        if capacity
            .insert((row.parts_plant.clone(), row.component.clone()), row.quantity)
            .is_some()
        {
            duplicate(
                &mut diag,
                "parts_capacity",
                &format!("{}/{}", row.parts_plant, row.component),
            );
        }
    }

    let mut demand = BTreeMap::new();
    for row in &data.demand {
        check_ref(
            &mut diag,
            registry.dealer_regions(),
            &row.dealer_region,
            EntityKind::DealerRegion,
            "demand",
        );
        check_ref(&mut diag, registry.models(), &row.model, EntityKind::Model, "demand");
        if demand
            .insert((row.dealer_region.clone(), row.model.clone()), row.quantity)
            .is_some()
        {
            duplicate(&mut diag, "demand", &format!("{}/{}", row.dealer_region, row.model));
        }
    }

    let mut requirements = BTreeMap::new();
    for row in &data.component_requirements {
        check_ref(
            &mut diag,
            registry.models(),
            &row.model,
            EntityKind::Model,
            "component_requirements",
        );
        check_ref(
            &mut diag,
            registry.components(),
            &row.component,
            EntityKind::Component,
            "component_requirements",
        );
        if requirements
            .insert((row.model.clone(), row.component.clone()), row.count)
            .is_some()
        {
            duplicate(
                &mut diag,
                "component_requirements",
                &format!("{}/{}", row.model, row.component),
            );
        }
    }

    let mut paint = BTreeMap::new();
    for row in &data.paint_capacity {
        check_ref(
            &mut diag,
            registry.assembly_plants(),
            &row.assembly_plant,
            EntityKind::AssemblyPlant,
            "paint_capacity",
        );
        if paint.insert(row.assembly_plant.clone(), row.vehicles).is_some() {
            duplicate(&mut diag, "paint_capacity", row.assembly_plant.as_str());
        }
    }

    let mut labor_hours = BTreeMap::new();
    for row in &data.labor_hours {
        check_ref(
            &mut diag,
            registry.assembly_plants(),
            &row.assembly_plant,
            EntityKind::AssemblyPlant,
            "labor_hours",
        );
        check_hours(&mut diag, row.hours, row.assembly_plant.as_str());
        if labor_hours.insert(row.assembly_plant.clone(), row.hours).is_some() {
            duplicate(&mut diag, "labor_hours", row.assembly_plant.as_str());
        }
    }

    let mut labor_requirements = BTreeMap::new();
    for row in &data.labor_requirements {
        check_ref(
            &mut diag,
            registry.models(),
            &row.model,
            EntityKind::Model,
            "labor_requirements",
        );
        check_hours(&mut diag, row.hours, row.model.as_str());
        if labor_requirements.insert(row.model.clone(), row.hours).is_some() {
            duplicate(&mut diag, "labor_requirements", row.model.as_str());
        }
    }

    // Lookups every decision variable depends on
    let supplied: BTreeSet<(&PartsPlantId, &ComponentType)> =
        transport.keys().map(|(s, _, c)| (s, c)).collect();
    for (s, c) in supplied {
        if !capacity.contains_key(&(s.clone(), c.clone())) {
            diag.error_at(
                "missing",
                "No capacity declared for a supplying parts plant",
                &format!("{}/{}", s, c),
            );
        }
    }

    let assembled: BTreeSet<(&AssemblyPlantId, &VehicleModel)> =
        shipping.keys().map(|(p, _, m)| (p, m)).collect();
    for (p, m) in assembled {
        if !assembly.contains_key(&(p.clone(), m.clone())) {
            diag.error_at(
                "missing",
                "No assembly cost declared for a shipped model",
                &format!("{}/{}", p, m),
            );
        }
    }

    let shipping_plants: BTreeSet<&AssemblyPlantId> = shipping.keys().map(|(p, _, _)| p).collect();
    for p in &shipping_plants {
        if !paint.contains_key(*p) {
            diag.error_at("missing", "No paint capacity declared", p.as_str());
        }
        if !labor_hours.contains_key(*p) {
            diag.error_at("missing", "No labor hours declared", p.as_str());
        }
    }

    for m in registry.models() {
        if !labor_requirements.contains_key(m) {
            diag.error_at("missing", "No labor requirement declared", m.as_str());
        }
        for c in registry.components() {
            if !requirements.contains_key(&(m.clone(), c.clone())) {
                diag.error_at(
                    "missing",
                    "No component requirement declared (use 0 if unused)",
                    &format!("{}/{}", m, c),
                );
            }
        }
    }

    // Coverage warnings
    let served: BTreeSet<(&DealerRegionId, &VehicleModel)> =
        shipping.keys().map(|(_, d, m)| (d, m)).collect();
    for (d, m) in &served {
        if !demand.contains_key(&((*d).clone(), (*m).clone())) {
            diag.warning_at(
                "coverage",
                "No demand declared, treated as zero",
                &format!("{}/{}", d, m),
            );
        }
    }
    for ((d, m), quantity) in &demand {
        if *quantity > 0 && !served.contains(&(d, m)) {
            diag.warning_at(
                "coverage",
                "Positive demand but no shipping lane reaches this region for this model",
                &format!("{}/{}", d, m),
            );
        }
    }

    let receiving_plants: BTreeSet<&AssemblyPlantId> =
        transport.keys().map(|(_, p, _)| p).collect();
    for p in registry.assembly_plants() {
        match (receiving_plants.contains(p), shipping_plants.contains(p)) {
            (true, false) => diag.warning_at(
                "coverage",
                "Assembly plant receives components but ships no vehicles",
                p.as_str(),
            ),
            (false, true) => diag.warning_at(
                "coverage",
                "Assembly plant ships vehicles but receives no components",
                p.as_str(),
            ),
            _ => {}
        }
    }

    ValidatedNetwork {
        registry,
        transport,
        shipping,
        assembly,
        capacity,
        demand,
        requirements,
        paint,
        labor_hours,
        labor_requirements,
        diagnostics: diag,
    }
}

fn check_ref<T: Ord + fmt::Display>(
    diag: &mut Diagnostics,
    known: &BTreeSet<T>,
    id: &T,
    kind: EntityKind,
    table: &str,
) {
    if !known.contains(id) {
        diag.error_at(
            "reference",
            &format!("{} in {} appears in no cost table", kind, table),
            &id.to_string(),
        );
    }
}

fn check_cost(diag: &mut Diagnostics, value: f64, what: &str, entity: &str) {
    if !value.is_finite() || value < 0.0 {
        diag.error_at(
            "validation",
            &format!("{} cost must be finite and non-negative", what),
            entity,
        );
    }
}

fn check_hours(diag: &mut Diagnostics, value: f64, entity: &str) {
    if !value.is_finite() || value < 0.0 {
        diag.error_at(
            "validation",
            "Labor hours must be finite and non-negative",
            entity,
        );
    }
}

fn duplicate(diag: &mut Diagnostics, table: &str, entity: &str) {
    diag.error_at("duplicate", &format!("Duplicate row in {}", table), entity);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_lane() -> crate::NetworkDataBuilder {
        NetworkData::builder()
            .transport("s1", "p1", "chassis", 10.0)
            .capacity("s1", "chassis", 100)
            .shipping("p1", "d1", "basic", 5.0)
            .assembly("p1", "basic", 50.0)
            .demand("d1", "basic", 40)
            .requirement("basic", "chassis", 1)
            .paint("p1", 1000)
            .labor_hours("p1", 1000.0)
            .labor_requirement("basic", 2.0)
    }

    #[test]
    fn registry_derives_sets_from_cost_tables() {
        let data = NetworkData::quarterly_baseline();
        let registry = EntityRegistry::from_cost_tables(&data);
        assert_eq!(registry.parts_plants().len(), 3);
        assert_eq!(registry.assembly_plants().len(), 2);
        assert_eq!(registry.dealer_regions().len(), 3);
        assert_eq!(registry.components().len(), 3);
        assert_eq!(registry.models().len(), 2);
    }

    #[test]
    fn baseline_validates_without_issues() {
        let diag = validate_network(&NetworkData::quarterly_baseline());
        assert!(diag.issues.is_empty(), "{:?}", diag);
    }

    #[test]
    fn misspelled_capacity_plant_is_inconsistent() {
        let data = single_lane().capacity("s_one", "chassis", 50).build();
        let err = ValidatedNetwork::new(&data).unwrap_err();
        match err {
            PlanError::DataInconsistency { issues } => {
                assert_eq!(issues.len(), 1);
                assert_eq!(issues[0].category, "reference");
                assert_eq!(issues[0].entity.as_deref(), Some("s_one"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_capacity_for_supplying_plant_is_an_error() {
        let mut data = single_lane().build();
        data.parts_capacity.clear();
        let diag = validate_network(&data);
        assert_eq!(diag.issues.iter().filter(|i| i.category == "missing").count(), 1);
    }

    #[test]
    fn missing_demand_is_only_a_warning() {
        let mut data = single_lane().build();
        data.demand.clear();
        let network = ValidatedNetwork::new(&data).unwrap();
        assert_eq!(network.diagnostics().count(Severity::Warning), 1);
        assert_eq!(
            network.demand(&DealerRegionId::new("d1"), &VehicleModel::new("basic")),
            0
        );
    }

    #[test]
    fn duplicate_rows_are_rejected() {
        let mut data = single_lane().build();
        data.paint_capacity.push(data.paint_capacity[0].clone());
        let diag = validate_network(&data);
        assert_eq!(diag.issues.iter().filter(|i| i.category == "duplicate").count(), 1);
    }

    #[test]
    fn negative_labor_hours_rejected() {
        let data = single_lane().labor_hours("p1", -5.0).build();
        assert!(ValidatedNetwork::new(&data).is_err());
    }

    #[test]
    fn negative_cost_rejected() {
        let data = single_lane().shipping("p1", "d1", "basic", -1.0).build();
        let diag = validate_network(&data);
        assert_eq!(diag.issues.iter().filter(|i| i.category == "validation").count(), 1);
    }

    #[test]
    fn require_reports_unknown_entity() {
        let registry = EntityRegistry::from_cost_tables(&single_lane().build());
        assert!(registry.require_model(&VehicleModel::new("basic")).is_ok());
        let err = registry
            .require_dealer_region(&DealerRegionId::new("d9"))
            .unwrap_err();
        assert_eq!(err.to_string(), "unknown dealer region 'd9'");
    }

    #[test]
    fn lookups_return_indexed_values() {
        let network = ValidatedNetwork::new(&single_lane().build()).unwrap();
        let s1 = PartsPlantId::new("s1");
        let p1 = AssemblyPlantId::new("p1");
        let chassis = ComponentType::new("chassis");
        assert_eq!(network.capacity(&s1, &chassis), 100);
        assert_eq!(network.transport_cost(&s1, &p1, &chassis), Some(10.0));
        assert_eq!(network.paint_capacity(&p1), 1000);
        assert_eq!(network.transport_lanes().count(), 1);
        assert_eq!(network.shipping_lanes().count(), 1);
    }
}
