//! Built-in reference quarter
//!
//! Three parts plants, two assembly plants and three dealer regions. Luxury
//! vehicles need two electronics units; everything else needs one of each
//! component.

use crate::NetworkData;

const PARTS_CAPACITY: &[(&str, &str, u64)] = &[
    ("parts_plant1", "chassis", 50_000),
    ("parts_plant1", "engine", 40_000),
    ("parts_plant1", "electronics", 54_000),
    ("parts_plant2", "chassis", 30_000),
    ("parts_plant2", "engine", 35_000),
    ("parts_plant2", "electronics", 45_000),
    ("parts_plant3", "chassis", 40_000),
    ("parts_plant3", "engine", 30_000),
    ("parts_plant3", "electronics", 50_000),
];

const TRANSPORT_COSTS: &[(&str, &str, &str, f64)] = &[
    ("parts_plant1", "assembly_plant1", "chassis", 400.0),
    ("parts_plant1", "assembly_plant1", "engine", 300.0),
    ("parts_plant1", "assembly_plant1", "electronics", 200.0),
    ("parts_plant1", "assembly_plant2", "chassis", 350.0),
    ("parts_plant1", "assembly_plant2", "engine", 250.0),
    ("parts_plant1", "assembly_plant2", "electronics", 180.0),
    ("parts_plant2", "assembly_plant1", "chassis", 380.0),
    ("parts_plant2", "assembly_plant1", "engine", 280.0),
    ("parts_plant2", "assembly_plant1", "electronics", 190.0),
    ("parts_plant2", "assembly_plant2", "chassis", 340.0),
    ("parts_plant2", "assembly_plant2", "engine", 240.0),
    ("parts_plant2", "assembly_plant2", "electronics", 170.0),
    ("parts_plant3", "assembly_plant1", "chassis", 360.0),
    ("parts_plant3", "assembly_plant1", "engine", 260.0),
    ("parts_plant3", "assembly_plant1", "electronics", 180.0),
    ("parts_plant3", "assembly_plant2", "chassis", 320.0),
    ("parts_plant3", "assembly_plant2", "engine", 220.0),
    ("parts_plant3", "assembly_plant2", "electronics", 160.0),
];

const ASSEMBLY_COSTS: &[(&str, &str, f64)] = &[
    ("assembly_plant1", "basic", 12_000.0),
    ("assembly_plant2", "basic", 13_000.0),
    ("assembly_plant1", "luxury", 18_000.0),
    ("assembly_plant2", "luxury", 20_000.0),
];

const SHIPPING_COSTS: &[(&str, &str, &str, f64)] = &[
    ("assembly_plant1", "dealer_region1", "basic", 700.0),
    ("assembly_plant1", "dealer_region2", "basic", 600.0),
    ("assembly_plant1", "dealer_region3", "basic", 900.0),
    ("assembly_plant1", "dealer_region1", "luxury", 800.0),
    ("assembly_plant1", "dealer_region2", "luxury", 700.0),
    ("assembly_plant1", "dealer_region3", "luxury", 1000.0),
    ("assembly_plant2", "dealer_region1", "basic", 650.0),
    ("assembly_plant2", "dealer_region2", "basic", 750.0),
    ("assembly_plant2", "dealer_region3", "basic", 500.0),
    ("assembly_plant2", "dealer_region1", "luxury", 750.0),
    ("assembly_plant2", "dealer_region2", "luxury", 850.0),
    ("assembly_plant2", "dealer_region3", "luxury", 600.0),
];

const DEMAND: &[(&str, &str, u64)] = &[
    ("dealer_region1", "basic", 1000),
    ("dealer_region2", "basic", 1600),
    ("dealer_region3", "basic", 1200),
    ("dealer_region1", "luxury", 600),
    ("dealer_region2", "luxury", 400),
    ("dealer_region3", "luxury", 800),
];

const REQUIREMENTS: &[(&str, &str, u32)] = &[
    ("basic", "chassis", 1),
    ("basic", "engine", 1),
    ("basic", "electronics", 1),
    ("luxury", "chassis", 1),
    ("luxury", "engine", 1),
    ("luxury", "electronics", 2),
];

impl NetworkData {
    /// The reference quarter used by the CLI when no data file is given.
    pub fn quarterly_baseline() -> Self {
        let mut builder = NetworkData::builder();
        for &(plant, component, quantity) in PARTS_CAPACITY {
            builder = builder.capacity(plant, component, quantity);
        }
        for &(from, to, component, cost) in TRANSPORT_COSTS {
            builder = builder.transport(from, to, component, cost);
        }
        for &(plant, model, cost) in ASSEMBLY_COSTS {
            builder = builder.assembly(plant, model, cost);
        }
        for &(plant, region, model, cost) in SHIPPING_COSTS {
            builder = builder.shipping(plant, region, model, cost);
        }
        for &(region, model, quantity) in DEMAND {
            builder = builder.demand(region, model, quantity);
        }
        for &(model, component, count) in REQUIREMENTS {
            builder = builder.requirement(model, component, count);
        }
        builder
            .paint("assembly_plant1", 25_000)
            .paint("assembly_plant2", 30_000)
            .labor_hours("assembly_plant1", 70_000.0)
            .labor_hours("assembly_plant2", 88_000.0)
            .labor_requirement("basic", 15.0)
            .labor_requirement("luxury", 25.0)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_has_every_table_populated() {
        let data = NetworkData::quarterly_baseline();
        assert_eq!(data.parts_capacity.len(), 9);
        assert_eq!(data.transport_costs.len(), 18);
        assert_eq!(data.assembly_costs.len(), 4);
        assert_eq!(data.shipping_costs.len(), 12);
        assert_eq!(data.demand.len(), 6);
        assert_eq!(data.component_requirements.len(), 6);
        assert_eq!(data.paint_capacity.len(), 2);
        assert_eq!(data.labor_hours.len(), 2);
        assert_eq!(data.labor_requirements.len(), 2);
    }

    #[test]
    fn luxury_needs_double_electronics() {
        let data = NetworkData::quarterly_baseline();
        let row = data
            .component_requirements
            .iter()
            .find(|r| r.model.as_str() == "luxury" && r.component.as_str() == "electronics")
            .unwrap();
        assert_eq!(row.count, 2);
    }
}
