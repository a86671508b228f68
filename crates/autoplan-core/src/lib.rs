//! # autoplan-core: Supply Network Data for Quarterly Planning
//!
//! Provides the data model for a two-echelon automotive supply network:
//! parts plants ship components to assembly plants, which assemble vehicles
//! and ship them to dealer regions.
//!
//! ```text
//!   parts plants ──components──> assembly plants ──vehicles──> dealer regions
//!   (capacity)                   (paint, labor)                (demand)
//! ```
//!
//! ## Design Philosophy
//!
//! Every table is an ordered list of rows keyed by string newtype IDs. The
//! set of *reachable* entities is derived once from the two cost tables
//! (transport and shipping) into an explicit [`EntityRegistry`]. Every other
//! table is checked against that registry by [`ValidatedNetwork::new`], so a
//! misspelled plant or region shows up as a [`PlanError::DataInconsistency`]
//! before any model is built instead of silently dropping out of the model.
//!
//! ## Quick Start
//!
//! ```rust
//! use autoplan_core::{NetworkData, ValidatedNetwork};
//!
//! let data = NetworkData::quarterly_baseline();
//! let network = ValidatedNetwork::new(&data).expect("baseline is consistent");
//! assert_eq!(network.registry().assembly_plants().len(), 2);
//! ```
//!
//! ## Modules
//!
//! - [`network`] - Table rows and the [`NetworkData`] container
//! - [`baseline`] - The built-in reference quarter
//! - [`registry`] - Entity registry and validation pass
//! - [`diagnostics`] - Validation issue collection
//! - [`family`] - Constraint family vocabulary and solver status
//! - [`io`] - JSON / YAML / TOML loading and saving

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod baseline;
pub mod diagnostics;
pub mod error;
pub mod family;
pub mod io;
pub mod network;
pub mod registry;

pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{PlanError, PlanResult};
pub use family::{ConstraintFamily, FamilyCount, SolveStatus};
pub use io::{load_network, save_network};
pub use network::{
    AssemblyCost, ComponentRequirement, Demand, LaborHours, LaborRequirement, NetworkData,
    NetworkDataBuilder, PaintCapacity, PartsCapacity, ShippingCost, TransportCost,
};
pub use registry::{validate_network, EntityKind, EntityRegistry, ValidatedNetwork};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[inline]
            pub fn new(value: impl Into<String>) -> Self {
                $name(value.into())
            }
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                $name(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                $name(value)
            }
        }
    };
}

string_id!(
    /// Identifier of a plant that produces components.
    PartsPlantId
);
string_id!(
    /// Identifier of a plant that assembles vehicles from components.
    AssemblyPlantId
);
string_id!(
    /// Identifier of a dealer region (demand sink).
    DealerRegionId
);
string_id!(
    /// Component category, e.g. `chassis` or `electronics`.
    ComponentType
);
string_id!(
    /// Vehicle model category, e.g. `basic` or `luxury`.
    VehicleModel
);
