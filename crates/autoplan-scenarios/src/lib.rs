//! What-if scenarios for the quarterly planner.
//!
//! A scenario file edits the plan at two points: table overrides before the
//! network is validated, and constraint additions/removals after the model
//! is built.

pub mod apply;
pub mod spec;

pub use apply::{apply_data_overrides, apply_scenario_constraints, DeclaredConstraints, ScenarioEdits};
pub use spec::{
    load_scenario_from_path, validate, DeclaredConstraint, DeclaredTerm, ScenarioSpec,
    VariableSelector,
};
