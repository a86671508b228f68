//! Pluggable constraint builders
//!
//! An extension receives the typed variable lookup of a built model and
//! returns named constraints to add. It never sees the model itself, so it
//! cannot depend on variable naming or ordering.

use crate::builder::PlanVariables;
use crate::model::LinearConstraint;
use autoplan_core::PlanResult;

/// Produces zero or more named constraints over a model's variables
pub trait ConstraintExtension {
    /// Label used in logs
    fn name(&self) -> &str;

    fn constraints(&self, vars: &PlanVariables) -> PlanResult<Vec<LinearConstraint>>;
}

/// Extension backed by a closure
///
/// ```
/// use autoplan_algo::{ComparisonOp, FnExtension, LinearConstraint, LinearExpr, PlanVariables};
///
/// let cap_plant = FnExtension::new("cap-p1", |vars: &PlanVariables| {
///     let lhs: LinearExpr = vars
///         .vehicle_shipments()
///         .filter(|(lane, _)| lane.assembly_plant.as_str() == "p1")
///         .map(|(_, var)| (var, 1.0))
///         .collect();
///     Ok(vec![LinearConstraint::new("p1_cap", lhs, ComparisonOp::Le, 500.0)])
/// });
/// # let _ = cap_plant;
/// ```
pub struct FnExtension<F> {
    name: String,
    build: F,
}

impl<F> FnExtension<F>
where
    F: Fn(&PlanVariables) -> PlanResult<Vec<LinearConstraint>>,
{
    pub fn new(name: impl Into<String>, build: F) -> Self {
        Self {
            name: name.into(),
            build,
        }
    }
}

impl<F> ConstraintExtension for FnExtension<F>
where
    F: Fn(&PlanVariables) -> PlanResult<Vec<LinearConstraint>>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn constraints(&self, vars: &PlanVariables) -> PlanResult<Vec<LinearConstraint>> {
        (self.build)(vars)
    }
}
