//! Solver-neutral MILP instance
//!
//! [`MilpModel`] is what crosses the solver adapter boundary: variable
//! definitions, a minimization objective and an ordered list of named
//! constraints. It knows nothing about plants or regions.

use super::expr::{LinearExpr, VarId};
use autoplan_core::{ConstraintFamily, FamilyCount, PlanError, PlanResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance used when checking constraints against solved values
pub const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// Definition of one decision variable
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDef {
    pub name: String,
    pub integer: bool,
    pub lower: f64,
    /// `None` means no explicit upper bound
    pub upper: Option<f64>,
}

impl VariableDef {
    /// Non-negative integer variable without upper bound
    pub fn non_negative_integer(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            integer: true,
            lower: 0.0,
            upper: None,
        }
    }
}

/// Relation between a constraint's left-hand side and its right-hand side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "==")]
    Eq,
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ComparisonOp::Le => "<=",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Eq => "==",
        };
        f.write_str(symbol)
    }
}

/// A named linear constraint `lhs op rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub name: String,
    pub family: ConstraintFamily,
    pub lhs: LinearExpr,
    pub op: ComparisonOp,
    pub rhs: f64,
}

impl LinearConstraint {
    /// Create a constraint in the [`ConstraintFamily::Custom`] family
    pub fn new(name: impl Into<String>, lhs: LinearExpr, op: ComparisonOp, rhs: f64) -> Self {
        Self {
            name: name.into(),
            family: ConstraintFamily::Custom,
            lhs,
            op,
            rhs,
        }
    }

    pub fn in_family(mut self, family: ConstraintFamily) -> Self {
        self.family = family;
        self
    }

    /// Check the constraint against a full value vector
    pub fn is_satisfied_by(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.lhs.evaluate(values);
        match self.op {
            ComparisonOp::Le => lhs <= self.rhs + tolerance,
            ComparisonOp::Ge => lhs >= self.rhs - tolerance,
            ComparisonOp::Eq => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

impl fmt::Display for LinearConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {} {}", self.name, self.lhs, self.op, self.rhs)
    }
}

/// A minimization MILP
#[derive(Debug, Clone, Default)]
pub struct MilpModel {
    variables: Vec<VariableDef>,
    objective: LinearExpr,
    constraints: Vec<LinearConstraint>,
}

impl MilpModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_variable(&mut self, def: VariableDef) -> VarId {
        self.variables.push(def);
        VarId::new(self.variables.len() - 1)
    }

    /// Replace the objective; every referenced variable must exist
    pub fn set_objective(&mut self, objective: LinearExpr) -> PlanResult<()> {
        self.check_defined(&objective, "objective")?;
        self.objective = objective;
        Ok(())
    }

    /// Append a constraint; names must be unique and every referenced
    /// variable must exist
    pub fn add_constraint(&mut self, constraint: LinearConstraint) -> PlanResult<()> {
        if self.constraint(&constraint.name).is_some() {
            return Err(PlanError::DuplicateConstraint(constraint.name));
        }
        self.check_defined(&constraint.lhs, &format!("constraint '{}'", constraint.name))?;
        self.constraints.push(constraint);
        Ok(())
    }

    /// Remove a constraint by name, returning it
    pub fn remove_constraint(&mut self, name: &str) -> PlanResult<LinearConstraint> {
        let position = self
            .constraints
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| PlanError::UnknownConstraint(name.to_string()))?;
        Ok(self.constraints.remove(position))
    }

    pub fn variables(&self) -> &[VariableDef] {
        &self.variables
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn constraint(&self, name: &str) -> Option<&LinearConstraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    /// Constraint counts per family, in family order, omitting empty families
    pub fn family_counts(&self) -> Vec<FamilyCount> {
        let mut counts: Vec<FamilyCount> = Vec::new();
        for constraint in &self.constraints {
            match counts.iter_mut().find(|c| c.family == constraint.family) {
                Some(count) => count.constraints += 1,
                None => counts.push(FamilyCount {
                    family: constraint.family,
                    constraints: 1,
                }),
            }
        }
        counts.sort_by_key(|c| c.family);
        counts
    }

    fn check_defined(&self, expr: &LinearExpr, owner: &str) -> PlanResult<()> {
        match expr.max_var() {
            Some(var) if var.index() >= self.variables.len() => Err(PlanError::Config(format!(
                "{} references undefined variable {}",
                owner, var
            ))),
            _ => Ok(()),
        }
    }

    /// Names of constraints violated by `values`
    pub fn violated_constraints(&self, values: &[f64], tolerance: f64) -> Vec<&str> {
        self.constraints
            .iter()
            .filter(|c| !c.is_satisfied_by(values, tolerance))
            .map(|c| c.name.as_str())
            .collect()
    }
}
