//! Solver-neutral model representation
//!
//! The planning model is assembled into these types first and translated to
//! a concrete solver only inside a [`crate::solver::SolverAdapter`]. Keeping
//! our own representation is what makes constraints nameable and removable:
//! most MILP front ends cannot drop a constraint once it is added.

mod expr;
mod milp;

pub use expr::{LinearExpr, VarId};
pub use milp::{ComparisonOp, LinearConstraint, MilpModel, VariableDef, FEASIBILITY_TOLERANCE};
