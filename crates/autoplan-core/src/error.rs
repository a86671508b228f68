//! Error types for planning operations
//!
//! [`PlanError`] separates problems found in the input data (detected before
//! any solver runs) from solver outcomes that are not optimal. Solver
//! outcomes carry the constraint families that were active so the caller can
//! diagnose which part of the model made it infeasible.

use crate::diagnostics::DiagnosticIssue;
use crate::family::{FamilyCount, SolveStatus};
use crate::registry::EntityKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    /// Validation found entities or lookups the model cannot account for
    #[error("data inconsistency: {}", join(.issues))]
    DataInconsistency { issues: Vec<DiagnosticIssue> },

    /// No assignment satisfies every constraint
    #[error("model is infeasible (active families: {})", join(.active_families))]
    InfeasibleModel { active_families: Vec<FamilyCount> },

    /// The objective decreases without limit
    #[error("model is unbounded (active families: {})", join(.active_families))]
    UnboundedModel { active_families: Vec<FamilyCount> },

    /// The solver stopped without a conclusive answer
    #[error("solver inconclusive: {reason} (active families: {})", join(.active_families))]
    SolverInconclusive {
        reason: String,
        active_families: Vec<FamilyCount>,
    },

    #[error("constraint '{0}' already exists")]
    DuplicateConstraint(String),

    #[error("no constraint named '{0}'")]
    UnknownConstraint(String),

    #[error("unknown {kind} '{id}'")]
    UnknownEntity { kind: EntityKind, id: String },

    /// Backend failure unrelated to the model outcome
    #[error("Solver error: {0}")]
    Solver(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PlanError {
    /// Solver status behind this error, if it is a solver outcome
    pub fn status(&self) -> Option<SolveStatus> {
        match self {
            PlanError::InfeasibleModel { .. } => Some(SolveStatus::Infeasible),
            PlanError::UnboundedModel { .. } => Some(SolveStatus::Unbounded),
            PlanError::SolverInconclusive { .. } => Some(SolveStatus::NotSolved),
            _ => None,
        }
    }

    /// Constraint families active when the solver gave up
    pub fn active_families(&self) -> &[FamilyCount] {
        match self {
            PlanError::InfeasibleModel { active_families }
            | PlanError::UnboundedModel { active_families }
            | PlanError::SolverInconclusive {
                active_families, ..
            } => active_families,
            _ => &[],
        }
    }
}

pub type PlanResult<T> = Result<T, PlanError>;

impl From<serde_json::Error> for PlanError {
    fn from(err: serde_json::Error) -> Self {
        PlanError::Parse(err.to_string())
    }
}

impl From<serde_yaml::Error> for PlanError {
    fn from(err: serde_yaml::Error) -> Self {
        PlanError::Parse(err.to_string())
    }
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
