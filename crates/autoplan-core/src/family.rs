//! Constraint family vocabulary and solver outcome status.
//!
//! These live in the core crate because errors, scenario files and reports
//! all talk about them, not only the model builder.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named group of constraints generated from one index set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintFamily {
    /// Inbound components equal consumption, per (assembly plant, component)
    ComponentFlow,
    /// Outbound components within supply, per (parts plant, component)
    PartsCapacity,
    /// Vehicles delivered at least demand, per (dealer region, model)
    Demand,
    /// Vehicles painted within capacity, per assembly plant
    PaintCapacity,
    /// Labor hours within availability, per assembly plant
    Labor,
    /// Injected through the extension API
    Custom,
}

impl ConstraintFamily {
    pub const CORE: [ConstraintFamily; 5] = [
        ConstraintFamily::ComponentFlow,
        ConstraintFamily::PartsCapacity,
        ConstraintFamily::Demand,
        ConstraintFamily::PaintCapacity,
        ConstraintFamily::Labor,
    ];

    /// Prefix used when naming constraints of this family
    pub fn prefix(&self) -> &'static str {
        match self {
            ConstraintFamily::ComponentFlow => "flow",
            ConstraintFamily::PartsCapacity => "capacity",
            ConstraintFamily::Demand => "demand",
            ConstraintFamily::PaintCapacity => "paint",
            ConstraintFamily::Labor => "labor",
            ConstraintFamily::Custom => "custom",
        }
    }
}

impl fmt::Display for ConstraintFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// How many constraints of a family were active in a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FamilyCount {
    pub family: ConstraintFamily,
    pub constraints: usize,
}

impl fmt::Display for FamilyCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.family, self.constraints)
    }
}

/// Outcome reported by a MILP solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// Terminated without a conclusive answer (time limit, numerical trouble)
    NotSolved,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::Unbounded => "UNBOUNDED",
            SolveStatus::NotSolved => "NOT_SOLVED",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_in_upper_case() {
        assert_eq!(
            serde_json::to_string(&SolveStatus::NotSolved).unwrap(),
            "\"NOT_SOLVED\""
        );
        assert_eq!(SolveStatus::Infeasible.to_string(), "INFEASIBLE");
    }

    #[test]
    fn family_count_display() {
        let count = FamilyCount {
            family: ConstraintFamily::ComponentFlow,
            constraints: 6,
        };
        assert_eq!(count.to_string(), "flow=6");
    }
}
