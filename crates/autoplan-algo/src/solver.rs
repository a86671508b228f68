//! Solver adapter boundary and the good_lp backend
//!
//! The planning model talks to a MILP solver only through [`SolverAdapter`]:
//! a [`MilpModel`] goes in, a [`SolveOutcome`] comes back. [`GoodLpAdapter`]
//! is the production implementation; tests substitute their own adapters to
//! exercise non-optimal outcomes.

use crate::model::{ComparisonOp, LinearConstraint, LinearExpr, MilpModel, FEASIBILITY_TOLERANCE};
use autoplan_core::{PlanError, PlanResult, SolveStatus};
use good_lp::solvers::microlp::microlp;
use good_lp::{
    constraint, variable, Constraint, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, warn};

/// What a solver reports back for one model
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    /// Values indexed by variable id; present only when optimal
    pub values: Option<Vec<f64>>,
    pub objective_value: Option<f64>,
    pub message: String,
}

impl SolveOutcome {
    pub fn optimal(values: Vec<f64>, objective_value: f64) -> Self {
        Self {
            status: SolveStatus::Optimal,
            values: Some(values),
            objective_value: Some(objective_value),
            message: "optimal".to_string(),
        }
    }

    pub fn infeasible(message: impl Into<String>) -> Self {
        Self::without_values(SolveStatus::Infeasible, message)
    }

    pub fn unbounded(message: impl Into<String>) -> Self {
        Self::without_values(SolveStatus::Unbounded, message)
    }

    pub fn not_solved(message: impl Into<String>) -> Self {
        Self::without_values(SolveStatus::NotSolved, message)
    }

    fn without_values(status: SolveStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            values: None,
            objective_value: None,
            message: message.into(),
        }
    }
}

/// A MILP backend
pub trait SolverAdapter {
    fn name(&self) -> &str;

    /// Solve a minimization model.
    ///
    /// Infeasible, unbounded and inconclusive runs are reported through
    /// [`SolveOutcome::status`]; `Err` is reserved for backend failures.
    fn solve(&self, model: &MilpModel) -> PlanResult<SolveOutcome>;
}

/// Available MILP backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilpSolverKind {
    /// Pure-Rust branch and bound, always available
    #[default]
    MicroLp,
    #[cfg(feature = "solver-highs")]
    Highs,
}

impl MilpSolverKind {
    pub fn available() -> &'static [&'static str] {
        AVAILABLE_MILP_SOLVERS
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MilpSolverKind::MicroLp => "microlp",
            #[cfg(feature = "solver-highs")]
            MilpSolverKind::Highs => "highs",
        }
    }
}

const AVAILABLE_MILP_SOLVERS: &[&str] = &[
    "microlp",
    #[cfg(feature = "solver-highs")]
    "highs",
];

fn unknown_solver_error(label: &str) -> PlanError {
    PlanError::Config(format!(
        "unknown milp solver '{}'; supported values: {}",
        label,
        MilpSolverKind::available().join(", ")
    ))
}

impl FromStr for MilpSolverKind {
    type Err = PlanError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.to_ascii_lowercase();
        match normalized.as_str() {
            "microlp" | "micro_lp" => Ok(MilpSolverKind::MicroLp),
            "highs" => {
                #[cfg(feature = "solver-highs")]
                {
                    Ok(MilpSolverKind::Highs)
                }
                #[cfg(not(feature = "solver-highs"))]
                {
                    Err(unknown_solver_error(&normalized))
                }
            }
            _ => Err(unknown_solver_error(&normalized)),
        }
    }
}

/// Solver settings, loadable from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanSolverConfig {
    pub solver: MilpSolverKind,
    /// Wall-clock limit in seconds (HiGHS only)
    pub time_limit_seconds: Option<f64>,
    /// Relative MIP gap (HiGHS only). A run that stops at this gap is
    /// reported as optimal, with a warning logged.
    pub mip_gap: Option<f64>,
    pub verbose: bool,
}

impl Default for PlanSolverConfig {
    fn default() -> Self {
        Self {
            solver: MilpSolverKind::default(),
            time_limit_seconds: None,
            mip_gap: None,
            verbose: false,
        }
    }
}

impl PlanSolverConfig {
    pub fn validate(&self) -> PlanResult<()> {
        if let Some(limit) = self.time_limit_seconds {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(PlanError::Config(format!(
                    "time_limit_seconds must be positive, got {}",
                    limit
                )));
            }
        }
        if let Some(gap) = self.mip_gap {
            if !gap.is_finite() || !(0.0..1.0).contains(&gap) {
                return Err(PlanError::Config(format!(
                    "mip_gap must be in [0, 1), got {}",
                    gap
                )));
            }
        }
        Ok(())
    }
}

/// [`SolverAdapter`] over the good_lp modelling layer
#[derive(Debug, Clone, Default)]
pub struct GoodLpAdapter {
    config: PlanSolverConfig,
}

impl GoodLpAdapter {
    pub fn new(config: PlanSolverConfig) -> PlanResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlanSolverConfig {
        &self.config
    }
}

impl SolverAdapter for GoodLpAdapter {
    fn name(&self) -> &str {
        self.config.solver.as_str()
    }

    fn solve(&self, model: &MilpModel) -> PlanResult<SolveOutcome> {
        // Rows without variables never reach the backend
        for c in model.constraints().iter().filter(|c| c.lhs.is_constant()) {
            if !c.is_satisfied_by(&[], FEASIBILITY_TOLERANCE) {
                debug!(constraint = %c.name, "constant constraint cannot hold");
                return Ok(SolveOutcome::infeasible(format!(
                    "constraint '{}' has no variables and is violated ({} {} {})",
                    c.name,
                    c.lhs.constant_term(),
                    c.op,
                    c.rhs
                )));
            }
        }

        let mut problem_vars = ProblemVariables::new();
        let vars: Vec<Variable> = model
            .variables()
            .iter()
            .map(|def| {
                let mut definition = variable().min(def.lower);
                if def.integer {
                    definition = definition.integer();
                }
                if let Some(upper) = def.upper {
                    definition = definition.max(upper);
                }
                problem_vars.add(definition)
            })
            .collect();

        let objective = to_expression(model.objective(), &vars);
        let constraints: Vec<Constraint> = model
            .constraints()
            .iter()
            .filter(|c| !c.lhs.is_constant())
            .map(|c| to_constraint(c, &vars))
            .collect();

        debug!(
            backend = self.name(),
            variables = vars.len(),
            constraints = constraints.len(),
            "handing model to solver"
        );

        let solved = match self.config.solver {
            MilpSolverKind::MicroLp => {
                if self.config.time_limit_seconds.is_some() || self.config.mip_gap.is_some() {
                    warn!("microlp ignores time_limit_seconds and mip_gap");
                }
                let problem = problem_vars.minimise(objective).using(microlp);
                solve_with(problem, constraints, &vars)
            }
            #[cfg(feature = "solver-highs")]
            MilpSolverKind::Highs => {
                use good_lp::solvers::highs::highs;
                use good_lp::SolutionStatus;

                let mut problem = problem_vars
                    .minimise(objective)
                    .using(highs)
                    .set_verbose(self.config.verbose);
                if let Some(limit) = self.config.time_limit_seconds {
                    problem = problem.set_time_limit(limit);
                }
                if let Some(gap) = self.config.mip_gap {
                    problem = problem.set_option("mip_rel_gap", gap);
                }
                for c in constraints {
                    problem = problem.with(c);
                }
                match problem.solve() {
                    Ok(solution) if solution.status() == SolutionStatus::TimeLimit => {
                        return Ok(SolveOutcome::not_solved("time limit reached"));
                    }
                    Ok(solution) if solution.status() == SolutionStatus::GapLimit => {
                        warn!(
                            mip_gap = self.config.mip_gap,
                            "highs stopped at the mip gap, plan is within the gap of optimal"
                        );
                        Ok(vars.iter().map(|v| solution.value(*v)).collect())
                    }
                    Ok(solution) => Ok(vars.iter().map(|v| solution.value(*v)).collect()),
                    Err(err) => Err(err),
                }
            }
        };

        match solved {
            Ok(raw) => {
                let values: Vec<f64> = raw
                    .into_iter()
                    .zip(model.variables())
                    .map(|(value, def)| {
                        if def.integer {
                            value.round().max(def.lower)
                        } else {
                            value
                        }
                    })
                    .collect();
                let objective_value = model.objective().evaluate(&values);
                Ok(SolveOutcome::optimal(values, objective_value))
            }
            Err(ResolutionError::Infeasible) => {
                Ok(SolveOutcome::infeasible("solver proved the model infeasible"))
            }
            Err(ResolutionError::Unbounded) => {
                Ok(SolveOutcome::unbounded("solver reports an unbounded objective"))
            }
            Err(other) => Ok(SolveOutcome::not_solved(other.to_string())),
        }
    }
}

fn solve_with<M>(
    mut problem: M,
    constraints: Vec<Constraint>,
    vars: &[Variable],
) -> Result<Vec<f64>, ResolutionError>
where
    M: SolverModel<Error = ResolutionError>,
{
    for c in constraints {
        problem = problem.with(c);
    }
    let solution = problem.solve()?;
    Ok(vars.iter().map(|v| solution.value(*v)).collect())
}

fn to_expression(expr: &LinearExpr, vars: &[Variable]) -> Expression {
    let mut out = Expression::from(expr.constant_term());
    for (var, coef) in expr.terms() {
        out += coef * vars[var.index()];
    }
    out
}

fn to_constraint(c: &LinearConstraint, vars: &[Variable]) -> Constraint {
    let lhs = to_expression(&c.lhs, vars);
    let rhs = c.rhs;
    match c.op {
        ComparisonOp::Le => constraint!(lhs <= rhs),
        ComparisonOp::Ge => constraint!(lhs >= rhs),
        ComparisonOp::Eq => constraint!(lhs == rhs),
    }
}
