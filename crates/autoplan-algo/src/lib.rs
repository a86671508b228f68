//! # autoplan-algo: Quarterly Production & Distribution MILP
//!
//! Builds and solves the minimum-cost production plan for a validated
//! two-echelon network.
//!
//! ## MILP Formulation
//!
//! ```text
//! minimize    Σ_{s,p,c} t(s,p,c)·x[s,p,c]  +  Σ_{p,d,m} (a(p,m) + h(p,d,m))·y[p,d,m]
//!             └─────────────────────────┘     └────────────────────────────────────┘
//!                   transport cost                 assembly + shipping cost
//!
//! subject to:
//!   Σ_s x[s,p,c] = Σ_{d,m} r(m,c)·y[p,d,m]      flow_{p}_{c}      component flow balance
//!   Σ_p x[s,p,c] ≤ K(s,c)                       capacity_{s}_{c}  parts capacity
//!   Σ_p y[p,d,m] ≥ D(d,m)                       demand_{d}_{m}    demand satisfaction
//!   Σ_{d,m} y[p,d,m] ≤ P(p)                     paint_{p}         paint shop capacity
//!   Σ_{d,m} ℓ(m)·y[p,d,m] ≤ L(p)                labor_{p}         labor hours
//!   x, y ∈ ℤ≥0
//! ```
//!
//! One `x` exists per transport lane and one `y` per shipping lane; index
//! combinations without a lane have no variable and contribute zero.
//!
//! ## Pipeline
//!
//! 1. [`PlanModel::build`] assembles a solver-neutral [`MilpModel`]
//! 2. [`PlanModel::add_constraint`], [`PlanModel::apply_extension`] and
//!    [`PlanModel::remove_constraint`] edit it by constraint name
//! 3. [`PlanModel::solve`] hands it to a [`SolverAdapter`] and returns a
//!    [`ProductionPlan`] only when the outcome is optimal
//! 4. [`UtilizationReport::new`] aggregates the plan
//!
//! ## Example
//!
//! ```no_run
//! use autoplan_algo::{GoodLpAdapter, PlanModel, UtilizationReport};
//! use autoplan_core::{NetworkData, ValidatedNetwork};
//!
//! let network = ValidatedNetwork::new(&NetworkData::quarterly_baseline())?;
//! let model = PlanModel::build(&network)?;
//! let plan = model.solve(&GoodLpAdapter::default())?;
//! println!("{}", UtilizationReport::new(&network, &plan).summary());
//! # Ok::<(), autoplan_core::PlanError>(())
//! ```

pub mod builder;
pub mod extension;
pub mod model;
pub mod plan;
pub mod report;
pub mod solver;

pub use builder::{build_core_model, ComponentLane, PlanVariables, VehicleLane};
pub use extension::{ConstraintExtension, FnExtension};
pub use model::{
    ComparisonOp, LinearConstraint, LinearExpr, MilpModel, VarId, VariableDef,
    FEASIBILITY_TOLERANCE,
};
pub use plan::{
    solve_quarter, ComponentShipment, CostBreakdown, PlanModel, ProductionPlan, VehicleShipment,
};
pub use report::{format_pct, AssemblyUtilization, PartsUtilization, UtilizationReport};
pub use solver::{GoodLpAdapter, MilpSolverKind, PlanSolverConfig, SolveOutcome, SolverAdapter};
