//! Linear expressions over model variables

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Index of a decision variable inside a [`super::MilpModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VarId(usize);

impl VarId {
    #[inline]
    pub fn new(index: usize) -> Self {
        VarId(index)
    }
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// `Σ coefficient · variable + constant`, with like terms merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: BTreeMap<VarId, f64>,
    constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(value: f64) -> Self {
        Self {
            terms: BTreeMap::new(),
            constant: value,
        }
    }

    /// A single `coefficient · var` term
    pub fn term(var: VarId, coefficient: f64) -> Self {
        let mut expr = Self::new();
        expr.add_term(var, coefficient);
        expr
    }

    /// Add `coefficient · var`, merging with an existing term.
    /// Terms that cancel to zero are dropped.
    pub fn add_term(&mut self, var: VarId, coefficient: f64) {
        let entry = self.terms.entry(var).or_insert(0.0);
        *entry += coefficient;
        if *entry == 0.0 {
            self.terms.remove(&var);
        }
    }

    pub fn terms(&self) -> impl Iterator<Item = (VarId, f64)> + '_ {
        self.terms.iter().map(|(var, coef)| (*var, *coef))
    }

    pub fn coefficient(&self, var: VarId) -> f64 {
        self.terms.get(&var).copied().unwrap_or(0.0)
    }

    pub fn constant_term(&self) -> f64 {
        self.constant
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True when no variable appears in the expression
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluate with `values[var.index()]` for every variable
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(var, coef)| coef * values.get(var.index()).copied().unwrap_or(0.0))
            .sum::<f64>()
            + self.constant
    }

    /// Largest variable index referenced, if any
    pub fn max_var(&self) -> Option<VarId> {
        self.terms.keys().next_back().copied()
    }
}

impl From<VarId> for LinearExpr {
    fn from(var: VarId) -> Self {
        LinearExpr::term(var, 1.0)
    }
}

impl FromIterator<(VarId, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (VarId, f64)>>(iter: I) -> Self {
        let mut expr = LinearExpr::new();
        for (var, coef) in iter {
            expr.add_term(var, coef);
        }
        expr
    }
}

impl AddAssign for LinearExpr {
    fn add_assign(&mut self, rhs: LinearExpr) {
        for (var, coef) in rhs.terms {
            self.add_term(var, coef);
        }
        self.constant += rhs.constant;
    }
}

impl Add for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: LinearExpr) -> LinearExpr {
        self += rhs;
        self
    }
}

impl Neg for LinearExpr {
    type Output = LinearExpr;

    fn neg(self) -> LinearExpr {
        self * -1.0
    }
}

impl Sub for LinearExpr {
    type Output = LinearExpr;

    fn sub(self, rhs: LinearExpr) -> LinearExpr {
        self + (-rhs)
    }
}

impl Mul<f64> for LinearExpr {
    type Output = LinearExpr;

    fn mul(self, factor: f64) -> LinearExpr {
        if factor == 0.0 {
            return LinearExpr::new();
        }
        LinearExpr {
            terms: self
                .terms
                .into_iter()
                .map(|(var, coef)| (var, coef * factor))
                .collect(),
            constant: self.constant * factor,
        }
    }
}

impl fmt::Display for LinearExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (var, coef) in self.terms() {
            if first {
                write!(f, "{} {}", coef, var)?;
            } else if coef < 0.0 {
                write!(f, " - {} {}", -coef, var)?;
            } else {
                write!(f, " + {} {}", coef, var)?;
            }
            first = false;
        }
        if first {
            write!(f, "{}", self.constant)
        } else if self.constant != 0.0 {
            write!(f, " + {}", self.constant)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_terms_merge_and_cancel() {
        let a = VarId::new(0);
        let b = VarId::new(1);
        let mut expr = LinearExpr::term(a, 2.0);
        expr.add_term(b, 3.0);
        expr.add_term(a, -2.0);
        assert_eq!(expr.len(), 1);
        assert_eq!(expr.coefficient(b), 3.0);
        assert_eq!(expr.coefficient(a), 0.0);
    }

    #[test]
    fn evaluate_includes_constant() {
        let expr: LinearExpr = [(VarId::new(0), 2.0), (VarId::new(2), 1.5)]
            .into_iter()
            .collect();
        let expr = expr + LinearExpr::constant(4.0);
        assert_eq!(expr.evaluate(&[10.0, 99.0, 2.0]), 27.0);
    }

    #[test]
    fn subtraction_negates_rhs() {
        let inbound = LinearExpr::from(VarId::new(0)) + LinearExpr::from(VarId::new(1));
        let consumed = LinearExpr::term(VarId::new(2), 2.0);
        let balance = inbound - consumed;
        assert_eq!(balance.coefficient(VarId::new(2)), -2.0);
        assert_eq!(balance.max_var(), Some(VarId::new(2)));
    }

    #[test]
    fn display_is_readable() {
        let expr: LinearExpr = [(VarId::new(0), 1.0), (VarId::new(1), -2.0)]
            .into_iter()
            .collect();
        assert_eq!(expr.to_string(), "1 v0 - 2 v1");
        assert_eq!(LinearExpr::constant(3.0).to_string(), "3");
    }
}
