//! Issues found while validating network data.
//!
//! Validation does not stop at the first problem. Every issue is recorded
//! with a severity, a category and usually the entity it concerns, so the
//! CLI can print the whole list at once.
//!
//! ```
//! use autoplan_core::diagnostics::{Diagnostics, Severity};
//!
//! let mut diag = Diagnostics::new();
//! diag.warning_at("coverage", "No demand declared, treated as zero", "dealer_region4/basic");
//! diag.error_at("reference", "parts plant in parts_capacity appears in no cost table", "parts_plant9");
//!
//! assert_eq!(diag.count(Severity::Error), 1);
//! assert_eq!(diag.summary(), "1 warning, 1 error");
//! ```

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The model can still be built, e.g. a defaulted demand
    Warning,
    /// The data cannot be turned into a faithful model
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticIssue {
    pub severity: Severity,
    /// One of `empty`, `reference`, `missing`, `validation`, `duplicate`, `coverage`
    pub category: String,
    pub message: String,
    /// Entity key such as `parts_plant1/chassis`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

impl DiagnosticIssue {
    pub fn new(
        severity: Severity,
        category: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category: category.into(),
            message: message.into(),
            entity: None,
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }
}

impl fmt::Display for DiagnosticIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}] {}", self.severity, self.category, self.message)?;
        match &self.entity {
            Some(entity) => write!(f, " ({})", entity),
            None => Ok(()),
        }
    }
}

/// Every issue from one validation pass, in discovery order
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    pub issues: Vec<DiagnosticIssue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error that concerns the data set as a whole
    pub fn error(&mut self, category: &str, message: &str) {
        self.issues
            .push(DiagnosticIssue::new(Severity::Error, category, message));
    }

    pub fn error_at(&mut self, category: &str, message: &str, entity: &str) {
        self.push_at(Severity::Error, category, message, entity);
    }

    pub fn warning_at(&mut self, category: &str, message: &str, entity: &str) {
        self.push_at(Severity::Warning, category, message, entity);
    }

    fn push_at(&mut self, severity: Severity, category: &str, message: &str, entity: &str) {
        self.issues
            .push(DiagnosticIssue::new(severity, category, message).with_entity(entity));
    }

    pub fn of_severity(&self, severity: Severity) -> impl Iterator<Item = &DiagnosticIssue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.of_severity(severity).count()
    }

    pub fn has_errors(&self) -> bool {
        self.of_severity(Severity::Error).next().is_some()
    }

    /// `No issues`, or counts such as `2 warnings, 1 error`
    pub fn summary(&self) -> String {
        let parts: Vec<String> = [Severity::Warning, Severity::Error]
            .into_iter()
            .map(|severity| (severity, self.count(severity)))
            .filter(|(_, n)| *n > 0)
            .map(|(severity, n)| format!("{} {}{}", n, severity, if n == 1 { "" } else { "s" }))
            .collect();
        if parts.is_empty() {
            "No issues".to_string()
        } else {
            parts.join(", ")
        }
    }
}
