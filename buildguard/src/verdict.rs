//! Verdict Aggregator

use serde::{Deserialize, Serialize};

use crate::analyzer::rules::{Finding, Severity};
use crate::parser::NormalizationError;
use crate::power::PowerEstimate;

/// Final answer for one combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// True exactly when `issues` is empty
    pub compatible: bool,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    #[serde(default)]
    pub power: Option<PowerEstimate>,
}

impl Verdict {
    /// Merge deterministic and arbitrated findings, deterministic first.
    ///
    /// Uncertain findings never reach the verdict directly; they only count
    /// through whatever the escalation step turned them into.
    pub fn aggregate(
        deterministic: &[Finding],
        escalated: &[Finding],
        power: Option<PowerEstimate>,
    ) -> Self {
        let mut issues = Vec::new();
        let mut warnings = Vec::new();

        for finding in deterministic.iter().chain(escalated) {
            match finding.severity {
                Severity::Issue => issues.push(finding.message.clone()),
                Severity::Warning => warnings.push(finding.message.clone()),
                Severity::Uncertain => {}
            }
        }

        Self {
            compatible: issues.is_empty(),
            issues,
            warnings,
            power,
        }
    }

    /// Verdict for input that could not be normalized into a combo
    pub fn normalization_failure(error: &NormalizationError) -> Self {
        Self {
            compatible: false,
            issues: vec![error.to_string()],
            warnings: Vec::new(),
            power: None,
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
