use crate::analyzer::form_factor::FormFactorRule;
use crate::analyzer::memory::MemoryGenerationRule;
use crate::analyzer::power_budget::PowerBudgetRule;
use crate::analyzer::socket::SocketChipsetRule;
use crate::catalog::Catalog;
use crate::parser::schema::{Combo, ComponentRecord};
use crate::power::PowerEstimate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Makes the combination incompatible
    Issue,
    /// Reported, never affects compatibility
    Warning,
    /// Needs an external judgment before it becomes an Issue or a Warning
    Uncertain,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Issue => write!(f, "issue"),
            Severity::Warning => write!(f, "warning"),
            Severity::Uncertain => write!(f, "uncertain"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    /// Name of the component the finding is about, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
}

impl Finding {
    pub fn new(rule_id: &str, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity,
            message: message.into(),
            component: None,
        }
    }

    pub fn issue(rule_id: &str, message: impl Into<String>) -> Self {
        Self::new(rule_id, Severity::Issue, message)
    }

    pub fn warning(rule_id: &str, message: impl Into<String>) -> Self {
        Self::new(rule_id, Severity::Warning, message)
    }

    pub fn uncertain(rule_id: &str, message: impl Into<String>) -> Self {
        Self::new(rule_id, Severity::Uncertain, message)
    }

    pub fn about(mut self, record: &ComponentRecord) -> Self {
        self.component = Some(record.name.clone());
        self
    }
}

/// Everything a rule may look at for one evaluation
pub struct RuleContext<'a> {
    pub combo: &'a Combo,
    pub power: &'a PowerEstimate,
    pub catalog: &'a Catalog,
}

pub trait Rule: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Finding>;
}

pub struct RulesEngine {
    rules: Vec<Arc<dyn Rule>>,
}

impl RulesEngine {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_default_rules() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Arc::new(SocketChipsetRule));
        engine.add_rule(Arc::new(MemoryGenerationRule));
        engine.add_rule(Arc::new(FormFactorRule));
        engine.add_rule(Arc::new(PowerBudgetRule));
        engine
    }

    pub fn add_rule(&mut self, rule: Arc<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    /// Run every rule in registration order. Findings keep that order.
    pub fn analyze(&self, ctx: &RuleContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();
        for rule in &self.rules {
            let produced = rule.check(ctx);
            tracing::debug!("Rule {} produced {} finding(s)", rule.id(), produced.len());
            findings.extend(produced);
        }
        findings
    }
}

impl Default for RulesEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

/// Substring test on uppercased text
pub(crate) fn contains_upper(haystack: &str, needle: &str) -> bool {
    haystack.to_uppercase().contains(&needle.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PowerConfig;
    use crate::parser::schema::Category;
    use crate::power::PowerEstimator;

    struct AlwaysWarn;

    impl Rule for AlwaysWarn {
        fn id(&self) -> &str {
            "always_warn"
        }
        fn name(&self) -> &str {
            "Always Warn"
        }
        fn description(&self) -> &str {
            "Emits one warning"
        }
        fn check(&self, _ctx: &RuleContext<'_>) -> Vec<Finding> {
            vec![Finding::warning(self.id(), "custom")]
        }
    }

    #[test]
    fn test_default_rules_registered_in_order() {
        let engine = RulesEngine::with_default_rules();
        let ids: Vec<&str> = engine.rules().iter().map(|r| r.id()).collect();
        assert_eq!(
            ids,
            vec!["socket_chipset", "memory_generation", "form_factor", "power_budget"]
        );
    }

    #[test]
    fn test_custom_rule_runs() {
        let catalog = Catalog::builtin();
        let config = PowerConfig::default();
        let combo: Combo = vec![ComponentRecord::new(Category::Storage, "SSD 1TB")]
            .into_iter()
            .collect();
        let power = PowerEstimator::new(&catalog, &config).estimate(&combo);

        let mut engine = RulesEngine::new();
        engine.add_rule(Arc::new(AlwaysWarn));
        let findings = engine.analyze(&RuleContext {
            combo: &combo,
            power: &power,
            catalog: &catalog,
        });

        assert_eq!(findings, vec![Finding::warning("always_warn", "custom")]);
    }

    #[test]
    fn test_finding_about_component() {
        let record = ComponentRecord::new(Category::Cpu, "AMD 라이젠5 7600");
        let finding = Finding::issue("x", "bad").about(&record);
        assert_eq!(finding.component.as_deref(), Some("AMD 라이젠5 7600"));
    }
}
