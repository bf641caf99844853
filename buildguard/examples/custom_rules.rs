//! Example: adding a custom rule to the engine and running the deterministic checks.
//! Run with: cargo run --example custom_rules [path/to/build.txt]

use buildguard::{
    BuildGuardCore, ComboInput, EngineConfig, Finding, Rule, RuleContext, RulesEngine, Severity,
};
use std::path::Path;
use std::sync::Arc;

/// Warns when the quoted prices add up to more than a fixed budget
struct BudgetRule {
    limit: u64,
}

impl Rule for BudgetRule {
    fn id(&self) -> &str {
        "budget"
    }

    fn name(&self) -> &str {
        "Budget"
    }

    fn description(&self) -> &str {
        "Total quoted price must stay within the configured budget"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Finding> {
        let total: u64 = ctx.combo.iter().filter_map(|r| r.price).sum();
        if total > self.limit {
            vec![Finding::warning(
                self.id(),
                format!("Quoted total {}원 exceeds the {}원 budget", total, self.limit),
            )]
        } else {
            Vec::new()
        }
    }
}

fn main() -> Result<(), buildguard::BuildGuardError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/valid_build.txt".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example custom_rules [path/to/build.txt]");
        std::process::exit(1);
    }

    let mut engine = RulesEngine::with_default_rules();
    engine.add_rule(Arc::new(BudgetRule { limit: 1_000_000 }));

    let core = BuildGuardCore::new(EngineConfig::default())?.with_rules(engine);
    let text = std::fs::read_to_string(path)?;
    let assessment = core.assess(&ComboInput::from(text))?;

    println!(
        "{} findings for {} ({})",
        assessment.findings.len(),
        path.display(),
        assessment.power.breakdown()
    );
    for finding in &assessment.findings {
        println!("  [{}] {}: {}", finding.severity, finding.rule_id, finding.message);
    }

    let issues = assessment
        .findings
        .iter()
        .filter(|f| f.severity == Severity::Issue)
        .count();
    if issues > 0 {
        std::process::exit(1);
    }
    Ok(())
}
