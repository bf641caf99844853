use serde::{Deserialize, Serialize};

use crate::analyzer::rules::{Finding, Severity};
use crate::config::PowerConfig;
use crate::power::SAFETY_FACTOR;

/// Everything the arbiter is told about one combination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbitrationRequest {
    /// One line per component, as produced by `Combo::describe`
    pub combo_description: String,
    pub deterministic_compatible: bool,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    pub uncertain: Vec<String>,
    pub power_policy: PowerConfig,
}

impl ArbitrationRequest {
    pub fn new(combo_description: String, findings: &[Finding], power_policy: &PowerConfig) -> Self {
        let messages = |severity: Severity| {
            findings
                .iter()
                .filter(|f| f.severity == severity)
                .map(|f| f.message.clone())
                .collect::<Vec<_>>()
        };
        let issues = messages(Severity::Issue);

        Self {
            combo_description,
            deterministic_compatible: issues.is_empty(),
            issues,
            warnings: messages(Severity::Warning),
            uncertain: messages(Severity::Uncertain),
            power_policy: power_policy.clone(),
        }
    }
}

pub fn build_arbitration_prompt(request: &ArbitrationRequest) -> String {
    let policy = &request.power_policy;

    format!(
        r#"Give a final compatibility judgment for the following PC build.

Build:
{combo}

Rule-based pre-check:
- Result: {verdict}
- Issues: {issues}
- Warnings: {warnings}

Items that need your judgment:
{uncertain}

Checks, in priority order:

1. Power capacity (highest priority). Recompute with your own knowledge:
   - CPU real draw (PPT / max turbo power)
   - GPU real draw (board power)
   - Everything else: {overhead}W
   - Total draw = CPU + GPU + {overhead}W
   - Safe capacity = rated supply output x {safety}
   - Margin = (safe capacity - total draw) / safe capacity x 100
   Judgment: total draw above safe capacity is incompatible; margin below {thin}% is a warning (thin); margin below {low}% is a warning (low); otherwise fine.

2. CPU socket vs motherboard chipset. AMD and Intel parts never mix; the chipset must carry the CPU's socket generation.

3. Memory generation. The DDR generation of the memory must be supported by both the CPU and the motherboard.

4. Physical fit. Large GPUs in small cases, tall tower coolers against memory, board format vs case. A smaller board in a larger case is fine.

Reply format. The FIRST line must be exactly one of:
✅ compatible
❌ incompatible

Then these two sections, one hyphen-prefixed item per line, or "- none":

Issues:
- ...

Warnings:
- ...
"#,
        combo = request.combo_description,
        verdict = if request.deterministic_compatible { "pass" } else { "fail" },
        issues = join_or_none(&request.issues),
        warnings = join_or_none(&request.warnings),
        uncertain = bullet_or_none(&request.uncertain),
        overhead = policy.overhead_w,
        safety = SAFETY_FACTOR,
        thin = policy.thin_margin_pct,
        low = policy.low_margin_pct,
    )
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join("; ")
    }
}

fn bullet_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "- none".to_string()
    } else {
        items
            .iter()
            .map(|i| format!("- {}", i))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_carries_policy_and_findings() {
        let findings = vec![
            Finding::warning("power_budget", "Power margin is low (12.0%)"),
            Finding::uncertain("form_factor", "GPU length clearance needs confirmation"),
        ];
        let request = ArbitrationRequest::new(
            "- CPU: AMD 라이젠7 7800X3D".to_string(),
            &findings,
            &PowerConfig::default(),
        );

        assert!(request.deterministic_compatible);
        assert_eq!(request.uncertain.len(), 1);

        let prompt = build_arbitration_prompt(&request);
        assert!(prompt.contains("AMD 라이젠7 7800X3D"));
        assert!(prompt.contains("- GPU length clearance needs confirmation"));
        assert!(prompt.contains("Issues: none"));
        assert!(prompt.contains("85W"));
        assert!(prompt.contains("x 0.8"));
        assert!(prompt.contains("below 10%"));
        assert!(prompt.contains("below 20%"));
    }

    #[test]
    fn test_failed_precheck_is_reported() {
        let findings = vec![Finding::issue("socket_chipset", "vendor mismatch")];
        let request = ArbitrationRequest::new(String::new(), &findings, &PowerConfig::default());
        let prompt = build_arbitration_prompt(&request);
        assert!(prompt.contains("Result: fail"));
        assert!(prompt.contains("vendor mismatch"));
    }
}
