//! Power supply capacity against the estimated worst-case draw

use crate::analyzer::rules::{Finding, Rule, RuleContext};
use crate::parser::schema::Category;
use crate::power::PowerTier;

pub struct PowerBudgetRule;

impl Rule for PowerBudgetRule {
    fn id(&self) -> &str {
        "power_budget"
    }

    fn name(&self) -> &str {
        "Power Budget"
    }

    fn description(&self) -> &str {
        "Estimated CPU + GPU + system draw must stay within 80% of the supply's rated output"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Finding> {
        let Some(psu) = ctx.combo.get(Category::PowerSupply) else {
            return Vec::new();
        };
        let power = ctx.power;
        let mut findings = Vec::new();

        if power.rated_capacity_w == 0 {
            findings.push(
                Finding::issue(
                    self.id(),
                    format!(
                        "Insufficient power: rated output of power supply '{}' could not be determined; {}W estimated draw cannot be verified",
                        psu.name, power.total_draw_w
                    ),
                )
                .about(psu),
            );
        } else if power.exceeds_safety_capacity() {
            findings.push(
                Finding::issue(
                    self.id(),
                    format!(
                        "Insufficient power: supply '{}' cannot carry the load; {}W estimated draw exceeds the {:.0}W safe capacity of a {}W unit",
                        psu.name, power.total_draw_w, power.safety_capacity_w, power.rated_capacity_w
                    ),
                )
                .about(psu),
            );
        } else {
            match power.tier {
                PowerTier::Thin => findings.push(
                    Finding::warning(
                        self.id(),
                        format!(
                            "Power margin is thin ({:.1}%): '{}' leaves little headroom over {}W",
                            power.margin_pct, psu.name, power.total_draw_w
                        ),
                    )
                    .about(psu),
                ),
                PowerTier::Low => findings.push(
                    Finding::warning(
                        self.id(),
                        format!(
                            "Power margin is low ({:.1}%): consider a larger supply than '{}'",
                            power.margin_pct, psu.name
                        ),
                    )
                    .about(psu),
                ),
                PowerTier::Sufficient | PowerTier::Insufficient => {}
            }
        }

        findings.push(
            Finding::uncertain(self.id(), format!("Power budget: {}", power.breakdown())).about(psu),
        );
        findings
    }
}
