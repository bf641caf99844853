pub mod form_factor;
pub mod memory;
pub mod power_budget;
pub mod rules;
pub mod socket;

pub use rules::{Finding, Rule, RuleContext, RulesEngine, Severity};
