//! BuildGuard - PC build compatibility and power-budget verification
//!
//! This library checks a candidate combination of PC components (CPU,
//! motherboard, memory, power supply, case, storage, cooler, graphics card)
//! for socket, memory, form-factor and power-budget compatibility, and
//! produces a verdict with itemized issues and warnings.
//!
//! # Quick Start
//!
//! ```no_run
//! use buildguard::{BuildGuardCore, ComboInput, EngineConfig};
//!
//! let core = BuildGuardCore::new(EngineConfig::default()).unwrap();
//! let verdict = core.evaluate_offline(&ComboInput::from(
//!     "CPU: AMD 라이젠5 7600\n메인보드: ASRock B650M PRO RS\n파워: Micronics 600W",
//! ));
//!
//! println!("compatible: {}", verdict.compatible);
//! for issue in &verdict.issues {
//!     println!("issue: {}", issue);
//! }
//! ```
//!
//! # Features
//!
//! - **Input normalization**: structured JSON records or quote-style free text
//! - **Power budget**: worst-case draw against 80% of rated supply output
//! - **Deterministic rules**: socket/chipset, memory generation, form factor
//! - **Optional arbiter**: OpenAI/Ollama judgment for ambiguous findings

pub mod ai;
pub mod analyzer;
pub mod catalog;
pub mod config;
pub mod core;
pub mod parser;
pub mod power;
pub mod verdict;

// Re-export main types
pub use crate::core::{Assessment, BuildGuardCore, BuildGuardError};
pub use ai::{AIError, AIProvider, AIRouter};
pub use analyzer::rules::{Finding, Rule, RuleContext, RulesEngine, Severity};
pub use catalog::Catalog;
pub use config::{ArbiterConfig, EngineConfig, PowerConfig};
pub use parser::schema::{Category, Combo, ComboInput, ComponentRecord};
pub use parser::{split_candidates, NormalizationError};
pub use power::{PowerEstimate, PowerTier};
pub use verdict::Verdict;

/// Evaluate one input with default settings and no arbiter (convenience wrapper).
pub fn check_offline(input: impl Into<ComboInput>) -> Result<Verdict, BuildGuardError> {
    let core = BuildGuardCore::new(EngineConfig::default())?;
    Ok(core.evaluate_offline(&input.into()))
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        BuildGuardCore, BuildGuardError, Category, ComboInput, ComponentRecord, EngineConfig,
        Finding, PowerEstimate, PowerTier, Severity, Verdict,
    };
}
