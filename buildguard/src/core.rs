//! Core evaluation pipeline shared by the library API and the CLI.
//!
//! normalize → {power estimate, rules} → escalation (only with uncertain
//! findings) → verdict. Every evaluation is independent; nothing is kept
//! between calls.

use std::sync::Arc;

use futures::future::join_all;

use crate::ai::escalation::EscalationCoordinator;
use crate::ai::provider::AIProvider;
use crate::analyzer::rules::{Finding, RuleContext, RulesEngine};
use crate::catalog::{load_catalog_from_directory, Catalog};
use crate::config::EngineConfig;
use crate::parser::{split_candidates, Combo, ComboInput, ComboNormalizer, NormalizationError};
use crate::power::{PowerEstimate, PowerEstimator};
use crate::verdict::Verdict;

#[derive(Debug, thiserror::Error)]
pub enum BuildGuardError {
    #[error("Normalization error: {0}")]
    Normalization(#[from] NormalizationError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Catalog error: {0}")]
    Catalog(String),
}

/// Deterministic half of an evaluation
#[derive(Debug, Clone)]
pub struct Assessment {
    pub combo: Combo,
    pub power: PowerEstimate,
    pub findings: Vec<Finding>,
}

/// Evaluation engine: one catalog, one rule set, one arbiter binding.
pub struct BuildGuardCore {
    config: EngineConfig,
    catalog: Catalog,
    engine: RulesEngine,
    escalation: EscalationCoordinator,
}

impl BuildGuardCore {
    /// Engine without an arbiter. Fails only on invalid configuration or an
    /// unreadable catalog override.
    pub fn new(config: EngineConfig) -> Result<Self, BuildGuardError> {
        config.validate()?;

        let catalog = match config.catalog_dir.as_deref() {
            Some(dir) => {
                let (catalog, errors) = load_catalog_from_directory(dir);
                if !errors.is_empty() {
                    return Err(BuildGuardError::Catalog(errors.join("; ")));
                }
                catalog
            }
            None => Catalog::builtin(),
        };

        let escalation = EscalationCoordinator::new(None, &config.arbiter, &config.power);
        Ok(Self {
            config,
            catalog,
            engine: RulesEngine::with_default_rules(),
            escalation,
        })
    }

    /// Attach an arbiter. Ignored when the arbiter is disabled in config.
    pub fn with_provider(mut self, provider: Arc<dyn AIProvider>) -> Self {
        if !self.config.arbiter.enabled {
            tracing::info!("Arbiter disabled by configuration; {} not used", provider.name());
            return self;
        }
        tracing::info!("Using arbiter provider: {}", provider.name());
        self.escalation =
            EscalationCoordinator::new(Some(provider), &self.config.arbiter, &self.config.power);
        self
    }

    pub fn with_rules(mut self, engine: RulesEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn rules(&self) -> &RulesEngine {
        &self.engine
    }

    pub fn has_arbiter(&self) -> bool {
        self.escalation.has_arbiter()
    }

    pub fn normalize(&self, input: &ComboInput) -> Result<Combo, NormalizationError> {
        ComboNormalizer::new(&self.catalog).normalize(input)
    }

    /// Power estimate and rule findings for a combo
    pub fn check(&self, combo: &Combo) -> (PowerEstimate, Vec<Finding>) {
        let power = PowerEstimator::new(&self.catalog, &self.config.power).estimate(combo);
        let findings = self.engine.analyze(&RuleContext {
            combo,
            power: &power,
            catalog: &self.catalog,
        });
        (power, findings)
    }

    /// Normalize and run the deterministic checks, without arbitration
    pub fn assess(&self, input: &ComboInput) -> Result<Assessment, NormalizationError> {
        let combo = self.normalize(input)?;
        let (power, findings) = self.check(&combo);
        Ok(Assessment {
            combo,
            power,
            findings,
        })
    }

    /// Full evaluation of one candidate
    pub async fn evaluate(&self, input: &ComboInput) -> Verdict {
        let assessment = match self.assess(input) {
            Ok(a) => a,
            Err(e) => {
                tracing::warn!("{}", e);
                return Verdict::normalization_failure(&e);
            }
        };

        let escalated = self
            .escalation
            .escalate(&assessment.combo.describe(), &assessment.findings)
            .await;

        Verdict::aggregate(&assessment.findings, &escalated, Some(assessment.power))
    }

    /// Evaluation without any arbiter call; uncertain findings become warnings
    pub fn evaluate_offline(&self, input: &ComboInput) -> Verdict {
        match self.assess(input) {
            Ok(a) => {
                let escalated = self.escalation.escalate_offline(&a.findings);
                Verdict::aggregate(&a.findings, &escalated, Some(a.power))
            }
            Err(e) => {
                tracing::warn!("{}", e);
                Verdict::normalization_failure(&e)
            }
        }
    }

    /// Evaluate candidates concurrently. Verdicts come back in input order.
    pub async fn evaluate_batch(&self, inputs: &[ComboInput]) -> Vec<Verdict> {
        join_all(inputs.iter().map(|input| self.evaluate(input))).await
    }

    /// Split a multi-candidate text and evaluate each candidate
    pub async fn evaluate_text_batch(&self, text: &str) -> Vec<Verdict> {
        let inputs: Vec<ComboInput> = split_candidates(text)
            .into_iter()
            .map(ComboInput::FreeText)
            .collect();
        tracing::debug!("Evaluating {} candidate(s)", inputs.len());
        self.evaluate_batch(&inputs).await
    }
}
