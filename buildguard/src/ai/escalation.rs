//! Escalation Coordinator
//!
//! Uncertain findings are the only thing ever sent to the arbiter. Each call
//! holds a semaphore permit for its whole duration and is bounded by a
//! timeout. Any failure fails open with a single manual-review warning; the
//! arbiter can add findings but never remove a deterministic one.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::ai::prompts::{build_arbitration_prompt, ArbitrationRequest};
use crate::ai::provider::AIProvider;
use crate::ai::reply::{parse_reply, ArbiterReply};
use crate::ai::AIError;
use crate::analyzer::rules::{Finding, Severity};
use crate::config::{ArbiterConfig, PowerConfig};

pub const ARBITER_RULE_ID: &str = "arbiter";
pub const ARBITER_FAILURE_WARNING: &str =
    "Automated compatibility judgment failed; manual review required";
const MANUAL_CONFIRMATION_SUFFIX: &str = "manual confirmation recommended";
const UNITEMIZED_INCOMPATIBILITY: &str =
    "Arbiter judged the combination incompatible without itemizing a reason";

pub struct EscalationCoordinator {
    provider: Option<Arc<dyn AIProvider>>,
    permits: Arc<Semaphore>,
    timeout: Duration,
    power_policy: PowerConfig,
}

impl EscalationCoordinator {
    pub fn new(
        provider: Option<Arc<dyn AIProvider>>,
        arbiter: &ArbiterConfig,
        power_policy: &PowerConfig,
    ) -> Self {
        Self {
            provider,
            permits: Arc::new(Semaphore::new(arbiter.max_concurrent.max(1))),
            timeout: arbiter.timeout(),
            power_policy: power_policy.clone(),
        }
    }

    /// Coordinator that only ever demotes uncertain findings
    pub fn offline(power_policy: &PowerConfig) -> Self {
        Self::new(None, &ArbiterConfig::default(), power_policy)
    }

    pub fn has_arbiter(&self) -> bool {
        self.provider.is_some()
    }

    /// Resolve the uncertain findings in `findings` into issues and warnings.
    ///
    /// Returns nothing when no finding is uncertain.
    pub async fn escalate(&self, combo_description: &str, findings: &[Finding]) -> Vec<Finding> {
        if !findings.iter().any(|f| f.severity == Severity::Uncertain) {
            return Vec::new();
        }

        let Some(provider) = self.provider.as_ref() else {
            return demote_uncertain(findings);
        };

        let request =
            ArbitrationRequest::new(combo_description.to_string(), findings, &self.power_policy);
        let prompt = build_arbitration_prompt(&request);

        match self.arbitrate(&**provider, &prompt).await {
            Ok(reply) => {
                tracing::debug!(
                    "Arbiter {} replied compatible={} issues={} warnings={}",
                    provider.name(),
                    reply.compatible,
                    reply.issues.len(),
                    reply.warnings.len()
                );
                reply_to_findings(reply)
            }
            Err(e) => {
                tracing::warn!("Arbiter {} failed: {}", provider.name(), e);
                vec![Finding::warning(ARBITER_RULE_ID, ARBITER_FAILURE_WARNING)]
            }
        }
    }

    /// Synchronous path used when no runtime is available
    pub fn escalate_offline(&self, findings: &[Finding]) -> Vec<Finding> {
        demote_uncertain(findings)
    }

    async fn arbitrate(&self, provider: &dyn AIProvider, prompt: &str) -> Result<ArbiterReply, AIError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| AIError::InvalidResponse(format!("arbiter permits closed: {}", e)))?;

        let text = tokio::time::timeout(self.timeout, provider.complete(prompt))
            .await
            .map_err(|_| AIError::Timeout(self.timeout.as_secs()))??;

        parse_reply(&text)
    }
}

/// Every uncertain finding becomes a warning asking for manual confirmation
pub fn demote_uncertain(findings: &[Finding]) -> Vec<Finding> {
    findings
        .iter()
        .filter(|f| f.severity == Severity::Uncertain)
        .map(|f| Finding {
            rule_id: f.rule_id.clone(),
            severity: Severity::Warning,
            message: format!("{} ({})", f.message, MANUAL_CONFIRMATION_SUFFIX),
            component: f.component.clone(),
        })
        .collect()
}

fn reply_to_findings(reply: ArbiterReply) -> Vec<Finding> {
    let mut findings: Vec<Finding> = reply
        .issues
        .into_iter()
        .map(|m| Finding::issue(ARBITER_RULE_ID, m))
        .collect();

    if !reply.compatible && findings.is_empty() {
        findings.push(Finding::issue(ARBITER_RULE_ID, UNITEMIZED_INCOMPATIBILITY));
    }

    findings.extend(
        reply
            .warnings
            .into_iter()
            .map(|m| Finding::warning(ARBITER_RULE_ID, m)),
    );
    findings
}
