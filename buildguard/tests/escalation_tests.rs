//! Arbiter escalation tests against a scripted provider

use async_trait::async_trait;
use buildguard::ai::{AIError, AIProvider, ModelInfo, ARBITER_FAILURE_WARNING};
use buildguard::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_input(name: &str) -> ComboInput {
    ComboInput::from(std::fs::read_to_string(fixture_path(name)).unwrap())
}

/// Answers every prompt with the same reply after an optional delay
struct ScriptedProvider {
    reply: Option<String>,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl ScriptedProvider {
    fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    fn failing() -> Self {
        Self {
            reply: None,
            ..Self::replying("")
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AIProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn complete(&self, prompt: &str) -> Result<String, AIError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.reply.clone().ok_or(AIError::ApiError {
            status: 503,
            message: "service unavailable".to_string(),
        })
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "scripted".to_string(),
            model_name: "fixed-reply".to_string(),
            is_local: true,
            context_window: 0,
        }
    }
}

fn core_with(provider: Arc<ScriptedProvider>, config: EngineConfig) -> BuildGuardCore {
    BuildGuardCore::new(config).unwrap().with_provider(provider)
}

#[tokio::test]
async fn test_arbiter_incompatible_reply_adds_issues() {
    let provider = Arc::new(ScriptedProvider::replying(
        "❌ incompatible\n\nIssues:\n- GPU is 336mm long but the case fits 330mm\n\nWarnings:\n- none\n",
    ));
    let core = core_with(provider.clone(), EngineConfig::default());

    let verdict = core.evaluate(&fixture_input("valid_build.txt")).await;

    assert_eq!(provider.calls(), 1);
    assert!(!verdict.compatible);
    assert_eq!(
        verdict.issues,
        vec!["GPU is 336mm long but the case fits 330mm".to_string()]
    );
    assert!(verdict.warnings.is_empty());
}

#[tokio::test]
async fn test_arbiter_compatible_reply_keeps_warnings() {
    let provider = Arc::new(ScriptedProvider::replying(
        "✅ compatible\nIssues:\n- none\nWarnings:\n- Check cooler height against the case limit\n",
    ));
    let core = core_with(provider.clone(), EngineConfig::default());

    let verdict = core.evaluate(&fixture_input("valid_build.txt")).await;

    assert!(verdict.compatible);
    assert_eq!(
        verdict.warnings,
        vec!["Check cooler height against the case limit".to_string()]
    );
}

#[tokio::test]
async fn test_arbiter_cannot_clear_deterministic_issues() {
    let provider = Arc::new(ScriptedProvider::replying(
        "✅ compatible\nIssues:\n- none\nWarnings:\n- none",
    ));
    let core = core_with(provider.clone(), EngineConfig::default());

    let verdict = core.evaluate(&fixture_input("incompatible_build.txt")).await;

    assert_eq!(provider.calls(), 1);
    assert!(!verdict.compatible);
    assert_eq!(verdict.issues.len(), 4);
}

#[tokio::test]
async fn test_prompt_carries_uncertain_findings() {
    let provider = Arc::new(ScriptedProvider::replying("✅ compatible"));
    let core = core_with(provider.clone(), EngineConfig::default());

    core.evaluate(&fixture_input("valid_build.txt")).await;

    let prompt = provider.last_prompt.lock().unwrap().clone().unwrap();
    assert!(prompt.contains("Power budget:"));
    assert!(prompt.contains("ASRock B650M PRO RS"));
    assert!(prompt.contains("✅"));
}

#[tokio::test]
async fn test_unmarked_reply_fails_open() {
    let provider = Arc::new(ScriptedProvider::replying(
        "I think this build looks fine overall.",
    ));
    let core = core_with(provider.clone(), EngineConfig::default());

    let verdict = core.evaluate(&fixture_input("valid_build.txt")).await;

    assert!(verdict.compatible);
    assert_eq!(verdict.warnings, vec![ARBITER_FAILURE_WARNING.to_string()]);
}

#[tokio::test]
async fn test_provider_error_fails_open() {
    let provider = Arc::new(ScriptedProvider::failing());
    let core = core_with(provider.clone(), EngineConfig::default());

    let verdict = core.evaluate(&fixture_input("incompatible_build.txt")).await;

    assert_eq!(verdict.issues.len(), 4);
    assert_eq!(verdict.warnings, vec![ARBITER_FAILURE_WARNING.to_string()]);
}

#[tokio::test]
async fn test_arbiter_timeout_fails_open() {
    let provider = Arc::new(
        ScriptedProvider::replying("❌ incompatible\nIssues:\n- too late")
            .with_delay(Duration::from_secs(3)),
    );
    let mut config = EngineConfig::default();
    config.arbiter.timeout_secs = 1;
    let core = core_with(provider.clone(), config);

    let verdict = core.evaluate(&fixture_input("valid_build.txt")).await;

    assert!(verdict.compatible);
    assert_eq!(verdict.warnings, vec![ARBITER_FAILURE_WARNING.to_string()]);
}

#[tokio::test]
async fn test_no_uncertain_findings_skips_arbiter() {
    let provider = Arc::new(ScriptedProvider::replying("❌ incompatible"));
    let core = core_with(provider.clone(), EngineConfig::default());

    let verdict = core
        .evaluate(&ComboInput::from(
            "CPU: AMD 라이젠5 7600\n메인보드: ASRock B650M PRO RS\nRAM: 삼성전자 DDR5-5600 16GB",
        ))
        .await;

    assert_eq!(provider.calls(), 0);
    assert!(verdict.compatible);
    assert!(verdict.warnings.is_empty());
}

#[tokio::test]
async fn test_disabled_arbiter_ignores_provider() {
    let provider = Arc::new(ScriptedProvider::replying("❌ incompatible"));
    let mut config = EngineConfig::default();
    config.arbiter.enabled = false;
    let core = core_with(provider.clone(), config);

    assert!(!core.has_arbiter());
    let verdict = core.evaluate(&fixture_input("valid_build.txt")).await;

    assert_eq!(provider.calls(), 0);
    assert!(verdict.compatible);
    assert_eq!(verdict.warnings.len(), 2);
}

#[tokio::test]
async fn test_batch_respects_concurrency_limit() {
    let provider = Arc::new(
        ScriptedProvider::replying("✅ compatible").with_delay(Duration::from_millis(50)),
    );
    let mut config = EngineConfig::default();
    config.arbiter.max_concurrent = 2;
    let core = core_with(provider.clone(), config);

    let valid = fixture_input("valid_build.txt");
    let broken = fixture_input("incompatible_build.txt");
    let inputs: Vec<ComboInput> = (0..6)
        .map(|i| if i % 2 == 0 { valid.clone() } else { broken.clone() })
        .collect();

    let verdicts = core.evaluate_batch(&inputs).await;

    assert_eq!(provider.calls(), 6);
    assert!(provider.peak_in_flight.load(Ordering::SeqCst) <= 2);
    let compatible: Vec<bool> = verdicts.iter().map(|v| v.compatible).collect();
    assert_eq!(compatible, vec![true, false, true, false, true, false]);
}
