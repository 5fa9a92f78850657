use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use veredicto_logging::{LogEvent, Logger};
use veredicto_model::{run_with_retry, Model, ModelConfig, RetryPolicy};
use veredicto_verdict::{VerdictPrompts, VerdictReport};

use crate::error::AnalyzeError;
use crate::tools::standard_tools;
use crate::{AnalysisOutcome, EvidenceStore};

/// Reasoning step budget for the jury agent
const JURY_MAX_STEPS: usize = 12;
/// Reasoning step budget for tool-less sub-agents
const SUB_AGENT_MAX_STEPS: usize = 6;

/// Retry policy for the jury call: two retries, 0.8s base backoff
fn jury_retry() -> RetryPolicy {
    RetryPolicy::new(2, Duration::from_millis(800))
}

/// Orchestrates the end-to-end analysis of one claim.
///
/// Resets the shared evidence store, builds the jury agent with the
/// three sub-agent tools bound, sends the verdict prompt under the
/// retry policy, validates and extracts the verdict fields, and
/// assembles the final outcome.
pub struct ClaimAnalyzer {
    model: Arc<dyn Model>,
    store: Arc<EvidenceStore>,
    config: ModelConfig,
    logger: Arc<Logger>,
}

impl ClaimAnalyzer {
    pub fn new(
        model: Arc<dyn Model>,
        store: Arc<EvidenceStore>,
        config: ModelConfig,
        logger: Arc<Logger>,
    ) -> Self {
        Self {
            model,
            store,
            config,
            logger,
        }
    }

    /// Analyze a claim and produce the final outcome
    pub async fn analyze(&self, claim: &str) -> Result<AnalysisOutcome, AnalyzeError> {
        let claim = claim.trim();
        if claim.is_empty() {
            return Err(AnalyzeError::EmptyClaim);
        }

        let start = Instant::now();
        self.logger.log(&LogEvent::AnalysisStarted {
            claim_preview: claim.chars().take(100).collect(),
        });

        // Evidence from the previous claim must not leak into this one
        self.store.reset();

        let sub_config = self.config.clone().with_max_steps(SUB_AGENT_MAX_STEPS);
        let tools = standard_tools(&self.model, &self.store, &sub_config, &self.logger);

        let jury_config = self.config.clone().with_max_steps(JURY_MAX_STEPS);
        let instructions = VerdictPrompts::jury_instructions();
        let prompt = VerdictPrompts::build_verdict_prompt(claim);

        debug!(model = %jury_config.model, "Running jury agent");
        let output = run_with_retry(jury_retry(), || {
            self.model
                .complete(&instructions, &prompt, &tools, &jury_config)
        })
        .await
        .map_err(|e| {
            self.logger.log(&LogEvent::ErrorEncountered {
                error: e.to_string(),
            });
            e
        })?;

        self.logger.log(&LogEvent::JuryCompleted {
            tool_rounds: output.tool_rounds,
            duration_secs: output.duration.as_secs_f64(),
        });

        let report = VerdictReport::parse(&output.text);
        for warning in &report.warnings {
            self.logger.log(&LogEvent::ValidatorWarning {
                warning: warning.to_string(),
            });
        }

        let evidence = self.store.snapshot();

        self.logger.log(&LogEvent::AnalysisCompleted {
            verdict: report.short_description(),
            duration_secs: start.elapsed().as_secs_f64(),
        });

        Ok(AnalysisOutcome {
            report,
            evidence,
            raw_output: output.text,
            analyzed_at: Utc::now(),
            duration_secs: start.elapsed().as_secs_f64(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use veredicto_logging::LogFormat;
    use veredicto_model::{ModelError, ModelOutput, Tool};
    use veredicto_verdict::Verdict;

    /// Scripted model: sub-agent calls echo an analysis; jury calls
    /// invoke every bound tool and return a fixed verdict, after an
    /// optional number of initial failures.
    struct ScriptedModel {
        jury_calls: AtomicUsize,
        jury_failures: usize,
        invoke_tools: bool,
    }

    impl ScriptedModel {
        fn new(jury_failures: usize, invoke_tools: bool) -> Self {
            Self {
                jury_calls: AtomicUsize::new(0),
                jury_failures,
                invoke_tools,
            }
        }
    }

    #[async_trait]
    impl Model for ScriptedModel {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            _instructions: &str,
            prompt: &str,
            tools: &[Arc<dyn Tool>],
            _config: &ModelConfig,
        ) -> Result<ModelOutput, ModelError> {
            if tools.is_empty() {
                // Sub-agent invocation
                return Ok(ModelOutput::new(
                    format!("Análisis de «{}».", prompt),
                    0,
                    Duration::ZERO,
                ));
            }

            let call = self.jury_calls.fetch_add(1, Ordering::SeqCst);
            if call < self.jury_failures {
                return Err(ModelError::EmptyResponse);
            }

            if self.invoke_tools {
                for tool in tools {
                    tool.call("El cielo es verde por la noche")
                        .await
                        .map_err(|e| ModelError::ToolFailed {
                            name: tool.spec().name.to_string(),
                            message: e.to_string(),
                        })?;
                }
            }

            Ok(ModelOutput::new(
                "Veredicto: Falso\n\
Justificación breve: Contradice el sentido común.\n\
Confiabilidad: 0.9\n"
                    .to_string(),
                1,
                Duration::ZERO,
            ))
        }
    }

    fn analyzer_with(model: Arc<ScriptedModel>, store: Arc<EvidenceStore>) -> ClaimAnalyzer {
        ClaimAnalyzer::new(
            model,
            store,
            ModelConfig::default(),
            Arc::new(Logger::new(LogFormat::Compact)),
        )
    }

    #[tokio::test]
    async fn test_analyze_full_flow() {
        let store = Arc::new(EvidenceStore::new());
        let analyzer = analyzer_with(Arc::new(ScriptedModel::new(0, true)), store.clone());

        let outcome = analyzer
            .analyze("El cielo es verde por la noche")
            .await
            .unwrap();

        assert_eq!(outcome.report.verdict, Some(Verdict::Falso));
        assert_eq!(outcome.report.confidence, Some(0.9));
        assert!(outcome.report.warnings.is_empty());
        assert!(outcome.evidence.sensationalism.is_some());
        assert!(outcome.evidence.grammar.is_some());
        assert!(outcome.evidence.common_sense.is_some());

        let md = outcome.to_markdown();
        assert!(md.contains("**Veredicto:** Falso"));
        assert!(!md.contains("no se invocó la tool"));
    }

    #[tokio::test]
    async fn test_analyze_rejects_empty_claim() {
        let store = Arc::new(EvidenceStore::new());
        let analyzer = analyzer_with(Arc::new(ScriptedModel::new(0, true)), store);

        let result = analyzer.analyze("   \n  ").await;
        assert!(matches!(result, Err(AnalyzeError::EmptyClaim)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyze_retries_jury_failures() {
        let model = Arc::new(ScriptedModel::new(2, true));
        let store = Arc::new(EvidenceStore::new());
        let analyzer = analyzer_with(model.clone(), store);

        let outcome = analyzer.analyze("El agua moja").await.unwrap();
        assert_eq!(outcome.report.verdict, Some(Verdict::Falso));
        // Two failures plus the successful attempt
        assert_eq!(model.jury_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyze_propagates_exhausted_retries() {
        let model = Arc::new(ScriptedModel::new(10, true));
        let store = Arc::new(EvidenceStore::new());
        let analyzer = analyzer_with(model.clone(), store);

        let result = analyzer.analyze("El agua moja").await;
        assert!(matches!(result, Err(AnalyzeError::Model(_))));
        // First attempt plus two retries
        assert_eq!(model.jury_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_evidence_reset_between_claims() {
        let store = Arc::new(EvidenceStore::new());

        let with_tools = analyzer_with(Arc::new(ScriptedModel::new(0, true)), store.clone());
        let outcome = with_tools.analyze("Primera afirmación").await.unwrap();
        assert!(outcome.evidence.grammar.is_some());

        // Second analysis never invokes the tools; stale evidence must not survive
        let without_tools = analyzer_with(Arc::new(ScriptedModel::new(0, false)), store.clone());
        let outcome = without_tools.analyze("Segunda afirmación").await.unwrap();
        assert!(outcome.evidence.sensationalism.is_none());
        assert!(outcome.evidence.grammar.is_none());
        assert!(outcome.evidence.common_sense.is_none());
        assert!(outcome.to_markdown().contains("no se invocó la tool"));
    }
}
