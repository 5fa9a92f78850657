use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use veredicto_logging::{LogEvent, Logger};
use veredicto_model::{
    run_with_retry, Model, ModelConfig, RetryPolicy, Tool, ToolError, ToolSpec,
};
use veredicto_verdict::VerdictPrompts;

use crate::{EvidenceKind, EvidenceStore};

/// Retry policy for sub-agent calls: one retry, 0.8s base backoff
fn sub_agent_retry() -> RetryPolicy {
    RetryPolicy::new(1, Duration::from_millis(800))
}

/// A sub-agent exposed to the jury as a callable tool.
///
/// Each wraps a single fixed instruction sent to the model with no
/// tools of its own; the output is recorded into the evidence store
/// and handed back to the jury.
pub struct SubAgentTool {
    spec: ToolSpec,
    instructions: &'static str,
    kind: EvidenceKind,
    model: Arc<dyn Model>,
    store: Arc<EvidenceStore>,
    config: ModelConfig,
    logger: Arc<Logger>,
    retry: RetryPolicy,
}

impl SubAgentTool {
    fn new(
        spec: ToolSpec,
        instructions: &'static str,
        kind: EvidenceKind,
        model: Arc<dyn Model>,
        store: Arc<EvidenceStore>,
        config: ModelConfig,
        logger: Arc<Logger>,
    ) -> Self {
        Self {
            spec,
            instructions,
            kind,
            model,
            store,
            config,
            logger,
            retry: sub_agent_retry(),
        }
    }

    pub fn sensationalism(
        model: Arc<dyn Model>,
        store: Arc<EvidenceStore>,
        config: ModelConfig,
        logger: Arc<Logger>,
    ) -> Self {
        Self::new(
            ToolSpec {
                name: "evaluar_sensacionalismo",
                description: "Detecta uso de lenguaje sensacionalista o emocional.",
                input_description: "La afirmación a evaluar.",
            },
            VerdictPrompts::SUB_SENSATIONALISM,
            EvidenceKind::Sensationalism,
            model,
            store,
            config,
            logger,
        )
    }

    pub fn grammar(
        model: Arc<dyn Model>,
        store: Arc<EvidenceStore>,
        config: ModelConfig,
        logger: Arc<Logger>,
    ) -> Self {
        Self::new(
            ToolSpec {
                name: "evaluar_gramatica",
                description: "Revisa gramática, ortografía y estilo.",
                input_description: "La afirmación a evaluar.",
            },
            VerdictPrompts::SUB_GRAMMAR,
            EvidenceKind::Grammar,
            model,
            store,
            config,
            logger,
        )
    }

    pub fn common_sense(
        model: Arc<dyn Model>,
        store: Arc<EvidenceStore>,
        config: ModelConfig,
        logger: Arc<Logger>,
    ) -> Self {
        Self::new(
            ToolSpec {
                name: "evaluar_sentido_comun",
                description: "Evalúa si la afirmación contradice el sentido común.",
                input_description: "La afirmación a evaluar.",
            },
            VerdictPrompts::SUB_COMMON_SENSE,
            EvidenceKind::CommonSense,
            model,
            store,
            config,
            logger,
        )
    }
}

#[async_trait]
impl Tool for SubAgentTool {
    fn spec(&self) -> ToolSpec {
        self.spec.clone()
    }

    async fn call(&self, input: &str) -> Result<String, ToolError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ToolError::InvalidInput(
                "la afirmación está vacía".to_string(),
            ));
        }

        debug!(tool = self.spec.name, "Running sub-agent");
        let start = Instant::now();
        let prompt = VerdictPrompts::build_sub_agent_prompt(input);
        let output = run_with_retry(self.retry, || {
            self.model.complete(self.instructions, &prompt, &[], &self.config)
        })
        .await?;

        self.logger.log(&LogEvent::ToolCompleted {
            tool: self.spec.name.to_string(),
            duration_secs: start.elapsed().as_secs_f64(),
        });

        self.store.record(self.kind, output.text.clone());
        Ok(output.text)
    }
}

/// Build the three sub-agent tools in the order the jury is told to
/// call them
pub fn standard_tools(
    model: &Arc<dyn Model>,
    store: &Arc<EvidenceStore>,
    config: &ModelConfig,
    logger: &Arc<Logger>,
) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(SubAgentTool::sensationalism(
            model.clone(),
            store.clone(),
            config.clone(),
            logger.clone(),
        )),
        Arc::new(SubAgentTool::grammar(
            model.clone(),
            store.clone(),
            config.clone(),
            logger.clone(),
        )),
        Arc::new(SubAgentTool::common_sense(
            model.clone(),
            store.clone(),
            config.clone(),
            logger.clone(),
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use veredicto_logging::LogFormat;
    use veredicto_model::ModelOutput;

    /// Tool-less model that echoes an analysis for any prompt
    struct EchoModel;

    #[async_trait]
    impl Model for EchoModel {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(
            &self,
            _instructions: &str,
            prompt: &str,
            _tools: &[Arc<dyn Tool>],
            _config: &ModelConfig,
        ) -> Result<ModelOutput, veredicto_model::ModelError> {
            Ok(ModelOutput::new(
                format!("Análisis de «{}».", prompt),
                0,
                Duration::ZERO,
            ))
        }
    }

    #[tokio::test]
    async fn test_call_records_evidence_and_returns_output() {
        let model: Arc<dyn Model> = Arc::new(EchoModel);
        let store = Arc::new(EvidenceStore::new());
        let logger = Arc::new(Logger::new(LogFormat::Compact));
        let tool =
            SubAgentTool::grammar(model, store.clone(), ModelConfig::default(), logger);

        let output = tool.call("El agua moja").await.unwrap();
        assert!(output.contains("El agua moja"));
        assert_eq!(store.get(EvidenceKind::Grammar), Some(output));
    }

    #[tokio::test]
    async fn test_call_rejects_empty_input() {
        let model: Arc<dyn Model> = Arc::new(EchoModel);
        let store = Arc::new(EvidenceStore::new());
        let logger = Arc::new(Logger::new(LogFormat::Compact));
        let tool = SubAgentTool::common_sense(model, store, ModelConfig::default(), logger);

        let result = tool.call("   ").await;
        assert!(matches!(result, Err(ToolError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_call_logs_tool_completion() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("events.jsonl");

        let model: Arc<dyn Model> = Arc::new(EchoModel);
        let store = Arc::new(EvidenceStore::new());
        let logger =
            Arc::new(Logger::with_file(LogFormat::Compact, &log_path).unwrap());
        let tool =
            SubAgentTool::sensationalism(model, store, ModelConfig::default(), logger);

        tool.call("¡INCREÍBLE descubrimiento!").await.unwrap();

        let log = std::fs::read_to_string(&log_path).unwrap();
        assert!(log.contains("\"event\":\"tool_completed\""));
        assert!(log.contains("evaluar_sensacionalismo"));
    }
}
