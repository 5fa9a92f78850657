use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::ModelOutput;

/// Errors that can occur during a model invocation
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Model requested unknown tool: {0}")]
    UnknownTool(String),

    #[error("Tool '{name}' failed: {message}")]
    ToolFailed { name: String, message: String },

    #[error("Model exceeded the step budget of {0}")]
    StepBudgetExceeded(usize),
}

/// Errors raised by a tool invocation
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Model call failed: {0}")]
    Model(#[from] ModelError),

    #[error("Invalid tool input: {0}")]
    InvalidInput(String),
}

/// Per-call configuration for a model invocation
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model identifier (e.g. "gpt-4o-mini")
    pub model: String,
    /// Maximum reasoning steps (tool-call rounds) before giving up
    pub max_steps: usize,
}

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_steps: 6,
        }
    }
}

impl ModelConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
}

/// Description of a tool as exposed to the model
#[derive(Debug, Clone)]
pub struct ToolSpec {
    /// Function name the model calls the tool by
    pub name: &'static str,
    /// What the tool does, shown to the model
    pub description: &'static str,
    /// Description of the single text parameter
    pub input_description: &'static str,
}

/// A callable unit the supervising model can invoke
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's function-calling schema
    fn spec(&self) -> ToolSpec;

    /// Run the tool against the given text
    async fn call(&self, input: &str) -> Result<String, ToolError>;
}

/// The core abstraction over a hosted language model.
///
/// Accepts a system instruction, a user prompt, and optional tool
/// bindings, and returns the model's final text.
#[async_trait]
pub trait Model: Send + Sync {
    /// Human-readable name of the backend (e.g. "openai")
    fn name(&self) -> &str;

    /// Run a completion, dispatching any tool calls the model makes
    async fn complete(
        &self,
        instructions: &str,
        prompt: &str,
        tools: &[Arc<dyn Tool>],
        config: &ModelConfig,
    ) -> Result<ModelOutput, ModelError>;
}
