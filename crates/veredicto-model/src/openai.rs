use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::{Model, ModelConfig, ModelError, ModelOutput, Tool};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for an OpenAI-compatible chat-completions endpoint.
///
/// Tool bindings are exposed as function-calling schemas with a single
/// string parameter; tool calls requested by the model are dispatched
/// sequentially and their results fed back as `tool` role messages.
pub struct OpenAiModel {
    http_client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl OpenAiModel {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        self
    }

    async fn send(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<ChatResponse, ModelError> {
        let request = ChatRequest {
            model,
            messages,
            tools,
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(ModelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<ChatResponse>().await?)
    }
}

#[async_trait]
impl Model for OpenAiModel {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        instructions: &str,
        prompt: &str,
        tools: &[Arc<dyn Tool>],
        config: &ModelConfig,
    ) -> Result<ModelOutput, ModelError> {
        let start = Instant::now();

        let mut messages = vec![
            ChatMessage::system(instructions),
            ChatMessage::user(prompt),
        ];
        let tool_defs: Option<Vec<ToolDefinition>> = if tools.is_empty() {
            None
        } else {
            Some(tools.iter().map(|t| ToolDefinition::from_spec(&t.spec())).collect())
        };

        debug!(
            model = %config.model,
            prompt_len = prompt.len(),
            tools = tools.len(),
            "Starting completion"
        );

        let mut rounds = 0usize;
        loop {
            if rounds > config.max_steps {
                return Err(ModelError::StepBudgetExceeded(config.max_steps));
            }

            let response = self
                .send(&config.model, &messages, tool_defs.as_deref())
                .await?;
            let choice = response
                .choices
                .into_iter()
                .next()
                .ok_or(ModelError::EmptyResponse)?;

            let tool_calls = choice.message.tool_calls.clone().unwrap_or_default();
            if tool_calls.is_empty() {
                let text = choice
                    .message
                    .content
                    .filter(|t| !t.trim().is_empty())
                    .ok_or(ModelError::EmptyResponse)?;

                info!(
                    tool_rounds = rounds,
                    duration_secs = start.elapsed().as_secs_f64(),
                    "Completion finished"
                );
                return Ok(ModelOutput::new(text, rounds, start.elapsed()));
            }

            messages.push(choice.message);
            rounds += 1;

            for call in tool_calls {
                let tool = tools
                    .iter()
                    .find(|t| t.spec().name == call.function.name)
                    .ok_or_else(|| ModelError::UnknownTool(call.function.name.clone()))?;

                let input = parse_tool_input(&call.function.arguments);
                debug!(tool = call.function.name, "Dispatching tool call");

                let result = tool.call(&input).await.map_err(|e| ModelError::ToolFailed {
                    name: call.function.name.clone(),
                    message: e.to_string(),
                })?;

                messages.push(ChatMessage::tool(call.id, result));
            }
        }
    }
}

/// Pull the text argument out of the model's JSON arguments string.
/// Falls back to the raw string when the model skips the JSON wrapper.
fn parse_tool_input(arguments: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(arguments) {
        Ok(value) => value
            .get("texto")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            }),
        Err(_) => arguments.to_string(),
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDefinition]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl ChatMessage {
    fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content.to_string()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.to_string()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    fn tool(call_id: String, content: String) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content),
            tool_calls: None,
            tool_call_id: Some(call_id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ToolCall {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    function: FunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    arguments: String,
}

#[derive(Serialize)]
struct ToolDefinition {
    #[serde(rename = "type")]
    kind: &'static str,
    function: FunctionSchema,
}

#[derive(Serialize)]
struct FunctionSchema {
    name: &'static str,
    description: &'static str,
    parameters: serde_json::Value,
}

impl ToolDefinition {
    fn from_spec(spec: &crate::ToolSpec) -> Self {
        Self {
            kind: "function",
            function: FunctionSchema {
                name: spec.name,
                description: spec.description,
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "texto": {
                            "type": "string",
                            "description": spec.input_description,
                        }
                    },
                    "required": ["texto"],
                }),
            },
        }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}
