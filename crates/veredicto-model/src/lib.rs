mod openai;
mod output;
mod retry;
mod traits;

pub use openai::OpenAiModel;
pub use output::ModelOutput;
pub use retry::{run_with_retry, RetryPolicy};
pub use traits::{Model, ModelConfig, ModelError, Tool, ToolError, ToolSpec, DEFAULT_MODEL};
