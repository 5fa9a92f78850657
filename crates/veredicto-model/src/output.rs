use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Output captured from a model invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelOutput {
    /// Final text returned by the model
    pub text: String,
    /// Number of tool-call rounds the model used
    pub tool_rounds: usize,
    /// Duration of the invocation
    #[serde(with = "duration_secs")]
    pub duration: Duration,
}

impl ModelOutput {
    pub fn new(text: String, tool_rounds: usize, duration: Duration) -> Self {
        Self {
            text,
            tool_rounds,
            duration,
        }
    }

    /// Count lines in the final text
    pub fn text_lines(&self) -> usize {
        self.text.lines().count()
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(secs))
    }
}
