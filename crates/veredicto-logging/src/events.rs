use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Structured log events for a claim analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEvent {
    AnalysisStarted {
        claim_preview: String,
    },
    ToolCompleted {
        tool: String,
        duration_secs: f64,
    },
    JuryCompleted {
        tool_rounds: usize,
        duration_secs: f64,
    },
    ValidatorWarning {
        warning: String,
    },
    AnalysisCompleted {
        verdict: String,
        duration_secs: f64,
    },
    ErrorEncountered {
        error: String,
    },
}

impl LogEvent {
    /// Add a timestamp to serialize with the event
    fn with_timestamp(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "timestamp".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        value
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors and visual structure
    #[default]
    Pretty,
    /// JSON lines format for machine consumption
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Logger for veredicto events - handles both console output and file logging
pub struct Logger {
    format: LogFormat,
    file_writer: Option<Mutex<File>>,
}

impl Logger {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            file_writer: None,
        }
    }

    /// Create a logger with file output in addition to console
    pub fn with_file(format: LogFormat, log_path: &Path) -> std::io::Result<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        Ok(Self {
            format,
            file_writer: Some(Mutex::new(file)),
        })
    }

    pub fn log(&self, event: &LogEvent) {
        // Log to file if configured (always JSON format for file)
        if let Some(ref writer) = self.file_writer {
            if let Ok(mut file) = writer.lock() {
                let json = event.with_timestamp();
                let _ = writeln!(file, "{}", json);
            }
        }

        // Log to console based on format
        match self.format {
            LogFormat::Json => self.log_json(event),
            LogFormat::Pretty => self.log_pretty(event),
            LogFormat::Compact => self.log_compact(event),
        }
    }

    fn log_json(&self, event: &LogEvent) {
        let _ = writeln!(std::io::stderr(), "{}", event.with_timestamp());
    }

    fn log_pretty(&self, event: &LogEvent) {
        let mut stderr = std::io::stderr();
        match event {
            LogEvent::AnalysisStarted { claim_preview } => {
                let _ = writeln!(stderr);
                let _ = writeln!(
                    stderr,
                    "{} {}",
                    "▶".bright_cyan(),
                    "ANÁLISIS".bright_cyan().bold()
                );
                let _ = writeln!(
                    stderr,
                    "  {} {}",
                    "Afirmación:".dimmed(),
                    claim_preview.dimmed()
                );
            }
            LogEvent::ToolCompleted {
                tool,
                duration_secs,
            } => {
                let _ = writeln!(
                    stderr,
                    "    {} {} ({:.1}s)",
                    "✓".bright_green(),
                    tool,
                    duration_secs
                );
            }
            LogEvent::JuryCompleted {
                tool_rounds,
                duration_secs,
            } => {
                let _ = writeln!(
                    stderr,
                    "  {} Jurado listo: {} ronda(s) de herramientas ({:.1}s)",
                    "✓".bright_green(),
                    tool_rounds,
                    duration_secs
                );
            }
            LogEvent::ValidatorWarning { warning } => {
                let _ = writeln!(stderr, "  {} {}", "⚠".bright_yellow(), warning.yellow());
            }
            LogEvent::AnalysisCompleted {
                verdict,
                duration_secs,
            } => {
                let _ = writeln!(
                    stderr,
                    "{} Veredicto: {} ({:.1}s)",
                    "■".bright_blue(),
                    verdict.bold(),
                    duration_secs
                );
                let _ = writeln!(stderr);
            }
            LogEvent::ErrorEncountered { error } => {
                let _ = writeln!(stderr, "{} {}", "✗".bright_red(), error.bright_red());
            }
        }
    }

    fn log_compact(&self, event: &LogEvent) {
        let mut stderr = std::io::stderr();
        let timestamp = chrono::Utc::now().format("%H:%M:%S");
        let msg = match event {
            LogEvent::AnalysisStarted { .. } => format!("[{}] analysis:start", timestamp),
            LogEvent::ToolCompleted {
                tool,
                duration_secs,
            } => format!("[{}] tool:done:{} {:.1}s", timestamp, tool, duration_secs),
            LogEvent::JuryCompleted {
                tool_rounds,
                duration_secs,
            } => format!(
                "[{}] jury:done rounds={} {:.1}s",
                timestamp, tool_rounds, duration_secs
            ),
            LogEvent::ValidatorWarning { warning } => {
                format!("[{}] validator:{}", timestamp, warning)
            }
            LogEvent::AnalysisCompleted {
                verdict,
                duration_secs,
            } => format!(
                "[{}] analysis:done {} {:.1}s",
                timestamp, verdict, duration_secs
            ),
            LogEvent::ErrorEncountered { error } => format!("[{}] error:{}", timestamp, error),
        };
        let _ = writeln!(stderr, "{}", msg);
    }
}
