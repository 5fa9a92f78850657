mod analyzer;
mod error;
mod evidence;
mod outcome;
mod tools;

pub use analyzer::ClaimAnalyzer;
pub use error::AnalyzeError;
pub use evidence::{EvidenceKind, EvidenceRecord, EvidenceStore};
pub use outcome::AnalysisOutcome;
pub use tools::{standard_tools, SubAgentTool};
