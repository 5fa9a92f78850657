mod prompts;
mod report;

pub use prompts::VerdictPrompts;
pub use report::{
    extract_confidence, extract_justification, extract_verdict, validate_format, FormatWarning,
    Verdict, VerdictReport,
};
