use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use veredicto_verdict::VerdictReport;

use crate::EvidenceRecord;

const FIELD_PLACEHOLDER: &str = "—";
const TOOL_NOT_INVOKED: &str = "— (no se invocó la tool)";

/// The final result of analyzing one claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    /// Structured verdict extracted from the jury output
    pub report: VerdictReport,
    /// Sub-agent evidence gathered during the analysis
    pub evidence: EvidenceRecord,
    /// Raw jury output, kept for auditing
    pub raw_output: String,
    pub analyzed_at: DateTime<Utc>,
    pub duration_secs: f64,
}

impl AnalysisOutcome {
    /// Render the markdown report handed back to the UI layer
    pub fn to_markdown(&self) -> String {
        let verdict = self
            .report
            .verdict
            .map(|v| v.to_string())
            .unwrap_or_else(|| FIELD_PLACEHOLDER.to_string());
        let justification = self
            .report
            .justification
            .clone()
            .unwrap_or_else(|| FIELD_PLACEHOLDER.to_string());
        let confidence = self
            .report
            .confidence
            .map(|c| c.to_string())
            .unwrap_or_else(|| FIELD_PLACEHOLDER.to_string());

        let validator_notice = if self.report.warnings.is_empty() {
            String::new()
        } else {
            let joined = self
                .report
                .warnings
                .iter()
                .map(|w| w.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            format!("\n\n> **Aviso del validador**: {}", joined)
        };

        format!(
            "**Veredicto:** {verdict}\n\n\
**Justificación breve:** {justification}\n\n\
**Confiabilidad:** {confidence}{validator_notice}\n\n\
---\n\n\
### Evidencias de subagentes\n\
- **Sensacionalismo:** {sens}\n\
- **Gramática:** {gram}\n\
- **Sentido común:** {comn}\n",
            sens = self.evidence.sensationalism.as_deref().unwrap_or(TOOL_NOT_INVOKED),
            gram = self.evidence.grammar.as_deref().unwrap_or(TOOL_NOT_INVOKED),
            comn = self.evidence.common_sense.as_deref().unwrap_or(TOOL_NOT_INVOKED),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome_from(raw: &str, evidence: EvidenceRecord) -> AnalysisOutcome {
        AnalysisOutcome {
            report: VerdictReport::parse(raw),
            evidence,
            raw_output: raw.to_string(),
            analyzed_at: Utc::now(),
            duration_secs: 1.2,
        }
    }

    #[test]
    fn test_markdown_full_report() {
        let raw = "Veredicto: Falso\n\
Justificación breve: Lenguaje alarmista sin fuentes.\n\
Confiabilidad: 0.8\n";
        let evidence = EvidenceRecord {
            sensationalism: Some("Tono muy alarmista.".to_string()),
            grammar: Some("Correctamente escrita.".to_string()),
            common_sense: Some("Contradice el sentido común.".to_string()),
        };

        let md = outcome_from(raw, evidence).to_markdown();
        assert!(md.contains("**Veredicto:** Falso"));
        assert!(md.contains("**Justificación breve:** Lenguaje alarmista sin fuentes."));
        assert!(md.contains("**Confiabilidad:** 0.8"));
        assert!(md.contains("- **Sensacionalismo:** Tono muy alarmista."));
        assert!(!md.contains("Aviso del validador"));
    }

    #[test]
    fn test_markdown_missing_fields_use_placeholders() {
        let md = outcome_from("Sin formato reconocible.", EvidenceRecord::default()).to_markdown();
        assert!(md.contains("**Veredicto:** —"));
        assert!(md.contains("**Justificación breve:** —"));
        assert!(md.contains("**Confiabilidad:** —"));
        assert!(md.contains("- **Gramática:** — (no se invocó la tool)"));
    }

    #[test]
    fn test_markdown_appends_validator_notice() {
        let raw = "Veredicto: Dudoso\nJustificación breve: Difícil de verificar.\n";
        let md = outcome_from(raw, EvidenceRecord::default()).to_markdown();
        assert!(md.contains("> **Aviso del validador**: Falta 'Confiabilidad: 0.0-1.0'."));
    }
}
