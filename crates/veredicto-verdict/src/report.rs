use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Canonical verdict labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Verdadero,
    Falso,
    Dudoso,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Verdadero => "Verdadero",
            Verdict::Falso => "Falso",
            Verdict::Dudoso => "Dudoso",
        }
    }

    fn from_spanish(label: &str) -> Option<Self> {
        match label.to_lowercase().as_str() {
            "verdadero" => Some(Verdict::Verdadero),
            "falso" => Some(Verdict::Falso),
            "dudoso" => Some(Verdict::Dudoso),
            _ => None,
        }
    }

    fn from_english(label: &str) -> Option<Self> {
        match label.to_lowercase().as_str() {
            "true" => Some(Verdict::Verdadero),
            "false" => Some(Verdict::Falso),
            "uncertain" | "inconclusive" => Some(Verdict::Dudoso),
            _ => None,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validator warnings for fields missing from the final model output.
/// These are appended to the rendered report, never hard failures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatWarning {
    #[error("Falta 'Veredicto: ...'.")]
    MissingVerdict,

    #[error("Falta 'Justificación breve: ...'.")]
    MissingJustification,

    #[error("Falta 'Confiabilidad: 0.0-1.0'.")]
    MissingConfidence,
}

lazy_static! {
    // Labels may carry leading markdown decoration (*, -, _, >, whitespace)
    static ref VERDICT_ES: Regex =
        Regex::new(r"(?im)^[\s*\-_>]*veredicto\s*:\s*(verdadero|falso|dudoso)\b")
            .expect("valid regex");
    static ref VERDICT_EN: Regex =
        Regex::new(r"(?im)^[\s*\-_>]*(?:verdict|decision)\s*:\s*(true|false|uncertain|inconclusive)\b")
            .expect("valid regex");
    static ref CONFIDENCE_LINE: Regex =
        Regex::new(r"(?im)^\s*confiabilidad\s*:\s*(0(?:[.,]\d+)?|1(?:[.,]0+)?)\s*$")
            .expect("valid regex");
    static ref CONFIDENCE_INLINE: Regex =
        Regex::new(r"(?im)\bconfiabilidad\s*:\s*(0(?:[.,]\d+)?|1(?:[.,]0+)?)\b")
            .expect("valid regex");
    static ref JUSTIFICATION: Regex = Regex::new(
        r"(?im)^[\s*\-_>]*justificaci[oó]n\s+breve\s*:\s*(.+?)(?:\s+confiabilidad\s*:\s*(?:0(?:[.,]\d+)?|1(?:[.,]0+)?)\s*)?$"
    )
    .expect("valid regex");
    static ref SHAPE_VERDICT: Regex =
        Regex::new(r"(?im)^\s*veredicto\s*:\s*(.+)$").expect("valid regex");
    static ref SHAPE_JUSTIFICATION: Regex =
        Regex::new(r"(?im)^\s*justificaci[oó]n\s+breve\s*:\s*(.+)$").expect("valid regex");
    static ref SHAPE_CONFIDENCE: Regex =
        Regex::new(r"(?im)^\s*confiabilidad\s*:\s*(0(\.\d+)?|1(\.0+)?)\s*$").expect("valid regex");
}

/// Extract the verdict label, preferring the last Spanish match and
/// falling back to English synonyms.
pub fn extract_verdict(text: &str) -> Option<Verdict> {
    if let Some(caps) = VERDICT_ES.captures_iter(text).last() {
        return Verdict::from_spanish(&caps[1]);
    }
    VERDICT_EN
        .captures_iter(text)
        .last()
        .and_then(|caps| Verdict::from_english(&caps[1]))
}

/// Extract the confidence value in [0, 1], tolerating a comma decimal
/// separator. Line-anchored matches win; prefers the last occurrence.
pub fn extract_confidence(text: &str) -> Option<f64> {
    let caps = CONFIDENCE_LINE
        .captures_iter(text)
        .last()
        .or_else(|| CONFIDENCE_INLINE.captures_iter(text).last())?;
    caps[1].replace(',', ".").parse().ok()
}

/// Extract the justification line, stripping a trailing
/// `Confiabilidad: <n>` suffix if the model glued it on.
pub fn extract_justification(text: &str) -> Option<String> {
    JUSTIFICATION
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
}

/// Check that all three labeled fields appear in canonical form.
/// Each absence yields one warning.
pub fn validate_format(text: &str) -> Vec<FormatWarning> {
    let mut warnings = Vec::new();
    if !SHAPE_VERDICT.is_match(text) {
        warnings.push(FormatWarning::MissingVerdict);
    }
    if !SHAPE_JUSTIFICATION.is_match(text) {
        warnings.push(FormatWarning::MissingJustification);
    }
    if !SHAPE_CONFIDENCE.is_match(text) {
        warnings.push(FormatWarning::MissingConfidence);
    }
    warnings
}

/// Structured verdict pulled out of the jury's free-form output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerdictReport {
    pub verdict: Option<Verdict>,
    pub justification: Option<String>,
    pub confidence: Option<f64>,
    pub warnings: Vec<FormatWarning>,
}

impl VerdictReport {
    /// Parse a report out of the jury's final text
    pub fn parse(text: &str) -> Self {
        debug!(output_len = text.len(), "Parsing verdict report");
        Self {
            verdict: extract_verdict(text),
            justification: extract_justification(text),
            confidence: extract_confidence(text),
            warnings: validate_format(text),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Short description of the verdict for logging
    pub fn short_description(&self) -> String {
        match (self.verdict, self.confidence) {
            (Some(v), Some(c)) => format!("{} (confianza: {:.2})", v, c),
            (Some(v), None) => v.to_string(),
            (None, _) => "sin veredicto".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_format() {
        let output = "Veredicto: Falso\n\
Justificación breve: El sensacionalismo y la falta de fuentes restan credibilidad.\n\
Confiabilidad: 0.85\n";

        let report = VerdictReport::parse(output);
        assert_eq!(report.verdict, Some(Verdict::Falso));
        assert_eq!(
            report.justification.as_deref(),
            Some("El sensacionalismo y la falta de fuentes restan credibilidad.")
        );
        assert_eq!(report.confidence, Some(0.85));
        assert!(report.is_complete());
    }

    #[test]
    fn test_verdict_prefers_last_match() {
        let output = "Veredicto: Dudoso\nTras revisar la evidencia:\nVeredicto: Verdadero\n";
        assert_eq!(extract_verdict(output), Some(Verdict::Verdadero));
    }

    #[test]
    fn test_verdict_english_synonyms() {
        assert_eq!(
            extract_verdict("Verdict: true\n"),
            Some(Verdict::Verdadero)
        );
        assert_eq!(extract_verdict("Decision: false\n"), Some(Verdict::Falso));
        assert_eq!(
            extract_verdict("Verdict: inconclusive\n"),
            Some(Verdict::Dudoso)
        );
    }

    #[test]
    fn test_verdict_tolerates_markdown_decoration() {
        assert_eq!(
            extract_verdict("**Veredicto:** dudoso algo más\n"),
            None,
            "bold label closes with ** before the value"
        );
        assert_eq!(
            extract_verdict("> Veredicto: Dudoso\n"),
            Some(Verdict::Dudoso)
        );
        assert_eq!(
            extract_verdict("- veredicto: FALSO\n"),
            Some(Verdict::Falso)
        );
    }

    #[test]
    fn test_confidence_comma_separator() {
        assert_eq!(extract_confidence("Confiabilidad: 0,75\n"), Some(0.75));
    }

    #[test]
    fn test_confidence_prefers_line_anchored_last() {
        let output = "Confiabilidad: 0.4\nNota final.\nConfiabilidad: 0.9\n";
        assert_eq!(extract_confidence(output), Some(0.9));
    }

    #[test]
    fn test_confidence_inline_fallback() {
        let output = "El jurado estima una Confiabilidad: 0.6 en esta evaluación.\n";
        assert_eq!(extract_confidence(output), Some(0.6));
    }

    #[test]
    fn test_justification_drops_glued_confidence() {
        let output =
            "Justificación breve: La afirmación es plausible. Confiabilidad: 0.7\n";
        assert_eq!(
            extract_justification(output).as_deref(),
            Some("La afirmación es plausible.")
        );
    }

    #[test]
    fn test_justification_unaccented_label() {
        let output = "Justificacion breve: Sin errores detectados.\n";
        assert_eq!(
            extract_justification(output).as_deref(),
            Some("Sin errores detectados.")
        );
    }

    #[test]
    fn test_validate_reports_each_missing_field() {
        let warnings = validate_format("El modelo divagó sin formato alguno.");
        assert_eq!(
            warnings,
            vec![
                FormatWarning::MissingVerdict,
                FormatWarning::MissingJustification,
                FormatWarning::MissingConfidence,
            ]
        );
    }

    #[test]
    fn test_validate_rejects_out_of_range_confidence() {
        let output = "Veredicto: Dudoso\nJustificación breve: Difícil de verificar.\nConfiabilidad: 1.5\n";
        let warnings = validate_format(output);
        assert_eq!(warnings, vec![FormatWarning::MissingConfidence]);
    }

    #[test]
    fn test_parse_freeform_output_collects_warnings() {
        let report = VerdictReport::parse("No puedo evaluar esta afirmación.");
        assert_eq!(report.verdict, None);
        assert_eq!(report.justification, None);
        assert_eq!(report.confidence, None);
        assert_eq!(report.warnings.len(), 3);
    }

    #[test]
    fn test_short_description() {
        let report = VerdictReport::parse(
            "Veredicto: Verdadero\nJustificación breve: Coincide con el consenso.\nConfiabilidad: 0.9\n",
        );
        assert_eq!(report.short_description(), "Verdadero (confianza: 0.90)");
    }
}
