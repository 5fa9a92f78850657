/// Prompt templates for the jury agent and the three sub-agents.
///
/// All user-facing prompts are in Spanish; the output contract is the
/// exact three-line format the extraction layer recognizes.
pub struct VerdictPrompts;

impl VerdictPrompts {
    /// System prompt for the supervising jury agent
    pub const JURY_SYSTEM: &'static str = "Eres un jurado de IA. Tu única tarea es decidir si una afirmación es \
VERDADERA, FALSA o DUDOSA basándote en los análisis aportados.\n\n\
Devuelve SIEMPRE en el siguiente formato EXACTO (en español):\n\n\
Veredicto: <Verdadero|Falso|Dudoso>\n\
Justificación breve: <máx. 3 frases, concretas>\n\
Confiabilidad: <número entre 0.0 y 1.0>\n";

    /// Directive forcing the jury to gather evidence before deciding
    pub const JURY_TOOL_DIRECTIVE: &'static str = "DEBES recopilar evidencia llamando a herramientas antes del veredicto. \
Llama a (1) evaluar_sensacionalismo, (2) evaluar_gramatica y \
(3) evaluar_sentido_comun sobre la MISMA afirmación, y solo después dicta veredicto.";

    /// Fixed instruction for the sensationalism sub-agent
    pub const SUB_SENSATIONALISM: &'static str = "Analiza si la afirmación usa lenguaje sensacionalista/emocional. \
Devuelve 2-4 frases, objetivas y concisas.";

    /// Fixed instruction for the grammar sub-agent
    pub const SUB_GRAMMAR: &'static str = "Revisa la afirmación y detecta errores gramaticales/ortográficos/estilo. \
Devuelve 2-4 frases, claras y útiles que indiquen si hay errores \
gramaticales/ortográficos/estilo o por lo contrario si esta correctamente \
escrita la afirmación.";

    /// Fixed instruction for the common-sense sub-agent
    pub const SUB_COMMON_SENSE: &'static str = "Evalúa si la afirmación contradice el sentido común. \
Devuelve 2-4 frases, con razonamiento breve.";

    /// Full instruction set for the jury agent
    pub fn jury_instructions() -> String {
        format!("{}\n\n{}", Self::JURY_SYSTEM, Self::JURY_TOOL_DIRECTIVE)
    }

    /// Build the verdict prompt naming the claim
    pub fn build_verdict_prompt(claim: &str) -> String {
        format!(
            "Afirmación: \"{claim}\"\n\n\
Primero, usa las herramientas indicadas con el texto de la afirmación. \
Cuando tengas suficiente evidencia, responde únicamente en este formato EXACTO:\n\n\
Veredicto: <Verdadero|Falso|Dudoso>\n\
Justificación breve: <máx. 3 frases, concretas>\n\
Confiabilidad: <número entre 0.0 y 1.0>\n\
No incluyas 'Confiabilidad' dentro de 'Justificación breve'."
        )
    }

    /// Build the prompt handed to a sub-agent for the given claim
    pub fn build_sub_agent_prompt(claim: &str) -> String {
        format!("Afirmación: {claim}")
    }
}
