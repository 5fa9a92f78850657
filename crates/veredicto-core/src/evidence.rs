use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Evidence keys, one per sub-agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
    Sensationalism,
    Grammar,
    CommonSense,
}

impl EvidenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceKind::Sensationalism => "sensacionalismo",
            EvidenceKind::Grammar => "gramatica",
            EvidenceKind::CommonSense => "sentido_comun",
        }
    }
}

impl std::fmt::Display for EvidenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Process-wide record of the latest sub-agent outputs.
///
/// Written by tools during an analysis, read by the final formatter.
/// Must be reset before each new claim; entries only live for the
/// duration of a single request.
#[derive(Debug, Default)]
pub struct EvidenceStore {
    entries: Mutex<HashMap<EvidenceKind, String>>,
}

impl EvidenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all evidence from the previous claim
    pub fn reset(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Record a sub-agent output, replacing any previous value
    pub fn record(&self, kind: EvidenceKind, value: String) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(kind, value);
    }

    pub fn get(&self, kind: EvidenceKind) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .cloned()
    }

    /// Copy out the current evidence for rendering
    pub fn snapshot(&self) -> EvidenceRecord {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        EvidenceRecord {
            sensationalism: entries.get(&EvidenceKind::Sensationalism).cloned(),
            grammar: entries.get(&EvidenceKind::Grammar).cloned(),
            common_sense: entries.get(&EvidenceKind::CommonSense).cloned(),
        }
    }
}

/// Evidence for one analyzed claim; a field is `None` when its tool
/// was never invoked by the jury
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvidenceRecord {
    pub sensationalism: Option<String>,
    pub grammar: Option<String>,
    pub common_sense: Option<String>,
}
