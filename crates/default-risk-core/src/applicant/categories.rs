use serde::{Deserialize, Serialize};

use crate::error::RiskError;
use crate::RiskResult;

/// One label and the numeric code the classifier was trained with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub label: String,
    pub code: u8,
    /// Alternative spellings accepted from the form (e.g. "Govt (4)").
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

/// Caller-supplied mapping from category labels to codes.
///
/// Different form variants disagree on these codes, so there is no built-in
/// table; the mapping always comes from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTable {
    entries: Vec<CategoryEntry>,
}

impl CategoryTable {
    pub fn new(entries: Vec<CategoryEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CategoryEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive lookup against labels and aliases.
    pub fn code_for(&self, label: &str) -> Option<u8> {
        let needle = label.trim();
        self.entries
            .iter()
            .find(|e| {
                e.label.eq_ignore_ascii_case(needle)
                    || e.aliases.iter().any(|a| a.eq_ignore_ascii_case(needle))
            })
            .map(|e| e.code)
    }

    pub fn label_for(&self, code: u8) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.code == code)
            .map(|e| e.label.as_str())
    }

    pub fn contains_code(&self, code: u8) -> bool {
        self.entries.iter().any(|e| e.code == code)
    }

    /// Rejects tables where a label (or alias) or a code appears twice.
    pub fn validate(&self, name: &str) -> RiskResult<()> {
        let mut labels: Vec<String> = Vec::new();
        let mut codes: Vec<u8> = Vec::new();

        for entry in &self.entries {
            if entry.label.trim().is_empty() {
                return Err(RiskError::InvalidInput {
                    field: name.to_string(),
                    reason: format!("Code {} has an empty label.", entry.code),
                });
            }
            if codes.contains(&entry.code) {
                return Err(RiskError::InvalidInput {
                    field: name.to_string(),
                    reason: format!("Code {} is mapped more than once.", entry.code),
                });
            }
            codes.push(entry.code);

            for spelling in std::iter::once(&entry.label).chain(entry.aliases.iter()) {
                let key = spelling.trim().to_ascii_lowercase();
                if labels.contains(&key) {
                    return Err(RiskError::InvalidInput {
                        field: name.to_string(),
                        reason: format!("Label '{}' is mapped more than once.", spelling),
                    });
                }
                labels.push(key);
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
