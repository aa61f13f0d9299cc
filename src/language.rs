use crate::error::Result;
use serde::Deserialize;
use std::collections::HashMap;

const BUILTIN: &str = include_str!("data/languages.json");

#[derive(Debug, Deserialize)]
struct LanguageRecord {
    name: String,
    extensions: Vec<String>,
}

/// Extension to language lookup. Built once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct LanguageTable {
    by_extension: HashMap<String, String>,
}

impl LanguageTable {
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN)
    }

    /// Parses an array of `{name, type, extensions}` records. Keys and
    /// names are lowercased; the first language claiming an extension wins.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<LanguageRecord> = serde_json::from_str(json)?;
        let mut by_extension = HashMap::new();
        for record in records {
            let name = record.name.to_lowercase();
            for ext in record.extensions {
                by_extension
                    .entry(ext.to_lowercase())
                    .or_insert_with(|| name.clone());
            }
        }
        Ok(Self { by_extension })
    }

    pub fn len(&self) -> usize {
        self.by_extension.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_extension.is_empty()
    }

    /// `name` must already be lowercased.
    pub fn has_language(&self, name: &str) -> bool {
        self.by_extension.values().any(|lang| lang == name)
    }

    /// Lowercased language of `path`, preferring the longest known
    /// multi-part extension (`x.rs.in` before `x.in`).
    pub fn language_of(&self, path: &str) -> Option<&str> {
        let file_name = path.rsplit('/').next().unwrap_or(path).to_lowercase();
        file_name
            .char_indices()
            .filter(|&(idx, ch)| ch == '.' && idx > 0)
            .find_map(|(idx, _)| self.by_extension.get(&file_name[idx..]))
            .map(String::as_str)
    }
}
