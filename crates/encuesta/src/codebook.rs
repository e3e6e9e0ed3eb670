//! Codebook model and resolution into display entries and export rows.
//!
//! The codebook (`libro_codigos.json`) maps each coded variable to the question
//! text and, optionally, to enumerated answers:
//!
//! ```json
//! {
//!   "tiene_hijos": {
//!     "label": "¿Tiene hijos?",
//!     "categories": { "1": "Sí", "2": "No" }
//!   }
//! }
//! ```

use indexmap::IndexMap;
use rapidfuzz::distance::jaro_winkler;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::record::value_text;

/// Metadata for one coded variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodebookEntry {
    /// Question text. Missing or null labels resolve to an empty string.
    #[serde(default, deserialize_with = "deserialize_label")]
    pub label: String,
    /// Single-choice codes: code → response text.
    #[serde(
        default,
        deserialize_with = "deserialize_options",
        skip_serializing_if = "Option::is_none"
    )]
    pub categories: Option<IndexMap<String, String>>,
    /// Multi-choice composite codes: code → response text.
    #[serde(
        default,
        deserialize_with = "deserialize_options",
        skip_serializing_if = "Option::is_none"
    )]
    pub combinations: Option<IndexMap<String, String>>,
}

fn deserialize_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(value) => value_text(&value),
    })
}

/// Response texts may be numbers in hand-edited codebooks; they are kept as
/// their display text.
fn deserialize_options<'de, D>(deserializer: D) -> Result<Option<IndexMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let options = Option::<IndexMap<String, Value>>::deserialize(deserializer)?;
    Ok(options.map(|options| {
        options
            .into_iter()
            .map(|(code, text)| {
                let text = match text {
                    Value::Null => String::new(),
                    other => value_text(&other),
                };
                (code, text)
            })
            .collect()
    }))
}

/// Fold text for matching: trimmed, lower-cased, accents removed.
///
/// `"  Sí "` and `"si"` fold to the same text.
pub fn fold_text(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// The closest option to a response and how close it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionMatch<'a> {
    pub code: &'a str,
    pub response: &'a str,
    /// Similarity in `0.0..=1.0`; `1.0` for an exact folded match.
    pub score: f64,
}

impl CodebookEntry {
    /// Create an entry with a label and no options.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    /// Add categories to the entry.
    pub fn with_categories<K, V>(mut self, categories: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.categories = Some(
            categories
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Add combinations to the entry.
    pub fn with_combinations<K, V>(mut self, combinations: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.combinations = Some(
            combinations
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// All options, categories first then combinations, duplicates kept.
    pub fn options(&self) -> impl Iterator<Item = (&str, &str)> {
        self.categories
            .iter()
            .chain(self.combinations.iter())
            .flatten()
            .map(|(code, text)| (code.as_str(), text.as_str()))
    }

    /// Options merged by code, combinations overriding categories.
    ///
    /// A code overridden by a combination keeps the position it had among
    /// the categories.
    pub fn merged_options(&self) -> IndexMap<&str, &str> {
        let mut merged = IndexMap::new();
        for (code, text) in self.options() {
            merged.insert(code, text);
        }
        merged
    }

    /// True when the variable has no enumerated answers.
    pub fn has_options(&self) -> bool {
        self.options().next().is_some()
    }

    /// Find the code for a response text.
    ///
    /// Comparison ignores case, accents and surrounding whitespace.
    /// Categories are searched before combinations.
    pub fn code_for(&self, response: &str) -> Option<&str> {
        let wanted = fold_text(response);
        self.options()
            .find(|(_, text)| fold_text(text) == wanted)
            .map(|(code, _)| code)
    }

    /// Closest option to a response by Jaro-Winkler similarity of the
    /// folded texts.
    ///
    /// An exact folded match always wins with score `1.0`. Among equal
    /// scores the earlier option is kept. `None` when there are no options.
    pub fn best_match(&self, response: &str) -> Option<OptionMatch<'_>> {
        let wanted = fold_text(response);
        if let Some((code, text)) = self.options().find(|(_, text)| fold_text(text) == wanted) {
            return Some(OptionMatch {
                code,
                response: text,
                score: 1.0,
            });
        }

        let mut best: Option<OptionMatch<'_>> = None;
        for (code, text) in self.options() {
            let score = jaro_winkler::similarity(wanted.chars(), fold_text(text).chars());
            if best.is_none_or(|b| score > b.score) {
                best = Some(OptionMatch {
                    code,
                    response: text,
                    score,
                });
            }
        }
        best
    }
}

/// Variable name → entry, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Codebook(IndexMap<String, CodebookEntry>);

impl Codebook {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn insert(&mut self, variable: impl Into<String>, entry: CodebookEntry) {
        self.0.insert(variable.into(), entry);
    }

    pub fn get(&self, variable: &str) -> Option<&CodebookEntry> {
        self.0.get(variable)
    }

    /// Iterate over variables in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CodebookEntry)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Folded label → variable lookup table.
    ///
    /// When two variables share a label the later one wins. Empty labels
    /// are left out.
    pub fn label_index(&self) -> IndexMap<String, &str> {
        self.iter()
            .filter(|(_, entry)| !entry.label.trim().is_empty())
            .map(|(variable, entry)| (fold_text(&entry.label), variable))
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, CodebookEntry)> for Codebook {
    fn from_iter<I: IntoIterator<Item = (K, CodebookEntry)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// A codebook variable prepared for display.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayEntry {
    pub variable: String,
    pub label: String,
    /// `(code, response)` pairs, categories then combinations.
    pub options: Vec<(String, String)>,
}

/// One row of the codebook export sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Variable")]
    pub variable: String,
    #[serde(rename = "Pregunta")]
    pub question: String,
    #[serde(rename = "Código")]
    pub code: String,
    #[serde(rename = "Respuesta")]
    pub response: String,
}

impl ExportRow {
    /// Column headers of the export sheet, in order.
    pub const HEADERS: [&'static str; 4] = ["Variable", "Pregunta", "Código", "Respuesta"];
}

/// Prepare every variable for display, keeping file order.
pub fn display_entries(codebook: &Codebook) -> Vec<DisplayEntry> {
    codebook
        .iter()
        .map(|(variable, entry)| DisplayEntry {
            variable: variable.to_string(),
            label: entry.label.clone(),
            options: entry
                .options()
                .map(|(code, text)| (code.to_string(), text.to_string()))
                .collect(),
        })
        .collect()
}

/// Flatten the codebook into one row per distinct code of each variable.
pub fn export_rows(codebook: &Codebook) -> Vec<ExportRow> {
    codebook
        .iter()
        .flat_map(|(variable, entry)| {
            entry
                .merged_options()
                .into_iter()
                .map(move |(code, response)| ExportRow {
                    variable: variable.to_string(),
                    question: entry.label.clone(),
                    code: code.to_string(),
                    response: response.to_string(),
                })
        })
        .collect()
}
