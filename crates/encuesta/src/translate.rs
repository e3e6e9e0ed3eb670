//! Build the labeled dataset from a form definition and raw submissions.
//!
//! Raw submissions are keyed by question *names* (`grupo/edad`) and hold
//! choice *names* (`si`, `madre padre`). The form definition maps both to
//! the human-readable labels the rest of the crate works with:
//!
//! - a column is kept when the last `/` segment of its key is a question
//!   name, and is renamed to that question's label
//! - text values are split on spaces and underscores, each part replaced by
//!   its choice label, and the parts joined with `", "`
//!
//! Form definition shape (only the parts read here):
//!
//! ```json
//! {
//!   "content": {
//!     "survey": [
//!       {"type": "begin_group", "name": "hogar", "label": ["Hogar"], "children": [
//!         {"type": "select_one", "name": "hijos", "label": ["¿Tiene hijos?"]}
//!       ]}
//!     ],
//!     "choices": [
//!       {"list_name": "si_no", "choices": [{"name": "si", "label": ["Sí"]}]}
//!     ]
//!   }
//! }
//! ```
//!
//! Choices may also be listed flat (`{"list_name", "name", "label"}` items).

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{EncuestaError, Result};
use crate::record::Record;

const GROUP_TYPES: [&str; 2] = ["begin_group", "begin_repeat"];

/// Question and choice labels of a form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormStructure {
    /// Question name → label.
    labels: IndexMap<String, String>,
    /// Choice name → label.
    choices: IndexMap<String, String>,
}

impl FormStructure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, name: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(name.into(), label.into());
        self
    }

    pub fn with_choice(mut self, name: impl Into<String>, label: impl Into<String>) -> Self {
        self.choices.insert(name.into(), label.into());
        self
    }

    /// Parse a form definition. The `content` wrapper is optional.
    pub fn from_asset(asset: &Value) -> Result<Self> {
        let content = asset.get("content").unwrap_or(asset);
        let mut form = Self::new();

        if let Some(survey) = content.get("survey").and_then(Value::as_array) {
            form.collect_questions(survey);
        }

        for item in content
            .get("choices")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
        {
            match item.get("choices").and_then(Value::as_array) {
                Some(list) => {
                    for choice in list {
                        form.add_choice(choice)?;
                    }
                }
                None => form.add_choice(item)?,
            }
        }

        tracing::debug!(
            questions = form.labels.len(),
            choices = form.choices.len(),
            "parsed form structure"
        );
        Ok(form)
    }

    /// Read and parse a form definition file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| EncuestaError::io(path, e))?;
        let asset: Value = serde_json::from_slice(&bytes).map_err(|e| malformed(path, e))?;
        Self::from_asset(&asset)
    }

    fn collect_questions(&mut self, elements: &[Value]) {
        for element in elements {
            let is_group = element
                .get("type")
                .and_then(Value::as_str)
                .is_some_and(|t| GROUP_TYPES.contains(&t));
            if is_group {
                if let Some(children) = element.get("children").and_then(Value::as_array) {
                    self.collect_questions(children);
                }
            }

            let name = element
                .get("$autoname")
                .and_then(Value::as_str)
                .filter(|n| !n.is_empty())
                .or_else(|| element.get("name").and_then(Value::as_str));
            if let (Some(name), Some(label)) = (name, element.get("label").and_then(first_label)) {
                if !name.is_empty() {
                    self.labels.insert(name.to_string(), label);
                }
            }
        }
    }

    fn add_choice(&mut self, choice: &Value) -> Result<()> {
        let name = choice
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed_form(format!("choice without a name: {}", choice)))?;
        let label = choice
            .get("label")
            .and_then(first_label)
            .ok_or_else(|| malformed_form(format!("choice '{}' has no label", name)))?;
        self.choices.insert(name.to_string(), label);
        Ok(())
    }

    /// Label for a submission column, matched on its last `/` segment.
    pub fn label_for(&self, column: &str) -> Option<&str> {
        let simple = column.rsplit('/').next().unwrap_or(column);
        self.labels.get(simple).map(String::as_str)
    }

    /// Label for a choice name.
    pub fn choice_label(&self, name: &str) -> Option<&str> {
        self.choices.get(name).map(String::as_str)
    }

    /// Replace choice names in a value by their labels.
    ///
    /// Text is split on spaces and underscores (multiple-choice answers) and
    /// rejoined with `", "`; unknown parts are kept. Other values are
    /// returned unchanged.
    pub fn translate_value(&self, value: &Value) -> Value {
        match value {
            Value::String(text) => Value::String(
                text.split([' ', '_'])
                    .map(|part| self.choice_label(part).unwrap_or(part))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            other => other.clone(),
        }
    }

    pub fn question_count(&self) -> usize {
        self.labels.len()
    }

    pub fn choice_count(&self) -> usize {
        self.choices.len()
    }
}

/// Keep the labeled columns of each submission and translate their values.
///
/// Columns whose name is not a form question (metadata such as `_uuid`)
/// are dropped. Field order follows the submission.
pub fn translate_records(records: &[Record], form: &FormStructure) -> Vec<Record> {
    let translated: Vec<Record> = records
        .iter()
        .map(|record| {
            record
                .iter()
                .filter_map(|(column, value)| {
                    form.label_for(column)
                        .map(|label| (label.to_string(), form.translate_value(value)))
                })
                .collect()
        })
        .collect();

    tracing::debug!(records = translated.len(), "translated submissions");
    translated
}

/// Submissions from a JSON array, or from the `results` of an export page.
pub fn parse_submissions(value: Value) -> Result<Vec<Record>> {
    let results = match value {
        Value::Object(mut page) => page.remove("results").unwrap_or(Value::Array(Vec::new())),
        other => other,
    };
    serde_json::from_value(results).map_err(|e| EncuestaError::Malformed {
        resource: "submissions".to_string(),
        message: e.to_string(),
    })
}

/// Read a submissions file.
pub fn read_submissions(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| EncuestaError::io(path, e))?;
    let value: Value = serde_json::from_slice(&bytes).map_err(|e| malformed(path, e))?;
    parse_submissions(value)
}

/// First entry of a translated label list, or a plain string label.
fn first_label(label: &Value) -> Option<String> {
    match label {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.first().and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

fn malformed(path: &Path, e: impl std::fmt::Display) -> EncuestaError {
    EncuestaError::Malformed {
        resource: path.display().to_string(),
        message: e.to_string(),
    }
}

fn malformed_form(message: String) -> EncuestaError {
    EncuestaError::Malformed {
        resource: "form".to_string(),
        message,
    }
}
