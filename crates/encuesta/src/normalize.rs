//! Participant identifier resolution and display coercion.

use indexmap::IndexMap;

use crate::record::{Record, is_blank, value_text};

/// Field names a dataset may use for the participant identifier, in priority order.
pub const IDENTIFIER_ALIASES: [&str; 3] = ["Código de participante", "PARTICIPANTE", "Paciente"];

/// Shown in place of missing or empty values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Display view of a record: resolved identifier plus the remaining fields.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    /// Participant identifier, or [`NOT_AVAILABLE`].
    pub identifier: String,
    /// Non-identifier fields with display values, in source order.
    pub fields: IndexMap<String, String>,
}

/// Check if a field name is one of the identifier aliases.
pub fn is_identifier_field(field: &str) -> bool {
    IDENTIFIER_ALIASES.contains(&field)
}

/// Resolve the participant identifier, `None` when no alias is populated.
pub fn identifier(record: &Record) -> Option<String> {
    IDENTIFIER_ALIASES
        .iter()
        .map(|alias| record.get(alias))
        .find(|value| !is_blank(*value))
        .flatten()
        .map(value_text)
}

/// Display value for a field: blanks become [`NOT_AVAILABLE`].
pub fn display_value(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(v) if !is_blank(Some(v)) => value_text(v),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Split a record into its identifier and display fields.
pub fn normalize(record: &Record) -> NormalizedRecord {
    let identifier = identifier(record).unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let fields = record
        .iter()
        .filter(|(key, _)| !is_identifier_field(key))
        .map(|(key, value)| (key.to_string(), display_value(Some(value))))
        .collect();

    NormalizedRecord { identifier, fields }
}
