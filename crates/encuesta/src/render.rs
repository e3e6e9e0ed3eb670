//! Card rendering for survey records and codebook variables.

use std::fmt;

use crate::codebook::{Codebook, display_entries};
use crate::normalize::normalize;
use crate::record::Record;

/// Heading prefix for a survey card.
pub const IDENTIFIER_HEADING: &str = "Código";

/// A browsable card: a title and one line per field or option.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub title: String,
    pub subtitle: Option<String>,
    pub lines: Vec<String>,
}

impl Card {
    /// Check whether the card has a line with exactly this text.
    pub fn has_line(&self, line: &str) -> bool {
        self.lines.iter().any(|l| l == line)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if let Some(subtitle) = &self.subtitle {
            writeln!(f, "  {}", subtitle)?;
        }
        for line in &self.lines {
            writeln!(f, "  {}", line)?;
        }
        Ok(())
    }
}

/// Card for one survey response: `Código: <id>` then `key: value` lines.
pub fn record_card(record: &Record) -> Card {
    let normalized = normalize(record);
    Card {
        title: format!("{}: {}", IDENTIFIER_HEADING, normalized.identifier),
        subtitle: None,
        lines: normalized
            .fields
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect(),
    }
}

/// Cards for a sequence of records, in order.
pub fn record_cards<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<Card> {
    records.into_iter().map(record_card).collect()
}

/// One card per codebook variable: variable name, label, `code: response` options.
pub fn codebook_cards(codebook: &Codebook) -> Vec<Card> {
    display_entries(codebook)
        .into_iter()
        .map(|entry| Card {
            title: entry.variable,
            subtitle: Some(entry.label),
            lines: entry
                .options
                .into_iter()
                .map(|(code, response)| format!("{}: {}", code, response))
                .collect(),
        })
        .collect()
}
