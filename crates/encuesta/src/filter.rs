//! Free-text filtering of records and codebook variables.
//!
//! Matching is a case-insensitive substring test on the raw string form of
//! each value. It is not tokenized and not accent-folded. A `null` field is
//! matched as the text `null`, unlike the display layer which shows `N/A`.

use crate::codebook::{Codebook, CodebookEntry};
use crate::record::{Record, value_text};

/// Something the search box can match against.
pub trait Searchable {
    /// `needle` is already lower-cased.
    fn matches_lowercase(&self, needle: &str) -> bool;

    /// Case-insensitive substring match.
    fn matches(&self, term: &str) -> bool {
        self.matches_lowercase(&term.to_lowercase())
    }
}

impl Searchable for Record {
    fn matches_lowercase(&self, needle: &str) -> bool {
        self.values()
            .any(|value| value_text(value).to_lowercase().contains(needle))
    }
}

/// A codebook variable together with its name.
impl Searchable for (&str, &CodebookEntry) {
    fn matches_lowercase(&self, needle: &str) -> bool {
        let (variable, entry) = *self;
        contains_lowercase(variable, needle)
            || contains_lowercase(&entry.label, needle)
            || entry.options().any(|(_, text)| contains_lowercase(text, needle))
    }
}

fn contains_lowercase(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Keep the records that contain `term` in any field, in original order.
pub fn filter_records<'a>(term: &str, records: &'a [Record]) -> Vec<&'a Record> {
    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|record| record.matches_lowercase(&needle))
        .collect()
}

/// Keep the variables whose name, label or response texts contain `term`.
pub fn filter_codebook(term: &str, codebook: &Codebook) -> Codebook {
    let needle = term.to_lowercase();
    codebook
        .iter()
        .filter(|item| item.matches_lowercase(&needle))
        .map(|(variable, entry)| (variable, entry.clone()))
        .collect()
}
