//! Replace answer texts with codebook codes.
//!
//! Survey exports are keyed by question text. A field is coded when its key,
//! folded (trimmed, lower-cased, accents removed), equals the folded label of
//! a codebook variable. Its text value is then matched against that
//! variable's responses: an exact folded match, or failing that the most
//! similar response when it scores above the threshold.

use serde::Serialize;
use serde_json::Value;

use crate::codebook::{Codebook, fold_text};
use crate::record::Record;

/// Minimum similarity for a non-exact response match.
pub const DEFAULT_MIN_SCORE: f64 = 0.8;

/// A response that was closest to an option but not close enough to code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowConfidenceMatch {
    pub field: String,
    pub value: String,
    /// Closest response text in the codebook.
    pub best: String,
    pub score: f64,
}

/// Counts gathered while coding a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CodifyReport {
    /// Values replaced by a code.
    pub coded: usize,
    /// Of the coded values, those matched by similarity rather than exactly.
    pub approximate: usize,
    /// Values under a coded question with no close enough response.
    pub unmatched: usize,
    /// Fields whose key is not a codebook label.
    pub passed_through: usize,
    /// Rejected closest matches, kept with their original value.
    pub low_confidence: Vec<LowConfidenceMatch>,
}

/// Code every record with [`DEFAULT_MIN_SCORE`].
pub fn codify_records(records: &[Record], codebook: &Codebook) -> (Vec<Record>, CodifyReport) {
    codify_records_with(records, codebook, DEFAULT_MIN_SCORE)
}

/// Code every record, accepting similarity matches scoring above `min_score`.
///
/// Only text values are coded. Numbers, booleans and null under a coded
/// question are kept as they are.
pub fn codify_records_with(
    records: &[Record],
    codebook: &Codebook,
    min_score: f64,
) -> (Vec<Record>, CodifyReport) {
    let labels = codebook.label_index();
    let mut report = CodifyReport::default();

    let coded = records
        .iter()
        .map(|record| {
            record
                .iter()
                .map(|(key, value)| {
                    let entry = labels
                        .get(&fold_text(key))
                        .and_then(|variable| codebook.get(variable));
                    let new_value = match (entry, value) {
                        (None, _) => {
                            report.passed_through += 1;
                            value.clone()
                        }
                        (Some(entry), Value::String(text)) => match entry.best_match(text) {
                            Some(m) if m.score >= 1.0 => {
                                report.coded += 1;
                                code_value(m.code)
                            }
                            Some(m) if m.score > min_score => {
                                report.coded += 1;
                                report.approximate += 1;
                                tracing::debug!(field = key, value = %text, best = m.response, score = m.score, "approximate match");
                                code_value(m.code)
                            }
                            Some(m) => {
                                tracing::warn!(field = key, value = %text, best = m.response, score = m.score, "low confidence match, keeping original");
                                report.unmatched += 1;
                                report.low_confidence.push(LowConfidenceMatch {
                                    field: key.to_string(),
                                    value: text.clone(),
                                    best: m.response.to_string(),
                                    score: m.score,
                                });
                                value.clone()
                            }
                            None => value.clone(),
                        },
                        (Some(_), _) => value.clone(),
                    };
                    (key.to_string(), new_value)
                })
                .collect::<Record>()
        })
        .collect();

    tracing::debug!(
        coded = report.coded,
        approximate = report.approximate,
        unmatched = report.unmatched,
        passed_through = report.passed_through,
        "codified records"
    );
    (coded, report)
}

/// Integer codes become JSON numbers; anything else stays text.
fn code_value(code: &str) -> Value {
    code.trim()
        .parse::<i64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::String(code.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn codebook() -> Codebook {
        serde_json::from_value(json!({
            "tiene_hijos": {"label": "¿Tiene hijos?", "categories": {"1": "Sí", "2": "No"}},
            "aportan": {
                "label": "¿Quienes aportan al ingreso familiar?",
                "categories": {"1": "Madre"},
                "combinations": {"12": "Madre Padre"}
            },
            "zona": {"label": "Zona", "categories": {"N": "Norte"}},
            "alimentacion": {
                "label": "¿Cómo calificaría su alimentación?",
                "categories": {"1": "Buena", "2": "Regular", "3": "Mala"}
            },
        }))
        .unwrap()
    }

    #[test]
    fn test_codes_matching_answers() {
        let records: Vec<Record> = serde_json::from_value(json!([{
            "Código de participante": "P001",
            "¿Tiene hijos?": " sí ",
            "¿Quienes aportan al ingreso familiar?": "Madre Padre",
            "Zona": "Norte",
        }]))
        .unwrap();

        let (coded, report) = codify_records(&records, &codebook());
        let r = &coded[0];
        assert_eq!(r.get("¿Tiene hijos?"), Some(&json!(1)));
        assert_eq!(r.get("¿Quienes aportan al ingreso familiar?"), Some(&json!(12)));
        assert_eq!(r.get("Zona"), Some(&json!("N")));
        assert_eq!(r.get("Código de participante"), Some(&json!("P001")));
        assert_eq!(report.coded, 3);
        assert_eq!(report.approximate, 0);
        assert_eq!(report.passed_through, 1);
    }

    #[test]
    fn test_labels_and_answers_ignore_accents() {
        let records: Vec<Record> = serde_json::from_value(json!([{
            "¿Como calificaria su alimentacion?": "REGULAR",
            "¿Tiene hijos?": "Si",
        }]))
        .unwrap();

        let (coded, report) = codify_records(&records, &codebook());
        assert_eq!(coded[0].get("¿Como calificaria su alimentacion?"), Some(&json!(2)));
        assert_eq!(coded[0].get("¿Tiene hijos?"), Some(&json!(1)));
        assert_eq!(report.coded, 2);
    }

    #[test]
    fn test_close_answer_is_coded_approximately() {
        let records: Vec<Record> =
            serde_json::from_value(json!([{"¿Cómo calificaría su alimentación?": "Reguler"}])).unwrap();

        let (coded, report) = codify_records(&records, &codebook());
        assert_eq!(coded[0].get("¿Cómo calificaría su alimentación?"), Some(&json!(2)));
        assert_eq!(report.coded, 1);
        assert_eq!(report.approximate, 1);
        assert!(report.low_confidence.is_empty());
    }

    #[test]
    fn test_low_confidence_keeps_original() {
        let records: Vec<Record> = serde_json::from_value(json!([
            {"¿Tiene hijos?": "Tal vez", "Zona": null}
        ]))
        .unwrap();

        let (coded, report) = codify_records(&records, &codebook());
        assert_eq!(coded[0].get("¿Tiene hijos?"), Some(&json!("Tal vez")));
        assert_eq!(coded[0].get("Zona"), Some(&Value::Null));
        assert_eq!(report.unmatched, 1);
        assert_eq!(report.coded, 0);
        assert_eq!(report.low_confidence.len(), 1);
        assert_eq!(report.low_confidence[0].field, "¿Tiene hijos?");
        assert_eq!(report.low_confidence[0].value, "Tal vez");
    }

    #[test]
    fn test_threshold_is_configurable() {
        let records: Vec<Record> =
            serde_json::from_value(json!([{"¿Cómo calificaría su alimentación?": "Reguler"}])).unwrap();

        let (coded, report) = codify_records_with(&records, &codebook(), 0.99);
        assert_eq!(coded[0].get("¿Cómo calificaría su alimentación?"), Some(&json!("Reguler")));
        assert_eq!(report.low_confidence.len(), 1);
        assert_eq!(report.low_confidence[0].best, "Regular");
    }

    #[test]
    fn test_numbers_under_coded_question_kept() {
        let records: Vec<Record> = serde_json::from_value(json!([{"¿Tiene hijos?": 1}])).unwrap();
        let (coded, report) = codify_records(&records, &codebook());
        assert_eq!(coded[0].get("¿Tiene hijos?"), Some(&json!(1)));
        assert_eq!(report, CodifyReport::default());
    }

    #[test]
    fn test_key_order_preserved() {
        let records: Vec<Record> =
            serde_json::from_value(json!([{"Zona": "Norte", "Edad": 30, "¿Tiene hijos?": "No"}])).unwrap();
        let (coded, _) = codify_records(&records, &codebook());
        let keys: Vec<_> = coded[0].keys().collect();
        assert_eq!(keys, vec!["Zona", "Edad", "¿Tiene hijos?"]);
    }
}
