//! Values-matrix codec for the spreadsheet web app: each collection travels
//! as a header row followed by data rows of JSON scalars. Decoding is
//! deliberately lenient, since the sheet can be hand-edited: columns are
//! located by header name, missing cells get defaults, and rows that make no
//! sense are dropped rather than failing the whole load.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::engine::mastery::Mastery;
use crate::engine::repository::Term;
use crate::generator::{QuizMode, SCOPE_ALL};
use crate::session::result::{AnswerRecord, QuizResult};

pub type Row = Vec<Value>;

pub const TERM_HEADERS: [&str; 6] = ["ID", "Term", "Definition", "Example", "Category", "Mastery"];
pub const RESULT_HEADERS: [&str; 6] =
    ["Date", "Scope", "Mode", "Score", "TotalQuestions", "Details"];

pub fn terms_to_rows(terms: &[Term]) -> Vec<Row> {
    let mut rows: Vec<Row> = Vec::with_capacity(terms.len() + 1);
    rows.push(TERM_HEADERS.iter().map(|h| Value::from(*h)).collect());
    for term in terms {
        rows.push(vec![
            Value::from(term.id),
            Value::from(term.term.as_str()),
            Value::from(term.definition.as_str()),
            Value::from(term.example.as_str()),
            Value::from(term.category.as_str()),
            Value::from(term.mastery.label()),
        ]);
    }
    rows
}

pub fn terms_from_rows(rows: &[Row]) -> Vec<Term> {
    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };
    let columns = ColumnIndex::new(header, &TERM_HEADERS);

    let mut terms: Vec<Term> = Vec::new();
    for row in data {
        let term = cell_string(row, columns.get("Term"));
        let definition = cell_string(row, columns.get("Definition"));
        // A row with neither term nor definition is sheet noise.
        if term.trim().is_empty() && definition.trim().is_empty() {
            continue;
        }
        terms.push(Term {
            id: cell_u64(row, columns.get("ID")),
            term,
            definition,
            example: cell_string(row, columns.get("Example")),
            category: cell_string(row, columns.get("Category")),
            mastery: Mastery::from_label(&cell_string(row, columns.get("Mastery"))),
        });
    }

    // Duplicate (term, definition) pairs keep the first occurrence only.
    let mut seen = std::collections::HashSet::new();
    terms.retain(|t| seen.insert((t.term.clone(), t.definition.clone())));
    terms.sort_by_key(|t| t.id);
    terms
}

pub fn results_to_rows(results: &[QuizResult]) -> Vec<Row> {
    let mut rows: Vec<Row> = Vec::with_capacity(results.len() + 1);
    rows.push(RESULT_HEADERS.iter().map(|h| Value::from(*h)).collect());
    for result in results {
        let details =
            serde_json::to_string(&result.details).unwrap_or_else(|_| "[]".to_string());
        rows.push(vec![
            Value::from(result.date.to_rfc3339()),
            Value::from(result.scope.as_str()),
            Value::from(result.mode.as_str()),
            Value::from(result.score),
            Value::from(result.total_questions),
            Value::from(details),
        ]);
    }
    rows
}

/// Rows without a parseable date are skipped; a corrupt details blob decodes
/// to an empty list and flags the result so the UI can warn.
pub fn results_from_rows(rows: &[Row]) -> Vec<QuizResult> {
    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };
    let columns = ColumnIndex::new(header, &RESULT_HEADERS);

    let mut results: Vec<QuizResult> = Vec::new();
    for row in data {
        let Some(date) = parse_date(&cell_string(row, columns.get("Date"))) else {
            continue;
        };
        let (details, corrupt_details) = parse_details(&cell_string(row, columns.get("Details")));
        let total_questions = cell_u64(row, columns.get("TotalQuestions")) as u32;
        let score = (cell_u64(row, columns.get("Score")) as u32).min(total_questions);
        let scope = cell_string(row, columns.get("Scope"));
        results.push(QuizResult {
            date,
            scope: if scope.trim().is_empty() { SCOPE_ALL.to_string() } else { scope },
            mode: QuizMode::from_key(&cell_string(row, columns.get("Mode"))),
            score,
            total_questions,
            details,
            corrupt_details,
        });
    }
    results.sort_by_key(|r| std::cmp::Reverse(r.date));
    results
}

fn parse_details(raw: &str) -> (Vec<AnswerRecord>, bool) {
    if raw.trim().is_empty() {
        return (Vec::new(), false);
    }
    match serde_json::from_str(raw) {
        Ok(details) => (details, false),
        Err(_) => (Vec::new(), true),
    }
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Header-name to column-position lookup built from the sheet's first row.
struct ColumnIndex {
    positions: Vec<(&'static str, usize)>,
}

impl ColumnIndex {
    fn new(header: &Row, names: &[&'static str]) -> Self {
        let labels: Vec<String> = header
            .iter()
            .map(|cell| match cell {
                Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            })
            .collect();
        let positions = names
            .iter()
            .filter_map(|name| labels.iter().position(|l| l == name).map(|i| (*name, i)))
            .collect();
        Self { positions }
    }

    fn get(&self, name: &str) -> Option<usize> {
        self.positions.iter().find(|(n, _)| *n == name).map(|(_, i)| *i)
    }
}

fn cell_string(row: &Row, index: Option<usize>) -> String {
    match index.and_then(|i| row.get(i)) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn cell_u64(row: &Row, index: Option<usize>) -> u64 {
    match index.and_then(|i| row.get(i)) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_terms() -> Vec<Term> {
        vec![
            Term {
                id: 1,
                term: "Burn Rate".to_string(),
                definition: "Cash spend velocity".to_string(),
                example: "Our burn rate is high.".to_string(),
                category: "Finance".to_string(),
                mastery: Mastery::Learning,
            },
            Term {
                id: 2,
                term: "Runway".to_string(),
                definition: "Months of cash left".to_string(),
                example: String::new(),
                category: "Finance".to_string(),
                mastery: Mastery::NotStarted,
            },
        ]
    }

    #[test]
    fn terms_round_trip_through_rows() {
        let terms = sample_terms();
        let rows = terms_to_rows(&terms);
        assert_eq!(rows.len(), 3, "header plus two rows");
        assert_eq!(terms_from_rows(&rows), terms);
    }

    #[test]
    fn term_decode_follows_header_positions_not_column_order() {
        let rows = vec![
            vec![json!("Term"), json!("ID"), json!("Category"), json!("Definition")],
            vec![json!("Churn"), json!(5), json!("Sales"), json!("Customer loss rate")],
        ];
        let terms = terms_from_rows(&rows);
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].id, 5);
        assert_eq!(terms[0].term, "Churn");
        assert_eq!(terms[0].example, "", "missing column defaults to blank");
        assert_eq!(terms[0].mastery, Mastery::NotStarted);
    }

    #[test]
    fn blank_rows_and_duplicates_are_dropped() {
        let mut rows = terms_to_rows(&sample_terms());
        rows.push(vec![json!(9), json!(""), json!("  "), json!(""), json!(""), json!("")]);
        rows.push(vec![
            json!(10),
            json!("Burn Rate"),
            json!("Cash spend velocity"),
            json!(""),
            json!("Finance"),
            json!("Mastered"),
        ]);
        let terms = terms_from_rows(&rows);
        assert_eq!(terms.len(), 2, "blank row and duplicate pair dropped");
        assert_eq!(terms[0].mastery, Mastery::Learning, "first occurrence wins");
    }

    #[test]
    fn numeric_ids_arriving_as_strings_still_parse() {
        let rows = vec![
            vec![json!("ID"), json!("Term"), json!("Definition")],
            vec![json!("7"), json!("CAC"), json!("Customer acquisition cost")],
        ];
        assert_eq!(terms_from_rows(&rows)[0].id, 7);
    }

    #[test]
    fn results_round_trip_and_sort_newest_first() {
        let old = QuizResult {
            date: "2026-01-05T10:00:00Z".parse().unwrap(),
            scope: "Finance".to_string(),
            mode: QuizMode::TermToDefinition,
            score: 2,
            total_questions: 3,
            details: Vec::new(),
            corrupt_details: false,
        };
        let new = QuizResult {
            date: "2026-03-01T09:30:00Z".parse().unwrap(),
            scope: SCOPE_ALL.to_string(),
            mode: QuizMode::ExampleToTerm,
            score: 1,
            total_questions: 5,
            details: Vec::new(),
            corrupt_details: false,
        };
        let rows = results_to_rows(&[old, new]);
        let decoded = results_from_rows(&rows);
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].scope, SCOPE_ALL);
        assert_eq!(decoded[0].mode, QuizMode::ExampleToTerm);
        assert_eq!(decoded[1].score, 2);
    }

    #[test]
    fn corrupt_details_blob_becomes_empty_list_with_flag() {
        let rows = vec![
            RESULT_HEADERS.iter().map(|h| json!(h)).collect(),
            vec![
                json!("2026-02-02T08:00:00Z"),
                json!("all"),
                json!("term_to_def"),
                json!(3),
                json!(5),
                json!("{not valid json"),
            ],
        ];
        let decoded = results_from_rows(&rows);
        assert_eq!(decoded.len(), 1);
        assert!(decoded[0].details.is_empty());
        assert!(decoded[0].corrupt_details);
    }

    #[test]
    fn rows_without_a_parseable_date_are_skipped() {
        let rows = vec![
            RESULT_HEADERS.iter().map(|h| json!(h)).collect(),
            vec![json!("not a date"), json!("all"), json!("term_to_def"), json!(1), json!(1), json!("[]")],
            vec![json!("2026-02-02 08:00:00"), json!("all"), json!("term_to_def"), json!(1), json!(1), json!("[]")],
        ];
        let decoded = results_from_rows(&rows);
        assert_eq!(decoded.len(), 1, "legacy space-separated timestamps still parse");
    }

    #[test]
    fn score_is_clamped_to_total() {
        let rows = vec![
            RESULT_HEADERS.iter().map(|h| json!(h)).collect(),
            vec![
                json!("2026-02-02T08:00:00Z"),
                json!("all"),
                json!("term_to_def"),
                json!(9),
                json!(5),
                json!(""),
            ],
        ];
        assert_eq!(results_from_rows(&rows)[0].score, 5);
    }
}
