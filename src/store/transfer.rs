//! Local file import/export: CSV mirrors of the term collection and result
//! history, plus a versioned JSON envelope of everything at once.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::repository::Term;
use crate::session::result::QuizResult;

pub const EXPORT_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportData {
    pub vocadrill_export_version: u32,
    pub exported_at: DateTime<Utc>,
    pub terms: Vec<Term>,
    pub results: Vec<QuizResult>,
}

/// One row of a terms CSV being imported. Only term, definition, and
/// category are required; ids are reassigned by the repository on import.
#[derive(Clone, Debug, Deserialize)]
pub struct CsvTerm {
    #[serde(rename = "Term")]
    pub term: String,
    #[serde(rename = "Definition")]
    pub definition: String,
    #[serde(default, rename = "Example")]
    pub example: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(default, rename = "Mastery")]
    pub mastery: String,
}

pub fn export_json(path: &Path, terms: &[Term], results: &[QuizResult]) -> Result<()> {
    let data = ExportData {
        vocadrill_export_version: EXPORT_VERSION,
        exported_at: Utc::now(),
        terms: terms.to_vec(),
        results: results.to_vec(),
    };
    let json = serde_json::to_string_pretty(&data)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

pub fn import_json(path: &Path) -> Result<ExportData> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let data: ExportData = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", path.display()))?;
    if data.vocadrill_export_version != EXPORT_VERSION {
        bail!(
            "Unsupported export version: {} (expected {})",
            data.vocadrill_export_version,
            EXPORT_VERSION
        );
    }
    Ok(data)
}

pub fn export_terms_csv(path: &Path, terms: &[Term]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["ID", "Term", "Definition", "Example", "Category", "Mastery"])?;
    for term in terms {
        let id = term.id.to_string();
        writer.write_record([
            id.as_str(),
            term.term.as_str(),
            term.definition.as_str(),
            term.example.as_str(),
            term.category.as_str(),
            term.mastery.label(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_results_csv(path: &Path, results: &[QuizResult]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["Date", "Scope", "Mode", "Score", "TotalQuestions", "Details"])?;
    for result in results {
        let details = serde_json::to_string(&result.details)?;
        let date = result.date.to_rfc3339();
        let score = result.score.to_string();
        let total = result.total_questions.to_string();
        writer.write_record([
            date.as_str(),
            result.scope.as_str(),
            result.mode.as_str(),
            score.as_str(),
            total.as_str(),
            details.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Parse a terms CSV. Rows come back unvalidated; the caller feeds them
/// through the repository add contract so imports obey the same rules as
/// the editor form.
pub fn import_terms_csv(path: &Path) -> Result<Vec<CsvTerm>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let mut rows = Vec::new();
    for (index, record) in reader.deserialize::<CsvTerm>().enumerate() {
        let row = record.with_context(|| format!("row {}", index + 2))?;
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::engine::mastery::Mastery;
    use crate::engine::repository::TermRepository;

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
                term: "Churn, annual".to_string(),
                definition: "Yearly customer loss".to_string(),
                example: String::new(),
                category: "Sales".to_string(),
                mastery: Mastery::NotStarted,
            },
        ]
    }

    #[test]
    fn terms_csv_round_trips_including_commas() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("terms.csv");
        export_terms_csv(&path, &sample_terms()).unwrap();

        let rows = import_terms_csv(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].term, "Churn, annual");
        assert_eq!(rows[1].mastery, "Not Started");
        assert_eq!(rows[0].example, "Our burn rate is high.");
    }

    #[test]
    fn imported_rows_pass_through_the_add_contract() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("terms.csv");
        fs::write(
            &path,
            "Term,Definition,Category\nRunway,Months of cash left,Finance\n",
        )
        .unwrap();

        let rows = import_terms_csv(&path).unwrap();
        let mut repo = TermRepository::default();
        for row in &rows {
            repo.add(&row.term, &row.definition, &row.example, &row.category).unwrap();
        }
        let term = repo.get(1).unwrap();
        assert_eq!(term.term, "Runway");
        assert_eq!(term.mastery, Mastery::NotStarted);
    }

    #[test]
    fn csv_missing_required_column_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("terms.csv");
        fs::write(&path, "Term,Definition\nRunway,Months of cash left\n").unwrap();
        assert!(import_terms_csv(&path).is_err());
    }

    #[test]
    fn json_envelope_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.json");
        export_json(&path, &sample_terms(), &[]).unwrap();

        let data = import_json(&path).unwrap();
        assert_eq!(data.vocadrill_export_version, EXPORT_VERSION);
        assert_eq!(data.terms, sample_terms());
        assert!(data.results.is_empty());
    }

    #[test]
    fn json_import_rejects_unknown_versions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.json");
        export_json(&path, &sample_terms(), &[]).unwrap();
        let bumped = fs::read_to_string(&path)
            .unwrap()
            .replace("\"vocadrill_export_version\": 1", "\"vocadrill_export_version\": 99");
        fs::write(&path, bumped).unwrap();

        let err = import_json(&path).unwrap_err().to_string();
        assert!(err.contains("Unsupported export version"));
        assert!(err.contains("99"));
    }
}
