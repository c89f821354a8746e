use std::time::Duration;

use serde::Deserialize;

use crate::engine::repository::Term;
use crate::error::StoreError;
use crate::session::result::QuizResult;
use crate::store::VocabStore;
use crate::store::schema::{self, Row};

/// Spreadsheet web app client. The backend exposes one endpoint with
/// `read_data`/`write_data` actions; each user gets a terms sheet and a
/// results sheet, named from the sanitized username.
pub struct SheetStore {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    terms_sheet: String,
    results_sheet: String,
}

/// Markers the backend uses for a sheet that does not exist yet. The web
/// app predates this client and may answer in either language.
const SHEET_NOT_FOUND_MARKERS: [&str; 2] = ["Sheet not found", "シートが見つかりません"];

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    data: Option<Vec<Row>>,
}

impl SheetStore {
    pub fn new(base_url: &str, api_key: &str, username: &str) -> Result<Self, StoreError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        let user = sanitize_username(username);
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            terms_sheet: format!("Sheet_{user}"),
            results_sheet: format!("Sheet_TestResults_{user}"),
        })
    }

    #[allow(dead_code)] // Used by tests
    pub fn terms_sheet(&self) -> &str {
        &self.terms_sheet
    }

    #[allow(dead_code)] // Used by tests
    pub fn results_sheet(&self) -> &str {
        &self.results_sheet
    }

    /// `Ok(None)` when the sheet does not exist yet.
    fn read_sheet(&self, sheet: &str) -> Result<Option<Vec<Row>>, StoreError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("sheet", sheet),
                ("action", "read_data"),
            ])
            .send()?
            .error_for_status()?;

        let body: ApiResponse = response
            .json()
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        if let Some(error) = body.error {
            if SHEET_NOT_FOUND_MARKERS.iter().any(|m| error.contains(m)) {
                return Ok(None);
            }
            return Err(StoreError::Backend(error));
        }
        Ok(Some(body.data.unwrap_or_default()))
    }

    fn write_sheet(&self, sheet: &str, rows: &[Row]) -> Result<(), StoreError> {
        let response = self
            .client
            .post(&self.base_url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("sheet", sheet),
                ("action", "write_data"),
            ])
            .json(&serde_json::json!({ "data": rows }))
            .send()?
            .error_for_status()?;

        let body: ApiResponse = response
            .json()
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(StoreError::Backend(error));
        }
        Ok(())
    }
}

impl VocabStore for SheetStore {
    fn load_terms(&self) -> Result<Option<Vec<Term>>, StoreError> {
        Ok(self
            .read_sheet(&self.terms_sheet)?
            .map(|rows| schema::terms_from_rows(&rows)))
    }

    fn save_terms(&self, terms: &[Term]) -> Result<(), StoreError> {
        self.write_sheet(&self.terms_sheet, &schema::terms_to_rows(terms))
    }

    fn load_results(&self) -> Result<Option<Vec<QuizResult>>, StoreError> {
        Ok(self
            .read_sheet(&self.results_sheet)?
            .map(|rows| schema::results_from_rows(&rows)))
    }

    fn save_results(&self, results: &[QuizResult]) -> Result<(), StoreError> {
        self.write_sheet(&self.results_sheet, &schema::results_to_rows(results))
    }
}

/// Collection names must be stable and sheet-safe: keep alphanumerics only.
/// An all-symbols name still gets a usable namespace.
pub fn sanitize_username(name: &str) -> String {
    let cleaned: String = name.chars().filter(|c| c.is_alphanumeric()).collect();
    if cleaned.is_empty() { "anonymous".to_string() } else { cleaned }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_alphanumerics_only() {
        assert_eq!(sanitize_username("Jane Doe-42"), "JaneDoe42");
        assert_eq!(sanitize_username("田中"), "田中");
        assert_eq!(sanitize_username("!!!"), "anonymous");
        assert_eq!(sanitize_username(""), "anonymous");
    }

    #[test]
    fn sheet_names_follow_user_namespace() {
        let store = SheetStore::new("https://example.invalid/exec", "key", "Jane Doe").unwrap();
        assert_eq!(store.terms_sheet(), "Sheet_JaneDoe");
        assert_eq!(store.results_sheet(), "Sheet_TestResults_JaneDoe");
    }
}
