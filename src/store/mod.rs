pub mod schema;
pub mod sheet_store;
pub mod transfer;

use crate::engine::repository::Term;
use crate::error::StoreError;
use crate::session::result::QuizResult;

/// The persistence contract the core requires. One collection of terms and
/// one of quiz results per user; `Ok(None)` means the collection does not
/// exist yet (first run), which callers treat as empty rather than failing.
pub trait VocabStore {
    fn load_terms(&self) -> Result<Option<Vec<Term>>, StoreError>;
    fn save_terms(&self, terms: &[Term]) -> Result<(), StoreError>;
    fn load_results(&self) -> Result<Option<Vec<QuizResult>>, StoreError>;
    fn save_results(&self, results: &[QuizResult]) -> Result<(), StoreError>;
}
