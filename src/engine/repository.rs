use serde::{Deserialize, Serialize};

use crate::engine::filter::TermFilter;
use crate::engine::mastery::Mastery;
use crate::error::{StoreError, VocabError};
use crate::store::VocabStore;

/// One vocabulary entry. `example` is optional in spirit: an empty string
/// means "no example sentence recorded".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: u64,
    pub term: String,
    pub definition: String,
    #[serde(default)]
    pub example: String,
    pub category: String,
    #[serde(default)]
    pub mastery: Mastery,
}

impl Term {
    pub fn has_example(&self) -> bool {
        !self.example.trim().is_empty()
    }
}

/// In-memory view over one user's term collection. Mutations are local and
/// optimistic; durability requires an explicit `persist` write-through.
#[derive(Clone, Debug, Default)]
pub struct TermRepository {
    terms: Vec<Term>,
}

impl TermRepository {
    /// Replace state from the store. A missing collection (first run for
    /// this user) initializes an empty repository instead of failing.
    pub fn load(store: &dyn VocabStore) -> Result<Self, StoreError> {
        let terms = store.load_terms()?.unwrap_or_default();
        Ok(Self { terms })
    }

    pub fn from_terms(terms: Vec<Term>) -> Self {
        Self { terms }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[allow(dead_code)] // Used by integration tests
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Term> {
        self.terms.iter().find(|t| t.id == id)
    }

    fn next_id(&self) -> u64 {
        self.terms.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    /// Add a new term. Term, definition, and category are required; the new
    /// entry gets the next free id and starts at `NotStarted`.
    pub fn add(
        &mut self,
        term: &str,
        definition: &str,
        example: &str,
        category: &str,
    ) -> Result<&Term, VocabError> {
        validate_required(term, definition, category)?;
        let entry = Term {
            id: self.next_id(),
            term: term.trim().to_string(),
            definition: definition.trim().to_string(),
            example: example.trim().to_string(),
            category: category.trim().to_string(),
            mastery: Mastery::NotStarted,
        };
        self.terms.push(entry);
        Ok(self.terms.last().expect("just pushed"))
    }

    /// Overwrite an existing term's fields. Mastery is set explicitly here
    /// too: the edit form exposes it so users can correct progress by hand.
    pub fn update(
        &mut self,
        id: u64,
        term: &str,
        definition: &str,
        example: &str,
        category: &str,
        mastery: Mastery,
    ) -> Result<(), VocabError> {
        validate_required(term, definition, category)?;
        let entry = self
            .terms
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(VocabError::NotFound(id))?;
        entry.term = term.trim().to_string();
        entry.definition = definition.trim().to_string();
        entry.example = example.trim().to_string();
        entry.category = category.trim().to_string();
        entry.mastery = mastery;
        Ok(())
    }

    /// Returns false when the id is already gone (deleted between
    /// generation and grading); callers skip the update silently.
    pub fn set_mastery(&mut self, id: u64, mastery: Mastery) -> bool {
        match self.terms.iter_mut().find(|t| t.id == id) {
            Some(entry) => {
                entry.mastery = mastery;
                true
            }
            None => false,
        }
    }

    /// Idempotent: deleting an absent id changes nothing.
    pub fn delete(&mut self, id: u64) {
        self.terms.retain(|t| t.id != id);
    }

    /// Snapshot of the terms matching the filter, in collection order.
    pub fn query(&self, filter: &TermFilter) -> Vec<Term> {
        self.terms.iter().filter(|t| filter.matches(t)).cloned().collect()
    }

    /// Sorted, deduplicated category labels across the collection.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.terms.iter().map(|t| t.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Write-through of the full collection. In-memory state is untouched
    /// on failure; the caller decides how to surface the inconsistency.
    pub fn persist(&self, store: &dyn VocabStore) -> Result<(), StoreError> {
        store.save_terms(&self.terms)
    }
}

fn validate_required(term: &str, definition: &str, category: &str) -> Result<(), VocabError> {
    if term.trim().is_empty() {
        return Err(VocabError::Validation("term"));
    }
    if definition.trim().is_empty() {
        return Err(VocabError::Validation("definition"));
    }
    if category.trim().is_empty() {
        return Err(VocabError::Validation("category"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> TermRepository {
        let mut repo = TermRepository::default();
        repo.add("Burn Rate", "Cash spend velocity", "", "Finance").unwrap();
        repo.add("Runway", "Months of cash left", "Runway is 18 months.", "Finance").unwrap();
        repo.add("Churn", "Customer loss rate", "", "Sales").unwrap();
        repo
    }

    #[test]
    fn add_assigns_sequential_ids_from_one() {
        let repo = seeded();
        let ids: Vec<u64> = repo.terms().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn add_after_delete_does_not_reuse_max_id() {
        let mut repo = seeded();
        repo.delete(2);
        let id = repo.add("CAC", "Customer acquisition cost", "", "Sales").unwrap().id;
        assert_eq!(id, 4, "next id is max existing + 1");
    }

    #[test]
    fn add_rejects_blank_required_fields() {
        let mut repo = TermRepository::default();
        assert!(matches!(
            repo.add("  ", "def", "", "Finance"),
            Err(VocabError::Validation("term"))
        ));
        assert!(matches!(
            repo.add("Churn", "", "", "Finance"),
            Err(VocabError::Validation("definition"))
        ));
        assert!(matches!(
            repo.add("Churn", "def", "", " "),
            Err(VocabError::Validation("category"))
        ));
        assert!(repo.is_empty(), "no mutation on rejected add");
    }

    #[test]
    fn new_terms_start_not_started() {
        let repo = seeded();
        assert!(repo.terms().iter().all(|t| t.mastery == Mastery::NotStarted));
    }

    #[test]
    fn update_missing_id_is_not_found() {
        let mut repo = seeded();
        let err = repo.update(99, "X", "Y", "", "Z", Mastery::Learning);
        assert!(matches!(err, Err(VocabError::NotFound(99))));
    }

    #[test]
    fn update_overwrites_all_fields() {
        let mut repo = seeded();
        repo.update(3, "Churn Rate", "Monthly customer loss", "Churn fell.", "Sales", Mastery::Mastered)
            .unwrap();
        let t = repo.get(3).unwrap();
        assert_eq!(t.term, "Churn Rate");
        assert_eq!(t.example, "Churn fell.");
        assert_eq!(t.mastery, Mastery::Mastered);
    }

    #[test]
    fn delete_is_idempotent() {
        let mut repo = seeded();
        repo.delete(2);
        assert_eq!(repo.len(), 2);
        repo.delete(2);
        repo.delete(99);
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn query_returns_detached_snapshot() {
        let mut repo = seeded();
        let snapshot = repo.query(&TermFilter::default());
        repo.delete(1);
        assert_eq!(snapshot.len(), 3, "snapshot unaffected by later mutation");
    }

    #[test]
    fn categories_sorted_and_deduped() {
        let repo = seeded();
        assert_eq!(repo.categories(), vec!["Finance".to_string(), "Sales".to_string()]);
    }

    #[test]
    fn set_mastery_on_deleted_term_reports_miss() {
        let mut repo = seeded();
        repo.delete(1);
        assert!(!repo.set_mastery(1, Mastery::Learning));
    }
}
