use std::cell::{Cell, RefCell};

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use vocadrill::engine::mastery::Mastery;
use vocadrill::engine::repository::{Term, TermRepository};
use vocadrill::error::StoreError;
use vocadrill::generator::{QuizMode, QuizScope};
use vocadrill::session::quiz::QuizSession;
use vocadrill::session::result::QuizResult;
use vocadrill::store::VocabStore;

/// In-memory stand-in for the spreadsheet web app: collections start
/// missing, and writes can be switched off to simulate store failures.
#[derive(Default)]
struct MemoryStore {
    terms: RefCell<Option<Vec<Term>>>,
    results: RefCell<Option<Vec<QuizResult>>>,
    fail_writes: Cell<bool>,
}

impl VocabStore for MemoryStore {
    fn load_terms(&self) -> Result<Option<Vec<Term>>, StoreError> {
        Ok(self.terms.borrow().clone())
    }

    fn save_terms(&self, terms: &[Term]) -> Result<(), StoreError> {
        if self.fail_writes.get() {
            return Err(StoreError::Backend("writes disabled".to_string()));
        }
        *self.terms.borrow_mut() = Some(terms.to_vec());
        Ok(())
    }

    fn load_results(&self) -> Result<Option<Vec<QuizResult>>, StoreError> {
        Ok(self.results.borrow().clone())
    }

    fn save_results(&self, results: &[QuizResult]) -> Result<(), StoreError> {
        if self.fail_writes.get() {
            return Err(StoreError::Backend("writes disabled".to_string()));
        }
        *self.results.borrow_mut() = Some(results.to_vec());
        Ok(())
    }
}

fn seeded_store() -> MemoryStore {
    let store = MemoryStore::default();
    let mut repo = TermRepository::default();
    repo.add("Burn Rate", "Cash spend velocity", "Our burn rate is high.", "Finance").unwrap();
    repo.add("Runway", "Months of cash left", "Runway is 18 months.", "Finance").unwrap();
    repo.add("Churn", "Customer loss rate", "Churn fell last quarter.", "Sales").unwrap();
    repo.add("CAC", "Customer acquisition cost", "", "Sales").unwrap();
    repo.add("Upsell", "Selling a bigger plan", "", "Sales").unwrap();
    repo.persist(&store).unwrap();
    store
}

#[test]
fn missing_collections_load_as_empty() {
    let store = MemoryStore::default();
    let repo = TermRepository::load(&store).unwrap();
    assert!(repo.is_empty());
    assert!(store.load_results().unwrap().is_none());
}

#[test]
fn completed_quiz_persists_result_and_mastery() {
    let store = seeded_store();
    let mut repo = TermRepository::load(&store).unwrap();
    let mut rng = SmallRng::seed_from_u64(3);

    let mut session =
        QuizSession::start(&repo, QuizMode::TermToDefinition, QuizScope::All, 5, &mut rng)
            .unwrap();
    assert_eq!(session.total(), 5);

    // Answer everything correctly except the second question.
    for i in 0..5 {
        let correct = session.current_question().unwrap().correct_answer.clone();
        if i == 1 {
            session.answer(&mut repo, "definitely wrong");
        } else {
            session.answer(&mut repo, &correct);
        }
    }
    assert!(session.is_complete());

    // Completion: shape the result, then two independent write-throughs.
    let result = QuizResult::from_session(&session, Utc::now());
    assert_eq!(result.score, 4);
    assert_eq!(result.total_questions, 5);

    let mut history = store.load_results().unwrap().unwrap_or_default();
    history.insert(0, result);
    store.save_results(&history).unwrap();
    repo.persist(&store).unwrap();

    // A fresh load sees both writes.
    let reloaded = TermRepository::load(&store).unwrap();
    let promoted = reloaded.terms().iter().filter(|t| t.mastery == Mastery::Learning).count();
    assert_eq!(promoted, 4, "each correct answer promoted its term");

    let results = store.load_results().unwrap().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].score, 4);
    assert_eq!(results[0].details.len(), 5);
}

#[test]
fn abandoned_quiz_rolls_back_and_persists_nothing() {
    let store = seeded_store();
    let mut repo = TermRepository::load(&store).unwrap();
    let before: Vec<(u64, Mastery)> =
        repo.terms().iter().map(|t| (t.id, t.mastery)).collect();
    let mut rng = SmallRng::seed_from_u64(4);

    let mut session =
        QuizSession::start(&repo, QuizMode::TermToDefinition, QuizScope::All, 5, &mut rng)
            .unwrap();
    for _ in 0..3 {
        let correct = session.current_question().unwrap().correct_answer.clone();
        session.answer(&mut repo, &correct);
    }

    // Abandon: full discard, no store writes.
    session.rollback_mastery(&mut repo);

    let after: Vec<(u64, Mastery)> =
        repo.terms().iter().map(|t| (t.id, t.mastery)).collect();
    assert_eq!(before, after);
    assert!(store.load_results().unwrap().is_none(), "nothing was persisted");
}

#[test]
fn abandoned_quiz_finalized_by_option_records_unanswered() {
    let store = seeded_store();
    let mut repo = TermRepository::load(&store).unwrap();
    let mut rng = SmallRng::seed_from_u64(5);

    let mut session =
        QuizSession::start(&repo, QuizMode::TermToDefinition, QuizScope::All, 5, &mut rng)
            .unwrap();
    let correct = session.current_question().unwrap().correct_answer.clone();
    session.answer(&mut repo, &correct);
    session.answer(&mut repo, "definitely wrong");
    let correct = session.current_question().unwrap().correct_answer.clone();
    session.answer(&mut repo, &correct);

    // persist_abandoned_quizzes: finalize mid-session.
    let result = QuizResult::from_session(&session, Utc::now());
    assert_eq!(result.total_questions, 5);
    assert_eq!(result.details.len(), 5);
    assert_eq!(result.score, 2);
    assert_eq!(result.details[3].user_answer, None);
    assert_eq!(result.details[4].user_answer, None);

    // The persisted form uses the literal marker.
    let json = serde_json::to_string(&result.details).unwrap();
    assert_eq!(json.matches("\"unanswered\"").count(), 2);
}

#[test]
fn store_failure_keeps_local_state() {
    let store = seeded_store();
    let mut repo = TermRepository::load(&store).unwrap();

    store.fail_writes.set(true);
    repo.add("EBITDA", "Earnings before the usual deductions", "", "Finance").unwrap();
    let err = repo.persist(&store).unwrap_err();
    assert!(err.to_string().contains("writes disabled"));

    // Local mutation survives; the store still has the old collection.
    assert_eq!(repo.len(), 6);
    assert_eq!(store.load_terms().unwrap().unwrap().len(), 5);

    // The next successful write converges.
    store.fail_writes.set(false);
    repo.persist(&store).unwrap();
    assert_eq!(store.load_terms().unwrap().unwrap().len(), 6);
}

#[test]
fn scoped_example_quiz_respects_both_filters() {
    let store = seeded_store();
    let repo = TermRepository::load(&store).unwrap();
    let mut rng = SmallRng::seed_from_u64(6);

    // Sales terms with an example: only "Churn".
    let session = QuizSession::start(
        &repo,
        QuizMode::ExampleToTerm,
        QuizScope::Category("Sales".to_string()),
        10,
        &mut rng,
    )
    .unwrap();
    assert_eq!(session.total(), 1, "count clamps to the eligible set");
    let question = session.current_question().unwrap();
    assert_eq!(question.correct_answer, "Churn");
    assert_eq!(question.prompt, "Churn fell last quarter.");

    // A scope matching nothing fails cleanly instead of sampling badly.
    let err = QuizSession::start(
        &repo,
        QuizMode::ExampleToTerm,
        QuizScope::Category("Nonexistent".to_string()),
        10,
        &mut rng,
    );
    assert!(err.is_err());
}
