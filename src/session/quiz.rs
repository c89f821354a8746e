use rand::Rng;

use crate::engine::mastery::Mastery;
use crate::engine::repository::TermRepository;
use crate::error::VocabError;
use crate::generator::questions::{self, Question};
use crate::generator::{QuizMode, QuizScope};
use crate::session::result::AnswerRecord;

/// One quiz run, from the first question to completion or abandonment.
/// Exactly one question is live at a time; answering advances the index.
///
/// Mastery transitions are applied to the repository as answers are graded,
/// but the prior state of each touched term is kept here so an abandoned
/// session can be rolled back in full.
pub struct QuizSession {
    mode: QuizMode,
    scope: QuizScope,
    questions: Vec<Question>,
    answers: Vec<AnswerRecord>,
    prior_mastery: Vec<(u64, Mastery)>,
}

impl QuizSession {
    /// Sample questions from the repository and open the session. Fails with
    /// `GenerationFailed` when scope and mode leave nothing to ask.
    pub fn start(
        repo: &TermRepository,
        mode: QuizMode,
        scope: QuizScope,
        count: usize,
        rng: &mut impl Rng,
    ) -> Result<Self, VocabError> {
        let questions = questions::generate(repo.terms(), mode, &scope, count, rng)?;
        Ok(Self {
            mode,
            scope,
            questions,
            answers: Vec::new(),
            prior_mastery: Vec::new(),
        })
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn scope(&self) -> &QuizScope {
        &self.scope
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn answered(&self) -> usize {
        self.answers.len()
    }

    pub fn correct_so_far(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.answers.len())
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() >= self.questions.len()
    }

    pub fn last_answer(&self) -> Option<&AnswerRecord> {
        self.answers.last()
    }

    /// Grade the choice against the current question by exact string
    /// equality, record it, and apply the mastery transition to the source
    /// term. Returns whether the answer was correct; answering a finished
    /// session returns false and records nothing.
    pub fn answer(&mut self, repo: &mut TermRepository, choice: &str) -> bool {
        let Some(question) = self.questions.get(self.answers.len()) else {
            return false;
        };
        let is_correct = choice == question.correct_answer;

        self.answers.push(AnswerRecord {
            question_text: question.prompt.clone(),
            correct_answer: question.correct_answer.clone(),
            user_answer: Some(choice.to_string()),
            is_correct,
            term_id: question.term_id,
            term: question.term.clone(),
            definition: question.definition.clone(),
            example: question.example.clone(),
        });

        // Term may have been deleted mid-session; skip the update silently.
        if let Some(term) = repo.get(question.term_id) {
            let prior = term.mastery;
            self.prior_mastery.push((question.term_id, prior));
            repo.set_mastery(question.term_id, prior.after_answer(is_correct));
        }

        is_correct
    }

    /// Undo every mastery transition this session applied. Terms deleted
    /// since grading are skipped.
    pub fn rollback_mastery(&self, repo: &mut TermRepository) {
        for (id, prior) in self.prior_mastery.iter().rev() {
            repo.set_mastery(*id, *prior);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::engine::filter::TermFilter;

    fn seeded_repo() -> TermRepository {
        let mut repo = TermRepository::default();
        repo.add("Burn Rate", "Cash spend velocity", "Our burn rate is high.", "Finance").unwrap();
        repo.add("Runway", "Months of cash left", "Runway is 18 months.", "Finance").unwrap();
        repo.add("Churn", "Customer loss rate", "Churn fell.", "Sales").unwrap();
        repo.add("CAC", "Customer acquisition cost", "", "Sales").unwrap();
        repo
    }

    fn start(repo: &TermRepository, count: usize) -> QuizSession {
        let mut rng = SmallRng::seed_from_u64(11);
        QuizSession::start(repo, QuizMode::TermToDefinition, QuizScope::All, count, &mut rng)
            .unwrap()
    }

    #[test]
    fn answering_advances_one_question_at_a_time() {
        let mut repo = seeded_repo();
        let mut session = start(&repo, 4);
        assert_eq!(session.total(), 4);

        for i in 0..4 {
            assert_eq!(session.answered(), i);
            assert!(!session.is_complete());
            let correct = session.current_question().unwrap().correct_answer.clone();
            session.answer(&mut repo, &correct);
        }
        assert!(session.is_complete());
        assert!(session.current_question().is_none());
    }

    #[test]
    fn running_score_counts_correct_answers() {
        let mut repo = seeded_repo();
        let mut session = start(&repo, 4);

        let correct = session.current_question().unwrap().correct_answer.clone();
        session.answer(&mut repo, &correct);
        session.answer(&mut repo, "definitely wrong");
        assert_eq!(session.answered(), 2);
        assert_eq!(session.correct_so_far(), 1);
    }

    #[test]
    fn grading_is_exact_string_equality() {
        let mut repo = seeded_repo();
        let mut session = start(&repo, 1);
        let almost = session.current_question().unwrap().correct_answer.to_uppercase();
        assert!(!session.answer(&mut repo, &almost));
    }

    #[test]
    fn correct_answer_promotes_source_term() {
        let mut repo = seeded_repo();
        let mut session = start(&repo, 4);
        let q = session.current_question().unwrap();
        let (id, correct) = (q.term_id, q.correct_answer.clone());
        session.answer(&mut repo, &correct);
        assert_eq!(repo.get(id).unwrap().mastery, Mastery::Learning);
    }

    #[test]
    fn wrong_answer_on_fresh_term_leaves_not_started() {
        let mut repo = seeded_repo();
        let mut session = start(&repo, 4);
        let id = session.current_question().unwrap().term_id;
        session.answer(&mut repo, "definitely wrong");
        assert_eq!(repo.get(id).unwrap().mastery, Mastery::NotStarted);
    }

    #[test]
    fn deleted_term_skips_mastery_update_without_failing() {
        let mut repo = seeded_repo();
        let mut session = start(&repo, 4);
        let q = session.current_question().unwrap();
        let (id, correct) = (q.term_id, q.correct_answer.clone());
        repo.delete(id);
        assert!(session.answer(&mut repo, &correct), "grading still works");
        assert_eq!(session.answered(), 1);
        assert!(repo.get(id).is_none());
    }

    #[test]
    fn rollback_restores_pre_session_mastery() {
        let mut repo = seeded_repo();
        repo.set_mastery(2, Mastery::Mastered);
        let before: Vec<Mastery> =
            repo.query(&TermFilter::default()).iter().map(|t| t.mastery).collect();

        let mut session = start(&repo, 4);
        for _ in 0..3 {
            let correct = session.current_question().unwrap().correct_answer.clone();
            session.answer(&mut repo, &correct);
        }
        session.rollback_mastery(&mut repo);

        let after: Vec<Mastery> =
            repo.query(&TermFilter::default()).iter().map(|t| t.mastery).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn answer_after_completion_is_a_no_op() {
        let mut repo = seeded_repo();
        let mut session = start(&repo, 1);
        let correct = session.current_question().unwrap().correct_answer.clone();
        session.answer(&mut repo, &correct);
        assert!(!session.answer(&mut repo, &correct));
        assert_eq!(session.answered(), 1);
    }
}
