use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::engine::repository::Term;
use crate::error::VocabError;
use crate::generator::{QuizMode, QuizScope};

/// Incorrect choices drawn per question, when the pool allows it.
pub const MAX_DISTRACTORS: usize = 3;

/// One generated multiple-choice question. Term fields are denormalized so
/// the answer record stays meaningful after the term is edited or deleted.
#[derive(Clone, Debug)]
pub struct Question {
    pub prompt: String,
    pub correct_answer: String,
    /// 2-4 unique strings, exactly one equal to `correct_answer`, shuffled.
    /// A single-choice question only happens when no distractor exists at all.
    pub choices: Vec<String>,
    pub term_id: u64,
    pub term: String,
    pub definition: String,
    pub example: String,
}

/// Build `count` questions by sampling the eligible set without replacement.
///
/// The eligible set is the collection narrowed by scope, and for
/// example-to-term mode narrowed further to terms that carry an example.
/// `count` is clamped to the eligible size; only an empty eligible set (or a
/// zero request) fails. Distractors come from the eligible set's opposite
/// field, deduplicated, with the correct answer excluded.
pub fn generate(
    terms: &[Term],
    mode: QuizMode,
    scope: &QuizScope,
    count: usize,
    rng: &mut impl Rng,
) -> Result<Vec<Question>, VocabError> {
    let eligible: Vec<&Term> = terms
        .iter()
        .filter(|t| scope.includes(t))
        .filter(|t| mode != QuizMode::ExampleToTerm || t.has_example())
        .collect();

    let count = count.min(eligible.len());
    if count == 0 {
        return Err(VocabError::GenerationFailed);
    }

    let sampled: Vec<&Term> = eligible.choose_multiple(rng, count).copied().collect();

    let questions = sampled
        .into_iter()
        .map(|term| build_question(term, &eligible, mode, rng))
        .collect();
    Ok(questions)
}

fn build_question(term: &Term, eligible: &[&Term], mode: QuizMode, rng: &mut impl Rng) -> Question {
    let (prompt, correct_answer) = match mode {
        QuizMode::TermToDefinition => (term.term.clone(), term.definition.clone()),
        QuizMode::ExampleToTerm => (term.example.clone(), term.term.clone()),
    };

    // Opposite-field pool, first occurrence wins on duplicates.
    let mut seen = HashSet::new();
    let pool: Vec<&str> = eligible
        .iter()
        .map(|t| match mode {
            QuizMode::TermToDefinition => t.definition.as_str(),
            QuizMode::ExampleToTerm => t.term.as_str(),
        })
        .filter(|candidate| *candidate != correct_answer && seen.insert(*candidate))
        .collect();

    let mut choices: Vec<String> = pool
        .choose_multiple(rng, MAX_DISTRACTORS)
        .map(|s| s.to_string())
        .collect();
    choices.push(correct_answer.clone());
    choices.shuffle(rng);

    Question {
        prompt,
        correct_answer,
        choices,
        term_id: term.id,
        term: term.term.clone(),
        definition: term.definition.clone(),
        example: term.example.clone(),
    }
}
