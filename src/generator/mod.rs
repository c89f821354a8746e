pub mod questions;

use serde::{Deserialize, Serialize};

use crate::engine::repository::Term;

/// Which field pairing a quiz tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizMode {
    /// Prompt with the term, answer with its definition.
    #[default]
    #[serde(rename = "term_to_def")]
    TermToDefinition,
    /// Prompt with the example sentence, answer with the term it uses.
    #[serde(rename = "example_to_term")]
    ExampleToTerm,
}

impl QuizMode {
    /// Key as stored in the Mode column of the result sheet.
    pub fn as_str(self) -> &'static str {
        match self {
            QuizMode::TermToDefinition => "term_to_def",
            QuizMode::ExampleToTerm => "example_to_term",
        }
    }

    pub fn from_key(key: &str) -> Self {
        match key.trim() {
            "example_to_term" => QuizMode::ExampleToTerm,
            _ => QuizMode::TermToDefinition,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QuizMode::TermToDefinition => "Term to Definition",
            QuizMode::ExampleToTerm => "Example to Term",
        }
    }
}

/// Category filter used when sampling quiz terms.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum QuizScope {
    #[default]
    All,
    Category(String),
}

/// Sentinel stored in the Scope column when no category filter was applied.
pub const SCOPE_ALL: &str = "all";

impl QuizScope {
    pub fn includes(&self, term: &Term) -> bool {
        match self {
            QuizScope::All => true,
            QuizScope::Category(category) => term.category == *category,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            QuizScope::All => SCOPE_ALL,
            QuizScope::Category(category) => category,
        }
    }
}
