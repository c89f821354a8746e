use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::generator::QuizMode;
use crate::session::quiz::QuizSession;

/// Literal stored in place of a missing answer when a session is finalized
/// with open questions.
pub const UNANSWERED: &str = "unanswered";

/// One graded (or skipped) response. Term fields are denormalized from the
/// question so history stays readable after the term is edited or deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_text: String,
    pub correct_answer: String,
    #[serde(with = "unanswered_sentinel")]
    pub user_answer: Option<String>,
    pub is_correct: bool,
    #[serde(default)]
    pub term_id: u64,
    #[serde(alias = "term_name")]
    pub term: String,
    #[serde(alias = "term_definition")]
    pub definition: String,
    #[serde(default, alias = "term_example")]
    pub example: String,
}

/// One persisted record per finalized quiz session. Never mutated after
/// creation; the user can only delete it as a whole.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizResult {
    pub date: DateTime<Utc>,
    /// Category filter used, or the "all" sentinel.
    pub scope: String,
    pub mode: QuizMode,
    pub score: u32,
    pub total_questions: u32,
    pub details: Vec<AnswerRecord>,
    /// Set while loading when the persisted details blob failed to parse
    /// and an empty list was substituted. Not persisted itself.
    #[serde(skip)]
    pub corrupt_details: bool,
}

impl QuizResult {
    /// Shape a session into its persisted record. Questions never answered
    /// (abandoned sessions finalized by choice) get the unanswered marker.
    pub fn from_session(session: &QuizSession, date: DateTime<Utc>) -> Self {
        let mut details: Vec<AnswerRecord> = session.answers().to_vec();
        for question in &session.questions()[details.len()..] {
            details.push(AnswerRecord {
                question_text: question.prompt.clone(),
                correct_answer: question.correct_answer.clone(),
                user_answer: None,
                is_correct: false,
                term_id: question.term_id,
                term: question.term.clone(),
                definition: question.definition.clone(),
                example: question.example.clone(),
            });
        }
        let score = details.iter().filter(|d| d.is_correct).count() as u32;
        Self {
            date,
            scope: session.scope().label().to_string(),
            mode: session.mode(),
            score,
            total_questions: session.total() as u32,
            details,
            corrupt_details: false,
        }
    }
}

/// Serializes `None` as the literal "unanswered" string the result sheet
/// uses, and reads that marker (or null, from legacy rows) back as `None`.
mod unanswered_sentinel {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::UNANSWERED;

    pub fn serialize<S: Serializer>(
        value: &Option<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(answer) => serializer.serialize_str(answer),
            None => serializer.serialize_str(UNANSWERED),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|s| s != UNANSWERED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user_answer: Option<&str>, is_correct: bool) -> AnswerRecord {
        AnswerRecord {
            question_text: "Burn Rate".to_string(),
            correct_answer: "Cash spend velocity".to_string(),
            user_answer: user_answer.map(|s| s.to_string()),
            is_correct,
            term_id: 1,
            term: "Burn Rate".to_string(),
            definition: "Cash spend velocity".to_string(),
            example: String::new(),
        }
    }

    #[test]
    fn unanswered_serializes_as_sentinel() {
        let json = serde_json::to_string(&record(None, false)).unwrap();
        assert!(json.contains("\"user_answer\":\"unanswered\""));
        let back: AnswerRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.user_answer, None);
    }

    #[test]
    fn answered_round_trips() {
        let json = serde_json::to_string(&record(Some("Months of cash left"), false)).unwrap();
        let back: AnswerRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.user_answer.as_deref(), Some("Months of cash left"));
    }

    #[test]
    fn legacy_field_names_still_parse() {
        let json = r#"{
            "question_text": "Burn Rate",
            "correct_answer": "Cash spend velocity",
            "user_answer": "unanswered",
            "is_correct": false,
            "term_id": 1,
            "term_name": "Burn Rate",
            "term_definition": "Cash spend velocity",
            "term_example": ""
        }"#;
        let back: AnswerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(back.term, "Burn Rate");
        assert_eq!(back.user_answer, None);
    }
}
