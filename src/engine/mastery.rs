use serde::{Deserialize, Serialize};

/// Per-term learning progress. Every new term starts at `NotStarted`;
/// there is no terminal state, progress moves in both directions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mastery {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    Learning,
    Mastered,
}

pub const ALL_MASTERY: [Mastery; 3] = [Mastery::NotStarted, Mastery::Learning, Mastery::Mastered];

impl Mastery {
    /// Label as stored in the spreadsheet's Mastery column.
    pub fn label(self) -> &'static str {
        match self {
            Mastery::NotStarted => "Not Started",
            Mastery::Learning => "Learning",
            Mastery::Mastered => "Mastered",
        }
    }

    /// Lenient inverse of `label`. Blank or unknown labels (legacy rows,
    /// hand-edited sheets) fall back to `NotStarted`.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Learning" => Mastery::Learning,
            "Mastered" => Mastery::Mastered,
            _ => Mastery::NotStarted,
        }
    }

    /// Transition applied once per graded answer: a correct answer promotes
    /// by one level, an incorrect answer demotes by one level, and the
    /// endpoints absorb transitions that would overshoot.
    pub fn after_answer(self, correct: bool) -> Self {
        if correct { self.promoted() } else { self.demoted() }
    }

    pub fn promoted(self) -> Self {
        match self {
            Mastery::NotStarted => Mastery::Learning,
            Mastery::Learning | Mastery::Mastered => Mastery::Mastered,
        }
    }

    pub fn demoted(self) -> Self {
        match self {
            Mastery::NotStarted | Mastery::Learning => Mastery::NotStarted,
            Mastery::Mastered => Mastery::Learning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table_is_total_and_exact() {
        use Mastery::*;
        let expected = [
            (NotStarted, true, Learning),
            (NotStarted, false, NotStarted),
            (Learning, true, Mastered),
            (Learning, false, NotStarted),
            (Mastered, true, Mastered),
            (Mastered, false, Learning),
        ];
        for (state, correct, next) in expected {
            assert_eq!(state.after_answer(correct), next, "{state:?} / correct={correct}");
        }
    }

    #[test]
    fn transitions_never_skip_states() {
        for state in ALL_MASTERY {
            for correct in [true, false] {
                let next = state.after_answer(correct);
                let distance =
                    (ALL_MASTERY.iter().position(|m| *m == next).unwrap() as i64
                        - ALL_MASTERY.iter().position(|m| *m == state).unwrap() as i64)
                        .abs();
                assert!(distance <= 1, "{state:?} jumped to {next:?}");
            }
        }
    }

    #[test]
    fn two_corrects_then_incorrect() {
        let mut m = Mastery::NotStarted;
        m = m.after_answer(true);
        assert_eq!(m, Mastery::Learning);
        m = m.after_answer(true);
        assert_eq!(m, Mastery::Mastered);
        m = m.after_answer(false);
        assert_eq!(m, Mastery::Learning);
    }

    #[test]
    fn label_round_trip_and_legacy_fallback() {
        for m in ALL_MASTERY {
            assert_eq!(Mastery::from_label(m.label()), m);
        }
        assert_eq!(Mastery::from_label(""), Mastery::NotStarted);
        assert_eq!(Mastery::from_label("  Mastered "), Mastery::Mastered);
        assert_eq!(Mastery::from_label("In Progress"), Mastery::NotStarted);
    }

    #[test]
    fn sheet_labels_survive_serde() {
        let json = serde_json::to_string(&Mastery::NotStarted).unwrap();
        assert_eq!(json, "\"Not Started\"");
        let back: Mastery = serde_json::from_str("\"Not Started\"").unwrap();
        assert_eq!(back, Mastery::NotStarted);
    }
}
