use crate::engine::mastery::Mastery;
use crate::engine::repository::Term;

/// Combined browse/review filter. All set criteria must match (AND).
#[derive(Clone, Debug, Default)]
pub struct TermFilter {
    pub category: Option<String>,
    pub mastery: Option<Mastery>,
    pub search: String,
}

impl TermFilter {
    pub fn matches(&self, term: &Term) -> bool {
        if let Some(ref category) = self.category {
            if term.category != *category {
                return false;
            }
        }
        if let Some(mastery) = self.mastery {
            if term.mastery != mastery {
                return false;
            }
        }
        let needle = self.search.trim();
        if needle.is_empty() {
            return true;
        }
        let needle = needle.to_lowercase();
        [&term.term, &term.definition, &term.category, &term.example]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(name: &str, definition: &str, example: &str, category: &str) -> Term {
        Term {
            id: 1,
            term: name.to_string(),
            definition: definition.to_string(),
            example: example.to_string(),
            category: category.to_string(),
            mastery: Mastery::NotStarted,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = TermFilter::default();
        assert!(filter.matches(&term("Burn Rate", "Cash spend velocity", "", "Finance")));
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let t = term("Burn Rate", "Cash spend velocity", "High burn rate this quarter", "Finance");
        for needle in ["burn", "VELOCITY", "finance", "quarter"] {
            let filter = TermFilter { search: needle.to_string(), ..Default::default() };
            assert!(filter.matches(&t), "search {needle:?} should match");
        }
        let filter = TermFilter { search: "runway".to_string(), ..Default::default() };
        assert!(!filter.matches(&t));
    }

    #[test]
    fn criteria_combine_with_and_semantics() {
        let t = term("Burn Rate", "Cash spend velocity", "", "Finance");
        let filter = TermFilter {
            category: Some("Finance".to_string()),
            mastery: Some(Mastery::Learning),
            search: String::new(),
        };
        assert!(!filter.matches(&t), "category matches but mastery does not");
    }
}
