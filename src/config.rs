use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Web app endpoint of the spreadsheet store. Empty means not set up
    /// yet; the app starts but every store operation reports the problem.
    #[serde(default)]
    pub store_url: String,
    #[serde(default)]
    pub api_key: String,
    /// Display name, used only to namespace the storage collections.
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Review mode: paging forward from a card applies the correct-answer
    /// mastery transition. Off by default; viewing is not answering.
    #[serde(default)]
    pub review_auto_advance: bool,
    /// Quitting a quiz mid-session finalizes it with unanswered markers
    /// instead of discarding it.
    #[serde(default)]
    pub persist_abandoned_quizzes: bool,
}

fn default_username() -> String {
    "learner".to_string()
}
fn default_question_count() -> usize {
    10
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_url: String::new(),
            api_key: String::new(),
            username: default_username(),
            question_count: default_question_count(),
            theme: default_theme(),
            review_auto_advance: false,
            persist_abandoned_quizzes: false,
        }
    }
}

pub const QUESTION_COUNT_CHOICES: [usize; 4] = [5, 10, 15, 20];

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vocadrill")
            .join("config.toml")
    }

    /// Clamp out-of-range values after deserialization. Hand-edited configs
    /// with a zero or enormous question count get the nearest sane value.
    pub fn normalize(&mut self) {
        if self.question_count == 0 {
            self.question_count = default_question_count();
        }
        self.question_count = self.question_count.min(50);
        if self.username.trim().is_empty() {
            self.username = default_username();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_file_gets_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.username, "learner");
        assert_eq!(config.question_count, 10);
        assert_eq!(config.theme, "catppuccin-mocha");
        assert!(!config.review_auto_advance);
        assert!(!config.persist_abandoned_quizzes);
        assert!(config.store_url.is_empty());
    }

    #[test]
    fn partial_config_keeps_given_fields() {
        let toml_str = r#"
store_url = "https://script.example/exec"
username = "jane"
question_count = 15
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.store_url, "https://script.example/exec");
        assert_eq!(config.username, "jane");
        assert_eq!(config.question_count, 15);
        assert_eq!(config.theme, "catppuccin-mocha");
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut config = Config::default();
        config.store_url = "https://script.example/exec".to_string();
        config.persist_abandoned_quizzes = true;
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.store_url, deserialized.store_url);
        assert_eq!(config.persist_abandoned_quizzes, deserialized.persist_abandoned_quizzes);
    }

    #[test]
    fn normalize_repairs_bad_values() {
        let mut config = Config::default();
        config.question_count = 0;
        config.username = "   ".to_string();
        config.normalize();
        assert_eq!(config.question_count, 10);
        assert_eq!(config.username, "learner");

        config.question_count = 500;
        config.normalize();
        assert_eq!(config.question_count, 50);
    }
}
