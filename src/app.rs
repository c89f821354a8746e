use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Utc;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::{Config, QUESTION_COUNT_CHOICES};
use crate::engine::filter::TermFilter;
use crate::engine::mastery::{ALL_MASTERY, Mastery};
use crate::engine::repository::{Term, TermRepository};
use crate::error::StoreError;
use crate::generator::{QuizMode, QuizScope};
use crate::session::quiz::QuizSession;
use crate::session::result::QuizResult;
use crate::store::VocabStore;
use crate::store::sheet_store::SheetStore;
use crate::store::transfer;
use crate::ui::components::menu::Menu;
use crate::ui::components::status_bar::StatusLevel;
use crate::ui::components::term_form::TermForm;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

const STATUS_TTL: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Browse,
    Review,
    QuizSetup,
    Quiz,
    QuizSummary,
    TermEditor,
    History,
    Settings,
}

pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    raised_at: Instant,
}

/// File operations reachable from the history screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferKind {
    ExportTermsCsv,
    ExportResultsCsv,
    ImportTermsCsv,
    ExportJson,
    ImportJson,
}

impl TransferKind {
    pub fn prompt_label(self) -> &'static str {
        match self {
            TransferKind::ExportTermsCsv => "Export terms CSV to",
            TransferKind::ExportResultsCsv => "Export results CSV to",
            TransferKind::ImportTermsCsv => "Import terms CSV from",
            TransferKind::ExportJson => "Export JSON backup to",
            TransferKind::ImportJson => "Import JSON backup from",
        }
    }

    fn default_filename(self, username: &str) -> String {
        match self {
            TransferKind::ExportTermsCsv => format!("{username}_terms.csv"),
            TransferKind::ExportResultsCsv => format!("{username}_results.csv"),
            TransferKind::ImportTermsCsv => "terms.csv".to_string(),
            TransferKind::ExportJson => format!("{username}_vocadrill.json"),
            TransferKind::ImportJson => "vocadrill.json".to_string(),
        }
    }
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: &'static Theme,
    pub menu: Menu<'static>,
    pub store: Option<SheetStore>,
    pub repo: TermRepository,
    pub results: Vec<QuizResult>,
    pub session: Option<QuizSession>,
    pub summary: Option<QuizResult>,

    // Browse screen
    pub browse_filter: TermFilter,
    pub browse_selected: usize,
    pub browse_detail: bool,
    pub search_input: Option<LineInput>,
    pub delete_confirm: Option<u64>,

    // Review screen
    pub review_filter: TermFilter,
    pub review_index: usize,
    pub review_revealed: bool,

    // Quiz setup screen
    pub setup_selected: usize,
    pub setup_mode: QuizMode,
    pub setup_scope_index: usize,
    pub setup_count_index: usize,

    // Live quiz
    pub choice_selected: usize,

    // Term editor
    pub form: Option<TermForm>,

    // History screen
    pub history_selected: usize,
    pub history_expanded: bool,
    pub history_confirm_delete: bool,
    pub path_prompt: Option<(TransferKind, LineInput)>,

    pub settings_selected: usize,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let menu = Menu::new(theme);

        let store = if config.store_url.trim().is_empty() {
            None
        } else {
            SheetStore::new(&config.store_url, &config.api_key, &config.username).ok()
        };

        let mut app = Self {
            screen: AppScreen::Menu,
            config,
            theme,
            menu,
            store,
            repo: TermRepository::default(),
            results: Vec::new(),
            session: None,
            summary: None,
            browse_filter: TermFilter::default(),
            browse_selected: 0,
            browse_detail: false,
            search_input: None,
            delete_confirm: None,
            review_filter: TermFilter::default(),
            review_index: 0,
            review_revealed: false,
            setup_selected: 0,
            setup_mode: QuizMode::TermToDefinition,
            setup_scope_index: 0,
            setup_count_index: 1,
            choice_selected: 0,
            form: None,
            history_selected: 0,
            history_expanded: false,
            history_confirm_delete: false,
            path_prompt: None,
            settings_selected: 0,
            status: None,
            should_quit: false,
            rng: SmallRng::from_entropy(),
        };

        if app.store.is_some() {
            app.reload();
        } else {
            app.set_status(
                StatusLevel::Warning,
                "No store configured. Set store_url in the config file or pass --store-url.",
            );
        }
        app
    }

    // ---- status ----

    pub fn set_status(&mut self, level: StatusLevel, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            raised_at: Instant::now(),
        });
    }

    /// Called on the event heartbeat; old messages age out.
    pub fn tick(&mut self) {
        if let Some(status) = &self.status {
            if status.raised_at.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }
    }

    // ---- store round-trips ----

    /// Replace in-memory state from the store. Each collection loads
    /// independently; a failure leaves the previous state in place.
    pub fn reload(&mut self) {
        let Some(store) = &self.store else {
            self.set_status(StatusLevel::Error, "No store configured.");
            return;
        };
        match TermRepository::load(store) {
            Ok(repo) => self.repo = repo,
            Err(e) => {
                self.set_status(StatusLevel::Error, format!("Loading terms failed: {e}"));
                return;
            }
        }
        match store.load_results() {
            Ok(results) => {
                self.results = results.unwrap_or_default();
                let corrupt = self.results.iter().filter(|r| r.corrupt_details).count();
                if corrupt > 0 {
                    self.set_status(
                        StatusLevel::Warning,
                        format!("{corrupt} result(s) had unreadable details; showing them empty."),
                    );
                }
            }
            Err(e) => {
                self.set_status(StatusLevel::Error, format!("Loading results failed: {e}"));
            }
        }
    }

    fn write_terms(&self) -> Result<(), String> {
        match &self.store {
            None => Err("no store configured".to_string()),
            Some(store) => self.repo.persist(store).map_err(|e: StoreError| e.to_string()),
        }
    }

    fn write_results(&self) -> Result<(), String> {
        match &self.store {
            None => Err("no store configured".to_string()),
            Some(store) => store.save_results(&self.results).map_err(|e| e.to_string()),
        }
    }

    /// Write the term collection through and report failure. In-memory
    /// state is intentionally kept either way.
    fn persist_terms_with_status(&mut self, success_message: &str) {
        match self.write_terms() {
            Ok(()) => self.set_status(StatusLevel::Success, success_message.to_string()),
            Err(e) => self.set_status(
                StatusLevel::Error,
                format!("{success_message} Saving to the store failed: {e}"),
            ),
        }
    }

    // ---- navigation ----

    pub fn go_to_menu(&mut self) {
        self.screen = AppScreen::Menu;
    }

    pub fn go_to_browse(&mut self) {
        self.browse_selected = 0;
        self.browse_detail = false;
        self.screen = AppScreen::Browse;
    }

    pub fn go_to_review(&mut self) {
        self.review_index = 0;
        self.review_revealed = false;
        self.screen = AppScreen::Review;
    }

    pub fn go_to_quiz_setup(&mut self) {
        self.setup_selected = 0;
        self.screen = AppScreen::QuizSetup;
    }

    pub fn go_to_history(&mut self) {
        self.history_selected = 0;
        self.history_expanded = false;
        self.history_confirm_delete = false;
        self.screen = AppScreen::History;
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    // ---- browse ----

    pub fn browse_terms(&self) -> Vec<Term> {
        self.repo.query(&self.browse_filter)
    }

    pub fn browse_cycle_category(&mut self, forward: bool) {
        self.browse_filter.category =
            cycle_category(&self.repo.categories(), &self.browse_filter.category, forward);
        self.browse_selected = 0;
    }

    pub fn browse_cycle_mastery(&mut self) {
        self.browse_filter.mastery = cycle_mastery(self.browse_filter.mastery);
        self.browse_selected = 0;
    }

    pub fn request_delete(&mut self, id: u64) {
        self.delete_confirm = Some(id);
    }

    pub fn confirm_delete(&mut self) {
        let Some(id) = self.delete_confirm.take() else {
            return;
        };
        let name = self.repo.get(id).map(|t| t.term.clone()).unwrap_or_default();
        self.repo.delete(id);
        let len = self.browse_terms().len();
        self.browse_selected = self.browse_selected.min(len.saturating_sub(1));
        self.persist_terms_with_status(&format!("Deleted '{name}'."));
    }

    // ---- review ----

    pub fn review_terms(&self) -> Vec<Term> {
        self.repo.query(&self.review_filter)
    }

    pub fn review_cycle_category(&mut self, forward: bool) {
        self.review_filter.category =
            cycle_category(&self.repo.categories(), &self.review_filter.category, forward);
        self.review_index = 0;
        self.review_revealed = false;
    }

    pub fn review_cycle_mastery_filter(&mut self) {
        self.review_filter.mastery = cycle_mastery(self.review_filter.mastery);
        self.review_index = 0;
        self.review_revealed = false;
    }

    /// Page forward. With `review_auto_advance` on, leaving a card counts
    /// as one correct pass for that term.
    pub fn review_next(&mut self) {
        let terms = self.review_terms();
        if terms.is_empty() {
            return;
        }
        if self.config.review_auto_advance {
            if let Some(term) = terms.get(self.review_index) {
                let next = term.mastery.after_answer(true);
                if next != term.mastery && self.repo.set_mastery(term.id, next) {
                    if let Err(e) = self.write_terms() {
                        self.set_status(StatusLevel::Error, format!("Saving progress failed: {e}"));
                    }
                }
            }
        }
        if self.review_index + 1 < terms.len() {
            self.review_index += 1;
            self.review_revealed = false;
        }
    }

    pub fn review_prev(&mut self) {
        if self.review_index > 0 {
            self.review_index -= 1;
            self.review_revealed = false;
        }
    }

    pub fn review_random(&mut self) {
        let len = self.review_terms().len();
        if len > 0 {
            self.review_index = self.rng.gen_range(0..len);
            self.review_revealed = false;
        }
    }

    /// Explicit mastery override from the review card.
    pub fn review_set_mastery(&mut self, mastery: Mastery) {
        let terms = self.review_terms();
        let Some(term) = terms.get(self.review_index) else {
            return;
        };
        if self.repo.set_mastery(term.id, mastery) {
            self.persist_terms_with_status(&format!("'{}' set to {}.", term.term, mastery.label()));
        }
    }

    // ---- quiz ----

    pub fn scope_options(&self) -> Vec<QuizScope> {
        let mut options = vec![QuizScope::All];
        options.extend(self.repo.categories().into_iter().map(QuizScope::Category));
        options
    }

    pub fn selected_scope(&self) -> QuizScope {
        self.scope_options()
            .get(self.setup_scope_index)
            .cloned()
            .unwrap_or(QuizScope::All)
    }

    pub fn selected_count(&self) -> usize {
        QUESTION_COUNT_CHOICES
            .get(self.setup_count_index)
            .copied()
            .unwrap_or(self.config.question_count)
    }

    pub fn start_quiz(&mut self) {
        // Starting over on top of a paused session discards it cleanly.
        if let Some(old) = self.session.take() {
            old.rollback_mastery(&mut self.repo);
        }
        let scope = self.selected_scope();
        let count = self.selected_count();
        match QuizSession::start(&self.repo, self.setup_mode, scope, count, &mut self.rng) {
            Ok(session) => {
                self.session = Some(session);
                self.choice_selected = 0;
                self.screen = AppScreen::Quiz;
            }
            Err(e) => {
                self.set_status(
                    StatusLevel::Error,
                    format!("{e}. Adjust scope or mode, or add more terms."),
                );
            }
        }
    }

    pub fn resume_quiz(&mut self) {
        if self.session.is_some() {
            self.screen = AppScreen::Quiz;
        }
    }

    pub fn pause_quiz(&mut self) {
        if self.session.is_some() {
            self.set_status(StatusLevel::Info, "Quiz paused; resume it from the quiz screen.");
            self.screen = AppScreen::Menu;
        }
    }

    pub fn answer_current(&mut self) {
        let complete = {
            let Some(session) = self.session.as_mut() else {
                return;
            };
            let Some(question) = session.current_question() else {
                return;
            };
            let Some(choice) = question.choices.get(self.choice_selected).cloned() else {
                return;
            };
            session.answer(&mut self.repo, &choice);
            session.is_complete()
        };
        self.choice_selected = 0;
        if complete {
            self.finish_quiz();
        }
    }

    /// Close out the session: shape the result, then run the two store
    /// writes independently. One failing never blocks or rolls back the
    /// other; the status line names whichever parts failed.
    pub fn finish_quiz(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let result = QuizResult::from_session(&session, Utc::now());
        self.results.insert(0, result.clone());

        let results_err = self.write_results().err();
        let terms_err = self.write_terms().err();
        match (&results_err, &terms_err) {
            (None, None) => {
                self.set_status(StatusLevel::Success, "Result saved and progress updated.")
            }
            (Some(e), None) => {
                self.set_status(StatusLevel::Error, format!("Saving the result failed: {e}"))
            }
            (None, Some(e)) => {
                self.set_status(StatusLevel::Error, format!("Saving progress failed: {e}"))
            }
            (Some(re), Some(te)) => self.set_status(
                StatusLevel::Error,
                format!("Saving the result failed: {re}. Saving progress failed: {te}"),
            ),
        }

        self.summary = Some(result);
        self.screen = AppScreen::QuizSummary;
    }

    /// Quit mid-session. Default is a full discard: the partial result is
    /// dropped and every mastery transition is rolled back. The
    /// `persist_abandoned_quizzes` option finalizes instead, recording the
    /// open questions as unanswered.
    pub fn abandon_quiz(&mut self) {
        if self.config.persist_abandoned_quizzes && self.session.is_some() {
            self.finish_quiz();
            return;
        }
        let Some(session) = self.session.take() else {
            return;
        };
        session.rollback_mastery(&mut self.repo);
        self.set_status(StatusLevel::Info, "Quiz abandoned; nothing was recorded.");
        self.screen = AppScreen::QuizSetup;
    }

    pub fn acknowledge_summary(&mut self) {
        self.summary = None;
        self.screen = AppScreen::QuizSetup;
    }

    // ---- term editor ----

    pub fn open_add_form(&mut self) {
        self.form = Some(TermForm::new_add(self.repo.categories()));
        self.screen = AppScreen::TermEditor;
    }

    pub fn open_edit_form(&mut self, id: u64) {
        if let Some(term) = self.repo.get(id) {
            self.form = Some(TermForm::new_edit(term, self.repo.categories()));
            self.screen = AppScreen::TermEditor;
        }
    }

    pub fn submit_form(&mut self) {
        let Some(form) = &self.form else {
            return;
        };
        let (term, definition, example, category) = form.values();
        let (term, definition, example, category) = (
            term.to_string(),
            definition.to_string(),
            example.to_string(),
            category.to_string(),
        );
        let editing = form.editing;
        let mastery = form.mastery;

        match editing {
            None => match self.repo.add(&term, &definition, &example, &category) {
                Ok(added) => {
                    let name = added.term.clone();
                    self.persist_terms_with_status(&format!("Added '{name}'."));
                    // Keep the screen open for quick successive entry.
                    self.form = Some(TermForm::new_add(self.repo.categories()));
                }
                Err(e) => self.set_status(StatusLevel::Error, e.to_string()),
            },
            Some(id) => {
                match self.repo.update(id, &term, &definition, &example, &category, mastery) {
                    Ok(()) => {
                        self.persist_terms_with_status(&format!("Updated '{term}'."));
                        self.form = None;
                        self.screen = AppScreen::Browse;
                    }
                    Err(e) => self.set_status(StatusLevel::Error, e.to_string()),
                }
            }
        }
    }

    pub fn cancel_form(&mut self) {
        let was_edit = self.form.as_ref().is_some_and(|f| f.editing.is_some());
        self.form = None;
        self.screen = if was_edit { AppScreen::Browse } else { AppScreen::Menu };
    }

    // ---- history & data ----

    pub fn delete_selected_result(&mut self) {
        if self.history_selected < self.results.len() {
            self.results.remove(self.history_selected);
            self.history_selected =
                self.history_selected.min(self.results.len().saturating_sub(1));
            match self.write_results() {
                Ok(()) => self.set_status(StatusLevel::Success, "Result deleted."),
                Err(e) => {
                    self.set_status(StatusLevel::Error, format!("Deleting from the store failed: {e}"))
                }
            }
        }
    }

    pub fn begin_path_prompt(&mut self, kind: TransferKind) {
        let default = kind.default_filename(&self.config.username);
        self.path_prompt = Some((kind, LineInput::new(&default)));
    }

    pub fn complete_path_prompt(&mut self) {
        let Some((kind, input)) = self.path_prompt.take() else {
            return;
        };
        let path = PathBuf::from(input.value());
        match kind {
            TransferKind::ExportTermsCsv => {
                match transfer::export_terms_csv(&path, self.repo.terms()) {
                    Ok(()) => self.set_status(
                        StatusLevel::Success,
                        format!("Exported {} terms to {}.", self.repo.len(), path.display()),
                    ),
                    Err(e) => self.set_status(StatusLevel::Error, format!("Export failed: {e}")),
                }
            }
            TransferKind::ExportResultsCsv => {
                match transfer::export_results_csv(&path, &self.results) {
                    Ok(()) => self.set_status(
                        StatusLevel::Success,
                        format!("Exported {} results to {}.", self.results.len(), path.display()),
                    ),
                    Err(e) => self.set_status(StatusLevel::Error, format!("Export failed: {e}")),
                }
            }
            TransferKind::ExportJson => {
                match transfer::export_json(&path, self.repo.terms(), &self.results) {
                    Ok(()) => self
                        .set_status(StatusLevel::Success, format!("Exported to {}.", path.display())),
                    Err(e) => self.set_status(StatusLevel::Error, format!("Export failed: {e}")),
                }
            }
            TransferKind::ImportTermsCsv => self.import_terms_csv(&path),
            TransferKind::ImportJson => self.import_json(&path),
        }
    }

    /// Replace the collection with a CSV, but only if every row passes the
    /// same validation as the editor form. Ids are reassigned from 1.
    fn import_terms_csv(&mut self, path: &std::path::Path) {
        let rows = match transfer::import_terms_csv(path) {
            Ok(rows) => rows,
            Err(e) => {
                self.set_status(StatusLevel::Error, format!("Import failed: {e}"));
                return;
            }
        };
        let mut imported = TermRepository::default();
        for (index, row) in rows.iter().enumerate() {
            let id = match imported.add(&row.term, &row.definition, &row.example, &row.category) {
                Ok(term) => term.id,
                Err(e) => {
                    self.set_status(
                        StatusLevel::Error,
                        format!("Import failed at row {}: {e}", index + 2),
                    );
                    return;
                }
            };
            if !row.mastery.trim().is_empty() {
                imported.set_mastery(id, Mastery::from_label(&row.mastery));
            }
        }
        let count = imported.len();
        self.repo = imported;
        self.persist_terms_with_status(&format!("Imported {count} terms."));
    }

    fn import_json(&mut self, path: &std::path::Path) {
        match transfer::import_json(path) {
            Ok(data) => {
                self.repo = TermRepository::from_terms(data.terms);
                self.results = data.results;
                let terms_err = self.write_terms().err();
                let results_err = self.write_results().err();
                match (terms_err, results_err) {
                    (None, None) => self.set_status(
                        StatusLevel::Success,
                        format!("Imported {} terms and {} results.", self.repo.len(), self.results.len()),
                    ),
                    (te, re) => {
                        let problem = te.or(re).unwrap_or_default();
                        self.set_status(
                            StatusLevel::Error,
                            format!("Imported locally, but saving failed: {problem}"),
                        );
                    }
                }
            }
            Err(e) => self.set_status(StatusLevel::Error, format!("Import failed: {e}")),
        }
    }

    // ---- settings ----

    pub fn settings_cycle(&mut self, forward: bool) {
        match self.settings_selected {
            0 => {
                let current = QUESTION_COUNT_CHOICES
                    .iter()
                    .position(|&c| c == self.config.question_count)
                    .unwrap_or(0);
                let next = cycle_index(current, QUESTION_COUNT_CHOICES.len(), forward);
                self.config.question_count = QUESTION_COUNT_CHOICES[next];
                self.setup_count_index = next;
            }
            1 => {
                let mut themes = Theme::available_themes();
                themes.sort();
                if themes.is_empty() {
                    return;
                }
                let current =
                    themes.iter().position(|t| *t == self.config.theme).unwrap_or(0);
                let next = cycle_index(current, themes.len(), forward);
                self.config.theme = themes[next].clone();
                if let Some(theme) = Theme::load(&self.config.theme) {
                    let theme: &'static Theme = Box::leak(Box::new(theme));
                    self.theme = theme;
                    self.menu.theme = theme;
                }
            }
            2 => self.config.review_auto_advance = !self.config.review_auto_advance,
            3 => {
                self.config.persist_abandoned_quizzes = !self.config.persist_abandoned_quizzes
            }
            _ => {}
        }
    }
}

fn cycle_index(current: usize, len: usize, forward: bool) -> usize {
    if forward {
        (current + 1) % len
    } else if current == 0 {
        len - 1
    } else {
        current - 1
    }
}

/// Cycle None -> first category -> ... -> last -> None.
fn cycle_category(
    categories: &[String],
    current: &Option<String>,
    forward: bool,
) -> Option<String> {
    let count = categories.len() + 1;
    let position = match current {
        None => 0,
        Some(category) => {
            categories.iter().position(|c| c == category).map(|i| i + 1).unwrap_or(0)
        }
    };
    let next = cycle_index(position, count, forward);
    if next == 0 { None } else { Some(categories[next - 1].clone()) }
}

fn cycle_mastery(current: Option<Mastery>) -> Option<Mastery> {
    match current {
        None => Some(ALL_MASTERY[0]),
        Some(mastery) => {
            let position = ALL_MASTERY.iter().position(|m| *m == mastery).unwrap_or(0);
            if position + 1 < ALL_MASTERY.len() {
                Some(ALL_MASTERY[position + 1])
            } else {
                None
            }
        }
    }
}
