mod app;
mod config;
mod engine;
mod error;
mod event;
mod generator;
mod session;
mod store;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use app::{App, AppScreen, TransferKind};
use config::{Config, QUESTION_COUNT_CHOICES};
use event::{AppEvent, EventHandler};
use generator::QuizMode;
use ui::components::flashcard::Flashcard;
use ui::components::history::HistoryList;
use ui::components::quiz_panel::QuizPanel;
use ui::components::score_summary::ScoreSummary;
use ui::components::status_bar::StatusBar;
use ui::components::term_form::{FormResult, TermFormView};
use ui::components::term_table::{TermDetail, TermTable};
use ui::layout::AppLayout;
use ui::line_input::InputResult;

#[derive(Parser)]
#[command(
    name = "vocadrill",
    version,
    about = "Terminal vocabulary trainer with quiz-based mastery tracking"
)]
struct Cli {
    #[arg(short, long, help = "Display name used to namespace your collections")]
    user: Option<String>,

    #[arg(long, help = "Spreadsheet web app endpoint URL")]
    store_url: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Questions per quiz")]
    questions: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(user) = cli.user {
        config.username = user;
    }
    if let Some(url) = cli.store_url {
        config.store_url = url;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(questions) = cli.questions {
        config.question_count = questions;
    }
    config.normalize();

    let mut app = App::new(config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(200));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.tick(),
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Browse => handle_browse_key(app, key),
        AppScreen::Review => handle_review_key(app, key),
        AppScreen::QuizSetup => handle_quiz_setup_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::QuizSummary => handle_summary_key(app, key),
        AppScreen::TermEditor => handle_editor_key(app, key),
        AppScreen::History => handle_history_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('b') => app.go_to_browse(),
        KeyCode::Char('r') => app.go_to_review(),
        KeyCode::Char('t') => app.go_to_quiz_setup(),
        KeyCode::Char('a') => app.open_add_form(),
        KeyCode::Char('d') => app.go_to_history(),
        KeyCode::Char('c') => app.go_to_settings(),
        KeyCode::Char('g') => {
            app.reload();
        }
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => match app.menu.selected {
            0 => app.go_to_browse(),
            1 => app.go_to_review(),
            2 => app.go_to_quiz_setup(),
            3 => app.open_add_form(),
            4 => app.go_to_history(),
            5 => app.go_to_settings(),
            _ => {}
        },
        _ => {}
    }
}

fn handle_browse_key(app: &mut App, key: KeyEvent) {
    // Active search input captures everything first
    if let Some(input) = app.search_input.as_mut() {
        match input.handle(key) {
            InputResult::Submit => {
                app.browse_filter.search = input.value().to_string();
                app.search_input = None;
                app.browse_selected = 0;
            }
            InputResult::Cancel => {
                app.search_input = None;
            }
            InputResult::Continue => {}
        }
        return;
    }

    // Pending delete confirmation takes priority
    if app.delete_confirm.is_some() {
        match key.code {
            KeyCode::Char('y') => app.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Esc => app.delete_confirm = None,
            _ => {}
        }
        return;
    }

    let terms = app.browse_terms();
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Down | KeyCode::Char('j') => {
            if !terms.is_empty() {
                app.browse_selected = (app.browse_selected + 1).min(terms.len() - 1);
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.browse_selected = app.browse_selected.saturating_sub(1);
        }
        KeyCode::Char('/') => {
            app.search_input =
                Some(ui::line_input::LineInput::new(&app.browse_filter.search));
        }
        KeyCode::Char('c') => app.browse_cycle_category(true),
        KeyCode::Char('C') => app.browse_cycle_category(false),
        KeyCode::Char('m') => app.browse_cycle_mastery(),
        KeyCode::Enter | KeyCode::Char(' ') => app.browse_detail = !app.browse_detail,
        KeyCode::Char('e') => {
            if let Some(term) = terms.get(app.browse_selected) {
                app.open_edit_form(term.id);
            }
        }
        KeyCode::Char('a') => app.open_add_form(),
        KeyCode::Char('x') | KeyCode::Delete => {
            if let Some(term) = terms.get(app.browse_selected) {
                app.request_delete(term.id);
            }
        }
        _ => {}
    }
}

fn handle_review_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Left | KeyCode::Char('h') => app.review_prev(),
        KeyCode::Right | KeyCode::Char('l') => app.review_next(),
        KeyCode::Char('r') => app.review_random(),
        KeyCode::Char(' ') => app.review_revealed = !app.review_revealed,
        KeyCode::Char('c') => app.review_cycle_category(true),
        KeyCode::Char('C') => app.review_cycle_category(false),
        KeyCode::Char('m') => app.review_cycle_mastery_filter(),
        KeyCode::Char('1') => app.review_set_mastery(engine::mastery::Mastery::NotStarted),
        KeyCode::Char('2') => app.review_set_mastery(engine::mastery::Mastery::Learning),
        KeyCode::Char('3') => app.review_set_mastery(engine::mastery::Mastery::Mastered),
        _ => {}
    }
}

fn handle_quiz_setup_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Up | KeyCode::Char('k') => {
            app.setup_selected = app.setup_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.setup_selected = (app.setup_selected + 1).min(2);
        }
        KeyCode::Left | KeyCode::Char('h') => cycle_setup_value(app, false),
        KeyCode::Right | KeyCode::Char('l') => cycle_setup_value(app, true),
        KeyCode::Enter | KeyCode::Char('s') => app.start_quiz(),
        KeyCode::Char('R') => app.resume_quiz(),
        _ => {}
    }
}

fn cycle_setup_value(app: &mut App, forward: bool) {
    match app.setup_selected {
        0 => {
            app.setup_mode = match app.setup_mode {
                QuizMode::TermToDefinition => QuizMode::ExampleToTerm,
                QuizMode::ExampleToTerm => QuizMode::TermToDefinition,
            };
        }
        1 => {
            let count = app.scope_options().len();
            if count > 0 {
                app.setup_scope_index = if forward {
                    (app.setup_scope_index + 1) % count
                } else if app.setup_scope_index == 0 {
                    count - 1
                } else {
                    app.setup_scope_index - 1
                };
            }
        }
        2 => {
            let count = QUESTION_COUNT_CHOICES.len();
            app.setup_count_index = if forward {
                (app.setup_count_index + 1) % count
            } else if app.setup_count_index == 0 {
                count - 1
            } else {
                app.setup_count_index - 1
            };
        }
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    let choice_count = app
        .session
        .as_ref()
        .and_then(|s| s.current_question())
        .map(|q| q.choices.len())
        .unwrap_or(0);

    match key.code {
        KeyCode::Esc => app.pause_quiz(),
        KeyCode::Char('x') => app.abandon_quiz(),
        KeyCode::Down | KeyCode::Char('j') => {
            if choice_count > 0 {
                app.choice_selected = (app.choice_selected + 1) % choice_count;
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if choice_count > 0 {
                app.choice_selected = if app.choice_selected == 0 {
                    choice_count - 1
                } else {
                    app.choice_selected - 1
                };
            }
        }
        KeyCode::Enter => app.answer_current(),
        KeyCode::Char(ch @ '1'..='4') => {
            let index = ch as usize - '1' as usize;
            if index < choice_count {
                app.choice_selected = index;
                app.answer_current();
            }
        }
        _ => {}
    }
}

fn handle_summary_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => app.acknowledge_summary(),
        _ => {}
    }
}

fn handle_editor_key(app: &mut App, key: KeyEvent) {
    let Some(form) = app.form.as_mut() else {
        app.go_to_menu();
        return;
    };
    match form.handle(key) {
        FormResult::Submit => app.submit_form(),
        FormResult::Cancel => app.cancel_form(),
        FormResult::Continue => {}
    }
}

fn handle_history_key(app: &mut App, key: KeyEvent) {
    // Active path prompt captures everything first
    if let Some((_, input)) = app.path_prompt.as_mut() {
        match input.handle(key) {
            InputResult::Submit => app.complete_path_prompt(),
            InputResult::Cancel => app.path_prompt = None,
            InputResult::Continue => {}
        }
        return;
    }

    if app.history_confirm_delete {
        match key.code {
            KeyCode::Char('y') => {
                app.delete_selected_result();
                app.history_confirm_delete = false;
            }
            KeyCode::Char('n') | KeyCode::Esc => app.history_confirm_delete = false,
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Down | KeyCode::Char('j') => {
            if !app.results.is_empty() {
                app.history_selected =
                    (app.history_selected + 1).min(app.results.len() - 1);
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.history_selected = app.history_selected.saturating_sub(1);
        }
        KeyCode::Enter | KeyCode::Char(' ') => app.history_expanded = !app.history_expanded,
        KeyCode::Char('x') | KeyCode::Delete => {
            if !app.results.is_empty() {
                app.history_confirm_delete = true;
            }
        }
        KeyCode::Char('e') => app.begin_path_prompt(TransferKind::ExportTermsCsv),
        KeyCode::Char('E') => app.begin_path_prompt(TransferKind::ExportResultsCsv),
        KeyCode::Char('i') => app.begin_path_prompt(TransferKind::ImportTermsCsv),
        KeyCode::Char('J') => app.begin_path_prompt(TransferKind::ExportJson),
        KeyCode::Char('I') => app.begin_path_prompt(TransferKind::ImportJson),
        KeyCode::Char('g') => app.reload(),
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            let _ = app.config.save();
            app.go_to_menu();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.settings_selected = app.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.settings_selected = (app.settings_selected + 1).min(3);
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.settings_cycle(true),
        KeyCode::Left | KeyCode::Char('h') => app.settings_cycle(false),
        _ => {}
    }
}

// ---- rendering ----

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Browse => render_browse(frame, app),
        AppScreen::Review => render_review(frame, app),
        AppScreen::QuizSetup => render_quiz_setup(frame, app),
        AppScreen::Quiz => render_quiz(frame, app),
        AppScreen::QuizSummary => render_summary(frame, app),
        AppScreen::TermEditor => render_editor(frame, app),
        AppScreen::History => render_history(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect, info: String) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " vocadrill ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(&*info, Style::default().fg(colors.muted()).bg(colors.header_bg())),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: Rect, hints: &str) {
    let colors = &app.theme.colors;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let hint_line = Paragraph::new(Line::from(Span::styled(
        hints.to_string(),
        Style::default().fg(colors.muted()),
    )));
    frame.render_widget(hint_line, rows[0]);

    let message = app.status.as_ref().map(|s| (s.text.as_str(), s.level));
    frame.render_widget(StatusBar::new(message, app.theme), rows[1]);
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(area);

    let mastered = app
        .repo
        .terms()
        .iter()
        .filter(|t| t.mastery == engine::mastery::Mastery::Mastered)
        .count();
    let info = format!(
        " {} | {} terms | {} mastered | {} quizzes taken",
        app.config.username,
        app.repo.len(),
        mastered,
        app.results.len(),
    );
    render_header(frame, app, layout[0], info);

    let menu_area = ui::layout::centered_rect(50, 85, layout[1]);
    frame.render_widget(&app.menu, menu_area);

    render_footer(frame, app, layout[2], " [b/r/t/a/d/c] Go  [g] Reload  [q] Quit ");
}

fn render_browse(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::new(area);
    let colors = &app.theme.colors;

    let category = app.browse_filter.category.as_deref().unwrap_or("all");
    let mastery = app
        .browse_filter
        .mastery
        .map(|m| m.label())
        .unwrap_or("all");
    let info = if let Some(input) = &app.search_input {
        let (before, cursor, after) = input.render_parts();
        let cursor_text = cursor.map(|c| c.to_string()).unwrap_or_else(|| " ".to_string());
        format!(" Search: {before}[{cursor_text}]{after}")
    } else if app.browse_filter.search.trim().is_empty() {
        format!(" Browse | category: {category} | mastery: {mastery}")
    } else {
        format!(
            " Browse | category: {category} | mastery: {mastery} | search: {}",
            app.browse_filter.search
        )
    };
    render_header(frame, app, layout.header, info);

    let terms = app.browse_terms();
    let title = format!("Terms ({})", terms.len());
    frame.render_widget(
        TermTable::new(&terms, app.browse_selected, title, app.theme),
        layout.main,
    );

    let selected = terms.get(app.browse_selected);
    if let Some(term) = selected {
        if let Some(sidebar) = layout.sidebar {
            frame.render_widget(
                TermDetail::new(term, "Detail".to_string(), app.theme),
                sidebar,
            );
        } else if app.browse_detail {
            let overlay = ui::layout::centered_rect(70, 60, area);
            frame.render_widget(Clear, overlay);
            frame.render_widget(
                TermDetail::new(term, "Detail".to_string(), app.theme),
                overlay,
            );
        }
    }

    if app.delete_confirm.is_some() {
        let dialog = ui::layout::centered_rect(40, 20, area);
        frame.render_widget(Clear, dialog);
        let confirm = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Delete this term? (y/n)  ",
                Style::default().fg(colors.fg()),
            )),
        ])
        .style(Style::default().bg(colors.bg()))
        .block(
            Block::bordered()
                .title(" Confirm ")
                .border_style(Style::default().fg(colors.error()))
                .style(Style::default().bg(colors.bg())),
        );
        frame.render_widget(confirm, dialog);
    }

    render_footer(
        frame,
        app,
        layout.footer,
        " [/] Search  [c] Category  [m] Mastery  [Enter] Detail  [a] Add  [e] Edit  [x] Delete  [ESC] Back ",
    );
}

fn render_review(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::new(area);
    let colors = &app.theme.colors;

    let category = app.review_filter.category.as_deref().unwrap_or("all");
    let mastery = app.review_filter.mastery.map(|m| m.label()).unwrap_or("all");
    let auto = if app.config.review_auto_advance { " | auto-advance on" } else { "" };
    render_header(
        frame,
        app,
        layout.header,
        format!(" Review | category: {category} | mastery: {mastery}{auto}"),
    );

    let terms = app.review_terms();
    if terms.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "  No terms match this filter. Add terms or loosen it.",
            Style::default().fg(colors.muted()),
        )));
        frame.render_widget(msg, layout.main);
    } else {
        let index = app.review_index.min(terms.len() - 1);
        let width = if layout.tier == ui::layout::LayoutTier::Narrow { 96 } else { 70 };
        let card_area = ui::layout::centered_rect(width, 80, layout.main);
        frame.render_widget(
            Flashcard::new(&terms[index], index, terms.len(), app.review_revealed, app.theme),
            card_area,
        );
    }

    render_footer(
        frame,
        app,
        layout.footer,
        " [Space] Reveal  [h/l] Prev/Next  [r] Random  [c/m] Filter  [1/2/3] Set mastery  [ESC] Back ",
    );
}

fn render_quiz_setup(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = ui::layout::centered_rect(60, 70, area);

    let block = Block::bordered()
        .title(" New Quiz ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let scope = app.selected_scope();
    let fields: Vec<(String, String)> = vec![
        ("Mode".to_string(), app.setup_mode.label().to_string()),
        ("Scope".to_string(), scope.label().to_string()),
        ("Questions".to_string(), format!("{}", app.selected_count())),
    ];

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(fields.len() as u16 * 3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    let header = Paragraph::new(Line::from(Span::styled(
        "  Arrows to navigate and change, Enter to start",
        Style::default().fg(colors.muted()),
    )));
    header.render(layout[0], frame.buffer_mut());

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(fields.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
        .split(layout[1]);

    for (i, (label, value)) in fields.iter().enumerate() {
        let is_selected = i == app.setup_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_style = Style::default()
            .fg(if is_selected { colors.accent() } else { colors.fg() })
            .add_modifier(if is_selected { Modifier::BOLD } else { Modifier::empty() });
        let value_style = Style::default()
            .fg(if is_selected { colors.fg() } else { colors.muted() });

        let lines = vec![
            Line::from(Span::styled(format!("{indicator}{label}:"), label_style)),
            Line::from(Span::styled(format!("    < {value} >"), value_style)),
        ];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }

    let paused_hint = if app.session.is_some() { "  [R] Resume paused quiz" } else { "" };
    let footer = Paragraph::new(Line::from(Span::styled(
        format!("  [Enter] Start  [ESC] Back{paused_hint}"),
        Style::default().fg(colors.accent()),
    )));
    footer.render(layout[3], frame.buffer_mut());

    let status_area = Rect::new(area.x, area.y + area.height.saturating_sub(1), area.width, 1);
    let message = app.status.as_ref().map(|s| (s.text.as_str(), s.level));
    frame.render_widget(StatusBar::new(message, app.theme), status_area);
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::new(area);

    let Some(session) = &app.session else {
        return;
    };
    render_header(
        frame,
        app,
        layout.header,
        format!(" Quiz | {} | scope: {}", session.mode().label(), session.scope().label()),
    );

    if let Some(question) = session.current_question() {
        let panel = QuizPanel {
            question,
            index: session.answered(),
            total: session.total(),
            correct_so_far: session.correct_so_far(),
            selected_choice: app.choice_selected,
            last_answer: session.last_answer(),
            theme: app.theme,
        };
        frame.render_widget(panel, layout.main);
    }

    render_footer(
        frame,
        app,
        layout.footer,
        " [1-4] Answer  [j/k] Select  [Enter] Submit  [ESC] Pause  [x] Abandon ",
    );
}

fn render_summary(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    if let Some(ref result) = app.summary {
        let centered = ui::layout::centered_rect(70, 85, area);
        frame.render_widget(ScoreSummary::new(result, app.theme), centered);
    }

    let status_area = Rect::new(area.x, area.y + area.height.saturating_sub(1), area.width, 1);
    let message = app.status.as_ref().map(|s| (s.text.as_str(), s.level));
    frame.render_widget(StatusBar::new(message, app.theme), status_area);
}

fn render_editor(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::new(area);

    render_header(frame, app, layout.header, " Term Editor".to_string());

    if let Some(form) = &app.form {
        let centered = ui::layout::centered_rect(70, 85, layout.main);
        frame.render_widget(TermFormView { form, theme: app.theme }, centered);
    }

    render_footer(
        frame,
        app,
        layout.footer,
        " [Up/Down] Field  [Tab] Complete category  [Enter] Save  [ESC] Cancel ",
    );
}

fn render_history(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::new(area);
    let colors = &app.theme.colors;

    render_header(
        frame,
        app,
        layout.header,
        format!(" History & Data | {} results", app.results.len()),
    );

    let history = HistoryList {
        results: &app.results,
        selected: app.history_selected,
        expanded: app.history_expanded,
        confirm_delete: app.history_confirm_delete,
        theme: app.theme,
    };
    // The sidebar area, when present, is folded into the main list view.
    let main = match layout.sidebar {
        Some(sidebar) => layout.main.union(sidebar),
        None => layout.main,
    };
    frame.render_widget(history, main);

    if let Some((kind, input)) = &app.path_prompt {
        let dialog = ui::layout::centered_rect(60, 25, area);
        frame.render_widget(Clear, dialog);
        let (before, cursor, after) = input.render_parts();
        let cursor_text = cursor.map(|c| c.to_string()).unwrap_or_else(|| " ".to_string());
        let prompt = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {}:", kind.prompt_label()),
                Style::default().fg(colors.fg()),
            )),
            Line::from(vec![
                Span::raw("  "),
                Span::styled(before.to_string(), Style::default().fg(colors.fg())),
                Span::styled(
                    cursor_text,
                    Style::default().fg(colors.cursor_fg()).bg(colors.cursor_bg()),
                ),
                Span::styled(after.to_string(), Style::default().fg(colors.fg())),
            ]),
        ])
        .style(Style::default().bg(colors.bg()))
        .block(
            Block::bordered()
                .title(" File ")
                .border_style(Style::default().fg(colors.accent()))
                .style(Style::default().bg(colors.bg())),
        );
        frame.render_widget(prompt, dialog);
    }

    render_footer(
        frame,
        app,
        layout.footer,
        " [Enter] Details  [x] Delete  [e/E] Export CSV  [i] Import CSV  [J/I] JSON  [g] Reload  [ESC] Back ",
    );
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = ui::layout::centered_rect(60, 70, area);

    let block = Block::bordered()
        .title(" Settings ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let on_off = |b: bool| if b { "on".to_string() } else { "off".to_string() };
    let fields: Vec<(String, String)> = vec![
        ("Questions per quiz".to_string(), format!("{}", app.config.question_count)),
        ("Theme".to_string(), app.config.theme.clone()),
        ("Review auto-advance".to_string(), on_off(app.config.review_auto_advance)),
        (
            "Persist abandoned quizzes".to_string(),
            on_off(app.config.persist_abandoned_quizzes),
        ),
    ];

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(fields.len() as u16 * 3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    let header = Paragraph::new(Line::from(Span::styled(
        "  Arrows to navigate, Enter/Right to change, ESC to save & exit",
        Style::default().fg(colors.muted()),
    )));
    header.render(layout[0], frame.buffer_mut());

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(fields.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
        .split(layout[1]);

    for (i, (label, value)) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_style = Style::default()
            .fg(if is_selected { colors.accent() } else { colors.fg() })
            .add_modifier(if is_selected { Modifier::BOLD } else { Modifier::empty() });
        let value_style = Style::default()
            .fg(if is_selected { colors.fg() } else { colors.muted() });

        let lines = vec![
            Line::from(Span::styled(format!("{indicator}{label}:"), label_style)),
            Line::from(Span::styled(format!("    < {value} >"), value_style)),
        ];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }

    let footer = Paragraph::new(Line::from(Span::styled(
        "  [ESC] Save & back  [Enter/arrows] Change value",
        Style::default().fg(colors.accent()),
    )));
    footer.render(layout[3], frame.buffer_mut());
}
