use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::mastery::Mastery;
use crate::engine::repository::Term;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormResult {
    Continue,
    Submit,
    Cancel,
}

const FIELD_LABELS: [&str; 4] = ["Term", "Definition", "Example", "Category"];
const CATEGORY_FIELD: usize = 3;

/// Add/edit form state. Four text fields plus, when editing, an explicit
/// mastery row so progress can be corrected by hand. The category field
/// Tab-completes against the known category names.
pub struct TermForm {
    pub editing: Option<u64>,
    pub inputs: Vec<LineInput>,
    pub mastery: Mastery,
    pub focus: usize,
}

impl TermForm {
    pub fn new_add(categories: Vec<String>) -> Self {
        Self {
            editing: None,
            inputs: Self::build_inputs(&["", "", "", ""], categories),
            mastery: Mastery::NotStarted,
            focus: 0,
        }
    }

    pub fn new_edit(term: &Term, categories: Vec<String>) -> Self {
        Self {
            editing: Some(term.id),
            inputs: Self::build_inputs(
                &[
                    term.term.as_str(),
                    term.definition.as_str(),
                    term.example.as_str(),
                    term.category.as_str(),
                ],
                categories,
            ),
            mastery: term.mastery,
            focus: 0,
        }
    }

    fn build_inputs(values: &[&str; 4], categories: Vec<String>) -> Vec<LineInput> {
        values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                if i == CATEGORY_FIELD {
                    LineInput::with_candidates(value, categories.clone())
                } else {
                    LineInput::new(value)
                }
            })
            .collect()
    }

    fn rows(&self) -> usize {
        if self.editing.is_some() { 5 } else { 4 }
    }

    pub fn handle(&mut self, key: KeyEvent) -> FormResult {
        match key.code {
            KeyCode::Esc => return FormResult::Cancel,
            KeyCode::Enter => return FormResult::Submit,
            KeyCode::Up => {
                self.focus = if self.focus == 0 { self.rows() - 1 } else { self.focus - 1 };
            }
            KeyCode::Down => {
                self.focus = (self.focus + 1) % self.rows();
            }
            _ if self.focus < self.inputs.len() => {
                self.inputs[self.focus].handle(key);
            }
            // Mastery row: arrows cycle, everything else is ignored
            KeyCode::Left => self.mastery = self.mastery.demoted(),
            KeyCode::Right => self.mastery = self.mastery.promoted(),
            _ => {}
        }
        FormResult::Continue
    }

    pub fn values(&self) -> (&str, &str, &str, &str) {
        (
            self.inputs[0].value(),
            self.inputs[1].value(),
            self.inputs[2].value(),
            self.inputs[3].value(),
        )
    }
}

pub struct TermFormView<'a> {
    pub form: &'a TermForm,
    pub theme: &'a Theme,
}

impl Widget for TermFormView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let form = self.form;

        let title = if form.editing.is_some() { " Edit Term " } else { " Add Term " };
        let block = Block::bordered()
            .title(Line::from(Span::styled(
                title,
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
            )))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![Line::from("")];
        for (i, label) in FIELD_LABELS.iter().enumerate() {
            let is_focused = i == form.focus;
            let indicator = if is_focused { ">" } else { " " };
            let required = if i == 2 { "" } else { "*" };

            lines.push(Line::from(Span::styled(
                format!(" {indicator} {label}{required}"),
                Style::default()
                    .fg(if is_focused { colors.accent() } else { colors.fg() })
                    .add_modifier(if is_focused { Modifier::BOLD } else { Modifier::empty() }),
            )));

            let (before, cursor, after) = form.inputs[i].render_parts();
            let mut spans = vec![
                Span::raw("     "),
                Span::styled(before.to_string(), Style::default().fg(colors.fg())),
            ];
            if is_focused {
                match cursor {
                    Some(ch) => spans.push(Span::styled(
                        ch.to_string(),
                        Style::default().fg(colors.cursor_fg()).bg(colors.cursor_bg()),
                    )),
                    None => spans.push(Span::styled(
                        " ",
                        Style::default().bg(colors.cursor_bg()),
                    )),
                }
            } else if let Some(ch) = cursor {
                spans.push(Span::styled(ch.to_string(), Style::default().fg(colors.fg())));
            }
            spans.push(Span::styled(after.to_string(), Style::default().fg(colors.fg())));
            lines.push(Line::from(spans));
            lines.push(Line::from(""));
        }

        if form.editing.is_some() {
            let is_focused = form.focus == FIELD_LABELS.len();
            let indicator = if is_focused { ">" } else { " " };
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" {indicator} Mastery"),
                    Style::default()
                        .fg(if is_focused { colors.accent() } else { colors.fg() })
                        .add_modifier(if is_focused { Modifier::BOLD } else { Modifier::empty() }),
                ),
                Span::raw("   "),
                Span::styled(
                    format!("< {} >", form.mastery.label()),
                    Style::default().fg(colors.mastery(form.mastery)),
                ),
            ]));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn sample_term() -> Term {
        Term {
            id: 3,
            term: "Churn".to_string(),
            definition: "Customer loss rate".to_string(),
            example: String::new(),
            category: "Sales".to_string(),
            mastery: Mastery::Learning,
        }
    }

    #[test]
    fn add_form_has_no_mastery_row() {
        let mut form = TermForm::new_add(vec![]);
        assert_eq!(form.rows(), 4);
        form.handle(key(KeyCode::Up));
        assert_eq!(form.focus, 3, "wraps to last text field");
    }

    #[test]
    fn edit_form_cycles_mastery_with_arrows() {
        let mut form = TermForm::new_edit(&sample_term(), vec![]);
        assert_eq!(form.rows(), 5);
        for _ in 0..4 {
            form.handle(key(KeyCode::Down));
        }
        assert_eq!(form.focus, 4);
        form.handle(key(KeyCode::Right));
        assert_eq!(form.mastery, Mastery::Mastered);
        form.handle(key(KeyCode::Right));
        assert_eq!(form.mastery, Mastery::Mastered, "sticky at the top");
        form.handle(key(KeyCode::Left));
        assert_eq!(form.mastery, Mastery::Learning);
    }

    #[test]
    fn typing_goes_to_the_focused_field() {
        let mut form = TermForm::new_add(vec![]);
        form.handle(key(KeyCode::Char('C')));
        form.handle(key(KeyCode::Down));
        form.handle(key(KeyCode::Char('d')));
        let (term, definition, _, _) = form.values();
        assert_eq!(term, "C");
        assert_eq!(definition, "d");
    }

    #[test]
    fn category_field_completes_known_categories() {
        let mut form = TermForm::new_add(vec!["Finance".to_string()]);
        form.focus = CATEGORY_FIELD;
        form.handle(key(KeyCode::Char('F')));
        form.handle(key(KeyCode::Tab));
        assert_eq!(form.values().3, "Finance");
    }

    #[test]
    fn submit_and_cancel_bubble_up() {
        let mut form = TermForm::new_add(vec![]);
        assert_eq!(form.handle(key(KeyCode::Enter)), FormResult::Submit);
        assert_eq!(form.handle(key(KeyCode::Esc)), FormResult::Cancel);
    }
}
