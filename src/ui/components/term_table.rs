use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::engine::repository::Term;
use crate::ui::theme::Theme;

/// Scrolling list of terms for the browse screen. Rows are fixed-width
/// formatted; the selected row is kept in view.
pub struct TermTable<'a> {
    pub terms: &'a [Term],
    pub selected: usize,
    pub title: String,
    pub theme: &'a Theme,
}

impl<'a> TermTable<'a> {
    pub fn new(terms: &'a [Term], selected: usize, title: String, theme: &'a Theme) -> Self {
        Self { terms, selected, title, theme }
    }
}

impl Widget for TermTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(Line::from(Span::styled(
                format!(" {} ", self.title),
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
            )))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.terms.is_empty() {
            let msg = Paragraph::new(Line::from(Span::styled(
                "No terms match. Add terms or loosen the filter.",
                Style::default().fg(colors.muted()),
            )));
            msg.render(inner, buf);
            return;
        }

        let header = Line::from(Span::styled(
            "    ID  Term                      Category        Mastery      Definition",
            Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
        ));
        let mut lines = vec![header];

        // Keep the selection visible: scroll so it stays inside the window.
        let visible = inner.height.saturating_sub(1) as usize;
        let offset = if visible == 0 || self.selected < visible {
            0
        } else {
            self.selected + 1 - visible
        };

        for (i, term) in self.terms.iter().enumerate().skip(offset).take(visible.max(1)) {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let row = format!(
                " {indicator} {id:>4}  {name:<24}  {category:<14}  {mastery:<11}  {definition}",
                id = term.id,
                name = clip(&term.term, 24),
                category = clip(&term.category, 14),
                mastery = term.mastery.label(),
                definition = clip(&term.definition, 40),
            );
            let style = if is_selected {
                Style::default().fg(colors.fg()).bg(colors.accent_dim())
            } else {
                Style::default().fg(colors.mastery(term.mastery))
            };
            lines.push(Line::from(Span::styled(row, style)));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

/// Full single-term view: browse sidebar and review flashcard both use it.
pub struct TermDetail<'a> {
    pub term: &'a Term,
    pub title: String,
    pub theme: &'a Theme,
}

impl<'a> TermDetail<'a> {
    pub fn new(term: &'a Term, title: String, theme: &'a Theme) -> Self {
        Self { term, title, theme }
    }
}

impl Widget for TermDetail<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(Line::from(Span::styled(
                format!(" {} ", self.title),
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
            )))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {}", self.term.term),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled(
                    format!("  {}", self.term.category),
                    Style::default().fg(colors.muted()),
                ),
                Span::raw("  "),
                Span::styled(
                    self.term.mastery.label(),
                    Style::default().fg(colors.mastery(self.term.mastery)),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled("  Definition", Style::default().fg(colors.accent()))),
            Line::from(Span::styled(
                format!("  {}", self.term.definition),
                Style::default().fg(colors.fg()),
            )),
        ];

        if self.term.has_example() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("  Example", Style::default().fg(colors.accent()))));
            lines.push(Line::from(Span::styled(
                format!("  {}", self.term.example),
                Style::default().fg(colors.fg()).add_modifier(Modifier::ITALIC),
            )));
        }

        Paragraph::new(lines).wrap(Wrap { trim: false }).render(inner, buf);
    }
}

fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let clipped: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{clipped}…")
    }
}
