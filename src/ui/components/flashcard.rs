use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::engine::repository::Term;
use crate::ui::theme::Theme;

/// Review-mode card: one term at a time within the filtered set.
pub struct Flashcard<'a> {
    pub term: &'a Term,
    pub position: usize,
    pub total: usize,
    pub revealed: bool,
    pub theme: &'a Theme,
}

impl<'a> Flashcard<'a> {
    pub fn new(
        term: &'a Term,
        position: usize,
        total: usize,
        revealed: bool,
        theme: &'a Theme,
    ) -> Self {
        Self { term, position, total, revealed, theme }
    }
}

impl Widget for Flashcard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(Line::from(Span::styled(
                format!(" Review {}/{} ", self.position + 1, self.total),
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
            )))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.term.term.clone(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled(self.term.category.clone(), Style::default().fg(colors.muted())),
                Span::raw("   "),
                Span::styled(
                    self.term.mastery.label(),
                    Style::default().fg(colors.mastery(self.term.mastery)),
                ),
            ]),
            Line::from(""),
        ];

        if self.revealed {
            lines.push(Line::from(Span::styled(
                "Definition",
                Style::default().fg(colors.accent()),
            )));
            lines.push(Line::from(Span::styled(
                self.term.definition.clone(),
                Style::default().fg(colors.fg()),
            )));
            if self.term.has_example() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Example",
                    Style::default().fg(colors.accent()),
                )));
                lines.push(Line::from(Span::styled(
                    self.term.example.clone(),
                    Style::default().fg(colors.fg()).add_modifier(Modifier::ITALIC),
                )));
            }
        } else {
            lines.push(Line::from(Span::styled(
                "[Space] Reveal definition",
                Style::default().fg(colors.muted()),
            )));
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
