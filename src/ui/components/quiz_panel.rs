use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::generator::questions::Question;
use crate::session::result::AnswerRecord;
use crate::ui::theme::Theme;

/// The live quiz view: one question, its shuffled choices, the running
/// score, and feedback for the previously graded answer.
pub struct QuizPanel<'a> {
    pub question: &'a Question,
    pub index: usize,
    pub total: usize,
    pub correct_so_far: usize,
    pub selected_choice: usize,
    pub last_answer: Option<&'a AnswerRecord>,
    pub theme: &'a Theme,
}

impl Widget for QuizPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(Line::from(Span::styled(
                format!(
                    " Question {}/{}  |  Score {}/{} ",
                    self.index + 1,
                    self.total,
                    self.correct_so_far,
                    self.index,
                ),
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
            )))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![Line::from("")];

        if let Some(last) = self.last_answer {
            let feedback = if last.is_correct {
                Span::styled("  Correct!", Style::default().fg(colors.success()))
            } else {
                Span::styled(
                    format!("  Wrong. The answer was: {}", last.correct_answer),
                    Style::default().fg(colors.error()),
                )
            };
            lines.push(Line::from(feedback));
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(
            format!("  {}", self.question.prompt),
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));

        for (i, choice) in self.question.choices.iter().enumerate() {
            let is_selected = i == self.selected_choice;
            let indicator = if is_selected { ">" } else { " " };
            let style = if is_selected {
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            lines.push(Line::from(Span::styled(
                format!("  {indicator} [{}] {choice}", i + 1),
                style,
            )));
        }

        Paragraph::new(lines).wrap(Wrap { trim: false }).render(inner, buf);
    }
}
